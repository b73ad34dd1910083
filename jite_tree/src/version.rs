use std::cmp::Ordering;

/// Represents a class file version.
///
/// Use the associated constants (like [`Version::V1_6`]) if you want that version.
///
/// Take a look at [the list of class file versions](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.1-200-B.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
}

impl Version {
	pub const V1_1: Version = Version::new(45, 3);
	pub const V1_2: Version = Version::new(46, 0);
	pub const V1_3: Version = Version::new(47, 0);
	pub const V1_4: Version = Version::new(48, 0);
	pub const V1_5: Version = Version::new(49, 0);
	pub const V1_6: Version = Version::new(50, 0);
	pub const V1_7: Version = Version::new(51, 0);
	pub const V1_8: Version = Version::new(52, 0);
	pub const V9: Version = Version::new(53, 0);
	pub const V10: Version = Version::new(54, 0);
	pub const V11: Version = Version::new(55, 0);
	pub const V17: Version = Version::new(61, 0);
	pub const V21: Version = Version::new(65, 0);

	pub const fn new(major: u16, minor: u16) -> Version {
		Version { major, minor }
	}

	/// Returns if class files of this version may contain `invokedynamic` instructions.
	pub fn supports_invokedynamic(&self) -> bool {
		*self >= Version::V1_7
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.major.cmp(&other.major)
			.then_with(|| self.minor.cmp(&other.minor))
	}
}
