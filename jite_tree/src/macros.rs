/// Creates a [`java_string::JavaString`] like newtype used for names and descriptors.
///
/// The content may hold anything modified UTF-8 can, including unpaired surrogates. The type can be constructed from
/// anything string like without any checks, call the generated `check_valid` to get an error describing why the
/// content isn't allowed. The check sees the content with unpaired surrogates replaced by `U+FFFD`.
/// ```ignore
/// make_name_type!(
///     /// Some docs.
///     pub FooName;
///     check_valid(s) = if s == "foo" { Ok(()) } else { bail!("invalid foo name: must be `foo`") };
/// );
/// ```
macro_rules! make_name_type {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident;
		check_valid($s:ident) = $check:expr;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
		$vis struct $name(std::borrow::Cow<'static, java_string::JavaStr>);

		impl $name {
			#[doc = concat!("Constructs a [`", stringify!($name), "`] from a string literal, usable in `const` items.")]
			pub const fn from_static(s: &'static str) -> $name {
				$name(std::borrow::Cow::Borrowed(java_string::JavaStr::from_str(s)))
			}

			pub fn as_java_str(&self) -> &java_string::JavaStr {
				&self.0
			}

			/// Returns the content as a [`str`], with unpaired surrogates replaced by `U+FFFD`.
			pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
				self.0.as_str_lossy()
			}

			pub fn into_inner(self) -> java_string::JavaString {
				self.0.into_owned()
			}

			#[doc = concat!("Checks that the content is allowed for a [`", stringify!($name), "`].")]
			pub fn check_valid(&self) -> anyhow::Result<()> {
				let lossy = self.0.as_str_lossy();
				let $s: &str = &lossy;
				$check
			}

			pub fn is_valid(&self) -> bool {
				self.check_valid().is_ok()
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Display::fmt(&*self.0, f)
			}
		}

		impl AsRef<java_string::JavaStr> for $name {
			fn as_ref(&self) -> &java_string::JavaStr {
				&self.0
			}
		}

		impl From<java_string::JavaString> for $name {
			fn from(value: java_string::JavaString) -> Self {
				$name(std::borrow::Cow::Owned(value))
			}
		}

		impl From<&java_string::JavaStr> for $name {
			fn from(value: &java_string::JavaStr) -> Self {
				$name(std::borrow::Cow::Owned(value.to_owned()))
			}
		}

		impl From<String> for $name {
			fn from(value: String) -> Self {
				$name(std::borrow::Cow::Owned(java_string::JavaString::from(value)))
			}
		}

		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				$name(std::borrow::Cow::Owned(java_string::JavaString::from(value)))
			}
		}

		impl From<&String> for $name {
			fn from(value: &String) -> Self {
				$name(std::borrow::Cow::Owned(java_string::JavaString::from(value)))
			}
		}

		impl PartialEq<str> for $name {
			fn eq(&self, other: &str) -> bool {
				*self.0 == *other
			}
		}

		impl PartialEq<&str> for $name {
			fn eq(&self, other: &&str) -> bool {
				*self.0 == **other
			}
		}
	}
}

/// Creates the `Debug` and `u16` conversion implementations for an access flag struct made of `bool`s.
///
/// Each field is given together with its keyword (for `Debug`) and its bit.
macro_rules! make_access {
	(
		$name:ident {
			$( $field:ident : $keyword:literal = $bit:literal ),* $(,)?
		}
	) => {
		impl std::fmt::Debug for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(concat!(stringify!($name), " { "))?;
				$(
					if self.$field { f.write_str(concat!($keyword, " "))?; }
				)*
				f.write_str("}")
			}
		}

		impl From<u16> for $name {
			fn from(value: u16) -> Self {
				$name {
					$( $field: value & $bit != 0, )*
				}
			}
		}

		impl From<$name> for u16 {
			fn from(value: $name) -> Self {
				0 $( | (if value.$field { $bit } else { 0 }) )*
			}
		}
	}
}

pub(crate) use make_name_type;
pub(crate) use make_access;
