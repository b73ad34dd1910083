use anyhow::{anyhow, bail, Context};
use java_string::JavaString;
use crate::annotation::Annotation;
use crate::class::ClassName;
use crate::macros::{make_access, make_name_type};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
	pub access: FieldAccess,
	pub name: FieldName,
	pub descriptor: FieldDescriptor,

	pub constant_value: Option<ConstantValue>,

	pub runtime_visible_annotations: Vec<Annotation>,
}

impl FieldNode {
	pub fn new(access: FieldAccess, name: FieldName, descriptor: FieldDescriptor) -> FieldNode {
		FieldNode {
			access,
			name,
			descriptor,

			constant_value: None,

			runtime_visible_annotations: Vec::new(),
		}
	}
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldAccess {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_volatile: bool,
	pub is_transient: bool,
	pub is_synthetic: bool,
	pub is_enum: bool,
}

make_access!(FieldAccess {
	is_public:    "public"    = 0x0001,
	is_private:   "private"   = 0x0002,
	is_protected: "protected" = 0x0004,
	is_static:    "static"    = 0x0008,
	is_final:     "final"     = 0x0010,
	is_volatile:  "volatile"  = 0x0040,
	is_transient: "transient" = 0x0080,
	is_synthetic: "synthetic" = 0x1000,
	is_enum:      "enum"      = 0x4000,
});

/// The value of the `ConstantValue` attribute of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	String(JavaString),
}

impl From<i32> for ConstantValue {
	fn from(value: i32) -> Self {
		ConstantValue::Integer(value)
	}
}
impl From<f32> for ConstantValue {
	fn from(value: f32) -> Self {
		ConstantValue::Float(value)
	}
}
impl From<i64> for ConstantValue {
	fn from(value: i64) -> Self {
		ConstantValue::Long(value)
	}
}
impl From<f64> for ConstantValue {
	fn from(value: f64) -> Self {
		ConstantValue::Double(value)
	}
}
impl From<&str> for ConstantValue {
	fn from(value: &str) -> Self {
		ConstantValue::String(JavaString::from(value))
	}
}
impl From<String> for ConstantValue {
	fn from(value: String) -> Self {
		ConstantValue::String(JavaString::from(value))
	}
}
impl From<JavaString> for ConstantValue {
	fn from(value: JavaString) -> Self {
		ConstantValue::String(value)
	}
}

/// A reference to a field, as used by `getfield` and friends.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldRef {
	pub class: ClassName,
	pub name: FieldName,
	pub desc: FieldDescriptor,
}

make_name_type!(
	/// A field name, an unqualified name as of JVMS 4.2.2.
	pub FieldName;
	check_valid(s) = if crate::names::is_valid_unqualified_name(s) {
		Ok(())
	} else {
		bail!("invalid field name {s:?}: must be non-empty and not contain any of `.`, `;`, `[` and `/`")
	};
);

make_name_type!(
	/// A field descriptor like `I` or `[Ljava/lang/String;`.
	pub FieldDescriptor;
	check_valid(s) = crate::descriptor::Type::parse_field_descriptor(s)
		.map(|_| ())
		.with_context(|| anyhow!("invalid field descriptor {s:?}"));
);
