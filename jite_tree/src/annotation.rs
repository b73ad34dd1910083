use std::fmt::{Debug, Formatter};
use crate::field::FieldDescriptor;

#[derive(Clone, PartialEq)]
pub struct Annotation {
	pub annotation_type: FieldDescriptor,
	pub element_value_pairs: Vec<ElementValuePair>,
}

impl Annotation {
	pub fn new(annotation_type: FieldDescriptor) -> Annotation {
		Annotation {
			annotation_type,
			element_value_pairs: Vec::new(),
		}
	}

	/// Returns the value of the first element with the given name.
	pub fn get(&self, name: &str) -> Option<&ElementValue> {
		self.element_value_pairs.iter()
			.find(|pair| pair.name == name)
			.map(|pair| &pair.value)
	}
}

impl Debug for Annotation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "@{:?}", self.annotation_type)?;
		f.debug_map()
			.entries(self.element_value_pairs.iter()
				.map(|pair| (&pair.name, &pair.value))
			)
			.finish()
	}
}

#[derive(Clone, PartialEq)]
pub struct ElementValuePair {
	pub name: String,
	pub value: ElementValue,
}

impl Debug for ElementValuePair {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} = {:?}", self.name, self.value)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
	Object(Object),
	Enum {
		type_name: FieldDescriptor,
		const_name: String,
	},
	/// A class literal, given as its return descriptor (so `V` for `void.class`).
	Class(String),
	AnnotationInterface(Annotation),
	ArrayType(Vec<ElementValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
	Byte(i8),
	Char(u16),
	Double(f64),
	Float(f32),
	Integer(i32),
	Long(i64),
	Short(i16),
	Boolean(bool),
	String(String),
}

impl From<i8> for Object {
	fn from(value: i8) -> Self {
		Object::Byte(value)
	}
}
impl From<char> for Object {
	/// Characters outside the basic multilingual plane don't fit in a java `char` and get replaced by `U+FFFD`.
	fn from(value: char) -> Self {
		Object::Char(u16::try_from(u32::from(value)).unwrap_or(0xFFFD))
	}
}
impl From<f64> for Object {
	fn from(value: f64) -> Self {
		Object::Double(value)
	}
}
impl From<f32> for Object {
	fn from(value: f32) -> Self {
		Object::Float(value)
	}
}
impl From<i32> for Object {
	fn from(value: i32) -> Self {
		Object::Integer(value)
	}
}
impl From<i64> for Object {
	fn from(value: i64) -> Self {
		Object::Long(value)
	}
}
impl From<i16> for Object {
	fn from(value: i16) -> Self {
		Object::Short(value)
	}
}
impl From<bool> for Object {
	fn from(value: bool) -> Self {
		Object::Boolean(value)
	}
}
impl From<&str> for Object {
	fn from(value: &str) -> Self {
		Object::String(value.to_owned())
	}
}
impl From<String> for Object {
	fn from(value: String) -> Self {
		Object::String(value)
	}
}
