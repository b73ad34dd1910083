use std::iter::Peekable;
use std::str::Chars;
use anyhow::{anyhow, bail, Context, Result};
use java_string::JavaString;
use crate::class::ClassName;
use crate::field::FieldDescriptor;
use crate::method::MethodDescriptor;

/// Represents a type.
///
/// In case of an array, use the [`Type::Array`] variant.
///
/// ```
/// use jite_tree::descriptor::{ArrayType, Type};
///
/// // the type of a java `int`
/// let int_type = Type::I;
///
/// // the type of a java `int[][]`
/// let int_array_type = Type::Array(2, ArrayType::I);
///
/// assert_ne!(int_type, int_array_type);
/// assert_eq!(int_array_type.descriptor(), "[[I");
/// ```
///
/// Note: you should never construct the [`Type::Array`] variant with a dimension of zero.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Type {
	/// A `byte`. In rust, this is a `i8`.
	B,
	/// A `char`.
	C,
	/// A `double`. In rust, this is a `f64`.
	D,
	/// A `float`. In rust, this is a `f32`.
	F,
	/// An `int`. In rust, this is a `i32`.
	I,
	/// A `long`. In rust, this is a `i64`.
	J,
	/// A `short`. In rust, this is a `i16`.
	S,
	/// A `boolean`. In rust, this is a `bool`.
	Z,
	/// An instance of the class specified by [`ClassName`].
	Object(ClassName),
	/// An array type, represented by the dimension and the inner [`ArrayType`].
	Array(u8, ArrayType),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ArrayType {
	B,
	C,
	D,
	F,
	I,
	J,
	S,
	Z,
	Object(ClassName),
}

/// A method descriptor split up into its parameters and its return type.
///
/// A return type of [`None`] means `void`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedMethodDescriptor {
	pub parameter_descriptors: Vec<Type>,
	pub return_descriptor: Option<Type>,
}

// The grammar for descriptors is:
//   FieldDescriptor:
//     FieldType
//
//   MethodDescriptor:
//     "(" FieldType* ")" ReturnDescriptor
//
//   ReturnDescriptor:
//     FieldType | "V"
//
//   FieldType:
//     "B" | "C" | "D" | "F" | "I" | "J" | "S" | "Z" |
//     "L" ClassName ";" |
//     "[" FieldType
fn read_class_name(chars: &mut Peekable<Chars>) -> Result<ClassName> {
	let mut s = String::new();

	let mut char = chars.next().ok_or_else(|| anyhow!("unexpected abrupt ending of descriptor"))?;
	while char != ';' {
		s.push(char);

		char = chars.next().ok_or_else(|| anyhow!("unexpected abrupt ending of descriptor"))?;
	}

	if s.starts_with('[') {
		bail!("object type in descriptor must not be an array class name, got {s:?}");
	}
	let class_name = ClassName::from(s);
	class_name.check_valid()?;
	Ok(class_name)
}

fn read_field_type(chars: &mut Peekable<Chars>) -> Result<Type> {
	let mut array_dimension: usize = 0;
	while chars.next_if_eq(&'[').is_some() {
		array_dimension += 1;
	}

	let char = chars.next().ok_or_else(|| anyhow!("unexpected abrupt ending of descriptor"))?;
	if array_dimension == 0 {
		Ok(match char {
			'B' => Type::B,
			'C' => Type::C,
			'D' => Type::D,
			'F' => Type::F,
			'I' => Type::I,
			'J' => Type::J,
			'S' => Type::S,
			'Z' => Type::Z,
			'L' => Type::Object(read_class_name(chars)?),
			x => bail!("unexpected char {x:?} in descriptor"),
		})
	} else {
		let array_dimension = u8::try_from(array_dimension)
			.with_context(|| anyhow!("array dimension of {array_dimension} is larger than the allowed 255"))?;

		let array_type = match char {
			'B' => ArrayType::B,
			'C' => ArrayType::C,
			'D' => ArrayType::D,
			'F' => ArrayType::F,
			'I' => ArrayType::I,
			'J' => ArrayType::J,
			'S' => ArrayType::S,
			'Z' => ArrayType::Z,
			'L' => ArrayType::Object(read_class_name(chars)?),
			x => bail!("unexpected char {x:?} in descriptor"),
		};
		Ok(Type::Array(array_dimension, array_type))
	}
}

fn write_class_name(class_name: &ClassName, string: &mut JavaString) {
	string.push('L');
	string.push_java_str(class_name.as_java_str());
	string.push(';');
}

fn write_field_type(t: &Type, string: &mut JavaString) {
	match t {
		Type::B => string.push('B'),
		Type::C => string.push('C'),
		Type::D => string.push('D'),
		Type::F => string.push('F'),
		Type::I => string.push('I'),
		Type::J => string.push('J'),
		Type::S => string.push('S'),
		Type::Z => string.push('Z'),
		Type::Object(class_name) => write_class_name(class_name, string),
		Type::Array(array_dimension, array_type) => {
			for _ in 0..*array_dimension {
				string.push('[');
			}
			match array_type {
				ArrayType::B => string.push('B'),
				ArrayType::C => string.push('C'),
				ArrayType::D => string.push('D'),
				ArrayType::F => string.push('F'),
				ArrayType::I => string.push('I'),
				ArrayType::J => string.push('J'),
				ArrayType::S => string.push('S'),
				ArrayType::Z => string.push('Z'),
				ArrayType::Object(class_name) => write_class_name(class_name, string),
			}
		},
	}
}

impl Type {
	/// Constructs the type of an instance of the given class, for example `Type::object("java/lang/String")`.
	pub fn object(class_name: impl Into<ClassName>) -> Type {
		Type::Object(class_name.into())
	}

	/// Attempts to parse a field descriptor.
	///
	/// A field descriptor is defined by the [grammar](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.3.2) in the
	/// Java Virtual Machine Specification.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use jite_tree::descriptor::{ArrayType, Type};
	///
	/// assert_eq!(Type::parse_field_descriptor("I").unwrap(), Type::I);
	/// assert_eq!(Type::parse_field_descriptor("Ljava/lang/Object;").unwrap(), Type::object("java/lang/Object"));
	/// assert_eq!(Type::parse_field_descriptor("[[[D").unwrap(), Type::Array(3, ArrayType::D));
	/// ```
	pub fn parse_field_descriptor(descriptor: &str) -> Result<Type> {
		let mut chars = descriptor.chars().peekable();

		let t = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read field descriptor {descriptor:?}"))?;

		if chars.peek().is_some() {
			bail!("expected end of field descriptor {descriptor:?}, got {:?} remaining", String::from_iter(chars));
		}

		Ok(t)
	}

	/// Returns the field descriptor of this type, like `I` or `Ljava/lang/String;`.
	pub fn descriptor(&self) -> FieldDescriptor {
		let mut s = JavaString::new();
		write_field_type(self, &mut s);
		FieldDescriptor::from(s)
	}

	/// Returns the internal name of this type, as used by `new`, `checkcast` and friends.
	///
	/// For an object type that's the slash separated class name, for an array type it's the descriptor.
	/// Primitive types don't have an internal name.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use jite_tree::descriptor::{ArrayType, Type};
	///
	/// assert_eq!(Type::object("java/lang/String").internal_name().unwrap(), "java/lang/String");
	/// assert_eq!(Type::Array(1, ArrayType::object("java/lang/String")).internal_name().unwrap(), "[Ljava/lang/String;");
	/// assert_eq!(Type::I.internal_name(), None);
	/// ```
	pub fn internal_name(&self) -> Option<ClassName> {
		match self {
			Type::Object(class_name) => Some(class_name.clone()),
			Type::Array(..) => Some(ClassName::from(self.descriptor().into_inner())),
			_ => None,
		}
	}
}

impl ArrayType {
	pub fn object(class_name: impl Into<ClassName>) -> ArrayType {
		ArrayType::Object(class_name.into())
	}
}

/// Attempts to parse a method descriptor.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use jite_tree::descriptor::{parse_method_descriptor, Type};
///
/// let parsed = parse_method_descriptor("(IJLjava/lang/String;)V").unwrap();
/// assert_eq!(parsed.parameter_descriptors, vec![Type::I, Type::J, Type::object("java/lang/String")]);
/// assert_eq!(parsed.return_descriptor, None);
/// ```
pub fn parse_method_descriptor(descriptor: &str) -> Result<ParsedMethodDescriptor> {
	let mut chars = descriptor.chars().peekable();

	if chars.next_if_eq(&'(').is_none() {
		bail!("method descriptor {descriptor:?} must start with `(`");
	}

	let mut parameter_descriptors = Vec::new();
	while chars.next_if_eq(&')').is_none() {
		let t = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read parameter descriptor of method descriptor {descriptor:?}"))?;
		parameter_descriptors.push(t);
	}

	let return_descriptor = if chars.next_if_eq(&'V').is_some() {
		None
	} else {
		let t = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read return descriptor of method descriptor {descriptor:?}"))?;
		Some(t)
	};

	if chars.peek().is_some() {
		bail!("expected end of method descriptor {descriptor:?}, got {:?} remaining", String::from_iter(chars));
	}

	Ok(ParsedMethodDescriptor { parameter_descriptors, return_descriptor })
}

impl ParsedMethodDescriptor {
	/// Writes the method descriptor back out.
	pub fn write(&self) -> MethodDescriptor {
		let mut s = JavaString::from("(");
		for parameter in &self.parameter_descriptors {
			write_field_type(parameter, &mut s);
		}
		s.push(')');
		match &self.return_descriptor {
			Some(t) => write_field_type(t, &mut s),
			None => s.push('V'),
		}
		MethodDescriptor::from(s)
	}
}

impl MethodDescriptor {
	/// Builds a method descriptor from the return type and the parameter types.
	///
	/// A return type of [`None`] means `void`.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use jite_tree::descriptor::Type;
	/// use jite_tree::method::MethodDescriptor;
	///
	/// let desc = MethodDescriptor::from_types(Some(&Type::object("java/lang/String")), &[Type::I, Type::Z]);
	/// assert_eq!(desc, "(IZ)Ljava/lang/String;");
	/// assert_eq!(MethodDescriptor::from_types(None, &[]), "()V");
	/// ```
	pub fn from_types(return_type: Option<&Type>, parameters: &[Type]) -> MethodDescriptor {
		ParsedMethodDescriptor {
			parameter_descriptors: parameters.to_vec(),
			return_descriptor: return_type.cloned(),
		}.write()
	}

	pub fn parse(&self) -> Result<ParsedMethodDescriptor> {
		parse_method_descriptor(&self.as_str_lossy())
	}
}

impl FieldDescriptor {
	pub fn parse(&self) -> Result<Type> {
		Type::parse_field_descriptor(&self.as_str_lossy())
	}
}
