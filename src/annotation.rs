//! Building up runtime visible annotations.
//!
//! ```
//! use jitescript::VisibleAnnotation;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut annotation = VisibleAnnotation::new("Lorg/example/Breakfast;")?;
//! annotation
//!     .value("item", "Waffles!")
//!     .enum_value("color", "Lorg/example/Colors;", "PINK");
//! annotation.array_value_of("favoriteColors", ["pink", "purple", "green"]);
//! annotation.annotation_value("element", "Lorg/example/Side;")?
//!     .value("item", "Pancakes!");
//!
//! let node = annotation.to_node();
//! assert_eq!(node.element_value_pairs.len(), 4);
//! # Ok(())
//! # }
//! ```

use anyhow::{anyhow, bail, Context, Result};
use jite_tree::annotation::{Annotation, ElementValue, ElementValuePair, Object};
use jite_tree::field::FieldDescriptor;

/// An annotation under construction, with its element values in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleAnnotation {
	desc: FieldDescriptor,
	values: Vec<(String, AnnotationValue)>,
}

/// The value of an annotation element.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
	/// A primitive or a string.
	Scalar(Object),
	/// An enum constant, given by the descriptor of the enum class and the name of the constant.
	Enum {
		desc: FieldDescriptor,
		name: String,
	},
	/// A class literal, given as its descriptor.
	Class(String),
	Annotation(VisibleAnnotation),
	Array(Vec<AnnotationValue>),
}

fn check_annotation_desc(desc: &FieldDescriptor) -> Result<()> {
	desc.check_valid()?;
	if !desc.as_java_str().starts_with('L') {
		bail!("the descriptor of an annotation must be an object type, got {desc:?}");
	}
	Ok(())
}

impl VisibleAnnotation {
	/// Creates an annotation of the annotation interface with the given descriptor, like `Ljava/lang/Deprecated;`.
	pub fn new(desc: &str) -> Result<VisibleAnnotation> {
		let desc = FieldDescriptor::from(desc);
		check_annotation_desc(&desc)
			.with_context(|| anyhow!("failed to create annotation {desc}"))?;

		Ok(VisibleAnnotation {
			desc,
			values: Vec::new(),
		})
	}

	pub fn desc(&self) -> &FieldDescriptor {
		&self.desc
	}

	pub fn values(&self) -> &[(String, AnnotationValue)] {
		&self.values
	}

	/// Adds an element with a primitive, string or nested annotation value.
	pub fn value(&mut self, name: &str, value: impl Into<AnnotationValue>) -> &mut Self {
		self.values.push((name.to_owned(), value.into()));
		self
	}

	/// Adds an element with an enum constant as value.
	///
	/// The enum is given by the descriptor of the enum class, for example `Ljava/lang/annotation/RetentionPolicy;`.
	pub fn enum_value(&mut self, name: &str, desc: &str, constant: &str) -> &mut Self {
		self.value(name, AnnotationValue::Enum {
			desc: desc.into(),
			name: constant.to_owned(),
		})
	}

	/// Adds an element with a class literal as value, given by its descriptor (`V` stands for `void.class`).
	pub fn class_value(&mut self, name: &str, desc: &str) -> &mut Self {
		self.value(name, AnnotationValue::Class(desc.to_owned()))
	}

	/// Adds an element with a nested annotation as value, and returns that nested annotation for adding its elements.
	pub fn annotation_value(&mut self, name: &str, desc: &str) -> Result<&mut VisibleAnnotation> {
		let nested = VisibleAnnotation::new(desc)
			.with_context(|| anyhow!("failed to add nested annotation {name:?} to {}", self.desc))?;

		self.values.push((name.to_owned(), AnnotationValue::Annotation(nested)));
		match self.values.last_mut() {
			Some((_, AnnotationValue::Annotation(nested))) => Ok(nested),
			_ => unreachable!("a nested annotation was just pushed"),
		}
	}

	/// Adds an element with an initially empty array as value, and returns it for adding the array elements.
	pub fn array_value(&mut self, name: &str) -> AnnotationArrayValue<'_> {
		self.values.push((name.to_owned(), AnnotationValue::Array(Vec::new())));
		match self.values.last_mut() {
			Some((_, AnnotationValue::Array(values))) => AnnotationArrayValue { values },
			_ => unreachable!("an array value was just pushed"),
		}
	}

	/// Adds an element with an array as value, filled with the given values.
	///
	/// This is the same as calling [`VisibleAnnotation::array_value`] and then [`AnnotationArrayValue::add`] for each of
	/// the values.
	pub fn array_value_of<V>(&mut self, name: &str, values: impl IntoIterator<Item = V>) -> AnnotationArrayValue<'_>
		where V: Into<AnnotationValue>
	{
		let mut array = self.array_value(name);
		for value in values {
			array.add(value);
		}
		array
	}

	/// Converts this into the annotation node of the class file structure.
	pub fn to_node(&self) -> Annotation {
		Annotation {
			annotation_type: self.desc.clone(),
			element_value_pairs: self.values.iter()
				.map(|(name, value)| ElementValuePair {
					name: name.clone(),
					value: value.to_element_value(),
				})
				.collect(),
		}
	}
}

impl AnnotationValue {
	fn to_element_value(&self) -> ElementValue {
		match self {
			AnnotationValue::Scalar(object) => ElementValue::Object(object.clone()),
			AnnotationValue::Enum { desc, name } => ElementValue::Enum {
				type_name: desc.clone(),
				const_name: name.clone(),
			},
			AnnotationValue::Class(desc) => ElementValue::Class(desc.clone()),
			AnnotationValue::Annotation(annotation) => ElementValue::AnnotationInterface(annotation.to_node()),
			AnnotationValue::Array(values) => ElementValue::ArrayType(
				values.iter().map(AnnotationValue::to_element_value).collect()
			),
		}
	}
}

/// The elements of an array valued annotation element, see [`VisibleAnnotation::array_value`].
#[derive(Debug)]
pub struct AnnotationArrayValue<'a> {
	values: &'a mut Vec<AnnotationValue>,
}

impl AnnotationArrayValue<'_> {
	/// Appends a primitive, string or annotation to the array.
	///
	/// An added [`VisibleAnnotation`] ends up exactly the same as a nested annotation element value.
	pub fn add(&mut self, value: impl Into<AnnotationValue>) -> &mut Self {
		self.values.push(value.into());
		self
	}

	/// Appends an enum constant to the array.
	pub fn add_enum(&mut self, desc: &str, constant: &str) -> &mut Self {
		self.add(AnnotationValue::Enum {
			desc: desc.into(),
			name: constant.to_owned(),
		})
	}

	/// Appends a class literal to the array.
	pub fn add_class(&mut self, desc: &str) -> &mut Self {
		self.add(AnnotationValue::Class(desc.to_owned()))
	}

	/// Appends a new annotation to the array, and returns it for adding its elements.
	pub fn add_annotation(&mut self, desc: &str) -> Result<&mut VisibleAnnotation> {
		let nested = VisibleAnnotation::new(desc)?;

		self.values.push(AnnotationValue::Annotation(nested));
		match self.values.last_mut() {
			Some(AnnotationValue::Annotation(nested)) => Ok(nested),
			_ => unreachable!("a nested annotation was just pushed"),
		}
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

macro_rules! from_scalar {
	($( $t:ty ),* $(,)?) => {
		$(
			impl From<$t> for AnnotationValue {
				fn from(value: $t) -> Self {
					AnnotationValue::Scalar(Object::from(value))
				}
			}
		)*
	}
}

from_scalar!(i8, char, f64, f32, i32, i64, i16, bool, &str, String);

impl From<Object> for AnnotationValue {
	fn from(value: Object) -> Self {
		AnnotationValue::Scalar(value)
	}
}

impl From<VisibleAnnotation> for AnnotationValue {
	fn from(value: VisibleAnnotation) -> Self {
		AnnotationValue::Annotation(value)
	}
}

impl From<&VisibleAnnotation> for AnnotationValue {
	fn from(value: &VisibleAnnotation) -> Self {
		AnnotationValue::Annotation(value.clone())
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use jite_tree::annotation::{ElementValue, Object};
	use crate::annotation::{AnnotationValue, VisibleAnnotation};

	#[test]
	fn scalar() -> Result<()> {
		let mut annotation = VisibleAnnotation::new("LScalarAnnotation;")?;
		annotation.value("breakfastItem", "Waffles!");

		let node = annotation.to_node();
		assert_eq!(node.annotation_type, "LScalarAnnotation;");
		assert_eq!(node.get("breakfastItem"), Some(&ElementValue::Object(Object::String("Waffles!".to_owned()))));
		Ok(())
	}

	#[test]
	fn variadic_array_is_the_same_as_adding_one_by_one() -> Result<()> {
		let mut a = VisibleAnnotation::new("LAnnotationWithArray;")?;
		a.array_value_of("favoriteColors", ["pink", "purple", "green"]);

		let mut b = VisibleAnnotation::new("LAnnotationWithArray;")?;
		b.array_value("favoriteColors")
			.add("pink")
			.add("purple")
			.add("green");

		assert_eq!(a, b);
		assert_eq!(a.to_node(), b.to_node());
		Ok(())
	}

	#[test]
	fn nested_annotations() -> Result<()> {
		let mut annotation = VisibleAnnotation::new("LAnnotationWithAnnotation;")?;
		annotation.annotation_value("element", "LScalarAnnotation;")?
			.value("breakfastItem", "Pancakes!");

		let node = annotation.to_node();
		let Some(ElementValue::AnnotationInterface(element)) = node.get("element") else {
			panic!("expected a nested annotation, got {node:?}");
		};
		assert_eq!(element.annotation_type, "LScalarAnnotation;");
		assert_eq!(element.get("breakfastItem"), Some(&ElementValue::Object(Object::String("Pancakes!".to_owned()))));
		Ok(())
	}

	#[test]
	fn array_of_annotations() -> Result<()> {
		let mut apples = VisibleAnnotation::new("LEntry;")?;
		apples.value("name", "Apples");
		let mut oranges = VisibleAnnotation::new("LEntry;")?;
		oranges.value("name", "Oranges");

		let mut container = VisibleAnnotation::new("LContainer;")?;
		container.array_value_of("value", [apples.clone(), oranges]);

		let mut nested = VisibleAnnotation::new("LContainer;")?;
		{
			let mut array = nested.array_value("value");
			array.add_annotation("LEntry;")?.value("name", "Apples");
			array.add_annotation("LEntry;")?.value("name", "Oranges");
		}

		assert_eq!(container, nested);

		let mut single = VisibleAnnotation::new("LOther;")?;
		single.value("entry", apples.clone());
		assert_eq!(single.values()[0].1, AnnotationValue::Annotation(apples));
		Ok(())
	}

	#[test]
	fn enum_and_class_values() -> Result<()> {
		let mut annotation = VisibleAnnotation::new("LAnnotationWithEnum;")?;
		annotation
			.enum_value("color", "LColors;", "PINK")
			.class_value("type", "Ljava/lang/String;");

		let node = annotation.to_node();
		assert_eq!(node.get("color"), Some(&ElementValue::Enum {
			type_name: "LColors;".into(),
			const_name: "PINK".to_owned(),
		}));
		assert_eq!(node.get("type"), Some(&ElementValue::Class("Ljava/lang/String;".to_owned())));
		Ok(())
	}

	#[test]
	fn invalid_descriptors() {
		assert!(VisibleAnnotation::new("").is_err());
		assert!(VisibleAnnotation::new("I").is_err());
		assert!(VisibleAnnotation::new("ScalarAnnotation").is_err());
		assert!(VisibleAnnotation::new("[LScalarAnnotation;").is_err());
	}
}
