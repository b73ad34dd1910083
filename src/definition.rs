use anyhow::{anyhow, Context, Result};
use log::trace;
use jite_tree::access::{ACC_ABSTRACT, ACC_NATIVE};
use jite_tree::field::{ConstantValue, FieldDescriptor, FieldName, FieldNode};
use jite_tree::method::code::Code;
use jite_tree::method::{MethodDescriptor, MethodName, MethodNode};
use crate::annotation::VisibleAnnotation;
use crate::code_block::CodeBlock;

/// A method of a [`crate::JiteClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
	method_name: MethodName,
	modifiers: u16,
	signature: MethodDescriptor,
	method_body: CodeBlock,
}

impl MethodDefinition {
	/// Creates a method definition, checking the name and the descriptor.
	pub fn new(method_name: &str, modifiers: u16, signature: &str, method_body: CodeBlock) -> Result<MethodDefinition> {
		let method_name = MethodName::from(method_name);
		let signature = MethodDescriptor::from(signature);

		method_name.check_valid()
			.and_then(|()| signature.check_valid())
			.with_context(|| anyhow!("failed to define method {method_name:?} with descriptor {signature:?}"))?;

		trace!("defined method {method_name}{signature} with {} instructions", method_body.instructions().len());

		Ok(MethodDefinition { method_name, modifiers, signature, method_body })
	}

	pub fn method_name(&self) -> &MethodName {
		&self.method_name
	}

	pub fn modifiers(&self) -> u16 {
		self.modifiers
	}

	pub fn signature(&self) -> &MethodDescriptor {
		&self.signature
	}

	pub fn method_body(&self) -> &CodeBlock {
		&self.method_body
	}

	/// Creates the method node for the class file structure.
	///
	/// An `abstract` or `native` method with an empty body gets no `Code` attribute.
	pub fn to_method_node(&self) -> MethodNode {
		let mut node = MethodNode::new(self.modifiers.into(), self.method_name.clone(), self.signature.clone());

		let has_no_code = self.modifiers & (ACC_ABSTRACT | ACC_NATIVE) != 0 && self.method_body.is_empty();
		if !has_no_code {
			node.code = Some(Code {
				instructions: self.method_body.instructions().to_vec(),
				exception_table: self.method_body.try_catch_blocks().to_vec(),
				local_variables: self.method_body.local_variable_entries().to_vec(),
			});
		}

		node.runtime_visible_annotations = self.method_body.annotations().iter()
			.map(VisibleAnnotation::to_node)
			.collect();

		node
	}
}

/// A field of a [`crate::JiteClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
	field_name: FieldName,
	modifiers: u16,
	signature: FieldDescriptor,
	value: Option<ConstantValue>,
	annotations: Vec<VisibleAnnotation>,
}

impl FieldDefinition {
	/// Creates a field definition, checking the name and the descriptor.
	///
	/// The `value` ends up as the `ConstantValue` attribute, which the JVM only uses for `static` fields.
	pub fn new(field_name: &str, modifiers: u16, signature: &str, value: Option<ConstantValue>) -> Result<FieldDefinition> {
		let field_name = FieldName::from(field_name);
		let signature = FieldDescriptor::from(signature);

		field_name.check_valid()
			.and_then(|()| signature.check_valid())
			.with_context(|| anyhow!("failed to define field {field_name:?} with descriptor {signature:?}"))?;

		trace!("defined field {field_name}:{signature}");

		Ok(FieldDefinition {
			field_name,
			modifiers,
			signature,
			value,
			annotations: Vec::new(),
		})
	}

	pub fn field_name(&self) -> &FieldName {
		&self.field_name
	}

	pub fn modifiers(&self) -> u16 {
		self.modifiers
	}

	pub fn signature(&self) -> &FieldDescriptor {
		&self.signature
	}

	pub fn value(&self) -> Option<&ConstantValue> {
		self.value.as_ref()
	}

	pub fn annotations(&self) -> &[VisibleAnnotation] {
		&self.annotations
	}

	pub fn add_annotation(&mut self, annotation: VisibleAnnotation) -> &mut Self {
		self.annotations.push(annotation);
		self
	}

	/// Adds a new annotation to this field, and returns it for adding element values.
	pub fn annotate(&mut self, desc: &str) -> Result<&mut VisibleAnnotation> {
		self.annotations.push(VisibleAnnotation::new(desc)?);
		let index = self.annotations.len() - 1;
		Ok(&mut self.annotations[index])
	}

	/// Creates the field node for the class file structure.
	pub fn to_field_node(&self) -> FieldNode {
		let mut node = FieldNode::new(self.modifiers.into(), self.field_name.clone(), self.signature.clone());
		node.constant_value = self.value.clone();
		node.runtime_visible_annotations = self.annotations.iter()
			.map(VisibleAnnotation::to_node)
			.collect();
		node
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use jite_tree::access::{ACC_ABSTRACT, ACC_FINAL, ACC_PUBLIC, ACC_STATIC};
	use jite_tree::class::ClassName;
	use jite_tree::field::ConstantValue;
	use jite_tree::method::code::{Instruction, Label, LabelRange, Lv};
	use crate::annotation::VisibleAnnotation;
	use crate::code_block::CodeBlock;
	use crate::definition::{FieldDefinition, MethodDefinition};

	#[test]
	fn method_node() -> Result<()> {
		let mut body = CodeBlock::build(|code| {
			code.ldc("Sausages!").areturn();
		});
		body.annotate("LScalarAnnotation;")?.value("breakfastItem", "Sausages!");

		let method = MethodDefinition::new("annotatedMethod", ACC_PUBLIC, "()Ljava/lang/String;", body)?;
		let node = method.to_method_node();

		assert_eq!(node.name, "annotatedMethod");
		assert_eq!(node.descriptor, "()Ljava/lang/String;");
		assert!(node.access.is_public);
		assert_eq!(node.code.map(|code| code.instructions.len()), Some(2));
		assert_eq!(node.runtime_visible_annotations.len(), 1);
		Ok(())
	}

	#[test]
	fn method_node_has_exception_table_and_local_variables() -> Result<()> {
		let start = Label::new();
		let end = Label::new();

		let mut body = CodeBlock::with_arity(2);
		body.label(start)
			.trycatch(
				Some("java/lang/Exception"),
				|code| { code.aload(1).athrow(); },
				Some(|code: &mut CodeBlock| { code.pop(); }),
			)
			.label(end)
			.voidreturn()
			.local_variable("this", "LFoo;", start, end, 0)
			.local_variable_with_signature("names", "Ljava/util/List;", "Ljava/util/List<Ljava/lang/String;>;", start, end, 1);

		let method = MethodDefinition::new("run", ACC_PUBLIC, "(Ljava/util/List;)V", body)?;
		let code = method.to_method_node().code.expect("code of run");

		assert_eq!(code.exception_table.len(), 1);
		let exception = &code.exception_table[0];
		assert_eq!(exception.catch, Some(ClassName::from("java/lang/Exception")));
		for label in [exception.start, exception.end, exception.handler] {
			assert!(code.instructions.contains(&Instruction::Label(label)), "{label:?} isn't inserted");
		}

		assert_eq!(code.local_variables, vec![
			Lv {
				range: LabelRange { start, end },
				name: "this".into(),
				descriptor: "LFoo;".into(),
				signature: None,
				index: 0,
			},
			Lv {
				range: LabelRange { start, end },
				name: "names".into(),
				descriptor: "Ljava/util/List;".into(),
				signature: Some("Ljava/util/List<Ljava/lang/String;>;".to_owned()),
				index: 1,
			},
		]);
		Ok(())
	}

	#[test]
	fn abstract_methods_have_no_code() -> Result<()> {
		let method = MethodDefinition::new("run", ACC_PUBLIC | ACC_ABSTRACT, "()V", CodeBlock::new())?;
		assert_eq!(method.to_method_node().code, None);

		let method = MethodDefinition::new("run", ACC_PUBLIC, "()V", CodeBlock::new())?;
		assert_eq!(method.to_method_node().code.map(|code| code.instructions), Some(vec![]));

		let method = MethodDefinition::new("run", ACC_PUBLIC, "()V", CodeBlock::build(|code| { code.voidreturn(); }))?;
		assert_eq!(method.to_method_node().code.map(|code| code.instructions), Some(vec![Instruction::Return]));
		Ok(())
	}

	#[test]
	fn invalid_methods() {
		assert!(MethodDefinition::new("", ACC_PUBLIC, "()V", CodeBlock::new()).is_err());
		assert!(MethodDefinition::new("a.b", ACC_PUBLIC, "()V", CodeBlock::new()).is_err());
		assert!(MethodDefinition::new("foo", ACC_PUBLIC, "V", CodeBlock::new()).is_err());
		assert!(MethodDefinition::new("foo", ACC_PUBLIC, "(Ljava/lang/String)V", CodeBlock::new()).is_err());

		let error = MethodDefinition::new("foo", ACC_PUBLIC, "()", CodeBlock::new()).unwrap_err();
		assert!(format!("{error:#}").contains("foo"), "{error:#}");
	}

	#[test]
	fn field_node() -> Result<()> {
		let mut field = FieldDefinition::new("annotatedField", ACC_PUBLIC, "Ljava/lang/String;", None)?;
		field.add_annotation({
			let mut annotation = VisibleAnnotation::new("LScalarAnnotation;")?;
			annotation.value("breakfastItem", "Toast!");
			annotation
		});

		let node = field.to_field_node();
		assert_eq!(node.name, "annotatedField");
		assert_eq!(node.descriptor, "Ljava/lang/String;");
		assert_eq!(node.constant_value, None);
		assert_eq!(node.runtime_visible_annotations.len(), 1);

		let constant = FieldDefinition::new("ANSWER", ACC_PUBLIC | ACC_STATIC | ACC_FINAL, "I", Some(ConstantValue::Integer(42)))?;
		let node = constant.to_field_node();
		assert!(node.access.is_static && node.access.is_final);
		assert_eq!(node.constant_value, Some(ConstantValue::Integer(42)));
		Ok(())
	}

	#[test]
	fn invalid_fields() {
		assert!(FieldDefinition::new("", ACC_PUBLIC, "I", None).is_err());
		assert!(FieldDefinition::new("a;b", ACC_PUBLIC, "I", None).is_err());
		assert!(FieldDefinition::new("foo", ACC_PUBLIC, "V", None).is_err());
		assert!(FieldDefinition::new("foo", ACC_PUBLIC, "java/lang/String", None).is_err());
	}
}
