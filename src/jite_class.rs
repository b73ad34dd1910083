use anyhow::{anyhow, Context, Result};
use indexmap::IndexSet;
use java_string::{JavaStr, JavaString};
use log::{debug, trace};
use jite_tree::access::{ACC_PUBLIC, ACC_SUPER};
use jite_tree::class::{ClassName, ClassNode, EnclosingMethod, InnerClass};
use jite_tree::field::ConstantValue;
use jite_tree::method::{MethodDescriptor, MethodName};
use jite_tree::version::Version;
use crate::annotation::VisibleAnnotation;
use crate::code_block::CodeBlock;
use crate::definition::{FieldDefinition, MethodDefinition};
use crate::encoder::ClassEncoder;

/// The class file versions a [`JiteClass`] can be assembled for.
///
/// Use at least [`JdkVersion::V1_7`] for classes containing lambdas, as `invokedynamic` isn't allowed before that.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum JdkVersion {
	#[default]
	V1_6,
	V1_7,
	V1_8,
}

impl JdkVersion {
	pub fn version(self) -> Version {
		match self {
			JdkVersion::V1_6 => Version::V1_6,
			JdkVersion::V1_7 => Version::V1_7,
			JdkVersion::V1_8 => Version::V1_8,
		}
	}
}

impl From<JdkVersion> for Version {
	fn from(value: JdkVersion) -> Self {
		value.version()
	}
}

/// A class under construction.
///
/// Methods, fields, annotations and child classes are kept in the order they were added, and end up in that order
/// in the [`ClassNode`] created by [`JiteClass::to_class_node`].
///
/// ```
/// use jitescript::{CodeBlock, JdkVersion, JiteClass};
/// use jitescript::access::{ACC_PUBLIC, ACC_STATIC};
///
/// # fn main() -> anyhow::Result<()> {
/// let class = JiteClass::build("org/example/Runner", "java/lang/Object", &["java/lang/Runnable"], |class| {
///     class.define_default_constructor()?;
///     class.define_method("run", ACC_PUBLIC, "()V", CodeBlock::build_with_arity(1, |code| {
///         code.voidreturn();
///     }))?;
///     Ok(())
/// })?;
///
/// let node = class.to_class_node(JdkVersion::V1_8);
/// assert_eq!(node.interfaces[0], "java/lang/Runnable");
/// assert!(node.method("run", "()V").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JiteClass {
	class_name: ClassName,
	super_class_name: ClassName,
	interfaces: IndexSet<ClassName>,
	access: u16,

	methods: Vec<MethodDefinition>,
	fields: Vec<FieldDefinition>,
	annotations: Vec<VisibleAnnotation>,

	child_classes: Vec<(JavaString, JiteClass)>,
	parent_class_name: Option<ClassName>,

	source_file: Option<String>,
	source_debug: Option<String>,

	lambda_counter: u32,
}

impl JiteClass {
	/// Creates a public class extending `java/lang/Object`.
	pub fn new(class_name: &str) -> Result<JiteClass> {
		JiteClass::with_super(class_name, "java/lang/Object", &[])
	}

	/// Creates a public class with the given super class and interfaces.
	///
	/// Interfaces given more than once are only implemented once.
	pub fn with_super(class_name: &str, super_class_name: &str, interfaces: &[&str]) -> Result<JiteClass> {
		let class_name = ClassName::from(class_name);
		let super_class_name = ClassName::from(super_class_name);
		let interfaces: IndexSet<ClassName> = interfaces.iter().copied().map(ClassName::from).collect();

		class_name.check_valid()
			.and_then(|()| super_class_name.check_valid())
			.and_then(|()| interfaces.iter().try_for_each(ClassName::check_valid))
			.with_context(|| anyhow!("failed to create class {class_name:?}"))?;

		Ok(JiteClass {
			class_name,
			super_class_name,
			interfaces,
			access: ACC_PUBLIC,

			methods: Vec::new(),
			fields: Vec::new(),
			annotations: Vec::new(),

			child_classes: Vec::new(),
			parent_class_name: None,

			source_file: None,
			source_debug: None,

			lambda_counter: 0,
		})
	}

	/// Creates a class like [`JiteClass::with_super`], and then lets `f` define its members.
	pub fn build(
		class_name: &str,
		super_class_name: &str,
		interfaces: &[&str],
		f: impl FnOnce(&mut JiteClass) -> Result<()>,
	) -> Result<JiteClass> {
		let mut class = JiteClass::with_super(class_name, super_class_name, interfaces)?;
		f(&mut class)
			.with_context(|| anyhow!("failed to build class {class_name:?}"))?;
		Ok(class)
	}

	pub fn class_name(&self) -> &ClassName {
		&self.class_name
	}

	pub fn super_class_name(&self) -> &ClassName {
		&self.super_class_name
	}

	pub fn interfaces(&self) -> impl Iterator<Item=&ClassName> + '_ {
		self.interfaces.iter()
	}

	pub fn access(&self) -> u16 {
		self.access
	}

	pub fn methods(&self) -> &[MethodDefinition] {
		&self.methods
	}

	pub fn fields(&self) -> &[FieldDefinition] {
		&self.fields
	}

	pub fn annotations(&self) -> &[VisibleAnnotation] {
		&self.annotations
	}

	/// The child classes, together with their simple inner names.
	pub fn child_classes(&self) -> &[(JavaString, JiteClass)] {
		&self.child_classes
	}

	/// The name of the class this class was added to as a child class.
	pub fn parent_class_name(&self) -> Option<&ClassName> {
		self.parent_class_name.as_ref()
	}

	pub fn source_file(&self) -> Option<&str> {
		self.source_file.as_deref()
	}

	pub fn source_debug(&self) -> Option<&str> {
		self.source_debug.as_deref()
	}

	pub fn set_access(&mut self, access: u16) -> &mut Self {
		self.access = access;
		self
	}

	pub fn set_source_file(&mut self, source_file: impl Into<String>) -> &mut Self {
		self.source_file = Some(source_file.into());
		self
	}

	/// Sets the content of the `SourceDebugExtension` attribute, usually an SMAP.
	pub fn set_source_debug(&mut self, source_debug: impl Into<String>) -> &mut Self {
		self.source_debug = Some(source_debug.into());
		self
	}

	/// Adds a method, with the `Code` made up from `body`.
	///
	/// There's no check whether a method with the same name and descriptor already exists.
	pub fn define_method(&mut self, method_name: &str, modifiers: u16, signature: &str, body: CodeBlock) -> Result<&mut Self> {
		let method = MethodDefinition::new(method_name, modifiers, signature, body)
			.with_context(|| anyhow!("failed to define method in class {}", self.class_name))?;

		self.methods.push(method);
		Ok(self)
	}

	/// Adds a field, and returns it for adding annotations to it.
	///
	/// There's no check whether a field with the same name already exists.
	pub fn define_field(&mut self, field_name: &str, modifiers: u16, signature: &str, value: Option<ConstantValue>) -> Result<&mut FieldDefinition> {
		let field = FieldDefinition::new(field_name, modifiers, signature, value)
			.with_context(|| anyhow!("failed to define field in class {}", self.class_name))?;

		self.fields.push(field);
		let index = self.fields.len() - 1;
		Ok(&mut self.fields[index])
	}

	/// Adds a public constructor taking no arguments, that calls the no argument constructor of the super class.
	pub fn define_default_constructor(&mut self) -> Result<&mut Self> {
		self.define_default_constructor_with_access(ACC_PUBLIC)
	}

	/// Like [`JiteClass::define_default_constructor`], but with the given access flags instead of `public`.
	pub fn define_default_constructor_with_access(&mut self, access: u16) -> Result<&mut Self> {
		let super_class_name = self.super_class_name.clone();
		let body = CodeBlock::build_with_arity(1, |code| {
			code.aload(0)
				.invokespecial(super_class_name, MethodName::INIT, MethodDescriptor::from_static("()V"))
				.voidreturn();
		});
		self.define_method("<init>", access, "()V", body)
	}

	pub fn add_annotation(&mut self, annotation: VisibleAnnotation) -> &mut Self {
		self.annotations.push(annotation);
		self
	}

	/// Adds a new annotation to this class, and returns it for adding element values.
	pub fn annotate(&mut self, desc: &str) -> Result<&mut VisibleAnnotation> {
		let annotation = VisibleAnnotation::new(desc)
			.with_context(|| anyhow!("failed to annotate class {}", self.class_name))?;

		self.annotations.push(annotation);
		let index = self.annotations.len() - 1;
		Ok(&mut self.annotations[index])
	}

	/// Adds a child class, with the inner name derived from the class name of the child.
	///
	/// The inner name is the part after the last `$`, or if there's none, the part after the last `/`:
	/// `pkg/Outer$Inner` gets `Inner`, while `pkg/Outer` gets `Outer`.
	pub fn add_child_class(&mut self, child: JiteClass) -> &mut Self {
		let inner_name = inner_name_of(&child.class_name).to_owned();
		self.add_child_class_named(inner_name, child)
	}

	/// Adds a child class with the given inner name.
	pub fn add_child_class_named(&mut self, inner_name: impl Into<JavaString>, mut child: JiteClass) -> &mut Self {
		let inner_name = inner_name.into();
		trace!("adding child class {} as {inner_name:?} to {}", child.class_name, self.class_name);

		child.parent_class_name = Some(self.class_name.clone());
		self.child_classes.push((inner_name, child));
		self
	}

	/// Reserves a fresh name for a synthetic lambda method, `lambda$0`, `lambda$1` and so on.
	pub fn reserve_lambda(&mut self) -> MethodName {
		let name = MethodName::from(format!("lambda${}", self.lambda_counter));
		self.lambda_counter += 1;
		name
	}

	/// Creates the class node for the class file structure.
	///
	/// This doesn't change anything about the class, assembling twice yields equal nodes.
	pub fn to_class_node(&self, version: JdkVersion) -> ClassNode {
		debug!("assembling class {} for {version:?} with {} methods and {} fields", self.class_name, self.methods.len(), self.fields.len());

		let mut node = ClassNode::new(
			version.version(),
			(self.access | ACC_SUPER).into(),
			self.class_name.clone(),
			Some(self.super_class_name.clone()),
			self.interfaces.iter().cloned().collect(),
		);

		node.source_file = self.source_file.clone();
		node.source_debug_extension = self.source_debug.clone();

		node.enclosing_method = self.parent_class_name.as_ref()
			.map(|parent| EnclosingMethod {
				class: parent.clone(),
				method: None,
			});

		node.inner_classes = self.child_classes.iter()
			.map(|(inner_name, child)| InnerClass {
				inner_class: child.class_name.clone(),
				outer_class: Some(self.class_name.clone()),
				inner_name: Some(inner_name.clone()),
				flags: child.access.into(),
			})
			.collect();

		node.methods = self.methods.iter().map(MethodDefinition::to_method_node).collect();
		node.fields = self.fields.iter().map(FieldDefinition::to_field_node).collect();
		node.runtime_visible_annotations = self.annotations.iter().map(VisibleAnnotation::to_node).collect();

		node
	}

	/// Assembles the class and gives it to the `encoder`.
	///
	/// Errors of the encoder are passed on as they are.
	pub fn to_bytes(&self, version: JdkVersion, encoder: &(impl ClassEncoder + ?Sized)) -> Result<Vec<u8>> {
		let node = self.to_class_node(version);
		encoder.encode(&node)
	}
}

fn inner_name_of(class_name: &ClassName) -> &JavaStr {
	match class_name.as_java_str().rsplit_once('$') {
		Some((_, inner_name)) => inner_name,
		None => class_name.simple_name().trim_start_matches('$'),
	}
}
