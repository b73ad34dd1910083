//! Wiring up lambdas, the way `javac` compiles them.
//!
//! The body of a lambda becomes a synthetic method `lambda$N` of the class, and the place creating the lambda gets an
//! `invokedynamic` instruction bootstrapped by [`METAFACTORY`], which creates an instance of the functional interface
//! calling that method.

use anyhow::{anyhow, bail, Context, Result};
use java_string::JavaString;
use log::debug;
use jite_tree::access::{ACC_INTERFACE, ACC_STATIC, ACC_SYNTHETIC};
use jite_tree::class::ClassName;
use jite_tree::descriptor::Type;
use jite_tree::field::FieldDescriptor;
use jite_tree::method::code::{Handle, Loadable};
use jite_tree::method::{MethodDescriptor, MethodName, MethodRef};
use crate::code_block::CodeBlock;
use crate::jite_class::JiteClass;

/// The bootstrap method for lambdas, `LambdaMetafactory.metafactory`.
pub const METAFACTORY: Handle = Handle::InvokeStatic(MethodRef {
	class: ClassName::from_static("java/lang/invoke/LambdaMetafactory"),
	name: MethodName::from_static("metafactory"),
	desc: MethodDescriptor::from_static(concat!(
		"(",
		"Ljava/lang/invoke/MethodHandles$Lookup;",
		"Ljava/lang/String;",
		"Ljava/lang/invoke/MethodType;",
		"Ljava/lang/invoke/MethodType;",
		"Ljava/lang/invoke/MethodHandle;",
		"Ljava/lang/invoke/MethodType;",
		")Ljava/lang/invoke/CallSite;",
	)),
}, false);

/// A lambda, to be [applied][LambdaBlock::apply] to a class and the code creating it.
///
/// ```
/// use jitescript::{CodeBlock, JdkVersion, JiteClass, LambdaBlock};
/// use jitescript::access::{ACC_PRIVATE, ACC_STATIC};
///
/// # fn main() -> anyhow::Result<()> {
/// let mut class = JiteClass::new("org/example/Lambdas")?;
/// let mut code = CodeBlock::new();
///
/// LambdaBlock::new()
///     .function("java/lang/Runnable", "run", "()V")
///     .delegate_to(ACC_PRIVATE | ACC_STATIC, "()V", CodeBlock::build(|code| {
///         code.voidreturn();
///     }))
///     .apply(&mut class, &mut code)?;
///
/// let node = class.to_class_node(JdkVersion::V1_8);
/// assert!(node.method("lambda$0", "()V").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LambdaBlock {
	function: Option<Function>,
	capture_arguments: Vec<FieldDescriptor>,
	delegate: Option<Delegate>,
	specialized_signature: Option<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
struct Function {
	interface_type: ClassName,
	interface_method: MethodName,
	interface_signature: MethodDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
struct Delegate {
	access: u16,
	signature: MethodDescriptor,
	code: CodeBlock,
}

impl LambdaBlock {
	pub fn new() -> LambdaBlock {
		LambdaBlock::default()
	}

	/// Sets the functional interface to implement, with the name and the erased descriptor of its abstract method.
	pub fn function(mut self, interface_type: &str, interface_method: &str, interface_signature: &str) -> Self {
		self.function = Some(Function {
			interface_type: interface_type.into(),
			interface_method: interface_method.into(),
			interface_signature: interface_signature.into(),
		});
		self
	}

	/// Sets the descriptors of the values captured by the lambda.
	///
	/// These values are on the stack when the `invokedynamic` instruction is executed.
	pub fn capture(mut self, capture_arguments: &[&str]) -> Self {
		self.capture_arguments = capture_arguments.iter().copied().map(FieldDescriptor::from).collect();
		self
	}

	/// Sets the types of the values captured by the lambda, see [`LambdaBlock::capture`].
	pub fn capture_types(mut self, capture_arguments: &[Type]) -> Self {
		self.capture_arguments = capture_arguments.iter().map(Type::descriptor).collect();
		self
	}

	/// Sets the method the lambda delegates to.
	///
	/// The `signature` takes the captured values first, followed by the arguments of the interface method. A
	/// non-`static` delegate gets the first captured value as `this`.
	pub fn delegate_to(mut self, access: u16, signature: &str, code: CodeBlock) -> Self {
		self.delegate = Some(Delegate {
			access,
			signature: signature.into(),
			code,
		});
		self
	}

	/// Sets the descriptor the interface method has after generic type parameters are filled in.
	///
	/// For example `(Ljava/lang/String;)Ljava/lang/String;` for a `java/util/function/Function` with the interface
	/// signature `(Ljava/lang/Object;)Ljava/lang/Object;`.
	pub fn specialize(mut self, specialized_signature: &str) -> Self {
		self.specialized_signature = Some(specialized_signature.into());
		self
	}

	/// Defines the delegate as a synthetic method of `class`, and emits the `invokedynamic` instruction creating the
	/// lambda to `code`.
	///
	/// Everything is checked before either of them is changed.
	pub fn apply(self, class: &mut JiteClass, code: &mut CodeBlock) -> Result<()> {
		let (function, delegate) = self.check()
			.with_context(|| anyhow!("failed to apply lambda in class {}", class.class_name()))?;

		let lambda_name = class.reserve_lambda();

		let method_ref = MethodRef {
			class: class.class_name().clone(),
			name: lambda_name.clone(),
			desc: delegate.signature.clone(),
		};
		let handle = if delegate.access & ACC_STATIC != 0 {
			Handle::InvokeStatic(method_ref, class.access() & ACC_INTERFACE != 0)
		} else {
			Handle::InvokeVirtual(method_ref)
		};

		let call_site_signature = call_site_signature(&self.capture_arguments, &function.interface_type);

		debug!("wiring lambda {lambda_name}{} of class {} as {}.{}",
			delegate.signature, class.class_name(), function.interface_type, function.interface_method
		);

		class.define_method(&lambda_name.as_str_lossy(), delegate.access | ACC_SYNTHETIC, &delegate.signature.as_str_lossy(), delegate.code)?;

		let specialized_signature = self.specialized_signature.unwrap_or_else(|| function.interface_signature.clone());
		code.invokedynamic(function.interface_method, call_site_signature, METAFACTORY, [
			Loadable::MethodType(function.interface_signature),
			Loadable::MethodHandle(handle),
			Loadable::MethodType(specialized_signature),
		]);

		Ok(())
	}

	fn check(&self) -> Result<(Function, Delegate)> {
		let Some(function) = &self.function else {
			bail!("no functional interface given, use `function`");
		};
		let Some(delegate) = &self.delegate else {
			bail!("no method to delegate to given, use `delegate_to`");
		};

		function.interface_type.check_valid()?;
		function.interface_method.check_valid()?;
		function.interface_signature.check_valid()?;
		for capture in &self.capture_arguments {
			capture.check_valid()?;
		}
		delegate.signature.check_valid()
			.context("invalid delegate descriptor")?;
		if let Some(specialized_signature) = &self.specialized_signature {
			specialized_signature.check_valid()
				.context("invalid specialized descriptor")?;
		}

		Ok((function.clone(), delegate.clone()))
	}
}

/// Creates the descriptor of the `invokedynamic` call site: the captured values are the arguments, and the returned
/// value is the instance of the functional interface.
fn call_site_signature(capture_arguments: &[FieldDescriptor], interface_type: &ClassName) -> MethodDescriptor {
	let mut s = JavaString::from("(");
	for capture in capture_arguments {
		s.push_java_str(capture.as_java_str());
	}
	s.push_str(")L");
	s.push_java_str(interface_type.as_java_str());
	s.push(';');
	MethodDescriptor::from(s)
}
