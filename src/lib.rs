//! Builders for assembling JVM classes one instruction at a time.
//!
//! A [`CodeBlock`] is an instruction list, wrapped up as a method of a [`JiteClass`], which can then be turned into
//! a [`jite_tree::class::ClassNode`] and given to some [`ClassEncoder`] to get the bytes of the class file.
//!
//! ```
//! use jitescript::{CodeBlock, JdkVersion, JiteClass};
//! use jitescript::access::{ACC_PUBLIC, ACC_STATIC};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut class = JiteClass::new("Greeter")?;
//! class.define_default_constructor()?;
//! class.define_method("greet", ACC_PUBLIC | ACC_STATIC, "()Ljava/lang/String;", CodeBlock::build(|code| {
//!     code.ldc("Hello, World!").areturn();
//! }))?;
//!
//! let node = class.to_class_node(JdkVersion::V1_6);
//! assert_eq!(node.methods.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod annotation;
pub mod code_block;
pub mod definition;
pub mod encoder;
pub mod jite_class;
pub mod lambda;

pub use jite_tree::access;

pub use annotation::{AnnotationArrayValue, AnnotationValue, VisibleAnnotation};
pub use code_block::CodeBlock;
pub use definition::{FieldDefinition, MethodDefinition};
pub use encoder::ClassEncoder;
pub use jite_class::{JdkVersion, JiteClass};
pub use lambda::LambdaBlock;
