pub mod code;

use anyhow::{anyhow, bail, Context};
use crate::annotation::Annotation;
use crate::class::ClassName;
use crate::macros::{make_access, make_name_type};
use crate::method::code::Code;

#[derive(Debug, Clone, PartialEq)]
pub struct MethodNode {
	pub access: MethodAccess,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,

	/// The code of the method, [`None`] for `abstract` and `native` methods.
	pub code: Option<Code>,

	pub runtime_visible_annotations: Vec<Annotation>,
}

impl MethodNode {
	pub fn new(access: MethodAccess, name: MethodName, descriptor: MethodDescriptor) -> MethodNode {
		MethodNode {
			access,
			name,
			descriptor,

			code: None,

			runtime_visible_annotations: Vec::new(),
		}
	}
}

#[derive(Copy, Clone, Default, Hash, Eq, PartialEq)]
pub struct MethodAccess {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_synchronized: bool,
	pub is_bridge: bool,
	pub is_varargs: bool,
	pub is_native: bool,
	pub is_abstract: bool,
	pub is_strict: bool,
	pub is_synthetic: bool,
}

make_access!(MethodAccess {
	is_public:       "public"       = 0x0001,
	is_private:      "private"      = 0x0002,
	is_protected:    "protected"    = 0x0004,
	is_static:       "static"       = 0x0008,
	is_final:        "final"        = 0x0010,
	is_synchronized: "synchronized" = 0x0020,
	is_bridge:       "bridge"       = 0x0040,
	is_varargs:      "varargs"      = 0x0080,
	is_native:       "native"       = 0x0100,
	is_abstract:     "abstract"     = 0x0400,
	is_strict:       "strict"       = 0x0800,
	is_synthetic:    "synthetic"    = 0x1000,
});

/// A reference to a method, as used by `invokevirtual` and friends, and by [method handles][code::Handle].
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MethodRef {
	pub class: ClassName,
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MethodNameAndDesc {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

make_name_type!(
	/// A method name, either `<init>`, `<clinit>` or an unqualified name not containing `<` or `>`.
	pub MethodName;
	check_valid(s) = if crate::names::is_valid_method_name(s) {
		Ok(())
	} else {
		bail!("invalid method name {s:?}: must be `<init>`, `<clinit>` or non-empty and not contain any of `.`, `;`, `[`, `/`, `<` and `>`")
	};
);

impl MethodName {
	pub const INIT: MethodName = MethodName::from_static("<init>");
	pub const CLINIT: MethodName = MethodName::from_static("<clinit>");
}

make_name_type!(
	/// A method descriptor like `(ILjava/lang/String;)V`.
	pub MethodDescriptor;
	check_valid(s) = crate::descriptor::parse_method_descriptor(s)
		.map(|_| ())
		.with_context(|| anyhow!("invalid method descriptor {s:?}"));
);
