use anyhow::bail;
use java_string::{JavaStr, JavaString};
use crate::annotation::Annotation;
use crate::field::FieldNode;
use crate::macros::{make_access, make_name_type};
use crate::method::{MethodNameAndDesc, MethodNode};
use crate::version::Version;

/// A class, with everything an encoder needs to write it out as a class file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
	pub version: Version,
	pub access: ClassAccess,
	pub name: ClassName,
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,

	pub fields: Vec<FieldNode>,
	pub methods: Vec<MethodNode>,

	pub inner_classes: Vec<InnerClass>,
	pub enclosing_method: Option<EnclosingMethod>,

	pub source_file: Option<String>,
	pub source_debug_extension: Option<String>,

	pub runtime_visible_annotations: Vec<Annotation>,
}

impl ClassNode {
	pub fn new(version: Version, access: ClassAccess, name: ClassName, super_class: Option<ClassName>, interfaces: Vec<ClassName>) -> ClassNode {
		ClassNode {
			version,
			access,
			name,
			super_class,
			interfaces,

			fields: Vec::new(),
			methods: Vec::new(),

			inner_classes: Vec::new(),
			enclosing_method: None,

			source_file: None,
			source_debug_extension: None,

			runtime_visible_annotations: Vec::new(),
		}
	}

	/// Finds the first method with the given name and descriptor.
	pub fn method(&self, name: &str, descriptor: &str) -> Option<&MethodNode> {
		self.methods.iter().find(|method| method.name == name && method.descriptor == descriptor)
	}

	/// Finds the first field with the given name.
	pub fn field(&self, name: &str) -> Option<&FieldNode> {
		self.fields.iter().find(|field| field.name == name)
	}
}

/// Represents the access flags a class can have.
///
/// Take a look at the [Java Virtual Machine Specification](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.1-200-E.1), for
/// the meanings of these fields, and what combinations are legal and which not.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClassAccess {
	pub is_public: bool,
	pub is_final: bool,
	pub is_super: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
}

make_access!(ClassAccess {
	is_public:     "public"     = 0x0001,
	is_final:      "final"      = 0x0010,
	is_super:      "super"      = 0x0020,
	is_interface:  "interface"  = 0x0200,
	is_abstract:   "abstract"   = 0x0400,
	is_synthetic:  "synthetic"  = 0x1000,
	is_annotation: "annotation" = 0x2000,
	is_enum:       "enum"       = 0x4000,
});

make_name_type!(
	/// Represents a class name, in its internal form (`java/lang/Thread`, not `java.lang.Thread`).
	///
	/// Array class names like `[[D` are also class names.
	///
	/// # Examples
	/// ```
	/// use jite_tree::class::ClassName;
	/// let java_lang_thread = ClassName::from("java/lang/Thread");
	/// assert!(java_lang_thread.is_valid());
	/// assert!(ClassName::JAVA_LANG_OBJECT.is_valid());
	/// assert!(!ClassName::from("java.lang.Thread").is_valid());
	/// ```
	pub ClassName;
	check_valid(s) = if crate::names::is_valid_class_name(s) {
		Ok(())
	} else {
		bail!("invalid class name {s:?}: must be either array field descriptor; or must consist out of `/` separated non-empty parts, and not contain any of `.`, `;`, `[`")
	};
);

impl ClassName {
	pub const JAVA_LANG_OBJECT: ClassName = ClassName::from_static("java/lang/Object");
	pub const JAVA_LANG_STRING: ClassName = ClassName::from_static("java/lang/String");

	/// Checks if this is an array class.
	///
	/// Array class names start with `[`.
	pub fn is_array(&self) -> bool {
		self.as_java_str().starts_with('[')
	}

	/// Returns the part after the last `/`, or the whole name if there's no `/`.
	pub fn simple_name(&self) -> &JavaStr {
		self.as_java_str().rsplit_once('/')
			.map_or(self.as_java_str(), |(_, simple)| simple)
	}
}

/// An entry of the `InnerClasses` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
	pub inner_class: ClassName,
	pub outer_class: Option<ClassName>,
	pub inner_name: Option<JavaString>,
	pub flags: InnerClassFlags,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct InnerClassFlags {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
}

make_access!(InnerClassFlags {
	is_public:     "public"     = 0x0001,
	is_private:    "private"    = 0x0002,
	is_protected:  "protected"  = 0x0004,
	is_static:     "static"     = 0x0008,
	is_final:      "final"      = 0x0010,
	is_interface:  "interface"  = 0x0200,
	is_abstract:   "abstract"   = 0x0400,
	is_synthetic:  "synthetic"  = 0x1000,
	is_annotation: "annotation" = 0x2000,
	is_enum:       "enum"       = 0x4000,
});

/// The `EnclosingMethod` attribute. A `method` of [`None`] says the class is enclosed by the class directly.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethod {
	pub class: ClassName,
	pub method: Option<MethodNameAndDesc>,
}
