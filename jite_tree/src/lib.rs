//! The in-memory structure of a JVM class, as handed to a class file encoder.
//!
//! Nothing in here computes stack sizes, stack map frames or constant pools, that's the job of
//! whatever consumes a [`class::ClassNode`].

mod macros;

pub mod access;
pub mod annotation;
pub mod class;
pub mod descriptor;
pub mod field;
pub mod method;
pub mod version;

mod names {
	/// Checks if a class name is valid according to JVMS 4.2.1 (also accepting array class names).
	pub(crate) fn is_valid_class_name(x: &str) -> bool {
		if x.starts_with('[') {
			// an array class name is a field descriptor
			crate::descriptor::Type::parse_field_descriptor(x).is_ok()
		} else {
			// a list of identifiers split by /
			// each identifier must be an unqualified name
			x.split('/').all(is_valid_unqualified_name)
		}
	}

	/// Checks if a name is an unqualified name according to JVMS 4.2.2
	///
	/// This is used for field names, formal parameter names, local variable names.
	pub(crate) fn is_valid_unqualified_name(x: &str) -> bool {
		// must contain at least one unicode codepoint
		!x.is_empty() &&
			// must not contain any of . ; [ /
			x.chars().all(|c| !matches!(c, '.' | ';' | '[' | '/'))
	}

	/// Checks if a method name is valid according to JVMS 4.2.2
	pub(crate) fn is_valid_method_name(x: &str) -> bool {
		// either one of the special names or an unqualified name with special < > restriction
		x == "<init>" || x == "<clinit>" || (
			// must contain at least one unicode codepoint
			!x.is_empty() &&
				x.chars().all(|c| !matches!(c, '.' | ';' | '[' | '/' | '<' | '>'))
		)
	}

	#[cfg(test)]
	mod testing {
		use crate::names::*;

		#[test]
		fn class_names() {
			assert!(is_valid_class_name("java/lang/Object"));
			assert!(is_valid_class_name("java/lang/Thread"));
			assert!(is_valid_class_name("[[[D"));
			assert!(is_valid_class_name("An$Inner$Class"));

			assert!(!is_valid_class_name("")); // it may come as a surprise, but an empty class name is not valid
			assert!(!is_valid_class_name("/"));
			assert!(!is_valid_class_name("/a"));
			assert!(!is_valid_class_name("a/"));
			assert!(!is_valid_class_name("//a"));
			assert!(!is_valid_class_name("a//"));
			assert!(!is_valid_class_name("a.b"));
			assert!(!is_valid_class_name("a;b"));
			assert!(!is_valid_class_name("a[b"));
			assert!(!is_valid_class_name("[V"));
		}

		#[test]
		fn unqualified_names() {
			assert!(is_valid_unqualified_name("foo"));
			assert!(is_valid_unqualified_name("FOO"));
			assert!(is_valid_unqualified_name("1234567")); // yes numbers are valid here, but not in java source code
			assert!(is_valid_unqualified_name("a$name"));

			assert!(!is_valid_unqualified_name(""));
			assert!(!is_valid_unqualified_name("."));
			assert!(!is_valid_unqualified_name(";"));
			assert!(!is_valid_unqualified_name("["));
			assert!(!is_valid_unqualified_name("/"));
		}

		#[test]
		fn method_names() {
			assert!(is_valid_method_name("foo"));
			assert!(is_valid_method_name("<init>"));
			assert!(is_valid_method_name("<clinit>"));
			assert!(is_valid_method_name("lambda$0"));

			assert!(!is_valid_method_name(""));
			assert!(!is_valid_method_name("."));
			assert!(!is_valid_method_name("/"));
			assert!(!is_valid_method_name("<NotClinit>"));
			assert!(!is_valid_method_name("<>"));
			assert!(!is_valid_method_name("<"));
			assert!(!is_valid_method_name(">"));
		}
	}
}
