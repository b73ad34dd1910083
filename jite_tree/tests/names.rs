use anyhow::Result;
use java_string::{JavaCodePoint, JavaStr, JavaString};
use pretty_assertions::assert_eq;
use jite_tree::descriptor::Type;
use jite_tree::class::ClassName;
use jite_tree::field::FieldName;
use jite_tree::method::code::LocalVariableName;
use jite_tree::method::MethodName;

#[test]
fn valid_class_names() -> Result<()> {
	let valid_class_names = [
		"foo",
		"foo$bar",
		"java/lang/Object",
		"org/example/MyClassName",
		"[[[D",
		"[[Ljava/lang/Integer;",
	];

	for i in valid_class_names {
		assert!(
			ClassName::from(i).is_valid(),
			"{:?} is a valid class name", i
		);
	}

	Ok(())
}

#[test]
fn invalid_class_names() -> Result<()> {
	let invalid_class_names = [
		"",
		".",
		"/",
		";",
		"[",
		"a/",
		"/a",
		"[V",
		"//a",
		"a//",
		"a.b",
		"a;b",
		"a[b",
		"a//a",
		"java.lang.Object",
	];

	for i in invalid_class_names {
		assert!(
			!ClassName::from(i).is_valid(),
			"{:?} is an invalid class name", i
		);
	}

	Ok(())
}

#[test]
fn valid_method_names() -> Result<()> {
	let valid_method_names = [
		"<init>",
		"<clinit>",
		"foo",
		"lambda$0",
		"1234",
	];

	for i in valid_method_names {
		assert!(
			MethodName::from(i).is_valid(),
			"{:?} is a valid method name", i
		);
	}

	Ok(())
}

#[test]
fn invalid_method_names() -> Result<()> {
	let invalid_method_names = [
		"",
		"<foo>",
		"a.b",
		"a/b",
		"a;b",
		"a[b",
		"<",
		">",
	];

	for i in invalid_method_names {
		assert!(
			!MethodName::from(i).is_valid(),
			"{:?} is an invalid method name", i
		);
	}

	Ok(())
}

#[test]
fn field_and_local_variable_names() -> Result<()> {
	for i in ["foo", "$", "this$0", "<init>"] {
		assert!(FieldName::from(i).is_valid(), "{:?} is a valid field name", i);
		assert!(LocalVariableName::from(i).is_valid(), "{:?} is a valid local variable name", i);
	}
	for i in ["", "a.b", "a/b", "a;b", "a[b"] {
		assert!(!FieldName::from(i).is_valid(), "{:?} is an invalid field name", i);
		assert!(!LocalVariableName::from(i).is_valid(), "{:?} is an invalid local variable name", i);
	}

	Ok(())
}

#[test]
fn errors_name_the_offending_value() {
	let error = MethodName::from("a.b").check_valid().unwrap_err();
	assert!(error.to_string().contains("\"a.b\""), "{error}");
}

#[test]
fn names_keep_unpaired_surrogates() -> Result<()> {
	let surrogate = JavaString::from(JavaCodePoint::from_u32(0xD800).expect("a surrogate is a code point"));
	let name = JavaString::from("pkg/Foo") + surrogate.as_java_str();

	let class_name = ClassName::from(name.clone());
	assert!(class_name.is_valid());
	assert_eq!(class_name.as_java_str(), name.as_java_str());
	assert_eq!(class_name.as_str_lossy(), "pkg/Foo\u{FFFD}");

	let descriptor = Type::object(class_name).descriptor();
	assert!(descriptor.is_valid());
	assert_eq!(descriptor.into_inner(), JavaString::from("L") + name.as_java_str() + JavaStr::from_str(";"));

	Ok(())
}
