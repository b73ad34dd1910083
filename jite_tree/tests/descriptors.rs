use anyhow::Result;
use pretty_assertions::assert_eq;
use jite_tree::descriptor::{ArrayType, Type};
use jite_tree::field::FieldDescriptor;
use jite_tree::method::MethodDescriptor;

#[test]
fn valid_field_descriptors() -> Result<()> {
	let valid_field_descriptors = [
		"B",
		"C",
		"D",
		"F",
		"I",
		"J",
		"Ljava/lang/Object;",
		"Lorg/example/MyClassName;",
		"S",
		"Z",
		"[[[D",
	];

	for i in valid_field_descriptors {
		assert!(
			FieldDescriptor::from(i).is_valid(),
			"{:?} is a valid field desc", i
		);
	}

	Ok(())
}

#[test]
fn invalid_field_descriptors() -> Result<()> {
	let invalid_field_descriptors = [
		"",
		"V",
		"(",
		")",
		"()",
		"[V",
		"L;",
		"()V",
		"foo",
		"(D)I",
		"L;DV",
		"Ljava.lang.Object;",
	];

	for i in invalid_field_descriptors {
		assert!(
			!FieldDescriptor::from(i).is_valid(),
			"{:?} is an invalid field desc", i
		);
	}

	Ok(())
}

#[test]
fn valid_method_descriptors() -> Result<()> {
	let valid_method_descriptors = [
		"()V",
		"(I)V",
		"()Ljava/lang/Object;",
		"([Ljava/lang/String;)V",
		"(IDJLjava/lang/String;)[[Z",
	];

	for i in valid_method_descriptors {
		assert!(
			MethodDescriptor::from(i).is_valid(),
			"{:?} is a valid method desc", i
		);
	}

	Ok(())
}

#[test]
fn invalid_method_descriptors() -> Result<()> {
	let invalid_method_descriptors = [
		"",
		"V",
		"(",
		"()",
		"(V)V",
		"(I)",
		"I",
		"()VV",
		"(L;)V",
	];

	for i in invalid_method_descriptors {
		assert!(
			!MethodDescriptor::from(i).is_valid(),
			"{:?} is an invalid method desc", i
		);
	}

	Ok(())
}

#[test]
fn descriptor_building() -> Result<()> {
	let string = Type::object("java/lang/String");

	assert_eq!(string.descriptor(), "Ljava/lang/String;");
	assert_eq!(Type::Array(2, ArrayType::object("java/lang/String")).descriptor(), "[[Ljava/lang/String;");
	assert_eq!(
		MethodDescriptor::from_types(Some(&string), &[string.clone(), Type::Array(1, ArrayType::I)]),
		"(Ljava/lang/String;[I)Ljava/lang/String;"
	);

	let parsed = MethodDescriptor::from("(JLjava/lang/String;)V").parse()?;
	assert_eq!(parsed.parameter_descriptors, vec![Type::J, string]);
	assert_eq!(parsed.write(), "(JLjava/lang/String;)V");

	Ok(())
}
