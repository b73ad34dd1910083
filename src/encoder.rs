use anyhow::Result;
use jite_tree::class::ClassNode;

/// Turns a class node into the bytes of a class file.
///
/// This is where the `max_stack`, `max_locals` and the stack map frames get computed, and where missing labels or
/// unregistered locals make the class get rejected.
///
/// Any closure taking a [`ClassNode`] can be used as an encoder:
/// ```
/// use jitescript::{JdkVersion, JiteClass};
/// use jite_tree::class::ClassNode;
///
/// # fn main() -> anyhow::Result<()> {
/// let encoder = |node: &ClassNode| anyhow::Ok(node.name.as_java_str().as_bytes().to_vec());
///
/// let class = JiteClass::new("org/example/Empty")?;
/// assert_eq!(class.to_bytes(JdkVersion::V1_6, &encoder)?, b"org/example/Empty");
/// # Ok(())
/// # }
/// ```
pub trait ClassEncoder {
	fn encode(&self, class: &ClassNode) -> Result<Vec<u8>>;
}

impl<F> ClassEncoder for F
	where F: Fn(&ClassNode) -> Result<Vec<u8>>
{
	fn encode(&self, class: &ClassNode) -> Result<Vec<u8>> {
		self(class)
	}
}
