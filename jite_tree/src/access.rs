//! The raw access flag bits, for building up an access bitmask by `|`ing them together.
//!
//! The `*Access` structs ([`crate::class::ClassAccess`], [`crate::method::MethodAccess`], ...) convert
//! from and into such a bitmask.

pub const ACC_PUBLIC: u16       = 0x0001; // class, field, method, inner class
pub const ACC_PRIVATE: u16      = 0x0002; // field, method, inner class
pub const ACC_PROTECTED: u16    = 0x0004; // field, method, inner class
pub const ACC_STATIC: u16       = 0x0008; // field, method, inner class
pub const ACC_FINAL: u16        = 0x0010; // class, field, method, inner class
pub const ACC_SUPER: u16        = 0x0020; // class
pub const ACC_SYNCHRONIZED: u16 = 0x0020; // method
pub const ACC_VOLATILE: u16     = 0x0040; // field
pub const ACC_BRIDGE: u16       = 0x0040; // method
pub const ACC_TRANSIENT: u16    = 0x0080; // field
pub const ACC_VARARGS: u16      = 0x0080; // method
pub const ACC_NATIVE: u16       = 0x0100; // method
pub const ACC_INTERFACE: u16    = 0x0200; // class, inner class
pub const ACC_ABSTRACT: u16     = 0x0400; // class, method, inner class
pub const ACC_STRICT: u16       = 0x0800; // method
pub const ACC_SYNTHETIC: u16    = 0x1000; // class, field, method, inner class
pub const ACC_ANNOTATION: u16   = 0x2000; // class, inner class
pub const ACC_ENUM: u16         = 0x4000; // class, field, inner class
