use std::sync::atomic::{AtomicU64, Ordering};
use anyhow::bail;
use java_string::JavaString;
use crate::class::ClassName;
use crate::field::{FieldDescriptor, FieldRef};
use crate::macros::make_name_type;
use crate::method::{MethodDescriptor, MethodName, MethodRef};

/// Represents the code of a method.
///
/// The maximum stack size, the maximum number of locals and the stack map frames (apart from the ones explicitly
/// given as [`Instruction::Frame`]) are left for the encoder to compute.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Code {
	pub instructions: Vec<Instruction>,
	pub exception_table: Vec<Exception>,
	pub local_variables: Vec<Lv>,
}

/// An entry of the exception table.
///
/// A `catch` of [`None`] catches everything, which is what a `finally` block compiles to.
#[derive(Debug, Clone, PartialEq)]
pub struct Exception {
	pub start: Label,
	pub end: Label,
	pub handler: Label,
	pub catch: Option<ClassName>,
}

/// An entry of the `LocalVariableTable` (or `LocalVariableTypeTable` if there's a signature) attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Lv {
	pub range: LabelRange,
	pub name: LocalVariableName,
	pub descriptor: FieldDescriptor,
	pub signature: Option<String>,
	/// The index of the local variable.
	///
	/// If the local variable is of type `double` or `long`, it also occupies `index + 1`.
	pub index: u16,
}

make_name_type!(
	/// The name of a local variable, for the debug information.
	pub LocalVariableName;
	check_valid(s) = if crate::names::is_valid_unqualified_name(s) {
		Ok(())
	} else {
		bail!("invalid local variable name {s:?}: must be non-empty and not contain any of `.`, `;`, `[` and `/`")
	};
);

static NEXT_LABEL_ID: AtomicU64 = AtomicU64::new(0);

/// Represents a position in the code of a method.
///
/// A label is created first and inserted with [`Instruction::Label`] later, jumps may refer to it before it's inserted.
///
/// Each call to [`Label::new`] gives a label that's different from all others ever created in this process. This means
/// that two instruction lists can be concatenated without their labels ever getting mixed up.
///
/// ```
/// use jite_tree::method::code::Label;
///
/// let a = Label::new();
/// let b = Label::new();
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
	id: u64,
}

impl Label {
	#[allow(clippy::new_without_default)]
	pub fn new() -> Label {
		Label { id: NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed) }
	}
}

/// Represents a range of code.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRange {
	/// The start label, inclusive.
	pub start: Label,
	/// The end label, exclusive.
	pub end: Label,
}

/// Represents an instruction of the JVM, or one of the entries that only mark a position in the code.
///
/// Each instruction can either:
/// - hold no additional data, like [`Instruction::Nop`],
/// - hold some immediate value, like [`Instruction::BiPush`],
/// - hold a local variable index, like [`Instruction::ILoad`] (note that this also represents the `iload_0` instruction for example),
/// - hold a [`Label`] for jumps, like [`Instruction::IfEq`],
/// - or hold other data the instruction needs.
///
/// The entries [`Instruction::Label`], [`Instruction::LineNumber`] and [`Instruction::Frame`] aren't instructions but
/// mark a position, so that they don't take up space in the code.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
	Label(Label),
	LineNumber(u16, Label),
	Frame(Frame),

	Nop,
	AConstNull,
	IConstM1, IConst0, IConst1, IConst2, IConst3, IConst4, IConst5,
	LConst0, LConst1,
	FConst0, FConst1, FConst2,
	DConst0, DConst1,
	BiPush(i8),
	SiPush(i16),
	Ldc(Loadable),
	ILoad(u16), LLoad(u16), FLoad(u16), DLoad(u16), ALoad(u16),
	IALoad, LALoad, FALoad, DALoad, AALoad, BALoad, CALoad, SALoad,
	IStore(u16), LStore(u16), FStore(u16), DStore(u16), AStore(u16),
	IAStore, LAStore, FAStore, DAStore, AAStore, BAStore, CAStore, SAStore,
	Pop, Pop2,
	Dup, DupX1, DupX2,
	Dup2, Dup2X1, Dup2X2,
	Swap,
	IAdd, LAdd, FAdd, DAdd,
	ISub, LSub, FSub, DSub,
	IMul, LMul, FMul, DMul,
	IDiv, LDiv, FDiv, DDiv,
	IRem, LRem, FRem, DRem,
	INeg, LNeg, FNeg, DNeg,
	IShl, LShl,
	IShr, LShr,
	IUShr, LUShr,
	IAnd, LAnd,
	IOr, LOr,
	IXor, LXor,
	IInc(u16, i16),
	I2L, I2F, I2D,
	L2I, L2F, L2D,
	F2I, F2L, F2D,
	D2I, D2L, D2F,
	I2B, I2C, I2S,
	LCmp,
	FCmpL, FCmpG,
	DCmpL, DCmpG,
	IfEq(Label), IfNe(Label), IfLt(Label), IfGe(Label), IfGt(Label), IfLe(Label),
	IfICmpEq(Label), IfICmpNe(Label), IfICmpLt(Label), IfICmpGe(Label), IfICmpGt(Label), IfICmpLe(Label),
	IfACmpEq(Label), IfACmpNe(Label),
	Goto(Label),
	Jsr(Label),
	Ret(u16),
	TableSwitch {
		default: Label,
		low: i32,
		high: i32,
		table: Vec<Label>,
	},
	LookupSwitch {
		default: Label,
		/// Note that these must be ordered.
		pairs: Vec<(i32, Label)>
	},
	IReturn, LReturn, FReturn, DReturn, AReturn,
	Return,
	GetStatic(FieldRef),
	PutStatic(FieldRef),
	GetField(FieldRef),
	PutField(FieldRef),
	InvokeVirtual(MethodRef),
	/// The bool is `true` iff it's on an interface, so if it referenced an `InterfaceMethodRef` constant pool entry.
	InvokeSpecial(MethodRef, bool),
	/// The bool is `true` iff it's on an interface, so if it referenced an `InterfaceMethodRef` constant pool entry.
	InvokeStatic(MethodRef, bool),
	/// `invokeinterface` always uses an `InterfaceMethodRef` constant pool entry.
	InvokeInterface(MethodRef),
	InvokeDynamic(InvokeDynamic),
	New(ClassName),
	NewArray(ArrayType),
	ANewArray(ClassName),
	ArrayLength,
	AThrow,
	CheckCast(ClassName),
	InstanceOf(ClassName),
	MonitorEnter, MonitorExit,
	MultiANewArray(ClassName, u8),
	IfNull(Label), IfNonNull(Label),
}

impl Instruction {
	/// Returns the opcode of the instruction, or [`None`] for the entries that only mark a position.
	///
	/// Local variable instructions give the general form (`iload`, not `iload_0`), and [`Instruction::Ldc`] gives
	/// `ldc` even if the encoder later has to use `ldc_w` or `ldc2_w`.
	pub fn opcode(&self) -> Option<u8> {
		use Instruction::*;
		Some(match self {
			Instruction::Label(_) | LineNumber(..) | Instruction::Frame(_) => return None,
			Nop => 0x00,
			AConstNull => 0x01,
			IConstM1 => 0x02, IConst0 => 0x03, IConst1 => 0x04, IConst2 => 0x05, IConst3 => 0x06, IConst4 => 0x07, IConst5 => 0x08,
			LConst0 => 0x09, LConst1 => 0x0a,
			FConst0 => 0x0b, FConst1 => 0x0c, FConst2 => 0x0d,
			DConst0 => 0x0e, DConst1 => 0x0f,
			BiPush(_) => 0x10,
			SiPush(_) => 0x11,
			Ldc(_) => 0x12,
			ILoad(_) => 0x15, LLoad(_) => 0x16, FLoad(_) => 0x17, DLoad(_) => 0x18, ALoad(_) => 0x19,
			IALoad => 0x2e, LALoad => 0x2f, FALoad => 0x30, DALoad => 0x31, AALoad => 0x32, BALoad => 0x33, CALoad => 0x34, SALoad => 0x35,
			IStore(_) => 0x36, LStore(_) => 0x37, FStore(_) => 0x38, DStore(_) => 0x39, AStore(_) => 0x3a,
			IAStore => 0x4f, LAStore => 0x50, FAStore => 0x51, DAStore => 0x52, AAStore => 0x53, BAStore => 0x54, CAStore => 0x55, SAStore => 0x56,
			Pop => 0x57, Pop2 => 0x58,
			Dup => 0x59, DupX1 => 0x5a, DupX2 => 0x5b,
			Dup2 => 0x5c, Dup2X1 => 0x5d, Dup2X2 => 0x5e,
			Swap => 0x5f,
			IAdd => 0x60, LAdd => 0x61, FAdd => 0x62, DAdd => 0x63,
			ISub => 0x64, LSub => 0x65, FSub => 0x66, DSub => 0x67,
			IMul => 0x68, LMul => 0x69, FMul => 0x6a, DMul => 0x6b,
			IDiv => 0x6c, LDiv => 0x6d, FDiv => 0x6e, DDiv => 0x6f,
			IRem => 0x70, LRem => 0x71, FRem => 0x72, DRem => 0x73,
			INeg => 0x74, LNeg => 0x75, FNeg => 0x76, DNeg => 0x77,
			IShl => 0x78, LShl => 0x79,
			IShr => 0x7a, LShr => 0x7b,
			IUShr => 0x7c, LUShr => 0x7d,
			IAnd => 0x7e, LAnd => 0x7f,
			IOr => 0x80, LOr => 0x81,
			IXor => 0x82, LXor => 0x83,
			IInc(..) => 0x84,
			I2L => 0x85, I2F => 0x86, I2D => 0x87,
			L2I => 0x88, L2F => 0x89, L2D => 0x8a,
			F2I => 0x8b, F2L => 0x8c, F2D => 0x8d,
			D2I => 0x8e, D2L => 0x8f, D2F => 0x90,
			I2B => 0x91, I2C => 0x92, I2S => 0x93,
			LCmp => 0x94,
			FCmpL => 0x95, FCmpG => 0x96,
			DCmpL => 0x97, DCmpG => 0x98,
			IfEq(_) => 0x99, IfNe(_) => 0x9a, IfLt(_) => 0x9b, IfGe(_) => 0x9c, IfGt(_) => 0x9d, IfLe(_) => 0x9e,
			IfICmpEq(_) => 0x9f, IfICmpNe(_) => 0xa0, IfICmpLt(_) => 0xa1, IfICmpGe(_) => 0xa2, IfICmpGt(_) => 0xa3, IfICmpLe(_) => 0xa4,
			IfACmpEq(_) => 0xa5, IfACmpNe(_) => 0xa6,
			Goto(_) => 0xa7,
			Jsr(_) => 0xa8,
			Ret(_) => 0xa9,
			TableSwitch { .. } => 0xaa,
			LookupSwitch { .. } => 0xab,
			IReturn => 0xac, LReturn => 0xad, FReturn => 0xae, DReturn => 0xaf, AReturn => 0xb0,
			Return => 0xb1,
			GetStatic(_) => 0xb2,
			PutStatic(_) => 0xb3,
			GetField(_) => 0xb4,
			PutField(_) => 0xb5,
			InvokeVirtual(_) => 0xb6,
			InvokeSpecial(..) => 0xb7,
			InvokeStatic(..) => 0xb8,
			InvokeInterface(_) => 0xb9,
			Instruction::InvokeDynamic(_) => 0xba,
			New(_) => 0xbb,
			NewArray(_) => 0xbc,
			ANewArray(_) => 0xbd,
			ArrayLength => 0xbe,
			AThrow => 0xbf,
			CheckCast(_) => 0xc0,
			InstanceOf(_) => 0xc1,
			MonitorEnter => 0xc2, MonitorExit => 0xc3,
			MultiANewArray(..) => 0xc5,
			IfNull(_) => 0xc6, IfNonNull(_) => 0xc7,
		})
	}

	/// Returns all the labels this entry refers to, not counting the label an [`Instruction::Label`] inserts.
	pub fn referenced_labels(&self) -> Vec<Label> {
		use Instruction::*;
		match self {
			LineNumber(_, label) => vec![*label],
			IfEq(label) | IfNe(label) | IfLt(label) | IfGe(label) | IfGt(label) | IfLe(label) |
			IfICmpEq(label) | IfICmpNe(label) | IfICmpLt(label) | IfICmpGe(label) | IfICmpGt(label) | IfICmpLe(label) |
			IfACmpEq(label) | IfACmpNe(label) |
			Goto(label) | Jsr(label) |
			IfNull(label) | IfNonNull(label) => vec![*label],
			TableSwitch { default, table, .. } => {
				let mut labels = vec![*default];
				labels.extend(table.iter().copied());
				labels
			},
			LookupSwitch { default, pairs } => {
				let mut labels = vec![*default];
				labels.extend(pairs.iter().map(|(_, label)| *label));
				labels
			},
			_ => Vec::new(),
		}
	}
}

/// A constant that can be loaded onto the stack with `ldc`, or be given as an argument to a bootstrap method.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	Class(ClassName),
	String(JavaString),
	MethodHandle(Handle),
	MethodType(MethodDescriptor),
}

impl From<i32> for Loadable {
	fn from(value: i32) -> Self {
		Loadable::Integer(value)
	}
}
impl From<f32> for Loadable {
	fn from(value: f32) -> Self {
		Loadable::Float(value)
	}
}
impl From<i64> for Loadable {
	fn from(value: i64) -> Self {
		Loadable::Long(value)
	}
}
impl From<f64> for Loadable {
	fn from(value: f64) -> Self {
		Loadable::Double(value)
	}
}
impl From<&str> for Loadable {
	fn from(value: &str) -> Self {
		Loadable::String(JavaString::from(value))
	}
}
impl From<String> for Loadable {
	fn from(value: String) -> Self {
		Loadable::String(JavaString::from(value))
	}
}
impl From<JavaString> for Loadable {
	fn from(value: JavaString) -> Self {
		Loadable::String(value)
	}
}
impl From<ClassName> for Loadable {
	fn from(value: ClassName) -> Self {
		Loadable::Class(value)
	}
}
impl From<Handle> for Loadable {
	fn from(value: Handle) -> Self {
		Loadable::MethodHandle(value)
	}
}
impl From<MethodDescriptor> for Loadable {
	fn from(value: MethodDescriptor) -> Self {
		Loadable::MethodType(value)
	}
}

/// A method handle, tagged with its reference kind.
///
/// The bool of [`Handle::InvokeStatic`] and [`Handle::InvokeSpecial`] is `true` iff the method is on an interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
	GetField(FieldRef),
	GetStatic(FieldRef),
	PutField(FieldRef),
	PutStatic(FieldRef),
	InvokeVirtual(MethodRef),
	InvokeStatic(MethodRef, bool),
	InvokeSpecial(MethodRef, bool),
	NewInvokeSpecial(MethodRef),
	InvokeInterface(MethodRef),
}

impl Handle {
	/// Returns the `reference_kind` item of the `CONSTANT_MethodHandle_info` structure.
	pub fn reference_kind(&self) -> u8 {
		match self {
			Handle::GetField(_) => 1,
			Handle::GetStatic(_) => 2,
			Handle::PutField(_) => 3,
			Handle::PutStatic(_) => 4,
			Handle::InvokeVirtual(_) => 5,
			Handle::InvokeStatic(..) => 6,
			Handle::InvokeSpecial(..) => 7,
			Handle::NewInvokeSpecial(_) => 8,
			Handle::InvokeInterface(_) => 9,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeDynamic {
	pub name: MethodName,
	pub descriptor: MethodDescriptor,
	pub handle: Handle,
	pub arguments: Vec<Loadable>,
}

/// The element type of a primitive array created by `newarray`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArrayType {
	Boolean,
	Char,
	Float,
	Double,
	Byte,
	Short,
	Int,
	Long,
}

impl ArrayType {
	/// Returns the `atype` operand of the `newarray` instruction.
	pub fn atype(&self) -> u8 {
		match self {
			ArrayType::Boolean => 4,
			ArrayType::Char    => 5,
			ArrayType::Float   => 6,
			ArrayType::Double  => 7,
			ArrayType::Byte    => 8,
			ArrayType::Short   => 9,
			ArrayType::Int     => 10,
			ArrayType::Long    => 11,
		}
	}
}

/// An explicitly given stack map frame.
///
/// The locals and the stack are only given for the kinds that need them, for [`FrameKind::Chop`] the `locals` hold
/// the removed locals.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
	pub kind: FrameKind,
	pub locals: Vec<FrameType>,
	pub stack: Vec<FrameType>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameKind {
	/// An expanded frame.
	New,
	Full,
	Append,
	Chop,
	Same,
	Same1,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameType {
	Top,
	Integer,
	Float,
	Double,
	Long,
	Null,
	UninitializedThis,
	Object(ClassName),
	/// The value created by the `new` instruction directly after the label.
	Uninitialized(Label),
}
