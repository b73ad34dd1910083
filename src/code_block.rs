use anyhow::Result;
use indexmap::IndexSet;
use log::warn;
use jite_tree::class::ClassName;
use jite_tree::field::{FieldDescriptor, FieldName, FieldRef};
use jite_tree::method::code::{ArrayType, Exception, Frame, FrameKind, FrameType, Handle, Instruction, InvokeDynamic, Label, LabelRange, Loadable, Lv};
use jite_tree::method::{MethodDescriptor, MethodName, MethodRef};
use crate::annotation::VisibleAnnotation;

/// An instruction list, together with the exception table and local variable debug information for it.
///
/// All the instruction emitting methods return `&mut Self`, so that calls can be chained:
/// ```
/// use jitescript::CodeBlock;
///
/// let mut code = CodeBlock::with_arity(1);
/// code.aload(0)
///     .invokevirtual("java/lang/Object", "toString", "()Ljava/lang/String;")
///     .areturn();
/// assert_eq!(code.instructions().len(), 3);
/// ```
///
/// Nothing is checked when emitting instructions: jumps to labels that never get inserted or an unbalanced stack are
/// only found by the encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBlock {
	instructions: Vec<Instruction>,
	try_catch_blocks: Vec<Exception>,
	local_variable_entries: Vec<Lv>,
	/// The names of the locals created with [`CodeBlock::push_local_var`], the position is the slot after the arguments.
	local_variables: IndexSet<String>,
	arity: u16,
	returns: bool,
	annotations: Vec<VisibleAnnotation>,
}

macro_rules! no_operand {
	($( $name:ident => $insn:ident ),* $(,)?) => {
		$(
			#[doc = concat!("Emits `", stringify!($name), "`.")]
			pub fn $name(&mut self) -> &mut Self {
				self.instruction(Instruction::$insn)
			}
		)*
	}
}

macro_rules! local_variable {
	($( $name:ident => $insn:ident ),* $(,)?) => {
		$(
			#[doc = concat!("Emits `", stringify!($name), "` of the given local variable slot.")]
			pub fn $name(&mut self, slot: u16) -> &mut Self {
				self.instruction(Instruction::$insn(slot))
			}
		)*
	}
}

macro_rules! jump {
	($( $name:ident => $insn:ident ),* $(,)?) => {
		$(
			#[doc = concat!("Emits `", stringify!($name), "` jumping to the given label.")]
			pub fn $name(&mut self, label: Label) -> &mut Self {
				self.instruction(Instruction::$insn(label))
			}
		)*
	}
}

impl CodeBlock {
	pub fn new() -> CodeBlock {
		CodeBlock::default()
	}

	/// Creates an empty code block for a method taking up `arity` local variable slots with its arguments (including
	/// `this` for non-static methods).
	///
	/// The named locals of [`CodeBlock::push_local_var`] are placed after these.
	pub fn with_arity(arity: u16) -> CodeBlock {
		CodeBlock {
			arity,
			..CodeBlock::default()
		}
	}

	/// Creates a copy of another code block, taking over its instructions, its arity and its named locals.
	pub fn copy_of(other: &CodeBlock) -> CodeBlock {
		let mut code = CodeBlock::with_arity(other.arity);
		code.local_variables = other.local_variables.clone();
		code.prepend(other);
		code
	}

	/// Creates a code block and fills it using the given closure.
	///
	/// ```
	/// use jitescript::CodeBlock;
	///
	/// let code = CodeBlock::build(|code| {
	///     code.ldc("Hello, World!").areturn();
	/// });
	/// assert!(code.returns());
	/// ```
	pub fn build(f: impl FnOnce(&mut CodeBlock)) -> CodeBlock {
		CodeBlock::build_with_arity(0, f)
	}

	/// Creates a code block with the given arity and fills it using the given closure.
	pub fn build_with_arity(arity: u16, f: impl FnOnce(&mut CodeBlock)) -> CodeBlock {
		let mut code = CodeBlock::with_arity(arity);
		f(&mut code);
		code
	}

	/// Appends an arbitrary instruction (or label, line number or frame).
	pub fn instruction(&mut self, instruction: Instruction) -> &mut Self {
		self.instructions.push(instruction);
		self
	}

	pub fn instructions(&self) -> &[Instruction] {
		&self.instructions
	}

	pub fn try_catch_blocks(&self) -> &[Exception] {
		&self.try_catch_blocks
	}

	pub fn local_variable_entries(&self) -> &[Lv] {
		&self.local_variable_entries
	}

	/// Returns the names of the locals created by [`CodeBlock::push_local_var`], in the order of their slots.
	pub fn local_variables(&self) -> impl Iterator<Item=&str> + '_ {
		self.local_variables.iter().map(String::as_str)
	}

	pub fn arity(&self) -> u16 {
		self.arity
	}

	/// Returns whether [`CodeBlock::areturn`] was ever called on this code block.
	pub fn returns(&self) -> bool {
		self.returns
	}

	pub fn annotations(&self) -> &[VisibleAnnotation] {
		&self.annotations
	}

	pub fn is_empty(&self) -> bool {
		self.instructions.is_empty()
	}

	// local variables

	local_variable! {
		aload => ALoad,
		iload => ILoad,
		lload => LLoad,
		fload => FLoad,
		dload => DLoad,
		astore => AStore,
		istore => IStore,
		lstore => LStore,
		fstore => FStore,
		dstore => DStore,
		ret => Ret,
	}

	/// Emits an `aload` for each of the given slots, in order.
	pub fn aload_many(&mut self, slots: &[u16]) -> &mut Self {
		for &slot in slots {
			self.aload(slot);
		}
		self
	}

	pub fn iinc(&mut self, slot: u16, increment: i16) -> &mut Self {
		self.instruction(Instruction::IInc(slot, increment))
	}

	/// Stores the reference on top of the stack into the local with the given name.
	///
	/// The first time a name is used it gets the next free slot after the arguments, later uses reuse that slot.
	pub fn push_local_var(&mut self, name: &str) -> &mut Self {
		let (index, _) = self.local_variables.insert_full(name.to_owned());
		let slot = self.named_local_slot(index);
		self.astore(slot)
	}

	/// Loads the reference from the local with the given name, which must have been created with
	/// [`CodeBlock::push_local_var`] before.
	///
	/// Using a name that was never pushed loads from the slot `u16::MAX`, which the encoder rejects.
	pub fn pop_local_var(&mut self, name: &str) -> &mut Self {
		let slot = match self.local_variables.get_index_of(name) {
			Some(index) => self.named_local_slot(index),
			None => {
				warn!("local variable {name:?} was never pushed, emitting a load of slot {}", u16::MAX);
				u16::MAX
			},
		};
		self.aload(slot)
	}

	fn named_local_slot(&self, index: usize) -> u16 {
		u16::try_from(index).ok()
			.and_then(|index| self.arity.checked_add(index))
			.unwrap_or(u16::MAX)
	}

	// constants

	no_operand! {
		aconst_null => AConstNull,
		iconst_m1 => IConstM1,
		iconst_0 => IConst0,
		iconst_1 => IConst1,
		iconst_2 => IConst2,
		iconst_3 => IConst3,
		iconst_4 => IConst4,
		iconst_5 => IConst5,
		lconst_0 => LConst0,
		lconst_1 => LConst1,
		fconst_0 => FConst0,
		fconst_1 => FConst1,
		fconst_2 => FConst2,
		dconst_0 => DConst0,
		dconst_1 => DConst1,
	}

	pub fn bipush(&mut self, value: i8) -> &mut Self {
		self.instruction(Instruction::BiPush(value))
	}

	pub fn sipush(&mut self, value: i16) -> &mut Self {
		self.instruction(Instruction::SiPush(value))
	}

	/// Loads a constant, like an `int`, a `String` or a [`ClassName`] (for a class literal).
	pub fn ldc(&mut self, value: impl Into<Loadable>) -> &mut Self {
		self.instruction(Instruction::Ldc(value.into()))
	}

	/// Pushes an `int` using the shortest instruction for it.
	///
	/// This is `iconst_<n>` for `-1..=5`, `bipush` for values fitting in a byte, `sipush` for ones fitting in a
	/// short, and `ldc` for everything else.
	pub fn push_int(&mut self, value: i32) -> &mut Self {
		let instruction = match value {
			-1 => Instruction::IConstM1,
			0 => Instruction::IConst0,
			1 => Instruction::IConst1,
			2 => Instruction::IConst2,
			3 => Instruction::IConst3,
			4 => Instruction::IConst4,
			5 => Instruction::IConst5,
			_ => if let Ok(value) = i8::try_from(value) {
				Instruction::BiPush(value)
			} else if let Ok(value) = i16::try_from(value) {
				Instruction::SiPush(value)
			} else {
				Instruction::Ldc(Loadable::Integer(value))
			},
		};
		self.instruction(instruction)
	}

	pub fn push_boolean(&mut self, value: bool) -> &mut Self {
		if value {
			self.iconst_1()
		} else {
			self.iconst_0()
		}
	}

	// stack

	no_operand! {
		nop => Nop,
		pop => Pop,
		pop2 => Pop2,
		dup => Dup,
		dup_x1 => DupX1,
		dup_x2 => DupX2,
		dup2 => Dup2,
		dup2_x1 => Dup2X1,
		dup2_x2 => Dup2X2,
		swap => Swap,
	}

	/// Swaps the two two-slot values (`long`s or `double`s) on top of the stack.
	pub fn swap2(&mut self) -> &mut Self {
		self.dup2_x2().pop2()
	}

	// math

	no_operand! {
		iadd => IAdd, ladd => LAdd, fadd => FAdd, dadd => DAdd,
		isub => ISub, lsub => LSub, fsub => FSub, dsub => DSub,
		imul => IMul, lmul => LMul, fmul => FMul, dmul => DMul,
		idiv => IDiv, ldiv => LDiv, fdiv => FDiv, ddiv => DDiv,
		irem => IRem, lrem => LRem, frem => FRem, drem => DRem,
		ineg => INeg, lneg => LNeg, fneg => FNeg, dneg => DNeg,
		ishl => IShl, lshl => LShl,
		ishr => IShr, lshr => LShr,
		iushr => IUShr, lushr => LUShr,
		iand => IAnd, land => LAnd,
		ior => IOr, lor => LOr,
		ixor => IXor, lxor => LXor,
	}

	// conversions and comparisons

	no_operand! {
		i2l => I2L, i2f => I2F, i2d => I2D,
		l2i => L2I, l2f => L2F, l2d => L2D,
		f2i => F2I, f2l => F2L, f2d => F2D,
		d2i => D2I, d2l => D2L, d2f => D2F,
		i2b => I2B, i2c => I2C, i2s => I2S,
		lcmp => LCmp,
		fcmpl => FCmpL, fcmpg => FCmpG,
		dcmpl => DCmpL, dcmpg => DCmpG,
	}

	// arrays

	no_operand! {
		arraylength => ArrayLength,
		iaload => IALoad, laload => LALoad, faload => FALoad, daload => DALoad,
		aaload => AALoad, baload => BALoad, caload => CALoad, saload => SALoad,
		iastore => IAStore, lastore => LAStore, fastore => FAStore, dastore => DAStore,
		aastore => AAStore, bastore => BAStore, castore => CAStore, sastore => SAStore,
		arrayload => AALoad,
		arraystore => AAStore,
		iarrayload => IALoad,
		barrayload => BALoad,
		barraystore => BAStore,
	}

	/// Creates a new array of a primitive type.
	pub fn newarray(&mut self, array_type: ArrayType) -> &mut Self {
		self.instruction(Instruction::NewArray(array_type))
	}

	/// Creates a new array of references, the class name is the one of the elements.
	pub fn anewarray(&mut self, class: impl Into<ClassName>) -> &mut Self {
		self.instruction(Instruction::ANewArray(class.into()))
	}

	/// Creates a new multidimensional array, the class name is the one of the array, like `[[I`.
	pub fn multianewarray(&mut self, class: impl Into<ClassName>, dimensions: u8) -> &mut Self {
		self.instruction(Instruction::MultiANewArray(class.into(), dimensions))
	}

	// objects

	/// Emits `new`.
	pub fn newobj(&mut self, class: impl Into<ClassName>) -> &mut Self {
		self.instruction(Instruction::New(class.into()))
	}

	pub fn checkcast(&mut self, class: impl Into<ClassName>) -> &mut Self {
		self.instruction(Instruction::CheckCast(class.into()))
	}

	/// Emits `instanceof`.
	pub fn instance_of(&mut self, class: impl Into<ClassName>) -> &mut Self {
		self.instruction(Instruction::InstanceOf(class.into()))
	}

	no_operand! {
		athrow => AThrow,
		monitorenter => MonitorEnter,
		monitorexit => MonitorExit,
	}

	// fields

	pub fn getstatic(&mut self, class: impl Into<ClassName>, name: impl Into<FieldName>, desc: impl Into<FieldDescriptor>) -> &mut Self {
		self.instruction(Instruction::GetStatic(field_ref(class, name, desc)))
	}

	pub fn putstatic(&mut self, class: impl Into<ClassName>, name: impl Into<FieldName>, desc: impl Into<FieldDescriptor>) -> &mut Self {
		self.instruction(Instruction::PutStatic(field_ref(class, name, desc)))
	}

	pub fn getfield(&mut self, class: impl Into<ClassName>, name: impl Into<FieldName>, desc: impl Into<FieldDescriptor>) -> &mut Self {
		self.instruction(Instruction::GetField(field_ref(class, name, desc)))
	}

	pub fn putfield(&mut self, class: impl Into<ClassName>, name: impl Into<FieldName>, desc: impl Into<FieldDescriptor>) -> &mut Self {
		self.instruction(Instruction::PutField(field_ref(class, name, desc)))
	}

	// methods

	pub fn invokestatic(&mut self, class: impl Into<ClassName>, name: impl Into<MethodName>, desc: impl Into<MethodDescriptor>) -> &mut Self {
		self.instruction(Instruction::InvokeStatic(method_ref(class, name, desc), false))
	}

	pub fn invokespecial(&mut self, class: impl Into<ClassName>, name: impl Into<MethodName>, desc: impl Into<MethodDescriptor>) -> &mut Self {
		self.instruction(Instruction::InvokeSpecial(method_ref(class, name, desc), false))
	}

	pub fn invokevirtual(&mut self, class: impl Into<ClassName>, name: impl Into<MethodName>, desc: impl Into<MethodDescriptor>) -> &mut Self {
		self.instruction(Instruction::InvokeVirtual(method_ref(class, name, desc)))
	}

	pub fn invokeinterface(&mut self, class: impl Into<ClassName>, name: impl Into<MethodName>, desc: impl Into<MethodDescriptor>) -> &mut Self {
		self.instruction(Instruction::InvokeInterface(method_ref(class, name, desc)))
	}

	/// Emits an `invokedynamic` call site, bootstrapped by the method `bootstrap` with the given static arguments.
	pub fn invokedynamic(
		&mut self,
		name: impl Into<MethodName>,
		desc: impl Into<MethodDescriptor>,
		bootstrap: Handle,
		arguments: impl IntoIterator<Item = Loadable>,
	) -> &mut Self {
		self.instruction(Instruction::InvokeDynamic(InvokeDynamic {
			name: name.into(),
			descriptor: desc.into(),
			handle: bootstrap,
			arguments: arguments.into_iter().collect(),
		}))
	}

	// returns

	/// Emits `areturn`, and remembers that this code block [returns][CodeBlock::returns] a value.
	pub fn areturn(&mut self) -> &mut Self {
		self.returns = true;
		self.instruction(Instruction::AReturn)
	}

	no_operand! {
		ireturn => IReturn,
		lreturn => LReturn,
		freturn => FReturn,
		dreturn => DReturn,
		voidreturn => Return,
	}

	// control flow

	/// Inserts the label at the current position.
	pub fn label(&mut self, label: Label) -> &mut Self {
		self.instruction(Instruction::Label(label))
	}

	jump! {
		go_to => Goto,
		jsr => Jsr,
		ifeq => IfEq,
		ifne => IfNe,
		iflt => IfLt,
		ifge => IfGe,
		ifgt => IfGt,
		ifle => IfLe,
		iffalse => IfEq,
		iftrue => IfNe,
		if_icmpeq => IfICmpEq,
		if_icmpne => IfICmpNe,
		if_icmplt => IfICmpLt,
		if_icmpge => IfICmpGe,
		if_icmpgt => IfICmpGt,
		if_icmple => IfICmpLe,
		if_acmpeq => IfACmpEq,
		if_acmpne => IfACmpNe,
		ifnull => IfNull,
		ifnonnull => IfNonNull,
	}

	/// Jumps to `cases[value - min]` if `min <= value <= max`, otherwise to `default`.
	pub fn tableswitch(&mut self, min: i32, max: i32, default: Label, cases: &[Label]) -> &mut Self {
		self.instruction(Instruction::TableSwitch {
			default,
			low: min,
			high: max,
			table: cases.to_vec(),
		})
	}

	/// Jumps to the label paired with the key equal to the value, or to `default` if there's none.
	///
	/// The keys must be given in increasing order.
	pub fn lookupswitch(&mut self, default: Label, pairs: impl IntoIterator<Item = (i32, Label)>) -> &mut Self {
		self.instruction(Instruction::LookupSwitch {
			default,
			pairs: pairs.into_iter().collect(),
		})
	}

	// exceptions

	/// Adds an entry to the exception table: if an exception of the given type (or any exception for [`None`]) is
	/// thrown between `start` (inclusive) and `end` (exclusive), jump to `handler`.
	pub fn try_catch_region(&mut self, start: Label, end: Label, handler: Label, exception_type: Option<&str>) -> &mut Self {
		self.try_catch_blocks.push(Exception {
			start,
			end,
			handler,
			catch: exception_type.map(ClassName::from),
		});
		self
	}

	/// Emits a `try`/`catch` construct.
	///
	/// The instructions emitted by `body` are covered by a new exception table entry for `exception_type` (or
	/// for all exceptions if [`None`]). On the normal path, execution jumps over the instructions of `catch_body`,
	/// which start with the caught exception on the stack.
	///
	/// ```
	/// use jitescript::CodeBlock;
	///
	/// let mut code = CodeBlock::new();
	/// code.trycatch(
	///     Some("java/lang/RuntimeException"),
	///     |code| { code.aconst_null().athrow(); },
	///     Some(|code: &mut CodeBlock| { code.pop(); }),
	/// );
	/// assert_eq!(code.try_catch_blocks().len(), 1);
	/// ```
	///
	/// Without a `catch_body` (pass `None::<fn(&mut CodeBlock)>`), the handler label of the exception table entry is
	/// never inserted, and the encoder will refuse the code.
	pub fn trycatch<B, C>(&mut self, exception_type: Option<&str>, body: B, catch_body: Option<C>) -> &mut Self
		where
			B: FnOnce(&mut CodeBlock),
			C: FnOnce(&mut CodeBlock),
	{
		let before = Label::new();
		let after = Label::new();
		let catch_start = Label::new();
		let done = Label::new();

		self.try_catch_region(before, after, catch_start, exception_type);
		self.label(before);
		body(&mut *self);
		self.label(after);
		self.go_to(done);
		if let Some(catch_body) = catch_body {
			self.label(catch_start);
			catch_body(&mut *self);
		}
		self.label(done)
	}

	// debugging

	/// Prints the object on top of the stack with `System.out.println`, leaving it on the stack.
	pub fn aprintln(&mut self) -> &mut Self {
		self.dup()
			.getstatic("java/lang/System", "out", "Ljava/io/PrintStream;")
			.swap()
			.invokevirtual("java/io/PrintStream", "println", "(Ljava/lang/Object;)V")
	}

	/// Prints the `int` on top of the stack with `System.out.println`, leaving it on the stack.
	pub fn iprintln(&mut self) -> &mut Self {
		self.dup()
			.getstatic("java/lang/System", "out", "Ljava/io/PrintStream;")
			.swap()
			.invokevirtual("java/io/PrintStream", "println", "(I)V")
	}

	/// Marks the current position as the start of the given source line.
	pub fn line(&mut self, line: u16) -> &mut Self {
		let label = Label::new();
		self.label(label);
		self.line_at(line, label)
	}

	/// Marks the position of an (already inserted, or later inserted) label as the start of the given source line.
	pub fn line_at(&mut self, line: u16, label: Label) -> &mut Self {
		self.instruction(Instruction::LineNumber(line, label))
	}

	/// Adds a local variable debug entry, saying that slot `index` holds the variable `name` from `start` to `end`.
	pub fn local_variable(&mut self, name: &str, desc: &str, start: Label, end: Label, index: u16) -> &mut Self {
		self.push_local_variable_entry(name, desc, None, start, end, index)
	}

	/// Like [`CodeBlock::local_variable`], but also giving the generic signature of the variable.
	pub fn local_variable_with_signature(&mut self, name: &str, desc: &str, signature: &str, start: Label, end: Label, index: u16) -> &mut Self {
		self.push_local_variable_entry(name, desc, Some(signature), start, end, index)
	}

	fn push_local_variable_entry(&mut self, name: &str, desc: &str, signature: Option<&str>, start: Label, end: Label, index: u16) -> &mut Self {
		self.local_variable_entries.push(Lv {
			range: LabelRange { start, end },
			name: name.into(),
			descriptor: desc.into(),
			signature: signature.map(str::to_owned),
			index,
		});
		self
	}

	/// Inserts an explicit stack map frame at the current position.
	pub fn frame(&mut self, kind: FrameKind, locals: Vec<FrameType>, stack: Vec<FrameType>) -> &mut Self {
		self.instruction(Instruction::Frame(Frame { kind, locals, stack }))
	}

	// composition

	/// Adds the instructions of the other code block after the ones of this code block.
	///
	/// The exception table entries and local variable entries of the other code block are taken over as well, the
	/// labels stay the same.
	pub fn append(&mut self, other: &CodeBlock) -> &mut Self {
		self.instructions.extend(other.instructions.iter().cloned());
		self.try_catch_blocks.extend(other.try_catch_blocks.iter().cloned());
		self.local_variable_entries.extend(other.local_variable_entries.iter().cloned());
		self
	}

	/// Adds the instructions of the other code block before the ones of this code block.
	///
	/// See [`CodeBlock::append`].
	pub fn prepend(&mut self, other: &CodeBlock) -> &mut Self {
		self.instructions.splice(0..0, other.instructions.iter().cloned());
		self.try_catch_blocks.splice(0..0, other.try_catch_blocks.iter().cloned());
		self.local_variable_entries.splice(0..0, other.local_variable_entries.iter().cloned());
		self
	}

	// annotations

	/// Adds an annotation to the method this code block ends up in.
	pub fn add_annotation(&mut self, annotation: VisibleAnnotation) -> &mut Self {
		self.annotations.push(annotation);
		self
	}

	/// Adds a new annotation to the method this code block ends up in, and returns it for adding element values.
	pub fn annotate(&mut self, desc: &str) -> Result<&mut VisibleAnnotation> {
		self.annotations.push(VisibleAnnotation::new(desc)?);
		let index = self.annotations.len() - 1;
		Ok(&mut self.annotations[index])
	}
}

fn field_ref(class: impl Into<ClassName>, name: impl Into<FieldName>, desc: impl Into<FieldDescriptor>) -> FieldRef {
	FieldRef {
		class: class.into(),
		name: name.into(),
		desc: desc.into(),
	}
}

fn method_ref(class: impl Into<ClassName>, name: impl Into<MethodName>, desc: impl Into<MethodDescriptor>) -> MethodRef {
	MethodRef {
		class: class.into(),
		name: name.into(),
		desc: desc.into(),
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use jite_tree::class::ClassName;
	use jite_tree::method::code::{Exception, Instruction, Label, Loadable};
	use crate::code_block::CodeBlock;

	fn push_int(value: i32) -> Instruction {
		let mut code = CodeBlock::new();
		code.push_int(value);
		assert_eq!(code.instructions().len(), 1);
		code.instructions()[0].clone()
	}

	#[test]
	fn push_int_small_constants() {
		assert_eq!(push_int(-1), Instruction::IConstM1);
		assert_eq!(push_int(0), Instruction::IConst0);
		assert_eq!(push_int(1), Instruction::IConst1);
		assert_eq!(push_int(2), Instruction::IConst2);
		assert_eq!(push_int(3), Instruction::IConst3);
		assert_eq!(push_int(4), Instruction::IConst4);
		assert_eq!(push_int(5), Instruction::IConst5);
	}

	#[test]
	fn push_int_byte_range() {
		for value in -128..=127 {
			let expected = match value {
				-1..=5 => continue,
				value => Instruction::BiPush(value as i8),
			};
			assert_eq!(push_int(value), expected, "for {value}");
		}
	}

	#[test]
	fn push_int_short_range() {
		for value in [-32768, -129, 128, 1000, 32767] {
			assert_eq!(push_int(value), Instruction::SiPush(value as i16), "for {value}");
		}
	}

	#[test]
	fn push_int_everything_else() {
		for value in [i32::MIN, -32769, 32768, 100_000, i32::MAX] {
			assert_eq!(push_int(value), Instruction::Ldc(Loadable::Integer(value)), "for {value}");
		}
	}

	#[test]
	fn push_boolean() {
		let mut code = CodeBlock::new();
		code.push_boolean(true).push_boolean(false);
		assert_eq!(code.instructions(), &[Instruction::IConst1, Instruction::IConst0]);
	}

	#[test]
	fn named_locals() {
		let mut code = CodeBlock::with_arity(2);
		code.push_local_var("foo")
			.pop_local_var("foo")
			.push_local_var("bar")
			.push_local_var("foo")
			.pop_local_var("bar");

		assert_eq!(code.instructions(), &[
			Instruction::AStore(2),
			Instruction::ALoad(2),
			Instruction::AStore(3),
			Instruction::AStore(2),
			Instruction::ALoad(3),
		]);
		assert_eq!(code.local_variables().collect::<Vec<_>>(), vec!["foo", "bar"]);
	}

	#[test]
	fn unknown_named_local() {
		let mut code = CodeBlock::with_arity(1);
		code.pop_local_var("nope");
		assert_eq!(code.instructions(), &[Instruction::ALoad(u16::MAX)]);
	}

	#[test]
	fn append_and_prepend() {
		let mut a = CodeBlock::new();
		a.iconst_1();
		let mut b = CodeBlock::new();
		b.iconst_2();

		let mut appended = a.clone();
		appended.append(&b);
		assert_eq!(appended.instructions(), &[Instruction::IConst1, Instruction::IConst2]);

		let mut prepended = a.clone();
		prepended.prepend(&b);
		assert_eq!(prepended.instructions(), &[Instruction::IConst2, Instruction::IConst1]);

		// the other block stays as it was
		assert_eq!(b.instructions(), &[Instruction::IConst2]);
	}

	/// A block guarding a `nop` against `exception_type`, with a local variable entry `variable` spanning all of it.
	fn guarded(exception_type: &str, variable: &str) -> CodeBlock {
		let start = Label::new();
		let end = Label::new();

		let mut code = CodeBlock::new();
		code.label(start)
			.trycatch(Some(exception_type), |code| { code.nop(); }, Some(|code: &mut CodeBlock| { code.pop(); }))
			.label(end)
			.local_variable(variable, "I", start, end, 0);
		code
	}

	fn catches(code: &CodeBlock) -> Vec<String> {
		code.try_catch_blocks().iter()
			.map(|exception| exception.catch.as_ref().map_or_else(String::new, |catch| catch.to_string()))
			.collect()
	}

	fn variables(code: &CodeBlock) -> Vec<String> {
		code.local_variable_entries().iter()
			.map(|lv| lv.name.to_string())
			.collect()
	}

	#[test]
	fn composition_takes_over_exception_table_and_local_variables() {
		let a = guarded("java/lang/Error", "a");
		let b = guarded("java/lang/Exception", "b");

		let mut appended = a.clone();
		appended.append(&b);
		assert_eq!(catches(&appended), vec!["java/lang/Error", "java/lang/Exception"]);
		assert_eq!(variables(&appended), vec!["a", "b"]);
		assert_eq!(appended.try_catch_blocks()[1], b.try_catch_blocks()[0]);
		assert_eq!(appended.instructions().len(), a.instructions().len() + b.instructions().len());

		let mut prepended = a.clone();
		prepended.prepend(&b);
		assert_eq!(catches(&prepended), vec!["java/lang/Exception", "java/lang/Error"]);
		assert_eq!(variables(&prepended), vec!["b", "a"]);
		assert_eq!(prepended.instructions()[..b.instructions().len()], *b.instructions());

		let copy = CodeBlock::copy_of(&appended);
		assert_eq!(copy.try_catch_blocks(), appended.try_catch_blocks());
		assert_eq!(copy.local_variable_entries(), appended.local_variable_entries());
		assert_eq!(copy.instructions(), appended.instructions());

		// the other blocks stay as they were
		assert_eq!(catches(&b), vec!["java/lang/Exception"]);
		assert_eq!(variables(&a), vec!["a"]);
	}

	#[test]
	fn copy_of() {
		let mut original = CodeBlock::with_arity(3);
		original.aload(0).push_local_var("x");

		let mut copy = CodeBlock::copy_of(&original);
		assert_eq!(copy.arity(), 3);
		assert_eq!(copy.instructions(), original.instructions());
		assert_eq!(copy.local_variables().collect::<Vec<_>>(), vec!["x"]);

		copy.pop_local_var("x").push_local_var("y");
		assert_eq!(copy.instructions()[2..], [Instruction::ALoad(3), Instruction::AStore(4)]);
		assert_eq!(original.instructions().len(), 2);
	}

	#[test]
	fn trycatch_layout() {
		let mut code = CodeBlock::new();
		code.trycatch(
			Some("java/lang/Exception"),
			|code| { code.aconst_null().athrow(); },
			Some(|code: &mut CodeBlock| { code.pop(); }),
		).voidreturn();

		let [Exception { start, end, handler, catch }] = code.try_catch_blocks() else {
			panic!("expected exactly one exception table entry, got {:?}", code.try_catch_blocks());
		};
		assert_eq!(*catch, Some(ClassName::from("java/lang/Exception")));

		let Instruction::Goto(done) = code.instructions()[4] else {
			panic!("expected a goto, got {:?}", code.instructions()[4]);
		};
		assert_eq!(code.instructions(), &[
			Instruction::Label(*start),
			Instruction::AConstNull,
			Instruction::AThrow,
			Instruction::Label(*end),
			Instruction::Goto(done),
			Instruction::Label(*handler),
			Instruction::Pop,
			Instruction::Label(done),
			Instruction::Return,
		]);
	}

	#[test]
	fn trycatch_without_catch_body() {
		let mut code = CodeBlock::new();
		code.trycatch(None, |code| { code.nop(); }, None::<fn(&mut CodeBlock)>);

		assert_eq!(code.try_catch_blocks()[0].catch, None);
		let handler = code.try_catch_blocks()[0].handler;
		assert!(!code.instructions().contains(&Instruction::Label(handler)));
		assert_eq!(code.instructions().len(), 5);
	}

	#[test]
	fn nested_trycatch() {
		let mut code = CodeBlock::new();
		code.trycatch(Some("java/lang/Error"), |code| {
			code.trycatch(Some("java/lang/Exception"), |code| { code.nop(); }, Some(|code: &mut CodeBlock| { code.pop(); }));
		}, Some(|code: &mut CodeBlock| { code.pop(); }));

		let catches: Vec<_> = code.try_catch_blocks().iter()
			.map(|x| x.catch.as_ref().map(|c| c.to_string()))
			.collect();
		assert_eq!(catches, vec![Some("java/lang/Error".to_owned()), Some("java/lang/Exception".to_owned())]);
	}

	#[test]
	fn labels_and_line_numbers() {
		let loop_start = Label::new();
		let mut code = CodeBlock::with_arity(1);
		code.line(10)
			.label(loop_start)
			.iinc(0, 1)
			.go_to(loop_start);

		let Instruction::Label(line_label) = code.instructions()[0] else {
			panic!("expected a label, got {:?}", code.instructions()[0]);
		};
		assert_eq!(code.instructions()[1], Instruction::LineNumber(10, line_label));
		assert_ne!(line_label, loop_start);
		assert_eq!(code.instructions()[4], Instruction::Goto(loop_start));
	}

	#[test]
	fn conversions_use_the_right_opcodes() {
		let mut code = CodeBlock::new();
		code.f2i().f2d().swap2();
		assert_eq!(code.instructions(), &[Instruction::F2I, Instruction::F2D, Instruction::Dup2X2, Instruction::Pop2]);
	}

	#[test]
	fn getstatic_and_go_to_emit_a_single_instruction() {
		let target = Label::new();
		let mut code = CodeBlock::new();
		code.getstatic("java/lang/System", "out", "Ljava/io/PrintStream;").go_to(target);
		assert_eq!(code.instructions().len(), 2);
	}

	#[test]
	fn method_annotations() -> Result<()> {
		let mut code = CodeBlock::new();
		code.ldc("Sausages!").areturn();
		code.annotate("LScalarAnnotation;")?.value("breakfastItem", "Sausages!");

		assert_eq!(code.annotations().len(), 1);
		assert!(code.returns());
		assert!(code.annotate("not a descriptor").is_err());
		assert_eq!(code.annotations().len(), 1);
		Ok(())
	}
}
