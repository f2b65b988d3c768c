//! Bytecode representation for compiled blueprint graphs.
//!
//! A [`Bytecode`] program is an immutable straight-line instruction sequence
//! plus a constant pool. Programs carry no mutable state, so one program may
//! be executed repeatedly and concurrently by independent machines. Graph
//! compilation lives outside the engine; [`ProgramBuilder`] only provides
//! ergonomic emission for hosts and tests that assemble programs by hand.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Small integer identifying a registered node behavior.
///
/// The opcode domain is a closed 8-bit space; independent host modules
/// conventionally register their node kinds in disjoint ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpCode(u8);

impl OpCode {
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for OpCode {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// One step of a blueprint program.
///
/// Constant access is explicit: a `LoadConst` instruction carries the pool
/// index as an operand instead of relying on any implicit "next constant"
/// convention. `LoadConst` is handled by the machine itself; only `Invoke`
/// dispatches through the node registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Push the constant at the given pool index.
    LoadConst(u16),
    /// Dispatch the node behavior bound to this opcode.
    Invoke(OpCode),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadConst(index) => write!(f, "load_const {index}"),
            Self::Invoke(opcode) => write!(f, "invoke {opcode}"),
        }
    }
}

/// An immutable compiled blueprint program.
///
/// Instructions execute in order, there is no branching, so every program is
/// a finite straight-line sequence and always terminates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bytecode {
    instructions: Vec<Instruction>,
    constants: Vec<Value>,
}

impl Bytecode {
    #[must_use]
    pub fn new(instructions: Vec<Instruction>, constants: Vec<Value>) -> Self {
        Self { instructions, constants }
    }

    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[must_use]
    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    /// Looks up a constant-pool entry by instruction operand.
    #[must_use]
    pub fn constant(&self, index: u16) -> Option<Value> {
        self.constants.get(usize::from(index)).copied()
    }

    /// Serializes the program to a compact binary format.
    ///
    /// The serialized data can be stored and later restored with `load()`,
    /// allowing compiled blueprints to be cached between sessions.
    pub fn dump(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Deserializes a program from the binary format produced by `dump()`.
    pub fn load(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

/// Builder for emitting blueprint programs by hand.
///
/// Handles constant-pool interning and operand bookkeeping so call sites can
/// write programs in evaluation order:
///
/// ```
/// use weft::{ProgramBuilder, Value};
///
/// let program = ProgramBuilder::new()
///     .load_const(Value::Float(2.0))
///     .load_const(Value::Float(3.0))
///     .invoke(1)
///     .build();
/// assert_eq!(program.instructions().len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
    constants: Vec<Value>,
}

impl ProgramBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `LoadConst`, interning the value into the constant pool.
    ///
    /// Identical constants share one pool entry. NaN floats never compare
    /// equal, so each NaN gets its own entry; programs do not normally carry
    /// NaN literals.
    #[must_use]
    pub fn load_const(mut self, value: Value) -> Self {
        let index = self
            .constants
            .iter()
            .position(|existing| *existing == value)
            .unwrap_or_else(|| {
                self.constants.push(value);
                self.constants.len() - 1
            });
        let index = u16::try_from(index).expect("constant pool exceeds u16 index space");
        self.instructions.push(Instruction::LoadConst(index));
        self
    }

    /// Emits an `Invoke` of the given opcode.
    #[must_use]
    pub fn invoke(mut self, opcode: impl Into<OpCode>) -> Self {
        self.instructions.push(Instruction::Invoke(opcode.into()));
        self
    }

    #[must_use]
    pub fn build(self) -> Bytecode {
        Bytecode::new(self.instructions, self.constants)
    }
}
