use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    bytecode::{Instruction, OpCode},
    value::ValueKind,
};

/// Result type alias for operations that can produce an execution fault.
pub type ExecResult<T> = Result<T, ExecError>;

/// Error produced inside a node behavior.
///
/// Behaviors validate their inputs (value typing is checked at invocation
/// time, not enforced by a compiler) and may fail while emitting output.
/// The machine wraps a `NodeError` into [`ExecError::Node`] so the faulting
/// opcode is always part of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeError {
    /// An input value had a different kind than the behavior expected.
    TypeMismatch { expected: ValueKind, actual: ValueKind },
    /// Writing through the context's print sink failed.
    Output(String),
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, actual } => {
                write!(f, "type mismatch: expected {expected}, got {actual}")
            }
            Self::Output(msg) => write!(f, "output failed: {msg}"),
        }
    }
}

impl std::error::Error for NodeError {}

/// Terminal fault of a single `execute` call.
///
/// Every variant names the instruction or opcode that faulted, so the
/// content pipeline that produced the program can be fixed. A fault never
/// poisons anything beyond its own call: the registry and the program remain
/// usable afterwards, and no fault aborts the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecError {
    /// An `Invoke` instruction named an opcode with no registry binding.
    UnknownOpcode { opcode: OpCode },
    /// An opcode required more inputs than the stack held.
    StackUnderflow {
        opcode: OpCode,
        required: usize,
        available: usize,
    },
    /// A push would have exceeded the machine's stack capacity.
    StackOverflow { instruction: Instruction, capacity: usize },
    /// A `LoadConst` operand pointed past the end of the constant pool.
    ConstIndexOutOfRange { index: u16, pool_len: usize },
    /// More seed values were supplied than the stack can hold.
    SeedTooLarge { provided: usize, capacity: usize },
    /// A node behavior reported an error.
    Node { opcode: OpCode, source: NodeError },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { opcode } => {
                write!(f, "unknown opcode {opcode}: no node behavior registered")
            }
            Self::StackUnderflow {
                opcode,
                required,
                available,
            } => write!(
                f,
                "stack underflow at opcode {opcode}: requires {required} inputs, {available} available"
            ),
            Self::StackOverflow { instruction, capacity } => {
                write!(f, "stack overflow at `{instruction}`: capacity is {capacity}")
            }
            Self::ConstIndexOutOfRange { index, pool_len } => {
                write!(f, "constant index {index} out of range: pool holds {pool_len} values")
            }
            Self::SeedTooLarge { provided, capacity } => {
                write!(f, "{provided} seed values exceed stack capacity {capacity}")
            }
            Self::Node { opcode, source } => write!(f, "node at opcode {opcode} failed: {source}"),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Node { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error returned when registering a node behavior fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryError {
    /// The opcode already has a binding; use `replace` to overwrite it.
    DuplicateOpcode { opcode: OpCode },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateOpcode { opcode } => {
                write!(f, "opcode {opcode} is already registered; use `replace` to overwrite")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
