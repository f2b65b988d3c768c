//! Weft is a minimal visual-scripting execution engine: node behaviors are
//! registered against 8-bit opcodes, compiled blueprint graphs arrive as
//! straight-line [`Bytecode`] programs, and a [`Machine`] executes a program
//! against a per-invocation [`ExecContext`] on a fixed-capacity value stack.
//!
//! The host owns everything stateful: it builds the [`NodeRegistry`] during
//! startup, constructs a context per invocation, and decides when programs
//! run. The engine contributes typed values, data-driven dispatch, and the
//! execution loop.
//!
//! ```
//! use weft::{
//!     ExecContext, Machine, NodeRegistry, ProgramBuilder, StdPrint, Value,
//!     nodes::{self, CoreOp},
//! };
//!
//! let mut registry = NodeRegistry::new();
//! nodes::register_core_nodes(&mut registry).unwrap();
//!
//! // (2.0 + 3.0) * 4.0
//! let program = ProgramBuilder::new()
//!     .load_const(Value::Float(2.0))
//!     .load_const(Value::Float(3.0))
//!     .invoke(CoreOp::AddFloat)
//!     .load_const(Value::Float(4.0))
//!     .invoke(CoreOp::MulFloat)
//!     .build();
//!
//! let machine = Machine::new(&registry);
//! let mut out = StdPrint;
//! let mut ctx = ExecContext::new(0.016, (), &mut out);
//! let stack = machine.execute(&program, &mut ctx).unwrap();
//! assert_eq!(stack, vec![Value::Float(20.0)]);
//! ```

mod bytecode;
mod context;
mod error;
mod io;
mod machine;
pub mod nodes;
mod registry;
mod tracer;
mod value;

pub use crate::{
    bytecode::{Bytecode, Instruction, OpCode, ProgramBuilder},
    context::ExecContext,
    error::{ExecError, ExecResult, NodeError, RegistryError},
    io::{CollectPrint, NoPrint, PrintWriter, StdPrint},
    machine::{DEFAULT_STACK_CAPACITY, Machine},
    registry::{NodeDef, NodeFn, NodeRegistry},
    tracer::{MachineTracer, NoopTracer, ProfilingTracer, StderrTracer},
    value::{PointerId, Value, ValueKind, Vec3},
};
