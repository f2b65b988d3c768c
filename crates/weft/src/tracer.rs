//! Machine execution tracing.
//!
//! Trait-based tracing with zero-cost abstraction: when a call site passes
//! [`NoopTracer`], every hook monomorphizes to an empty inline function and
//! the dispatch loop carries no tracing overhead at all.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (production default) |
//! | [`StderrTracer`] | Human-readable execution log to stderr |
//! | [`ProfilingTracer`] | Per-opcode dispatch counters |

use std::collections::HashMap;

use crate::{
    bytecode::{Instruction, OpCode},
    error::ExecError,
};

/// Trait for observing machine execution.
///
/// All methods have default no-op implementations, so [`NoopTracer`] requires
/// zero lines of code. The machine takes the tracer as a generic parameter,
/// letting the compiler eliminate no-op hooks entirely.
pub trait MachineTracer: std::fmt::Debug {
    /// Called before each instruction is executed.
    ///
    /// This is the hottest hook; implementations should stay lightweight.
    #[inline(always)]
    fn on_instruction(&mut self, _ip: usize, _instruction: Instruction, _stack_depth: usize) {}

    /// Called when a program reaches the end of its instructions.
    #[inline(always)]
    fn on_halt(&mut self, _stack_depth: usize) {}

    /// Called when execution terminates with a fault.
    #[inline(always)]
    fn on_fault(&mut self, _error: &ExecError) {}
}

/// Zero-cost tracer that observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl MachineTracer for NoopTracer {}

/// Tracer that logs every execution event to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrTracer;

impl MachineTracer for StderrTracer {
    fn on_instruction(&mut self, ip: usize, instruction: Instruction, stack_depth: usize) {
        eprintln!("[weft] ip={ip:<4} depth={stack_depth:<3} {instruction}");
    }

    fn on_halt(&mut self, stack_depth: usize) {
        eprintln!("[weft] halted normally, final depth {stack_depth}");
    }

    fn on_fault(&mut self, error: &ExecError) {
        eprintln!("[weft] fault: {error}");
    }
}

/// Tracer that counts dispatches per opcode.
#[derive(Debug, Default)]
pub struct ProfilingTracer {
    invokes: HashMap<OpCode, u64>,
    const_loads: u64,
    faults: u64,
}

impl ProfilingTracer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the given opcode was dispatched.
    #[must_use]
    pub fn invoke_count(&self, opcode: OpCode) -> u64 {
        self.invokes.get(&opcode).copied().unwrap_or(0)
    }

    /// Number of `LoadConst` instructions executed.
    #[must_use]
    pub fn const_load_count(&self) -> u64 {
        self.const_loads
    }

    /// Number of faults observed.
    #[must_use]
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    /// Dispatch counts per opcode, sorted by opcode for stable reporting.
    #[must_use]
    pub fn report(&self) -> Vec<(OpCode, u64)> {
        let mut counts: Vec<_> = self.invokes.iter().map(|(op, n)| (*op, *n)).collect();
        counts.sort_unstable_by_key(|(op, _)| *op);
        counts
    }
}

impl MachineTracer for ProfilingTracer {
    fn on_instruction(&mut self, _ip: usize, instruction: Instruction, _stack_depth: usize) {
        match instruction {
            Instruction::LoadConst(_) => self.const_loads += 1,
            Instruction::Invoke(opcode) => *self.invokes.entry(opcode).or_insert(0) += 1,
        }
    }

    fn on_fault(&mut self, _error: &ExecError) {
        self.faults += 1;
    }
}
