//! The stack machine that executes blueprint programs.
//!
//! One `execute` call owns one operand stack; nothing persists between
//! calls. Programs are straight-line, so the loop is a single forward pass:
//! `LoadConst` pushes a pool entry, `Invoke` looks the opcode up in the
//! registry, presents the top input slots to the behavior, then pops inputs
//! and pushes outputs according to the arity declared in the binding.

use smallvec::{SmallVec, smallvec};

use crate::{
    bytecode::{Bytecode, Instruction},
    context::ExecContext,
    error::{ExecError, ExecResult},
    registry::NodeRegistry,
    tracer::{MachineTracer, NoopTracer},
    value::Value,
};

/// Default operand stack capacity, in value slots.
///
/// Matches the inline buffer of [`ValueStack`], so executions within the
/// default capacity never touch the heap for stack storage.
pub const DEFAULT_STACK_CAPACITY: usize = 64;

/// Fixed-capacity operand stack, private to one `execute` call.
///
/// Storage is inline up to [`DEFAULT_STACK_CAPACITY`] slots and spills to
/// the heap only for machines configured with a larger capacity. Every push
/// is bounds-checked against the configured capacity; the inline buffer size
/// is a storage detail, not the limit.
#[derive(Debug)]
struct ValueStack {
    slots: SmallVec<[Value; DEFAULT_STACK_CAPACITY]>,
    capacity: usize,
}

impl ValueStack {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SmallVec::new(),
            capacity,
        }
    }

    fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Pushes a value, refusing to exceed the configured capacity.
    fn push(&mut self, value: Value) -> bool {
        if self.slots.len() >= self.capacity {
            return false;
        }
        self.slots.push(value);
        true
    }

    /// The top `count` slots, deepest first. Caller has verified the depth.
    fn top_slice(&self, count: usize) -> &[Value] {
        &self.slots[self.slots.len() - count..]
    }

    /// Pops `count` values, then pushes each of `outputs` in order.
    ///
    /// Caller has already verified both the available depth and that the
    /// resulting depth fits within capacity.
    fn replace_top(&mut self, count: usize, outputs: impl IntoIterator<Item = Value>) {
        let kept = self.slots.len() - count;
        self.slots.truncate(kept);
        self.slots.extend(outputs);
        debug_assert!(self.slots.len() <= self.capacity);
    }

    fn into_values(self) -> Vec<Value> {
        self.slots.into_vec()
    }
}

/// The interpreter: executes [`Bytecode`] programs against a registry.
///
/// A machine borrows its registry at construction (the host owns the
/// registry's lifecycle) and carries only immutable configuration, so one
/// machine may run many programs, and multiple machines sharing one frozen
/// registry may execute concurrently — each call gets its own stack.
///
/// For a fixed program, registry, and context, execution is fully
/// deterministic: same dispatch sequence, same final stack, same side
/// effects (assuming the behaviors themselves are deterministic).
#[derive(Debug)]
pub struct Machine<'reg, E> {
    registry: &'reg NodeRegistry<E>,
    capacity: usize,
}

impl<'reg, E> Machine<'reg, E> {
    /// Creates a machine with the default stack capacity.
    #[must_use]
    pub fn new(registry: &'reg NodeRegistry<E>) -> Self {
        Self::with_capacity(registry, DEFAULT_STACK_CAPACITY)
    }

    /// Creates a machine with an explicit stack capacity.
    #[must_use]
    pub fn with_capacity(registry: &'reg NodeRegistry<E>, capacity: usize) -> Self {
        Self { registry, capacity }
    }

    /// Configured operand stack capacity, in value slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Executes `program` to completion on an empty stack.
    ///
    /// `Ok` is normal halt and carries the residual stack contents, bottom
    /// to top. `Err` is a fault; the fault names the opcode or instruction
    /// that caused it, and the registry and program remain usable for
    /// further calls.
    pub fn execute(&self, program: &Bytecode, ctx: &mut ExecContext<'_, E>) -> ExecResult<Vec<Value>> {
        self.run(program, ctx, &[], &mut NoopTracer)
    }

    /// Executes `program` with caller-provided initial stack values
    /// (bottom to top).
    pub fn execute_seeded(
        &self,
        program: &Bytecode,
        ctx: &mut ExecContext<'_, E>,
        seed: &[Value],
    ) -> ExecResult<Vec<Value>> {
        self.run(program, ctx, seed, &mut NoopTracer)
    }

    /// Executes `program` on an empty stack, reporting each execution event
    /// to `tracer`.
    pub fn execute_traced<Tr: MachineTracer>(
        &self,
        program: &Bytecode,
        ctx: &mut ExecContext<'_, E>,
        tracer: &mut Tr,
    ) -> ExecResult<Vec<Value>> {
        self.run(program, ctx, &[], tracer)
    }

    fn run<Tr: MachineTracer>(
        &self,
        program: &Bytecode,
        ctx: &mut ExecContext<'_, E>,
        seed: &[Value],
        tracer: &mut Tr,
    ) -> ExecResult<Vec<Value>> {
        if seed.len() > self.capacity {
            return Err(fault(
                tracer,
                ExecError::SeedTooLarge {
                    provided: seed.len(),
                    capacity: self.capacity,
                },
            ));
        }
        let mut stack = ValueStack::with_capacity(self.capacity);
        for value in seed {
            let pushed = stack.push(*value);
            debug_assert!(pushed, "seed length was checked against capacity");
        }

        // no branching: execution order is exactly program order
        for (ip, &instruction) in program.instructions().iter().enumerate() {
            tracer.on_instruction(ip, instruction, stack.depth());
            match instruction {
                Instruction::LoadConst(index) => {
                    let Some(value) = program.constant(index) else {
                        return Err(fault(
                            tracer,
                            ExecError::ConstIndexOutOfRange {
                                index,
                                pool_len: program.constants().len(),
                            },
                        ));
                    };
                    if !stack.push(value) {
                        return Err(fault(
                            tracer,
                            ExecError::StackOverflow {
                                instruction,
                                capacity: self.capacity,
                            },
                        ));
                    }
                }
                Instruction::Invoke(opcode) => {
                    let Some(def) = self.registry.lookup(opcode) else {
                        return Err(fault(tracer, ExecError::UnknownOpcode { opcode }));
                    };
                    let inputs = usize::from(def.inputs());
                    let outputs = usize::from(def.outputs());
                    let depth = stack.depth();
                    if depth < inputs {
                        return Err(fault(
                            tracer,
                            ExecError::StackUnderflow {
                                opcode,
                                required: inputs,
                                available: depth,
                            },
                        ));
                    }
                    if depth - inputs + outputs > self.capacity {
                        return Err(fault(
                            tracer,
                            ExecError::StackOverflow {
                                instruction,
                                capacity: self.capacity,
                            },
                        ));
                    }

                    // slots the behavior leaves untouched stay Value::None
                    let mut produced: SmallVec<[Value; 4]> = smallvec![Value::None; outputs];
                    if let Err(source) = def.invoke(ctx, stack.top_slice(inputs), &mut produced) {
                        return Err(fault(tracer, ExecError::Node { opcode, source }));
                    }
                    stack.replace_top(inputs, produced);
                }
            }
        }

        tracer.on_halt(stack.depth());
        Ok(stack.into_values())
    }
}

/// Reports a fault to the tracer and hands the error back for propagation.
fn fault<Tr: MachineTracer>(tracer: &mut Tr, error: ExecError) -> ExecError {
    tracer.on_fault(&error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_stack_refuses_push_beyond_capacity() {
        let mut stack = ValueStack::with_capacity(2);
        assert!(stack.push(Value::Int(1)));
        assert!(stack.push(Value::Int(2)));
        assert!(!stack.push(Value::Int(3)));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn value_stack_replace_top_nets_arity() {
        let mut stack = ValueStack::with_capacity(8);
        for i in 0..3 {
            stack.push(Value::Int(i));
        }
        assert_eq!(stack.top_slice(2), &[Value::Int(1), Value::Int(2)]);

        stack.replace_top(2, [Value::Int(9)]);
        assert_eq!(stack.into_values(), vec![Value::Int(0), Value::Int(9)]);
    }
}
