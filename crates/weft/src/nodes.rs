//! The core node set: sample content shipped with the engine.
//!
//! These are the behaviors every host gets for free — arithmetic over
//! floats and ints plus print sinks. They double as the reference for how
//! node modules are written: declare an opcode enum, give each behavior a
//! `NodeDef` with its arity, and register the lot during startup. Host
//! modules contribute their own node kinds the same way, in their own
//! opcode range.

use crate::{
    bytecode::OpCode,
    context::ExecContext,
    error::RegistryError,
    registry::{NodeDef, NodeRegistry},
    value::Value,
};

/// Opcodes of the core node set.
///
/// Occupies the bottom of the opcode space; host modules should register
/// from `0x10` upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::FromRepr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum CoreOp {
    AddFloat = 1,
    MulFloat,
    PrintFloat,
    AddInt,
    MulInt,
    /// Prints any value kind using its display form.
    PrintValue,
}

impl From<CoreOp> for OpCode {
    fn from(op: CoreOp) -> Self {
        Self::new(op as u8)
    }
}

/// Registers the core node set into `registry`.
///
/// Arithmetic nodes are 2-in/1-out and read their operands deepest-first
/// (push order); print nodes are 1-in/0-out. Fails if any core opcode is
/// already bound.
pub fn register_core_nodes<E>(registry: &mut NodeRegistry<E>) -> Result<(), RegistryError> {
    registry.register(
        CoreOp::AddFloat,
        NodeDef::new(
            CoreOp::AddFloat.into(),
            2,
            1,
            |_ctx: &mut ExecContext<'_, E>, inputs: &[Value], outputs: &mut [Value]| {
                outputs[0] = Value::Float(inputs[0].expect_float()? + inputs[1].expect_float()?);
                Ok(())
            },
        ),
    )?;
    registry.register(
        CoreOp::MulFloat,
        NodeDef::new(
            CoreOp::MulFloat.into(),
            2,
            1,
            |_ctx: &mut ExecContext<'_, E>, inputs: &[Value], outputs: &mut [Value]| {
                outputs[0] = Value::Float(inputs[0].expect_float()? * inputs[1].expect_float()?);
                Ok(())
            },
        ),
    )?;
    registry.register(
        CoreOp::PrintFloat,
        NodeDef::new(
            CoreOp::PrintFloat.into(),
            1,
            0,
            |ctx: &mut ExecContext<'_, E>, inputs: &[Value], _outputs: &mut [Value]| {
                let x = inputs[0].expect_float()?;
                ctx.out.write_line(format!("[weft] {}", Value::Float(x)).into())
            },
        ),
    )?;
    registry.register(
        CoreOp::AddInt,
        NodeDef::new(
            CoreOp::AddInt.into(),
            2,
            1,
            |_ctx: &mut ExecContext<'_, E>, inputs: &[Value], outputs: &mut [Value]| {
                outputs[0] = Value::Int(inputs[0].expect_int()?.wrapping_add(inputs[1].expect_int()?));
                Ok(())
            },
        ),
    )?;
    registry.register(
        CoreOp::MulInt,
        NodeDef::new(
            CoreOp::MulInt.into(),
            2,
            1,
            |_ctx: &mut ExecContext<'_, E>, inputs: &[Value], outputs: &mut [Value]| {
                outputs[0] = Value::Int(inputs[0].expect_int()?.wrapping_mul(inputs[1].expect_int()?));
                Ok(())
            },
        ),
    )?;
    registry.register(
        CoreOp::PrintValue,
        NodeDef::new(
            CoreOp::PrintValue.into(),
            1,
            0,
            |ctx: &mut ExecContext<'_, E>, inputs: &[Value], _outputs: &mut [Value]| {
                ctx.out.write_line(format!("[weft] {}", inputs[0]).into())
            },
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_ops_have_stable_opcodes() {
        // the engine's bytecode dialect pins these values; compiled
        // programs stored on disk depend on them
        assert_eq!(OpCode::from(CoreOp::AddFloat), OpCode::new(1));
        assert_eq!(OpCode::from(CoreOp::MulFloat), OpCode::new(2));
        assert_eq!(OpCode::from(CoreOp::PrintFloat), OpCode::new(3));
        assert_eq!(OpCode::from(CoreOp::AddInt), OpCode::new(4));
        assert_eq!(OpCode::from(CoreOp::MulInt), OpCode::new(5));
        assert_eq!(OpCode::from(CoreOp::PrintValue), OpCode::new(6));
    }

    #[test]
    fn core_set_registers_once() {
        let mut registry: NodeRegistry<()> = NodeRegistry::new();
        register_core_nodes(&mut registry).unwrap();
        assert_eq!(registry.len(), 6);

        // a second registration collides with the first
        let err = register_core_nodes(&mut registry).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateOpcode {
                opcode: CoreOp::AddFloat.into()
            }
        );
    }

    #[test]
    fn node_names_come_from_the_opcode() {
        let mut registry: NodeRegistry<()> = NodeRegistry::new();
        register_core_nodes(&mut registry).unwrap();
        assert_eq!(registry.lookup(CoreOp::AddFloat.into()).unwrap().name(), "add_float");
        assert_eq!(registry.lookup(CoreOp::PrintValue.into()).unwrap().name(), "print_value");
    }
}
