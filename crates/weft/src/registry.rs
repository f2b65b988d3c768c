//! The node registry: data-driven dispatch over a closed opcode domain.
//!
//! Instead of a subclass hierarchy with virtual dispatch, node kinds are
//! plain functions bound to integer opcodes. Independent host modules each
//! register their own opcode range at startup; the machine looks behaviors
//! up by opcode at execution time.

use std::fmt;

use ahash::AHashMap;

use crate::{
    bytecode::OpCode,
    context::ExecContext,
    error::{NodeError, RegistryError},
    value::Value,
};

/// The callable bound to an opcode.
///
/// A behavior reads its inputs (deepest first), writes its outputs into the
/// provided slots, and may mutate the context or perform host side effects.
/// It must write exactly as many outputs as its [`NodeDef`] declares; slots
/// it leaves untouched stay [`Value::None`].
pub type NodeFn<E> =
    Box<dyn Fn(&mut ExecContext<'_, E>, &[Value], &mut [Value]) -> Result<(), NodeError> + Send + Sync>;

/// A registered node kind: its behavior plus the arity the machine uses to
/// drive stack bookkeeping.
///
/// Arity lives in the binding, not in the dispatch loop, so heterogeneous
/// node sets (2-in/1-out arithmetic next to 1-in/0-out sinks) execute
/// through the same loop.
pub struct NodeDef<E> {
    name: &'static str,
    inputs: u8,
    outputs: u8,
    behavior: NodeFn<E>,
}

impl<E> NodeDef<E> {
    pub fn new<F>(name: &'static str, inputs: u8, outputs: u8, behavior: F) -> Self
    where
        F: Fn(&mut ExecContext<'_, E>, &[Value], &mut [Value]) -> Result<(), NodeError> + Send + Sync + 'static,
    {
        Self {
            name,
            inputs,
            outputs,
            behavior: Box::new(behavior),
        }
    }

    /// Human-readable node name, used in traces and host tooling.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of stack values this node consumes.
    #[must_use]
    pub fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Number of stack values this node produces.
    #[must_use]
    pub fn outputs(&self) -> u8 {
        self.outputs
    }

    pub(crate) fn invoke(
        &self,
        ctx: &mut ExecContext<'_, E>,
        inputs: &[Value],
        outputs: &mut [Value],
    ) -> Result<(), NodeError> {
        (self.behavior)(ctx, inputs, outputs)
    }
}

impl<E> fmt::Debug for NodeDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDef")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

/// Mapping from opcode to node behavior.
///
/// The registry is an explicit object owned by the host (no process-wide
/// singleton): build it during startup, then hand a shared reference to each
/// [`Machine`](crate::Machine). Bindings are only ever added or replaced,
/// never removed. A frozen registry is safe to share across threads —
/// behaviors are `Send + Sync`, so concurrent `execute` calls may read it in
/// parallel as long as no registration races them.
pub struct NodeRegistry<E> {
    nodes: AHashMap<OpCode, NodeDef<E>>,
}

// manual impls: derived Debug/Default would needlessly bound E
impl<E> fmt::Debug for NodeRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry").field("nodes", &self.nodes).finish()
    }
}

impl<E> Default for NodeRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> NodeRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: AHashMap::new(),
        }
    }

    /// Binds `def` to `opcode`.
    ///
    /// Rebinding an occupied opcode is refused rather than silently
    /// overwritten; colliding registrations from independent modules are a
    /// content bug worth surfacing. Use [`replace`](Self::replace) when
    /// overwriting is intended.
    pub fn register(&mut self, opcode: impl Into<OpCode>, def: NodeDef<E>) -> Result<(), RegistryError> {
        let opcode = opcode.into();
        if self.nodes.contains_key(&opcode) {
            return Err(RegistryError::DuplicateOpcode { opcode });
        }
        self.nodes.insert(opcode, def);
        Ok(())
    }

    /// Binds `def` to `opcode`, returning the previous binding if one existed.
    ///
    /// This is the explicit last-write-wins path.
    pub fn replace(&mut self, opcode: impl Into<OpCode>, def: NodeDef<E>) -> Option<NodeDef<E>> {
        self.nodes.insert(opcode.into(), def)
    }

    /// Returns the binding for `opcode`, if any.
    ///
    /// A miss is recoverable: the machine turns it into
    /// [`ExecError::UnknownOpcode`](crate::ExecError::UnknownOpcode) instead
    /// of terminating anything beyond the current call.
    #[must_use]
    pub fn lookup(&self, opcode: OpCode) -> Option<&NodeDef<E>> {
        self.nodes.get(&opcode)
    }

    #[must_use]
    pub fn contains(&self, opcode: OpCode) -> bool {
        self.nodes.contains_key(&opcode)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_def(name: &'static str) -> NodeDef<()> {
        NodeDef::new(name, 2, 1, |_ctx, _inputs, _outputs| Ok(()))
    }

    #[test]
    fn register_then_lookup() {
        let mut registry = NodeRegistry::new();
        registry.register(OpCode::new(1), noop_def("first")).unwrap();

        let def = registry.lookup(OpCode::new(1)).unwrap();
        assert_eq!(def.name(), "first");
        assert_eq!((def.inputs(), def.outputs()), (2, 1));
        assert!(registry.lookup(OpCode::new(2)).is_none());
    }

    #[test]
    fn duplicate_registration_is_refused() {
        let mut registry = NodeRegistry::new();
        registry.register(OpCode::new(1), noop_def("first")).unwrap();

        let err = registry.register(OpCode::new(1), noop_def("second")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateOpcode { opcode: OpCode::new(1) });
        // refused registration leaves the original binding in place
        assert_eq!(registry.lookup(OpCode::new(1)).unwrap().name(), "first");
    }

    #[test]
    fn replace_returns_previous_binding() {
        let mut registry = NodeRegistry::new();
        registry.register(OpCode::new(1), noop_def("first")).unwrap();

        let previous = registry.replace(OpCode::new(1), noop_def("second")).unwrap();
        assert_eq!(previous.name(), "first");
        assert_eq!(registry.lookup(OpCode::new(1)).unwrap().name(), "second");
        assert_eq!(registry.len(), 1);
    }
}
