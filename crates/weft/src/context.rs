use crate::io::PrintWriter;

/// Per-invocation mutable state passed to every node behavior.
///
/// The context is caller-owned and lives for one `execute` call (or longer,
/// if the caller chooses to reuse it). `E` is the host's entity handle type:
/// an entity ID, a `Rc<RefCell<Actor>>`, a unit type for entity-less
/// invocations — whatever the host uses to reach the thing the blueprint
/// runs on behalf of. Keeping the handle generic keeps the engine decoupled
/// from any particular entity representation without erasing its type.
///
/// The print sink rides along so side-effecting nodes can emit output
/// without the engine knowing where it goes.
pub struct ExecContext<'io, E> {
    /// Time elapsed since the previous invocation, in seconds.
    pub delta_time: f32,
    /// Opaque handle to the entity this invocation runs on behalf of.
    pub entity: E,
    /// Destination for output emitted by print-style nodes.
    pub out: &'io mut dyn PrintWriter,
}

impl<'io, E> ExecContext<'io, E> {
    pub fn new(delta_time: f32, entity: E, out: &'io mut dyn PrintWriter) -> Self {
        Self {
            delta_time,
            entity,
            out,
        }
    }
}
