/// Errors reported by [`Shared`](crate::Shared) when its cell cannot produce
/// a result.
///
/// Failures of the computation itself are not represented here; they are part
/// of the wrapped future's output and are handed back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The handle was created from an invalid future, or is a default
    /// handle, and has no cell.
    #[error("shared future has no associated state")]
    NoState,
    /// The wrapped future panicked inside its `wait` or its consuming `get`,
    /// so the cell will never hold a result.
    #[error("wrapped future panicked while producing its result")]
    Poisoned,
}
