use std::fmt;

/// Recoverable problem noticed while stepping. Collected by the simulation
/// and drained with `Simulation::take_diagnostics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Link skipped because `missing` is not a node.
    DanglingLink {
        source: String,
        target: String,
        missing: String,
    },
    /// Node went non-finite and was put back at its last finite position.
    NonFinitePosition { id: String },
    /// Queued mutation that could not be applied.
    RejectedMutation { reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingLink {
                source,
                target,
                missing,
            } => write!(f, "link {source} -> {target} skipped: no node `{missing}`"),
            Self::NonFinitePosition { id } => {
                write!(f, "node `{id}` went non-finite and was restored")
            }
            Self::RejectedMutation { reason } => write!(f, "queued mutation rejected: {reason}"),
        }
    }
}
