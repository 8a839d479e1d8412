use thiserror::Error;

/// Errors surfaced by the core. None of these are fatal: the rig logs them
/// and skips the affected tick or input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PulseError {
    #[error("shape buffers disagree: base={base} live={live} centers={centers}")]
    BufferShape {
        base: usize,
        live: usize,
        centers: usize,
    },
    #[error("unknown {kind} name: {name:?}")]
    UnknownName { kind: &'static str, name: String },
}
