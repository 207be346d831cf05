//! Error kinds surfaced across the simulation core's narrow contract.
//!
//! Per the error handling design: configuration and allocation failures
//! are fail-fast and unrecoverable, external interface failures are
//! scoped to the collaborator call that produced them, and "still
//! running" is not an error — it's the `0` sentinel `compute` returns.

use thiserror::Error;

/// Errors the core can surface to its host.
#[derive(Debug, Error)]
pub enum SandpileError {
    /// Invalid `D` / `Tw` / `Th`, an unknown policy name, or an unknown
    /// preset name reaching a boundary that requires one to be known.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The grid or stability map could not be reserved.
    #[error("allocation failed: {0}")]
    Allocation(String),

    /// The visualization or GPU collaborator could not complete its
    /// side effect (e.g. a palette readback). Core grid state is
    /// unaffected by this class of error.
    #[error("external interface failure: {0}")]
    External(String),
}

/// Convenience alias used throughout `domain::`.
pub type SandpileResult<T> = Result<T, SandpileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_message() {
        let err = SandpileError::Config("D must be > 2".to_string());
        assert_eq!(err.to_string(), "invalid configuration: D must be > 2");
    }
}
