//! Error taxonomy for the monitor's public surface
//!
//! Only registration and lifecycle failures surface through return values.
//! Runtime failures, such as a signal query erroring mid-cycle or a callback
//! panicking during dispatch, are reported through `tracing` and never abort
//! the monitor (see `registry` and `monitor::poll`).

/// Errors returned by registration and lifecycle calls
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A category string did not name any known event category
    #[error("unknown event category: {0}")]
    UnknownCategory(String),

    /// `start()` was called while the monitor is already running
    #[error("monitor is already running")]
    AlreadyRunning,

    /// An input hook failed to start
    #[error("failed to start input hook: {0}")]
    HookStart(anyhow::Error),
}

/// Convenience alias for results carrying [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
