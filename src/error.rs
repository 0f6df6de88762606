use thiserror::Error;

/// Recoverable failures from shell operations. The triggering input is
/// dropped and prior state is retained; nothing here is fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    #[error("operation not allowed in current state: {0}")]
    InvalidState(&'static str),
    #[error("unknown window id")]
    WindowNotFound,
    #[error("unknown workspace id")]
    WorkspaceNotFound,
}
