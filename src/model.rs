pub mod window;
pub mod workspace;

pub use window::{Window, WindowId, WindowRegistry};
pub use workspace::{Workspace, WorkspaceId, WorkspaceManager};
