pub mod drag;
pub mod engine;

pub use drag::{DragManager, DragSession};
pub use engine::{LayoutMode, compute};
