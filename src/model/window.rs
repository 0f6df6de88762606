use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::error::ShellError;
use crate::model::workspace::{WorkspaceId, WorkspaceManager};
use crate::sys::geometry::Rect;

new_key_type! {
    pub struct WindowId;
}

/// A logical session record, not an OS process. Its frame is only meaningful
/// after the first layout pass over its workspace.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub workspace: WorkspaceId,
    pub frame: Rect,
}

/// Owns every window in the shell. Per-workspace stacking order lives on the
/// workspaces themselves; create/close keep both sides in step so a removed
/// window never leaves a dangling id behind.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct WindowRegistry {
    windows: SlotMap<WindowId, Window>,
}

impl WindowRegistry {
    pub fn new() -> Self { Self::default() }

    /// Creates a window at the top of `workspace`'s stacking order. Lock
    /// gating happens in the reactor before this is reached.
    pub fn create(
        &mut self,
        workspaces: &mut WorkspaceManager,
        workspace: WorkspaceId,
    ) -> Result<WindowId, ShellError> {
        if !workspaces.contains(workspace) {
            return Err(ShellError::WorkspaceNotFound);
        }
        let id = self.windows.insert(Window {
            workspace,
            frame: Rect::default(),
        });
        workspaces.attach(workspace, id);
        trace!(?id, ?workspace, "created window");
        Ok(id)
    }

    /// Removes `window` from the registry and its workspace's order.
    pub fn close(
        &mut self,
        workspaces: &mut WorkspaceManager,
        window: WindowId,
    ) -> Result<(), ShellError> {
        let record = self.windows.remove(window).ok_or(ShellError::WindowNotFound)?;
        workspaces.detach(record.workspace, window);
        trace!(?window, workspace = ?record.workspace, "closed window");
        Ok(())
    }

    /// Closes the last-inserted surviving window of `workspace`. Silent no-op
    /// when the workspace is empty or unknown.
    pub fn close_topmost(
        &mut self,
        workspaces: &mut WorkspaceManager,
        workspace: WorkspaceId,
    ) -> Option<WindowId> {
        let top = workspaces.topmost(workspace)?;
        self.close(workspaces, top).ok()?;
        Some(top)
    }

    pub fn contains(&self, window: WindowId) -> bool { self.windows.contains_key(window) }

    pub fn get(&self, window: WindowId) -> Option<&Window> { self.windows.get(window) }

    pub fn frame(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(window).map(|w| w.frame)
    }

    pub fn set_frame(&mut self, window: WindowId, frame: Rect) -> Result<(), ShellError> {
        let record = self.windows.get_mut(window).ok_or(ShellError::WindowNotFound)?;
        record.frame = frame;
        Ok(())
    }

    pub fn workspace_of(&self, window: WindowId) -> Option<WorkspaceId> {
        self.windows.get(window).map(|w| w.workspace)
    }

    pub fn len(&self) -> usize { self.windows.len() }

    pub fn is_empty(&self) -> bool { self.windows.is_empty() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::WorkspaceSettings;

    fn fixtures() -> (WindowRegistry, WorkspaceManager) {
        (
            WindowRegistry::new(),
            WorkspaceManager::new(&WorkspaceSettings::default()),
        )
    }

    #[test]
    fn create_appends_to_stacking_order() {
        let (mut registry, mut workspaces) = fixtures();
        let ws = workspaces.active();

        let a = registry.create(&mut workspaces, ws).unwrap();
        let b = registry.create(&mut workspaces, ws).unwrap();

        assert_eq!(workspaces.windows_in(ws), &[a, b]);
        assert_eq!(registry.workspace_of(b), Some(ws));
        assert_eq!(registry.frame(a), Some(Rect::default()));
    }

    #[test]
    fn close_removes_from_both_sides() {
        let (mut registry, mut workspaces) = fixtures();
        let ws = workspaces.active();
        let a = registry.create(&mut workspaces, ws).unwrap();
        let b = registry.create(&mut workspaces, ws).unwrap();

        registry.close(&mut workspaces, a).unwrap();
        assert_eq!(workspaces.windows_in(ws), &[b]);
        assert!(!registry.contains(a));
        assert_eq!(
            registry.close(&mut workspaces, a),
            Err(ShellError::WindowNotFound)
        );
    }

    #[test]
    fn close_topmost_pops_newest_first() {
        let (mut registry, mut workspaces) = fixtures();
        let ws = workspaces.active();
        let a = registry.create(&mut workspaces, ws).unwrap();
        let b = registry.create(&mut workspaces, ws).unwrap();

        assert_eq!(registry.close_topmost(&mut workspaces, ws), Some(b));
        assert_eq!(registry.close_topmost(&mut workspaces, ws), Some(a));
        assert_eq!(registry.close_topmost(&mut workspaces, ws), None);
    }

    #[test]
    fn create_in_unknown_workspace_fails() {
        let (mut registry, mut workspaces) = fixtures();
        // The default key is the null key and never names a live workspace.
        let missing = WorkspaceId::default();
        assert_eq!(
            registry.create(&mut workspaces, missing),
            Err(ShellError::WorkspaceNotFound)
        );
        assert!(registry.is_empty());
    }
}
