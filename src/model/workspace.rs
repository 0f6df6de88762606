use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use tracing::{debug, warn};

use crate::common::config::WorkspaceSettings;
use crate::error::ShellError;
use crate::model::window::WindowId;

new_key_type! {
    pub struct WorkspaceId;
}

/// A named collection of windows in stacking order: index 0 is the tiling
/// master (oldest surviving window), the last element is topmost.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Workspace {
    pub name: String,
    windows: Vec<WindowId>,
}

impl Workspace {
    fn new(name: String) -> Self {
        Self {
            name,
            windows: Vec::new(),
        }
    }

    pub fn windows(&self) -> &[WindowId] { &self.windows }

    pub fn contains_window(&self, window: WindowId) -> bool { self.windows.contains(&window) }

    pub fn window_count(&self) -> usize { self.windows.len() }
}

/// The fixed workspace set, declared at construction. Exactly one workspace
/// is active; only its windows carry current geometry, the rest go stale
/// until they are switched back to.
#[derive(Serialize, Deserialize, Debug)]
pub struct WorkspaceManager {
    workspaces: SlotMap<WorkspaceId, Workspace>,
    order: Vec<WorkspaceId>,
    active: WorkspaceId,
}

impl WorkspaceManager {
    pub fn new(settings: &WorkspaceSettings) -> Self {
        let names: Vec<String> = if settings.workspace_names.len() < 2 {
            warn!("fewer than two workspaces declared, using defaults");
            WorkspaceSettings::default().workspace_names
        } else {
            settings.workspace_names.clone()
        };

        let mut workspaces = SlotMap::with_key();
        let order: Vec<WorkspaceId> =
            names.into_iter().map(|name| workspaces.insert(Workspace::new(name))).collect();
        let active = order[0];
        Self { workspaces, order, active }
    }

    pub fn active(&self) -> WorkspaceId { self.active }

    /// Workspace ids in declared order.
    pub fn ids(&self) -> &[WorkspaceId] { &self.order }

    /// Workspace at a 0-based declaration index, for numeric switch bindings.
    pub fn at_index(&self, index: usize) -> Option<WorkspaceId> {
        self.order.get(index).copied()
    }

    pub fn contains(&self, workspace: WorkspaceId) -> bool {
        self.workspaces.contains_key(workspace)
    }

    pub fn get(&self, workspace: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.get(workspace)
    }

    /// Makes `workspace` active. The previous workspace's geometry is left
    /// as-is; the caller recomputes layout for the new one.
    pub fn switch_to(&mut self, workspace: WorkspaceId) -> Result<(), ShellError> {
        if !self.workspaces.contains_key(workspace) {
            return Err(ShellError::WorkspaceNotFound);
        }
        debug!(from = ?self.active, to = ?workspace, "switching workspace");
        self.active = workspace;
        Ok(())
    }

    pub fn windows_in(&self, workspace: WorkspaceId) -> &[WindowId] {
        self.workspaces.get(workspace).map(|ws| ws.windows()).unwrap_or(&[])
    }

    pub fn topmost(&self, workspace: WorkspaceId) -> Option<WindowId> {
        self.workspaces.get(workspace)?.windows.last().copied()
    }

    pub(crate) fn attach(&mut self, workspace: WorkspaceId, window: WindowId) {
        if let Some(ws) = self.workspaces.get_mut(workspace) {
            ws.windows.push(window);
        }
    }

    pub(crate) fn detach(&mut self, workspace: WorkspaceId, window: WindowId) {
        if let Some(ws) = self.workspaces.get_mut(workspace) {
            ws.windows.retain(|&id| id != window);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn manager() -> WorkspaceManager { WorkspaceManager::new(&WorkspaceSettings::default()) }

    #[test]
    fn first_declared_workspace_starts_active() {
        let manager = manager();
        assert_eq!(manager.ids().len(), 2);
        assert_eq!(manager.active(), manager.ids()[0]);
        assert_eq!(manager.get(manager.active()).unwrap().name, "1");
    }

    #[test]
    fn switch_to_unknown_workspace_is_rejected() {
        let mut manager = manager();
        let before = manager.active();
        assert_eq!(
            manager.switch_to(WorkspaceId::default()),
            Err(ShellError::WorkspaceNotFound)
        );
        assert_eq!(manager.active(), before);
    }

    #[test]
    fn switch_changes_active_workspace() {
        let mut manager = manager();
        let second = manager.ids()[1];
        manager.switch_to(second).unwrap();
        assert_eq!(manager.active(), second);
    }

    #[test]
    fn degenerate_settings_fall_back_to_defaults() {
        let manager = WorkspaceManager::new(&WorkspaceSettings {
            workspace_names: vec!["solo".to_string()],
        });
        assert_eq!(manager.ids().len(), 2);
    }

    #[test]
    fn attach_detach_keep_order() {
        let mut manager = manager();
        let ws = manager.active();
        let mut windows = SlotMap::<WindowId, ()>::with_key();
        let (a, b, c) = (windows.insert(()), windows.insert(()), windows.insert(()));

        manager.attach(ws, a);
        manager.attach(ws, b);
        manager.attach(ws, c);
        manager.detach(ws, b);
        assert_eq!(manager.windows_in(ws), &[a, c]);
        assert_eq!(manager.topmost(ws), Some(c));
    }
}
