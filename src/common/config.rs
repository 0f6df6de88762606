use serde::{Deserialize, Serialize};

use crate::sys::geometry::Size;

const MIN_WORKSPACES: usize = 2;
const MAX_WORKSPACES: usize = 32;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub workspaces: WorkspaceSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub levels: LevelSettings,
    #[serde(default)]
    pub notify: NotifySettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    /// Names of the fixed workspace set, declared up front. The first entry
    /// is active at startup.
    #[serde(default = "default_workspace_names")]
    pub workspace_names: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Fraction of the available width given to the master column.
    #[serde(default = "default_master_ratio")]
    pub master_ratio: f64,
    /// Size every window takes when the workspace goes floating.
    #[serde(default = "default_floating_size")]
    pub floating_size: Size,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LevelSettings {
    #[serde(default = "default_level_step")]
    pub step: i32,
    #[serde(default = "default_brightness")]
    pub brightness: i32,
    #[serde(default = "default_volume")]
    pub volume: i32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct NotifySettings {
    #[serde(default = "default_notify_secs")]
    pub default_duration_secs: u64,
}

fn default_workspace_names() -> Vec<String> { vec!["1".to_string(), "2".to_string()] }
fn default_master_ratio() -> f64 { 0.6 }
fn default_floating_size() -> Size { Size::new(80, 24) }
fn default_level_step() -> i32 { 5 }
fn default_brightness() -> i32 { 100 }
fn default_volume() -> i32 { 85 }
fn default_notify_secs() -> u64 { 3 }

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            workspace_names: default_workspace_names(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            master_ratio: default_master_ratio(),
            floating_size: default_floating_size(),
        }
    }
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            step: default_level_step(),
            brightness: default_brightness(),
            volume: default_volume(),
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            default_duration_secs: default_notify_secs(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.workspaces.workspace_names.len() < MIN_WORKSPACES {
            issues.push(format!(
                "at least {} workspaces must be declared",
                MIN_WORKSPACES
            ));
        }
        if self.workspaces.workspace_names.len() > MAX_WORKSPACES {
            issues.push(format!(
                "workspace count should not exceed {}",
                MAX_WORKSPACES
            ));
        }
        if self.workspaces.workspace_names.iter().any(|name| name.is_empty()) {
            issues.push("workspace names must not be empty".to_string());
        }

        if !(self.layout.master_ratio > 0.0 && self.layout.master_ratio < 1.0) {
            issues.push("master_ratio must be strictly between 0 and 1".to_string());
        }
        if self.layout.floating_size.is_degenerate() {
            issues.push("floating_size must have positive width and height".to_string());
        }

        if self.levels.step <= 0 {
            issues.push("level step must be positive".to_string());
        }
        for (name, value) in [
            ("brightness", self.levels.brightness),
            ("volume", self.levels.volume),
        ] {
            if !(0..=100).contains(&value) {
                issues.push(format!("initial {} must be within 0..=100", name));
            }
        }

        if self.notify.default_duration_secs == 0 {
            issues.push("notification duration must be at least one second".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_settings() {
        let mut config = Config::default();
        config.workspaces.workspace_names = vec!["only".to_string()];
        config.layout.master_ratio = 1.2;
        config.layout.floating_size = Size::new(80, 0);
        config.levels.step = 0;
        config.levels.volume = 140;

        let issues = config.validate();
        assert_eq!(issues.len(), 5);
    }
}
