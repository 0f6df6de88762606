use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An external full-screen program to hand the terminal over to. Execution
/// blocks the event loop for the program's whole lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

/// OS-facing side effects the shell delegates. The core only records intent;
/// implementations decide how (or whether) to act on it.
pub trait SystemControl {
    fn set_brightness(&mut self, pct: i32);
    fn set_volume(&mut self, pct: i32);
    fn query_connectivity(&mut self) -> bool;
    /// Interactive Wi-Fi scan/connect flow, full screen and blocking like
    /// `launch_blocking`.
    fn scan_and_connect(&mut self);
    /// Blocks until the external program exits. The event loop is suspended
    /// for the duration; the caller forces a relayout afterwards.
    fn launch_blocking(&mut self, spec: &LaunchSpec);
}

/// Wall clock and system metrics consumed on the 1s refresh tick.
pub trait MetricsSource {
    /// Short clock text, e.g. "14:05".
    fn clock_text(&mut self) -> String;
    fn cpu_percent(&mut self) -> f32;
    fn ram_percent(&mut self) -> f32;
}

/// Default `SystemControl` that shells out to the usual Linux utilities.
/// Failures are logged and swallowed; the shell keeps running either way.
#[derive(Debug, Default)]
pub struct ShellSystemControl;

impl ShellSystemControl {
    fn run_quiet(program: &str, args: &[&str]) {
        match Command::new(program).args(args).output() {
            Ok(output) if !output.status.success() => {
                warn!(%program, status = %output.status, "system command failed");
            }
            Ok(_) => {}
            Err(err) => warn!(%program, %err, "failed to spawn system command"),
        }
    }
}

impl SystemControl for ShellSystemControl {
    fn set_brightness(&mut self, pct: i32) {
        Self::run_quiet("brightnessctl", &["set", &format!("{pct}%")]);
    }

    fn set_volume(&mut self, pct: i32) {
        Self::run_quiet("amixer", &["set", "Master", &format!("{pct}%")]);
    }

    fn query_connectivity(&mut self) -> bool {
        match Command::new("nmcli").args(["-t", "-f", "DEVICE,STATE", "dev"]).output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout)
                .lines()
                .any(|line| line.ends_with(":connected")),
            Err(err) => {
                debug!(%err, "nmcli unavailable, reporting disconnected");
                false
            }
        }
    }

    fn scan_and_connect(&mut self) {
        self.launch_blocking(&LaunchSpec::new("nmtui"));
    }

    fn launch_blocking(&mut self, spec: &LaunchSpec) {
        debug!(program = %spec.program, "suspending for external program");
        match Command::new(&spec.program).args(&spec.args).status() {
            Ok(status) => debug!(program = %spec.program, %status, "external program exited"),
            Err(err) => warn!(program = %spec.program, %err, "failed to launch external program"),
        }
    }
}
