use std::io::BufRead;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{RecvTimeoutError, unbounded};
use termdesk::actor::overlay::MenuKind;
use termdesk::actor::reactor::{Event, Reactor, Renderer, Snapshot, WallpaperKind};
use termdesk::common::config::Config;
use termdesk::common::log;
use termdesk::layout_engine::LayoutMode;
use termdesk::sys::control::{LaunchSpec, MetricsSource, ShellSystemControl};
use termdesk::sys::geometry::{Point, Size};
use tracing::warn;

/// Line-driven harness for the shell core: feeds stdin commands and timer
/// deadlines through the reactor and prints each resulting frame.
#[derive(Parser)]
#[command(name = "termdesk", version)]
struct Args {
    /// Desktop width in cells.
    #[arg(long, default_value_t = 100)]
    width: i32,
    /// Desktop height in cells.
    #[arg(long, default_value_t = 50)]
    height: i32,
    /// Workspace names; at least two.
    #[arg(long = "workspace", value_name = "NAME")]
    workspaces: Vec<String>,
    /// Print every frame as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
    /// Validate the effective configuration and exit.
    #[arg(long)]
    check_config: bool,
}

struct StdoutRenderer {
    json: bool,
}

impl Renderer for StdoutRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        if self.json {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(%err, "failed to serialize snapshot"),
            }
            return;
        }
        let windows: Vec<String> = snapshot
            .windows
            .iter()
            .map(|(_, f)| {
                format!(
                    "{}x{}+{}+{}",
                    f.size.width, f.size.height, f.origin.x, f.origin.y
                )
            })
            .collect();
        println!(
            "[{}] mode={} locked={} menu={} notify={:?} windows=[{}]",
            snapshot
                .workspaces
                .iter()
                .map(|ws| if ws.active {
                    format!("*{}", ws.name)
                } else {
                    ws.name.clone()
                })
                .collect::<Vec<_>>()
                .join(" "),
            snapshot.mode,
            snapshot.locked,
            snapshot.active_menu.map(|m| m.to_string()).unwrap_or_else(|| "none".into()),
            snapshot.notification,
            windows.join(", "),
        );
    }
}

/// Clock and metrics from the local system. Sampling precision does not
/// matter here; the core only displays what it is given.
struct ProcMetrics;

impl MetricsSource for ProcMetrics {
    fn clock_text(&mut self) -> String {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        format!("{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60)
    }

    fn cpu_percent(&mut self) -> f32 {
        std::fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|s| s.split_whitespace().next()?.parse::<f32>().ok())
            .map(|load| (load * 100.0).min(100.0))
            .unwrap_or(0.0)
    }

    fn ram_percent(&mut self) -> f32 {
        let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") else {
            return 0.0;
        };
        let field = |name: &str| {
            meminfo
                .lines()
                .find(|l| l.starts_with(name))
                .and_then(|l| l.split_whitespace().nth(1)?.parse::<f32>().ok())
        };
        match (field("MemTotal:"), field("MemAvailable:")) {
            (Some(total), Some(available)) if total > 0.0 => {
                (total - available) / total * 100.0
            }
            _ => 0.0,
        }
    }
}

fn parse_command(line: &str) -> Option<Event> {
    let mut parts = line.split_whitespace();
    let event = match parts.next()? {
        "open" => Event::OpenTerminal,
        "close" => Event::CloseActiveWindow,
        "float" => Event::ToggleFloat,
        "mode" => Event::SetMode(match parts.next()? {
            "tiled" => LayoutMode::Tiled,
            "floating" => LayoutMode::Floating,
            _ => return None,
        }),
        "ws" => Event::SwitchWorkspace(parts.next()?.parse::<usize>().ok()?.checked_sub(1)?),
        "menu" => Event::OpenMenu(match parts.next()? {
            "start" => MenuKind::Start,
            "wallpaper" => MenuKind::Wallpaper,
            "levels" => MenuKind::Levels,
            _ => return None,
        }),
        "esc" => Event::CloseMenus,
        "lock" => Event::Lock,
        "unlock" => Event::Unlock,
        "wall" => Event::SelectWallpaper(match parts.next()? {
            "deep" => WallpaperKind::DeepBlack,
            "tokyo" => WallpaperKind::TokyoNight,
            _ => return None,
        }),
        "up" => Event::AdjustLevel { steps: 1 },
        "down" => Event::AdjustLevel { steps: -1 },
        "tab" => Event::SwitchLevelFocus,
        "down-at" => Event::PointerDown(parse_point(&mut parts)?),
        "move-to" => Event::PointerMove(parse_point(&mut parts)?),
        "release" => Event::PointerUp,
        "run" => Event::LaunchExternal(LaunchSpec::with_args(
            parts.next()?.to_string(),
            parts.map(str::to_string).collect(),
        )),
        "wifi" => Event::OpenWifiManager,
        "resize" => {
            let width = parts.next()?.parse().ok()?;
            let height = parts.next()?.parse().ok()?;
            Event::AreaChanged(Size::new(width, height))
        }
        _ => return None,
    };
    Some(event)
}

fn parse_point<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<Point> {
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some(Point::new(x, y))
}

fn main() -> Result<()> {
    log::init_logging();
    let args = Args::parse();

    let mut config = Config::default();
    if !args.workspaces.is_empty() {
        config.workspaces.workspace_names = args.workspaces.clone();
    }

    if args.check_config {
        let issues = config.validate();
        for issue in &issues {
            eprintln!("config: {issue}");
        }
        anyhow::ensure!(issues.is_empty(), "configuration is invalid");
        println!("configuration ok");
        return Ok(());
    }

    let (lines_tx, lines_rx) = unbounded::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if lines_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut reactor = Reactor::new(
        config,
        Size::new(args.width, args.height),
        StdoutRenderer { json: args.json },
        ShellSystemControl,
        ProcMetrics,
        Instant::now(),
    );

    loop {
        let now = Instant::now();
        for event in reactor.take_due_events(now) {
            reactor.handle_event(event, now);
        }

        let timeout = reactor
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::from_secs(1));

        match lines_rx.recv_timeout(timeout) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" {
                    break;
                }
                match parse_command(line) {
                    Some(event) => reactor.handle_event(event, Instant::now()),
                    None => eprintln!("unknown command: {line}"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
