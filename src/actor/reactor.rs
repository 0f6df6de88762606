use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::actor::levels::{LevelTarget, Levels};
use crate::actor::notifications::NotificationQueue;
use crate::actor::overlay::{MenuKind, OverlayState};
use crate::common::config::Config;
use crate::error::ShellError;
use crate::layout_engine::{self, DragManager, LayoutMode};
use crate::model::{WindowId, WindowRegistry, WorkspaceManager};
use crate::sys::control::{LaunchSpec, MetricsSource, SystemControl};
use crate::sys::geometry::{Point, Rect, Size};
use crate::sys::timer::{TimerQueue, TimerTask};

const CLOCK_TICK: Duration = Duration::from_secs(1);
const CONNECTIVITY_POLL: Duration = Duration::from_secs(5);

/// Recorded wallpaper selection; rendering is the renderer's problem.
#[derive(Serialize, Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WallpaperKind {
    #[default]
    DeepBlack,
    TokyoNight,
}

/// Every discrete thing that can happen to the shell: user input, pointer
/// gestures, and timer callbacks. One event is handled at a time; no state
/// transition interleaves with another.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    OpenTerminal,
    CloseActiveWindow,
    CloseWindow(WindowId),
    ToggleFloat,
    SetMode(LayoutMode),
    /// 0-based workspace index, matching the numeric key bindings.
    SwitchWorkspace(usize),
    OpenMenu(MenuKind),
    CloseMenus,
    Lock,
    /// The designated confirm gesture; the only way out of the locked state.
    Unlock,
    SelectWallpaper(WallpaperKind),
    AdjustLevel { steps: i32 },
    SwitchLevelFocus,
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Blocking handoff to an external full-screen program.
    LaunchExternal(LaunchSpec),
    OpenWifiManager,
    AreaChanged(Size),
    ClockTick,
    ConnectivityPoll,
    NotificationExpired(u64),
}

/// What the renderer needs to draw one frame. Built after every
/// state-changing event.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub mode: LayoutMode,
    pub locked: bool,
    pub active_menu: Option<MenuKind>,
    pub wallpaper: WallpaperKind,
    pub workspaces: Vec<WorkspaceBadge>,
    /// Active workspace's windows in stacking order, bottom to top.
    pub windows: Vec<(WindowId, Rect)>,
    pub notification: Option<String>,
    pub brightness: i32,
    pub volume: i32,
    pub level_focus: LevelTarget,
    pub clock: String,
    pub cpu_percent: f32,
    pub ram_percent: f32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceBadge {
    pub name: String,
    pub active: bool,
    pub window_count: usize,
}

/// Draws the screen from a snapshot. Invoked after every state-changing
/// operation; geometry and overlay state are already final.
pub trait Renderer {
    fn draw(&mut self, snapshot: &Snapshot);
}

/// The shell core: a single-threaded dispatcher over the window registry,
/// workspace manager, layout engine, overlay state machine, and notification
/// slot. Input is gated by the overlay first; a rejected operation leaves
/// every structure untouched.
pub struct Reactor<R, S, M> {
    config: Config,
    registry: WindowRegistry,
    workspaces: WorkspaceManager,
    mode: LayoutMode,
    drag: DragManager,
    overlay: OverlayState,
    notifications: NotificationQueue,
    levels: Levels,
    wallpaper: WallpaperKind,
    area: Rect,
    connected: bool,
    clock: String,
    cpu_percent: f32,
    ram_percent: f32,
    timers: TimerQueue,
    renderer: R,
    control: S,
    metrics: M,
}

impl<R: Renderer, S: SystemControl, M: MetricsSource> Reactor<R, S, M> {
    pub fn new(
        config: Config,
        area: Size,
        renderer: R,
        mut control: S,
        metrics: M,
        now: Instant,
    ) -> Self {
        for issue in config.validate() {
            warn!(%issue, "config issue");
        }

        let workspaces = WorkspaceManager::new(&config.workspaces);
        let levels = Levels::new(&config.levels);
        let connected = control.query_connectivity();

        let mut timers = TimerQueue::new();
        timers.schedule_in(now, CLOCK_TICK, TimerTask::ClockTick);
        timers.schedule_in(now, CONNECTIVITY_POLL, TimerTask::ConnectivityPoll);

        let mut reactor = Self {
            config,
            registry: WindowRegistry::new(),
            workspaces,
            mode: LayoutMode::default(),
            drag: DragManager::new(),
            overlay: OverlayState::new(),
            notifications: NotificationQueue::new(),
            levels,
            wallpaper: WallpaperKind::default(),
            area: Rect {
                origin: Point::new(0, 0),
                size: area,
            },
            connected,
            clock: String::new(),
            cpu_percent: 0.0,
            ram_percent: 0.0,
            timers,
            renderer,
            control,
            metrics,
        };
        // The shell starts with one terminal open, like a fresh login.
        reactor.handle_event(Event::OpenTerminal, now);
        reactor
    }

    /// Single entry point for all events. Errors are local: the input is
    /// dropped, prior state retained, and the failure logged.
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        debug!(?event, "handling event");
        let result = match event {
            Event::OpenTerminal => self.open_terminal(),
            Event::CloseActiveWindow => self.close_active(),
            Event::CloseWindow(window) => self.close_window(window),
            Event::ToggleFloat => self.set_mode(self.mode.toggled()),
            Event::SetMode(mode) => self.set_mode(mode),
            Event::SwitchWorkspace(index) => self.switch_workspace(index),
            Event::OpenMenu(kind) => self.overlay.open_menu(kind),
            Event::CloseMenus => self.overlay.close_menus(),
            Event::Lock => self.lock(),
            Event::Unlock => self.overlay.unlock(),
            Event::SelectWallpaper(kind) => self.select_wallpaper(kind),
            Event::AdjustLevel { steps } => self.adjust_level(steps),
            Event::SwitchLevelFocus => self.switch_level_focus(),
            Event::PointerDown(pointer) => self.pointer_down(pointer),
            Event::PointerMove(pointer) => self.pointer_move(pointer),
            Event::PointerUp => self.pointer_up(),
            Event::LaunchExternal(spec) => self.launch_external(&spec, now),
            Event::OpenWifiManager => self.open_wifi_manager(now),
            Event::AreaChanged(size) => self.area_changed(size),
            Event::ClockTick => self.clock_tick(now),
            Event::ConnectivityPoll => self.connectivity_poll(now),
            Event::NotificationExpired(generation) => {
                self.notifications.expire(generation);
                Ok(())
            }
        };

        match result {
            Ok(()) => self.render(now),
            Err(err) => debug!(%err, "event rejected"),
        }
    }

    fn open_terminal(&mut self) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("create window")?;
        let active = self.workspaces.active();
        self.registry.create(&mut self.workspaces, active)?;
        self.retile();
        Ok(())
    }

    fn close_active(&mut self) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("close window")?;
        let active = self.workspaces.active();
        if let Some(closed) = self.registry.close_topmost(&mut self.workspaces, active) {
            self.drag.cancel_for(closed);
            self.retile();
        }
        Ok(())
    }

    /// Explicit close, e.g. the hosted session exited.
    fn close_window(&mut self, window: WindowId) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("close window")?;
        let workspace = self.registry.workspace_of(window);
        self.registry.close(&mut self.workspaces, window)?;
        self.drag.cancel_for(window);
        if workspace == Some(self.workspaces.active()) {
            self.retile();
        }
        Ok(())
    }

    /// Re-tags every window of the active workspace collectively and forces
    /// a recompute; there is no per-window mode.
    fn set_mode(&mut self, mode: LayoutMode) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("set layout mode")?;
        self.mode = mode;
        self.drag.end();
        self.retile();
        Ok(())
    }

    fn switch_workspace(&mut self, index: usize) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("switch workspace")?;
        let target = self.workspaces.at_index(index).ok_or(ShellError::WorkspaceNotFound)?;
        self.workspaces.switch_to(target)?;
        self.drag.end();
        // The previous workspace keeps its stale frames until revisited.
        self.retile();
        Ok(())
    }

    fn lock(&mut self) -> Result<(), ShellError> {
        self.drag.end();
        self.overlay.lock();
        Ok(())
    }

    fn select_wallpaper(&mut self, kind: WallpaperKind) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("select wallpaper")?;
        self.wallpaper = kind;
        self.overlay.close_menus()
    }

    fn adjust_level(&mut self, steps: i32) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("adjust level")?;
        let (target, value) = self.levels.adjust_focused(steps);
        match target {
            LevelTarget::Brightness => self.control.set_brightness(value),
            LevelTarget::Volume => self.control.set_volume(value),
        }
        Ok(())
    }

    fn switch_level_focus(&mut self) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("switch level focus")?;
        self.levels.switch_focus();
        Ok(())
    }

    fn pointer_down(&mut self, pointer: Point) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("drag")?;
        if self.mode != LayoutMode::Floating {
            return Ok(());
        }
        let Some(window) = self.window_at_header(pointer) else {
            return Ok(());
        };
        let origin = self.registry.frame(window).ok_or(ShellError::WindowNotFound)?.origin;
        self.raise(window);
        self.drag.begin(window, pointer, origin);
        Ok(())
    }

    fn pointer_move(&mut self, pointer: Point) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("drag")?;
        if let Some((window, origin)) = self.drag.update(pointer) {
            let frame = self.registry.frame(window).ok_or(ShellError::WindowNotFound)?;
            self.registry.set_frame(window, frame.with_origin(origin))?;
        }
        Ok(())
    }

    fn pointer_up(&mut self) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("drag")?;
        self.drag.end();
        Ok(())
    }

    fn launch_external(&mut self, spec: &LaunchSpec, now: Instant) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("launch external program")?;
        self.overlay.close_menus()?;
        // Fully blocking handoff; timers and input are suspended with us.
        self.control.launch_blocking(spec);
        self.post_notification("Welcome back!", now);
        // The external program may have clobbered the display.
        self.retile();
        Ok(())
    }

    fn open_wifi_manager(&mut self, now: Instant) -> Result<(), ShellError> {
        self.overlay.ensure_unlocked("open wifi manager")?;
        self.overlay.close_menus()?;
        self.control.scan_and_connect();
        self.post_notification("Welcome back!", now);
        self.retile();
        Ok(())
    }

    fn area_changed(&mut self, size: Size) -> Result<(), ShellError> {
        self.area.size = size;
        self.retile();
        Ok(())
    }

    fn clock_tick(&mut self, now: Instant) -> Result<(), ShellError> {
        self.clock = self.metrics.clock_text();
        self.cpu_percent = self.metrics.cpu_percent();
        self.ram_percent = self.metrics.ram_percent();
        self.timers.schedule_in(now, CLOCK_TICK, TimerTask::ClockTick);
        Ok(())
    }

    fn connectivity_poll(&mut self, now: Instant) -> Result<(), ShellError> {
        let connected = self.control.query_connectivity();
        if connected != self.connected {
            self.connected = connected;
            let message = if connected {
                "WiFi connected"
            } else {
                "WiFi disconnected"
            };
            self.post_notification(message, now);
        }
        self.timers.schedule_in(now, CONNECTIVITY_POLL, TimerTask::ConnectivityPoll);
        Ok(())
    }

    fn post_notification(&mut self, message: &str, now: Instant) {
        let duration = Duration::from_secs(self.config.notify.default_duration_secs);
        let generation = self.notifications.post(message, duration, now);
        self.timers.schedule_in(now, duration, TimerTask::NotificationExpiry(generation));
    }

    /// Recomputes frames for the active workspace only. Pure in the current
    /// window list, mode, and area; other workspaces keep stale geometry.
    fn retile(&mut self) {
        let active = self.workspaces.active();
        let windows: Vec<WindowId> = self.workspaces.windows_in(active).to_vec();
        let frames = layout_engine::compute(&windows, self.mode, self.area, &self.config.layout);
        for (window, frame) in frames {
            let _ = self.registry.set_frame(window, frame);
        }
    }

    /// Topmost window whose header row contains `pointer`. Floating windows
    /// drag from their header, as terminals have no other chrome.
    fn window_at_header(&self, pointer: Point) -> Option<WindowId> {
        let active = self.workspaces.active();
        self.workspaces.windows_in(active).iter().rev().copied().find(|&window| {
            self.registry.frame(window).is_some_and(|frame| {
                pointer.y == frame.origin.y
                    && pointer.x >= frame.origin.x
                    && pointer.x < frame.max_x()
            })
        })
    }

    /// Moves `window` to the top of its workspace's stacking order.
    fn raise(&mut self, window: WindowId) {
        let active = self.workspaces.active();
        if self.workspaces.topmost(active) != Some(window) {
            self.workspaces.detach(active, window);
            self.workspaces.attach(active, window);
        }
    }

    fn render(&mut self, now: Instant) {
        let snapshot = self.snapshot(now);
        self.renderer.draw(&snapshot);
    }

    pub fn snapshot(&self, now: Instant) -> Snapshot {
        let active = self.workspaces.active();
        let windows = self
            .workspaces
            .windows_in(active)
            .iter()
            .map(|&window| (window, self.registry.frame(window).unwrap_or_default()))
            .collect();
        let workspaces = self
            .workspaces
            .ids()
            .iter()
            .map(|&id| WorkspaceBadge {
                name: self.workspaces.get(id).map(|ws| ws.name.clone()).unwrap_or_default(),
                active: id == active,
                window_count: self.workspaces.windows_in(id).len(),
            })
            .collect();

        Snapshot {
            mode: self.mode,
            locked: self.overlay.locked(),
            active_menu: self.overlay.active_menu(),
            wallpaper: self.wallpaper,
            workspaces,
            windows,
            notification: self.notifications.visible(now).map(|n| n.message.clone()),
            brightness: self.levels.brightness(),
            volume: self.levels.volume(),
            level_focus: self.levels.focus(),
            clock: self.clock.clone(),
            cpu_percent: self.cpu_percent,
            ram_percent: self.ram_percent,
        }
    }

    /// Earliest pending timer deadline, for the event loop's wait.
    pub fn next_deadline(&self) -> Option<Instant> { self.timers.next_deadline() }

    /// Drains timers due at `now` into ordinary events.
    pub fn take_due_events(&mut self, now: Instant) -> Vec<Event> {
        self.timers
            .pop_due(now)
            .into_iter()
            .map(|task| match task {
                TimerTask::ClockTick => Event::ClockTick,
                TimerTask::ConnectivityPoll => Event::ConnectivityPoll,
                TimerTask::NotificationExpiry(generation) => Event::NotificationExpired(generation),
            })
            .collect()
    }

    pub fn window_count(&self) -> usize { self.registry.len() }
}
