use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::common::config::LayoutSettings;
use crate::model::WindowId;
use crate::sys::geometry::{Point, Rect};

/// Global layout mode. Toggling re-tags every window in the active workspace
/// collectively; there is no per-window override.
#[derive(
    Serialize, Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Tiled,
    Floating,
}

impl LayoutMode {
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Tiled => LayoutMode::Floating,
            LayoutMode::Floating => LayoutMode::Tiled,
        }
    }
}

/// Assigns a frame to every window of one workspace. Pure in (windows, mode,
/// area, settings): identical inputs always produce identical frames, so a
/// repeated call is a no-op.
pub fn compute(
    windows: &[WindowId],
    mode: LayoutMode,
    area: Rect,
    settings: &LayoutSettings,
) -> Vec<(WindowId, Rect)> {
    match mode {
        LayoutMode::Tiled => compute_tiled(windows, area, settings.master_ratio),
        LayoutMode::Floating => compute_floating(windows, area, settings),
    }
}

fn compute_tiled(windows: &[WindowId], area: Rect, master_ratio: f64) -> Vec<(WindowId, Rect)> {
    let Some((&master, stack)) = windows.split_first() else {
        return Vec::new();
    };

    if stack.is_empty() {
        return vec![(master, area)];
    }

    let master_width = (area.size.width as f64 * master_ratio) as i32;
    let stack_width = area.size.width - master_width;
    // Floor division; any remainder rows are left unoccupied at the bottom
    // edge rather than stretched into the last window.
    let stack_height = area.size.height / stack.len() as i32;
    if stack_height <= 0 {
        debug!(
            windows = windows.len(),
            height = area.size.height,
            "stack rows degenerate to zero height"
        );
    }

    let mut frames = Vec::with_capacity(windows.len());
    frames.push((
        master,
        Rect::new(area.origin.x, area.origin.y, master_width, area.size.height),
    ));
    for (i, &window) in stack.iter().enumerate() {
        frames.push((
            window,
            Rect::new(
                area.origin.x + master_width,
                area.origin.y + i as i32 * stack_height,
                stack_width,
                stack_height,
            ),
        ));
    }
    frames
}

/// Every window is re-centered to the same default spot; overlap is expected
/// and only resolved by subsequent drags.
fn compute_floating(
    windows: &[WindowId],
    area: Rect,
    settings: &LayoutSettings,
) -> Vec<(WindowId, Rect)> {
    let size = settings.floating_size;
    let origin = Point::new(
        area.origin.x + (area.size.width - size.width) / 2,
        area.origin.y + (area.size.height - size.height) / 2,
    );
    windows
        .iter()
        .map(|&window| (window, Rect { origin, size }))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use slotmap::SlotMap;

    use super::*;

    fn window_ids(n: usize) -> Vec<WindowId> {
        let mut map = SlotMap::<WindowId, ()>::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn settings() -> LayoutSettings { LayoutSettings::default() }

    #[test]
    fn empty_workspace_is_a_noop() {
        assert_eq!(
            compute(&[], LayoutMode::Tiled, Rect::new(0, 0, 100, 50), &settings()),
            vec![]
        );
    }

    #[test]
    fn single_window_fills_the_area() {
        let ids = window_ids(1);
        let frames = compute(&ids, LayoutMode::Tiled, Rect::new(0, 0, 100, 50), &settings());
        assert_eq!(frames, vec![(ids[0], Rect::new(0, 0, 100, 50))]);
    }

    #[test]
    fn tiles_three_windows() {
        let ids = window_ids(3);
        let frames = compute(&ids, LayoutMode::Tiled, Rect::new(0, 0, 100, 50), &settings());
        assert_eq!(frames, vec![
            (ids[0], Rect::new(0, 0, 60, 50)),
            (ids[1], Rect::new(60, 0, 40, 25)),
            (ids[2], Rect::new(60, 25, 40, 25)),
        ]);
    }

    #[test]
    fn two_windows_split_master_and_full_height_stack() {
        let ids = window_ids(2);
        let frames = compute(&ids, LayoutMode::Tiled, Rect::new(0, 0, 100, 50), &settings());
        assert_eq!(frames, vec![
            (ids[0], Rect::new(0, 0, 60, 50)),
            (ids[1], Rect::new(60, 0, 40, 50)),
        ]);
    }

    #[test]
    fn stack_remainder_stays_at_the_bottom_edge() {
        let ids = window_ids(4);
        let frames = compute(&ids, LayoutMode::Tiled, Rect::new(0, 0, 100, 50), &settings());
        // 50 / 3 == 16; the last stack row ends at 32 + 16 = 48, leaving the
        // two-cell remainder unoccupied.
        assert_eq!(frames[3].1, Rect::new(60, 32, 40, 16));
        assert_eq!(frames.last().unwrap().1.max_y(), 48);
    }

    #[test]
    fn degenerate_stack_height_is_not_an_error() {
        let ids = window_ids(5);
        let frames = compute(&ids, LayoutMode::Tiled, Rect::new(0, 0, 100, 3), &settings());
        assert!(frames.iter().skip(1).all(|&(_, frame)| frame.size.height == 0));
    }

    #[test]
    fn floating_centers_every_window_on_the_same_spot() {
        let ids = window_ids(3);
        let frames = compute(&ids, LayoutMode::Floating, Rect::new(0, 0, 100, 50), &settings());
        for &(_, frame) in &frames {
            assert_eq!(frame, Rect::new(10, 13, 80, 24));
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let ids = window_ids(4);
        let area = Rect::new(0, 0, 157, 43);
        for mode in [LayoutMode::Tiled, LayoutMode::Floating] {
            let first = compute(&ids, mode, area, &settings());
            let second = compute(&ids, mode, area, &settings());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn master_column_tracks_the_ratio() {
        let ids = window_ids(3);
        let area = Rect::new(0, 0, 157, 43);
        let frames = compute(&ids, LayoutMode::Tiled, area, &settings());
        let master = frames[0].1;
        assert_eq!(master.size.width, (157.0 * 0.6) as i32);
        for &(_, frame) in &frames[1..] {
            assert_eq!(frame.origin.x, master.max_x());
            assert_eq!(frame.size.width, 157 - master.size.width);
        }
    }
}
