use crate::models::WindowState;
use tauri::{AppHandle, Monitor, Runtime};

/// A concrete window rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    fn intersection_area(&self, other: &Rect) -> u64 {
        let w = self.right().min(other.right()) - (self.x as i64).max(other.x as i64);
        let h = self.bottom().min(other.bottom()) - (self.y as i64).max(other.y as i64);
        if w <= 0 || h <= 0 {
            return 0;
        }
        w as u64 * h as u64
    }
}

/// A desired window rectangle whose position may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
}

impl Candidate {
    pub fn from_state(state: &WindowState) -> Self {
        Self {
            x: state.x,
            y: state.y,
            width: state.width_or_default(),
            height: state.height_or_default(),
        }
    }
}

impl From<Rect> for Candidate {
    fn from(r: Rect) -> Self {
        Self {
            x: Some(r.x),
            y: Some(r.y),
            width: r.width,
            height: r.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    pub bounds: Rect,
    pub work_area: Rect,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayLayout {
    pub displays: Vec<Display>,
    pub primary: usize,
}

impl DisplayLayout {
    fn primary_display(&self) -> Option<&Display> {
        self.displays.get(self.primary).or_else(|| self.displays.first())
    }

    /// The display with the largest overlap, or the primary one when nothing overlaps.
    pub fn matching(&self, candidate: &Candidate) -> Option<&Display> {
        let (Some(x), Some(y)) = (candidate.x, candidate.y) else {
            return self.primary_display();
        };
        let rect = Rect::new(x, y, candidate.width, candidate.height);

        let mut best: Option<(&Display, u64)> = None;
        for display in &self.displays {
            let area = display.bounds.intersection_area(&rect);
            if area > 0 && best.map_or(true, |(_, best_area)| area > best_area) {
                best = Some((display, area));
            }
        }
        best.map(|(d, _)| d).or_else(|| self.primary_display())
    }
}

fn clamp_axis(pos: Option<i32>, area_pos: i32, area_len: u32, len: u32) -> i32 {
    let min = area_pos as i64;
    let max = min + area_len as i64 - len as i64;
    let pos = pos.map_or(min, |p| p as i64);
    // max >= min because len was already capped to area_len
    pos.clamp(min, max.max(min)) as i32
}

/// Fits `candidate` inside the work area of the display it belongs to.
pub fn normalize(candidate: Candidate, layout: &DisplayLayout) -> Rect {
    let Some(display) = layout.matching(&candidate) else {
        return Rect::new(
            candidate.x.unwrap_or(0),
            candidate.y.unwrap_or(0),
            candidate.width,
            candidate.height,
        );
    };
    let area = display.work_area;

    let width = candidate.width.min(area.width);
    let height = candidate.height.min(area.height);
    let x = clamp_axis(candidate.x, area.x, area.width, width);
    let y = clamp_axis(candidate.y, area.y, area.height, height);

    Rect::new(x, y, width, height)
}

fn display_from_monitor(monitor: &Monitor) -> Display {
    let pos = monitor.position();
    let size = monitor.size();
    let work = monitor.work_area();
    Display {
        bounds: Rect::new(pos.x, pos.y, size.width, size.height),
        work_area: Rect::new(
            work.position.x,
            work.position.y,
            work.size.width,
            work.size.height,
        ),
    }
}

/// Snapshot of the connected displays, queried live from the OS.
pub fn current_layout<R: Runtime>(app_handle: &AppHandle<R>) -> DisplayLayout {
    let monitors = app_handle.available_monitors().unwrap_or_default();
    let primary_pos = app_handle
        .primary_monitor()
        .ok()
        .flatten()
        .map(|m| *m.position());

    let primary = primary_pos
        .and_then(|p| monitors.iter().position(|m| *m.position() == p))
        .unwrap_or(0);

    DisplayLayout {
        displays: monitors.iter().map(display_from_monitor).collect(),
        primary,
    }
}
