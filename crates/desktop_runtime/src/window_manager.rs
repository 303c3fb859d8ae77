//! Window lifecycle, z-order, and state transitions.
//!
//! Z-indices live in two bands. Normal windows draw from a counter starting at `1`; windows
//! flagged always-on-top draw from a counter starting at [`ALWAYS_ON_TOP_Z_BASE`], so no focus
//! sequence can lift a normal window above a pinned one. Every operation on an unknown id is a
//! no-op that returns `false`.

use crate::model::{
    OpenWindowRequest, WindowId, WindowRecord, WindowRect, WindowState,
    DEFAULT_MIN_WINDOW_HEIGHT, DEFAULT_MIN_WINDOW_WIDTH,
};

/// First z-index of the always-on-top band.
pub const ALWAYS_ON_TOP_Z_BASE: u32 = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZBand {
    Normal,
    AlwaysOnTop,
}

impl ZBand {
    fn of(window: &WindowRecord) -> Self {
        if window.always_on_top {
            Self::AlwaysOnTop
        } else {
            Self::Normal
        }
    }

    fn floor(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::AlwaysOnTop => ALWAYS_ON_TOP_Z_BASE,
        }
    }

    fn ceiling(self) -> u32 {
        match self {
            Self::Normal => ALWAYS_ON_TOP_Z_BASE,
            Self::AlwaysOnTop => u32::MAX,
        }
    }

    fn contains(self, z_index: u32) -> bool {
        (self.floor()..self.ceiling()).contains(&z_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    next_window_id: u64,
    next_normal_z: u32,
    next_top_z: u32,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            next_window_id: 1,
            next_normal_z: ZBand::Normal.floor(),
            next_top_z: ZBand::AlwaysOnTop.floor(),
        }
    }
}

impl WindowManager {
    /// Rebuilds a manager around previously persisted windows.
    ///
    /// Counters resume above the highest restored id and z-index of each band. Records whose
    /// z-index lies outside their band are stacked above every valid record of that band.
    pub fn from_records(records: Vec<WindowRecord>) -> Self {
        let mut manager = Self::default();
        let mut out_of_band = Vec::new();
        for (index, mut record) in records.into_iter().enumerate() {
            let band = ZBand::of(&record);
            manager.next_window_id = manager.next_window_id.max(record.id.0.saturating_add(1));
            if band.contains(record.z_index) {
                let next = manager.counter_mut(band);
                *next = (*next).max(record.z_index.saturating_add(1));
            } else {
                out_of_band.push(index);
            }
            record.is_open = true;
            manager.windows.push(record);
        }
        for index in out_of_band {
            let band = ZBand::of(&manager.windows[index]);
            let z_index = manager.allocate_z(band);
            manager.windows[index].z_index = z_index;
        }
        manager
    }

    /// Live windows in open order.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Live windows from bottom to top.
    pub fn windows_by_z(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|window| window.z_index);
        ordered
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|window| window.id == id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Topmost window that is not minimized.
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|window| window.state != WindowState::Minimized)
            .max_by_key(|window| window.z_index)
            .map(|window| window.id)
    }

    /// Registers a new window on top of its band.
    pub fn open(&mut self, request: OpenWindowRequest) -> WindowRecord {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);

        let min_width = request.min_width.unwrap_or(DEFAULT_MIN_WINDOW_WIDTH).max(1);
        let min_height = request.min_height.unwrap_or(DEFAULT_MIN_WINDOW_HEIGHT).max(1);
        let band = if request.always_on_top {
            ZBand::AlwaysOnTop
        } else {
            ZBand::Normal
        };
        let z_index = self.allocate_z(band);
        let record = WindowRecord {
            id,
            title: request
                .title
                .unwrap_or_else(|| request.app_id.title().to_string()),
            app_id: request.app_id,
            rect: request
                .rect
                .unwrap_or_default()
                .clamped_min(min_width, min_height),
            min_width,
            min_height,
            is_open: true,
            state: WindowState::Normal,
            z_index,
            icon_id: request
                .icon_id
                .or_else(|| Some(request.app_id.icon_id().to_string())),
            can_maximize: request.can_maximize,
            always_on_top: request.always_on_top,
            content_data: request.content_data,
        };
        self.windows.push(record.clone());
        record
    }

    /// Discards a window.
    pub fn close(&mut self, id: WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|window| window.id != id);
        self.windows.len() != before
    }

    /// Raises a window to the top of its band.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let Some(window) = self.get(id) else {
            return false;
        };
        let band = ZBand::of(window);
        let z_index = window.z_index;
        let already_top = self
            .windows
            .iter()
            .filter(|other| ZBand::of(other) == band)
            .all(|other| other.z_index <= z_index);
        if already_top {
            return true;
        }

        let z_index = self.allocate_z(band);
        if let Some(window) = self.window_mut(id) {
            window.z_index = z_index;
        }
        true
    }

    /// `Normal -> Minimized`.
    pub fn minimize(&mut self, id: WindowId) -> bool {
        match self.window_mut(id) {
            Some(window) if window.state == WindowState::Normal => {
                window.state = WindowState::Minimized;
                true
            }
            _ => false,
        }
    }

    /// `Normal -> Maximized`, for windows that allow it.
    pub fn maximize(&mut self, id: WindowId) -> bool {
        match self.window_mut(id) {
            Some(window) if window.state == WindowState::Normal && window.can_maximize => {
                window.state = WindowState::Maximized;
                true
            }
            _ => false,
        }
    }

    /// `Minimized | Maximized -> Normal`. A window coming back from the taskbar is raised.
    pub fn restore(&mut self, id: WindowId) -> bool {
        let previous = match self.window_mut(id) {
            Some(window) if window.state != WindowState::Normal => {
                let previous = window.state;
                window.state = WindowState::Normal;
                previous
            }
            _ => return false,
        };
        if previous == WindowState::Minimized {
            self.focus(id);
        }
        true
    }

    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        let Some(window) = self.window_mut(id) else {
            return false;
        };
        window.rect.x = x;
        window.rect.y = y;
        true
    }

    /// Resizes a window, clamped to its minimum size.
    pub fn resize(&mut self, id: WindowId, w: i32, h: i32) -> bool {
        let Some(window) = self.window_mut(id) else {
            return false;
        };
        window.rect = WindowRect { w, h, ..window.rect }.clamped_min(window.min_width, window.min_height);
        true
    }

    /// Moves a window between bands, placing it on top of the new band.
    pub fn set_always_on_top(&mut self, id: WindowId, always_on_top: bool) -> bool {
        match self.get(id) {
            Some(window) if window.always_on_top != always_on_top => {}
            Some(_) => return true,
            None => return false,
        }
        let band = if always_on_top {
            ZBand::AlwaysOnTop
        } else {
            ZBand::Normal
        };
        let z_index = self.allocate_z(band);
        if let Some(window) = self.window_mut(id) {
            window.always_on_top = always_on_top;
            window.z_index = z_index;
        }
        true
    }

    /// Replaces the app payload of a window, e.g. after a document is first saved.
    pub fn set_content_data(&mut self, id: WindowId, content_data: serde_json::Value) -> bool {
        let Some(window) = self.window_mut(id) else {
            return false;
        };
        window.content_data = content_data;
        true
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|window| window.id == id)
    }

    fn counter_mut(&mut self, band: ZBand) -> &mut u32 {
        match band {
            ZBand::Normal => &mut self.next_normal_z,
            ZBand::AlwaysOnTop => &mut self.next_top_z,
        }
    }

    fn allocate_z(&mut self, band: ZBand) -> u32 {
        if *self.counter_mut(band) >= band.ceiling() {
            self.compact_band(band);
        }
        let next = self.counter_mut(band);
        let z_index = *next;
        *next = next.saturating_add(1);
        z_index
    }

    /// Renumbers a band from its floor, keeping relative order, once its counter is exhausted.
    fn compact_band(&mut self, band: ZBand) {
        let mut members: Vec<&mut WindowRecord> = self
            .windows
            .iter_mut()
            .filter(|window| ZBand::of(window) == band)
            .collect();
        members.sort_by_key(|window| window.z_index);
        let mut next = band.floor();
        for window in members {
            window.z_index = next;
            next += 1;
        }
        *self.counter_mut(band) = next;
    }
}
