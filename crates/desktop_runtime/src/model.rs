use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DESKTOP_SESSION_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_WIDTH: i32 = 640;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 420;
pub const DEFAULT_MIN_WINDOW_WIDTH: i32 = 220;
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 140;
pub const DEFAULT_MIME_TYPE: &str = "text/plain";
/// Name of the root-level folder whose direct children are mirrored as desktop icons.
pub const DESKTOP_FOLDER_NAME: &str = "Desktop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IconId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppId {
    Explorer,
    Notes,
    PdfViewer,
    ImageViewer,
    Terminal,
    Settings,
}

impl AppId {
    pub fn title(self) -> &'static str {
        match self {
            Self::Explorer => "Explorer",
            Self::Notes => "Notes",
            Self::PdfViewer => "PDF Viewer",
            Self::ImageViewer => "Image Viewer",
            Self::Terminal => "Terminal",
            Self::Settings => "Settings",
        }
    }

    pub fn icon_id(self) -> &'static str {
        match self {
            Self::Explorer => "folder",
            Self::Notes => "notepad",
            Self::PdfViewer => "document-pdf",
            Self::ImageViewer => "image",
            Self::Terminal => "terminal",
            Self::Settings => "settings",
        }
    }

    /// Picks the mini-app that opens a file of the given MIME type.
    pub fn for_mime_type(mime_type: &str) -> Self {
        if mime_type == "application/pdf" {
            Self::PdfViewer
        } else if mime_type.starts_with("image/") {
            Self::ImageViewer
        } else {
            Self::Notes
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FsNodeKind {
    File {
        content: String,
        mime_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Folder {
        children: Vec<NodeId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon_color: Option<String>,
    },
}

/// A file or folder in the virtual filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsNode {
    pub id: NodeId,
    pub name: String,
    pub parent_id: Option<NodeId>,
    pub created_at_unix_ms: u64,
    pub updated_at_unix_ms: u64,
    pub kind: FsNodeKind,
}

impl FsNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, FsNodeKind::Folder { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, FsNodeKind::File { .. })
    }

    /// Child ids in order; empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            FsNodeKind::Folder { children, .. } => children,
            FsNodeKind::File { .. } => &[],
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match &self.kind {
            FsNodeKind::File { mime_type, .. } => Some(mime_type),
            FsNodeKind::Folder { .. } => None,
        }
    }

    /// Mini-app that opens this node from a desktop icon.
    pub fn opening_app(&self) -> AppId {
        match &self.kind {
            FsNodeKind::File { mime_type, .. } => AppId::for_mime_type(mime_type),
            FsNodeKind::Folder { .. } => AppId::Explorer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 48,
            y: 48,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub app_id: AppId,
    pub rect: WindowRect,
    pub min_width: i32,
    pub min_height: i32,
    pub is_open: bool,
    pub state: WindowState,
    pub z_index: u32,
    pub icon_id: Option<String>,
    pub can_maximize: bool,
    pub always_on_top: bool,
    /// App-specific payload, for example the node a notes window is editing.
    pub content_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: AppId,
    pub title: Option<String>,
    pub icon_id: Option<String>,
    pub rect: Option<WindowRect>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub can_maximize: bool,
    pub always_on_top: bool,
    pub content_data: Value,
}

impl OpenWindowRequest {
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            title: None,
            icon_id: None,
            rect: None,
            min_width: None,
            min_height: None,
            can_maximize: true,
            always_on_top: false,
            content_data: Value::Null,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn pinned_on_top(mut self) -> Self {
        self.always_on_top = true;
        self
    }

    pub fn with_content_data(mut self, content_data: Value) -> Self {
        self.content_data = content_data;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub id: IconId,
    pub name: String,
    /// Fallback glyph id used when no custom icon is set.
    pub icon: String,
    pub x: i32,
    pub y: i32,
    pub app_id: AppId,
    /// Backing node for icons that mirror Desktop-folder content; `None` for app shortcuts.
    pub node_id: Option<NodeId>,
    pub icon_name: Option<String>,
    pub icon_color: Option<String>,
}

impl DesktopIcon {
    pub fn is_shortcut(&self) -> bool {
        self.node_id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ClipboardAction {
    #[default]
    None,
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Clipboard {
    pub content: Vec<FsNode>,
    pub action: ClipboardAction,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.action == ClipboardAction::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuState {
    pub x: i32,
    pub y: i32,
    /// Surface that opened the menu, e.g. `"desktop"` or an explorer window key.
    pub owner: Option<String>,
    pub target_node_id: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopTheme {
    pub name: String,
    pub wallpaper_id: String,
    pub dark_mode: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

impl Default for DesktopTheme {
    fn default() -> Self {
        Self {
            name: "Classic".to_string(),
            wallpaper_id: "teal-solid".to_string(),
            dark_mode: false,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

/// Read-only view of the desktop published to the presentation layer after every operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesktopSnapshot {
    pub windows: Vec<WindowRecord>,
    pub icons: Vec<DesktopIcon>,
    pub fs_nodes: Vec<FsNode>,
    pub clipboard: Clipboard,
    pub context_menu: Option<ContextMenuState>,
    pub theme: DesktopTheme,
}

impl DesktopSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&FsNode> {
        self.fs_nodes.iter().find(|node| node.id == id)
    }

    pub fn icon_for_node(&self, id: NodeId) -> Option<&DesktopIcon> {
        self.icons.iter().find(|icon| icon.node_id == Some(id))
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|window| window.id == id)
    }
}
