//! Action dispatch for the desktop runtime.
//!
//! [`DesktopAction`] mirrors the orchestrator operations mini-apps and shell components may call.
//! [`reduce_desktop`] applies one action and reports what happened.

use serde_json::Value;

use crate::{
    model::{
        ContextMenuState, DesktopTheme, FsNode, IconId, NodeId, OpenWindowRequest, WindowId,
        WindowRecord,
    },
    orchestrator::{CloseOutcome, DesktopError, DesktopOrchestrator, PasteOutcome},
};

#[derive(Debug, Clone, PartialEq)]
/// Operations accepted by [`reduce_desktop`].
pub enum DesktopAction {
    /// Create a plain-text file.
    CreateFile {
        name: String,
        content: String,
        parent_id: Option<NodeId>,
    },
    /// Create an empty folder.
    CreateFolder {
        name: String,
        parent_id: Option<NodeId>,
        icon_name: Option<String>,
        icon_color: Option<String>,
    },
    /// Replace a file's content.
    UpdateFile { node_id: NodeId, content: String },
    /// Rename a file or folder.
    RenameNode { node_id: NodeId, name: String },
    /// Delete a node and its subtree.
    DeleteNode { node_id: NodeId },
    /// Reparent a node.
    MoveNode {
        node_id: NodeId,
        new_parent_id: Option<NodeId>,
    },
    /// Open a new window.
    OpenWindow(OpenWindowRequest),
    /// Open a node in the app that handles it.
    OpenNode { node_id: NodeId },
    /// Activate a desktop icon.
    OpenIcon { icon_id: IconId },
    /// Reposition a desktop icon.
    MoveIcon { icon_id: IconId, x: i32, y: i32 },
    /// Close a window unless its interceptor takes over.
    RequestCloseWindow { window_id: WindowId },
    /// Close a window unconditionally.
    CloseWindow { window_id: WindowId },
    MinimizeWindow { window_id: WindowId },
    MaximizeWindow { window_id: WindowId },
    RestoreWindow { window_id: WindowId },
    FocusWindow { window_id: WindowId },
    /// Taskbar button click.
    ToggleTaskbarWindow { window_id: WindowId },
    MoveWindow { window_id: WindowId, x: i32, y: i32 },
    ResizeWindow { window_id: WindowId, w: i32, h: i32 },
    SetAlwaysOnTop {
        window_id: WindowId,
        always_on_top: bool,
    },
    SetWindowContentData {
        window_id: WindowId,
        content_data: Value,
    },
    CopyToClipboard { node_ids: Vec<NodeId> },
    CutToClipboard { node_ids: Vec<NodeId> },
    ClearClipboard,
    /// Paste the first clipboard node into a folder (the root when `None`).
    Paste {
        destination: Option<NodeId>,
        replace: bool,
    },
    OpenContextMenu(ContextMenuState),
    CloseContextMenu,
    /// Apply a user-chosen theme.
    SetTheme(DesktopTheme),
    /// Follow the OS dark-mode preference.
    ApplySystemTheme { dark_mode: bool },
}

#[derive(Debug, Clone, PartialEq)]
/// Result of a successfully dispatched [`DesktopAction`].
pub enum ActionOutcome {
    /// The action changed state.
    Applied,
    /// The action targeted something unknown or was not a valid transition.
    Ignored,
    /// A node was created or updated.
    Node(FsNode),
    /// Ids removed by a delete, empty when the target was unknown.
    Removed(Vec<NodeId>),
    /// A window was opened or brought forward.
    Window(WindowRecord),
    Close(CloseOutcome),
    Paste(PasteOutcome),
}

impl ActionOutcome {
    fn from_applied(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Ignored
        }
    }

    /// Returns `true` when the action may have changed published state.
    pub fn changed_state(&self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Removed(ids) => !ids.is_empty(),
            Self::Close(outcome) => *outcome == CloseOutcome::Closed,
            Self::Paste(outcome) => !matches!(
                outcome,
                PasteOutcome::Empty | PasteOutcome::SkippedDuplicate(_) | PasteOutcome::Rejected
            ),
            _ => true,
        }
    }
}

/// Applies a [`DesktopAction`] to the orchestrator.
///
/// # Errors
///
/// Returns [`DesktopError::Filesystem`] when a filesystem operation fails, for example updating a
/// missing file or creating under a non-folder parent.
pub fn reduce_desktop(
    desktop: &mut DesktopOrchestrator,
    action: DesktopAction,
) -> Result<ActionOutcome, DesktopError> {
    let outcome = match action {
        DesktopAction::CreateFile {
            name,
            content,
            parent_id,
        } => ActionOutcome::Node(desktop.create_file(&name, &content, parent_id)?),
        DesktopAction::CreateFolder {
            name,
            parent_id,
            icon_name,
            icon_color,
        } => ActionOutcome::Node(desktop.create_folder(&name, parent_id, icon_name, icon_color)?),
        DesktopAction::UpdateFile { node_id, content } => {
            ActionOutcome::Node(desktop.update_file(node_id, &content)?)
        }
        DesktopAction::RenameNode { node_id, name } => {
            ActionOutcome::Node(desktop.rename_node(node_id, &name)?)
        }
        DesktopAction::DeleteNode { node_id } => ActionOutcome::Removed(desktop.delete_node(node_id)),
        DesktopAction::MoveNode {
            node_id,
            new_parent_id,
        } => ActionOutcome::from_applied(desktop.move_node(node_id, new_parent_id)),
        DesktopAction::OpenWindow(request) => ActionOutcome::Window(desktop.open_window(request)),
        DesktopAction::OpenNode { node_id } => desktop
            .open_node(node_id)
            .map_or(ActionOutcome::Ignored, ActionOutcome::Window),
        DesktopAction::OpenIcon { icon_id } => desktop
            .open_icon(icon_id)
            .map_or(ActionOutcome::Ignored, ActionOutcome::Window),
        DesktopAction::MoveIcon { icon_id, x, y } => {
            ActionOutcome::from_applied(desktop.move_icon(icon_id, x, y))
        }
        DesktopAction::RequestCloseWindow { window_id } => {
            ActionOutcome::Close(desktop.request_close_window(window_id))
        }
        DesktopAction::CloseWindow { window_id } => {
            ActionOutcome::from_applied(desktop.close_window(window_id))
        }
        DesktopAction::MinimizeWindow { window_id } => {
            ActionOutcome::from_applied(desktop.minimize_window(window_id))
        }
        DesktopAction::MaximizeWindow { window_id } => {
            ActionOutcome::from_applied(desktop.maximize_window(window_id))
        }
        DesktopAction::RestoreWindow { window_id } => {
            ActionOutcome::from_applied(desktop.restore_window(window_id))
        }
        DesktopAction::FocusWindow { window_id } => {
            ActionOutcome::from_applied(desktop.focus_window(window_id))
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            ActionOutcome::from_applied(desktop.toggle_taskbar_window(window_id))
        }
        DesktopAction::MoveWindow { window_id, x, y } => {
            ActionOutcome::from_applied(desktop.move_window(window_id, x, y))
        }
        DesktopAction::ResizeWindow { window_id, w, h } => {
            ActionOutcome::from_applied(desktop.resize_window(window_id, w, h))
        }
        DesktopAction::SetAlwaysOnTop {
            window_id,
            always_on_top,
        } => ActionOutcome::from_applied(desktop.set_window_always_on_top(window_id, always_on_top)),
        DesktopAction::SetWindowContentData {
            window_id,
            content_data,
        } => ActionOutcome::from_applied(desktop.set_window_content_data(window_id, content_data)),
        DesktopAction::CopyToClipboard { node_ids } => {
            ActionOutcome::from_applied(desktop.copy_to_clipboard(&node_ids) > 0)
        }
        DesktopAction::CutToClipboard { node_ids } => {
            ActionOutcome::from_applied(desktop.cut_to_clipboard(&node_ids) > 0)
        }
        DesktopAction::ClearClipboard => {
            desktop.clear_clipboard();
            ActionOutcome::Applied
        }
        DesktopAction::Paste {
            destination,
            replace,
        } => ActionOutcome::Paste(desktop.paste(destination, replace)?),
        DesktopAction::OpenContextMenu(menu) => {
            desktop.open_context_menu(menu);
            ActionOutcome::Applied
        }
        DesktopAction::CloseContextMenu => {
            desktop.close_context_menu();
            ActionOutcome::Applied
        }
        DesktopAction::SetTheme(theme) => {
            desktop.set_theme(theme);
            ActionOutcome::Applied
        }
        DesktopAction::ApplySystemTheme { dark_mode } => {
            ActionOutcome::from_applied(desktop.apply_system_theme(dark_mode))
        }
    };
    Ok(outcome)
}
