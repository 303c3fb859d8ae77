//! Desktop orchestration: the single entry point the presentation layer calls.
//!
//! The orchestrator composes the filesystem, window manager, clipboard, and close interceptors,
//! and owns the desktop icon set. After every filesystem mutation routed through it, a desktop
//! icon carrying a `node_id` exists exactly for the direct children of the root "Desktop"
//! folder.
//!
//! Seeding and version merges fetch over the network, so they are free functions over a
//! `RefCell<DesktopOrchestrator>` that never hold a borrow across an `await`.

use std::{cell::RefCell, rc::Rc};

use leptos::logging;
use platform_host::{HostServices, KeyValueStore, SeedManifest, SeedSource, VersionDescriptor};
use serde_json::Value;
use thiserror::Error;

use crate::{
    apps,
    clipboard::ClipboardController,
    close_interceptor::{CloseInterceptor, CloseInterceptorRegistry},
    config::DesktopConfig,
    icons,
    model::{
        AppId, Clipboard, ClipboardAction, ContextMenuState, DesktopIcon, DesktopSnapshot,
        DesktopTheme, FsNode, FsNodeKind, IconId, NodeId, OpenWindowRequest, WindowId,
        WindowRecord, WindowState, DEFAULT_MIME_TYPE, DESKTOP_FOLDER_NAME,
    },
    persistence::{self, DesktopSession},
    reducer::{reduce_desktop, ActionOutcome, DesktopAction},
    seed::{MergeReport, SeedCoordinator, SeedError, SeedOutcome, VersionSync},
    vfs::{FsError, VirtualFileSystem},
    window_manager::WindowManager,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DesktopError {
    #[error(transparent)]
    Filesystem(#[from] FsError),
    #[error(transparent)]
    Seed(#[from] SeedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Nothing on the clipboard.
    Empty,
    /// A cut node was moved into the destination.
    Moved(NodeId),
    /// A copy was created.
    Copied(NodeId),
    /// The same-named sibling was removed and a copy created in its place.
    Replaced { removed: NodeId, created: NodeId },
    /// A same-named sibling exists and replacing was declined.
    SkippedDuplicate(NodeId),
    /// The destination lies inside the node being pasted, or the cut node no longer exists.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The window's interceptor took over the close.
    Intercepted,
    NotFound,
}

pub struct DesktopOrchestrator {
    config: DesktopConfig,
    store: Rc<dyn KeyValueStore>,
    seed_source: Rc<dyn SeedSource>,
    coordinator: SeedCoordinator,
    fs: VirtualFileSystem,
    windows: WindowManager,
    clipboard: ClipboardController,
    close_interceptors: CloseInterceptorRegistry,
    icons: Vec<DesktopIcon>,
    next_icon_id: u64,
    context_menu: Option<ContextMenuState>,
    theme: DesktopTheme,
    theme_set_manually: bool,
    version: Option<VersionDescriptor>,
}

impl std::fmt::Debug for DesktopOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopOrchestrator")
            .field("fs", &self.fs)
            .field("windows", &self.windows.len())
            .field("icons", &self.icons.len())
            .field("clipboard", &self.clipboard.action())
            .field("seed_started", &self.coordinator.is_started())
            .finish()
    }
}

impl DesktopOrchestrator {
    /// Restores the filesystem and session from `services.storage`.
    pub fn new(services: &HostServices, config: DesktopConfig, coordinator: SeedCoordinator) -> Self {
        let store = Rc::clone(&services.storage);
        let fs = VirtualFileSystem::load(Rc::clone(&store), config.fs_storage_key.clone());
        let session =
            persistence::load_session(&*store, &config.session_storage_key).unwrap_or_default();
        let next_icon_id = session
            .icons
            .iter()
            .map(|icon| icon.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        let mut orchestrator = Self {
            config,
            store,
            seed_source: Rc::clone(&services.seed),
            coordinator,
            fs,
            windows: WindowManager::from_records(session.windows),
            clipboard: ClipboardController::default(),
            close_interceptors: CloseInterceptorRegistry::default(),
            icons: session.icons,
            next_icon_id,
            context_menu: None,
            theme: session.theme,
            theme_set_manually: session.theme_set_manually,
            version: session.version,
        };
        orchestrator.reconcile_icons();
        orchestrator
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn fs(&self) -> &VirtualFileSystem {
        &self.fs
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    pub fn clipboard(&self) -> &Clipboard {
        self.clipboard.state()
    }

    pub fn context_menu(&self) -> Option<&ContextMenuState> {
        self.context_menu.as_ref()
    }

    pub fn theme(&self) -> &DesktopTheme {
        &self.theme
    }

    pub fn theme_set_manually(&self) -> bool {
        self.theme_set_manually
    }

    /// Build version whose manifest was last seeded or merged.
    pub fn version(&self) -> Option<&VersionDescriptor> {
        self.version.as_ref()
    }

    pub fn seed_source(&self) -> Rc<dyn SeedSource> {
        Rc::clone(&self.seed_source)
    }

    pub fn desktop_folder_id(&self) -> Option<NodeId> {
        self.fs
            .find_root_folder(DESKTOP_FOLDER_NAME)
            .map(|node| node.id)
    }

    pub fn snapshot(&self) -> DesktopSnapshot {
        DesktopSnapshot {
            windows: self.windows.windows().to_vec(),
            icons: self.icons.clone(),
            fs_nodes: self.fs.nodes().cloned().collect(),
            clipboard: self.clipboard.state().clone(),
            context_menu: self.context_menu.clone(),
            theme: self.theme.clone(),
        }
    }

    /// Applies one [`DesktopAction`].
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures from the action.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<ActionOutcome, DesktopError> {
        reduce_desktop(self, action)
    }

    // Filesystem.

    /// Creates a plain-text file.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidParent`] when `parent_id` is not an existing folder.
    pub fn create_file(
        &mut self,
        name: &str,
        content: &str,
        parent_id: Option<NodeId>,
    ) -> Result<FsNode, FsError> {
        self.create_file_with_type(name, content, parent_id, DEFAULT_MIME_TYPE, None)
    }

    /// Creates a file with an explicit MIME type and optional external content URL.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidParent`] when `parent_id` is not an existing folder.
    pub fn create_file_with_type(
        &mut self,
        name: &str,
        content: &str,
        parent_id: Option<NodeId>,
        mime_type: &str,
        url: Option<String>,
    ) -> Result<FsNode, FsError> {
        let node = self
            .fs
            .create_file(name, content, parent_id, mime_type, url)?;
        self.reconcile_icons();
        Ok(node)
    }

    /// # Errors
    ///
    /// Returns [`FsError::InvalidParent`] when `parent_id` is not an existing folder.
    pub fn create_folder(
        &mut self,
        name: &str,
        parent_id: Option<NodeId>,
        icon_name: Option<String>,
        icon_color: Option<String>,
    ) -> Result<FsNode, FsError> {
        let node = self
            .fs
            .create_folder(name, parent_id, icon_name, icon_color)?;
        self.reconcile_icons();
        Ok(node)
    }

    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] or [`FsError::TypeMismatch`] from the filesystem.
    pub fn update_file(&mut self, id: NodeId, content: &str) -> Result<FsNode, FsError> {
        self.fs.update_file(id, content)
    }

    /// Renames a node and keeps its desktop icon label in sync.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for an unknown id.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<FsNode, FsError> {
        let node = self.fs.rename(id, name)?;
        self.reconcile_icons();
        Ok(node)
    }

    /// Deletes a node and its subtree, dropping icons that mirrored any of them.
    pub fn delete_node(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed = self.fs.delete(id);
        if !removed.is_empty() {
            self.reconcile_icons();
        }
        removed
    }

    /// Reparents a node; icons follow nodes across the Desktop boundary.
    pub fn move_node(&mut self, id: NodeId, new_parent_id: Option<NodeId>) -> bool {
        let moved = self.fs.move_node(id, new_parent_id);
        if moved {
            self.reconcile_icons();
        }
        moved
    }

    // Windows.

    pub fn open_window(&mut self, request: OpenWindowRequest) -> WindowRecord {
        let record = self.windows.open(request);
        self.persist_session();
        record
    }

    /// Closes a window immediately, bypassing and dropping its close interceptor.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        self.close_interceptors.unregister(id);
        self.window_op(|windows| windows.close(id))
    }

    /// Closes a window unless its interceptor takes over.
    pub fn request_close_window(&mut self, id: WindowId) -> CloseOutcome {
        if self.windows.get(id).is_none() {
            return CloseOutcome::NotFound;
        }
        if !self.close_interceptors.allows_close(id) {
            return CloseOutcome::Intercepted;
        }
        self.close_window(id);
        CloseOutcome::Closed
    }

    pub fn minimize_window(&mut self, id: WindowId) -> bool {
        self.window_op(|windows| windows.minimize(id))
    }

    pub fn maximize_window(&mut self, id: WindowId) -> bool {
        self.window_op(|windows| windows.maximize(id))
    }

    pub fn restore_window(&mut self, id: WindowId) -> bool {
        self.window_op(|windows| windows.restore(id))
    }

    pub fn focus_window(&mut self, id: WindowId) -> bool {
        self.window_op(|windows| windows.focus(id))
    }

    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        self.window_op(|windows| windows.move_window(id, x, y))
    }

    pub fn resize_window(&mut self, id: WindowId, w: i32, h: i32) -> bool {
        self.window_op(|windows| windows.resize(id, w, h))
    }

    pub fn set_window_always_on_top(&mut self, id: WindowId, always_on_top: bool) -> bool {
        self.window_op(|windows| windows.set_always_on_top(id, always_on_top))
    }

    pub fn set_window_content_data(&mut self, id: WindowId, content_data: Value) -> bool {
        self.window_op(|windows| windows.set_content_data(id, content_data))
    }

    /// Taskbar button behavior: restore a minimized window, minimize the focused one (restoring it
    /// instead when maximized), otherwise focus.
    pub fn toggle_taskbar_window(&mut self, id: WindowId) -> bool {
        let Some(state) = self.windows.get(id).map(|window| window.state) else {
            return false;
        };
        if state == WindowState::Minimized {
            self.restore_window(id)
        } else if self.windows.focused_window_id() == Some(id) {
            // Maximized windows cannot minimize directly; the click drops them back to Normal.
            if state == WindowState::Maximized {
                self.restore_window(id)
            } else {
                self.minimize_window(id)
            }
        } else {
            self.focus_window(id)
        }
    }

    /// Opens `id` in the app that handles it, or brings forward a window already showing it.
    pub fn open_node(&mut self, id: NodeId) -> Option<WindowRecord> {
        let node = self.fs.get_node(id)?.clone();
        let existing = self
            .windows
            .windows()
            .iter()
            .find(|window| window.content_data.get("node_id").and_then(Value::as_u64) == Some(id.0))
            .map(|window| (window.id, window.state));

        match existing {
            Some((window_id, WindowState::Minimized)) => {
                self.restore_window(window_id);
                self.windows.get(window_id).cloned()
            }
            Some((window_id, _)) => {
                self.focus_window(window_id);
                self.windows.get(window_id).cloned()
            }
            None => Some(self.open_window(apps::open_request_for_node(&node))),
        }
    }

    /// Opens what a desktop icon points at: its node, or its app for shortcuts.
    pub fn open_icon(&mut self, icon_id: IconId) -> Option<WindowRecord> {
        let (node_id, app_id) = self
            .icons
            .iter()
            .find(|icon| icon.id == icon_id)
            .map(|icon| (icon.node_id, icon.app_id))?;
        match node_id {
            Some(node_id) => self.open_node(node_id),
            None => Some(self.open_window(apps::default_open_request(app_id))),
        }
    }

    pub fn move_icon(&mut self, icon_id: IconId, x: i32, y: i32) -> bool {
        let Some(icon) = self.icons.iter_mut().find(|icon| icon.id == icon_id) else {
            return false;
        };
        icon.x = x;
        icon.y = y;
        self.persist_session();
        true
    }

    // Close interceptors.

    /// Installs a close interceptor for a live window. Unknown windows are ignored.
    pub fn register_close_interceptor(&mut self, id: WindowId, interceptor: CloseInterceptor) -> bool {
        if self.windows.get(id).is_none() {
            return false;
        }
        self.close_interceptors.register(id, interceptor);
        true
    }

    pub fn unregister_close_interceptor(&mut self, id: WindowId) -> bool {
        self.close_interceptors.unregister(id)
    }

    pub fn close_interceptor(&self, id: WindowId) -> Option<CloseInterceptor> {
        self.close_interceptors.get(id)
    }

    // Clipboard.

    /// Places the given nodes on the clipboard as a copy batch. Unknown ids are skipped.
    pub fn copy_to_clipboard(&mut self, ids: &[NodeId]) -> usize {
        let nodes = self.collect_nodes(ids);
        let count = nodes.len();
        self.clipboard.copy(nodes);
        count
    }

    /// Places the given nodes on the clipboard as a cut batch. Unknown ids are skipped.
    pub fn cut_to_clipboard(&mut self, ids: &[NodeId]) -> usize {
        let nodes = self.collect_nodes(ids);
        let count = nodes.len();
        self.clipboard.cut(nodes);
        count
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard.clear();
    }

    /// Same-named sibling a copy paste into `destination` would collide with.
    ///
    /// Cut pastes never ask, so this is `None` for them.
    pub fn paste_conflict(&self, destination: Option<NodeId>) -> Option<NodeId> {
        if self.clipboard.action() != ClipboardAction::Copy {
            return None;
        }
        let first = self.clipboard.first()?;
        self.fs
            .find_child_by_name(destination, &first.name)
            .map(|node| node.id)
    }

    /// Pastes the first clipboard node into `destination` (the root when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidParent`] when a copy targets a missing or non-folder
    /// destination.
    pub fn paste(
        &mut self,
        destination: Option<NodeId>,
        replace: bool,
    ) -> Result<PasteOutcome, FsError> {
        let Some(first) = self.clipboard.first().cloned() else {
            return Ok(PasteOutcome::Empty);
        };

        match self.clipboard.action() {
            ClipboardAction::None => Ok(PasteOutcome::Empty),
            ClipboardAction::Cut => {
                if !self.fs.move_node(first.id, destination) {
                    return Ok(PasteOutcome::Rejected);
                }
                self.clipboard.clear();
                self.reconcile_icons();
                Ok(PasteOutcome::Moved(first.id))
            }
            ClipboardAction::Copy => {
                if let Some(dest) = destination {
                    if !self.fs.get_node(dest).is_some_and(FsNode::is_folder) {
                        return Err(FsError::InvalidParent(dest));
                    }
                    let source_live = self.fs.get_node(first.id).is_some();
                    if source_live && (dest == first.id || self.fs.is_ancestor(first.id, dest)) {
                        return Ok(PasteOutcome::Rejected);
                    }
                }

                let duplicate = self
                    .fs
                    .find_child_by_name(destination, &first.name)
                    .map(|node| node.id);
                let outcome = match duplicate {
                    Some(existing) if !replace => PasteOutcome::SkippedDuplicate(existing),
                    Some(existing) => {
                        // Copy before deleting: the source may be, or live inside, the node
                        // being replaced.
                        let created = self.fs.copy_node(&first, destination)?;
                        self.fs.delete(existing);
                        PasteOutcome::Replaced {
                            removed: existing,
                            created: created.id,
                        }
                    }
                    None => PasteOutcome::Copied(self.fs.copy_node(&first, destination)?.id),
                };
                self.reconcile_icons();
                Ok(outcome)
            }
        }
    }

    // Context menu and theme.

    pub fn open_context_menu(&mut self, menu: ContextMenuState) {
        self.context_menu = Some(menu);
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Applies a user-chosen theme; system theme changes are ignored from then on.
    pub fn set_theme(&mut self, theme: DesktopTheme) {
        self.theme = theme;
        self.theme_set_manually = true;
        self.persist_session();
    }

    /// Follows the OS dark-mode preference unless the user picked a theme.
    pub fn apply_system_theme(&mut self, dark_mode: bool) -> bool {
        if self.theme_set_manually || self.theme.dark_mode == dark_mode {
            return false;
        }
        self.theme.dark_mode = dark_mode;
        self.persist_session();
        true
    }

    // Seeding.

    /// Claims first-run seeding and returns the source to fetch from.
    ///
    /// Returns the final outcome instead when another call already claimed seeding or the
    /// filesystem has content. The claim is kept in both of those cases.
    pub fn begin_seed(&self) -> Result<Rc<dyn SeedSource>, SeedOutcome> {
        if !self.coordinator.try_start() {
            return Err(SeedOutcome::AlreadyStarted);
        }
        if !self.fs.is_empty() {
            return Err(SeedOutcome::AlreadySeeded);
        }
        Ok(self.seed_source())
    }

    /// Releases the seeding claim after a failed fetch.
    pub fn abort_seed(&self) {
        self.coordinator.reset();
    }

    /// Seeds from a fetched manifest: folders and files, then shortcut icons in configured
    /// order, then one icon per Desktop child.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Filesystem`] when a node cannot be created. Nodes created up to that
    /// point are removed and the claim is released.
    pub fn finish_seed(
        &mut self,
        manifest: &SeedManifest,
        version: Option<VersionDescriptor>,
    ) -> Result<SeedOutcome, SeedError> {
        let nodes_before = self.fs.len();
        let icons_before = self.icons.len();
        if let Err(err) = self.apply_manifest(manifest) {
            self.abort_seed();
            return Err(err.into());
        }
        let shortcut_apps = self.config.desktop_apps.clone();
        self.add_shortcut_icons(&shortcut_apps);
        self.reconcile_icons();
        if version.is_some() {
            self.version = version;
        }
        self.persist_session();

        Ok(SeedOutcome::Seeded {
            nodes: self.fs.len().saturating_sub(nodes_before),
            icons: self.icons.len().saturating_sub(icons_before),
        })
    }

    /// Adds manifest folders and files that are missing by name at their parent.
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures.
    pub fn merge_seed(&mut self, manifest: &SeedManifest) -> Result<MergeReport, FsError> {
        let nodes_added = self.apply_manifest(manifest)?;
        let icons_added = self.reconcile_icons();
        Ok(MergeReport {
            nodes_added,
            icons_added,
        })
    }

    /// Adds shortcut icons for apps that do not have one yet.
    pub fn merge_desktop_apps(&mut self, app_ids: &[AppId]) -> usize {
        let added = self.add_shortcut_icons(app_ids);
        if added > 0 {
            self.persist_session();
        }
        added
    }

    /// Merges a newer build's manifest and shortcut apps and records its version.
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures; the version is not recorded in that case.
    pub fn apply_version_update(
        &mut self,
        manifest: &SeedManifest,
        version: VersionDescriptor,
    ) -> Result<MergeReport, FsError> {
        let mut report = self.merge_seed(manifest)?;
        let shortcut_apps = self.config.desktop_apps.clone();
        report.icons_added += self.merge_desktop_apps(&shortcut_apps);
        self.version = Some(version);
        self.persist_session();
        Ok(report)
    }

    fn window_op(&mut self, op: impl FnOnce(&mut WindowManager) -> bool) -> bool {
        let applied = op(&mut self.windows);
        if applied {
            self.persist_session();
        }
        applied
    }

    fn collect_nodes(&self, ids: &[NodeId]) -> Vec<FsNode> {
        ids.iter()
            .filter_map(|id| self.fs.get_node(*id).cloned())
            .collect()
    }

    /// Creates missing manifest entries. On failure every node created so far is removed again.
    fn apply_manifest(&mut self, manifest: &SeedManifest) -> Result<usize, FsError> {
        let mut created = Vec::new();
        match self.create_manifest_nodes(manifest, &mut created) {
            Ok(()) => Ok(created.len()),
            Err(err) => {
                self.discard_nodes(&created);
                Err(err)
            }
        }
    }

    fn create_manifest_nodes(
        &mut self,
        manifest: &SeedManifest,
        created: &mut Vec<NodeId>,
    ) -> Result<(), FsError> {
        for folder in &manifest.folders {
            if self.fs.find_root_folder(folder).is_none() {
                created.push(self.fs.create_folder(folder, None, None, None)?.id);
            }
        }

        for file in &manifest.files {
            let parent = if file.folder.is_empty() {
                None
            } else if let Some(folder) = self.fs.find_root_folder(&file.folder) {
                Some(folder.id)
            } else {
                let folder = self.fs.create_folder(&file.folder, None, None, None)?;
                created.push(folder.id);
                Some(folder.id)
            };
            if self.fs.find_child_by_name(parent, &file.name).is_some() {
                continue;
            }
            let mime_type = if file.mime_type.is_empty() {
                DEFAULT_MIME_TYPE
            } else {
                file.mime_type.as_str()
            };
            let node =
                self.fs
                    .create_file(&file.name, "", parent, mime_type, Some(file.url.clone()))?;
            created.push(node.id);
        }
        Ok(())
    }

    fn discard_nodes(&mut self, ids: &[NodeId]) {
        for id in ids.iter().rev() {
            self.fs.delete(*id);
        }
    }

    fn add_shortcut_icons(&mut self, app_ids: &[AppId]) -> usize {
        let mut added = 0;
        for app_id in app_ids {
            let present = self
                .icons
                .iter()
                .any(|icon| icon.is_shortcut() && icon.app_id == *app_id);
            if present {
                continue;
            }
            let descriptor = apps::app_descriptor(*app_id);
            let icon = self.new_icon(
                descriptor.desktop_icon_label.to_string(),
                app_id.icon_id().to_string(),
                *app_id,
                None,
            );
            self.icons.push(icon);
            added += 1;
        }
        added
    }

    /// Brings node icons in line with the Desktop folder's children. Returns how many were added.
    fn reconcile_icons(&mut self) -> usize {
        let before = self.icons.clone();
        let desktop_children: Vec<FsNode> = self
            .desktop_folder_id()
            .map(|id| self.fs.get_children(id).into_iter().cloned().collect())
            .unwrap_or_default();

        let mut seen = Vec::new();
        self.icons.retain(|icon| match icon.node_id {
            None => true,
            Some(node_id) => {
                let keep = desktop_children.iter().any(|node| node.id == node_id)
                    && !seen.contains(&node_id);
                seen.push(node_id);
                keep
            }
        });

        let mut added = 0;
        for node in &desktop_children {
            if let Some(icon) = self
                .icons
                .iter_mut()
                .find(|icon| icon.node_id == Some(node.id))
            {
                sync_icon_with_node(icon, node);
                continue;
            }
            let (icon_name, icon_color) = folder_hints(node);
            let mut icon = self.new_icon(
                node.name.clone(),
                icons::glyph_for_node(node).to_string(),
                node.opening_app(),
                Some(node.id),
            );
            icon.icon_name = icon_name;
            icon.icon_color = icon_color;
            self.icons.push(icon);
            added += 1;
        }

        if self.icons != before {
            self.persist_session();
        }
        added
    }

    fn new_icon(
        &mut self,
        name: String,
        glyph: String,
        app_id: AppId,
        node_id: Option<NodeId>,
    ) -> DesktopIcon {
        let (x, y) = icons::next_free_slot(&self.config.icon_grid, &self.icons);
        let id = IconId(self.next_icon_id);
        self.next_icon_id = self.next_icon_id.saturating_add(1);
        DesktopIcon {
            id,
            name,
            icon: glyph,
            x,
            y,
            app_id,
            node_id,
            icon_name: None,
            icon_color: None,
        }
    }

    fn persist_session(&self) {
        let session = DesktopSession {
            windows: self.windows.windows().to_vec(),
            icons: self.icons.clone(),
            theme: self.theme.clone(),
            theme_set_manually: self.theme_set_manually,
            version: self.version.clone(),
        };
        persistence::save_session(&*self.store, &self.config.session_storage_key, &session);
    }
}

fn folder_hints(node: &FsNode) -> (Option<String>, Option<String>) {
    match &node.kind {
        FsNodeKind::Folder {
            icon_name,
            icon_color,
            ..
        } => (icon_name.clone(), icon_color.clone()),
        FsNodeKind::File { .. } => (None, None),
    }
}

fn sync_icon_with_node(icon: &mut DesktopIcon, node: &FsNode) {
    icon.name = node.name.clone();
    let (icon_name, icon_color) = folder_hints(node);
    icon.icon_name = icon_name;
    icon.icon_color = icon_color;
}

/// Seeds an empty filesystem from the configured seed source.
///
/// The manifest is fetched before anything is mutated. A failed fetch releases the seeding
/// claim so a later call can retry, and leaves filesystem and icons untouched.
///
/// # Errors
///
/// Returns [`SeedError::Fetch`] when the manifest cannot be fetched.
pub async fn init_fs(orchestrator: &RefCell<DesktopOrchestrator>) -> Result<SeedOutcome, SeedError> {
    let claim = orchestrator.borrow().begin_seed();
    let source = match claim {
        Ok(source) => source,
        Err(outcome) => return Ok(outcome),
    };

    let manifest = match source.fetch_manifest().await {
        Ok(manifest) => manifest,
        Err(err) => {
            orchestrator.borrow().abort_seed();
            logging::warn!("seed manifest fetch failed, seeding left for a later retry: {err}");
            return Err(SeedError::Fetch(err));
        }
    };
    let version = match source.fetch_version().await {
        Ok(version) => Some(version),
        Err(err) => {
            logging::warn!("version descriptor fetch failed during seeding: {err}");
            None
        }
    };

    let outcome = orchestrator.borrow_mut().finish_seed(&manifest, version)?;
    logging::log!("desktop seeded: {outcome:?}");
    Ok(outcome)
}

/// Re-merges the manifest when the deployed build's `sha` differs from the recorded one.
///
/// # Errors
///
/// Returns [`SeedError::Fetch`] when a fetch fails and [`SeedError::Filesystem`] when merging
/// fails.
pub async fn sync_version(
    orchestrator: &RefCell<DesktopOrchestrator>,
) -> Result<VersionSync, SeedError> {
    let source = orchestrator.borrow().seed_source();
    let latest = source.fetch_version().await.map_err(SeedError::Fetch)?;
    let recorded = orchestrator.borrow().version().map(|version| version.sha.clone());
    if recorded.as_deref() == Some(latest.sha.as_str()) {
        return Ok(VersionSync::Unchanged);
    }

    let manifest = source.fetch_manifest().await.map_err(SeedError::Fetch)?;
    let sha = latest.sha.clone();
    let report = orchestrator
        .borrow_mut()
        .apply_version_update(&manifest, latest)?;
    logging::log!("merged manifest for build {sha}: {report:?}");
    Ok(VersionSync::Merged(report))
}
