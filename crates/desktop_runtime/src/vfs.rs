//! Virtual filesystem: a flat node collection with parent/child edges, persisted write-through.
//!
//! Every successful mutation rewrites the whole collection under one storage key as a JSON array
//! of `[id, node]` pairs. A missing or unreadable blob yields an empty filesystem.

use std::{collections::BTreeMap, rc::Rc};

use leptos::logging;
use platform_host::{load_json_with, next_monotonic_timestamp_ms, save_json_with, KeyValueStore};
use thiserror::Error;

use crate::model::{FsNode, FsNodeKind, NodeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Hard failures at the filesystem boundary.
pub enum FsError {
    /// The target node does not exist.
    #[error("{0} not found")]
    NotFound(NodeId),
    /// The operation needs a file but the node is a folder.
    #[error("{0} is a folder, expected a file")]
    TypeMismatch(NodeId),
    /// The requested parent is missing or is not a folder.
    #[error("{0} is not an existing folder")]
    InvalidParent(NodeId),
}

pub struct VirtualFileSystem {
    nodes: BTreeMap<NodeId, FsNode>,
    next_node_id: u64,
    store: Rc<dyn KeyValueStore>,
    storage_key: String,
}

impl std::fmt::Debug for VirtualFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFileSystem")
            .field("nodes", &self.nodes.len())
            .field("next_node_id", &self.next_node_id)
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

impl VirtualFileSystem {
    /// Restores the filesystem persisted under `storage_key`, or starts empty.
    pub fn load(store: Rc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let pairs = match load_json_with::<_, Vec<(NodeId, FsNode)>>(&*store, &storage_key) {
            Ok(pairs) => pairs.unwrap_or_default(),
            Err(err) => {
                logging::warn!("filesystem blob unreadable, starting empty: {err}");
                Vec::new()
            }
        };

        let mut nodes = BTreeMap::new();
        for (id, mut node) in pairs {
            node.id = id;
            nodes.insert(id, node);
        }
        let next_node_id = nodes
            .keys()
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        let mut fs = Self {
            nodes,
            next_node_id,
            store,
            storage_key,
        };
        let repaired = fs.repair_links();
        if repaired > 0 {
            logging::warn!("filesystem blob had {repaired} broken links, repaired on load");
            fs.persist();
        }
        fs
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FsNode> {
        self.nodes.values()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&FsNode> {
        self.nodes.get(&id)
    }

    /// Children of `folder_id` in their stored order. Unknown ids and files yield nothing.
    pub fn get_children(&self, folder_id: NodeId) -> Vec<&FsNode> {
        self.nodes
            .get(&folder_id)
            .map(|folder| {
                folder
                    .children()
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_root_nodes(&self) -> Vec<&FsNode> {
        self.nodes
            .values()
            .filter(|node| node.parent_id.is_none())
            .collect()
    }

    /// Finds a node named `name` directly under `parent_id` (the root when `None`).
    pub fn find_child_by_name(&self, parent_id: Option<NodeId>, name: &str) -> Option<&FsNode> {
        match parent_id {
            Some(parent) => self
                .get_children(parent)
                .into_iter()
                .find(|node| node.name == name),
            None => self
                .nodes
                .values()
                .find(|node| node.parent_id.is_none() && node.name == name),
        }
    }

    pub fn find_root_folder(&self, name: &str) -> Option<&FsNode> {
        self.nodes
            .values()
            .find(|node| node.parent_id.is_none() && node.is_folder() && node.name == name)
    }

    /// Returns `true` when `ancestor` appears on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.nodes.get(&node).and_then(|n| n.parent_id);
        // Bounded walk: a corrupt blob must not hang the caller.
        for _ in 0..self.nodes.len() {
            match cursor {
                Some(id) if id == ancestor => return true,
                Some(id) => cursor = self.nodes.get(&id).and_then(|n| n.parent_id),
                None => return false,
            }
        }
        false
    }

    /// Every transitive descendant of `id`, depth-first, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(&id)
            .map(|node| node.children().iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if out.contains(&next) || next == id {
                continue;
            }
            out.push(next);
            if let Some(node) = self.nodes.get(&next) {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        out
    }

    /// Creates a file under `parent_id` (the root when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidParent`] when `parent_id` is not an existing folder.
    pub fn create_file(
        &mut self,
        name: &str,
        content: &str,
        parent_id: Option<NodeId>,
        mime_type: &str,
        url: Option<String>,
    ) -> Result<FsNode, FsError> {
        let node = self.insert_node(
            name,
            parent_id,
            FsNodeKind::File {
                content: content.to_string(),
                mime_type: mime_type.to_string(),
                url,
            },
        )?;
        self.persist();
        Ok(node)
    }

    /// Creates an empty folder under `parent_id` (the root when `None`).
    ///
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
        let node = self.insert_node(
            name,
            parent_id,
            FsNodeKind::Folder {
                children: Vec::new(),
                icon_name,
                icon_color,
            },
        )?;
        self.persist();
        Ok(node)
    }

    /// Replaces a file's content and bumps its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for an unknown id and [`FsError::TypeMismatch`] for a folder.
    pub fn update_file(&mut self, id: NodeId, new_content: &str) -> Result<FsNode, FsError> {
        let node = self.nodes.get_mut(&id).ok_or(FsError::NotFound(id))?;
        let FsNodeKind::File { content, .. } = &mut node.kind else {
            return Err(FsError::TypeMismatch(id));
        };
        *content = new_content.to_string();
        node.updated_at_unix_ms = next_monotonic_timestamp_ms();
        let updated = node.clone();
        self.persist();
        Ok(updated)
    }

    /// Renames a node in place.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] for an unknown id.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<FsNode, FsError> {
        let node = self.nodes.get_mut(&id).ok_or(FsError::NotFound(id))?;
        node.name = new_name.to_string();
        node.updated_at_unix_ms = next_monotonic_timestamp_ms();
        let renamed = node.clone();
        self.persist();
        Ok(renamed)
    }

    /// Deletes a node and, for folders, its whole subtree.
    ///
    /// Unknown ids are ignored. Returns the ids that were removed.
    pub fn delete(&mut self, id: NodeId) -> Vec<NodeId> {
        let Some(parent_id) = self.nodes.get(&id).map(|node| node.parent_id) else {
            return Vec::new();
        };

        let mut removed = self.descendants(id);
        removed.push(id);
        if let Some(parent) = parent_id {
            self.unlink_child(parent, id);
        }
        for node_id in &removed {
            self.nodes.remove(node_id);
        }
        self.persist();
        removed
    }

    /// Reparents `id` under `new_parent_id` (the root when `None`).
    ///
    /// Returns `true` when the node ends up under the requested parent. Moves onto itself, into
    /// its own subtree, under a file, or involving an unknown id are refused without change.
    pub fn move_node(&mut self, id: NodeId, new_parent_id: Option<NodeId>) -> bool {
        let Some(old_parent_id) = self.nodes.get(&id).map(|node| node.parent_id) else {
            return false;
        };
        if let Some(parent) = new_parent_id {
            let parent_is_folder = self.nodes.get(&parent).is_some_and(FsNode::is_folder);
            if parent == id || !parent_is_folder || self.is_ancestor(id, parent) {
                return false;
            }
        }
        if old_parent_id == new_parent_id {
            return true;
        }

        if let Some(old_parent) = old_parent_id {
            self.unlink_child(old_parent, id);
        }
        if let Some(parent) = new_parent_id {
            self.link_child(parent, id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent_id = new_parent_id;
            node.updated_at_unix_ms = next_monotonic_timestamp_ms();
        }
        self.persist();
        true
    }

    /// Creates a copy of `template` under `parent_id`.
    ///
    /// When the template still exists its live subtree is copied recursively; otherwise a single
    /// node is created from the template's own fields.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidParent`] when `parent_id` is not an existing folder, or when it
    /// lies inside the subtree being copied.
    pub fn copy_node(
        &mut self,
        template: &FsNode,
        parent_id: Option<NodeId>,
    ) -> Result<FsNode, FsError> {
        let live = self.nodes.contains_key(&template.id);
        if let Some(parent) = parent_id {
            if live && (parent == template.id || self.is_ancestor(template.id, parent)) {
                return Err(FsError::InvalidParent(parent));
            }
        }

        let root = self.insert_node(&template.name, parent_id, empty_kind_like(&template.kind))?;
        if live {
            let mut pending = vec![(template.id, root.id)];
            while let Some((source_id, copy_id)) = pending.pop() {
                let children: Vec<FsNode> = self
                    .get_children(source_id)
                    .into_iter()
                    .cloned()
                    .collect();
                for child in children {
                    let copied =
                        self.insert_node(&child.name, Some(copy_id), empty_kind_like(&child.kind))?;
                    if child.is_folder() {
                        pending.push((child.id, copied.id));
                    }
                }
            }
        }
        self.persist();
        Ok(self.nodes.get(&root.id).cloned().unwrap_or(root))
    }

    /// Serialized form of the collection as stored: `[[id, node], ...]`.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_blob(&self) -> Result<String, String> {
        serde_json::to_string(&self.pairs()).map_err(|e| e.to_string())
    }

    fn pairs(&self) -> Vec<(NodeId, &FsNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node)).collect()
    }

    fn persist(&self) {
        if let Err(err) = save_json_with(&*self.store, &self.storage_key, &self.pairs()) {
            logging::warn!("persist filesystem failed: {err}");
        }
    }

    fn insert_node(
        &mut self,
        name: &str,
        parent_id: Option<NodeId>,
        kind: FsNodeKind,
    ) -> Result<FsNode, FsError> {
        if let Some(parent) = parent_id {
            if !self.nodes.get(&parent).is_some_and(FsNode::is_folder) {
                return Err(FsError::InvalidParent(parent));
            }
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        let now = next_monotonic_timestamp_ms();
        let node = FsNode {
            id,
            name: name.to_string(),
            parent_id,
            created_at_unix_ms: now,
            updated_at_unix_ms: now,
            kind,
        };
        self.nodes.insert(id, node.clone());
        if let Some(parent) = parent_id {
            self.link_child(parent, id);
        }
        Ok(node)
    }

    fn link_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(FsNode {
            kind: FsNodeKind::Folder { children, .. },
            ..
        }) = self.nodes.get_mut(&parent)
        {
            if !children.contains(&child) {
                children.push(child);
            }
        }
    }

    fn unlink_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(FsNode {
            kind: FsNodeKind::Folder { children, .. },
            ..
        }) = self.nodes.get_mut(&parent)
        {
            children.retain(|id| *id != child);
        }
    }

    /// Drops dangling or duplicated child ids and detaches nodes whose parent no longer lists
    /// them. Returns the number of fixes applied.
    fn repair_links(&mut self) -> usize {
        let mut fixes = 0;
        let snapshot: BTreeMap<NodeId, Option<NodeId>> = self
            .nodes
            .iter()
            .map(|(id, node)| (*id, node.parent_id))
            .collect();

        for (folder_id, node) in self.nodes.iter_mut() {
            if let FsNodeKind::Folder { children, .. } = &mut node.kind {
                let before = children.len();
                let mut seen = Vec::with_capacity(before);
                children.retain(|child| {
                    let keep = snapshot.get(child) == Some(&Some(*folder_id)) && !seen.contains(child);
                    if keep {
                        seen.push(*child);
                    }
                    keep
                });
                fixes += before - children.len();
            }
        }

        let orphans: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| {
                node.parent_id.is_some_and(|parent| {
                    !self
                        .nodes
                        .get(&parent)
                        .is_some_and(|p| p.children().contains(&node.id))
                })
            })
            .map(|node| node.id)
            .collect();
        for orphan in orphans {
            let Some(parent) = self.nodes.get(&orphan).and_then(|node| node.parent_id) else {
                continue;
            };
            if self.nodes.get(&parent).is_some_and(FsNode::is_folder) {
                self.link_child(parent, orphan);
            } else if let Some(node) = self.nodes.get_mut(&orphan) {
                node.parent_id = None;
            }
            fixes += 1;
        }
        fixes
    }
}

fn empty_kind_like(kind: &FsNodeKind) -> FsNodeKind {
    match kind {
        FsNodeKind::File {
            content,
            mime_type,
            url,
        } => FsNodeKind::File {
            content: content.clone(),
            mime_type: mime_type.clone(),
            url: url.clone(),
        },
        FsNodeKind::Folder {
            icon_name,
            icon_color,
            ..
        } => FsNodeKind::Folder {
            children: Vec::new(),
            icon_name: icon_name.clone(),
            icon_color: icon_color.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DEFAULT_MIME_TYPE;

    const KEY: &str = "test.fs";

    fn fresh() -> (VirtualFileSystem, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::default();
        (VirtualFileSystem::load(Rc::new(store.clone()), KEY), store)
    }

    fn assert_tree_invariant(fs: &VirtualFileSystem) {
        for node in fs.nodes() {
            for child in node.children() {
                assert_eq!(
                    fs.get_node(*child).and_then(|c| c.parent_id),
                    Some(node.id),
                    "child {child} of {} points elsewhere",
                    node.id
                );
            }
            if let Some(parent) = node.parent_id {
                let hits = fs
                    .get_children(parent)
                    .iter()
                    .filter(|c| c.id == node.id)
                    .count();
                assert_eq!(hits, 1, "{} listed {hits} times under {parent}", node.id);
            }
        }
    }

    #[test]
    fn create_links_child_into_parent_and_persists() {
        let (mut fs, store) = fresh();
        let docs = fs.create_folder("Documents", None, None, None).unwrap();
        let file = fs
            .create_file("a.txt", "hi", Some(docs.id), DEFAULT_MIME_TYPE, None)
            .unwrap();

        assert_eq!(fs.get_children(docs.id)[0].id, file.id);
        assert_eq!(fs.get_root_nodes().len(), 1);
        assert!(store.load_raw(KEY).unwrap().is_some());
        assert_tree_invariant(&fs);
    }

    #[test]
    fn create_under_missing_or_file_parent_is_rejected() {
        let (mut fs, _) = fresh();
        let file = fs
            .create_file("a.txt", "", None, DEFAULT_MIME_TYPE, None)
            .unwrap();
        assert_eq!(
            fs.create_folder("x", Some(file.id), None, None),
            Err(FsError::InvalidParent(file.id))
        );
        assert_eq!(
            fs.create_file("b", "", Some(NodeId(99)), DEFAULT_MIME_TYPE, None),
            Err(FsError::InvalidParent(NodeId(99)))
        );
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn get_children_of_unknown_or_file_is_empty() {
        let (mut fs, _) = fresh();
        let file = fs
            .create_file("a.txt", "", None, DEFAULT_MIME_TYPE, None)
            .unwrap();
        assert!(fs.get_children(NodeId(42)).is_empty());
        assert!(fs.get_children(file.id).is_empty());
    }

    #[test]
    fn update_file_replaces_content_and_bumps_timestamp() {
        let (mut fs, _) = fresh();
        let file = fs
            .create_file("a.txt", "old", None, DEFAULT_MIME_TYPE, None)
            .unwrap();
        let updated = fs.update_file(file.id, "new").unwrap();
        assert!(updated.updated_at_unix_ms > file.updated_at_unix_ms);
        assert_eq!(updated.created_at_unix_ms, file.created_at_unix_ms);
        assert!(matches!(
            &fs.get_node(file.id).unwrap().kind,
            FsNodeKind::File { content, .. } if content == "new"
        ));
    }

    #[test]
    fn update_file_errors_on_unknown_id_and_folder() {
        let (mut fs, _) = fresh();
        let folder = fs.create_folder("f", None, None, None).unwrap();
        assert_eq!(
            fs.update_file(NodeId(77), "x"),
            Err(FsError::NotFound(NodeId(77)))
        );
        assert_eq!(
            fs.update_file(folder.id, "x"),
            Err(FsError::TypeMismatch(folder.id))
        );
    }

    #[test]
    fn delete_folder_removes_every_descendant() {
        let (mut fs, _) = fresh();
        let root = fs.create_folder("root", None, None, None).unwrap();
        let a = fs.create_folder("a", Some(root.id), None, None).unwrap();
        let b = fs.create_folder("b", Some(a.id), None, None).unwrap();
        let leaf = fs
            .create_file("leaf", "", Some(b.id), DEFAULT_MIME_TYPE, None)
            .unwrap();
        let sibling = fs
            .create_file("s", "", Some(root.id), DEFAULT_MIME_TYPE, None)
            .unwrap();
        let keep = fs.create_folder("keep", None, None, None).unwrap();

        let removed = fs.delete(a.id);
        assert_eq!(removed.len(), 3);
        for gone in [a.id, b.id, leaf.id] {
            assert!(fs.get_node(gone).is_none());
        }
        assert_eq!(
            fs.get_children(root.id)
                .iter()
                .map(|n| n.id)
                .collect::<Vec<_>>(),
            vec![sibling.id]
        );
        assert!(fs.get_node(keep.id).is_some());
        assert_tree_invariant(&fs);
    }

    #[test]
    fn delete_unknown_id_is_a_silent_noop() {
        let (mut fs, _) = fresh();
        fs.create_folder("x", None, None, None).unwrap();
        assert!(fs.delete(NodeId(1234)).is_empty());
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn move_updates_both_parents() {
        let (mut fs, _) = fresh();
        let a = fs.create_folder("a", None, None, None).unwrap();
        let b = fs.create_folder("b", None, None, None).unwrap();
        let file = fs
            .create_file("f", "", Some(a.id), DEFAULT_MIME_TYPE, None)
            .unwrap();

        assert!(fs.move_node(file.id, Some(b.id)));
        assert!(fs.get_children(a.id).is_empty());
        assert_eq!(fs.get_children(b.id)[0].id, file.id);
        assert_eq!(fs.get_node(file.id).unwrap().parent_id, Some(b.id));

        assert!(fs.move_node(file.id, None));
        assert!(fs.get_children(b.id).is_empty());
        assert_eq!(fs.get_root_nodes().len(), 3);
        assert_tree_invariant(&fs);
    }

    #[test]
    fn move_refuses_cycles_and_invalid_targets() {
        let (mut fs, _) = fresh();
        let outer = fs.create_folder("outer", None, None, None).unwrap();
        let inner = fs.create_folder("inner", Some(outer.id), None, None).unwrap();
        let file = fs
            .create_file("f", "", None, DEFAULT_MIME_TYPE, None)
            .unwrap();

        assert!(!fs.move_node(outer.id, Some(outer.id)));
        assert!(!fs.move_node(outer.id, Some(inner.id)));
        assert!(!fs.move_node(inner.id, Some(file.id)));
        assert!(!fs.move_node(NodeId(500), None));
        assert_eq!(fs.get_node(outer.id).unwrap().parent_id, None);
        assert_eq!(fs.get_node(inner.id).unwrap().parent_id, Some(outer.id));
        assert_tree_invariant(&fs);
    }

    #[test]
    fn reload_round_trips_the_collection() {
        let (mut fs, store) = fresh();
        let desk = fs
            .create_folder("Desktop", None, Some("desktop".into()), Some("#0af".into()))
            .unwrap();
        fs.create_file(
            "paper.pdf",
            "",
            Some(desk.id),
            "application/pdf",
            Some("/seed/paper.pdf".into()),
        )
        .unwrap();
        fs.create_file("a.txt", "hello", Some(desk.id), DEFAULT_MIME_TYPE, None)
            .unwrap();

        let reloaded = VirtualFileSystem::load(Rc::new(store), KEY);
        assert_eq!(
            reloaded.nodes().cloned().collect::<Vec<_>>(),
            fs.nodes().cloned().collect::<Vec<_>>()
        );
        assert_eq!(reloaded.to_blob().unwrap(), fs.to_blob().unwrap());
    }

    #[test]
    fn reloaded_filesystem_never_reuses_ids() {
        let (mut fs, store) = fresh();
        let first = fs.create_folder("a", None, None, None).unwrap();
        let mut reloaded = VirtualFileSystem::load(Rc::new(store), KEY);
        let second = reloaded.create_folder("b", None, None, None).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn corrupt_blob_yields_empty_filesystem() {
        let store = MemoryKeyValueStore::default();
        store.save_raw(KEY, "{not json").unwrap();
        let fs = VirtualFileSystem::load(Rc::new(store), KEY);
        assert!(fs.is_empty());
    }

    #[test]
    fn blob_is_an_array_of_id_node_pairs() {
        let (mut fs, _) = fresh();
        let folder = fs.create_folder("a", None, None, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs.to_blob().unwrap()).unwrap();
        assert_eq!(value[0][0], serde_json::json!(folder.id.0));
        assert_eq!(value[0][1]["name"], serde_json::json!("a"));
        assert_eq!(value[0][1]["kind"]["type"], serde_json::json!("folder"));
    }

    #[test]
    fn load_repairs_dangling_children() {
        let (mut fs, store) = fresh();
        let folder = fs.create_folder("a", None, None, None).unwrap();
        let mut raw: serde_json::Value =
            serde_json::from_str(&store.load_raw(KEY).unwrap().unwrap()).unwrap();
        raw[0][1]["kind"]["children"] = serde_json::json!([404]);
        store.save_raw(KEY, &raw.to_string()).unwrap();

        let reloaded = VirtualFileSystem::load(Rc::new(store), KEY);
        assert!(reloaded.get_node(folder.id).unwrap().children().is_empty());
    }

    #[test]
    fn copy_node_duplicates_live_subtree() {
        let (mut fs, _) = fresh();
        let src = fs.create_folder("src", None, None, None).unwrap();
        let nested = fs.create_folder("nested", Some(src.id), None, None).unwrap();
        fs.create_file("deep.txt", "d", Some(nested.id), DEFAULT_MIME_TYPE, None)
            .unwrap();
        let dest = fs.create_folder("dest", None, None, None).unwrap();

        let copy = fs.copy_node(&src, Some(dest.id)).unwrap();
        assert_ne!(copy.id, src.id);
        let copied_nested = fs.get_children(copy.id)[0].clone();
        assert_eq!(copied_nested.name, "nested");
        assert_ne!(copied_nested.id, nested.id);
        assert_eq!(fs.get_children(copied_nested.id)[0].name, "deep.txt");
        assert_eq!(fs.len(), 7);
        assert_tree_invariant(&fs);
    }

    #[test]
    fn copy_node_into_own_subtree_is_rejected() {
        let (mut fs, _) = fresh();
        let src = fs.create_folder("src", None, None, None).unwrap();
        let inner = fs.create_folder("inner", Some(src.id), None, None).unwrap();
        assert_eq!(
            fs.copy_node(&src, Some(inner.id)),
            Err(FsError::InvalidParent(inner.id))
        );
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn descendants_and_ancestry_agree() {
        let (mut fs, _) = fresh();
        let a = fs.create_folder("a", None, None, None).unwrap();
        let b = fs.create_folder("b", Some(a.id), None, None).unwrap();
        let c = fs
            .create_file("c", "", Some(b.id), DEFAULT_MIME_TYPE, None)
            .unwrap();
        assert_eq!(fs.descendants(a.id), vec![b.id, c.id]);
        assert!(fs.is_ancestor(a.id, c.id));
        assert!(!fs.is_ancestor(c.id, a.id));
        assert_eq!(fs.find_child_by_name(Some(b.id), "c").map(|n| n.id), Some(c.id));
        assert_eq!(fs.find_root_folder("a").map(|n| n.id), Some(a.id));
    }
}
