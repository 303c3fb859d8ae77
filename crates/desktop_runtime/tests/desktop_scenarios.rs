use std::{cell::RefCell, rc::Rc};

use desktop_runtime::{
    init_fs, AppId, DesktopConfig, DesktopOrchestrator, FsNode, NodeId, OpenWindowRequest,
    PasteOutcome, SeedCoordinator, SeedError, SeedOutcome, VirtualFileSystem, WindowId,
};
use futures::{channel::oneshot, executor::block_on};
use platform_host::{
    HostServices, MemoryKeyValueStore, NoopSeedSource, SeedFile, SeedManifest, SeedSource,
    SeedSourceFuture, StaticSeedSource, VersionDescriptor,
};
use pretty_assertions::assert_eq;

fn desktop() -> DesktopOrchestrator {
    DesktopOrchestrator::new(
        &HostServices::default(),
        DesktopConfig::default(),
        SeedCoordinator::default(),
    )
}

fn seed_manifest() -> SeedManifest {
    SeedManifest {
        folders: vec!["Desktop".to_string(), "Documents".to_string()],
        files: vec![
            SeedFile {
                name: "welcome.txt".to_string(),
                folder: "Desktop".to_string(),
                mime_type: "text/plain".to_string(),
                url: "/seed/welcome.txt".to_string(),
            },
            SeedFile {
                name: "photo.jpg".to_string(),
                folder: "Desktop".to_string(),
                mime_type: "image/jpeg".to_string(),
                url: "/seed/photo.jpg".to_string(),
            },
        ],
    }
}

/// Seed source whose manifest arrives only when the test sends it.
struct GatedSeedSource {
    manifest: RefCell<Option<oneshot::Receiver<SeedManifest>>>,
}

impl SeedSource for GatedSeedSource {
    fn fetch_manifest<'a>(&'a self) -> SeedSourceFuture<'a, Result<SeedManifest, String>> {
        let receiver = self.manifest.borrow_mut().take();
        Box::pin(async move {
            match receiver {
                Some(receiver) => receiver.await.map_err(|_| "manifest sender dropped".to_string()),
                None => Err("manifest already fetched".to_string()),
            }
        })
    }

    fn fetch_version<'a>(&'a self) -> SeedSourceFuture<'a, Result<VersionDescriptor, String>> {
        Box::pin(async { Err("no version published".to_string()) })
    }
}

fn assert_icon_invariant(desk: &DesktopOrchestrator) {
    let desktop_id = desk.desktop_folder_id();
    for node in desk.fs().nodes() {
        let on_desktop = desktop_id.is_some() && node.parent_id == desktop_id;
        let icons = desk
            .icons()
            .iter()
            .filter(|icon| icon.node_id == Some(node.id))
            .count();
        assert_eq!(
            icons,
            usize::from(on_desktop),
            "{} ({}) has {icons} icons",
            node.id,
            node.name
        );
    }
    for icon in desk.icons() {
        if let Some(node_id) = icon.node_id {
            let node = desk.fs().get_node(node_id).expect("icon points at a live node");
            assert_eq!(icon.name, node.name);
        }
    }
}

fn assert_tree_invariant(fs: &VirtualFileSystem) {
    for node in fs.nodes() {
        for child in node.children() {
            let child = fs.get_node(*child).expect("listed child exists");
            assert_eq!(child.parent_id, Some(node.id));
        }
        if let Some(parent_id) = node.parent_id {
            let listed = fs
                .get_children(parent_id)
                .into_iter()
                .filter(|sibling| sibling.id == node.id)
                .count();
            assert_eq!(listed, 1, "{} listed {listed} times under {parent_id}", node.id);
        }
    }
}

fn assert_no_shared_slots(desk: &DesktopOrchestrator) {
    let mut slots: Vec<(i32, i32)> = desk.icons().iter().map(|icon| (icon.x, icon.y)).collect();
    let total = slots.len();
    slots.sort_unstable();
    slots.dedup();
    assert_eq!(slots.len(), total, "two icons share a grid slot");
}

#[test]
fn desktop_folder_delete_removes_nodes_and_icons() {
    let mut desk = desktop();
    let d = desk
        .create_folder("Desktop", None, None, None)
        .expect("create desktop");
    let file = desk.create_file("a.txt", "hi", Some(d.id)).expect("create file");

    let snapshot = desk.snapshot();
    assert_eq!(
        snapshot.icon_for_node(file.id).map(|icon| icon.name.as_str()),
        Some("a.txt")
    );

    let removed = desk.delete_node(d.id);
    assert_eq!(removed.len(), 2);
    let snapshot = desk.snapshot();
    assert!(snapshot.node(d.id).is_none());
    assert!(snapshot.node(file.id).is_none());
    assert!(snapshot.icons.iter().all(|icon| icon.node_id.is_none()));
}

#[test]
fn focusing_first_window_puts_it_above_second() {
    let mut desk = desktop();
    let w1 = desk.open_window(OpenWindowRequest::new(AppId::Notes).titled("W1"));
    let w2 = desk.open_window(OpenWindowRequest::new(AppId::Notes).titled("W2"));
    assert!(w2.z_index > w1.z_index);

    assert!(desk.focus_window(w1.id));
    let z = |id: WindowId| desk.windows().get(id).map(|w| w.z_index).unwrap_or_default();
    assert!(z(w1.id) > z(w2.id));
}

#[test]
fn pinned_window_stays_above_any_focus_sequence() {
    let mut desk = desktop();
    let normals: Vec<WindowId> = (0..4)
        .map(|i| {
            desk.open_window(OpenWindowRequest::new(AppId::Notes).titled(format!("N{i}")))
                .id
        })
        .collect();
    let pinned = desk
        .open_window(OpenWindowRequest::new(AppId::Terminal).pinned_on_top())
        .id;
    let late = desk.open_window(OpenWindowRequest::new(AppId::Settings)).id;

    for round in 0..50usize {
        let target = normals[round * 7 % normals.len()];
        desk.focus_window(target);
        desk.focus_window(late);
        let pinned_z = desk.windows().get(pinned).map(|w| w.z_index).unwrap_or_default();
        for window in desk.windows().windows() {
            if window.id != pinned {
                assert!(window.z_index < pinned_z, "{} passed the pinned window", window.title);
            }
        }
    }
}

#[test]
fn copy_paste_over_existing_name_respects_replace_flag() {
    let mut desk = desktop();
    let src = desk.create_folder("src", None, None, None).expect("src");
    let dest = desk.create_folder("dest", None, None, None).expect("dest");
    let original = desk.create_file("x.txt", "new", Some(src.id)).expect("original");
    let existing = desk.create_file("x.txt", "old", Some(dest.id)).expect("existing");

    desk.copy_to_clipboard(&[original.id]);
    assert_eq!(desk.paste_conflict(Some(dest.id)), Some(existing.id));

    let before = desk.fs().len();
    assert_eq!(
        desk.paste(Some(dest.id), false).expect("paste"),
        PasteOutcome::SkippedDuplicate(existing.id)
    );
    assert_eq!(desk.fs().len(), before);
    assert_eq!(desk.clipboard().content.len(), 1);

    let PasteOutcome::Replaced { removed, created } =
        desk.paste(Some(dest.id), true).expect("paste")
    else {
        panic!("expected a replacement");
    };
    assert_eq!(removed, existing.id);
    assert!(desk.fs().get_node(existing.id).is_none());
    let replacement = desk.fs().get_node(created).expect("replacement");
    assert_eq!(replacement.name, "x.txt");
    assert_eq!(replacement.parent_id, Some(dest.id));
    assert_eq!(desk.fs().get_children(dest.id).len(), 1);
    assert_eq!(desk.clipboard().content.len(), 1);
}

#[test]
fn copying_a_folder_onto_the_desktop_copies_its_subtree_and_adds_one_icon() {
    let mut desk = desktop();
    let d = desk.create_folder("Desktop", None, None, None).expect("desktop");
    let projects = desk
        .create_folder("Projects", None, Some("briefcase".into()), None)
        .expect("projects");
    desk.create_file("plan.md", "", Some(projects.id)).expect("plan");

    desk.copy_to_clipboard(&[projects.id]);
    let PasteOutcome::Copied(copy) = desk.paste(Some(d.id), false).expect("paste") else {
        panic!("expected a copy");
    };
    let copied_children: Vec<&str> = desk
        .fs()
        .get_children(copy)
        .into_iter()
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(copied_children, vec!["plan.md"]);
    let icon = desk.snapshot().icon_for_node(copy).cloned().expect("icon");
    assert_eq!(icon.icon_name.as_deref(), Some("briefcase"));
    assert_icon_invariant(&desk);
}

#[test]
fn icon_invariant_holds_across_mixed_operations() {
    let mut desk = desktop();
    let d = desk.create_folder("Desktop", None, None, None).expect("desktop");
    let other = desk.create_folder("Other", None, None, None).expect("other");
    let parents = [Some(d.id), Some(other.id), None];

    let mut seed = 17u64;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };

    let mut created: Vec<NodeId> = Vec::new();
    for step in 0..120 {
        match next() % 5 {
            0 | 1 => {
                let parent = parents[next() % parents.len()];
                let node = if next() % 3 == 0 {
                    desk.create_folder(&format!("folder-{step}"), parent, None, None)
                } else {
                    desk.create_file(&format!("file-{step}.txt"), "", parent)
                }
                .expect("create");
                created.push(node.id);
            }
            2 if !created.is_empty() => {
                let target = created[next() % created.len()];
                desk.delete_node(target);
            }
            3 if !created.is_empty() => {
                let target = created[next() % created.len()];
                desk.move_node(target, parents[next() % parents.len()]);
            }
            4 if !created.is_empty() => {
                let target = created[next() % created.len()];
                let _ = desk.rename_node(target, &format!("renamed-{step}"));
            }
            _ => {}
        }
        assert_tree_invariant(desk.fs());
        assert_icon_invariant(&desk);
        assert_no_shared_slots(&desk);
    }
}

#[test]
fn filesystem_blob_round_trips_across_reload() {
    let store = MemoryKeyValueStore::default();
    let services = HostServices {
        storage: Rc::new(store.clone()),
        ..HostServices::default()
    };
    let config = DesktopConfig::default();
    let mut desk = DesktopOrchestrator::new(&services, config.clone(), SeedCoordinator::default());
    let docs = desk.create_folder("Documents", None, None, Some("#f80".into())).expect("docs");
    let nested = desk.create_folder("nested", Some(docs.id), None, None).expect("nested");
    desk.create_file_with_type(
        "scan.pdf",
        "",
        Some(nested.id),
        "application/pdf",
        Some("/seed/scan.pdf".into()),
    )
    .expect("scan");

    let reloaded = VirtualFileSystem::load(Rc::new(store), config.fs_storage_key.clone());
    let before: Vec<FsNode> = desk.fs().nodes().cloned().collect();
    let after: Vec<FsNode> = reloaded.nodes().cloned().collect();
    assert_eq!(after, before);
}

#[test]
fn seeding_twice_leaves_counts_unchanged() {
    let services = HostServices::in_memory(Rc::new(StaticSeedSource::new(seed_manifest())));
    let first = RefCell::new(DesktopOrchestrator::new(
        &services,
        DesktopConfig::default(),
        SeedCoordinator::default(),
    ));
    let SeedOutcome::Seeded { .. } = block_on(init_fs(&first)).expect("seed") else {
        panic!("expected seeding");
    };
    let nodes = first.borrow().fs().len();
    let icons = first.borrow().icons().len();
    assert_icon_invariant(&first.borrow());
    assert_no_shared_slots(&first.borrow());

    // A fresh page load: new coordinator, same storage.
    let second = RefCell::new(DesktopOrchestrator::new(
        &services,
        DesktopConfig::default(),
        SeedCoordinator::default(),
    ));
    assert_eq!(block_on(init_fs(&second)), Ok(SeedOutcome::AlreadySeeded));
    assert_eq!(second.borrow().fs().len(), nodes);
    assert_eq!(second.borrow().icons().len(), icons);
}

#[test]
fn failed_fetch_allows_a_later_retry() {
    let store: Rc<MemoryKeyValueStore> = Rc::new(MemoryKeyValueStore::default());
    let coordinator = SeedCoordinator::default();

    let offline = HostServices {
        storage: store.clone(),
        ..HostServices::in_memory(Rc::new(NoopSeedSource))
    };
    let desk = RefCell::new(DesktopOrchestrator::new(
        &offline,
        DesktopConfig::default(),
        coordinator.clone(),
    ));
    let err = block_on(init_fs(&desk)).expect_err("offline");
    assert!(matches!(err, SeedError::Fetch(_)));
    assert!(desk.borrow().fs().is_empty());
    assert!(desk.borrow().icons().is_empty());
    assert!(store.is_empty());

    let online = HostServices {
        storage: store,
        ..HostServices::in_memory(Rc::new(StaticSeedSource::new(seed_manifest())))
    };
    let retry = RefCell::new(DesktopOrchestrator::new(
        &online,
        DesktopConfig::default(),
        coordinator,
    ));
    assert!(matches!(
        block_on(init_fs(&retry)),
        Ok(SeedOutcome::Seeded { .. })
    ));
    let names: Vec<String> = retry
        .borrow()
        .icons()
        .iter()
        .map(|icon| icon.name.clone())
        .collect();
    assert_eq!(
        names,
        vec!["My Files", "Notes", "Terminal", "Settings", "welcome.txt", "photo.jpg"]
    );
}

#[test]
fn overlapping_init_fs_runs_only_one_seed() {
    let (sender, receiver) = oneshot::channel();
    let source = GatedSeedSource {
        manifest: RefCell::new(Some(receiver)),
    };
    let services = HostServices::in_memory(Rc::new(source));
    let desk = RefCell::new(DesktopOrchestrator::new(
        &services,
        DesktopConfig::default(),
        SeedCoordinator::default(),
    ));

    block_on(async {
        let mut first = Box::pin(init_fs(&desk));
        assert!(futures::poll!(first.as_mut()).is_pending());

        assert_eq!(init_fs(&desk).await, Ok(SeedOutcome::AlreadyStarted));
        assert!(desk.borrow().fs().is_empty());

        sender.send(seed_manifest()).expect("first call still waiting");
        assert!(matches!(first.await, Ok(SeedOutcome::Seeded { .. })));
    });

    assert_eq!(desk.borrow().fs().len(), 4);
    assert_icon_invariant(&desk.borrow());
}
