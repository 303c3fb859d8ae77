//! Built-in mini-app registry: labels, desktop shortcut placement, and default window requests.

use serde_json::json;

use crate::model::{AppId, FsNode, OpenWindowRequest, WindowRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: AppId,
    pub launcher_label: &'static str,
    pub desktop_icon_label: &'static str,
    pub show_on_desktop: bool,
    pub default_size: (i32, i32),
    pub min_size: (i32, i32),
}

// Order matters: shortcut icons take the earliest grid slots in this order.
const APP_REGISTRY: [AppDescriptor; 6] = [
    AppDescriptor {
        app_id: AppId::Explorer,
        launcher_label: "Explorer",
        desktop_icon_label: "My Files",
        show_on_desktop: true,
        default_size: (720, 460),
        min_size: (320, 220),
    },
    AppDescriptor {
        app_id: AppId::Notes,
        launcher_label: "Notes",
        desktop_icon_label: "Notes",
        show_on_desktop: true,
        default_size: (640, 480),
        min_size: (280, 200),
    },
    AppDescriptor {
        app_id: AppId::Terminal,
        launcher_label: "Terminal",
        desktop_icon_label: "Terminal",
        show_on_desktop: true,
        default_size: (640, 400),
        min_size: (320, 200),
    },
    AppDescriptor {
        app_id: AppId::Settings,
        launcher_label: "Settings",
        desktop_icon_label: "Settings",
        show_on_desktop: true,
        default_size: (560, 440),
        min_size: (360, 300),
    },
    AppDescriptor {
        app_id: AppId::PdfViewer,
        launcher_label: "PDF Viewer",
        desktop_icon_label: "PDF Viewer",
        show_on_desktop: false,
        default_size: (760, 560),
        min_size: (320, 240),
    },
    AppDescriptor {
        app_id: AppId::ImageViewer,
        launcher_label: "Image Viewer",
        desktop_icon_label: "Images",
        show_on_desktop: false,
        default_size: (640, 480),
        min_size: (240, 200),
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

pub fn app_descriptor(app_id: AppId) -> &'static AppDescriptor {
    APP_REGISTRY
        .iter()
        .find(|entry| entry.app_id == app_id)
        .unwrap_or(&APP_REGISTRY[0])
}

/// Apps that get a desktop shortcut on first run, in grid order.
pub fn desktop_shortcut_apps() -> Vec<AppId> {
    APP_REGISTRY
        .iter()
        .filter(|entry| entry.show_on_desktop)
        .map(|entry| entry.app_id)
        .collect()
}

/// Window request for launching `app_id` with its registry defaults.
pub fn default_open_request(app_id: AppId) -> OpenWindowRequest {
    let descriptor = app_descriptor(app_id);
    let mut req = OpenWindowRequest::new(app_id);
    req.title = Some(descriptor.launcher_label.to_string());
    req.rect = Some(WindowRect {
        w: descriptor.default_size.0,
        h: descriptor.default_size.1,
        ..WindowRect::default()
    });
    req.min_width = Some(descriptor.min_size.0);
    req.min_height = Some(descriptor.min_size.1);
    req
}

/// Window request for opening a filesystem node in the app that handles it.
pub fn open_request_for_node(node: &FsNode) -> OpenWindowRequest {
    let mut req = default_open_request(node.opening_app());
    req.title = Some(node.name.clone());
    req.content_data = json!({ "node_id": node.id.0 });
    req
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FsNodeKind, NodeId};

    #[test]
    fn registry_ids_are_unique() {
        let mut seen = Vec::new();
        for entry in app_registry() {
            assert!(!seen.contains(&entry.app_id), "{:?} listed twice", entry.app_id);
            seen.push(entry.app_id);
        }
    }

    #[test]
    fn shortcut_apps_keep_registry_order() {
        assert_eq!(
            desktop_shortcut_apps(),
            vec![AppId::Explorer, AppId::Notes, AppId::Terminal, AppId::Settings]
        );
    }

    #[test]
    fn node_requests_route_by_mime_type() {
        let node = FsNode {
            id: NodeId(9),
            name: "paper.pdf".to_string(),
            parent_id: None,
            created_at_unix_ms: 1,
            updated_at_unix_ms: 1,
            kind: FsNodeKind::File {
                content: String::new(),
                mime_type: "application/pdf".to_string(),
                url: Some("/seed/paper.pdf".to_string()),
            },
        };
        let req = open_request_for_node(&node);
        assert_eq!(req.app_id, AppId::PdfViewer);
        assert_eq!(req.title.as_deref(), Some("paper.pdf"));
        assert_eq!(req.content_data["node_id"], 9);
    }
}
