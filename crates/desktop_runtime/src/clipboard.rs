//! Single process-wide clipboard holding one pending copy or cut batch.
//!
//! The controller only records intent. Paste resolution lives in
//! [`crate::orchestrator::DesktopOrchestrator::paste`].

use crate::model::{Clipboard, ClipboardAction, FsNode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardController {
    state: Clipboard,
}

impl ClipboardController {
    pub fn state(&self) -> &Clipboard {
        &self.state
    }

    /// Replaces the clipboard with a copy batch.
    pub fn copy(&mut self, nodes: Vec<FsNode>) {
        self.replace(nodes, ClipboardAction::Copy);
    }

    /// Replaces the clipboard with a cut batch.
    pub fn cut(&mut self, nodes: Vec<FsNode>) {
        self.replace(nodes, ClipboardAction::Cut);
    }

    pub fn clear(&mut self) {
        self.state = Clipboard::default();
    }

    pub fn action(&self) -> ClipboardAction {
        self.state.action
    }

    /// First pending node; paste acts on this one only.
    pub fn first(&self) -> Option<&FsNode> {
        if self.state.is_empty() {
            None
        } else {
            self.state.content.first()
        }
    }

    fn replace(&mut self, nodes: Vec<FsNode>, action: ClipboardAction) {
        self.state = if nodes.is_empty() {
            Clipboard::default()
        } else {
            Clipboard {
                content: nodes,
                action,
            }
        };
    }
}
