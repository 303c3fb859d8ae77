//! Desktop icon glyphs and grid slot allocation.

use crate::{
    config::IconGridConfig,
    model::{AppId, DesktopIcon, FsNode, FsNodeKind},
};

/// Fallback glyph id for a filesystem node's desktop icon.
pub fn glyph_for_node(node: &FsNode) -> &'static str {
    match &node.kind {
        FsNodeKind::Folder { .. } => "folder",
        FsNodeKind::File { mime_type, .. } => match AppId::for_mime_type(mime_type) {
            AppId::PdfViewer => "document-pdf",
            AppId::ImageViewer => "image",
            _ => "document-text",
        },
    }
}

/// First free grid slot, scanning column-major, as pixel coordinates.
///
/// A slot is free when no existing icon sits exactly at its position.
pub fn next_free_slot(grid: &IconGridConfig, icons: &[DesktopIcon]) -> (i32, i32) {
    let rows = grid.rows_per_column.max(1);
    // One column past what the current icons could fill always has a free cell.
    let max_cols = icons.len() as u32 / rows + 1;
    for col in 0..=max_cols {
        for row in 0..rows {
            let slot = grid.slot_position(col, row);
            if !icons.iter().any(|icon| (icon.x, icon.y) == slot) {
                return slot;
            }
        }
    }
    grid.slot_position(max_cols + 1, 0)
}
