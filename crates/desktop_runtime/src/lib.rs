//! Browser desktop shell core: virtual filesystem, window manager, clipboard, close
//! interceptors, and the orchestrator that keeps desktop icons consistent with all of them.

pub mod apps;
pub mod clipboard;
pub mod close_interceptor;
pub mod config;
pub mod icons;
pub mod model;
pub mod orchestrator;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod seed;
pub mod vfs;
pub mod window_manager;

pub use clipboard::ClipboardController;
pub use close_interceptor::{CloseInterceptor, CloseInterceptorRegistry};
pub use config::{ConfigError, DesktopConfig, IconGridConfig};
pub use model::*;
pub use orchestrator::{
    init_fs, sync_version, CloseOutcome, DesktopError, DesktopOrchestrator, PasteOutcome,
};
pub use persistence::{load_session, save_session, DesktopSession};
pub use reducer::{reduce_desktop, ActionOutcome, DesktopAction};
pub use runtime_context::{
    use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, SharedOrchestrator,
};
pub use seed::{MergeReport, SeedCoordinator, SeedError, SeedOutcome, VersionSync};
pub use vfs::{FsError, VirtualFileSystem};
pub use window_manager::{WindowManager, ALWAYS_ON_TOP_Z_BASE};
