//! Per-window close interceptors.
//!
//! A window's content registers a predicate that returns `true` when the window may close now,
//! or `false` when it has taken over the close (for example to ask about unsaved changes).

use std::{collections::HashMap, rc::Rc};

use crate::model::WindowId;

/// Predicate consulted before a window closes.
pub type CloseInterceptor = Rc<dyn Fn() -> bool>;

#[derive(Clone, Default)]
pub struct CloseInterceptorRegistry {
    interceptors: HashMap<WindowId, CloseInterceptor>,
}

impl std::fmt::Debug for CloseInterceptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.interceptors.keys().collect();
        ids.sort();
        f.debug_struct("CloseInterceptorRegistry")
            .field("windows", &ids)
            .finish()
    }
}

impl CloseInterceptorRegistry {
    /// Installs `interceptor` for `window_id`, replacing any previous one.
    pub fn register(&mut self, window_id: WindowId, interceptor: CloseInterceptor) {
        self.interceptors.insert(window_id, interceptor);
    }

    pub fn unregister(&mut self, window_id: WindowId) -> bool {
        self.interceptors.remove(&window_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn get(&self, window_id: WindowId) -> Option<CloseInterceptor> {
        self.interceptors.get(&window_id).cloned()
    }

    /// Runs the interceptor for `window_id`. Windows without one may always close.
    pub fn allows_close(&self, window_id: WindowId) -> bool {
        self.get(window_id).map_or(true, |interceptor| interceptor())
    }
}
