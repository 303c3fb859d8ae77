//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived orchestrator, republishes a [`DesktopSnapshot`] after every
//! dispatched action, and runs first-run seeding plus the version check at boot.
#![allow(clippy::clone_on_copy)]

use std::{cell::RefCell, rc::Rc};

use leptos::*;
use platform_host::HostServices;

use crate::{
    config::DesktopConfig,
    model::{DesktopSnapshot, WindowId},
    orchestrator::{init_fs, sync_version, DesktopOrchestrator},
    reducer::DesktopAction,
    seed::SeedCoordinator,
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop snapshots and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Shared orchestrator. Never borrow it across an `await`.
    pub orchestrator: SharedOrchestrator,
    /// Latest published snapshot.
    pub snapshot: RwSignal<DesktopSnapshot>,
    /// Action dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches an action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Lets a window's content veto its own close.
    pub fn register_close_interceptor(
        &self,
        window_id: WindowId,
        interceptor: impl Fn() -> bool + 'static,
    ) -> bool {
        self.orchestrator
            .get_value()
            .borrow_mut()
            .register_close_interceptor(window_id, Rc::new(interceptor))
    }

    pub fn unregister_close_interceptor(&self, window_id: WindowId) -> bool {
        self.orchestrator
            .get_value()
            .borrow_mut()
            .unregister_close_interceptor(window_id)
    }
}

/// Orchestrator handle shared between the dispatch callback and boot tasks.
pub type SharedOrchestrator = StoredValue<Rc<RefCell<DesktopOrchestrator>>>;

fn publish(orchestrator: SharedOrchestrator, snapshot: RwSignal<DesktopSnapshot>) {
    let next = orchestrator.get_value().borrow().snapshot();
    snapshot.set(next);
}

fn dispatch_action(
    orchestrator: SharedOrchestrator,
    snapshot: RwSignal<DesktopSnapshot>,
    action: DesktopAction,
) {
    let desktop = orchestrator.get_value();
    let action = match action {
        DesktopAction::RequestCloseWindow { window_id } => {
            let interceptor = desktop.borrow().close_interceptor(window_id);
            // Interceptors usually dispatch a confirmation dialog, so run them unborrowed.
            if interceptor.is_some_and(|interceptor| !interceptor()) {
                return;
            }
            DesktopAction::CloseWindow { window_id }
        }
        other => other,
    };

    let result = desktop.borrow_mut().dispatch(action);
    match result {
        Ok(outcome) if outcome.changed_state() => publish(orchestrator, snapshot),
        Ok(_) => {}
        Err(err) => logging::warn!("desktop action failed: {err}"),
    }
}

fn install_boot_seeding(runtime: DesktopRuntimeContext) {
    let desktop = runtime.orchestrator.get_value();
    spawn_local(async move {
        match init_fs(&desktop).await {
            Ok(_) => match sync_version(&desktop).await {
                Ok(sync) => logging::log!("desktop version check: {sync:?}"),
                Err(err) => logging::warn!("desktop version check failed: {err}"),
            },
            Err(err) => logging::warn!("desktop seeding failed: {err}"),
        }
        publish(runtime.orchestrator, runtime.snapshot);
    });
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and seeds the desktop on boot.
pub fn DesktopProvider(
    /// Injected browser or in-memory host bundle assembled by the entry layer.
    host_services: HostServices,
    /// Runtime configuration; defaults apply when omitted.
    #[prop(optional)]
    config: Option<DesktopConfig>,
    /// Seeding guard shared with other providers on the same page.
    #[prop(optional)]
    seed_coordinator: Option<SeedCoordinator>,
    children: Children,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let config = match config.validate() {
        Ok(()) => config,
        Err(err) => {
            logging::warn!("{err}; falling back to default desktop config");
            DesktopConfig::default()
        }
    };

    let desktop = DesktopOrchestrator::new(
        &host_services,
        config,
        seed_coordinator.unwrap_or_default(),
    );
    let snapshot = create_rw_signal(desktop.snapshot());
    let orchestrator = store_value(Rc::new(RefCell::new(desktop)));

    let dispatch = Callback::new(move |action: DesktopAction| {
        dispatch_action(orchestrator, snapshot, action);
    });

    let runtime = DesktopRuntimeContext {
        orchestrator,
        snapshot,
        dispatch,
    };

    provide_context(runtime.clone());
    install_boot_seeding(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
