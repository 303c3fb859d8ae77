use desktop_runtime::{use_desktop_runtime, DesktopConfig, DesktopProvider};
use leptos::*;
use leptos_meta::*;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Web Desktop" />
        <Meta name="description" content="A desktop operating-system shell in a browser tab." />

        <main class="site-root">
            <DesktopEntry />
        </main>
    }
}

/// Wires browser storage and the site's seed files into the desktop runtime.
#[component]
pub fn DesktopEntry() -> impl IntoView {
    let config = DesktopConfig::default();
    let host_services =
        platform_host_web::build_host_services(&config.manifest_url, &config.version_url);
    logging::log!(
        "desktop host strategy: {}",
        platform_host_web::host_strategy_name()
    );

    view! {
        <DesktopProvider host_services=host_services config=config>
            <DesktopSurface />
        </DesktopProvider>
    }
}

/// Root element the presentation layer renders into. Exposes live counts as data attributes.
#[component]
fn DesktopSurface() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let windows = move || runtime.snapshot.with(|snapshot| snapshot.windows.len());
    let icons = move || runtime.snapshot.with(|snapshot| snapshot.icons.len());
    let dark = move || runtime.snapshot.with(|snapshot| snapshot.theme.dark_mode);

    view! {
        <div
            class="desktop-surface"
            class:dark=dark
            data-windows=windows
            data-icons=icons
        ></div>
    }
}
