// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// KropScan — crop, keep and export document scans
//
// Entry point. Initialises logging, backend services, app state, and launches
// the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use kropscan_core::human_errors::humanize_error;

use pages::banner::BannerView;
use pages::cropper::Cropper;
use pages::preview::Preview;
use pages::scans::Scans;
use pages::settings::Settings;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("KropScan starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Cropper {},
    #[route("/scans")]
    Scans {},
    #[route("/preview")]
    Preview {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| {
        AppServices::init().map_err(|e| {
            tracing::error!(error = %e, "app services failed to initialise");
            humanize_error(&e)
        })
    });

    match svc {
        Ok(svc) => rsx! { Ready { svc } },
        Err(err) => rsx! {
            div { style: "padding: 32px; font-family: system-ui, -apple-system, sans-serif;",
                h1 { "KropScan could not start" }
                p { "{err.message}" }
                p { style: "color: #666;", "{err.suggestion}" }
            }
        },
    }
}

/// Provides services and state as context once initialisation succeeded.
#[component]
fn Ready(svc: AppServices) -> Element {
    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent bottom tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            BannerView {}

            // Page content
            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }

            // Bottom tab bar
            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; padding: 8px 0; border-top: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Cropper {}, label: "Scan", icon: "S" }
                TabButton { to: Route::Scans {}, label: "My Scans", icon: "M" }
                TabButton { to: Route::Settings {}, label: "Settings", icon: "\u{2699}" }
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}
