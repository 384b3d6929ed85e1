// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview page — one scan with its file info, delete and share.

use std::path::PathBuf;

use dioxus::prelude::*;

use kropscan_core::KropscanError;
use kropscan_core::types::ScanFile;

use crate::pages::background;
use crate::pages::banner::{flash, flash_error};
use crate::services::app_services::AppServices;
use crate::services::scan_actions;
use crate::state::{AppState, Banner};

#[component]
pub fn Preview() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let nav = use_navigator();
    let mut scan = use_signal(|| Option::<ScanFile>::None);
    let mut confirm_delete = use_signal(|| false);
    let mut busy = use_signal(|| false);

    let target = use_memo(move || state.read().preview.clone());
    let load_svc = svc.clone();
    use_effect(move || {
        let svc = load_svc.clone();
        let Some(path) = target() else {
            flash_error(state, &KropscanError::ScanNotFound(PathBuf::new()));
            nav.go_back();
            return;
        };
        spawn(async move {
            match background(move || scan_actions::load_preview(&svc, &path)).await {
                Ok(found) => scan.set(Some(found)),
                Err(err) => {
                    flash_error(state, &err);
                    nav.go_back();
                }
            }
        });
    });

    let Some(current) = scan.read().clone() else {
        return rsx! {
            p { style: "text-align: center; color: #aaa; margin: 48px 0;", "Loading image..." }
        };
    };

    let size_kb = current.size_kb();
    let modified = current.preview_date();
    let location = current.location();

    rsx! {
        div {
            div { style: "display: flex; align-items: center; gap: 8px;",
                button {
                    style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                    onclick: move |_| nav.go_back(),
                    "\u{2190}"
                }
                h1 { "Preview Scan" }
            }

            div { style: "text-align: center; margin: 12px 0;",
                img {
                    src: "{current.path.display()}",
                    alt: "Scan preview",
                    style: "max-width: 100%; max-height: 60vh; border: 1px solid #e0e0e0;",
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "File Info" }
                InfoRow { label: "Name", value: current.name.clone() }
                InfoRow { label: "Size", value: format!("{size_kb} KB") }
                InfoRow { label: "Modified", value: modified }
                InfoRow { label: "Location", value: location }
            }

            div { style: "display: flex; gap: 8px;",
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                    disabled: *busy.read(),
                    onclick: move |_| confirm_delete.set(true),
                    "Delete"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                    disabled: *busy.read(),
                    onclick: {
                        let svc = svc.clone();
                        let path = current.path.clone();
                        move |_| {
                            let svc = svc.clone();
                            let path = path.clone();
                            busy.set(true);
                            spawn(async move {
                                let result =
                                    background(move || scan_actions::export_share(&svc, &[path])).await;
                                busy.set(false);
                                match result {
                                    Ok(outcome) if outcome.shared => {
                                        flash(state, Banner::success("PDF ready to share"))
                                    }
                                    Ok(outcome) => flash(
                                        state,
                                        Banner::info("Sharing is not available here")
                                            .with_detail(outcome.path.display().to_string()),
                                    ),
                                    Err(err) => flash_error(state, &err),
                                }
                            });
                        }
                    },
                    "Share"
                }
            }

            if *confirm_delete.read() {
                div { style: "position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;",
                    div { style: "background: white; border-radius: 12px; padding: 20px; max-width: 320px;",
                        h3 { "Delete Scan" }
                        p { "Delete {current.name}? This cannot be undone." }
                        div { style: "display: flex; gap: 8px; justify-content: flex-end;",
                            button {
                                style: "padding: 8px 16px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                                onclick: move |_| confirm_delete.set(false),
                                "Cancel"
                            }
                            button {
                                style: "padding: 8px 16px; border-radius: 6px; border: none; background: #ff3b30; color: white;",
                                onclick: {
                                    let svc = svc.clone();
                                    let path = current.path.clone();
                                    move |_| {
                                        confirm_delete.set(false);
                                        let svc = svc.clone();
                                        let path = path.clone();
                                        busy.set(true);
                                        spawn(async move {
                                            let result =
                                                background(move || scan_actions::delete_scan(&svc, &path)).await;
                                            busy.set(false);
                                            match result {
                                                Ok(()) => {
                                                    state.write().scans_changed();
                                                    flash(state, Banner::success("Scan deleted"));
                                                    nav.go_back();
                                                }
                                                Err(err) => flash_error(state, &err),
                                            }
                                        });
                                    }
                                },
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn InfoRow(label: &'static str, value: String) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid #f0f0f0;",
            span { style: "color: #666;", "{label}" }
            span { "{value}" }
        }
    }
}
