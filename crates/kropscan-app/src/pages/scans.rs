// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scans page — grid of saved scans with selection, batch delete and PDF export.
//
// Right-click (long-press on touch screens) starts selection mode.

use std::path::PathBuf;

use dioxus::prelude::*;

use kropscan_core::KropscanError;
use kropscan_core::types::ScanFile;
use kropscan_store::{ScanBrowser, TapOutcome};

use crate::Route;
use crate::pages::background;
use crate::pages::banner::{flash, flash_error};
use crate::services::app_services::AppServices;
use crate::services::scan_actions::{self, ExportOutcome};
use crate::state::{AppState, Banner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportKind {
    Save,
    Share,
}

#[component]
pub fn Scans() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let nav = use_navigator();
    let mut browser = use_signal(ScanBrowser::default);
    let mut confirm_delete = use_signal(|| false);
    let mut busy = use_signal(|| false);

    // Reload whenever a scan is added or removed anywhere in the app.
    let revision = use_memo(move || state.read().scans_revision);
    let load_svc = svc.clone();
    use_effect(move || {
        let _ = revision();
        let svc = load_svc.clone();
        spawn(async move {
            match background(move || svc.store().list()).await {
                Ok(scans) => browser.write().replace_scans(scans),
                Err(err) => flash_error(state, &err),
            }
        });
    });

    let delete_svc = svc.clone();
    let run_delete = move |_: MouseEvent| {
        confirm_delete.set(false);
        let paths = browser.read().selected_paths().to_vec();
        if paths.is_empty() {
            flash_error(state, &KropscanError::NoFilesSelected);
            return;
        }
        let svc = delete_svc.clone();
        busy.set(true);
        spawn(async move {
            let result = background(move || Ok(scan_actions::delete_scans(&svc, &paths))).await;
            busy.set(false);
            match result {
                Ok(report) => {
                    browser.write().apply_delete(&report);
                    state.write().scans_changed();
                    match report.failed.first() {
                        None => flash(
                            state,
                            Banner::success(format!("Deleted {} scan(s)", report.deleted.len())),
                        ),
                        Some((_, err)) => flash_error(state, err),
                    }
                }
                Err(err) => flash_error(state, &err),
            }
        });
    };

    let export_svc = svc.clone();
    let run_export = move |kind: ExportKind| {
        let paths = browser.read().selected_paths().to_vec();
        let svc = export_svc.clone();
        busy.set(true);
        spawn(async move {
            let result = background(move || match kind {
                ExportKind::Save => scan_actions::export_save(&svc, &paths),
                ExportKind::Share => scan_actions::export_share(&svc, &paths),
            })
            .await;
            busy.set(false);
            match result {
                Ok(outcome) => {
                    browser.write().finish_export();
                    flash(state, export_banner(kind, &outcome));
                }
                Err(err) => flash_error(state, &err),
            }
        });
    };

    let view = browser.read();
    let selecting = view.is_selecting();
    let title = view.title();
    let select_all_label = view.select_all_label();
    let selected_count = view.selected_count();
    let is_empty = view.scans().is_empty();
    let scans: Vec<(ScanFile, bool)> = view
        .scans()
        .iter()
        .map(|scan| (scan.clone(), view.is_selected(&scan.path)))
        .collect();
    drop(view);

    rsx! {
        div {
            div { style: "display: flex; justify-content: space-between; align-items: center;",
                h1 { "{title}" }
                if selecting {
                    div { style: "display: flex; gap: 8px;",
                        button {
                            style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                            onclick: move |_| browser.write().toggle_select_all(),
                            "{select_all_label}"
                        }
                        button {
                            style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                            onclick: move |_| browser.write().exit_selection(),
                            "\u{00D7}"
                        }
                    }
                } else if !is_empty {
                    div { style: "display: flex; gap: 8px;",
                        button {
                            style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                            onclick: move |_| browser.write().enter_selection(),
                            "Select"
                        }
                        button {
                            style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                            onclick: move |_| {
                                browser.write().select_all_for_delete();
                                confirm_delete.set(true);
                            },
                            "Delete all"
                        }
                    }
                }
            }

            if is_empty {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "No scans yet. Crop a document to get started."
                }
            } else {
                div { style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 12px;",
                    for (scan, selected) in scans {
                        ScanCard {
                            key: "{scan.path.display()}",
                            scan: scan.clone(),
                            selecting,
                            selected,
                            on_tap: move |path: PathBuf| {
                                let outcome = browser.write().tap(&path);
                                if let TapOutcome::OpenPreview(path) = outcome {
                                    state.write().preview = Some(path);
                                    nav.push(Route::Preview {});
                                }
                            },
                            on_long_press: move |path: PathBuf| browser.write().long_press(&path),
                        }
                    }
                }
            }

            if selecting {
                div { style: "display: flex; gap: 8px; margin-top: 16px;",
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                        disabled: selected_count == 0 || *busy.read(),
                        onclick: move |_| confirm_delete.set(true),
                        "Delete"
                    }
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                        disabled: selected_count == 0 || *busy.read(),
                        onclick: {
                            let mut run_export = run_export.clone();
                            move |_| run_export(ExportKind::Share)
                        },
                        "Share"
                    }
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                        disabled: selected_count == 0 || *busy.read(),
                        onclick: {
                            let mut run_export = run_export.clone();
                            move |_| run_export(ExportKind::Save)
                        },
                        "Create PDF"
                    }
                }
            }

            if *confirm_delete.read() {
                div { style: "position: fixed; inset: 0; background: rgba(0,0,0,0.4); display: flex; align-items: center; justify-content: center;",
                    div { style: "background: white; border-radius: 12px; padding: 20px; max-width: 320px;",
                        h3 { "Delete Scan" }
                        p { "Delete {selected_count} scan(s)? This cannot be undone." }
                        div { style: "display: flex; gap: 8px; justify-content: flex-end;",
                            button {
                                style: "padding: 8px 16px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                                onclick: move |_| {
                                    confirm_delete.set(false);
                                    browser.write().cancel_delete();
                                },
                                "Cancel"
                            }
                            button {
                                style: "padding: 8px 16px; border-radius: 6px; border: none; background: #ff3b30; color: white;",
                                onclick: run_delete,
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn export_banner(kind: ExportKind, outcome: &ExportOutcome) -> Banner {
    let banner = match kind {
        ExportKind::Save => Banner::success("PDF successfully saved"),
        ExportKind::Share if outcome.shared => Banner::success("PDF ready to share"),
        ExportKind::Share => Banner::info("Sharing is not available here"),
    };
    let mut detail = format!(
        "{} page(s) in {}",
        outcome.page_count,
        outcome.path.display()
    );
    if !outcome.skipped.is_empty() {
        detail.push_str(&format!(
            "; {} unreadable image(s) skipped",
            outcome.skipped.len()
        ));
    }
    banner.with_detail(detail)
}

#[component]
fn ScanCard(
    scan: ScanFile,
    selecting: bool,
    selected: bool,
    on_tap: EventHandler<PathBuf>,
    on_long_press: EventHandler<PathBuf>,
) -> Element {
    let border = if selected { "#007aff" } else { "#e0e0e0" };
    let tap_path = scan.path.clone();
    let press_path = scan.path.clone();
    let short_name = scan.short_name();
    let date = scan.card_date();

    rsx! {
        div {
            style: "position: relative; border: 2px solid {border}; border-radius: 8px; overflow: hidden; cursor: pointer; background: #fafafa;",
            onclick: move |_| on_tap.call(tap_path.clone()),
            oncontextmenu: move |evt: MouseEvent| {
                evt.prevent_default();
                on_long_press.call(press_path.clone());
            },
            img {
                src: "{scan.path.display()}",
                alt: "Scanned document",
                style: "width: 100%; height: 160px; object-fit: cover; display: block;",
            }
            if selecting {
                input {
                    r#type: "checkbox",
                    checked: selected,
                    style: "position: absolute; top: 8px; right: 8px; pointer-events: none;",
                }
            }
            div { style: "padding: 6px 8px; font-size: 12px;",
                div { style: "font-weight: 600;", "{short_name}" }
                div { style: "color: #888;", "{date}" }
            }
        }
    }
}
