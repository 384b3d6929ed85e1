// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cropper page — pick an image, crop it, keep it as a scan.
//
// On Android the system picker and the external cropper do the work. On
// desktop a file dialog picks the image and the crop is set with margin and
// rotation controls.

use dioxus::prelude::*;

use kropscan_core::error::Result;
use kropscan_core::human_errors::humanize_error;

use crate::pages::background;
use crate::pages::banner::{flash, flash_error};
use crate::services::app_services::AppServices;
use crate::services::scan_actions::{self, CropOutcome, GalleryCopy};
use crate::state::{AppState, Banner};

#[component]
pub fn Cropper() -> Element {
    rsx! {
        div {
            h1 { "Document Scanner" }
            p { style: "color: #666;", "Select a document or photo to crop and save as a scan" }
            CropControls {}
        }
    }
}

/// Turn a finished crop into a banner. Returns `true` when a scan was saved.
fn report_crop(mut state: Signal<AppState>, result: Result<CropOutcome>) -> bool {
    match result {
        Ok(CropOutcome::Saved(saved)) => {
            state.write().scans_changed();
            let mut banner = Banner::success("Scan saved successfully!")
                .with_detail(format!("Saved to {}", saved.scan.path.display()));
            if let GalleryCopy::Failed(err) = &saved.gallery {
                banner = banner.with_detail(format!(
                    "Gallery copy failed: {}",
                    humanize_error(err).message
                ));
            }
            flash(state, banner);
            true
        }
        Ok(CropOutcome::Cancelled) => false,
        Err(err) => {
            flash_error(state, &err);
            false
        }
    }
}

#[cfg(target_os = "android")]
#[component]
fn CropControls() -> Element {
    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut busy = use_signal(|| false);

    rsx! {
        button {
            style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
            disabled: *busy.read(),
            onclick: move |_| {
                let svc = svc.clone();
                busy.set(true);
                spawn(async move {
                    let result = background(move || {
                        let cropped = scan_actions::acquire_crop(&svc)?;
                        scan_actions::save_crop_result(&svc, cropped)
                    })
                    .await;
                    busy.set(false);
                    report_crop(state, result);
                });
            },
            "Select Document"
        }
    }
}

#[cfg(not(target_os = "android"))]
#[component]
fn CropControls() -> Element {
    use std::path::PathBuf;

    use kropscan_core::types::SCAN_EXTENSIONS;

    use crate::services::scan_actions::CropEdit;

    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut source = use_signal(|| Option::<PathBuf>::None);
    let mut edit = use_signal(CropEdit::default);
    let mut busy = use_signal(|| false);

    let current = *edit.read();

    rsx! {
        button {
            style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
            disabled: *busy.read(),
            onclick: move |_| {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &SCAN_EXTENSIONS)
                    .pick_file()
                {
                    tracing::info!(path = %path.display(), "image picked for cropping");
                    source.set(Some(path));
                    edit.set(CropEdit::default());
                }
            },
            "Select Document"
        }

        if let Some(path) = source.read().clone() {
            div { style: "text-align: center; margin: 12px 0;",
                img {
                    src: "{path.display()}",
                    style: "max-width: 100%; max-height: 320px; transform: rotate({current.rotation}deg);",
                }
            }

            section { style: "margin: 16px 0;",
                MarginSlider {
                    label: "Left",
                    value: current.left,
                    on_change: move |v: f32| edit.write().left = v,
                }
                MarginSlider {
                    label: "Top",
                    value: current.top,
                    on_change: move |v: f32| edit.write().top = v,
                }
                MarginSlider {
                    label: "Right",
                    value: current.right,
                    on_change: move |v: f32| edit.write().right = v,
                }
                MarginSlider {
                    label: "Bottom",
                    value: current.bottom,
                    on_change: move |v: f32| edit.write().bottom = v,
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Rotation" }
                    button {
                        style: "padding: 4px 12px; border-radius: 4px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| {
                            let mut current = edit.write();
                            current.rotation = (current.rotation + 90.0) % 360.0;
                        },
                        "Rotate {current.rotation}\u{00B0}"
                    }
                }
            }

            div { style: "display: flex; gap: 8px;",
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    disabled: *busy.read(),
                    onclick: move |_| {
                        source.set(None);
                        edit.set(CropEdit::default());
                    },
                    "Cancel"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                    disabled: *busy.read(),
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let Some(path) = source.read().clone() else {
                                return;
                            };
                            let svc = svc.clone();
                            let edit_now = *edit.read();
                            busy.set(true);
                            spawn(async move {
                                let result = background(move || {
                                    let cropped = scan_actions::crop_locally(&path, &edit_now);
                                    scan_actions::save_crop_result(&svc, cropped)
                                })
                                .await;
                                busy.set(false);
                                if report_crop(state, result) {
                                    source.set(None);
                                    edit.set(CropEdit::default());
                                }
                            });
                        }
                    },
                    "Save as Scan"
                }
            }
        }
    }
}

/// Trim slider in whole percent of the side (0-45).
#[cfg(not(target_os = "android"))]
#[component]
fn MarginSlider(label: &'static str, value: f32, on_change: EventHandler<f32>) -> Element {
    let percent = (value * 100.0).round() as u32;
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label} {percent}%" }
            input {
                r#type: "range",
                min: "0",
                max: "45",
                value: "{percent}",
                oninput: move |evt| {
                    if let Ok(percent) = evt.value().parse::<f32>() {
                        on_change.call(percent / 100.0);
                    }
                },
            }
        }
    }
}
