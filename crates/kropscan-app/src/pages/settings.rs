// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use dioxus::prelude::*;

use kropscan_core::types::PdfSaveLocation;

use crate::pages::banner::{flash, flash_error};
use crate::services::app_services::AppServices;
use crate::state::{AppState, Banner};

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let version = env!("CARGO_PKG_VERSION");
    let platform = svc.bridge().platform_name().to_string();

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Scans" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "JPEG quality" }
                    input {
                        r#type: "number",
                        min: "1",
                        max: "100",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{state.read().config.jpeg_quality}",
                        onchange: move |evt| {
                            if let Ok(quality) = evt.value().parse::<u8>()
                                && (1..=100).contains(&quality)
                            {
                                state.write().config.jpeg_quality = quality;
                            }
                        },
                    }
                }
                SettingRow {
                    label: "Also save scans to the gallery",
                    checked: state.read().config.duplicate_to_gallery,
                    on_toggle: move |v: bool| { state.write().config.duplicate_to_gallery = v; },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "PDF export" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Save PDFs to" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: save_location_label(state.read().config.pdf_save_location),
                        onchange: move |evt| {
                            if let Some(location) = save_location_from_label(&evt.value()) {
                                state.write().config.pdf_save_location = location;
                            }
                        },
                        option { value: "public", "Documents folder" }
                        option { value: "private", "App storage" }
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Documents subfolder" }
                    input {
                        style: "width: 140px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{state.read().config.app_name}",
                        onchange: move |evt| {
                            let name = evt.value().trim().to_string();
                            if !name.is_empty() && !name.contains(['/', '\\']) {
                                state.write().config.app_name = name;
                            }
                        },
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Notifications" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Banner duration (seconds)" }
                    input {
                        r#type: "number",
                        min: "1",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{state.read().config.banner_seconds}",
                        onchange: move |evt| {
                            if let Ok(seconds) = evt.value().parse::<u64>()
                                && seconds > 0
                            {
                                state.write().config.banner_seconds = seconds;
                            }
                        },
                    }
                }
            }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                flash(state, Banner::success("Settings saved."));
                            }
                            Err(e) => flash_error(state, &e),
                        }
                    }
                },
                "Save Settings"
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "KropScan v{version}"
                    br {}
                    "Crop and scan your documents"
                    br {}
                    "Running on {platform}"
                }
            }
        }
    }
}

#[component]
fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}

fn save_location_label(location: PdfSaveLocation) -> &'static str {
    match location {
        PdfSaveLocation::PublicDocuments => "public",
        PdfSaveLocation::AppDocuments => "private",
    }
}

fn save_location_from_label(label: &str) -> Option<PdfSaveLocation> {
    match label {
        "public" => Some(PdfSaveLocation::PublicDocuments),
        "private" => Some(PdfSaveLocation::AppDocuments),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_location_labels_round_trip() {
        for location in [PdfSaveLocation::PublicDocuments, PdfSaveLocation::AppDocuments] {
            assert_eq!(
                save_location_from_label(save_location_label(location)),
                Some(location)
            );
        }
        assert_eq!(save_location_from_label("cloud"), None);
    }
}
