// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transient banner shown above every page.

use std::time::Duration;

use dioxus::prelude::*;

use kropscan_core::KropscanError;
use kropscan_core::human_errors::humanize_error;

use crate::state::{AppState, Banner, BannerKind};

/// Show `banner` and clear it after the configured number of seconds.
pub fn flash(mut state: Signal<AppState>, banner: Banner) {
    let seconds = state.read().config.banner_seconds;
    let generation = state.write().banner.show(banner);
    spawn(async move {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        state.write().banner.dismiss(generation);
    });
}

pub fn flash_error(state: Signal<AppState>, err: &KropscanError) {
    tracing::warn!(error = %err, "action failed");
    flash(state, Banner::from(humanize_error(err)));
}

#[component]
pub fn BannerView() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let Some(banner) = state.read().banner.current().cloned() else {
        return rsx! {};
    };

    let background = match banner.kind {
        BannerKind::Success => "#34c759",
        BannerKind::Info => "#007aff",
        BannerKind::Error => "#ff3b30",
    };

    rsx! {
        div {
            style: "padding: 12px 16px; color: white; background: {background}; display: flex; justify-content: space-between; align-items: center;",
            div {
                div { style: "font-weight: 600;", "{banner.message}" }
                if let Some(ref detail) = banner.detail {
                    div { style: "font-size: 13px; opacity: 0.9;", "{detail}" }
                }
            }
            button {
                style: "border: none; background: transparent; color: white; font-size: 18px;",
                onclick: move |_| state.write().banner.clear(),
                "\u{00D7}"
            }
        }
    }
}
