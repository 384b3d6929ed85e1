// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the Dioxus UI to the kropscan backend crates.
//
// Everything here is blocking and UI-free so pages can run it inside
// `tokio::task::spawn_blocking` and tests can call it directly.

pub mod app_services;
pub mod paths;
pub mod scan_actions;
