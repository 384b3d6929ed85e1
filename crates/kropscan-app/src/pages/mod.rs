// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod banner;
pub mod cropper;
pub mod preview;
pub mod scans;
pub mod settings;

use kropscan_core::error::{KropscanError, Result};

/// Run a blocking service call off the UI thread.
pub async fn background<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| KropscanError::Bridge(format!("background task failed: {err}")))?
}
