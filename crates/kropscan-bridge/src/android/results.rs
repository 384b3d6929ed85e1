// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Activity results delivered back from `MainActivity`.
//
// The picker and the cropper run as separate activities. Before launching one
// the bridge registers a one-shot channel here; the host Activity's
// `onActivityResult` calls the matching `native*` export below, which sends
// the value and frees the slot. A new request replaces any older waiter.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use jni::JNIEnv;
use jni::objects::{JByteArray, JClass, JString};
use jni::sys::jint;
use kropscan_core::types::CropResult;

/// `status` values passed to `nativeOnCropResult`.
pub const CROP_STATUS_OK: jint = 0;
pub const CROP_STATUS_CANCELLED: jint = 1;

static PICK_SLOT: Mutex<Option<Sender<Option<String>>>> = Mutex::new(None);
static CROP_SLOT: Mutex<Option<Sender<CropResult>>> = Mutex::new(None);

fn register<T>(slot: &Mutex<Option<Sender<T>>>) -> Receiver<T> {
    let (tx, rx) = mpsc::channel();
    *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(tx);
    rx
}

fn deliver<T>(slot: &Mutex<Option<Sender<T>>>, what: &str, value: T) {
    let waiter = slot
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take();
    match waiter {
        Some(tx) => {
            if tx.send(value).is_err() {
                tracing::warn!(what, "activity result arrived after the caller gave up");
            }
        }
        None => tracing::warn!(what, "activity result with no pending request"),
    }
}

pub(crate) fn expect_pick() -> Receiver<Option<String>> {
    register(&PICK_SLOT)
}

pub(crate) fn expect_crop() -> Receiver<CropResult> {
    register(&CROP_SLOT)
}

/// `MainActivity.nativeOnImagePicked(uri: String?)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_kropscan_app_MainActivity_nativeOnImagePicked(
    mut env: JNIEnv,
    _class: JClass,
    uri: JString,
) {
    let value = if uri.is_null() {
        None
    } else {
        env.get_string(&uri).ok().map(String::from)
    };
    deliver(&PICK_SLOT, "pick", value);
}

/// `MainActivity.nativeOnCropResult(status: Int, jpeg: ByteArray?, message: String?)`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_kropscan_app_MainActivity_nativeOnCropResult(
    mut env: JNIEnv,
    _class: JClass,
    status: jint,
    bytes: JByteArray,
    message: JString,
) {
    let result = match status {
        CROP_STATUS_OK if !bytes.is_null() => match env.convert_byte_array(&bytes) {
            Ok(data) => CropResult::Success(data),
            Err(err) => CropResult::Error(format!("could not read cropped image: {err}")),
        },
        CROP_STATUS_CANCELLED => CropResult::Cancelled,
        _ => {
            let text = if message.is_null() {
                None
            } else {
                env.get_string(&message).ok().map(String::from)
            };
            CropResult::Error(text.unwrap_or_else(|| "cropper failed".into()))
        }
    };
    deliver(&CROP_SLOT, "crop", result);
}
