// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Targets `aarch64-linux-android` / `armv7-linux-androideabi`. Synchronous
// APIs (ContentResolver, MediaStore, Environment, permission checks, share
// intents) are called directly. The image picker and the cropper run as
// activities; their results come back through the exports in `results`.
//
// The host Activity must:
// - register a FileProvider under `<applicationId>.fileprovider`,
// - handle the `com.kropscan.app.action.CROP` intent with its cropping UI,
// - forward `onActivityResult` for `REQUEST_PICK_IMAGE` / `REQUEST_CROP` to
//   `nativeOnImagePicked` / `nativeOnCropResult`.

#![cfg(target_os = "android")]

pub mod results;

use std::path::{Path, PathBuf};

use jni::objects::{JObject, JObjectArray, JString, JValue};
use jni::sys::jsize;
use jni::{JNIEnv, JavaVM};

use kropscan_core::error::{KropscanError, Result};
use kropscan_core::types::{CropResult, Permission};

use crate::traits::*;

/// Request codes for `startActivityForResult`.
pub const REQUEST_PICK_IMAGE: i32 = 0x4B53_0001; // "KS" + 1
pub const REQUEST_CROP: i32 = 0x4B53_0002;
pub const REQUEST_PERMISSION: i32 = 0x4B53_0003;

/// Intent action the host Activity answers with its cropping UI.
pub const ACTION_CROP: &str = "com.kropscan.app.action.CROP";

const FLAG_GRANT_READ_URI_PERMISSION: i32 = 0x0000_0001;
const PERMISSION_GRANTED: i32 = 0;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Wrap the `JavaVM*` that the NDK glue stored in `ndk_context`.
fn java_vm() -> Result<JavaVM> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` is the `JavaVM*` set by the NDK glue code and stays
    // valid for the lifetime of the process.
    unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| KropscanError::Bridge(format!("failed to obtain JavaVM: {e}")))
}

/// The hosting `Activity` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(KropscanError::Bridge(
            "Android context is null: native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

fn jni_err(context: &str, e: jni::errors::Error) -> KropscanError {
    KropscanError::Bridge(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the KropScan platform bridge.
///
/// Zero-sized; the first JNI call happens when a trait method runs.
pub struct AndroidBridge;

impl AndroidBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativeImagePicker — ACTION_GET_CONTENT + ContentResolver
// ---------------------------------------------------------------------------

impl NativeImagePicker for AndroidBridge {
    /// Launch `ACTION_GET_CONTENT` for `image/*` and block until the Activity
    /// reports the chosen URI.
    fn pick_image(&self) -> Result<Option<String>> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let intent = new_intent(&mut env, "android.intent.action.GET_CONTENT")?;
        let j_mime = env
            .new_string("image/*")
            .map_err(|e| jni_err("new_string(image/*)", e))?;
        env.call_method(
            &intent,
            "setType",
            "(Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&j_mime)],
        )
        .map_err(|e| jni_err("setType", e))?;

        let answer = results::expect_pick();
        env.call_method(
            &activity,
            "startActivityForResult",
            "(Landroid/content/Intent;I)V",
            &[JValue::Object(&intent), JValue::Int(REQUEST_PICK_IMAGE)],
        )
        .map_err(|e| jni_err("startActivityForResult(GET_CONTENT)", e))?;
        // Release the attachment while the user is in the picker.
        drop(env);

        tracing::info!(request_code = REQUEST_PICK_IMAGE, "Android: image picker launched");
        answer
            .recv()
            .map_err(|_| KropscanError::Bridge("image picker request was superseded".into()))
    }
}

// ---------------------------------------------------------------------------
// NativeCropper — host Activity cropping UI
// ---------------------------------------------------------------------------

impl NativeCropper for AndroidBridge {
    /// Start [`ACTION_CROP`] on the picked URI and block until the Activity
    /// reports success, cancellation or an error.
    fn crop(&self, reference: &str) -> Result<CropResult> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let intent = new_intent(&mut env, ACTION_CROP)?;
        let uri = parse_uri(&mut env, reference)?;
        env.call_method(
            &intent,
            "setData",
            "(Landroid/net/Uri;)Landroid/content/Intent;",
            &[JValue::Object(&uri)],
        )
        .map_err(|e| jni_err("setData(crop)", e))?;
        env.call_method(
            &intent,
            "addFlags",
            "(I)Landroid/content/Intent;",
            &[JValue::Int(FLAG_GRANT_READ_URI_PERMISSION)],
        )
        .map_err(|e| jni_err("addFlags(crop)", e))?;

        let answer = results::expect_crop();
        env.call_method(
            &activity,
            "startActivityForResult",
            "(Landroid/content/Intent;I)V",
            &[JValue::Object(&intent), JValue::Int(REQUEST_CROP)],
        )
        .map_err(|e| jni_err("startActivityForResult(crop)", e))?;
        drop(env);

        tracing::info!(request_code = REQUEST_CROP, "Android: cropper launched");
        answer
            .recv()
            .map_err(|_| KropscanError::Bridge("crop request was superseded".into()))
    }
}

// ---------------------------------------------------------------------------
// NativeShare — Intent ACTION_SEND
// ---------------------------------------------------------------------------

impl NativeShare for AndroidBridge {
    /// Share a file through a chooser, exposing it via `FileProvider`.
    fn share_file(&self, path: &Path, mime_type: &str) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        tracing::info!(path = %path.display(), mime = mime_type, "Android: launching share intent");

        let j_path: JString = env
            .new_string(path.to_string_lossy())
            .map_err(|e| jni_err("new_string(path)", e))?;
        let file_obj: JObject = env
            .new_object("java/io/File", "(Ljava/lang/String;)V", &[JValue::Object(&j_path)])
            .map_err(|e| jni_err("new File(path)", e))?;

        let authority = get_authority(&mut env, &activity)?;
        let j_authority: JString = env
            .new_string(&authority)
            .map_err(|e| jni_err("new_string(authority)", e))?;
        let content_uri: JObject = env
            .call_static_method(
                "androidx/core/content/FileProvider",
                "getUriForFile",
                "(Landroid/content/Context;Ljava/lang/String;Ljava/io/File;)Landroid/net/Uri;",
                &[
                    JValue::Object(&activity),
                    JValue::Object(&j_authority),
                    JValue::Object(&file_obj),
                ],
            )
            .map_err(|e| jni_err("FileProvider.getUriForFile(share)", e))?
            .l()
            .map_err(|e| jni_err("getUriForFile->l(share)", e))?;

        let intent = new_intent(&mut env, "android.intent.action.SEND")?;
        let j_mime: JString = env
            .new_string(mime_type)
            .map_err(|e| jni_err("new_string(mime)", e))?;
        env.call_method(
            &intent,
            "setType",
            "(Ljava/lang/String;)Landroid/content/Intent;",
            &[JValue::Object(&j_mime)],
        )
        .map_err(|e| jni_err("setType(share)", e))?;

        let j_extra_stream: JString = env
            .new_string("android.intent.extra.STREAM")
            .map_err(|e| jni_err("new_string(EXTRA_STREAM)", e))?;
        env.call_method(
            &intent,
            "putExtra",
            "(Ljava/lang/String;Landroid/os/Parcelable;)Landroid/content/Intent;",
            &[JValue::Object(&j_extra_stream), JValue::Object(&content_uri)],
        )
        .map_err(|e| jni_err("putExtra(EXTRA_STREAM)", e))?;

        env.call_method(
            &intent,
            "addFlags",
            "(I)Landroid/content/Intent;",
            &[JValue::Int(FLAG_GRANT_READ_URI_PERMISSION)],
        )
        .map_err(|e| jni_err("addFlags(share)", e))?;

        let j_title: JString = env
            .new_string("Share PDF")
            .map_err(|e| jni_err("new_string(chooser_title)", e))?;
        let chooser: JObject = env
            .call_static_method(
                "android/content/Intent",
                "createChooser",
                "(Landroid/content/Intent;Ljava/lang/CharSequence;)Landroid/content/Intent;",
                &[JValue::Object(&intent), JValue::Object(&j_title)],
            )
            .map_err(|e| jni_err("Intent.createChooser", e))?
            .l()
            .map_err(|e| jni_err("createChooser->l", e))?;

        env.call_method(
            &activity,
            "startActivity",
            "(Landroid/content/Intent;)V",
            &[JValue::Object(&chooser)],
        )
        .map_err(|e| jni_err("startActivity(share)", e))?;

        tracing::info!(path = %path.display(), "Android: share intent dispatched");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativePermissions — Build.VERSION / checkSelfPermission
// ---------------------------------------------------------------------------

impl NativePermissions for AndroidBridge {
    /// `Build.VERSION.SDK_INT`, or 0 if it cannot be read (which selects the
    /// most conservative code paths).
    fn sdk_level(&self) -> u32 {
        let read = || -> Result<i32> {
            let vm = java_vm()?;
            let mut env = vm
                .attach_current_thread()
                .map_err(|e| jni_err("attach_current_thread", e))?;
            env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
                .i()
                .map_err(|e| jni_err("SDK_INT->i", e))
        };
        match read() {
            Ok(level) => u32::try_from(level).unwrap_or(0),
            Err(err) => {
                tracing::warn!(error = %err, "could not read SDK_INT");
                0
            }
        }
    }

    fn has_permission(&self, permission: Permission) -> Result<bool> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let j_name = env
            .new_string(permission.android_name())
            .map_err(|e| jni_err("new_string(permission)", e))?;
        let status = env
            .call_method(
                &activity,
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&j_name)],
            )
            .map_err(|e| jni_err("checkSelfPermission", e))?
            .i()
            .map_err(|e| jni_err("checkSelfPermission->i", e))?;
        Ok(status == PERMISSION_GRANTED)
    }

    fn request_permission(&self, permission: Permission) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let names = string_array(&mut env, &[permission.android_name()])?;
        env.call_method(
            &activity,
            "requestPermissions",
            "([Ljava/lang/String;I)V",
            &[JValue::Object(&names), JValue::Int(REQUEST_PERMISSION)],
        )
        .map_err(|e| jni_err("requestPermissions", e))?;

        tracing::info!(permission = permission.android_name(), "Android: permission requested");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NativeStorage — Context / Environment directories
// ---------------------------------------------------------------------------

impl NativeStorage for AndroidBridge {
    fn app_data_dir(&self) -> Result<PathBuf> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;
        let dir = env
            .call_method(&activity, "getFilesDir", "()Ljava/io/File;", &[])
            .map_err(|e| jni_err("getFilesDir", e))?
            .l()
            .map_err(|e| jni_err("getFilesDir->l", e))?;
        file_path(&mut env, &dir)
    }

    fn pictures_dir(&self) -> Result<PathBuf> {
        external_files_dir("Pictures")
    }

    fn documents_dir(&self) -> Result<PathBuf> {
        external_files_dir("Documents")
    }

    fn public_documents_dir(&self) -> Result<PathBuf> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let j_type = env
            .new_string("Documents")
            .map_err(|e| jni_err("new_string(DIRECTORY_DOCUMENTS)", e))?;
        let dir = env
            .call_static_method(
                "android/os/Environment",
                "getExternalStoragePublicDirectory",
                "(Ljava/lang/String;)Ljava/io/File;",
                &[JValue::Object(&j_type)],
            )
            .map_err(|e| jni_err("getExternalStoragePublicDirectory", e))?
            .l()
            .map_err(|e| jni_err("getExternalStoragePublicDirectory->l", e))?;
        file_path(&mut env, &dir)
    }

    fn cache_dir(&self) -> Result<PathBuf> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;
        let dir = env
            .call_method(&activity, "getCacheDir", "()Ljava/io/File;", &[])
            .map_err(|e| jni_err("getCacheDir", e))?
            .l()
            .map_err(|e| jni_err("getCacheDir->l", e))?;
        file_path(&mut env, &dir)
    }

    /// `MediaScannerConnection.scanFile(context, [path], [mime], null)`
    fn notify_media_scanner(&self, path: &Path, mime_type: &str) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let path_str = path.to_string_lossy();
        let paths = string_array(&mut env, &[path_str.as_ref()])?;
        let mimes = string_array(&mut env, &[mime_type])?;
        env.call_static_method(
            "android/media/MediaScannerConnection",
            "scanFile",
            "(Landroid/content/Context;[Ljava/lang/String;[Ljava/lang/String;Landroid/media/MediaScannerConnection$OnScanCompletedListener;)V",
            &[
                JValue::Object(&activity),
                JValue::Object(&paths),
                JValue::Object(&mimes),
                JValue::Object(&JObject::null()),
            ],
        )
        .map_err(|e| jni_err("MediaScannerConnection.scanFile", e))?;

        tracing::debug!(path = %path.display(), "Android: media scan requested");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MediaStoreWriter — MediaStore.Images
// ---------------------------------------------------------------------------

impl MediaStoreWriter for AndroidBridge {
    fn insert_image(&self, entry: &GalleryEntry, pending: bool) -> Result<MediaHandle> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let values = env
            .new_object("android/content/ContentValues", "()V", &[])
            .map_err(|e| jni_err("new ContentValues", e))?;
        put_string(&mut env, &values, "_display_name", &entry.display_name)?;
        put_string(&mut env, &values, "mime_type", &entry.mime_type)?;
        if let Some(relative) = &entry.relative_path {
            put_string(&mut env, &values, "relative_path", relative)?;
        }
        if pending {
            put_int(&mut env, &values, "is_pending", 1)?;
        }

        let collection = env
            .get_static_field(
                "android/provider/MediaStore$Images$Media",
                "EXTERNAL_CONTENT_URI",
                "Landroid/net/Uri;",
            )
            .map_err(|e| jni_err("EXTERNAL_CONTENT_URI", e))?
            .l()
            .map_err(|e| jni_err("EXTERNAL_CONTENT_URI->l", e))?;
        let resolver = content_resolver(&mut env, &activity)?;
        let uri = env
            .call_method(
                &resolver,
                "insert",
                "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                &[JValue::Object(&collection), JValue::Object(&values)],
            )
            .map_err(|e| jni_err("ContentResolver.insert", e))?
            .l()
            .map_err(|e| jni_err("insert->l", e))?;
        if uri.is_null() {
            return Err(KropscanError::GalleryInsert(format!(
                "MediaStore refused {}",
                entry.display_name
            )));
        }

        let uri_string = object_to_string(&mut env, &uri)?;
        tracing::info!(uri = %uri_string, pending, "Android: gallery entry inserted");
        Ok(MediaHandle(uri_string))
    }

    fn write_bytes(&self, handle: &MediaHandle, bytes: &[u8]) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let uri = parse_uri(&mut env, &handle.0)?;
        let resolver = content_resolver(&mut env, &activity)?;
        let stream = env
            .call_method(
                &resolver,
                "openOutputStream",
                "(Landroid/net/Uri;)Ljava/io/OutputStream;",
                &[JValue::Object(&uri)],
            )
            .map_err(|e| jni_err("openOutputStream", e))?
            .l()
            .map_err(|e| jni_err("openOutputStream->l", e))?;
        if stream.is_null() {
            return Err(KropscanError::GalleryInsert(format!(
                "no output stream for {}",
                handle.0
            )));
        }

        let array = env
            .byte_array_from_slice(bytes)
            .map_err(|e| jni_err("byte_array_from_slice", e))?;
        let written = env
            .call_method(&stream, "write", "([B)V", &[JValue::Object(&array)])
            .map_err(|e| jni_err("OutputStream.write", e));
        // Close even when the write failed.
        env.call_method(&stream, "close", "()V", &[])
            .map_err(|e| jni_err("OutputStream.close", e))?;
        written?;
        Ok(())
    }

    fn clear_pending(&self, handle: &MediaHandle) -> Result<MediaHandle> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let values = env
            .new_object("android/content/ContentValues", "()V", &[])
            .map_err(|e| jni_err("new ContentValues", e))?;
        put_int(&mut env, &values, "is_pending", 0)?;

        let uri = parse_uri(&mut env, &handle.0)?;
        let resolver = content_resolver(&mut env, &activity)?;
        env.call_method(
            &resolver,
            "update",
            "(Landroid/net/Uri;Landroid/content/ContentValues;Ljava/lang/String;[Ljava/lang/String;)I",
            &[
                JValue::Object(&uri),
                JValue::Object(&values),
                JValue::Object(&JObject::null()),
                JValue::Object(&JObject::null()),
            ],
        )
        .map_err(|e| jni_err("ContentResolver.update(is_pending)", e))?;
        Ok(handle.clone())
    }

    fn delete_entry(&self, handle: &MediaHandle) -> Result<()> {
        let vm = java_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| jni_err("attach_current_thread", e))?;
        let activity = activity()?;

        let uri = parse_uri(&mut env, &handle.0)?;
        let resolver = content_resolver(&mut env, &activity)?;
        env.call_method(
            &resolver,
            "delete",
            "(Landroid/net/Uri;Ljava/lang/String;[Ljava/lang/String;)I",
            &[
                JValue::Object(&uri),
                JValue::Object(&JObject::null()),
                JValue::Object(&JObject::null()),
            ],
        )
        .map_err(|e| jni_err("ContentResolver.delete", e))?;
        tracing::info!(uri = %handle.0, "Android: gallery entry removed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn new_intent<'a>(env: &mut JNIEnv<'a>, action: &str) -> Result<JObject<'a>> {
    let j_action: JString = env
        .new_string(action)
        .map_err(|e| jni_err("new_string(action)", e))?;
    env.new_object(
        "android/content/Intent",
        "(Ljava/lang/String;)V",
        &[JValue::Object(&j_action)],
    )
    .map_err(|e| jni_err("new Intent", e))
}

fn parse_uri<'a>(env: &mut JNIEnv<'a>, uri: &str) -> Result<JObject<'a>> {
    let j_uri: JString = env
        .new_string(uri)
        .map_err(|e| jni_err("new_string(uri)", e))?;
    env.call_static_method(
        "android/net/Uri",
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&j_uri)],
    )
    .map_err(|e| jni_err("Uri.parse", e))?
    .l()
    .map_err(|e| jni_err("Uri.parse->l", e))
}

fn content_resolver<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        activity,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )
    .map_err(|e| jni_err("getContentResolver", e))?
    .l()
    .map_err(|e| jni_err("getContentResolver->l", e))
}

fn put_string(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: &str) -> Result<()> {
    let j_key = env.new_string(key).map_err(|e| jni_err("new_string(key)", e))?;
    let j_value = env
        .new_string(value)
        .map_err(|e| jni_err("new_string(value)", e))?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/String;)V",
        &[JValue::Object(&j_key), JValue::Object(&j_value)],
    )
    .map_err(|e| jni_err("ContentValues.put(String)", e))?;
    Ok(())
}

fn put_int(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: i32) -> Result<()> {
    let j_key = env.new_string(key).map_err(|e| jni_err("new_string(key)", e))?;
    let boxed = env
        .call_static_method(
            "java/lang/Integer",
            "valueOf",
            "(I)Ljava/lang/Integer;",
            &[JValue::Int(value)],
        )
        .map_err(|e| jni_err("Integer.valueOf", e))?
        .l()
        .map_err(|e| jni_err("Integer.valueOf->l", e))?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/Integer;)V",
        &[JValue::Object(&j_key), JValue::Object(&boxed)],
    )
    .map_err(|e| jni_err("ContentValues.put(Integer)", e))?;
    Ok(())
}

fn string_array<'a>(env: &mut JNIEnv<'a>, items: &[&str]) -> Result<JObjectArray<'a>> {
    let array = env
        .new_object_array(items.len() as jsize, "java/lang/String", JObject::null())
        .map_err(|e| jni_err("new_object_array(String)", e))?;
    for (i, item) in items.iter().enumerate() {
        let j_item = env
            .new_string(item)
            .map_err(|e| jni_err("new_string(item)", e))?;
        env.set_object_array_element(&array, i as jsize, j_item)
            .map_err(|e| jni_err("set_object_array_element", e))?;
    }
    Ok(array)
}

fn object_to_string(env: &mut JNIEnv<'_>, obj: &JObject<'_>) -> Result<String> {
    let j_str = env
        .call_method(obj, "toString", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("toString", e))?
        .l()
        .map_err(|e| jni_err("toString->l", e))?;
    let text: String = env
        .get_string(&JString::from(j_str))
        .map_err(|e| jni_err("get_string", e))?
        .into();
    Ok(text)
}

/// `file.getAbsolutePath()` as a `PathBuf`.
fn file_path(env: &mut JNIEnv<'_>, file: &JObject<'_>) -> Result<PathBuf> {
    if file.is_null() {
        return Err(KropscanError::Bridge("storage directory unavailable".into()));
    }
    let j_path = env
        .call_method(file, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("getAbsolutePath", e))?
        .l()
        .map_err(|e| jni_err("getAbsolutePath->l", e))?;
    let path: String = env
        .get_string(&JString::from(j_path))
        .map_err(|e| jni_err("get_string(path)", e))?
        .into();
    Ok(PathBuf::from(path))
}

/// `context.getExternalFilesDir(type)`, falling back to `getFilesDir()/type`
/// when external storage is not mounted.
fn external_files_dir(kind: &str) -> Result<PathBuf> {
    let vm = java_vm()?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| jni_err("attach_current_thread", e))?;
    let activity = activity()?;

    let j_kind = env
        .new_string(kind)
        .map_err(|e| jni_err("new_string(kind)", e))?;
    let dir = env
        .call_method(
            &activity,
            "getExternalFilesDir",
            "(Ljava/lang/String;)Ljava/io/File;",
            &[JValue::Object(&j_kind)],
        )
        .map_err(|e| jni_err("getExternalFilesDir", e))?
        .l()
        .map_err(|e| jni_err("getExternalFilesDir->l", e))?;
    if !dir.is_null() {
        return file_path(&mut env, &dir);
    }

    let internal = env
        .call_method(&activity, "getFilesDir", "()Ljava/io/File;", &[])
        .map_err(|e| jni_err("getFilesDir", e))?
        .l()
        .map_err(|e| jni_err("getFilesDir->l", e))?;
    Ok(file_path(&mut env, &internal)?.join(kind))
}

/// FileProvider authority: `<applicationId>.fileprovider`.
fn get_authority(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<String> {
    let j_pkg: JObject = env
        .call_method(activity, "getPackageName", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("getPackageName", e))?
        .l()
        .map_err(|e| jni_err("getPackageName->l", e))?;

    let pkg: String = env
        .get_string(&JString::from(j_pkg))
        .map_err(|e| jni_err("get_string(packageName)", e))?
        .into();

    Ok(format!("{pkg}.fileprovider"))
}
