use anyhow::{anyhow, Result};
use jni::objects::{JClass, JObject, JString, JValue};
use jni::sys::jlong;
use jni::{JNIEnv, NativeMethod};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::c_void;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, Once};

use crate::platform::{MediaScanner, ScanCallback, WallpaperService};

/// Wallpaper backend going through the JVM: the decoded image is re-encoded
/// as PNG and handed to `android.app.WallpaperManager`.
pub struct AndroidWallpaper;

impl WallpaperService for AndroidWallpaper {
    fn set(&self, image: &image::DynamicImage, _path: &Path) -> Result<()> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png)?;
        set_wallpaper_from_bytes(&bytes.into_inner())
    }
}

fn set_wallpaper_from_bytes(image_bytes: &[u8]) -> Result<()> {
    let ctx = ndk_context::android_context();
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm() as _) }
        .map_err(|e| anyhow!("Expected to find JVM via ndk_context: {}", e))?;
    let context = unsafe { JObject::from_raw(ctx.context() as _) };
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| anyhow!("Failed to attach current thread: {}", e))?;

    log::info!("Setting wallpaper from {} bytes", image_bytes.len());

    let java_bytes = env.byte_array_from_slice(image_bytes)?;
    let factory = env.find_class("android/graphics/BitmapFactory")?;
    let bitmap = env
        .call_static_method(
            factory,
            "decodeByteArray",
            "([BII)Landroid/graphics/Bitmap;",
            &[
                JValue::Object(&JObject::from(java_bytes)),
                JValue::Int(0),
                JValue::Int(image_bytes.len() as i32),
            ],
        )?
        .l()?;
    if bitmap.is_null() {
        return Err(anyhow!("BitmapFactory could not decode wallpaper bytes"));
    }

    let manager_class = env.find_class("android/app/WallpaperManager")?;
    let manager = env
        .call_static_method(
            manager_class,
            "getInstance",
            "(Landroid/content/Context;)Landroid/app/WallpaperManager;",
            &[JValue::Object(&context)],
        )?
        .l()?;
    env.call_method(
        manager,
        "setBitmap",
        "(Landroid/graphics/Bitmap;)V",
        &[JValue::Object(&bitmap)],
    )?;
    Ok(())
}

/// Java shim class the host application ships alongside the native library,
/// loaded through the app ClassLoader. Expected surface:
///
/// ```java
/// public static native void onScanCompleted(long token, String path, String uri);
/// public static void scan(Context context, String path, long token) {
///     MediaScannerConnection.scanFile(context, new String[]{path}, null,
///         (p, u) -> onScanCompleted(token, p, u == null ? null : u.toString()));
/// }
/// ```
const SCAN_SHIM_CLASS: &str = "com.wallbridge.MediaScanShim";

/// In-flight scan callbacks, parked until the platform listener reports
/// back through `on_scan_completed`.
struct PendingScans {
    next_token: AtomicU64,
    pending: Mutex<HashMap<u64, ScanCallback>>,
}

static PENDING_SCANS: Lazy<PendingScans> = Lazy::new(|| PendingScans {
    next_token: AtomicU64::new(1),
    pending: Mutex::new(HashMap::new()),
});

impl PendingScans {
    fn register(&self, callback: ScanCallback) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.lock_pending().insert(token, callback);
        token
    }

    fn complete(&self, token: u64, outcome: Result<String>) {
        match self.lock_pending().remove(&token) {
            Some(callback) => callback(outcome),
            None => log::warn!("scan callback {} already completed", token),
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<u64, ScanCallback>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Media scanner over `android.media.MediaScannerConnection`. The reply is
/// held until the platform's OnScanCompletedListener fires, which arrives
/// here through the shim's registered native method.
pub struct AndroidScanner;

impl MediaScanner for AndroidScanner {
    fn scan(&self, path: &Path, on_complete: ScanCallback) {
        let token = PENDING_SCANS.register(on_complete);
        if let Err(e) = request_scan(path, token) {
            PENDING_SCANS.complete(token, Err(e));
        }
    }
}

fn request_scan(path: &Path, token: u64) -> Result<()> {
    let ctx = ndk_context::android_context();
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm() as _) }
        .map_err(|e| anyhow!("Expected to find JVM via ndk_context: {}", e))?;
    let context = unsafe { JObject::from_raw(ctx.context() as _) };
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| anyhow!("Failed to attach current thread: {}", e))?;

    let shim = load_app_class(&mut env, &context, SCAN_SHIM_CLASS)?;
    ensure_scan_natives(&mut env, &shim)?;

    let path_string = env.new_string(path.to_string_lossy())?;
    env.call_static_method(
        &shim,
        "scan",
        "(Landroid/content/Context;Ljava/lang/String;J)V",
        &[
            JValue::Object(&context),
            JValue::Object(&JObject::from(path_string)),
            JValue::Long(token as jlong),
        ],
    )?;
    Ok(())
}

/// Classes of the host application are not visible to `find_class` from a
/// native thread; go through the app ClassLoader instead.
fn load_app_class<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject,
    name: &str,
) -> Result<JClass<'local>> {
    let loader = env
        .call_method(context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])?
        .l()?;
    let class_name = JObject::from(env.new_string(name)?);
    let class = env
        .call_method(
            loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&class_name)],
        )?
        .l()?;
    Ok(JClass::from(class))
}

static REGISTER_SCAN_NATIVES: Once = Once::new();

fn ensure_scan_natives(env: &mut JNIEnv, shim: &JClass) -> Result<()> {
    let mut outcome = Ok(());
    REGISTER_SCAN_NATIVES.call_once(|| {
        let method = NativeMethod {
            name: "onScanCompleted".into(),
            sig: "(JLjava/lang/String;Ljava/lang/String;)V".into(),
            fn_ptr: on_scan_completed as *mut c_void,
        };
        outcome = env
            .register_native_methods(shim, &[method])
            .map_err(|e| anyhow!("Failed to register scan listener: {}", e));
    });
    outcome
}

extern "system" fn on_scan_completed(
    mut env: JNIEnv,
    _class: JClass,
    token: jlong,
    path: JString,
    uri: JString,
) {
    // the platform may report a null uri; fall back to the scanned path
    let uri = read_jstring(&mut env, &uri).or_else(|| read_jstring(&mut env, &path));
    let outcome = uri.ok_or_else(|| anyhow!("Scanner reported no path or uri"));
    PENDING_SCANS.complete(token as u64, outcome);
}

fn read_jstring(env: &mut JNIEnv, value: &JString) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(Into::into)
}
