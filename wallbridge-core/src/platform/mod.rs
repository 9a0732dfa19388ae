// Service traits for the platform capabilities the handlers call into.
// The dispatcher is composed over these so shells and tests wire their own.
use anyhow::Result;
use std::path::Path;

use crate::share::{ShareCallback, SharePhotoContent};

#[cfg(all(not(target_os = "android"), not(target_arch = "wasm32")))]
pub mod desktop;

#[cfg(target_os = "android")]
pub mod android;

/// Sets a decoded image as the active wallpaper. Both the decoded image and
/// the source path are provided; backends use whichever their platform API
/// wants.
pub trait WallpaperService: Send + Sync {
    fn set(&self, image: &image::DynamicImage, path: &Path) -> Result<()>;
}

pub type ScanCallback = Box<dyn FnOnce(Result<String>) + Send>;

/// Media index refresh for one file. Completion arrives through the
/// callback, possibly on another thread.
pub trait MediaScanner: Send + Sync {
    fn scan(&self, path: &Path, on_complete: ScanCallback);
}

/// Vendor share dialog seam. `can_show` must be consulted before `show`;
/// the three-way outcome mirrors the vendor SDK's callback object.
pub trait ShareDialog: Send + Sync {
    fn can_show(&self, content: &SharePhotoContent) -> bool;
    fn show(&self, content: SharePhotoContent, on_done: ShareCallback);
}

/// Transient user notification, the toast analog.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default notifier: shells without a toast surface get a log line.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("{}", message);
    }
}
