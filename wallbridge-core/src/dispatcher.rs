use std::sync::Arc;

use crate::command::{Command, ImageSource, MethodCall, Parsed, Response};
use crate::error::BridgeError;
use crate::platform::{MediaScanner, Notifier, ShareDialog, WallpaperService};
use crate::reply::Responder;
use crate::share::{ShareCallbackManager, ShareOutcome, SharePhotoContent, SHARE_CALLBACKS};
use crate::storage::ExternalStorage;
use crate::{fetch, resize, storage};

/// Routes calls from the application shell to the device handlers.
///
/// The dispatcher keeps no state of its own; every platform capability is
/// an injected service, and the share callback manager is the process-wide
/// singleton. Exactly one Response is delivered per call, either inside
/// `handle` or later from a completion callback.
pub struct Dispatcher {
    storage: Arc<dyn ExternalStorage>,
    wallpaper: Arc<dyn WallpaperService>,
    scanner: Arc<dyn MediaScanner>,
    share_dialog: Arc<dyn ShareDialog>,
    notifier: Arc<dyn Notifier>,
    share_callbacks: &'static ShareCallbackManager,
}

impl Dispatcher {
    pub fn new(
        storage: Arc<dyn ExternalStorage>,
        wallpaper: Arc<dyn WallpaperService>,
        scanner: Arc<dyn MediaScanner>,
        share_dialog: Arc<dyn ShareDialog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            wallpaper,
            scanner,
            share_dialog,
            notifier,
            share_callbacks: &SHARE_CALLBACKS,
        }
    }

    /// Dispatcher wired with the stock desktop services.
    #[cfg(all(not(target_os = "android"), not(target_arch = "wasm32")))]
    pub fn with_desktop_services() -> Self {
        use crate::platform::desktop::{DesktopScanner, DesktopWallpaper, SystemOpenShareDialog};
        use crate::platform::LogNotifier;
        use crate::storage::DeviceStorage;

        Self::new(
            Arc::new(DeviceStorage),
            Arc::new(DesktopWallpaper),
            Arc::new(DesktopScanner),
            Arc::new(SystemOpenShareDialog),
            Arc::new(LogNotifier),
        )
    }

    /// Entry point, invoked once per incoming call.
    pub fn handle(&self, call: MethodCall, responder: Responder) {
        let command = match Command::parse(&call) {
            Ok(Parsed::Command(command)) => command,
            Ok(Parsed::NotImplemented) => {
                log::warn!("Unknown method: {}", call.method);
                responder.not_implemented();
                return;
            }
            Err(e) => {
                responder.respond(Response::from(e));
                return;
            }
        };

        match command {
            Command::SetWallpaper(segments) => match self.set_wallpaper(&segments) {
                Ok(message) => {
                    responder.success_text(message);
                }
                Err(e) => {
                    responder.respond(Response::from(e));
                }
            },
            Command::ScanFile(segments) => self.scan_file(&segments, responder),
            Command::ShareImage(source) => self.share_image(source, responder),
            Command::ResizeImage {
                bytes,
                width,
                height,
            } => match resize::resize_image(&bytes, width, height) {
                Ok(encoded) => {
                    responder.success_bytes(encoded);
                }
                Err(e) => {
                    responder.respond(Response::from(e));
                }
            },
        }
    }

    fn set_wallpaper(&self, segments: &[String]) -> Result<&'static str, BridgeError> {
        let path = storage::resolve(self.storage.as_ref(), segments)?;
        let image = image::open(&path).map_err(|e| BridgeError::Decode(e.to_string()))?;
        self.wallpaper
            .set(&image, &path)
            .map_err(|e| BridgeError::Platform(e.to_string()))?;
        log::info!("Wallpaper set from {}", path.display());
        Ok("Set wallpaper successfully")
    }

    fn scan_file(&self, segments: &[String], responder: Responder) {
        let path = match storage::resolve(self.storage.as_ref(), segments) {
            Ok(path) => path,
            Err(e) => {
                responder.respond(Response::from(e));
                return;
            }
        };

        log::info!("Start scan: {}", path.display());
        self.scanner.scan(
            &path,
            Box::new(move |outcome| match outcome {
                Ok(uri) => {
                    log::info!("Scan result Uri: {}", uri);
                    responder.success_text("Scan completed");
                }
                Err(e) => {
                    log::info!("Scan file error: {}", e);
                    responder.error("error", &e.to_string());
                }
            }),
        );
    }

    fn share_image(&self, source: ImageSource, responder: Responder) {
        let image = match load_share_image(source) {
            Ok(image) => image,
            Err(e) => {
                responder.respond(Response::from(e));
                return;
            }
        };

        let content = SharePhotoContent::single(image);
        if !self.share_dialog.can_show(&content) {
            log::info!("can not show share dialog");
            responder.respond(Response::from(BridgeError::ShareUnavailable));
            return;
        }

        // Outcomes resolve the call's Response and raise a notification.
        let notifier = Arc::clone(&self.notifier);
        let token = self.share_callbacks.register(Box::new(move |outcome| {
            match outcome {
                ShareOutcome::Success => {
                    log::info!("Share image successfully");
                    notifier.notify("Share image successfully");
                    responder.success_text("Share image successfully");
                }
                ShareOutcome::Cancelled => {
                    log::info!("Share cancelled");
                    notifier.notify("Share cancelled");
                    responder.respond(Response::from(BridgeError::Cancelled));
                }
                ShareOutcome::Error(message) => {
                    log::info!("Share error: {}", message);
                    notifier.notify(&format!("Error {}", message));
                    responder.error("error", &message);
                }
            };
        }));

        let callbacks = self.share_callbacks;
        self.share_dialog.show(
            content,
            Box::new(move |outcome| callbacks.complete(token, outcome)),
        );
    }
}

fn load_share_image(source: ImageSource) -> Result<image::DynamicImage, BridgeError> {
    let bytes = match source {
        ImageSource::Url(url) => fetch::fetch_image_bytes(&url).map_err(|e| {
            log::error!("Loaded image failed: {}", e);
            BridgeError::ImageLoad
        })?,
        ImageSource::Bytes(bytes) => bytes,
    };
    image::load_from_memory(&bytes).map_err(|e| {
        log::error!("Loaded image failed: {}", e);
        BridgeError::ImageLoad
    })
}
