use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// One photo of share content, mirroring the vendor SDK's photo builder.
pub struct SharePhoto {
    pub image: image::DynamicImage,
}

/// Single-photo share content handed to the share dialog.
pub struct SharePhotoContent {
    pub photos: Vec<SharePhoto>,
}

impl SharePhotoContent {
    pub fn single(image: image::DynamicImage) -> Self {
        Self {
            photos: vec![SharePhoto { image }],
        }
    }
}

/// Terminal outcome of a share flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Success,
    Cancelled,
    Error(String),
}

pub type ShareCallback = Box<dyn FnOnce(ShareOutcome) + Send>;

/// Process-wide instance; the dispatcher takes a reference to it rather
/// than constructing a manager per call.
pub static SHARE_CALLBACKS: Lazy<ShareCallbackManager> = Lazy::new(ShareCallbackManager::new);

/// Registry for in-flight share callbacks. The vendor flow completes out of
/// band, so each callback is parked here under a token until the dialog
/// reports back; completing a token twice is a no-op.
pub struct ShareCallbackManager {
    next_token: AtomicU64,
    pending: Mutex<HashMap<u64, ShareCallback>>,
}

impl ShareCallbackManager {
    fn new() -> Self {
        Self {
            next_token: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn register(&self, callback: ShareCallback) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.lock_pending().insert(token, callback);
        token
    }

    pub fn complete(&self, token: u64, outcome: ShareOutcome) {
        let callback = self.lock_pending().remove(&token);
        match callback {
            Some(callback) => callback(outcome),
            None => log::warn!("share callback {} already completed", token),
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<u64, ShareCallback>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
