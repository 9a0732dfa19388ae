pub mod command;
pub mod dispatcher;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod reply;
pub mod resize;
pub mod share;
pub mod storage;

pub use command::{
    Command, ImageSource, MethodCall, Payload, Response, CHANNEL, RESIZE_IMAGE, SCAN_FILE,
    SET_WALLPAPER, SHARE_IMAGE,
};
pub use dispatcher::Dispatcher;
pub use error::BridgeError;
pub use reply::Responder;
