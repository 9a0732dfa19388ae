use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

pub const CHANNEL: &str = "wallbridge";
pub const SET_WALLPAPER: &str = "setWallpaper";
pub const SCAN_FILE: &str = "scanFile";
pub const SHARE_IMAGE: &str = "shareImage";
pub const RESIZE_IMAGE: &str = "resizeImage";

/// A raw call as it arrives from the application shell: a method name plus
/// whatever arguments the caller put on the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Where the image for a share comes from: a remote address to fetch, or
/// bytes already loaded by a prior step.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Url(String),
    Bytes(Vec<u8>),
}

/// A validated command, one variant per supported method. Arguments are
/// checked once here so the handlers only ever see typed input.
#[derive(Debug, Clone)]
pub enum Command {
    SetWallpaper(Vec<String>),
    ScanFile(Vec<String>),
    ShareImage(ImageSource),
    ResizeImage {
        bytes: Vec<u8>,
        width: u32,
        height: u32,
    },
}

/// Outcome of matching a call against the supported method set.
#[derive(Debug)]
pub enum Parsed {
    Command(Command),
    NotImplemented,
}

impl Command {
    pub fn parse(call: &MethodCall) -> Result<Parsed, BridgeError> {
        let command = match call.method.as_str() {
            SET_WALLPAPER => Command::SetWallpaper(parse_segments(&call.arguments)?),
            SCAN_FILE => Command::ScanFile(parse_segments(&call.arguments)?),
            SHARE_IMAGE => Command::ShareImage(parse_image_source(&call.arguments)?),
            RESIZE_IMAGE => parse_resize(&call.arguments)?,
            _ => return Ok(Parsed::NotImplemented),
        };
        Ok(Parsed::Command(command))
    }
}

fn parse_segments(arguments: &Value) -> Result<Vec<String>, BridgeError> {
    let items = arguments
        .as_array()
        .ok_or_else(|| BridgeError::InvalidArguments("Arguments must be a list and not null".into()))?;

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(BridgeError::InvalidArguments(
                "Arguments must be a list and not null".into(),
            )),
        })
        .collect()
}

fn parse_image_source(arguments: &Value) -> Result<ImageSource, BridgeError> {
    match arguments {
        Value::String(url) => Ok(ImageSource::Url(url.clone())),
        Value::Array(_) => Ok(ImageSource::Bytes(parse_byte_array(arguments).ok_or_else(
            || BridgeError::InvalidArguments("image bytes must be a byte array".into()),
        )?)),
        _ => Err(BridgeError::InvalidArguments("imageUrl cannot be null".into())),
    }
}

fn parse_resize(arguments: &Value) -> Result<Command, BridgeError> {
    let null_field = |field: &str| BridgeError::InvalidArguments(format!("{} cannot be null", field));

    let width = arguments
        .get("width")
        .and_then(Value::as_i64)
        .ok_or_else(|| null_field("width"))?;
    let height = arguments
        .get("height")
        .and_then(Value::as_i64)
        .ok_or_else(|| null_field("height"))?;
    let bytes = arguments
        .get("bytes")
        .and_then(parse_byte_array)
        .ok_or_else(|| null_field("bytes"))?;

    if width <= 0 {
        return Err(BridgeError::InvalidArguments("width must be positive".into()));
    }
    if height <= 0 {
        return Err(BridgeError::InvalidArguments("height must be positive".into()));
    }
    let width = u32::try_from(width)
        .map_err(|_| BridgeError::InvalidArguments("width is out of range".into()))?;
    let height = u32::try_from(height)
        .map_err(|_| BridgeError::InvalidArguments("height is out of range".into()))?;

    Ok(Command::ResizeImage {
        bytes,
        width,
        height,
    })
}

fn parse_byte_array(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

/// Success payload: a human-readable message or a binary blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

/// The single reply produced for a call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Success {
        payload: Payload,
    },
    Error {
        code: String,
        message: String,
        details: Option<Value>,
    },
    NotImplemented,
}

impl Response {
    pub fn success_text(message: impl Into<String>) -> Self {
        Response::Success {
            payload: Payload::Text(message.into()),
        }
    }

    pub fn success_bytes(bytes: Vec<u8>) -> Self {
        Response::Success {
            payload: Payload::Bytes(bytes),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<BridgeError> for Response {
    fn from(error: BridgeError) -> Self {
        Response::error(error.code(), error.to_string())
    }
}
