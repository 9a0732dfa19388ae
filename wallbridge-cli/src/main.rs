use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use wallbridge_core::{
    Dispatcher, MethodCall, Payload, Responder, Response, RESIZE_IMAGE, SCAN_FILE, SET_WALLPAPER,
    SHARE_IMAGE,
};

#[derive(Parser, Debug)]
#[command(name = "wallbridge", version, about = "Device bridge for the wallpaper app shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set the wallpaper to an image under the storage root
    SetWallpaper {
        /// Path segments relative to the storage root
        segments: Vec<String>,
    },
    /// Ask the media indexer to pick up a file under the storage root
    ScanFile {
        /// Path segments relative to the storage root
        segments: Vec<String>,
    },
    /// Share an image from a remote address or a local file
    ShareImage {
        /// Remote image address
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,
        /// Local image file to share
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Resize an image file and write the PNG result
    ResizeImage {
        input: PathBuf,
        width: u32,
        height: u32,
        /// Output file for the resized PNG
        #[arg(long, default_value = "resized.png")]
        output: PathBuf,
    },
    /// Send a raw method call, shell-style
    Raw {
        method: String,
        /// Arguments as a JSON document
        #[arg(default_value = "null")]
        arguments: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let dispatcher = Dispatcher::with_desktop_services();

    let (call, output) = build_call(cli.command)?;
    let (responder, replies) = Responder::channel();
    dispatcher.handle(call, responder);

    // block until the handler (or its completion callback) replies
    let response = replies.recv()?;
    match response {
        Response::Success { payload } => match payload {
            Payload::Text(message) => println!("{}", message),
            Payload::Bytes(bytes) => {
                let path = output.unwrap_or_else(|| PathBuf::from("output.bin"));
                std::fs::write(&path, &bytes)?;
                println!("Wrote {} bytes to {}", bytes.len(), path.display());
            }
        },
        Response::Error { code, message, .. } => {
            eprintln!("{}: {}", code, message);
            std::process::exit(1);
        }
        Response::NotImplemented => {
            eprintln!("not implemented");
            std::process::exit(2);
        }
    }
    Ok(())
}

fn build_call(command: Commands) -> Result<(MethodCall, Option<PathBuf>)> {
    match command {
        Commands::SetWallpaper { segments } => {
            Ok((MethodCall::new(SET_WALLPAPER, json!(segments)), None))
        }
        Commands::ScanFile { segments } => Ok((MethodCall::new(SCAN_FILE, json!(segments)), None)),
        Commands::ShareImage { url, file } => {
            let arguments: Value = match (url, file) {
                (Some(url), None) => json!(url),
                (None, Some(file)) => json!(std::fs::read(file)?),
                _ => anyhow::bail!("pass exactly one of --url or --file"),
            };
            Ok((MethodCall::new(SHARE_IMAGE, arguments), None))
        }
        Commands::ResizeImage {
            input,
            width,
            height,
            output,
        } => {
            let bytes = std::fs::read(&input)?;
            let arguments = json!({"bytes": bytes, "width": width, "height": height});
            Ok((MethodCall::new(RESIZE_IMAGE, arguments), Some(output)))
        }
        Commands::Raw { method, arguments } => {
            let arguments: Value = serde_json::from_str(&arguments)?;
            Ok((MethodCall::new(method, arguments), None))
        }
    }
}
