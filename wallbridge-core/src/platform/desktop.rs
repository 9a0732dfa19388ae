use anyhow::{anyhow, Result};
use std::path::Path;
use std::process::Command;
use std::thread;

use crate::platform::{MediaScanner, ScanCallback, ShareDialog, WallpaperService};
use crate::share::{ShareCallback, SharePhotoContent, ShareOutcome};

/// Desktop wallpaper backend over the `wallpaper` crate, with a gsettings
/// fallback for GNOME-family desktops where the crate comes up empty.
pub struct DesktopWallpaper;

impl WallpaperService for DesktopWallpaper {
    fn set(&self, _image: &image::DynamicImage, path: &Path) -> Result<()> {
        let file_loc = path.to_string_lossy();
        match wallpaper::set_from_path(&file_loc) {
            Ok(()) => {
                log::info!("Wallpaper set successfully to: {}", file_loc);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to set wallpaper: {}", e);
                if cfg!(target_os = "linux") {
                    return set_wallpaper_linux_fallback(path);
                }
                Err(anyhow!("Failed to set wallpaper: {}", e))
            }
        }
    }
}

fn set_wallpaper_linux_fallback(path: &Path) -> Result<()> {
    let file_loc = path.to_string_lossy();
    match desktop_environment().as_str() {
        "gnome" | "unity" | "cinnamon" => {
            let uri = format!("file://{}", file_loc);
            let output = Command::new("gsettings")
                .args(["set", "org.gnome.desktop.background", "picture-uri", &uri])
                .output()?;
            if output.status.success() {
                Ok(())
            } else {
                Err(anyhow!("gsettings exited with {}", output.status))
            }
        }
        "mate" => {
            let output = Command::new("gsettings")
                .args(["set", "org.mate.background", "picture-filename", &file_loc])
                .output()?;
            if output.status.success() {
                Ok(())
            } else {
                Err(anyhow!("gsettings exited with {}", output.status))
            }
        }
        other => Err(anyhow!("Desktop environment '{}' not supported", other)),
    }
}

fn desktop_environment() -> String {
    if let Ok(session) = std::env::var("DESKTOP_SESSION") {
        let session = session.to_lowercase();
        if session.starts_with("ubuntu") {
            return "gnome".to_string();
        }
        if !session.is_empty() {
            return session;
        }
    }
    if std::env::var("GNOME_DESKTOP_SESSION_ID").is_ok() {
        return "gnome".to_string();
    }
    "unknown".to_string()
}

/// Desktop media "scanner": verifies the file and completes from a worker
/// thread with a file:// URI, preserving the asynchronous contract of the
/// device media indexer.
pub struct DesktopScanner;

impl MediaScanner for DesktopScanner {
    fn scan(&self, path: &Path, on_complete: ScanCallback) {
        let path = path.to_path_buf();
        thread::spawn(move || {
            let outcome = if path.is_file() {
                Ok(format!("file://{}", path.display()))
            } else {
                Err(anyhow!("No such file: {}", path.display()))
            };
            on_complete(outcome);
        });
    }
}

/// Hands the composed photo to the system opener. There is no vendor SDK on
/// desktop, so "presenting" means opening the image; the flow completes as
/// soon as the opener accepts it.
pub struct SystemOpenShareDialog;

impl ShareDialog for SystemOpenShareDialog {
    fn can_show(&self, content: &SharePhotoContent) -> bool {
        !content.photos.is_empty()
    }

    fn show(&self, content: SharePhotoContent, on_done: ShareCallback) {
        thread::spawn(move || {
            let outcome = match write_and_open(&content) {
                Ok(()) => ShareOutcome::Success,
                Err(e) => ShareOutcome::Error(e.to_string()),
            };
            on_done(outcome);
        });
    }
}

fn write_and_open(content: &SharePhotoContent) -> Result<()> {
    let photo = content
        .photos
        .first()
        .ok_or_else(|| anyhow!("No photo to share"))?;

    let dir = std::env::temp_dir().join("wallbridge-share");
    std::fs::create_dir_all(&dir)?;
    let file = dir.join("share.png");
    photo.image.save(&file)?;
    open_path(&file)
}

#[cfg(target_os = "windows")]
fn open_path(path: &Path) -> Result<()> {
    Command::new("explorer").arg(path).spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn open_path(path: &Path) -> Result<()> {
    Command::new("open").arg(path).spawn()?;
    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_path(path: &Path) -> Result<()> {
    // Try different openers in order of preference
    let openers = ["xdg-open", "gio", "gnome-open"];
    for opener in &openers {
        if Command::new(opener).arg(path).spawn().is_ok() {
            return Ok(());
        }
    }
    Err(anyhow!(
        "Could not find a suitable opener for {}",
        path.display()
    ))
}
