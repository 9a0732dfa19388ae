use anyhow::Result;

/// Plain GET of a remote image, returning the raw bytes. No auth, no retry,
/// no configured timeout; the shell decides what to fetch.
pub fn fetch_image_bytes(url: &str) -> Result<Vec<u8>> {
    log::info!("Fetching image: {}", url);
    let response = attohttpc::get(url).send()?;
    if !response.is_success() {
        anyhow::bail!("GET {} failed with status {}", url, response.status());
    }
    Ok(response.bytes()?)
}
