//! Turning image files into attachments the help endpoint can forward.

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::try_join_all;

use crate::api::public::help::Attachment;

fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads an image file into an inline `data:` URI attachment named
/// after the file.
pub async fn read_attachment(path: &Path) -> Result<Attachment> {
    let mime = image_mime_type(path)
        .ok_or(anyhow!("{} is not a supported image", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(anyhow!("Invalid file name: {}", path.display()))?;
    let bytes = tokio::fs::read(path).await?;

    Ok(Attachment::new(name, &data_uri(mime, &bytes)))
}

/// Remote images are passed through as-is for the model API to fetch.
pub fn remote_attachment(url: &str) -> Result<Attachment> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        bail!("Not an http(s) URL: {}", url);
    }
    let name = url
        .split(['?', '#'])
        .next()
        .and_then(|u| u.rsplit('/').next())
        .filter(|n| !n.is_empty())
        .unwrap_or(url);

    Ok(Attachment::new(name, url))
}

/// Resolves each source, a file path or an http(s) URL, into an
/// attachment. Files are read concurrently but the result keeps the
/// order the sources were given in.
pub async fn load_attachments(sources: &[String]) -> Result<Vec<Attachment>> {
    let futures = sources.iter().map(|source| async move {
        if source.starts_with("https://") || source.starts_with("http://") {
            remote_attachment(source)
        } else {
            read_attachment(Path::new(source)).await
        }
    });
    try_join_all(futures).await
}
