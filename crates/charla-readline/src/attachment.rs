//! Reads image files into attachment references.

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use charla_core::session::AttachmentRef;
use std::path::Path;

/// Reads `path` and wraps its bytes in a `data:<mime>;base64,...` URL.
///
/// Only image types are accepted, matching what the completion backend can
/// reason about.
pub fn load_image(path: &Path) -> Result<AttachmentRef> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        bail!("{} is not an image ({})", path.display(), mime);
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(AttachmentRef::new(name, data_url(mime.essence_str(), &bytes)))
}

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
}
