//! Media type resolution for incoming uploads.

use filestore_files::sniff_media_type;
use filestore_types::MediaType;

/// Picks the media type recorded for an upload.
///
/// A declared type wins when it parses, unless it is the generic
/// `application/octet-stream` and the content has a recognisable signature. Otherwise the
/// content is sniffed, falling back to `application/octet-stream`.
pub fn resolve_media_type(declared: Option<&str>, content: &[u8]) -> MediaType {
    let declared = declared.and_then(|raw| match MediaType::parse(raw) {
        Ok(media) => Some(media),
        Err(e) => {
            tracing::debug!("ignoring declared media type: {}", e);
            None
        }
    });

    match declared {
        Some(media) if media.as_str() != MediaType::OCTET_STREAM => media,
        declared => sniff_media_type(content)
            .and_then(|sniffed| MediaType::parse(sniffed).ok())
            .or(declared)
            .unwrap_or_else(MediaType::octet_stream),
    }
}
