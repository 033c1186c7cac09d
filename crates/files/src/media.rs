/// Best-effort media type detection from the leading bytes of `content`.
///
/// Returns `None` when the signature is unknown; callers pick their own fallback.
pub fn sniff_media_type(content: &[u8]) -> Option<&'static str> {
    infer::get(content).map(|kind| kind.mime_type())
}
