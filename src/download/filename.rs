//! Filename sanitization for downloaded assets.
//!
//! On-disk names must reproduce the resolved display name exactly, apart
//! from characters that are reserved on common filesystems.

/// Characters replaced with `_` before a name touches the filesystem.
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces every reserved character (`< > : " / \ | ? *`) with `_`.
///
/// No other character is altered and the length in characters is preserved,
/// so sanitizing twice yields the same result as sanitizing once.
///
/// ```
/// use assetgrab_core::download::sanitize_filename;
///
/// assert_eq!(sanitize_filename("24.3.7 a/b:c?.mp4"), "24.3.7 a_b_c_.mp4");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
