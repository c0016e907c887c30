//! Text fingerprints

/// Normalize text for fingerprinting: lowercase, whitespace collapsed
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hex-encoded BLAKE3 hash of the normalized text
///
/// # Examples
///
/// ```
/// use scrivener_cache::fingerprint;
///
/// assert_eq!(fingerprint("Hello   World"), fingerprint("hello world"));
/// assert_ne!(fingerprint("hello world"), fingerprint("hello there"));
/// ```
pub fn fingerprint(text: &str) -> String {
    blake3::hash(normalize(text).as_bytes()).to_hex().to_string()
}
