/// Canonical comparison form of a free-text attribute: trimmed and lowercased
#[inline]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Bidirectional substring containment between two already-normalized strings
#[inline]
pub fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
