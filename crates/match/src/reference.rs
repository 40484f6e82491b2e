/// Normalize a reference identifier: drop all whitespace (banks re-space
/// long references freely), then strip leading zeros. A reference that
/// normalizes to nothing (empty, blanks, all zeros) is absent.
pub fn normalize_reference(reference: Option<&str>) -> Option<String> {
    let raw = reference?;
    let compact: String = raw.split_whitespace().collect();
    let stripped = compact.trim_start_matches('0');
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Definitive reference match: both sides normalize to the same non-empty
/// string. Has absolute priority over scoring.
pub fn references_match(a: Option<&str>, b: Option<&str>) -> bool {
    match (normalize_reference(a), normalize_reference(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
