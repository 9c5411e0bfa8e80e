//! Prefixed, zero-padded identifier allocation.

/// Derive the next identifier for `prefix` from the identifiers in use.
///
/// Only identifiers of the form `<prefix><digits>` take part. The result is
/// one more than the largest numeric suffix, padded to at least three
/// digits.
///
/// # Example
///
/// ```
/// use record_store::next_identifier;
///
/// assert_eq!(next_identifier(Vec::<&str>::new(), "TK"), "TK001");
/// assert_eq!(next_identifier(["T001", "T003", "TK009"], "T"), "T004");
/// ```
#[must_use]
pub fn next_identifier<'a, I>(ids: I, prefix: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    format_identifier(prefix, next_sequence(ids, prefix, 0))
}

/// Next numeric suffix for `prefix`, never at or below `last_issued`.
///
/// `last_issued` is the high-water mark of suffixes handed out before, which
/// keeps suffixes of deleted records from being issued again.
#[must_use]
pub fn next_sequence<'a, I>(ids: I, prefix: &str, last_issued: u64) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter_map(|id| numeric_suffix(id, prefix))
        .fold(last_issued, u64::max)
        .saturating_add(1)
}

/// Render `prefix` followed by `sequence` padded to three digits.
#[must_use]
pub fn format_identifier(prefix: &str, sequence: u64) -> String {
    format!("{prefix}{sequence:03}")
}

/// Split an identifier into its prefix and trailing numeric suffix.
///
/// Returns `None` when the identifier does not end in digits or the suffix
/// overflows.
#[must_use]
pub fn split_identifier(id: &str) -> Option<(&str, u64)> {
    let prefix = id.trim_end_matches(|ch: char| ch.is_ascii_digit());
    let digits = id.get(prefix.len()..)?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok().map(|sequence| (prefix, sequence))
}

fn numeric_suffix(id: &str, prefix: &str) -> Option<u64> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
