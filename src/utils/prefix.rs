//! Longest common prefix of a set of strings.

/// Return the longest common prefix of `strings`, or `None` when there are no
/// strings at all.
///
/// `None` is distinct from `Some(String::new())`: the former means there was
/// nothing to compare, the latter that the strings share no leading characters.
///
/// Only the lexicographically smallest and largest strings are compared. Every
/// other string sorts between them, so whatever prefix those two share is shared
/// by all of them.
///
/// # Examples
///
/// ```
/// # use ilan_dev::utils::lcp;
/// assert_eq!(lcp(["pineapple", "pinetree"]).as_deref(), Some("pine"));
/// assert_eq!(lcp(Vec::<String>::new()), None);
/// ```
#[must_use]
pub fn lcp<I, S>(strings: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let strings: Vec<S> = strings.into_iter().collect();

    let first = strings.iter().map(AsRef::as_ref).min()?;
    let last = strings.iter().map(AsRef::as_ref).max()?;

    // `str` ordering is byte-wise, which for UTF-8 is code-point order, so a
    // mismatch always falls on a char boundary of `first`.
    let end = first
        .char_indices()
        .zip(last.chars())
        .find(|((_, a), b)| a != b)
        .map_or(first.len(), |((i, _), _)| i);

    Some(first[..end].to_string())
}
