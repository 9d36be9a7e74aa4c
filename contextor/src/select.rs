//! Context selection: truncate, drop short passages, drop near-duplicates.

use std::collections::HashSet;

/// Passages of this many characters or fewer (after trimming) are dropped.
pub const MIN_PASSAGE_CHARS: usize = 50;
/// Number of leading characters that identify a duplicate.
pub const DEDUP_PREFIX_CHARS: usize = 100;

/// Selects context passages from ranked retrieval results.
///
/// Considers only the first `k_docs` items. Each is trimmed; those with
/// `<= MIN_PASSAGE_CHARS` characters are skipped, as are those whose first
/// `DEDUP_PREFIX_CHARS` characters repeat an earlier kept passage. Relevance
/// order is preserved.
///
/// # Example
/// ```
/// # use contextor::select::select_passages;
/// let long = "Harry Potter was a highly unusual boy in many ways. For one thing...".to_string();
/// let picked = select_passages(vec![long.clone(), long, "short".into()], 5);
/// assert_eq!(picked.len(), 1);
/// ```
pub fn select_passages<I, S>(ranked: I, k_docs: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    let mut out = Vec::new();

    for raw in ranked.into_iter().take(k_docs) {
        let content = raw.as_ref().trim();
        if content.chars().count() <= MIN_PASSAGE_CHARS {
            continue;
        }
        if seen.insert(prefix_key(content)) {
            out.push(content.to_string());
        }
    }

    out
}

/// Stable digest of the first `DEDUP_PREFIX_CHARS` characters.
fn prefix_key(content: &str) -> [u8; 32] {
    let end = content
        .char_indices()
        .nth(DEDUP_PREFIX_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    *blake3::hash(content[..end].as_bytes()).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(tag: &str) -> String {
        format!("{tag} {}", "lorem ipsum dolor sit amet ".repeat(3))
            .trim_end()
            .to_string()
    }

    #[test]
    fn drops_short_and_boundary_length() {
        let exactly_50 = "x".repeat(50);
        let just_over = "y".repeat(51);
        let padded = format!("   {}   ", "z".repeat(50));

        let picked = select_passages(vec![exactly_50, just_over.clone(), padded], 10);

        assert_eq!(picked, vec![just_over]);
    }

    #[test]
    fn dedups_on_shared_prefix_and_keeps_first() {
        let prefix = "p".repeat(100);
        let a = format!("{prefix} ending one");
        let b = format!("{prefix} ending two");
        let c = passage("different");

        let picked = select_passages(vec![a.clone(), b, c.clone()], 10);

        assert_eq!(picked, vec![a, c]);
    }

    #[test]
    fn prefix_differences_are_kept() {
        let a = format!("a{}", "q".repeat(120));
        let b = format!("b{}", "q".repeat(120));
        assert_eq!(select_passages(vec![a, b], 10).len(), 2);
    }

    #[test]
    fn only_first_k_docs_considered() {
        let docs = vec![passage("one"), passage("two"), passage("three")];
        assert_eq!(
            select_passages(docs.clone(), 2),
            vec![docs[0].clone(), docs[1].clone()]
        );
        assert!(select_passages(docs, 0).is_empty());
    }

    #[test]
    fn multibyte_prefix_is_char_based() {
        let prefix = "é".repeat(100);
        let a = format!("{prefix}A");
        let b = format!("{prefix}B");
        assert_eq!(select_passages(vec![a.clone(), b], 5), vec![a]);
    }

    #[test]
    fn empty_input() {
        assert!(select_passages(Vec::<String>::new(), 5).is_empty());
    }
}
