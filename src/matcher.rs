//! Approximate name matching used by catalog search.
//!
//! A query matches a target when, after trimming and lower-casing both, the
//! target contains the query as a substring or, failing that, as a greedy
//! left-to-right subsequence. An empty query matches everything.
//!
//! # Performance
//! - O(len(target)) substring check, then one forward pass for the subsequence

/// Trim surrounding whitespace and fold to lower case
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Decide whether `query` matches `target` (substring first, subsequence as fallback)
pub fn matches(query: &str, target: &str) -> bool {
    let query = normalize(query);
    if query.is_empty() {
        return true;
    }

    let target = normalize(target);
    if target.contains(query.as_str()) {
        return true;
    }

    is_greedy_subsequence(&query, &target)
}

/// Single forward cursor over `query`; no backtracking.
fn is_greedy_subsequence(query: &str, target: &str) -> bool {
    let mut pending = query.chars().peekable();
    for ch in target.chars() {
        if pending.peek() == Some(&ch) {
            pending.next();
        }
        if pending.peek().is_none() {
            return true;
        }
    }
    false
}

// ============================================================================
// Tests
// ============================================================================
