//! Hashtag extraction
//!
//! Tags are whitespace-free tokens starting with `#`, split on the plain
//! space character only. Tabs and newlines do not separate tokens.

use std::collections::HashSet;

/// Extract hashtags from post content, in order, duplicates kept
///
/// The leading `#` is stripped. A bare `#` yields the empty name.
///
/// # Examples
/// ```
/// use blog_service::services::extract_tags;
///
/// let tags = extract_tags("hello #foo #bar #foo");
/// assert_eq!(tags, vec!["foo", "bar", "foo"]);
/// ```
pub fn extract_tags(content: &str) -> Vec<&str> {
    content
        .split(' ')
        .filter_map(|token| token.strip_prefix('#'))
        .collect()
}

/// Hashtags of `content` with duplicates removed, first occurrence wins
pub fn distinct_tag_names(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_tags(content)
        .into_iter()
        .filter(|name| seen.insert(*name))
        .map(str::to_owned)
        .collect()
}
