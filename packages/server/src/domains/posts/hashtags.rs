//! Hashtag extraction from post content.

/// Extract hashtags from `content`.
///
/// Content is split on Unicode whitespace. Every token starting with `#`
/// contributes the rest of the token, lowercased. Punctuation stays part of
/// the tag (`#rust!` is `rust!`), only one leading `#` is removed (`##x` is
/// `#x`), and a bare `#` yields an empty tag. Order and repeats are kept.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    content
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('#'))
        .map(str::to_lowercase)
        .collect()
}
