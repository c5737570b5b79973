//! Display masking for API key tokens

/// Number of characters kept visible on each side of a masked token
pub const VISIBLE_CHARS: usize = 8;

/// Placeholder shown when no meaningful portion of a token can be revealed
pub const FULLY_MASKED: &str = "••••••••";

const SEPARATOR: &str = "...";

/// Mask a token for display: first 8 chars, `...`, last 8 chars
///
/// Tokens shorter than 16 characters would reveal everything (or overlap),
/// so they are replaced with the fixed placeholder.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();

    if chars.len() < VISIBLE_CHARS * 2 {
        return FULLY_MASKED.to_string();
    }

    let prefix: String = chars[..VISIBLE_CHARS].iter().collect();
    let suffix: String = chars[chars.len() - VISIBLE_CHARS..].iter().collect();

    format!("{}{}{}", prefix, SEPARATOR, suffix)
}

/// Build the masked form from stored prefix and suffix
pub fn masked_from_parts(prefix: &str, suffix: &str) -> String {
    if prefix.chars().count() != VISIBLE_CHARS || suffix.chars().count() != VISIBLE_CHARS {
        return FULLY_MASKED.to_string();
    }

    format!("{}{}{}", prefix, SEPARATOR, suffix)
}

/// Split a token into the prefix and suffix kept for display
pub fn display_parts(token: &str) -> (String, String) {
    let chars: Vec<char> = token.chars().collect();

    if chars.len() < VISIBLE_CHARS * 2 {
        return (String::new(), String::new());
    }

    (
        chars[..VISIBLE_CHARS].iter().collect(),
        chars[chars.len() - VISIBLE_CHARS..].iter().collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_standard_token() {
        let token = "0123456789abcdef0123456789abcdef";
        assert_eq!(mask_token(token), "01234567...89abcdef");
    }

    #[test]
    fn test_mask_exactly_sixteen_chars() {
        assert_eq!(mask_token("aaaaaaaabbbbbbbb"), "aaaaaaaa...bbbbbbbb");
    }

    #[test]
    fn test_mask_short_or_empty_token() {
        assert_eq!(mask_token(""), FULLY_MASKED);
        assert_eq!(mask_token("abc"), FULLY_MASKED);
        assert_eq!(mask_token("aaaaaaaabbbbbbb"), FULLY_MASKED);
    }

    #[test]
    fn test_masked_from_parts_matches_mask_token() {
        let token = "fedcba9876543210fedcba9876543210";
        let (prefix, suffix) = display_parts(token);
        assert_eq!(masked_from_parts(&prefix, &suffix), mask_token(token));
    }

    #[test]
    fn test_masked_from_missing_parts() {
        assert_eq!(masked_from_parts("", ""), FULLY_MASKED);
        let (prefix, suffix) = display_parts("short");
        assert!(prefix.is_empty() && suffix.is_empty());
    }
}
