//! Shell-style wildcard matching for namespace patterns.
//!
//! Supported syntax:
//! - `*` matches any run of characters, including none
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[^a-z]` / `[!a-z]` character classes
//! - `\x` matches `x` literally
//!
//! Matching is anchored and case-sensitive. A malformed pattern matches
//! nothing.

use regex::Regex;

/// Match `value` against a wildcard `pattern`.
pub fn matches(pattern: &str, value: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    match compile(pattern) {
        Some(regex) => regex.is_match(value),
        None => false,
    }
}

/// Translate a wildcard pattern into an anchored regex.
///
/// Returns `None` for malformed patterns.
fn compile(pattern: &str) -> Option<Regex> {
    let mut out = String::from("(?s)^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => out.push_str(&escape(chars.next()?)),
            '[' => {
                out.push('[');
                if matches!(chars.peek(), Some('^') | Some('!')) {
                    chars.next();
                    out.push('^');
                }

                let mut members = 0;
                loop {
                    let lo = match chars.next()? {
                        ']' if members > 0 => break,
                        ']' | '-' => return None,
                        '\\' => chars.next()?,
                        other => other,
                    };

                    if chars.peek() == Some(&'-') {
                        chars.next();
                        let hi = match chars.next()? {
                            ']' | '-' => return None,
                            '\\' => chars.next()?,
                            other => other,
                        };
                        if lo > hi {
                            return None;
                        }
                        out.push_str(&escape(lo));
                        out.push('-');
                        out.push_str(&escape(hi));
                    } else {
                        out.push_str(&escape(lo));
                    }
                    members += 1;
                }

                out.push(']');
            }
            other => out.push_str(&escape(other)),
        }
    }

    out.push('$');
    Regex::new(&out).ok()
}

fn escape(c: char) -> String {
    let mut buf = [0u8; 4];
    regex::escape(c.encode_utf8(&mut buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_match_pattern() {
        let cases = [
            ("dev-*", "dev-test", true),
            ("dev-*", "prod-test", false),
            ("*", "anything", true),
            ("exact", "exact", true),
            ("exact", "not-exact", false),
        ];
        for (pattern, value, want) in cases {
            assert_eq!(matches(pattern, value), want, "matches({:?}, {:?})", pattern, value);
        }
    }

    #[test]
    fn test_anchored_not_substring() {
        assert!(!matches("dev", "dev-test"));
        assert!(!matches("test", "dev-test"));
        assert!(matches("*test", "dev-test"));
        assert!(!matches("dev-*", "my-dev-test"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches("Dev-*", "dev-a"));
        assert!(!matches("dev-*", "DEV-a"));
    }

    #[test]
    fn test_inner_wildcards() {
        assert!(matches("team-*-dev", "team-payments-dev"));
        assert!(matches("team-*-dev", "team--dev"));
        assert!(!matches("team-*-dev", "team-payments-prod"));
        assert!(matches("*-*", "a-b"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        assert!(matches("dev-?", "dev-1"));
        assert!(!matches("dev-?", "dev-12"));
        assert!(matches("dev-[0-9]", "dev-7"));
        assert!(!matches("dev-[0-9]", "dev-x"));
        assert!(matches("dev-[!0-9]", "dev-x"));
        assert!(matches("dev-[^0-9]", "dev-x"));
        assert!(matches("ns-[abc]", "ns-b"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a.b", "a.b"));
        assert!(!matches("a.b", "axb"));
        assert!(matches("a+(b)", "a+(b)"));
        assert!(matches(r"lit\*", "lit*"));
        assert!(matches("a]b", "a]b"));
        assert!(!matches(r"lit\*", "literal"));
    }

    #[test]
    fn test_malformed_patterns_match_nothing() {
        for bad in ["dev-[", "dev-[]", "dev-[a-", "dev-[z-a]", "trailing\\"] {
            assert!(!matches(bad, "dev-a"), "{:?} should fail closed", bad);
            assert!(!matches(bad, bad), "{:?} should not even match itself", bad);
        }
    }

    proptest! {
        #[test]
        fn prop_star_matches_everything(value in ".*") {
            prop_assert!(matches("*", &value));
        }

        #[test]
        fn prop_literal_matches_itself(value in "[a-z0-9-]{1,40}") {
            prop_assert!(matches(&value, &value));
        }

        #[test]
        fn prop_unclosed_class_matches_nothing(prefix in "[a-z-]{0,10}", value in ".*") {
            let pattern = format!("{}[", prefix);
            prop_assert!(!matches(&pattern, &value));
        }
    }
}
