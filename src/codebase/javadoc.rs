//! Lightweight Javadoc comment parser.
//!
//! Only the main description is of interest: the text between the opening
//! `/**` and the first block tag (`@since`, `@param`, ...). Inline tags such
//! as `{@link Foo}` are kept verbatim.

/// Whether a raw comment is a Javadoc block (`/** ... */`).
///
/// `/**/` is an empty ordinary block comment, not Javadoc.
pub fn is_javadoc(raw: &str) -> bool {
    raw.starts_with("/**") && raw != "/**/"
}

/// Extract the main description from a raw Javadoc comment.
///
/// Strips the comment delimiters and the leading `*` of every line, drops
/// everything from the first block tag on, and trims the result. Returns
/// `None` when the description is empty.
pub fn description(raw: &str) -> Option<String> {
    let body = raw.strip_prefix("/**").unwrap_or(raw);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let mut lines = Vec::new();
    for line in body.lines() {
        let line = strip_leading_markup(line);
        if is_block_tag(line) {
            break;
        }
        lines.push(line.trim_end());
    }

    let text = lines.join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Remove indentation and the conventional leading asterisks of a line.
fn strip_leading_markup(line: &str) -> &str {
    let trimmed = line.trim_start();
    let without_stars = trimmed.trim_start_matches('*');
    // Keep content indentation beyond the single space after the asterisk.
    without_stars.strip_prefix(' ').unwrap_or(without_stars)
}

fn is_block_tag(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('@')
        && line[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_javadoc() {
        assert!(is_javadoc("/** Doc. */"));
        assert!(is_javadoc("/**\n * Doc.\n */"));
        assert!(!is_javadoc("/* plain */"));
        assert!(!is_javadoc("/**/"));
        assert!(!is_javadoc("// line"));
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            description("/** A UI building block. */").as_deref(),
            Some("A UI building block.")
        );
    }

    #[test]
    fn test_multi_line_strips_asterisks() {
        let raw = "/**\n     * An order placed by a customer.\n     * It holds order lines.\n     */";
        assert_eq!(
            description(raw).as_deref(),
            Some("An order placed by a customer.\nIt holds order lines.")
        );
    }

    #[test]
    fn test_block_tags_are_dropped() {
        let raw = "/**\n * A list of definitions in a codebase.\n * @since 0.1\n */";
        assert_eq!(
            description(raw).as_deref(),
            Some("A list of definitions in a codebase.")
        );
    }

    #[test]
    fn test_only_block_tags_is_empty() {
        assert_eq!(description("/**\n * @since 0.1\n */"), None);
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(description("/** */"), None);
        assert_eq!(description("/**\n *\n *   \n */"), None);
    }

    #[test]
    fn test_inline_tags_are_kept() {
        assert_eq!(
            description("/** Wraps a {@link Money} amount. */").as_deref(),
            Some("Wraps a {@link Money} amount.")
        );
    }

    #[test]
    fn test_lines_without_asterisks() {
        let raw = "/**\n   First line.\n   Second line.\n*/";
        assert_eq!(
            description(raw).as_deref(),
            Some("First line.\nSecond line.")
        );
    }
}
