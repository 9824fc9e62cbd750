//! Escape sequence processing for string literals.

/// Process the escapes of a string literal body (quotes already stripped).
///
/// Supported: `\n \t \r \\ \" \0 \f`. `\f` (form feed, U+000C) is the
/// in-band encoding of the pattern wildcard inside strings. Invalid
/// escapes are preserved literally.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some('f') => out.push('\u{c}'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_escapes() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_wildcard_escape() {
        assert_eq!(unescape(r"he\fo"), "he\u{c}o");
    }

    #[test]
    fn test_invalid_escape_preserved() {
        assert_eq!(unescape(r"a\qb"), "a\\qb");
    }
}
