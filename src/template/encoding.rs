// Percent-encoding primitives shared by the scanner, parser and expander
//
// Character classes follow RFC 3986 section 2.

/// Characters that may never appear as literal template text.
const FORBIDDEN_LITERALS: &str = " \"'%<>\\^`{|}";

/// RFC 3986 `reserved` (gen-delims and sub-delims).
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

pub fn is_literal(c: char) -> bool {
    !FORBIDDEN_LITERALS.contains(c) && !c.is_control()
}

pub fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

pub fn is_reserved(c: char) -> bool {
    RESERVED.contains(c)
}

/// Literal text outside both URI character sets is written as `%XX` bytes.
pub fn literal_needs_escape(c: char) -> bool {
    !is_unreserved(c) && !is_reserved(c)
}

/// Whether `c` may start or continue a variable name (excluding `%XX`).
pub fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a leading percent-escape off `s`.
///
/// Returns `(sequence, rest, well_formed)`. The sequence is the `%` plus up to
/// two following characters, so a truncated or malformed escape is still
/// consumed as a unit. Returns an empty sequence when `s` does not start with
/// `%`.
pub fn cut_percent_escape(s: &str) -> (&str, &str, bool) {
    if !s.starts_with('%') {
        return ("", s, false);
    }
    let end = s
        .char_indices()
        .nth(3)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (seq, rest) = s.split_at(end);
    let bytes = seq.as_bytes();
    let well_formed =
        bytes.len() == 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit();
    (seq, rest, well_formed)
}

/// Append the UTF-8 bytes of `s` as `%XX` escapes with uppercase hex.
///
/// `s` must not contain unreserved characters, which `urlencoding` would copy
/// through unchanged.
pub fn percent_escape(out: &mut String, s: &str) {
    out.push_str(&urlencoding::encode(s));
}

/// Append `s` as literal template text.
pub fn write_literal(out: &mut String, c: char) {
    if literal_needs_escape(c) {
        let mut buf = [0u8; 4];
        percent_escape(out, c.encode_utf8(&mut buf));
    } else {
        out.push(c);
    }
}

/// Append a variable name or associative key, keeping well-formed escapes.
pub fn write_name(out: &mut String, mut name: &str) {
    while let Some(c) = name.chars().next() {
        let (seq, rest, well_formed) = cut_percent_escape(name);
        if well_formed {
            out.push_str(seq);
            name = rest;
            continue;
        }
        write_literal(out, c);
        name = &name[c.len_utf8()..];
    }
}

/// Append a value, escaping everything outside the allowed set.
///
/// With `allow_reserved` both unreserved and reserved characters pass through;
/// otherwise only unreserved ones do. Well-formed `%XX` sequences are kept in
/// either mode.
pub fn write_value(out: &mut String, value: &str, allow_reserved: bool) {
    let mut rest = value;
    while !rest.is_empty() {
        let chunk_end = rest.find('%').unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(chunk_end);
        if allow_reserved {
            for c in chunk.chars() {
                if is_unreserved(c) || is_reserved(c) {
                    out.push(c);
                } else {
                    let mut buf = [0u8; 4];
                    percent_escape(out, c.encode_utf8(&mut buf));
                }
            }
        } else {
            out.push_str(&urlencoding::encode(chunk));
        }

        if tail.is_empty() {
            break;
        }
        let (seq, after, well_formed) = cut_percent_escape(tail);
        if well_formed {
            out.push_str(seq);
            rest = after;
        } else {
            out.push_str("%25");
            rest = &tail[1..];
        }
    }
}

/// Truncate `s` to its first `n` code points.
pub fn prefix(s: &str, n: usize) -> &str {
    if n == 0 {
        return s;
    }
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_classes() {
        assert!(is_literal('a'));
        assert!(is_literal('/'));
        assert!(is_literal('é'));
        assert!(!is_literal(' '));
        assert!(!is_literal('{'));
        assert!(!is_literal('%'));
        assert!(!is_literal('\n'));
        assert!(!literal_needs_escape('~'));
        assert!(!literal_needs_escape('['));
        assert!(literal_needs_escape('é'));
    }

    #[test]
    fn test_cut_percent_escape() {
        assert_eq!(cut_percent_escape("%41bc"), ("%41", "bc", true));
        assert_eq!(cut_percent_escape("%zzbc"), ("%zz", "bc", false));
        assert_eq!(cut_percent_escape("%4"), ("%4", "", false));
        assert_eq!(cut_percent_escape("%"), ("%", "", false));
        assert_eq!(cut_percent_escape("%aé!"), ("%aé", "!", false));
        assert_eq!(cut_percent_escape("abc"), ("", "abc", false));
    }

    #[test]
    fn test_write_literal_escapes_utf8_bytes() {
        let mut out = String::new();
        for c in "héllo[]".chars() {
            write_literal(&mut out, c);
        }
        assert_eq!(out, "h%C3%A9llo[]");
    }

    #[test]
    fn test_write_value_unreserved_only() {
        let mut out = String::new();
        write_value(&mut out, "Hello World!", false);
        assert_eq!(out, "Hello%20World%21");

        let mut out = String::new();
        write_value(&mut out, "/foo/bar", false);
        assert_eq!(out, "%2Ffoo%2Fbar");
    }

    #[test]
    fn test_write_value_allow_reserved() {
        let mut out = String::new();
        write_value(&mut out, "Hello World!", true);
        assert_eq!(out, "Hello%20World!");

        let mut out = String::new();
        write_value(&mut out, "/foo/bar?x=1", true);
        assert_eq!(out, "/foo/bar?x=1");
    }

    #[test]
    fn test_write_value_keeps_well_formed_escapes() {
        let mut out = String::new();
        write_value(&mut out, "a%2Fb", false);
        assert_eq!(out, "a%2Fb");

        let mut out = String::new();
        write_value(&mut out, "50%", true);
        assert_eq!(out, "50%25");

        let mut out = String::new();
        write_value(&mut out, "%%41", false);
        assert_eq!(out, "%25%41");
    }

    #[test]
    fn test_write_name_escapes_key_text() {
        let mut out = String::new();
        write_name(&mut out, "a b%41=");
        assert_eq!(out, "a%20b%41=");
    }

    #[test]
    fn test_prefix_counts_code_points() {
        assert_eq!(prefix("value", 3), "val");
        assert_eq!(prefix("value", 30), "value");
        assert_eq!(prefix("日本語", 2), "日本");
        assert_eq!(prefix("value", 0), "value");
    }
}
