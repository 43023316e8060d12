//! Character entity decoding and text clean-up used by string decorations.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Named character references, without the leading `&` and trailing `;`.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{00A0}'),
        ("iexcl", '\u{00A1}'),
        ("cent", '\u{00A2}'),
        ("pound", '\u{00A3}'),
        ("curren", '\u{00A4}'),
        ("yen", '\u{00A5}'),
        ("brvbar", '\u{00A6}'),
        ("sect", '\u{00A7}'),
        ("uml", '\u{00A8}'),
        ("copy", '\u{00A9}'),
        ("ordf", '\u{00AA}'),
        ("laquo", '\u{00AB}'),
        ("not", '\u{00AC}'),
        ("shy", '\u{00AD}'),
        ("reg", '\u{00AE}'),
        ("macr", '\u{00AF}'),
        ("deg", '\u{00B0}'),
        ("plusmn", '\u{00B1}'),
        ("sup2", '\u{00B2}'),
        ("sup3", '\u{00B3}'),
        ("acute", '\u{00B4}'),
        ("micro", '\u{00B5}'),
        ("para", '\u{00B6}'),
        ("middot", '\u{00B7}'),
        ("cedil", '\u{00B8}'),
        ("sup1", '\u{00B9}'),
        ("ordm", '\u{00BA}'),
        ("raquo", '\u{00BB}'),
        ("frac14", '\u{00BC}'),
        ("frac12", '\u{00BD}'),
        ("frac34", '\u{00BE}'),
        ("iquest", '\u{00BF}'),
        ("Agrave", '\u{00C0}'),
        ("Aacute", '\u{00C1}'),
        ("Auml", '\u{00C4}'),
        ("Ccedil", '\u{00C7}'),
        ("Egrave", '\u{00C8}'),
        ("Eacute", '\u{00C9}'),
        ("Euml", '\u{00CB}'),
        ("Iuml", '\u{00CF}'),
        ("Ntilde", '\u{00D1}'),
        ("Ouml", '\u{00D6}'),
        ("times", '\u{00D7}'),
        ("Uuml", '\u{00DC}'),
        ("szlig", '\u{00DF}'),
        ("agrave", '\u{00E0}'),
        ("aacute", '\u{00E1}'),
        ("acirc", '\u{00E2}'),
        ("auml", '\u{00E4}'),
        ("ccedil", '\u{00E7}'),
        ("egrave", '\u{00E8}'),
        ("eacute", '\u{00E9}'),
        ("ecirc", '\u{00EA}'),
        ("euml", '\u{00EB}'),
        ("iuml", '\u{00EF}'),
        ("ntilde", '\u{00F1}'),
        ("ouml", '\u{00F6}'),
        ("divide", '\u{00F7}'),
        ("uuml", '\u{00FC}'),
        ("ndash", '\u{2013}'),
        ("mdash", '\u{2014}'),
        ("lsquo", '\u{2018}'),
        ("rsquo", '\u{2019}'),
        ("ldquo", '\u{201C}'),
        ("rdquo", '\u{201D}'),
        ("bull", '\u{2022}'),
        ("hellip", '\u{2026}'),
        ("euro", '\u{20AC}'),
        ("trade", '\u{2122}'),
    ])
});

/// Longest entity name worth scanning for.
const MAX_ENTITY_LENGTH: usize = 10;

/// Decode character references (`&amp;`, `&#65;`, `&#x41;`).
///
/// Unknown or malformed references are left as written. The trailing
/// semicolon is optional, as in most browsers.
pub fn decode(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode a reference following `&`; returns the character and bytes consumed.
fn decode_reference(after: &str) -> Option<(char, usize)> {
    if let Some(numeric) = after.strip_prefix('#') {
        let (digits, radix, prefix) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let len = digits
            .char_indices()
            .find(|(_, c)| !c.is_digit(radix))
            .map_or(digits.len(), |(i, _)| i);
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        let ch = char::from_u32(code)?;
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((ch, prefix + len + semicolon));
    }

    let len = after
        .char_indices()
        .take(MAX_ENTITY_LENGTH + 1)
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map_or(after.len().min(MAX_ENTITY_LENGTH + 1), |(i, _)| i);
    if len == 0 || len > MAX_ENTITY_LENGTH {
        return None;
    }
    let ch = *NAMED_ENTITIES.get(&after[..len])?;
    let semicolon = usize::from(after[len..].starts_with(';'));
    Some((ch, len + semicolon))
}

/// Remove tab, newline and carriage-return characters.
pub fn remove_escapes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Replace non-breaking spaces with ordinary spaces.
pub fn convert_nbsp(text: &str) -> String {
    text.replace('\u{00A0}', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named() {
        assert_eq!(decode("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode("&copy 2024"), "\u{00A9} 2024");
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode("&#160;"), "\u{00A0}");
    }

    #[test]
    fn test_decode_leaves_unknown() {
        assert_eq!(decode("AT&T &bogus; &#;"), "AT&T &bogus; &#;");
        assert_eq!(decode("trailing &"), "trailing &");
    }

    #[test]
    fn test_remove_escapes() {
        assert_eq!(remove_escapes("a\tb\r\nc"), "abc");
    }

    #[test]
    fn test_convert_nbsp() {
        assert_eq!(convert_nbsp("a\u{00A0}b"), "a b");
    }
}
