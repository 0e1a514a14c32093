//! URL-encoded form decoding.
//!
//! Besides the standard `%XX` byte escape and `+` for space, the decoder
//! accepts the legacy 4-hex-digit `%uXXXX` escape some older clients emit.
//! An invalid or incomplete escape passes the literal `%` through instead
//! of failing the whole decode.

/// Parsed form body: an ordered multi-map. Duplicate keys are kept as
/// separate entries, never overwritten.
#[derive(Debug, Default)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in body order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Decodes a URL-encoded body into key/value pairs.
///
/// Splits on `&` and then on the first `=`; each side is decoded
/// independently. A pair with no `=` is skipped rather than aborting
/// the decode.
pub fn parse_form(body: &str) -> FormData {
    let mut entries = Vec::new();

    for pair in body.split('&') {
        if pair.is_empty() {
            continue;
        }

        match pair.split_once('=') {
            Some((key, value)) => {
                entries.push((url_decode(key), url_decode(value)));
            }
            None => continue, // malformed pair, skip
        }
    }

    FormData { entries }
}

/// Percent/plus-decodes a single form component.
///
/// Recognizes `%XX` (a UTF-8 byte), `%uXXXX` (a code point) and `+` (space).
pub fn url_decode(source: &str) -> String {
    if !source.contains('%') && !source.contains('+') {
        return source.to_string();
    }

    let chars: Vec<char> = source.chars().collect();
    let mut bytes: Vec<u8> = Vec::with_capacity(source.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '%' && i + 2 < chars.len() && chars[i + 1] != '%' {
            if chars[i + 1] == 'u' && i + 5 < chars.len() {
                if let Some(code) = hex_value(&chars[i + 2..i + 6]) {
                    push_char(&mut bytes, code);
                    i += 6;
                    continue;
                }
                bytes.push(b'%');
                i += 1;
                continue;
            }

            if let Some(code) = hex_value(&chars[i + 1..i + 3]) {
                bytes.push(code as u8);
                i += 3;
                continue;
            }

            bytes.push(b'%');
            i += 1;
            continue;
        }

        if ch == '+' {
            bytes.push(b' ');
        } else {
            push_char(&mut bytes, ch as u32);
        }

        i += 1;
    }

    // %XX sequences are raw UTF-8 bytes; tolerate broken sequences.
    String::from_utf8_lossy(&bytes).into_owned()
}

fn push_char(bytes: &mut Vec<u8>, code: u32) {
    if code < 0x100 {
        bytes.push(code as u8);
    } else if let Some(ch) = char::from_u32(code) {
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
}

fn hex_value(digits: &[char]) -> Option<u32> {
    let mut val = 0u32;

    for &c in digits {
        let d = c.to_digit(16)?;
        val = (val << 4) + d;
    }

    Some(val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pairs() {
        let form = parse_form("a=1&b=2");
        assert_eq!(form.get("a"), Some("1"));
        assert_eq!(form.get("b"), Some("2"));
    }

    #[test]
    fn percent_and_unicode_escapes() {
        let form = parse_form("a=1&b=hello%20world&c=%u0041");
        assert_eq!(form.get("a"), Some("1"));
        assert_eq!(form.get("b"), Some("hello world"));
        assert_eq!(form.get("c"), Some("A"));
    }

    #[test]
    fn invalid_escape_passes_percent_through() {
        let form = parse_form("x=100%off");
        assert_eq!(form.get("x"), Some("100%off"));
    }

    #[test]
    fn plus_decodes_to_space() {
        assert_eq!(url_decode("one+two"), "one two");
    }

    #[test]
    fn trailing_percent_is_literal() {
        assert_eq!(url_decode("50%"), "50%");
        assert_eq!(url_decode("%2"), "%2");
    }

    #[test]
    fn duplicate_keys_preserved_in_order() {
        let form = parse_form("tag=a&tag=b&tag=c");
        assert_eq!(form.get("tag"), Some("a"));
        assert_eq!(form.get_all("tag"), vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_pair_is_skipped() {
        let form = parse_form("a=1&junk&b=2");
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("junk"), None);
        assert_eq!(form.get("b"), Some("2"));
    }

    #[test]
    fn empty_value_is_kept() {
        let form = parse_form("a=");
        assert_eq!(form.get("a"), Some(""));
    }
}
