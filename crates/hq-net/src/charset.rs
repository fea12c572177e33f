//! Character set detection
//!
//! The encoding of a fetched page comes from its byte order mark, then the
//! `Content-Type` charset, then a `<meta>` prescan of the first 1024 bytes.
//! Failing all three, valid UTF-8 is read as UTF-8 and anything else as
//! windows-1252.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

const PRESCAN_LIMIT: usize = 1024;

/// Decode a response body
pub(crate) fn decode(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect(body, content_type);
    let (text, _, malformed) = encoding.decode(body);
    if malformed {
        tracing::debug!("Body has malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

pub(crate) fn detect(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    let head = &body[..body.len().min(PRESCAN_LIMIT)];

    if let Some((encoding, _)) = Encoding::for_bom(head) {
        return encoding;
    }
    if let Some(encoding) = content_type
        .and_then(header_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }
    if let Some(encoding) = prescan(head) {
        tracing::trace!("Charset {} from <meta>", encoding.name());
        return encoding;
    }
    match std::str::from_utf8(head) {
        Ok(_) => UTF_8,
        // cut off mid-character by the prescan limit
        Err(e) if e.error_len().is_none() => UTF_8,
        Err(_) => WINDOWS_1252,
    }
}

fn header_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Look for `<meta charset>` or `<meta http-equiv="content-type">`,
/// skipping comments and the attributes of other tags.
fn prescan(head: &[u8]) -> Option<&'static Encoding> {
    let mut scanner = Scanner { bytes: head, pos: 0 };

    while scanner.pos < head.len() {
        let rest = &head[scanner.pos..];
        if rest.starts_with(b"<!--") {
            scanner.pos += find(&rest[4..], b"-->").map_or(rest.len(), |i| i + 7);
        } else if is_meta(rest) {
            scanner.pos += 5;
            if let Some(encoding) = scanner.meta_encoding() {
                return Some(encoding);
            }
        } else if rest.len() > 1 && rest[0] == b'<' && (rest[1].is_ascii_alphabetic() || rest[1] == b'/') {
            scanner.pos += if rest[1] == b'/' { 2 } else { 1 };
            scanner.skip_while(|b| !is_space(b) && b != b'>');
            while scanner.attribute().is_some() {}
        } else {
            scanner.pos += 1;
        }
    }
    None
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos = (self.pos + 1).min(self.bytes.len());
    }

    fn skip_while(&mut self, f: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&f) {
            self.pos += 1;
        }
    }

    /// Lowercased run of bytes matching `f`
    fn take_while(&mut self, f: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        self.skip_while(f);
        String::from_utf8_lossy(&self.bytes[start..self.pos]).to_ascii_lowercase()
    }

    /// Next attribute of the open tag; `None` once the tag closes
    fn attribute(&mut self) -> Option<(String, String)> {
        self.skip_while(|b| is_space(b) || b == b'/');
        match self.peek() {
            None => return None,
            Some(b'>') => {
                self.bump();
                return None;
            }
            Some(_) => {}
        }

        let name = self.take_while(|b| !is_space(b) && !matches!(b, b'=' | b'/' | b'>'));
        self.skip_while(is_space);
        if self.peek() != Some(b'=') {
            return Some((name, String::new()));
        }
        self.bump();
        self.skip_while(is_space);

        let value = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.bump();
                let value = self.take_while(|b| b != quote);
                self.bump();
                value
            }
            _ => self.take_while(|b| !is_space(b) && b != b'>'),
        };
        Some((name, value))
    }

    fn meta_encoding(&mut self) -> Option<&'static Encoding> {
        let mut pragma = false;
        let mut charset = None;
        let mut from_content = None;

        while let Some((name, value)) = self.attribute() {
            match name.as_str() {
                "http-equiv" => pragma |= value == "content-type",
                "content" if from_content.is_none() => from_content = content_charset(&value),
                "charset" if charset.is_none() => charset = Encoding::for_label(value.as_bytes()),
                _ => {}
            }
        }

        // a page cannot declare itself UTF-16 from inside its own bytes
        charset
            .or(from_content.filter(|_| pragma))
            .map(Encoding::output_encoding)
    }
}

/// Charset inside a `content="text/html; charset=..."` value
fn content_charset(content: &str) -> Option<&'static Encoding> {
    let at = content.find("charset")?;
    let rest = content[at + "charset".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let label = match rest.chars().next()? {
        quote @ ('"' | '\'') => rest[1..].split(quote).next()?,
        _ => rest
            .split(|c: char| c == ';' || c.is_ascii_whitespace())
            .next()?,
    };
    Encoding::for_label(label.as_bytes())
}

fn is_meta(rest: &[u8]) -> bool {
    rest.len() > 5 && rest[..5].eq_ignore_ascii_case(b"<meta") && (is_space(rest[5]) || rest[5] == b'/')
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0c' | b'\r')
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
