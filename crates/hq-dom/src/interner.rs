//! String Interner
//!
//! Tag and attribute names repeat constantly in HTML ("div", "li", "class",
//! "href"), so they are stored once per tree and referenced by ID.

use std::collections::HashMap;

/// Interned string ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

#[derive(Debug, Clone, Copy)]
struct StringEntry {
    offset: u32,
    len: u32,
}

/// String interner backed by one contiguous buffer
#[derive(Debug)]
pub struct StringInterner {
    buffer: String,
    map: HashMap<Box<str>, u32>,
    entries: Vec<StringEntry>,
}

impl StringInterner {
    /// Create a new interner with common HTML names pre-interned
    pub fn new() -> Self {
        let mut interner = Self {
            buffer: String::with_capacity(1024),
            map: HashMap::with_capacity(128),
            entries: Vec::with_capacity(128),
        };

        // Index 0 is always the empty string
        interner.intern("");

        const COMMON_NAMES: &[&str] = &[
            "html", "head", "body", "title", "meta", "link", "script", "style",
            "div", "span", "p", "a", "img", "ul", "ol", "li", "table", "tr", "td",
            "header", "footer", "nav", "article", "section", "h1", "h2", "h3",
            "id", "class", "href", "src", "alt", "lang", "type", "name", "value",
        ];

        for name in COMMON_NAMES {
            interner.intern(name);
        }

        interner
    }

    /// Intern a string, returning the existing ID when already present
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&index) = self.map.get(s) {
            return InternedString(index);
        }

        let index = self.entries.len() as u32;
        let offset = self.buffer.len() as u32;
        self.buffer.push_str(s);
        self.entries.push(StringEntry {
            offset,
            len: s.len() as u32,
        });
        self.map.insert(s.into(), index);

        InternedString(index)
    }

    /// Look up a string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&index| InternedString(index))
    }

    /// Get the string for an interned ID (empty for unknown IDs)
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        match self.entries.get(id.0 as usize) {
            Some(entry) => {
                let start = entry.offset as usize;
                &self.buffer[start..start + entry.len as usize]
            }
            None => "",
        }
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let mut interner = StringInterner::new();
        let id1 = interner.intern("hello");
        let id2 = interner.intern("hello");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_get_string() {
        let mut interner = StringInterner::new();
        let id = interner.intern("data-role");
        assert_eq!(interner.get(id), "data-role");
    }

    #[test]
    fn test_empty_is_zero() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(""), Some(InternedString::EMPTY));
        assert_eq!(interner.get(InternedString::EMPTY), "");
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let interner = StringInterner::new();
        let before = interner.len();
        assert!(interner.lookup("x-never-seen").is_none());
        assert_eq!(interner.len(), before);
    }

    #[test]
    fn test_unknown_id_resolves_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.get(InternedString(u32::MAX)), "");
    }
}
