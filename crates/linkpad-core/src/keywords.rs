//! Keyword set — the validated list the scanner matches against.

use crate::error::{Error, Result};
use crate::grow::GrowArray;

/// C language keywords (C11), used when no list is supplied.
pub const C_KEYWORDS: &[&str] = &[
    "auto",
    "break",
    "case",
    "char",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "struct",
    "switch",
    "typedef",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Bool",
    "_Complex",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

/// An ordered, non-empty list of distinct, non-empty keywords.
///
/// Keyword indices (as reported in scan results) follow insertion order
/// after duplicates are dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct KeywordSet {
    words: GrowArray<Box<[u8]>>,
    total_len: usize,
}

impl KeywordSet {
    /// Build a set from any sequence of byte strings.
    ///
    /// Repeated keywords keep their first position; later copies are
    /// dropped.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyKeyword`] if any input is zero-length (with its
    ///   position in the input).
    /// - [`Error::NoKeywords`] if the input is empty.
    /// - [`Error::OutOfMemory`] if storage cannot be allocated.
    pub fn new<I, K>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut set = Self {
            words: GrowArray::new(),
            total_len: 0,
        };
        for (index, word) in words.into_iter().enumerate() {
            let word = word.as_ref();
            if word.is_empty() {
                return Err(Error::EmptyKeyword { index });
            }
            if set.words.find(|w| **w == *word).is_some() {
                continue;
            }
            let mut owned = Vec::new();
            owned.try_reserve_exact(word.len())?;
            owned.extend_from_slice(word);
            set.words.push(owned.into_boxed_slice())?;
            set.total_len += word.len();
        }
        if set.words.is_empty() {
            return Err(Error::NoKeywords);
        }
        Ok(set)
    }

    /// The built-in C keyword list.
    ///
    /// # Errors
    ///
    /// Only [`Error::OutOfMemory`].
    pub fn c_language() -> Result<Self> {
        Self::new(C_KEYWORDS)
    }

    /// Parse a keyword file: one keyword per line, surrounding whitespace
    /// trimmed, blank lines skipped.
    ///
    /// # Errors
    ///
    /// [`Error::NoKeywords`] if no line holds a keyword.
    pub fn parse_list(text: &str) -> Result<Self> {
        Self::new(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Number of distinct keywords.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a constructed set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Keyword at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.words.as_slice().get(index).map(AsRef::as_ref)
    }

    /// Iterate keywords in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.words.iter().map(AsRef::as_ref)
    }

    /// Sum of all keyword lengths; the scanner's scratch size.
    #[inline]
    #[must_use]
    pub const fn total_len(&self) -> usize {
        self.total_len
    }
}

impl std::fmt::Debug for KeywordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(String::from_utf8_lossy))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
