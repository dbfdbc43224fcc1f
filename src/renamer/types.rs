//! _C_ Type Names
//!
//! Keyword classes used to recognize declaration specifiers, and the
//! caller-supplied set of identifiers known to name types.

use rustc_hash::FxHashSet;

/// Keywords naming a primitive base type.
pub const PRIMITIVE_TYPES: [&str; 12] = [
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "_Complex", "_Imaginary",
];

/// Type qualifiers (may also follow a `*` in a declarator).
pub const TYPE_QUALIFIERS: [&str; 8] = [
    "const",
    "volatile",
    "restrict",
    "_Atomic",
    "__restrict",
    "__restrict__",
    "__const",
    "__volatile__",
];

/// Storage-class and function specifiers.
pub const STORAGE_CLASSES: [&str; 9] = [
    "auto",
    "register",
    "static",
    "extern",
    "_Thread_local",
    "inline",
    "__inline",
    "__inline__",
    "_Noreturn",
];

/// Keywords followed by a parenthesized argument that carries no
/// declarator information.
pub const ATTRIBUTE_KEYWORDS: [&str; 3] = ["__attribute__", "__declspec", "_Alignas"];

/// Keywords naming a type computed from an expression.
pub const TYPEOF_KEYWORDS: [&str; 2] = ["typeof", "__typeof__"];

/// Keywords introducing a record or enumeration specifier.
pub const RECORD_KEYWORDS: [&str; 3] = ["struct", "union", "enum"];

/// Typedef names from the _C_ standard library and _POSIX_ headers that are
/// common enough to be assumed everywhere.
pub const STANDARD_TYPEDEFS: [&str; 40] = [
    "bool",
    "size_t",
    "ssize_t",
    "ptrdiff_t",
    "intptr_t",
    "uintptr_t",
    "intmax_t",
    "uintmax_t",
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "int_least8_t",
    "int_least16_t",
    "int_least32_t",
    "int_least64_t",
    "uint_least8_t",
    "uint_least16_t",
    "uint_least32_t",
    "uint_least64_t",
    "int_fast8_t",
    "int_fast16_t",
    "int_fast32_t",
    "int_fast64_t",
    "uint_fast8_t",
    "uint_fast16_t",
    "uint_fast32_t",
    "uint_fast64_t",
    "wchar_t",
    "off_t",
    "pid_t",
    "time_t",
    "va_list",
    "FILE",
    "socklen_t",
    "mode_t",
];

/// Identifier spellings the caller asserts denote types visible at the
/// function (typedefs, aggregate names). Used only to tell declarations from
/// expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownTypes {
    names: FxHashSet<String>,
}

impl KnownTypes {
    /// Returns an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a set preloaded with [`STANDARD_TYPEDEFS`].
    #[must_use]
    pub fn standard() -> Self {
        STANDARD_TYPEDEFS.iter().copied().collect()
    }

    /// Parses a list of type names, one per line. Blank lines and text after
    /// `#` are ignored.
    #[must_use]
    pub fn parse_list(text: &str) -> Self {
        text.lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Adds a type name, returning `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Iterates over the names in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for KnownTypes {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

/// Returns `true` if `keyword` names a primitive base type.
#[inline]
#[must_use]
pub fn is_primitive(keyword: &str) -> bool {
    PRIMITIVE_TYPES.contains(&keyword)
}

/// Returns `true` if `keyword` is a type qualifier.
#[inline]
#[must_use]
pub fn is_qualifier(keyword: &str) -> bool {
    TYPE_QUALIFIERS.contains(&keyword)
}

/// Returns `true` if `keyword` may start a declaration.
#[must_use]
pub fn starts_declaration(keyword: &str) -> bool {
    keyword == "typedef"
        || keyword == "__extension__"
        || is_primitive(keyword)
        || is_qualifier(keyword)
        || STORAGE_CLASSES.contains(&keyword)
        || ATTRIBUTE_KEYWORDS.contains(&keyword)
        || TYPEOF_KEYWORDS.contains(&keyword)
        || RECORD_KEYWORDS.contains(&keyword)
}
