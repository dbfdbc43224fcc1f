//! Lexical Analysis
//!
//! Pass that splits the text of a _C_ function into tokens. Whitespace,
//! comments, line splices, and preprocessor directive lines are never tokens
//! of their own: they are attached to the following token as leading trivia,
//! so concatenating `trivia + text` over all tokens reproduces the input.

use std::fmt;

use crate::error::{LexError, LexErrorKind};

/// Reserved words (_C17_ plus the _GNU_ spellings common in real code).
pub const KEYWORDS: [&str; 57] = [
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
    "__attribute__",
    "__declspec",
    "__extension__",
    "__inline",
    "__inline__",
    "__restrict",
    "__restrict__",
    "__const",
    "__volatile__",
    "__typeof__",
    "typeof",
    "asm",
    "__asm__",
];

/// Types of punctuators.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `.` member access.
    Dot,
    /// `->` member access through pointer.
    Arrow,
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `&` bitwise AND or address-of.
    Ampersand,
    /// `*` multiplication, dereference, or pointer declarator.
    Asterisk,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `~`
    BitNot,
    /// `!`
    LogNot,
    /// `/`
    Division,
    /// `%`
    Remainder,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanEq,
    /// `>=`
    GreaterThanEq,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `^`
    BitXor,
    /// `|`
    BitOr,
    /// `&&`
    LogAnd,
    /// `||`
    LogOr,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `...`
    Ellipsis,
    /// `=`
    Assign,
    /// `*=`
    AssignAsterisk,
    /// `/=`
    AssignDivision,
    /// `%=`
    AssignRemainder,
    /// `+=`
    AssignPlus,
    /// `-=`
    AssignMinus,
    /// `<<=`
    AssignShiftLeft,
    /// `>>=`
    AssignShiftRight,
    /// `&=`
    AssignAmpersand,
    /// `^=`
    AssignBitXor,
    /// `|=`
    AssignBitOr,
    /// `,`
    Comma,
    /// `#` (only outside directive lines, e.g. inside macro-heavy code).
    Hash,
    /// `##`
    HashHash,
}

/// Punctuator spellings, longest first so lookups follow maximal munch.
const PUNCTUATORS: [(&str, Punct); 48] = [
    ("...", Punct::Ellipsis),
    ("<<=", Punct::AssignShiftLeft),
    (">>=", Punct::AssignShiftRight),
    ("->", Punct::Arrow),
    ("++", Punct::Increment),
    ("--", Punct::Decrement),
    ("<<", Punct::ShiftLeft),
    (">>", Punct::ShiftRight),
    ("<=", Punct::LessThanEq),
    (">=", Punct::GreaterThanEq),
    ("==", Punct::Eq),
    ("!=", Punct::NotEq),
    ("&&", Punct::LogAnd),
    ("||", Punct::LogOr),
    ("*=", Punct::AssignAsterisk),
    ("/=", Punct::AssignDivision),
    ("%=", Punct::AssignRemainder),
    ("+=", Punct::AssignPlus),
    ("-=", Punct::AssignMinus),
    ("&=", Punct::AssignAmpersand),
    ("^=", Punct::AssignBitXor),
    ("|=", Punct::AssignBitOr),
    ("##", Punct::HashHash),
    ("[", Punct::BracketOpen),
    ("]", Punct::BracketClose),
    ("(", Punct::ParenOpen),
    (")", Punct::ParenClose),
    ("{", Punct::BraceOpen),
    ("}", Punct::BraceClose),
    (".", Punct::Dot),
    ("&", Punct::Ampersand),
    ("*", Punct::Asterisk),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("~", Punct::BitNot),
    ("!", Punct::LogNot),
    ("/", Punct::Division),
    ("%", Punct::Remainder),
    ("<", Punct::LessThan),
    (">", Punct::GreaterThan),
    ("^", Punct::BitXor),
    ("|", Punct::BitOr),
    ("?", Punct::Question),
    (":", Punct::Colon),
    (";", Punct::Semicolon),
    ("=", Punct::Assign),
    (",", Punct::Comma),
    ("#", Punct::Hash),
];

impl Punct {
    /// Returns the source spelling of the punctuator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        PUNCTUATORS
            .iter()
            .find(|(_, p)| *p == self)
            .map_or("", |(s, _)| *s)
    }

    /// Returns `true` for `(`, `[`, and `{`.
    #[inline]
    #[must_use]
    pub const fn is_opener(self) -> bool {
        matches!(self, Punct::ParenOpen | Punct::BracketOpen | Punct::BraceOpen)
    }

    /// Returns `true` for `)`, `]`, and `}`.
    #[inline]
    #[must_use]
    pub const fn is_closer(self) -> bool {
        matches!(
            self,
            Punct::ParenClose | Punct::BracketClose | Punct::BraceClose
        )
    }

    /// Returns the closer matching an opener.
    #[inline]
    #[must_use]
    pub const fn closer(self) -> Option<Punct> {
        match self {
            Punct::ParenOpen => Some(Punct::ParenClose),
            Punct::BracketOpen => Some(Punct::BracketClose),
            Punct::BraceOpen => Some(Punct::BraceClose),
            _ => None,
        }
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "punct('{}')", self.as_str())
    }
}

impl fmt::Debug for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Types of lexical elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Ident,
    /// Preprocessing number (integer or floating, any suffix).
    Number,
    /// String literal, including any encoding prefix.
    Str,
    /// Character constant, including any encoding prefix.
    Char,
    Punct(Punct),
    /// Byte sequence that forms no _C_ token (e.g., '@', '`'), kept verbatim.
    Unknown,
    /// End of input. Text is empty, trivia holds anything after the last
    /// real token.
    Eof,
}

/// Location of a processed `Token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Byte offset of the token text (after its trivia).
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Minimal lexical element, borrowing its text from the source.
#[derive(Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Whitespace, comments, and directive lines preceding `text`.
    pub trivia: &'a str,
    pub loc: Location,
}

impl Token<'_> {
    #[inline]
    #[must_use]
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    #[inline]
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    #[inline]
    #[must_use]
    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Keyword => write!(f, "{}\t    keyword({:?})", self.loc, self.text),
            TokenKind::Ident => write!(f, "{}\t    ident({:?})", self.loc, self.text),
            TokenKind::Number => write!(f, "{}\t    number({:?})", self.loc, self.text),
            TokenKind::Str => write!(f, "{}\t    string({})", self.loc, self.text),
            TokenKind::Char => write!(f, "{}\t    char({})", self.loc, self.text),
            TokenKind::Punct(p) => write!(f, "{}\t    {p}", self.loc),
            TokenKind::Unknown => write!(f, "{}\t    unknown({:?})", self.loc, self.text),
            TokenKind::Eof => write!(f, "{}\t    eof", self.loc),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Produces tokens lazily from the text of a _C_ function. The final item is
/// always an [`TokenKind::Eof`] token unless an error is returned first.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    cur: usize,
    // Index of the beginning of the current line (to calculate the column).
    bol: usize,
    line: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Returns a new `Lexer`.
    #[must_use]
    pub const fn new(src: &'a str) -> Self {
        Self {
            src,
            cur: 0,
            bol: 0,
            line: 1,
            done: false,
        }
    }

    /// Advances one byte, keeping line bookkeeping current.
    #[inline]
    fn bump(&mut self) {
        if self.first() == b'\n' {
            self.line += 1;
            self.bol = self.cur + 1;
        }

        self.cur += 1;
    }

    /// Returns the location of the cursor.
    #[inline]
    const fn loc(&self) -> Location {
        Location {
            offset: self.cur,
            line: self.line,
            col: self.cur - self.bol + 1,
        }
    }

    /// Returns the byte at the cursor. Does **not** update the cursor position.
    ///
    /// # Panics
    ///
    /// Will _panic_ if the cursor position is out of bounds.
    #[inline]
    fn first(&self) -> u8 {
        self.src.as_bytes()[self.cur]
    }

    /// Returns the byte `n` positions past the cursor, if any.
    #[inline]
    fn peek(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.cur + n).copied()
    }

    /// Returns `true` if the cursor position is within bounds of `src`.
    #[inline]
    const fn has_next(&self) -> bool {
        self.cur < self.src.len()
    }

    /// Returns the length of a line splice (`\` + newline) at the cursor, or 0.
    fn splice_len(&self) -> usize {
        match (self.peek(0), self.peek(1), self.peek(2)) {
            (Some(b'\\'), Some(b'\n'), _) => 2,
            (Some(b'\\'), Some(b'\r'), Some(b'\n')) => 3,
            _ => 0,
        }
    }

    /// Returns `true` if only blanks precede the cursor on the current line.
    fn at_line_start(&self) -> bool {
        self.src.as_bytes()[self.bol..self.cur]
            .iter()
            .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c'))
    }

    /// Skips over all whitespace, comments, splices, and directive lines.
    fn consume_trivia(&mut self) -> Result<(), LexError> {
        while self.has_next() {
            match self.first() {
                b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c' => self.bump(),
                b'\\' if self.splice_len() > 0 => {
                    for _ in 0..self.splice_len() {
                        self.bump();
                    }
                }
                b'/' if self.peek(1) == Some(b'*') => self.consume_block_comment()?,
                b'/' if self.peek(1) == Some(b'/') => self.consume_line_comment(),
                b'#' if self.at_line_start() => self.consume_directive()?,
                _ => break,
            }
        }

        Ok(())
    }

    fn consume_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.loc();
        self.cur += 2;

        loop {
            if !self.has_next() {
                return Err(LexError {
                    kind: LexErrorKind::UnterminatedComment,
                    offset: start.offset,
                    line: start.line,
                    col: start.col,
                });
            }

            if self.first() == b'*' && self.peek(1) == Some(b'/') {
                self.cur += 2;
                return Ok(());
            }

            self.bump();
        }
    }

    /// Skips to the end of a `//` comment, leaving the newline in place.
    fn consume_line_comment(&mut self) {
        while self.has_next() && self.first() != b'\n' {
            let splice = self.splice_len();

            if splice > 0 {
                for _ in 0..splice {
                    self.bump();
                }
            } else {
                self.bump();
            }
        }
    }

    /// Skips a whole preprocessor directive, including continuation lines
    /// and any comments inside it. Literals are not interpreted here, so
    /// `#error don't` is fine.
    fn consume_directive(&mut self) -> Result<(), LexError> {
        while self.has_next() && self.first() != b'\n' {
            let splice = self.splice_len();

            if splice > 0 {
                for _ in 0..splice {
                    self.bump();
                }
            } else if self.first() == b'/' && self.peek(1) == Some(b'*') {
                self.consume_block_comment()?;
            } else if self.first() == b'/' && self.peek(1) == Some(b'/') {
                self.consume_line_comment();
            } else {
                self.bump();
            }
        }

        Ok(())
    }

    /// Returns `true` for bytes that may continue an identifier. Bytes above
    /// _ASCII_ are accepted so _UTF-8_ identifiers stay in one token.
    #[inline]
    const fn is_ident_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
    }

    /// Skips over an identifier or keyword. An encoding prefix directly
    /// followed by a quote continues as a literal.
    fn consume_ident(&mut self) -> Result<TokenKind, LexError> {
        let start = self.cur;

        while self.has_next() && Self::is_ident_byte(self.first()) {
            self.cur += 1;
        }

        let token = &self.src[start..self.cur];

        if matches!(token, "L" | "u" | "U" | "u8") {
            match self.peek(0) {
                Some(b'"') => return self.consume_quoted(b'"').map(|()| TokenKind::Str),
                Some(b'\'') => return self.consume_quoted(b'\'').map(|()| TokenKind::Char),
                _ => {}
            }
        }

        if KEYWORDS.contains(&token) {
            Ok(TokenKind::Keyword)
        } else {
            Ok(TokenKind::Ident)
        }
    }

    /// Skips over a preprocessing number (digits, letters, `.`, `'`, and
    /// signed exponents).
    fn consume_number(&mut self) {
        self.cur += 1;

        while self.has_next() {
            let b = self.first();

            if matches!(b, b'+' | b'-')
                && matches!(
                    self.src.as_bytes()[self.cur - 1],
                    b'e' | b'E' | b'p' | b'P'
                )
            {
                self.cur += 1;
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'\'' {
                self.cur += 1;
            } else {
                break;
            }
        }
    }

    /// Skips over a string or character literal starting at the cursor.
    fn consume_quoted(&mut self, quote: u8) -> Result<(), LexError> {
        let start = self.loc();
        let kind = if quote == b'"' {
            LexErrorKind::UnterminatedString
        } else {
            LexErrorKind::UnterminatedChar
        };

        self.cur += 1;

        loop {
            if !self.has_next() || self.first() == b'\n' {
                return Err(LexError {
                    kind,
                    offset: start.offset,
                    line: start.line,
                    col: start.col,
                });
            }

            match self.first() {
                b'\\' => {
                    // Escaped byte may be a newline (line splice).
                    self.bump();

                    if self.has_next() {
                        if self.first() == b'\r' && self.peek(1) == Some(b'\n') {
                            self.bump();
                        }

                        self.bump();
                    }
                }
                b if b == quote => {
                    self.cur += 1;
                    return Ok(());
                }
                _ => self.bump(),
            }
        }
    }

    /// Skips over a punctuator using maximal munch.
    fn consume_punct(&mut self) -> Option<Punct> {
        let rest = &self.src.as_bytes()[self.cur..];

        let (spelling, punct) = PUNCTUATORS
            .iter()
            .find(|(s, _)| rest.starts_with(s.as_bytes()))?;

        self.cur += spelling.len();
        Some(*punct)
    }

    /// Skips a single unrecognized character.
    fn consume_unknown(&mut self) {
        let width = self.src[self.cur..].chars().next().map_or(1, char::len_utf8);
        self.cur += width;
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let src = self.src;
        let trivia_start = self.cur;

        if let Err(err) = self.consume_trivia() {
            self.done = true;
            return Some(Err(err));
        }

        let trivia = &src[trivia_start..self.cur];
        let loc = self.loc();

        if !self.has_next() {
            self.done = true;

            return Some(Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                trivia,
                loc,
            }));
        }

        let kind = match self.first() {
            b'0'..=b'9' => {
                self.consume_number();
                Ok(TokenKind::Number)
            }
            b'.' if self.peek(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.consume_number();
                Ok(TokenKind::Number)
            }
            b if Self::is_ident_byte(b) => self.consume_ident(),
            b'"' => self.consume_quoted(b'"').map(|()| TokenKind::Str),
            b'\'' => self.consume_quoted(b'\'').map(|()| TokenKind::Char),
            _ => match self.consume_punct() {
                Some(punct) => Ok(TokenKind::Punct(punct)),
                None => {
                    self.consume_unknown();
                    Ok(TokenKind::Unknown)
                }
            },
        };

        match kind {
            Ok(kind) => Some(Ok(Token {
                kind,
                text: &src[loc.offset..self.cur],
                trivia,
                loc,
            })),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl fmt::Display for Lexer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexer = Lexer::new(self.src);

        for token in lexer {
            match token {
                Ok(token) => writeln!(f, "{token}")?,
                Err(err) => writeln!(f, "\n{err}\n")?,
            }
        }

        Ok(())
    }
}

/// Lexes the whole function, returning every token including the trailing
/// [`TokenKind::Eof`].
///
/// # Errors
///
/// Returns a [`LexError`] on an unterminated string literal, character
/// literal, or block comment.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(src).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("source should lex")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    fn reassemble(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(|t| format!("{}{}", t.trivia, t.text)).collect()
    }

    #[test]
    fn lexer_reassembles_input_exactly() {
        let source = "int f(void) /* {{{ */\n{\n\tchar *p = \"}{\"; // '\n  return 'x';\n}\n/* }}} */\n";
        let tokens = tokenize(source).expect("source should lex");

        assert_eq!(reassemble(&tokens), source);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(tokens.last().map(|t| t.trivia), Some("\n/* }}} */\n"));
    }

    #[test]
    fn lexer_braces_inside_literals_are_not_punctuators() {
        let tokens = tokenize("{ s = \"{\"; c = '}'; }").expect("source should lex");
        let braces = tokens
            .iter()
            .filter(|t| t.is_punct(Punct::BraceOpen) || t.is_punct(Punct::BraceClose))
            .count();

        assert_eq!(braces, 2);
    }

    #[test]
    fn lexer_maximal_munch() {
        let texts: Vec<_> = tokenize("a->b <<= c ... d++")
            .expect("source should lex")
            .iter()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, ["a", "->", "b", "<<=", "c", "...", "d", "++", ""]);
    }

    #[test]
    fn lexer_keywords_and_identifiers() {
        assert_eq!(
            kinds("const char *name"),
            [
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Punct(Punct::Asterisk),
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexer_prefixed_literals() {
        assert_eq!(
            kinds("L\"wide\" u8\"x\" U'c' u"),
            [
                TokenKind::Str,
                TokenKind::Str,
                TokenKind::Char,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexer_numbers_with_exponents_and_suffixes() {
        let texts: Vec<_> = tokenize("1e-5 0x1p+3f 10UL .5 x-1")
            .expect("source should lex")
            .iter()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, ["1e-5", "0x1p+3f", "10UL", ".5", "x", "-", "1", ""]);
    }

    #[test]
    fn lexer_directive_lines_are_trivia() {
        let source = "{\n#define X(a) \\\n  { a }\n  x;\n}";
        let tokens = tokenize(source).expect("source should lex");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();

        assert_eq!(texts, ["{", "x", ";", "}", ""]);
        assert_eq!(tokens[1].trivia, "\n#define X(a) \\\n  { a }\n  ");
        assert_eq!(tokens[1].loc.line, 4);
    }

    #[test]
    fn lexer_hash_in_expression_is_punct() {
        assert_eq!(
            kinds("a # b"),
            [
                TokenKind::Ident,
                TokenKind::Punct(Punct::Hash),
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexer_stray_bytes_are_kept() {
        let tokens = tokenize("a @ `b").expect("source should lex");

        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, "@");
        assert_eq!(reassemble(&tokens), "a @ `b");
    }

    #[test]
    fn lexer_tracks_line_and_column() {
        let tokens = tokenize("{\n    int x;\n}").expect("source should lex");

        assert_eq!(tokens[1].loc, Location { offset: 6, line: 2, col: 5 });
        assert_eq!(tokens[4].loc.line, 3);
    }

    #[test]
    fn lexer_invalid_unterminated_string() {
        let err = tokenize("{ s = \"abc;\n}").expect_err("string is unterminated");

        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.offset, 6);
        assert_eq!((err.line, err.col), (1, 7));
    }

    #[test]
    fn lexer_invalid_unterminated_char() {
        let err = tokenize("c = 'a").expect_err("char is unterminated");

        assert_eq!(err.kind, LexErrorKind::UnterminatedChar);
    }

    #[test]
    fn lexer_invalid_unterminated_comment() {
        let err = tokenize("{\n  /* open\n}").expect_err("comment is unterminated");

        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!((err.line, err.col), (2, 3));
    }

    #[test]
    fn lexer_escaped_quote_and_splice_in_string() {
        let source = "s = \"a\\\"b\\\nc\";";
        let tokens = tokenize(source).expect("source should lex");

        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert_eq!(reassemble(&tokens), source);
    }
}
