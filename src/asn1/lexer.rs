//! Splitting ASN.1 source text into tokens.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::str::CharIndices;
use super::error::ParseError;


//------------ TokenKind -----------------------------------------------------

/// The kind of a token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    /// A keyword or reference, including hyphenated ones.
    Word,

    /// A non-negative decimal number.
    Number,

    /// A quoted character string.
    CString,

    /// A binary or hexadecimal string such as `'0101'B`.
    BString,

    /// `::=`
    Assignment,

    /// `...`
    Ellipsis,

    /// `..`
    Range,

    /// Any other single character.
    Symbol(char),
}


//------------ Token ---------------------------------------------------------

/// A token of ASN.1 source text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    /// What kind of token this is.
    pub kind: TokenKind,

    /// The source text of the token.
    pub value: &'a str,

    /// The byte offset of the token in the source.
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Returns whether the token is the given word.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.value == word
    }

    /// Returns whether the token is the given symbol.
    pub fn is_symbol(&self, c: char) -> bool {
        self.kind == TokenKind::Symbol(c)
    }
}


//------------ Lexer ---------------------------------------------------------

/// State for converting a source string into a token stream.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    /// Iterator over all chars in the source.
    chars: CharIndices<'a>,

    /// The original source text.
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Lexer { chars: source.char_indices(), source }
    }

    /// Converts the complete source into tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        let mut res = Vec::new();
        while let Some(token) = self.next_token()? {
            res.push(token)
        }
        Ok(res)
    }

    /// Returns the next token or `None` at the end of the source.
    ///
    /// Skips all whitespace and comments before the start of the token.
    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        loop {
            let (offset, c) = match self.peek(0) {
                Some(item) => item,
                None => return Ok(None)
            };
            if is_whitespace(c) {
                self.chars.next();
                continue;
            }
            if c == '-' && matches!(self.peek(1), Some((_, '-'))) {
                self.single_comment();
                continue;
            }
            if c == '/' && matches!(self.peek(1), Some((_, '*'))) {
                self.multi_comment(offset)?;
                continue;
            }

            let token = if c.is_ascii_alphabetic() {
                self.word(offset)
            }
            else if c.is_ascii_digit() {
                self.number(offset)
            }
            else if c == '"' {
                self.cstring(offset)?
            }
            else if c == '\'' {
                self.bstring(offset)?
            }
            else if self.source[offset..].starts_with("::=") {
                self.take(TokenKind::Assignment, offset, 3)
            }
            else if self.source[offset..].starts_with("...") {
                self.take(TokenKind::Ellipsis, offset, 3)
            }
            else if self.source[offset..].starts_with("..") {
                self.take(TokenKind::Range, offset, 2)
            }
            else {
                self.take(TokenKind::Symbol(c), offset, 1)
            };
            return Ok(Some(token))
        }
    }

    fn peek(&self, n: usize) -> Option<(usize, char)> {
        self.chars.clone().nth(n)
    }

    /// Takes a token of `len` characters.
    fn take(&mut self, kind: TokenKind, offset: usize, len: usize) -> Token<'a> {
        let mut end = offset;
        for _ in 0..len {
            if let Some((pos, c)) = self.chars.next() {
                end = pos + c.len_utf8();
            }
        }
        Token { kind, value: &self.source[offset..end], offset }
    }

    /// Skips a comment running from `--` to the next `--` or end of line.
    fn single_comment(&mut self) {
        self.chars.next();
        self.chars.next();
        while let Some((_, c)) = self.peek(0) {
            if is_newline(c) {
                break
            }
            self.chars.next();
            if c == '-' && matches!(self.peek(0), Some((_, '-'))) {
                self.chars.next();
                break
            }
        }
    }

    /// Skips a comment between `/*` and `*/`, which may nest.
    fn multi_comment(&mut self, offset: usize) -> Result<(), ParseError> {
        self.chars.next();
        self.chars.next();
        let mut depth = 1;
        while let Some((_, c)) = self.chars.next() {
            if c == '/' && matches!(self.peek(0), Some((_, '*'))) {
                self.chars.next();
                depth += 1;
            }
            else if c == '*' && matches!(self.peek(0), Some((_, '/'))) {
                self.chars.next();
                depth -= 1;
                if depth == 0 {
                    return Ok(())
                }
            }
        }
        Err(ParseError::at(self.source, offset, "unterminated comment"))
    }

    /// Lexes a word.
    ///
    /// Words consist of letters, digits, and single hyphens. They can’t end
    /// in a hyphen.
    fn word(&mut self, offset: usize) -> Token<'a> {
        let mut len = 1;
        loop {
            match self.peek(len) {
                Some((_, c)) if c.is_ascii_alphanumeric() || c == '_' => {
                    len += 1;
                }
                Some((_, '-')) => {
                    match self.peek(len + 1) {
                        Some((_, c)) if c.is_ascii_alphanumeric() => {
                            len += 2;
                        }
                        _ => break
                    }
                }
                _ => break
            }
        }
        self.take(TokenKind::Word, offset, len)
    }

    fn number(&mut self, offset: usize) -> Token<'a> {
        let mut len = 1;
        while matches!(self.peek(len), Some((_, c)) if c.is_ascii_digit()) {
            len += 1;
        }
        self.take(TokenKind::Number, offset, len)
    }

    /// Lexes a quoted string. Doubled quotes stand for a single quote.
    fn cstring(&mut self, offset: usize) -> Result<Token<'a>, ParseError> {
        let mut len = 1;
        loop {
            match self.peek(len) {
                Some((_, '"')) => {
                    if matches!(self.peek(len + 1), Some((_, '"'))) {
                        len += 2;
                    }
                    else {
                        return Ok(self.take(TokenKind::CString, offset, len + 1))
                    }
                }
                Some(_) => len += 1,
                None => {
                    return Err(ParseError::at(
                        self.source, offset, "unterminated string"
                    ))
                }
            }
        }
    }

    /// Lexes a binary or hexadecimal string including its trailing letter.
    fn bstring(&mut self, offset: usize) -> Result<Token<'a>, ParseError> {
        let mut len = 1;
        loop {
            match self.peek(len) {
                Some((_, '\'')) => break,
                Some((_, c)) if c.is_ascii_hexdigit() || is_whitespace(c) => {
                    len += 1
                }
                _ => {
                    return Err(ParseError::at(
                        self.source, offset, "invalid bit or hex string"
                    ))
                }
            }
        }
        match self.peek(len + 1) {
            Some((_, 'B' | 'H')) => {
                Ok(self.take(TokenKind::BString, offset, len + 2))
            }
            _ => {
                Err(ParseError::at(
                    self.source, offset, "invalid bit or hex string"
                ))
            }
        }
    }
}

/// Is the character any valid whitespace
fn is_whitespace(c: char) -> bool {
    "\t \u{A0}".contains(c) || is_newline(c)
}

/// Is the character a valid newline character
fn is_newline(c: char) -> bool {
    "\n\x0B\x0C\r".contains(c)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(source).tokenize().unwrap().into_iter().map(|token| {
            (token.kind, token.value)
        }).collect()
    }

    #[test]
    fn tokens() {
        assert_eq!(
            kinds("Record ::= [APPLICATION 1] SEQUENCE { a-b INTEGER (0..10), ... }"),
            vec![
                (TokenKind::Word, "Record"),
                (TokenKind::Assignment, "::="),
                (TokenKind::Symbol('['), "["),
                (TokenKind::Word, "APPLICATION"),
                (TokenKind::Number, "1"),
                (TokenKind::Symbol(']'), "]"),
                (TokenKind::Word, "SEQUENCE"),
                (TokenKind::Symbol('{'), "{"),
                (TokenKind::Word, "a-b"),
                (TokenKind::Word, "INTEGER"),
                (TokenKind::Symbol('('), "("),
                (TokenKind::Number, "0"),
                (TokenKind::Range, ".."),
                (TokenKind::Number, "10"),
                (TokenKind::Symbol(')'), ")"),
                (TokenKind::Symbol(','), ","),
                (TokenKind::Ellipsis, "..."),
                (TokenKind::Symbol('}'), "}"),
            ]
        );
    }

    #[test]
    fn comments() {
        assert_eq!(
            kinds("a -- one -- b -- two\nc /* x /* y */ z */ d"),
            vec![
                (TokenKind::Word, "a"),
                (TokenKind::Word, "b"),
                (TokenKind::Word, "c"),
                (TokenKind::Word, "d"),
            ]
        );
        assert_eq!(kinds("x-- trailing"), vec![(TokenKind::Word, "x")]);

        let err = Lexer::new("a\n  /* open").tokenize().unwrap_err();
        assert_eq!((err.line(), err.column()), (2, 3));
    }

    #[test]
    fn strings() {
        assert_eq!(
            kinds(r#"v "say ""hi""" '0A'H '01'B -5"#),
            vec![
                (TokenKind::Word, "v"),
                (TokenKind::CString, r#""say ""hi""""#),
                (TokenKind::BString, "'0A'H"),
                (TokenKind::BString, "'01'B"),
                (TokenKind::Symbol('-'), "-"),
                (TokenKind::Number, "5"),
            ]
        );
        assert!(Lexer::new("'0A'").tokenize().is_err());
        assert!(Lexer::new("\"open").tokenize().is_err());
    }
}
