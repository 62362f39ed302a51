use crate::nom_utils::Span;
use crate::scanner::{is_keyword_delimiter, is_value_delimiter, Scanner};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// A method, ptype or property name
    Keyword(&'a str),
    /// A quoted string, or a bare token read in value position
    Value(String),
    Equals,
    Semicolon,
    Slash,
    Dot,
    /// A character that cannot start any token here, such as an
    /// unbalanced `)`
    Stray(char),
}

#[derive(Debug, Clone)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Input starting at this token
    pub span: Span<'a>,
}

/// Lazily turns a header value into tokens, with comments and
/// whitespace removed.
///
/// Whether a bare run of characters is a `Keyword` or a `Value`
/// depends on where it appears: everything before the first `;` and
/// anything directly after `=` is read as a value, so that tokens such
/// as `example.com`, `@example.net` or `abc=` are not split on their
/// embedded punctuation.
pub(crate) struct TokenStream<'a> {
    scanner: Scanner<'a>,
    in_identifier_clause: bool,
    after_equals: bool,
    done: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(text: &'a str, max_comment_depth: usize) -> Self {
        Self {
            scanner: Scanner::new(text, max_comment_depth),
            in_identifier_clause: true,
            after_equals: false,
            done: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        self.scanner.skip_cfws()?;

        let span = self.scanner.position();
        let Some(c) = self.scanner.peek() else {
            return Ok(None);
        };

        let value_position = self.in_identifier_clause || self.after_equals;
        self.after_equals = false;

        let kind = match c {
            ';' => {
                self.scanner.take_char();
                self.in_identifier_clause = false;
                TokenKind::Semicolon
            }
            '"' => TokenKind::Value(self.scanner.quoted_string()?),
            ')' if value_position => {
                self.scanner.take_char();
                TokenKind::Stray(c)
            }
            _ if value_position => {
                TokenKind::Value(self.scanner.bare_token(is_value_delimiter)?)
            }
            '=' => {
                self.scanner.take_char();
                self.after_equals = true;
                TokenKind::Equals
            }
            '.' => {
                self.scanner.take_char();
                TokenKind::Dot
            }
            '/' => {
                self.scanner.take_char();
                TokenKind::Slash
            }
            c if !is_keyword_delimiter(c) => TokenKind::Keyword(self.scanner.keyword()?),
            c => {
                self.scanner.take_char();
                TokenKind::Stray(c)
            }
        };

        Ok(Some(Token { kind, span }))
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
