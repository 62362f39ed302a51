//! Recursive descent over the token stream.
//!
//! ```text
//! header       = identifier [version] ";" resinfo-list
//! resinfo-list = resinfo *(";" resinfo) / "none"
//! resinfo      = method ["/" version] "=" result [reason] *property
//! reason       = "reason" "=" value
//! property     = ptype "." property "=" value
//! ```
//!
//! Problems in the identifier clause fail the whole parse. Problems
//! inside a single resinfo only cost that resinfo (or the rest of its
//! properties); parsing resumes after the next `;`.
use crate::nom_utils::location;
use crate::results::{Property, RawResult};
use crate::token::{Token, TokenKind, TokenStream};
use crate::{AuthResultsError, ParseOptions, Result};

const SUPPORTED_VERSION: u32 = 1;

/// One token of lookahead over a `TokenStream`
struct Cursor<'a> {
    tokens: TokenStream<'a>,
    peeked: Option<Token<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, options: &ParseOptions) -> Self {
        Self {
            tokens: TokenStream::new(text, options.max_comment_depth),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&Token<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next().transpose()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn peek_kind(&mut self) -> Result<Option<&TokenKind<'a>>> {
        Ok(self.peek()?.map(|token| &token.kind))
    }

    fn next(&mut self) -> Result<Option<Token<'a>>> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.tokens.next().transpose(),
        }
    }

    fn at_entry_boundary(&mut self) -> Result<bool> {
        Ok(matches!(self.peek_kind()?, None | Some(TokenKind::Semicolon)))
    }

    /// Consumes the next token if it is `kind`
    fn eat(&mut self, kind: TokenKind<'a>) -> Result<bool> {
        if self.peek_kind()? == Some(&kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn keyword(&mut self) -> Result<Option<&'a str>> {
        match self.peek_kind()? {
            Some(TokenKind::Keyword(word)) => {
                let word = *word;
                self.next()?;
                Ok(Some(word))
            }
            _ => Ok(None),
        }
    }

    fn value(&mut self) -> Result<Option<String>> {
        if !matches!(self.peek_kind()?, Some(TokenKind::Value(_))) {
            return Ok(None);
        }
        match self.next()? {
            Some(Token {
                kind: TokenKind::Value(value),
                ..
            }) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Discards tokens up to, but not including, the next `;`
    fn skip_malformed(&mut self, method: &str, expected: &'static str) -> Result<()> {
        match self.peek()?.map(|token| location(&token.span)) {
            Some((line, column)) => tracing::debug!(
                method,
                expected,
                line,
                column,
                "skipping malformed result entry"
            ),
            None => tracing::debug!(method, expected, "skipping truncated result entry"),
        }

        while !self.at_entry_boundary()? {
            self.next()?;
        }
        Ok(())
    }
}

/// Parses a complete header value into its identifier and raw entries
pub(crate) fn parse_header(
    text: &str,
    options: &ParseOptions,
) -> Result<(String, Vec<RawResult>)> {
    let mut cursor = Cursor::new(text, options);

    let Some(identifier) = identifier_clause(&mut cursor)? else {
        return Ok((String::new(), vec![]));
    };
    let results = resinfo_list(&mut cursor)?;

    Ok((identifier, results))
}

/// Everything before the first `;`: the identifier and an optional
/// version. Returns `None` when there is no `;` at all.
fn identifier_clause(cursor: &mut Cursor) -> Result<Option<String>> {
    let mut clause = vec![];
    loop {
        match cursor.next()? {
            None => {
                tracing::trace!("no ';' after the identifier, treating header as empty");
                return Ok(None);
            }
            Some(Token {
                kind: TokenKind::Semicolon,
                ..
            }) => break,
            Some(token) => clause.push(token),
        }
    }

    let mut clause = clause.into_iter();

    let identifier = match clause.next() {
        Some(Token {
            kind: TokenKind::Value(identifier),
            ..
        }) => identifier,
        _ => return Err(AuthResultsError::NoIdentifier),
    };

    if let Some(token) = clause.next() {
        let version = match &token.kind {
            TokenKind::Value(v) if !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()) => v,
            _ => return Err(AuthResultsError::missing_semicolon(&token.span)),
        };
        if version.parse::<u32>().ok() != Some(SUPPORTED_VERSION) {
            return Err(AuthResultsError::UnsupportedVersion(version.to_string()));
        }
    }

    if let Some(token) = clause.next() {
        return Err(AuthResultsError::missing_semicolon(&token.span));
    }

    Ok(Some(identifier))
}

fn resinfo_list(cursor: &mut Cursor) -> Result<Vec<RawResult>> {
    let mut results = vec![];
    loop {
        match cursor.peek_kind()? {
            None => break,
            Some(TokenKind::Semicolon) => {
                cursor.next()?;
            }
            Some(_) => {
                if let Some(result) = resinfo(cursor)? {
                    results.push(result);
                }
            }
        }
    }
    Ok(results)
}

fn resinfo(cursor: &mut Cursor) -> Result<Option<RawResult>> {
    let Some(method) = cursor.keyword()? else {
        cursor.skip_malformed("", "method")?;
        return Ok(None);
    };

    if method.eq_ignore_ascii_case("none") && cursor.at_entry_boundary()? {
        return Ok(None);
    }

    if cursor.eat(TokenKind::Slash)? {
        match cursor.keyword()? {
            Some(version) if version.chars().all(|c| c.is_ascii_digit()) => {}
            _ => {
                cursor.skip_malformed(method, "method version")?;
                return Ok(None);
            }
        }
    }

    if !cursor.eat(TokenKind::Equals)? {
        cursor.skip_malformed(method, "'='")?;
        return Ok(None);
    }

    let Some(value) = cursor.value()? else {
        cursor.skip_malformed(method, "result")?;
        return Ok(None);
    };

    let mut result = RawResult::new(method, value);
    while !cursor.at_entry_boundary()? {
        if !property(cursor, &mut result)? {
            cursor.skip_malformed(method, "property")?;
            break;
        }
    }

    Ok(Some(result))
}

/// Reads either `reason=value` or `ptype.property=value` into `result`.
/// Returns false if the tokens don't make up a property.
fn property(cursor: &mut Cursor, result: &mut RawResult) -> Result<bool> {
    let Some(ptype) = cursor.keyword()? else {
        return Ok(false);
    };

    if ptype.eq_ignore_ascii_case("reason") && cursor.eat(TokenKind::Equals)? {
        return match cursor.value()? {
            Some(reason) => {
                result.reason = Some(reason);
                Ok(true)
            }
            None => Ok(false),
        };
    }

    if !cursor.eat(TokenKind::Dot)? {
        return Ok(false);
    }
    let Some(name) = cursor.keyword()? else {
        return Ok(false);
    };
    if !cursor.eat(TokenKind::Equals)? {
        return Ok(false);
    }
    let Some(value) = cursor.value()? else {
        return Ok(false);
    };

    result.set_property(Property::new(ptype, name, value));
    Ok(true)
}
