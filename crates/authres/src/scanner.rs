//! Character level cursor over a header value.
//!
//! The scanner knows about three lexical states: ordinary text,
//! comments and quoted strings. Comments are never surfaced to the
//! layers above; `skip_cfws` treats a comment exactly like a run of
//! whitespace.
use crate::nom_utils::{make_depth_failure, make_span, IResult, ParseError, Span};
use crate::{AuthResultsError, Result};
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::recognize;
use nom::error::{context, ErrorKind, ParseError as _};
use nom::multi::many0;
use nom::{Input, Parser};

fn is_fws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Delimits a bare value: an identifier, a result, a reason or a
/// property value
pub(crate) fn is_value_delimiter(c: char) -> bool {
    is_fws(c) || matches!(c, ';' | '(' | ')' | '"')
}

/// Delimits a keyword: a method, ptype or property name
pub(crate) fn is_keyword_delimiter(c: char) -> bool {
    is_value_delimiter(c) || matches!(c, '=' | '.' | '/' | '\\')
}

// Line breaks are accepted anywhere whitespace is, so a folded header
// looks the same as an unfolded one to the grammar
fn fws(input: Span) -> IResult<Span, Span> {
    context("fws", take_while1(is_fws)).parse(input)
}

// comment = "(" *(ctext / quoted-pair / comment) ")"
// Nesting is tracked with a counter rather than by recursing.
// A comment that is still open at end of input swallows the rest
// of the input.
fn comment<'a>(max_depth: usize) -> impl FnMut(Span<'a>) -> IResult<'a, Span<'a>, Span<'a>> {
    move |input: Span<'a>| {
        char::<_, ParseError<Span<'a>>>('(').parse(input)?;
        if max_depth == 0 {
            return Err(make_depth_failure(input, max_depth));
        }

        let text: &str = input.fragment();
        let mut chars = text.char_indices().skip(1);
        let mut depth = 1usize;
        let mut end = text.len();

        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '(' => {
                    depth += 1;
                    if depth > max_depth {
                        let (at, _) = input.take_split(idx);
                        return Err(make_depth_failure(at, max_depth));
                    }
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = idx + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        Ok(input.take_split(end))
    }
}

// cfws = *(fws / comment)
fn cfws<'a>(max_depth: usize) -> impl FnMut(Span<'a>) -> IResult<'a, Span<'a>, Span<'a>> {
    move |input: Span<'a>| {
        context("cfws", recognize(many0(alt((fws, comment(max_depth)))))).parse(input)
    }
}

// quoted-string = DQUOTE *(qtext / quoted-pair) DQUOTE
// The returned value has the escapes resolved.
fn quoted_string(input: Span) -> IResult<Span, String> {
    let (rest, _) = context("quoted string", char::<_, ParseError<Span<'_>>>('"')).parse(input)?;

    let text: &str = rest.fragment();
    let mut chars = text.char_indices();
    let mut value = String::new();
    let mut end = text.len();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            '"' => {
                end = idx + 1;
                break;
            }
            c => value.push(c),
        }
    }

    let (rest, _) = rest.take_split(end);
    Ok((rest, value))
}

// Everything up to the next unescaped delimiter, with escapes resolved
fn bare_token<'a>(
    is_delimiter: fn(char) -> bool,
) -> impl FnMut(Span<'a>) -> IResult<'a, Span<'a>, String> {
    move |input: Span<'a>| {
        let text: &str = input.fragment();
        let mut chars = text.char_indices();
        let mut value = String::new();
        let mut end = text.len();

        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => value.push(c),
                },
                c if is_delimiter(c) => {
                    end = idx;
                    break;
                }
                c => value.push(c),
            }
        }

        if end == 0 {
            return Err(nom::Err::Error(ParseError::from_error_kind(
                input,
                ErrorKind::TakeWhile1,
            )));
        }

        let (rest, _) = input.take_split(end);
        Ok((rest, value))
    }
}

fn keyword(input: Span) -> IResult<Span, Span> {
    context("keyword", take_while1(|c: char| !is_keyword_delimiter(c))).parse(input)
}

pub(crate) struct Scanner<'a> {
    input: Span<'a>,
    remaining: Span<'a>,
    max_comment_depth: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str, max_comment_depth: usize) -> Self {
        let input = make_span(text);
        Self {
            input,
            remaining: input,
            max_comment_depth,
        }
    }

    fn run<O, P>(&mut self, mut parser: P) -> Result<O>
    where
        P: Parser<Span<'a>, Output = O, Error = ParseError<Span<'a>>>,
    {
        let (rest, output) = parser
            .parse(self.remaining)
            .map_err(|err| AuthResultsError::from_nom(self.input, err))?;
        self.remaining = rest;
        Ok(output)
    }

    /// The unconsumed input, used to report locations
    pub fn position(&self) -> Span<'a> {
        self.remaining
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining.fragment().chars().next()
    }

    /// Skips any mixture of whitespace, line breaks and comments
    pub fn skip_cfws(&mut self) -> Result<()> {
        self.run(cfws(self.max_comment_depth))?;
        Ok(())
    }

    pub fn take_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        let (rest, _) = self.remaining.take_split(c.len_utf8());
        self.remaining = rest;
        Some(c)
    }

    pub fn quoted_string(&mut self) -> Result<String> {
        self.run(quoted_string)
    }

    pub fn bare_token(&mut self, is_delimiter: fn(char) -> bool) -> Result<String> {
        self.run(context("value", bare_token(is_delimiter)))
    }

    pub fn keyword(&mut self) -> Result<&'a str> {
        let span = self.run(keyword)?;
        Ok(*span.fragment())
    }
}
