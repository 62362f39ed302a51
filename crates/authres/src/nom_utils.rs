use nom::error::{ContextError, ErrorKind};
use nom_locate::LocatedSpan;
use std::fmt::Debug;

pub(crate) type Span<'a> = LocatedSpan<&'a str>;
pub(crate) type IResult<'a, A, B> = nom::IResult<A, B, ParseError<Span<'a>>>;

pub(crate) fn make_span(s: &str) -> Span {
    Span::new(s)
}

#[derive(Debug)]
pub enum ParseErrorKind {
    /// The construct that was being read, from `nom::error::context`
    Context(&'static str),
    Nom(ErrorKind),
    /// Comment nesting went past the configured limit
    DepthExceeded(usize),
}

#[derive(Debug)]
pub struct ParseError<I: Debug> {
    pub errors: Vec<(I, ParseErrorKind)>,
}

impl<I: Debug> ContextError<I> for ParseError<I> {
    fn add_context(input: I, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ParseErrorKind::Context(ctx)));
        other
    }
}

impl<I: Debug> nom::error::ParseError<I> for ParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self {
            errors: vec![(input, ParseErrorKind::Nom(kind))],
        }
    }

    fn append(input: I, kind: ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, ParseErrorKind::Nom(kind)));
        other
    }
}

/// Produces a non-recoverable error; `alt` and `many0` won't try
/// other branches once this has been returned.
pub(crate) fn make_depth_failure(input: Span<'_>, max_depth: usize) -> nom::Err<ParseError<Span<'_>>> {
    nom::Err::Failure(ParseError {
        errors: vec![(input, ParseErrorKind::DepthExceeded(max_depth))],
    })
}

/// 1-based line and column of a span, suitable for error messages
pub(crate) fn location(span: &Span) -> (u32, usize) {
    (span.location_line(), span.get_utf8_column())
}
