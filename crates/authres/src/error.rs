use crate::nom_utils::{location, ParseError, ParseErrorKind, Span};
use nom::Input;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthResultsError {
    #[error("no authentication service identifier found")]
    NoIdentifier,
    #[error("unsupported Authentication-Results version '{0}', only version 1 is supported")]
    UnsupportedVersion(String),
    #[error("expected ';' after the authentication service identifier at line {line}, column {column}")]
    MissingSemicolon { line: u32, column: usize },
    #[error("comments nested deeper than {max_depth} levels at line {line}, column {column}")]
    CommentTooDeep {
        max_depth: usize,
        line: u32,
        column: usize,
    },
    #[error("expected {expected} at line {line}, column {column}")]
    UnexpectedInput {
        expected: String,
        line: u32,
        column: usize,
    },
}

impl AuthResultsError {
    pub(crate) fn from_nom(input: Span, err: nom::Err<ParseError<Span<'_>>>) -> Self {
        let errors = match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.errors,
            nom::Err::Incomplete(_) => {
                let (end, _) = input.take_split(input.input_len());
                let (line, column) = location(&end);
                return Self::UnexpectedInput {
                    expected: "more input".to_string(),
                    line,
                    column,
                };
            }
        };

        for (span, kind) in &errors {
            if let ParseErrorKind::DepthExceeded(max_depth) = kind {
                let (line, column) = location(span);
                return Self::CommentTooDeep {
                    max_depth: *max_depth,
                    line,
                    column,
                };
            }
        }

        // The innermost frame has the position; the nearest context
        // frame names what was being read there
        let expected = errors
            .iter()
            .find_map(|(_, kind)| match kind {
                ParseErrorKind::Context(ctx) => Some(ctx.to_string()),
                _ => None,
            })
            .or_else(|| {
                errors.first().map(|(_, kind)| match kind {
                    ParseErrorKind::Nom(kind) => format!("{kind:?}"),
                    ParseErrorKind::Context(ctx) => ctx.to_string(),
                    ParseErrorKind::DepthExceeded(max) => format!("nesting below {max}"),
                })
            })
            .unwrap_or_else(|| "valid input".to_string());
        let (line, column) = errors
            .first()
            .map(|(span, _)| location(span))
            .unwrap_or_else(|| location(&input));

        Self::UnexpectedInput {
            expected,
            line,
            column,
        }
    }

    pub(crate) fn missing_semicolon(span: &Span) -> Self {
        let (line, column) = location(span);
        Self::MissingSemicolon { line, column }
    }
}
