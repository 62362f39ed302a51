use crate::results::{RawResult, ResultEntry};
use crate::scanner::is_keyword_delimiter;
use crate::FormatOptions;

/// Matches the characters that end a bare value when parsing, so that
/// anything emitted bare reads back as the same single token
fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '"' | '(' | ')' | '\\'))
}

/// Emits `value` either bare or as a quoted string, into target
fn emit_value_token(value: &str, target: &mut String) {
    if needs_quoting(value) {
        target.push('"');
        for c in value.chars() {
            if c == '"' || c == '\\' {
                target.push('\\');
            }
            target.push(c);
        }
        target.push('"');
    } else {
        target.push_str(value);
    }
}

/// Method, ptype and property names are written as-is and must read
/// back as a single keyword
fn is_keyword(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(is_keyword_delimiter)
}

fn emit_result(result: &RawResult, target: &mut String) {
    debug_assert!(
        is_keyword(&result.method),
        "method name {:?} cannot be written as a keyword",
        result.method
    );
    target.push_str(&result.method);
    target.push('=');
    emit_value_token(&result.value, target);
    if let Some(reason) = &result.reason {
        target.push_str(" reason=");
        emit_value_token(reason, target);
    }
    for prop in &result.properties {
        debug_assert!(
            is_keyword(&prop.ptype) && is_keyword(&prop.property),
            "property name {:?} cannot be written as a keyword",
            format!("{}.{}", prop.ptype, prop.property)
        );
        target.push(' ');
        target.push_str(&prop.ptype);
        target.push('.');
        target.push_str(&prop.property);
        target.push('=');
        emit_value_token(&prop.value, target);
    }
}

/// Renders an Authentication-Results header value using the
/// default `FormatOptions`.
///
/// Values are quoted as needed, but method, ptype and property names
/// are emitted verbatim: they must be non-empty and free of whitespace
/// and `= . / ; ( ) " \`. A name that breaks this produces text that
/// does not parse back to the same entries; debug builds panic on it.
pub fn format(identifier: &str, results: &[ResultEntry]) -> String {
    format_with(identifier, results, &FormatOptions::default())
}

pub fn format_with(identifier: &str, results: &[ResultEntry], options: &FormatOptions) -> String {
    let mut text = String::new();
    emit_value_token(identifier, &mut text);
    if options.include_version {
        text.push_str(" 1");
    }

    if results.is_empty() {
        text.push_str("; none");
        return text;
    }

    let separator = if options.fold { ";\r\n\t" } else { "; " };
    for result in results {
        text.push_str(separator);
        emit_result(&result.to_raw(), &mut text);
    }

    text
}
