//! Scanner for Flux literal notation.
//!
//! Reads back what [`ToFlux`](crate::notation::ToFlux) writes. A literal
//! must make up the whole input, so text that would smuggle extra tokens
//! after a string or regex fails to parse.

pub mod literals;

use nom::IResult;
use nom::combinator::all_consuming;

use crate::error::{FluxError, FluxResult};
use crate::types::{FluxDuration, FluxValue};

fn finish<'a, O>(text: &'a str, result: IResult<&'a str, O>) -> FluxResult<O> {
    match result {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = text.len() - e.input.len();
            let snippet: String = e.input.chars().take(16).collect();
            Err(FluxError::parse(
                position,
                format!("cannot read a Flux literal at {:?}", snippet),
            ))
        }
        Err(nom::Err::Incomplete(_)) => Err(FluxError::parse(text.len(), "unexpected end of input")),
    }
}

/// Parse exactly one literal of any kind.
pub fn parse_literal(text: &str) -> FluxResult<FluxValue> {
    finish(text, all_consuming(literals::literal)(text))
}

/// Parse a duration literal such as `1h30m` or `-2w`.
pub fn parse_duration(text: &str) -> FluxResult<FluxDuration> {
    finish(text, all_consuming(literals::duration)(text))
}

/// Parse a double-quoted string literal and return its value.
pub fn parse_string(text: &str) -> FluxResult<String> {
    finish(text, all_consuming(literals::string)(text))
}

#[cfg(test)]
mod tests;
