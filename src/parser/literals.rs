//! nom parsers for single Flux literals.

use chrono::{DateTime, NaiveDate, Utc};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many1,
    sequence::{delimited, pair, tuple},
};

use crate::types::{DurationUnit, FluxDuration, FluxRegex, FluxValue};

fn fail(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(input, ErrorKind::Char))
}

/// Any single literal, including the `int(v: ..)` style conversion calls
/// the builder emits for values without a literal form.
pub fn literal(input: &str) -> IResult<&str, FluxValue> {
    alt((
        map(int_call, FluxValue::Int),
        map(uint_call, FluxValue::UInt),
        map(float_call, FluxValue::Float),
        map(datetime, FluxValue::DateTime),
        map(duration, FluxValue::Duration),
        map(float, FluxValue::Float),
        map(int, FluxValue::Int),
        value(FluxValue::Bool(true), tag("true")),
        value(FluxValue::Bool(false), tag("false")),
        map(string, FluxValue::String),
        map(regex, FluxValue::Regex),
    ))(input)
}

fn duration_unit(input: &str) -> IResult<&str, DurationUnit> {
    // Longer suffixes first: `mo` and `ms` both start with `m`.
    alt((
        value(DurationUnit::Month, tag("mo")),
        value(DurationUnit::Millisecond, tag("ms")),
        value(DurationUnit::Microsecond, tag("us")),
        value(DurationUnit::Microsecond, tag("µs")),
        value(DurationUnit::Nanosecond, tag("ns")),
        value(DurationUnit::Year, tag("y")),
        value(DurationUnit::Week, tag("w")),
        value(DurationUnit::Day, tag("d")),
        value(DurationUnit::Hour, tag("h")),
        value(DurationUnit::Minute, tag("m")),
        value(DurationUnit::Second, tag("s")),
    ))(input)
}

/// `[-]<magnitude><unit>...`, e.g. `1h30m` or `-5mo`.
pub fn duration(input: &str) -> IResult<&str, FluxDuration> {
    let (input, negative) = opt(char('-'))(input)?;
    let start = input;
    let (input, parts) = many1(pair(
        map_res(digit1, |s: &str| s.parse::<u64>()),
        duration_unit,
    ))(input)?;
    let duration = parts
        .into_iter()
        .try_fold(FluxDuration::zero(), |d, (magnitude, unit)| d.with(magnitude, unit))
        .map_err(|_| fail(start))?;
    let duration = if negative.is_some() {
        duration.negate()
    } else {
        duration
    };
    Ok((input, duration))
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>, String> {
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a date", text));
    }
    if text.contains('T') {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| e.to_string())
    } else {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|e| e.to_string())?
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("'{}' has no midnight", text))
    }
}

/// RFC 3339 instant, or a bare `YYYY-MM-DD` date at midnight UTC.
pub fn datetime(input: &str) -> IResult<&str, DateTime<Utc>> {
    map_res(
        take_while1(|c: char| {
            c.is_ascii_digit() || matches!(c, '-' | ':' | '.' | 'T' | 'Z' | '+')
        }),
        parse_instant,
    )(input)
}

pub fn float(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((opt(char('-')), digit1, char('.'), digit1))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

pub fn int(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// A double-quoted string. Rejects an unescaped `${`, which would open an
/// interpolation.
pub fn string(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('"')(input)?;
    let mut bytes = Vec::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(fail(rest)),
            Some('"') => {
                rest = chars.as_str();
                break;
            }
            Some('\\') => {
                match chars.next() {
                    Some('\\') => bytes.push(b'\\'),
                    Some('"') => bytes.push(b'"'),
                    Some('$') => bytes.push(b'$'),
                    Some('n') => bytes.push(b'\n'),
                    Some('r') => bytes.push(b'\r'),
                    Some('t') => bytes.push(b'\t'),
                    Some('x') => {
                        let tail = chars.as_str();
                        let hex = tail
                            .get(..2)
                            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
                            .ok_or_else(|| fail(rest))?;
                        let byte = u8::from_str_radix(hex, 16).map_err(|_| fail(rest))?;
                        bytes.push(byte);
                        chars = tail[2..].chars();
                    }
                    _ => return Err(fail(rest)),
                }
                rest = chars.as_str();
            }
            Some('$') if chars.as_str().starts_with('{') => return Err(fail(rest)),
            Some(c) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                rest = chars.as_str();
            }
        }
    }
    let text = String::from_utf8(bytes).map_err(|_| fail(input))?;
    Ok((rest, text))
}

/// `/pattern/`. Only `\/` is unescaped; other escapes belong to the pattern.
pub fn regex(input: &str) -> IResult<&str, FluxRegex> {
    let (mut rest, _) = char('/')(input)?;
    let mut pattern = String::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None | Some('\n') => return Err(fail(rest)),
            Some('/') => {
                rest = chars.as_str();
                break;
            }
            Some('\\') => match chars.next() {
                Some('/') => pattern.push('/'),
                Some(c) => {
                    pattern.push('\\');
                    pattern.push(c);
                }
                None => return Err(fail(rest)),
            },
            Some(c) => pattern.push(c),
        }
        rest = chars.as_str();
    }
    let regex = FluxRegex::new(pattern).map_err(|_| fail(input))?;
    Ok((rest, regex))
}

/// `<name>(v: <arg>)`
fn conversion<'a, O, F>(
    name: &'static str,
    arg: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: nom::Parser<&'a str, O, Error<&'a str>>,
{
    delimited(
        tuple((tag(name), char('('), multispace0, tag("v:"), multispace0)),
        arg,
        pair(multispace0, char(')')),
    )
}

fn int_call(input: &str) -> IResult<&str, i64> {
    map_res(conversion("int", string), |s: String| s.parse::<i64>())(input)
}

fn uint_call(input: &str) -> IResult<&str, u64> {
    map_res(conversion("uint", digit1), |s: &str| s.parse::<u64>())(input)
}

fn float_call(input: &str) -> IResult<&str, f64> {
    map_res(conversion("float", string), |s: String| match s.as_str() {
        "NaN" => Ok(f64::NAN),
        "+Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        other => other.parse::<f64>().map_err(|e| e.to_string()),
    })(input)
}
