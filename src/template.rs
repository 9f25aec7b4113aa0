//! Flux fragments with embedded values.
//!
//! A [`FluxTemplate`] keeps the caller's connective syntax apart from the
//! values interpolated into it, so the values can be bound one by one.

use crate::error::{FluxError, FluxResult};
use crate::types::FluxValue;

/// A piece of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal Flux text, emitted verbatim.
    Raw(String),
    /// Index into the template's arguments.
    Arg(usize),
}

/// Literal skeleton plus ordered argument values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxTemplate {
    segments: Vec<Segment>,
    args: Vec<FluxValue>,
}

impl FluxTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text.
    pub fn raw(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.segments.last_mut() {
            Some(Segment::Raw(last)) => last.push_str(&text),
            _ => self.segments.push(Segment::Raw(text)),
        }
        self
    }

    /// Append an argument.
    pub fn arg(mut self, value: impl Into<FluxValue>) -> Self {
        self.segments.push(Segment::Arg(self.args.len()));
        self.args.push(value.into());
        self
    }

    /// A template with no arguments.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new().raw(text)
    }

    /// Parse a format string with `{}` placeholders. `{{` and `}}` stand
    /// for literal braces.
    pub fn parse(format: &str, args: Vec<FluxValue>) -> FluxResult<Self> {
        let mut template = Self::new();
        let mut raw = String::new();
        let mut values = args.into_iter();
        let mut placeholders = 0usize;
        let mut chars = format.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|(_, n)| *n) == Some('{') => {
                    chars.next();
                    raw.push('{');
                }
                '{' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                    chars.next();
                    placeholders += 1;
                    let value = values.next().ok_or_else(|| {
                        FluxError::invalid(
                            "template",
                            format!("placeholder {} has no argument", placeholders),
                        )
                    })?;
                    template = template.raw(std::mem::take(&mut raw)).arg(value);
                }
                '}' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                    chars.next();
                    raw.push('}');
                }
                '{' | '}' => {
                    return Err(FluxError::invalid(
                        "template",
                        format!("unmatched '{}' at position {}", c, pos),
                    ));
                }
                c => raw.push(c),
            }
        }

        let extra = values.count();
        if extra > 0 {
            return Err(FluxError::invalid(
                "template",
                format!(
                    "{} placeholders but {} arguments",
                    placeholders,
                    placeholders + extra
                ),
            ));
        }
        Ok(template.raw(raw))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn args(&self) -> &[FluxValue] {
        &self.args
    }
}

/// Build a [`FluxTemplate`] from a format string and values.
///
/// ```
/// use flux_builder::flux;
///
/// let template = flux!("r.host == {} or r.port == {}", "a", 8086).unwrap();
/// assert_eq!(template.args().len(), 2);
/// ```
#[macro_export]
macro_rules! flux {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::template::FluxTemplate::parse(
            $fmt,
            vec![$($crate::types::FluxValue::from($arg)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_segments() {
        let template = FluxTemplate::parse("a {} b {}", vec![1.into(), "x".into()]).unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Raw("a ".to_string()),
                Segment::Arg(0),
                Segment::Raw(" b ".to_string()),
                Segment::Arg(1),
            ]
        );
    }

    #[test]
    fn test_escaped_braces() {
        let template = FluxTemplate::parse("{{a: {}}}", vec![true.into()]).unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Raw("{a: ".to_string()),
                Segment::Arg(0),
                Segment::Raw("}".to_string()),
            ]
        );
    }

    #[test]
    fn test_count_mismatch() {
        assert!(FluxTemplate::parse("{} {}", vec![1.into()]).is_err());
        assert!(FluxTemplate::parse("{}", vec![1.into(), 2.into()]).is_err());
        assert!(FluxTemplate::parse("a { b", vec![]).is_err());
        assert!(FluxTemplate::parse("a } b", vec![]).is_err());
    }

    #[test]
    fn test_fluent_matches_macro() {
        let fluent = FluxTemplate::new().raw("r.x == ").arg("y");
        let parsed = crate::flux!("r.x == {}", "y").unwrap();
        assert_eq!(fluent, parsed);
    }

    #[test]
    fn test_literal() {
        let template = FluxTemplate::literal("true");
        assert!(template.args().is_empty());
        assert!(FluxTemplate::literal("").segments().is_empty());
    }
}
