use std::borrow::Cow;

use crate::error::{FluxError, FluxResult};

/// Flux reserved words; none of them may name a function or parameter.
const KEYWORDS: &[&str] = &[
    "and", "builtin", "else", "empty", "exists", "if", "import", "not", "option", "or",
    "package", "return", "test", "testcase", "then",
];

/// Whether `name` is a plain Flux identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A validated Flux identifier, used to name aggregate functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FluxIdentifier(Cow<'static, str>);

impl FluxIdentifier {
    pub const SUM: FluxIdentifier = FluxIdentifier(Cow::Borrowed("sum"));
    pub const COUNT: FluxIdentifier = FluxIdentifier(Cow::Borrowed("count"));
    pub const MEAN: FluxIdentifier = FluxIdentifier(Cow::Borrowed("mean"));
    pub const MEDIAN: FluxIdentifier = FluxIdentifier(Cow::Borrowed("median"));
    pub const MODE: FluxIdentifier = FluxIdentifier(Cow::Borrowed("mode"));
    pub const SPREAD: FluxIdentifier = FluxIdentifier(Cow::Borrowed("spread"));
    pub const MIN: FluxIdentifier = FluxIdentifier(Cow::Borrowed("min"));
    pub const MAX: FluxIdentifier = FluxIdentifier(Cow::Borrowed("max"));
    pub const FIRST: FluxIdentifier = FluxIdentifier(Cow::Borrowed("first"));
    pub const LAST: FluxIdentifier = FluxIdentifier(Cow::Borrowed("last"));

    pub fn new(name: impl Into<String>) -> FluxResult<Self> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(FluxError::invalid(
                "identifier",
                format!("'{}' is not a valid Flux identifier", name),
            ));
        }
        if KEYWORDS.contains(&name.as_str()) {
            return Err(FluxError::invalid(
                "identifier",
                format!("'{}' is a reserved word", name),
            ));
        }
        Ok(Self(Cow::Owned(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FluxIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FluxIdentifier {
    type Err = FluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("filter_value"));
        assert!(is_valid_identifier("_x1"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier("a b"));
    }

    #[test]
    fn test_keywords_rejected() {
        assert!(FluxIdentifier::new("median").is_ok());
        assert!(FluxIdentifier::new("import").is_err());
        assert!(FluxIdentifier::new("sum()").is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(FluxIdentifier::MEAN.as_str(), "mean");
        assert_eq!("mean".parse::<FluxIdentifier>().unwrap(), FluxIdentifier::MEAN);
    }
}
