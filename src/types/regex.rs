use serde::{Deserialize, Serialize};

use crate::error::{FluxError, FluxResult};

/// A regular expression pattern, validated on construction.
///
/// Flux uses RE2 syntax, which the `regex` crate accepts as a subset of its
/// own, so anything that compiles here is safe to emit as a regex literal.
/// The pattern is stored in the spelling a `/.../` literal reads back as:
/// a raw newline becomes `\n` and `\/` becomes `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FluxRegex {
    pattern: String,
}

impl FluxRegex {
    pub fn new(pattern: impl Into<String>) -> FluxResult<Self> {
        let pattern = normalize(&pattern.into());
        regex::Regex::new(&pattern)
            .map_err(|e| FluxError::invalid("pattern", e.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Compile the pattern for local matching.
    pub fn compile(&self) -> FluxResult<regex::Regex> {
        regex::Regex::new(&self.pattern).map_err(|e| FluxError::invalid("pattern", e.to_string()))
    }
}

/// Both spellings match the same text. A trailing lone backslash is kept
/// for the regex compiler to reject.
fn normalize(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\n') => out.push_str("\\n"),
                Some('/') => out.push('/'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

impl TryFrom<String> for FluxRegex {
    type Error = FluxError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

impl From<FluxRegex> for String {
    fn from(regex: FluxRegex) -> Self {
        regex.pattern
    }
}

impl std::fmt::Display for FluxRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::notation::ToFlux;
        f.write_str(&self.to_flux_notation())
    }
}
