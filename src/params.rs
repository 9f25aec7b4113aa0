//! Parameter binding.
//!
//! [`Parameters`] decides for every value whether it is inlined as a
//! literal or bound into the `params` record, and owns the naming of bound
//! entries.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ast::{Property, Statement};
use crate::error::{FluxError, FluxResult};
use crate::notation::ToFlux;
use crate::options::ParameterizedTypes;
use crate::template::{FluxTemplate, Segment};
use crate::types::identifier::is_valid_identifier;
use crate::types::{FluxValue, ToFluxValue};

/// Identifier of the record that holds bound values.
pub const PARAMS_IDENTIFIER: &str = "params";

/// The parameter table of one build.
///
/// Names are `{prefix}_{n}` where `n` is the number of entries bound
/// before, so they are unique and strictly increasing in binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    policy: ParameterizedTypes,
    table: IndexMap<String, FluxValue>,
}

fn argument_error(prefix: &str, err: FluxError) -> FluxError {
    match err {
        FluxError::InvalidArgument { message, .. } => FluxError::invalid(prefix, message),
        other => other,
    }
}

impl Parameters {
    pub fn new(policy: ParameterizedTypes) -> Self {
        Self {
            policy,
            table: IndexMap::new(),
        }
    }

    pub fn policy(&self) -> ParameterizedTypes {
        self.policy
    }

    /// Bind `value` and return the text that stands for it: either its
    /// literal notation or a `params.<name>` reference.
    pub fn bind(&mut self, prefix: &str, value: impl ToFluxValue) -> FluxResult<String> {
        let value = value
            .to_flux_value()
            .map_err(|e| argument_error(prefix, e))?;
        self.bind_value(prefix, value)
    }

    /// Bind an already converted value. Values with no valid literal, such
    /// as instants outside the Flux time range, are rejected under `prefix`.
    pub fn bind_value(&mut self, prefix: &str, value: FluxValue) -> FluxResult<String> {
        if !is_valid_identifier(prefix) {
            return Err(FluxError::invalid(
                "prefix",
                format!("'{}' is not a valid Flux identifier", prefix),
            ));
        }
        let value = value.checked().map_err(|e| argument_error(prefix, e))?;
        if !self.policy.should_parameterize(value.kind()) {
            let literal = value.to_flux_notation();
            trace!(prefix, kind = %value.kind(), "Inlining value");
            return Ok(literal);
        }
        let name = format!("{}_{}", prefix, self.table.len());
        debug!(name = %name, kind = %value.kind(), "Binding parameter");
        let reference = format!("{}.{}", PARAMS_IDENTIFIER, name);
        self.table.insert(name, value);
        Ok(reference)
    }

    /// Bind every argument of `template` under `prefix` and splice the
    /// results into its literal skeleton.
    pub fn bind_template(&mut self, template: &FluxTemplate, prefix: &str) -> FluxResult<String> {
        let mut out = String::new();
        for segment in template.segments() {
            match segment {
                Segment::Raw(text) => out.push_str(text),
                Segment::Arg(index) => {
                    let value = template.args().get(*index).ok_or_else(|| {
                        FluxError::invalid("template", format!("missing argument {}", index))
                    })?;
                    out.push_str(&self.bind_value(prefix, value.clone())?);
                }
            }
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FluxValue> {
        self.table.get(name)
    }

    /// Entries in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FluxValue)> {
        self.table.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// `option params = {...}` followed by a blank line, or `None` when
    /// nothing was bound.
    pub fn to_flux_notation(&self) -> Option<String> {
        if self.table.is_empty() {
            return None;
        }
        let mut out = format!("option {} = {{\n", PARAMS_IDENTIFIER);
        for (name, value) in &self.table {
            out.push_str(&format!("  {}: {},\n", name, value.to_flux_notation()));
        }
        out.push_str("}\n\n");
        Some(out)
    }

    pub fn to_flux_ast(&self) -> Option<Statement> {
        if self.table.is_empty() {
            return None;
        }
        let properties = self
            .table
            .iter()
            .map(|(name, value)| Property::new(name, value.to_flux_ast()))
            .collect();
        Some(Statement::option_record(PARAMS_IDENTIFIER, properties))
    }
}
