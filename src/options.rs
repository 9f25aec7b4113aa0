//! Build options: parameterization policy, `now` override and imports.

use std::borrow::Cow;
use std::ops::{BitOr, BitOrAssign};

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{Expression, ImportDeclaration, Statement};
use crate::error::{FluxError, FluxResult};
use crate::notation::ToFlux;
use crate::types::{ValueKind, check_date_time};

/// Which value kinds are bound through `params` instead of inlined.
///
/// Kinds without a flag (regular expressions) are always parameterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterizedTypes(u8);

impl ParameterizedTypes {
    pub const NONE: Self = Self(0);
    pub const BOOLEAN: Self = Self(1);
    pub const INTEGER: Self = Self(1 << 1);
    pub const UINTEGER: Self = Self(1 << 2);
    pub const FLOAT: Self = Self(1 << 3);
    pub const DATE_TIME: Self = Self(1 << 4);
    pub const DURATION: Self = Self(1 << 5);
    pub const STRING: Self = Self(1 << 6);
    pub const ALL: Self = Self(0x7f);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The flag covering `kind`, if any.
    pub fn flag(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Boolean => Some(Self::BOOLEAN),
            ValueKind::Integer => Some(Self::INTEGER),
            ValueKind::UInteger => Some(Self::UINTEGER),
            ValueKind::Float => Some(Self::FLOAT),
            ValueKind::DateTime => Some(Self::DATE_TIME),
            ValueKind::Duration => Some(Self::DURATION),
            ValueKind::String => Some(Self::STRING),
            ValueKind::Regex => None,
        }
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        kinds
            .into_iter()
            .filter_map(Self::flag)
            .fold(Self::NONE, |acc, flag| acc | flag)
    }

    pub fn should_parameterize(self, kind: ValueKind) -> bool {
        Self::flag(kind).is_none_or(|flag| self.contains(flag))
    }

    fn kinds(self) -> Vec<ValueKind> {
        [
            ValueKind::Boolean,
            ValueKind::Integer,
            ValueKind::UInteger,
            ValueKind::Float,
            ValueKind::DateTime,
            ValueKind::Duration,
            ValueKind::String,
        ]
        .into_iter()
        .filter(|kind| Self::flag(*kind).is_some_and(|flag| self.contains(flag)))
        .collect()
    }
}

impl Default for ParameterizedTypes {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ParameterizedTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParameterizedTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Config form of the policy: `"all"`, `"none"` or a list of kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Keyword(String),
    Kinds(Vec<ValueKind>),
}

impl PolicyRepr {
    fn into_policy(self) -> Result<ParameterizedTypes, String> {
        match self {
            PolicyRepr::Keyword(word) => match word.as_str() {
                "all" => Ok(ParameterizedTypes::ALL),
                "none" => Ok(ParameterizedTypes::NONE),
                other => Err(format!(
                    "unknown parameterization '{}', expected \"all\", \"none\" or a list of kinds",
                    other
                )),
            },
            PolicyRepr::Kinds(kinds) => Ok(ParameterizedTypes::from_kinds(kinds)),
        }
    }

    fn from_policy(policy: ParameterizedTypes) -> Self {
        match policy {
            ParameterizedTypes::ALL => PolicyRepr::Keyword("all".to_string()),
            ParameterizedTypes::NONE => PolicyRepr::Keyword("none".to_string()),
            other => PolicyRepr::Kinds(other.kinds()),
        }
    }
}

impl Serialize for ParameterizedTypes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PolicyRepr::from_policy(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParameterizedTypes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PolicyRepr::deserialize(deserializer)?
            .into_policy()
            .map_err(serde::de::Error::custom)
    }
}

/// A Flux package path for an `import` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FluxPackage(Cow<'static, str>);

impl FluxPackage {
    /// Provides `record.get`, used for dynamic record keys.
    pub const EXPERIMENTAL_RECORD: FluxPackage = FluxPackage(Cow::Borrowed("experimental/record"));
    pub const TIMEZONE: FluxPackage = FluxPackage(Cow::Borrowed("timezone"));
    pub const STRINGS: FluxPackage = FluxPackage(Cow::Borrowed("strings"));
    pub const DATE: FluxPackage = FluxPackage(Cow::Borrowed("date"));

    /// Path segments must be identifiers separated by `/`.
    pub fn new(path: impl Into<String>) -> FluxResult<Self> {
        let path = path.into();
        if path
            .split('/')
            .all(crate::types::identifier::is_valid_identifier)
        {
            Ok(Self(Cow::Owned(path)))
        } else {
            Err(FluxError::invalid(
                "package",
                format!("'{}' is not a valid package path", path),
            ))
        }
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    pub fn to_flux_notation(&self) -> String {
        format!("import {}", self.path().to_flux_notation())
    }

    pub fn to_import_declaration(&self) -> ImportDeclaration {
        ImportDeclaration::new(self.path())
    }
}

impl std::fmt::Display for FluxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Per-build options and the import registry.
///
/// Owned by exactly one build; nothing here is shared between builds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FluxBuilderOptions {
    parameterized_types: ParameterizedTypes,
    now: Option<DateTime<Utc>>,
    imports: IndexSet<FluxPackage>,
}

impl FluxBuilderOptions {
    pub fn new(parameterized_types: ParameterizedTypes) -> Self {
        Self {
            parameterized_types,
            ..Self::default()
        }
    }

    pub fn parameterized_types(&self) -> ParameterizedTypes {
        self.parameterized_types
    }

    pub fn now(&self) -> Option<DateTime<Utc>> {
        self.now
    }

    /// Fix the instant `now()` resolves to. May be set once per build, and
    /// only to an instant inside the Flux time range.
    pub fn set_now(&mut self, now: DateTime<Utc>) -> FluxResult<()> {
        if self.now.is_some() {
            return Err(FluxError::invalid("now", "The 'now' option is already set."));
        }
        let now = check_date_time(now).map_err(|e| match e {
            FluxError::InvalidArgument { message, .. } => FluxError::invalid("now", message),
            other => other,
        })?;
        debug!(now = %now.to_flux_notation(), "Overriding now");
        self.now = Some(now);
        Ok(())
    }

    /// Chaining form of [`set_now`](Self::set_now).
    pub fn with_now(mut self, now: DateTime<Utc>) -> FluxResult<Self> {
        self.set_now(now)?;
        Ok(self)
    }

    pub fn with_import(mut self, package: FluxPackage) -> Self {
        self.import_package(package);
        self
    }

    pub fn imports(&self) -> &IndexSet<FluxPackage> {
        &self.imports
    }

    /// Register a package. Repeated imports are ignored.
    pub fn import_package(&mut self, package: FluxPackage) {
        if !self.imports.contains(&package) {
            debug!(package = %package, "Importing package");
            self.imports.insert(package);
        }
    }

    pub fn import_packages(&mut self, packages: impl IntoIterator<Item = FluxPackage>) {
        for package in packages {
            self.import_package(package);
        }
    }

    /// `import "..."` lines followed by a blank line, or `None`.
    pub fn imports_notation(&self) -> Option<String> {
        if self.imports.is_empty() {
            return None;
        }
        let mut out = String::new();
        for package in &self.imports {
            out.push_str(&package.to_flux_notation());
            out.push('\n');
        }
        out.push('\n');
        Some(out)
    }

    pub fn imports_ast(&self) -> Vec<ImportDeclaration> {
        self.imports
            .iter()
            .map(FluxPackage::to_import_declaration)
            .collect()
    }

    /// `option now = () => <instant>` followed by a blank line, or `None`.
    pub fn now_notation(&self) -> Option<String> {
        self.now
            .map(|now| format!("option now = () => {}\n\n", now.to_flux_notation()))
    }

    pub fn now_ast(&self) -> Option<Statement> {
        self.now.map(|now| {
            Statement::option(
                "now",
                Expression::FunctionExpression {
                    params: Vec::new(),
                    body: Box::new(now.to_flux_ast()),
                },
            )
        })
    }
}
