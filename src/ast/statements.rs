use serde::{Deserialize, Serialize};

use super::expr::{Expression, Property};

/// A top-level Flux statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// `option <id> = <init>`
    OptionStatement { assignment: VariableAssignment },
    ExpressionStatement { expression: Expression },
}

/// `<id> = <init>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct VariableAssignment {
    pub id: Expression,
    pub init: Expression,
}

/// `import "<path>"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct ImportDeclaration {
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Expression>,
    pub path: Expression,
}

/// A Flux source file: imports followed by statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct File {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub imports: Vec<ImportDeclaration>,
    pub body: Vec<Statement>,
}

impl Statement {
    /// `option <name> = <init>`
    pub fn option(name: &str, init: Expression) -> Self {
        Statement::OptionStatement {
            assignment: VariableAssignment {
                id: Expression::identifier(name),
                init,
            },
        }
    }

    /// `option <name> = { key: value, ... }`
    pub fn option_record(name: &str, properties: Vec<Property>) -> Self {
        Self::option(name, Expression::object(properties))
    }
}

impl ImportDeclaration {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: Expression::string(path),
        }
    }
}
