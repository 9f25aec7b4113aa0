use serde::{Deserialize, Serialize};

/// A Flux expression node.
///
/// Serializes to the JSON AST accepted by the InfluxDB v2 API, with the
/// node kind in the `"type"` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    BooleanLiteral {
        value: bool,
    },
    /// Signed integer. The value travels as a string to keep all 64 bits.
    IntegerLiteral {
        value: String,
    },
    UnsignedIntegerLiteral {
        value: String,
    },
    FloatLiteral {
        value: f64,
    },
    StringLiteral {
        value: String,
    },
    DateTimeLiteral {
        value: String,
    },
    DurationLiteral {
        values: Vec<DurationComponent>,
    },
    RegexpLiteral {
        value: String,
    },
    Identifier {
        name: String,
    },
    /// `object.property`
    MemberExpression {
        object: Box<Expression>,
        property: Box<Expression>,
    },
    ObjectExpression {
        properties: Vec<Property>,
    },
    /// Flux calls take a single record argument.
    CallExpression {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Expression>,
    },
    /// `(params) => body`
    FunctionExpression {
        params: Vec<Property>,
        body: Box<Expression>,
    },
}

/// One `magnitude` + `unit` pair of a duration literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Duration")]
pub struct DurationComponent {
    pub magnitude: i64,
    pub unit: String,
}

/// A `key: value` entry of a record or call argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Property {
    pub key: Expression,
    pub value: Expression,
}

impl Property {
    pub fn new(key: &str, value: Expression) -> Self {
        Self {
            key: Expression::identifier(key),
            value,
        }
    }
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral {
            value: value.into(),
        }
    }

    /// `object.property` with an identifier property.
    pub fn member(object: &str, property: &str) -> Self {
        Expression::MemberExpression {
            object: Box::new(Expression::identifier(object)),
            property: Box::new(Expression::identifier(property)),
        }
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Expression::ObjectExpression { properties }
    }

    /// `callee(key: value, ...)`. An empty argument list renders `callee()`.
    pub fn call(callee: Expression, properties: Vec<Property>) -> Self {
        let arguments = if properties.is_empty() {
            Vec::new()
        } else {
            vec![Expression::object(properties)]
        };
        Expression::CallExpression {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn negate(argument: Expression) -> Self {
        Expression::UnaryExpression {
            operator: "-".to_string(),
            argument: Box::new(argument),
        }
    }

    /// Node kind as written in the `"type"` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::BooleanLiteral { .. } => "BooleanLiteral",
            Expression::IntegerLiteral { .. } => "IntegerLiteral",
            Expression::UnsignedIntegerLiteral { .. } => "UnsignedIntegerLiteral",
            Expression::FloatLiteral { .. } => "FloatLiteral",
            Expression::StringLiteral { .. } => "StringLiteral",
            Expression::DateTimeLiteral { .. } => "DateTimeLiteral",
            Expression::DurationLiteral { .. } => "DurationLiteral",
            Expression::RegexpLiteral { .. } => "RegexpLiteral",
            Expression::Identifier { .. } => "Identifier",
            Expression::MemberExpression { .. } => "MemberExpression",
            Expression::ObjectExpression { .. } => "ObjectExpression",
            Expression::CallExpression { .. } => "CallExpression",
            Expression::UnaryExpression { .. } => "UnaryExpression",
            Expression::FunctionExpression { .. } => "FunctionExpression",
        }
    }
}
