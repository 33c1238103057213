use thiserror::Error;

/// Errors raised while translating a filter expression.
///
/// Every variant is produced synchronously at the point of detection and
/// propagates straight to the translation caller; there is no local
/// recovery. The caller maps these to 400-class protocol responses — the
/// core carries no notion of HTTP status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error("lambda body references variable '{found}', but the enclosing any() binds '{bound}'")]
    UnboundVariable { bound: String, found: String },

    #[error("unsupported path shape: {0}")]
    UnsupportedPathShape(String),

    #[error("invalid date/time offset value {0}")]
    InvalidTimestamp(String),

    #[error("unsupported literal type for value {0}")]
    UnsupportedLiteralType(String),

    #[error("unsupported lambda shape: {0}")]
    UnsupportedLambdaShape(String),

    #[error("operator '{0}' is not allowed for the attribute Name pseudo-field (only 'eq')")]
    OperatorNotAllowedForName(String),

    #[error("comparison needs two operands of the same type ({left} vs {right})")]
    ComparisonTypeMismatch { left: String, right: String },

    #[error("boolean operations need two boolean operands")]
    BooleanOperandRequired,

    #[error("numeric operand required, got a {0} value")]
    NumericOperandRequired(String),

    #[error("arithmetic operation '{0}' has no representable result")]
    ArithmeticError(String),

    #[error("{method}() needs {expected} parameters of type Edm.String")]
    ArgumentCountOrTypeMismatch { method: String, expected: usize },

    #[error("operation '{0}' is not implemented in filter expressions")]
    UnsupportedOperator(String),

    #[error("invalid property name '{0}'")]
    UnknownField(String),

    #[error("property '{0}' is not part of the data model")]
    UnmappedField(String),

    #[error("enum conversion failed for value '{value}' of type '{type_name}'")]
    UnknownEnumValue { type_name: String, value: String },
}
