use std::fmt;

/// Declared protocol type of a literal, as reported by the URI parser.
///
/// The parser guarantees the literal text is lexically valid for its
/// declared type; the coercion layer still decides how (and whether) the
/// value is usable by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralType {
    String,
    DateTimeOffset,
    Boolean,
    Byte,
    SByte,
    Int16,
    Int32,
    Int64,
    Decimal,
    Single,
    Double,
    /// Any other protocol type (Guid, Duration, Binary, ...). Always
    /// rejected by literal coercion.
    Other,
}

impl LiteralType {
    /// Whether SQL can take the literal text verbatim as numeric syntax.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            LiteralType::Byte
                | LiteralType::SByte
                | LiteralType::Int16
                | LiteralType::Int32
                | LiteralType::Int64
                | LiteralType::Decimal
                | LiteralType::Single
                | LiteralType::Double
        )
    }
}

/// A literal exactly as it appeared in the filter URI.
///
/// String literals keep their surrounding protocol quotes; stripping them
/// is the coercion layer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub declared_type: LiteralType,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "not"),
            UnaryOperator::Minus => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    In,
}

impl BinaryOperator {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Ge
                | BinaryOperator::Gt
                | BinaryOperator::Le
                | BinaryOperator::Lt
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Sub
                | BinaryOperator::Mul
                | BinaryOperator::Div
                | BinaryOperator::Mod
        )
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOperator::Eq => "eq",
            BinaryOperator::Ne => "ne",
            BinaryOperator::Ge => "ge",
            BinaryOperator::Gt => "gt",
            BinaryOperator::Le => "le",
            BinaryOperator::Lt => "lt",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Mod => "mod",
            BinaryOperator::In => "in",
        };
        write!(f, "{}", name)
    }
}

/// Built-in filter functions supported by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Contains,
    StartsWith,
    EndsWith,
}

impl MethodKind {
    pub fn name(self) -> &'static str {
        match self {
            MethodKind::Contains => "contains",
            MethodKind::StartsWith => "startswith",
            MethodKind::EndsWith => "endswith",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One segment of a member path, e.g. the `ContentDate` and `Start` in
/// `ContentDate/Start`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// A primitive (leaf) property.
    Primitive(String),
    /// A complex-typed property.
    Complex(String),
    /// A navigation property to a related entity.
    Navigation(String),
    /// The variable bound by an enclosing `any(...)` quantifier.
    LambdaVariable(String),
    /// An `any(variable: body)` quantifier over a collection property.
    LambdaAny {
        variable: String,
        body: Box<Expression>,
    },
    /// Collection index addressing (`Checksums/0/Value`). The protocol can
    /// produce it, the translator rejects it.
    Index(usize),
    /// The `$count` virtual segment. Rejected by the translator.
    Count,
}

impl PathSegment {
    pub fn primitive(name: impl Into<String>) -> Self {
        PathSegment::Primitive(name.into())
    }

    pub fn complex(name: impl Into<String>) -> Self {
        PathSegment::Complex(name.into())
    }

    pub fn navigation(name: impl Into<String>) -> Self {
        PathSegment::Navigation(name.into())
    }

    pub fn lambda_variable(name: impl Into<String>) -> Self {
        PathSegment::LambdaVariable(name.into())
    }

    pub fn any(variable: impl Into<String>, body: Expression) -> Self {
        PathSegment::LambdaAny {
            variable: variable.into(),
            body: Box::new(body),
        }
    }
}

/// A property path as it appears in the protocol, e.g. `ContentDate/Start`
/// or `Attributes/any(att: ...)`. The parser guarantees it is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPath {
    pub segments: Vec<PathSegment>,
}

impl MemberPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        debug_assert!(!segments.is_empty(), "member path must not be empty");
        MemberPath { segments }
    }
}

/// A parsed filter expression.
///
/// One tree is owned by the caller for the duration of one translation;
/// backends visit it recursively and never mutate it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A binary operator whose right-hand side is a literal list, i.e. the
    /// `in` operator: `Name in ('a', 'b')`.
    BinaryList {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Vec<Expression>,
    },
    Method {
        method: MethodKind,
        parameters: Vec<Expression>,
    },
    Member(MemberPath),
    /// An enum literal, e.g. `OData.CSC.ProductionType'systematic_production'`.
    Enum {
        type_name: String,
        values: Vec<String>,
    },
    /// A bare reference to a lambda variable outside a member path.
    LambdaRef(String),
    /// A `@name` alias reference.
    Alias(String),
    /// A type literal used in cast/isof expressions.
    TypeLiteral(String),
}

impl Expression {
    pub fn literal(declared_type: LiteralType, text: impl Into<String>) -> Self {
        Expression::Literal(Literal {
            declared_type,
            text: text.into(),
        })
    }

    /// String literal; adds the protocol quotes around `value`.
    pub fn string(value: &str) -> Self {
        Expression::literal(LiteralType::String, format!("'{}'", value))
    }

    pub fn datetime(text: impl Into<String>) -> Self {
        Expression::literal(LiteralType::DateTimeOffset, text)
    }

    pub fn int64(value: i64) -> Self {
        Expression::literal(LiteralType::Int64, value.to_string())
    }

    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn in_list(left: Expression, right: Vec<Expression>) -> Self {
        Expression::BinaryList {
            operator: BinaryOperator::In,
            left: Box::new(left),
            right,
        }
    }

    pub fn method(method: MethodKind, parameters: Vec<Expression>) -> Self {
        Expression::Method { method, parameters }
    }

    pub fn member(segments: Vec<PathSegment>) -> Self {
        Expression::Member(MemberPath::new(segments))
    }

    /// Single-segment path to a primitive property.
    pub fn property(name: impl Into<String>) -> Self {
        Expression::member(vec![PathSegment::primitive(name)])
    }
}
