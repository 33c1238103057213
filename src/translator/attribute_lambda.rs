/// Attribute-lambda sub-translation
///
/// Each product carries a schema-less collection of key/type/value
/// attributes, queried through the `Name` and `Value` pseudo-fields:
///
/// ```text
/// Attributes/any(att: att/Name eq 'orbitNumber' and att/Value ge 100)
/// ```
///
/// Exactly that shape — one `Name eq <text>` conjunct and one
/// `Value <op> <literal>` conjunct joined by a top-level AND, in either
/// order — translates into an [`AttributeDescriptor`]. Anything else is
/// rejected whole; there is no partial translation.
use super::errors::TranslationError;
use super::literal::TypedLiteral;
use crate::odata_ast::{BinaryOperator, Expression, PathSegment};

/// Reserved pseudo-field selecting the attribute name.
pub const ATTRIBUTE_NAME_FIELD: &str = "Name";
/// Reserved pseudo-field selecting the attribute value.
pub const ATTRIBUTE_VALUE_FIELD: &str = "Value";

/// Comparison operators usable against an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

impl ComparisonOp {
    pub fn sql(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Le => "<=",
            ComparisonOp::Lt => "<",
        }
    }

    fn from_binary(operator: BinaryOperator) -> Option<ComparisonOp> {
        match operator {
            BinaryOperator::Eq => Some(ComparisonOp::Eq),
            BinaryOperator::Ne => Some(ComparisonOp::Ne),
            BinaryOperator::Ge => Some(ComparisonOp::Ge),
            BinaryOperator::Gt => Some(ComparisonOp::Gt),
            BinaryOperator::Le => Some(ComparisonOp::Le),
            BinaryOperator::Lt => Some(ComparisonOp::Lt),
            _ => None,
        }
    }

    /// Mirror the comparison for a swapped operand order (`<` ↔ `>`,
    /// `<=` ↔ `>=`). Applied only when `Value` sits on the right of its
    /// comparison; reordering the *conjuncts* never mirrors.
    fn mirrored(self) -> ComparisonOp {
        match self {
            ComparisonOp::Eq => ComparisonOp::Eq,
            ComparisonOp::Ne => ComparisonOp::Ne,
            ComparisonOp::Ge => ComparisonOp::Le,
            ComparisonOp::Gt => ComparisonOp::Lt,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Lt => ComparisonOp::Gt,
        }
    }
}

/// Normalized selection condition over the dynamic attribute collection.
/// Built once per `any(...)` node and consumed immediately by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub operator: ComparisonOp,
    pub value: TypedLiteral,
}

/// Which pseudo-field a lambda member path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PseudoField {
    Name,
    Value,
}

/// One scanned conjunct of the lambda body.
#[derive(Debug)]
enum Conjunct {
    /// `Name eq '<attribute name>'`
    Name(String),
    /// `Value <op> <literal>`
    Value(ComparisonOp, TypedLiteral),
}

/// Translate the body of `any(variable: body)` into an attribute
/// descriptor.
pub fn translate(
    variable: &str,
    body: &Expression,
) -> Result<AttributeDescriptor, TranslationError> {
    log::trace!("translate attribute lambda over '{}'", variable);

    let (left, right) = match body {
        Expression::Binary {
            operator: BinaryOperator::And,
            left,
            right,
        } => (left.as_ref(), right.as_ref()),
        _ => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "lambda body must be a single AND of a Name and a Value condition".to_string(),
            ))
        }
    };

    // Two-state scan: each conjunct must supply exactly one of the name
    // and the value condition.
    let mut name: Option<String> = None;
    let mut value: Option<(ComparisonOp, TypedLiteral)> = None;

    for conjunct in [left, right] {
        match scan_conjunct(variable, conjunct)? {
            Conjunct::Name(n) => {
                if name.replace(n).is_some() {
                    return Err(TranslationError::UnsupportedLambdaShape(
                        "more than one Name condition in lambda body".to_string(),
                    ));
                }
            }
            Conjunct::Value(op, v) => {
                if value.replace((op, v)).is_some() {
                    return Err(TranslationError::UnsupportedLambdaShape(
                        "more than one Value condition in lambda body".to_string(),
                    ));
                }
            }
        }
    }

    match (name, value) {
        (Some(name), Some((operator, value))) => Ok(AttributeDescriptor {
            name,
            operator,
            value,
        }),
        _ => Err(TranslationError::UnsupportedLambdaShape(
            "lambda body must combine a Name and a Value condition".to_string(),
        )),
    }
}

/// Scan one conjunct: a comparison between a `Name`/`Value` member path
/// and a literal, in either operand order.
fn scan_conjunct(variable: &str, conjunct: &Expression) -> Result<Conjunct, TranslationError> {
    let (operator, left, right) = match conjunct {
        Expression::Binary {
            operator,
            left,
            right,
        } if operator.is_comparison() => (*operator, left.as_ref(), right.as_ref()),
        Expression::Binary {
            operator: BinaryOperator::And | BinaryOperator::Or,
            ..
        } => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "nested boolean combinators in lambda body".to_string(),
            ))
        }
        _ => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "lambda conjunct must be a comparison".to_string(),
            ))
        }
    };

    // Locate the pseudo-field member; the other side must be the literal.
    let (field, literal_expr, value_on_right) = match (left, right) {
        (Expression::Member(path), other) => {
            (pseudo_field(variable, &path.segments)?, other, true)
        }
        (other, Expression::Member(path)) => {
            (pseudo_field(variable, &path.segments)?, other, false)
        }
        _ => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "lambda comparison must have a Name or Value operand".to_string(),
            ))
        }
    };

    let literal = match literal_expr {
        Expression::Literal(lit) => TypedLiteral::coerce(lit.declared_type, &lit.text)?,
        _ => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "lambda comparison must compare against a literal".to_string(),
            ))
        }
    };

    match field {
        PseudoField::Name => {
            if operator != BinaryOperator::Eq {
                return Err(TranslationError::OperatorNotAllowedForName(
                    operator.to_string(),
                ));
            }
            match literal {
                TypedLiteral::Text(name) => Ok(Conjunct::Name(name)),
                other => Err(TranslationError::UnsupportedLambdaShape(format!(
                    "attribute Name must be compared to a string (got {})",
                    other.type_name()
                ))),
            }
        }
        PseudoField::Value => {
            // `from_binary` cannot fail here: `is_comparison` held above.
            let mut op = ComparisonOp::from_binary(operator)
                .ok_or_else(|| TranslationError::UnsupportedOperator(operator.to_string()))?;
            if !value_on_right {
                // `100 le att/Value` reads as `att/Value ge 100`.
                op = op.mirrored();
            }
            Ok(Conjunct::Value(op, literal))
        }
    }
}

/// Check a member path inside the lambda body: it must start with the
/// bound variable and end on the `Name` or `Value` pseudo-field. A single
/// intermediate value-type cast segment (`att/OData.CSC.StringAttribute/Value`)
/// is tolerated and skipped.
fn pseudo_field(
    variable: &str,
    segments: &[PathSegment],
) -> Result<PseudoField, TranslationError> {
    let mut iter = segments.iter();

    match iter.next() {
        Some(PathSegment::LambdaVariable(name)) if name == variable => {}
        Some(PathSegment::LambdaVariable(name)) => {
            return Err(TranslationError::UnboundVariable {
                bound: variable.to_string(),
                found: name.clone(),
            })
        }
        _ => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "lambda member path must start with the bound variable".to_string(),
            ))
        }
    }

    let mut segment = iter.next();
    if matches!(
        segment,
        Some(PathSegment::Complex(_)) | Some(PathSegment::Navigation(_))
    ) {
        segment = iter.next();
    }

    let field = match segment {
        Some(PathSegment::Primitive(name)) if name == ATTRIBUTE_NAME_FIELD => PseudoField::Name,
        Some(PathSegment::Primitive(name)) if name == ATTRIBUTE_VALUE_FIELD => PseudoField::Value,
        Some(PathSegment::Primitive(name)) => {
            return Err(TranslationError::UnsupportedLambdaShape(format!(
                "unexpected property '{}' in lambda member path",
                name
            )))
        }
        _ => {
            return Err(TranslationError::UnsupportedLambdaShape(
                "lambda member path must end on the Name or Value pseudo-field".to_string(),
            ))
        }
    };

    if iter.next().is_some() {
        return Err(TranslationError::UnsupportedLambdaShape(
            "trailing segments after the Name or Value pseudo-field".to_string(),
        ));
    }

    Ok(field)
}
