/// In-memory filter evaluation
///
/// Evaluates the same filter expression trees the SQL backend translates,
/// but against one already-materialized entity. Used where a query has
/// narrowed the candidate set and individual entities must be re-checked,
/// and in tests as the reference the SQL output is compared against.
use chrono::{DateTime, Utc};

use super::entity::{Entity, PropertyValue};
use crate::odata_ast::{BinaryOperator, Expression, MethodKind, PathSegment, UnaryOperator};
use crate::schema_map::{self, EN_PRODUCTION_TYPE};
use crate::translator::attribute_lambda::{self, AttributeDescriptor, ComparisonOp};
use crate::translator::errors::TranslationError;
use crate::translator::literal::TypedLiteral;
use crate::translator::path;

/// A fully evaluated scalar. Unlike [`TypedLiteral`] it carries no raw
/// text; evaluation works on values only.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedScalar {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl TypedScalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedScalar::Boolean(_) => "boolean",
            TypedScalar::Integer(_) => "integer",
            TypedScalar::Double(_) => "decimal",
            TypedScalar::Text(_) => "text",
            TypedScalar::Timestamp(_) => "timestamp",
        }
    }

    fn from_literal(literal: TypedLiteral) -> TypedScalar {
        match literal {
            TypedLiteral::Text(body) => TypedScalar::Text(body),
            TypedLiteral::Timestamp(instant) => TypedScalar::Timestamp(instant),
            TypedLiteral::Integer { value, .. } => TypedScalar::Integer(value),
            TypedLiteral::Decimal { value, .. } => TypedScalar::Double(value),
            TypedLiteral::Boolean { value, .. } => TypedScalar::Boolean(value),
        }
    }

    fn from_property(value: &PropertyValue) -> Option<TypedScalar> {
        match value {
            PropertyValue::Text(body) => Some(TypedScalar::Text(body.clone())),
            PropertyValue::Integer(value) => Some(TypedScalar::Integer(*value)),
            PropertyValue::Double(value) => Some(TypedScalar::Double(*value)),
            PropertyValue::Boolean(value) => Some(TypedScalar::Boolean(*value)),
            PropertyValue::Timestamp(instant) => Some(TypedScalar::Timestamp(*instant)),
            PropertyValue::Complex(_) | PropertyValue::Collection(_) => None,
        }
    }
}

/// Evaluator of filter expressions against a single entity.
pub struct EntityFilter<'a> {
    entity: &'a Entity,
}

impl<'a> EntityFilter<'a> {
    pub fn new(entity: &'a Entity) -> Self {
        EntityFilter { entity }
    }

    /// Whether the entity satisfies the filter. An absent filter matches
    /// everything, mirroring the SQL backend's `TRUE`.
    pub fn matches(&self, filter: Option<&Expression>) -> Result<bool, TranslationError> {
        let Some(expression) = filter else {
            return Ok(true);
        };
        match self.evaluate(expression)? {
            TypedScalar::Boolean(value) => Ok(value),
            _ => Err(TranslationError::BooleanOperandRequired),
        }
    }

    pub fn evaluate(&self, expression: &Expression) -> Result<TypedScalar, TranslationError> {
        match expression {
            Expression::Literal(literal) => Ok(TypedScalar::from_literal(TypedLiteral::coerce(
                literal.declared_type,
                &literal.text,
            )?)),

            Expression::Member(member) => self.evaluate_member(&member.segments),

            Expression::Unary { operator, operand } => {
                let operand = self.evaluate(operand)?;
                match operator {
                    UnaryOperator::Not => match operand {
                        TypedScalar::Boolean(value) => Ok(TypedScalar::Boolean(!value)),
                        _ => Err(TranslationError::BooleanOperandRequired),
                    },
                    // Negation applies to integers only.
                    UnaryOperator::Minus => match operand {
                        TypedScalar::Integer(value) => value
                            .checked_neg()
                            .map(TypedScalar::Integer)
                            .ok_or_else(|| {
                                TranslationError::ArithmeticError(format!("-{}", value))
                            }),
                        other => Err(TranslationError::NumericOperandRequired(
                            other.type_name().to_string(),
                        )),
                    },
                }
            }

            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary(*operator, left, right)
            }

            Expression::BinaryList { operator, .. } => Err(TranslationError::UnsupportedOperator(
                format!("{} on lists in entity evaluation", operator),
            )),

            Expression::Method { method, parameters } => {
                self.evaluate_method(*method, parameters)
            }

            Expression::Enum { type_name, values } => evaluate_enum(type_name, values),

            Expression::LambdaRef(name) => Err(TranslationError::UnsupportedOperator(format!(
                "lambda reference '{}'",
                name
            ))),
            Expression::Alias(name) => Err(TranslationError::UnsupportedOperator(format!(
                "alias '@{}'",
                name
            ))),
            Expression::TypeLiteral(name) => Err(TranslationError::UnsupportedOperator(format!(
                "type literal '{}'",
                name
            ))),
        }
    }

    /// Walk a member path through the entity's property tree. A quantifier
    /// segment turns the remainder into an attribute-collection match.
    fn evaluate_member(&self, segments: &[PathSegment]) -> Result<TypedScalar, TranslationError> {
        let mut current: Option<&PropertyValue> = None;
        let mut walked = String::new();

        for (position, segment) in segments.iter().enumerate() {
            if let PathSegment::LambdaAny { variable, body } = segment {
                let descriptor = attribute_lambda::translate(variable, body)?;
                return Ok(TypedScalar::Boolean(self.any_attribute(&descriptor)));
            }
            // The collection segment before a quantifier names the
            // attribute collection, not a property of the entity.
            if matches!(segments.get(position + 1), Some(PathSegment::LambdaAny { .. })) {
                continue;
            }

            let name = path::segment_name(segment)?;
            if !walked.is_empty() {
                walked.push('/');
            }
            walked.push_str(name);

            current = match current {
                None => self.entity.property(name),
                Some(PropertyValue::Complex(fields)) => fields.get(name),
                Some(_) => {
                    return Err(TranslationError::UnsupportedPathShape(format!(
                        "path continues past a scalar value at '{}'",
                        walked
                    )))
                }
            };
            if current.is_none() {
                return Err(TranslationError::UnknownField(walked));
            }
        }

        match current.and_then(TypedScalar::from_property) {
            Some(scalar) => Ok(scalar),
            None => Err(TranslationError::UnsupportedPathShape(format!(
                "'{}' is not a scalar value",
                walked
            ))),
        }
    }

    /// Existential match over the attribute collection: true if any
    /// attribute with the descriptor's name has a comparable value
    /// satisfying the comparison. Attributes of a different value type
    /// are skipped, not errors.
    fn any_attribute(&self, descriptor: &AttributeDescriptor) -> bool {
        let wanted = TypedScalar::from_literal(descriptor.value.clone());
        self.entity
            .attributes
            .iter()
            .filter(|attribute| attribute.name == descriptor.name)
            .filter_map(|attribute| TypedScalar::from_property(&attribute.value))
            .any(|value| compare_same_type(&value, &wanted)
                .map(|ordering| comparison_holds(descriptor.operator, ordering))
                .unwrap_or(false))
    }

    fn evaluate_method(
        &self,
        method: MethodKind,
        parameters: &[Expression],
    ) -> Result<TypedScalar, TranslationError> {
        let mismatch = || TranslationError::ArgumentCountOrTypeMismatch {
            method: method.name().to_string(),
            expected: 2,
        };

        if parameters.len() != 2 {
            return Err(mismatch());
        }
        let haystack = self.evaluate(&parameters[0])?;
        let needle = self.evaluate(&parameters[1])?;
        let (TypedScalar::Text(haystack), TypedScalar::Text(needle)) = (haystack, needle) else {
            return Err(mismatch());
        };

        Ok(TypedScalar::Boolean(match method {
            MethodKind::Contains => haystack.contains(&needle),
            MethodKind::StartsWith => haystack.starts_with(&needle),
            MethodKind::EndsWith => haystack.ends_with(&needle),
        }))
    }
}

fn evaluate_binary(
    operator: BinaryOperator,
    left: TypedScalar,
    right: TypedScalar,
) -> Result<TypedScalar, TranslationError> {
    if operator.is_boolean() {
        let (TypedScalar::Boolean(left), TypedScalar::Boolean(right)) = (left, right) else {
            return Err(TranslationError::BooleanOperandRequired);
        };
        return Ok(TypedScalar::Boolean(match operator {
            BinaryOperator::And => left && right,
            _ => left || right,
        }));
    }

    if operator.is_comparison() {
        let ordering = compare_same_type(&left, &right).ok_or_else(|| {
            TranslationError::ComparisonTypeMismatch {
                left: left.type_name().to_string(),
                right: right.type_name().to_string(),
            }
        })?;
        let op = match operator {
            BinaryOperator::Eq => ComparisonOp::Eq,
            BinaryOperator::Ne => ComparisonOp::Ne,
            BinaryOperator::Ge => ComparisonOp::Ge,
            BinaryOperator::Gt => ComparisonOp::Gt,
            BinaryOperator::Le => ComparisonOp::Le,
            _ => ComparisonOp::Lt,
        };
        return Ok(TypedScalar::Boolean(comparison_holds(op, ordering)));
    }

    if operator.is_arithmetic() {
        return evaluate_arithmetic(operator, left, right);
    }

    Err(TranslationError::UnsupportedOperator(operator.to_string()))
}

/// Compare two scalars of the same variant. Returns `None` when the
/// variants differ; callers decide whether that is an error (explicit
/// comparison) or a skip (attribute matching).
fn compare_same_type(left: &TypedScalar, right: &TypedScalar) -> Option<std::cmp::Ordering> {
    match (left, right) {
        (TypedScalar::Boolean(l), TypedScalar::Boolean(r)) => Some(l.cmp(r)),
        (TypedScalar::Integer(l), TypedScalar::Integer(r)) => Some(l.cmp(r)),
        (TypedScalar::Double(l), TypedScalar::Double(r)) => l.partial_cmp(r),
        (TypedScalar::Text(l), TypedScalar::Text(r)) => Some(l.cmp(r)),
        (TypedScalar::Timestamp(l), TypedScalar::Timestamp(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

fn comparison_holds(operator: ComparisonOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match operator {
        ComparisonOp::Eq => ordering == Equal,
        ComparisonOp::Ne => ordering != Equal,
        ComparisonOp::Ge => ordering != Less,
        ComparisonOp::Gt => ordering == Greater,
        ComparisonOp::Le => ordering != Greater,
        ComparisonOp::Lt => ordering == Less,
    }
}

/// Arithmetic dispatch: if either operand is a decimal the operation runs
/// in floating point, otherwise in integers with truncating division.
fn evaluate_arithmetic(
    operator: BinaryOperator,
    left: TypedScalar,
    right: TypedScalar,
) -> Result<TypedScalar, TranslationError> {
    let numeric = |scalar: &TypedScalar| match scalar {
        TypedScalar::Integer(value) => Ok(*value as f64),
        TypedScalar::Double(value) => Ok(*value),
        other => Err(TranslationError::NumericOperandRequired(
            other.type_name().to_string(),
        )),
    };

    let any_double = matches!(left, TypedScalar::Double(_)) || matches!(right, TypedScalar::Double(_));

    if any_double {
        let l = numeric(&left)?;
        let r = numeric(&right)?;
        let value = match operator {
            BinaryOperator::Add => l + r,
            BinaryOperator::Sub => l - r,
            BinaryOperator::Mul => l * r,
            BinaryOperator::Div => l / r,
            _ => l % r,
        };
        Ok(TypedScalar::Double(value))
    } else {
        let as_integer = |scalar: &TypedScalar| match scalar {
            TypedScalar::Integer(value) => Ok(*value),
            other => Err(TranslationError::NumericOperandRequired(
                other.type_name().to_string(),
            )),
        };
        let l = as_integer(&left)?;
        let r = as_integer(&right)?;
        // Checked throughout: division by zero and i64 overflow are
        // client-input conditions, not crashes.
        let value = match operator {
            BinaryOperator::Add => l.checked_add(r),
            BinaryOperator::Sub => l.checked_sub(r),
            BinaryOperator::Mul => l.checked_mul(r),
            BinaryOperator::Div => l.checked_div(r),
            _ => l.checked_rem(r),
        }
        .ok_or_else(|| TranslationError::ArithmeticError(format!("{} {} {}", l, operator, r)))?;
        Ok(TypedScalar::Integer(value))
    }
}

/// A production-type enum value evaluates to its storage text, so it
/// compares equal to the stored column value just as it does in SQL.
/// Multi-valued enum literals have no in-memory counterpart.
fn evaluate_enum(type_name: &str, values: &[String]) -> Result<TypedScalar, TranslationError> {
    if type_name != EN_PRODUCTION_TYPE {
        return Err(TranslationError::UnknownEnumValue {
            type_name: type_name.to_string(),
            value: values.first().cloned().unwrap_or_default(),
        });
    }
    let [value] = values else {
        return Err(TranslationError::UnsupportedOperator(
            "multi-valued enum literal in entity evaluation".to_string(),
        ));
    };
    match schema_map::production_type_value(value) {
        Some(mapped) => Ok(TypedScalar::Text(mapped.to_string())),
        None => Err(TranslationError::UnknownEnumValue {
            type_name: type_name.to_string(),
            value: value.clone(),
        }),
    }
}
