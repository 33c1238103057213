/// SQL backend
///
/// Walks a filter expression tree and produces a syntactically complete
/// boolean expression for splicing after a `WHERE` keyword. Every literal
/// embedded in the output went through literal coercion; client text is
/// never copied into SQL verbatim. The caller appends its own visibility
/// predicates and ORDER BY/LIMIT/OFFSET text — this backend translates,
/// it does not authorize.
use super::attribute_lambda::AttributeDescriptor;
use super::errors::TranslationError;
use super::literal::TypedLiteral;
use super::path::{self, ResolvedPath};
use crate::config::SqlTableConfig;
use crate::odata_ast::{BinaryOperator, Expression, MethodKind, UnaryOperator};
use crate::schema_map::{self, ColumnMapping, EN_PRODUCTION_TYPE};

/// Translator from a filter expression tree to a SQL WHERE fragment.
///
/// One generator serves one translation pass; the attribute subquery
/// counter makes aliases unique within that pass.
pub struct SqlFilterGenerator<'a> {
    mapping: &'a ColumnMapping,
    tables: SqlTableConfig,
    /// Number of attribute EXISTS subqueries emitted so far.
    attribute_count: usize,
}

impl<'a> SqlFilterGenerator<'a> {
    pub fn new(mapping: &'a ColumnMapping) -> Self {
        SqlFilterGenerator {
            mapping,
            tables: SqlTableConfig::default(),
            attribute_count: 0,
        }
    }

    pub fn with_tables(mapping: &'a ColumnMapping, tables: SqlTableConfig) -> Self {
        SqlFilterGenerator {
            mapping,
            tables,
            attribute_count: 0,
        }
    }

    /// Translate a filter tree into a complete boolean expression. An
    /// absent tree translates to the literal `TRUE` so the caller can
    /// splice unconditionally.
    pub fn translate(&mut self, filter: Option<&Expression>) -> Result<String, TranslationError> {
        match filter {
            Some(expression) => self.visit(expression),
            None => Ok("TRUE".to_string()),
        }
    }

    /// The SQL command up to and including the `WHERE` keyword. The caller
    /// appends the fragment from [`translate`](Self::translate) plus its
    /// own visibility and paging text.
    pub fn sql_command(&self, count_only: bool) -> String {
        let t = &self.tables;
        let select = if count_only {
            format!("SELECT count(DISTINCT {}.*) ", t.entity_alias)
        } else {
            format!("SELECT DISTINCT {}.* ", t.entity_alias)
        };
        format!(
            "{select}FROM {entity} {ea}\nJOIN {file} {fa} ON {fa}.{fk} = {ea}.id\nWHERE ",
            select = select,
            entity = t.entity_table,
            ea = t.entity_alias,
            file = t.file_table,
            fa = t.file_alias,
            fk = t.file_fk_column,
        )
    }

    fn visit(&mut self, expression: &Expression) -> Result<String, TranslationError> {
        match expression {
            Expression::Literal(literal) => {
                Ok(TypedLiteral::coerce(literal.declared_type, &literal.text)?.to_sql())
            }

            Expression::Member(member) => {
                log::trace!("visit member ({} segments)", member.segments.len());
                match path::resolve(&member.segments, None, self.mapping)? {
                    ResolvedPath::Column(column) => Ok(column),
                    ResolvedPath::Unmapped(field) => Err(TranslationError::UnmappedField(field)),
                    ResolvedPath::AttributeMatch(descriptor) => {
                        Ok(self.attribute_exists(&descriptor))
                    }
                }
            }

            Expression::Unary { operator, operand } => {
                let operand = self.visit(operand)?;
                Ok(match operator {
                    UnaryOperator::Not => format!("NOT {}", operand),
                    UnaryOperator::Minus => format!("-{}", operand),
                })
            }

            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                self.render_binary(*operator, &left, &right)
            }

            Expression::BinaryList {
                operator,
                left,
                right,
            } => {
                if *operator != BinaryOperator::In {
                    return Err(TranslationError::UnsupportedOperator(format!(
                        "{} on lists",
                        operator
                    )));
                }
                if right.is_empty() {
                    return Err(TranslationError::ArgumentCountOrTypeMismatch {
                        method: "in".to_string(),
                        expected: 1,
                    });
                }
                let left = self.visit(left)?;
                let values = right
                    .iter()
                    .map(|value| self.visit(value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{} IN ({})", left, values.join(", ")))
            }

            Expression::Method { method, parameters } => self.render_method(*method, parameters),

            Expression::Enum { type_name, values } => self.render_enum(type_name, values),

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

    fn render_binary(
        &self,
        operator: BinaryOperator,
        left: &str,
        right: &str,
    ) -> Result<String, TranslationError> {
        let rendered = match operator {
            BinaryOperator::Add => format!("{} + {}", left, right),
            BinaryOperator::Sub => format!("{} - {}", left, right),
            BinaryOperator::Mul => format!("{} * {}", left, right),
            BinaryOperator::Div => format!("{} / {}", left, right),
            BinaryOperator::Mod => format!("{} % {}", left, right),
            BinaryOperator::Eq => format!("{} = {}", left, right),
            BinaryOperator::Ne => format!("{} <> {}", left, right),
            BinaryOperator::Ge => format!("{} >= {}", left, right),
            BinaryOperator::Gt => format!("{} > {}", left, right),
            BinaryOperator::Le => format!("{} <= {}", left, right),
            BinaryOperator::Lt => format!("{} < {}", left, right),
            BinaryOperator::And => format!("({} AND {})", left, right),
            BinaryOperator::Or => format!("({} OR {})", left, right),
            BinaryOperator::In => {
                return Err(TranslationError::UnsupportedOperator(
                    "in without a literal list".to_string(),
                ))
            }
        };
        Ok(rendered)
    }

    /// `contains`/`startswith`/`endswith` become LIKE patterns. The second
    /// parameter must be a string literal; its quotes (added by literal
    /// rendering) are stripped before embedding in the pattern. LIKE
    /// wildcards (`%`, `_`) inside the text are passed through unescaped.
    fn render_method(
        &mut self,
        method: MethodKind,
        parameters: &[Expression],
    ) -> Result<String, TranslationError> {
        let mismatch = || TranslationError::ArgumentCountOrTypeMismatch {
            method: method.name().to_string(),
            expected: 2,
        };

        if parameters.len() != 2 {
            return Err(mismatch());
        }
        if !matches!(
            &parameters[1],
            Expression::Literal(literal) if literal.declared_type == crate::odata_ast::LiteralType::String
        ) {
            return Err(mismatch());
        }

        let haystack = self.visit(&parameters[0])?;
        let needle = self.visit(&parameters[1])?;
        // Remove the quotes added by literal rendering.
        let needle = &needle[1..needle.len() - 1];

        Ok(match method {
            MethodKind::Contains => format!("{} LIKE '%{}%'", haystack, needle),
            MethodKind::StartsWith => format!("{} LIKE '{}%'", haystack, needle),
            MethodKind::EndsWith => format!("{} LIKE '%{}'", haystack, needle),
        })
    }

    fn render_enum(
        &self,
        type_name: &str,
        values: &[String],
    ) -> Result<String, TranslationError> {
        if type_name != EN_PRODUCTION_TYPE {
            return Err(TranslationError::UnknownEnumValue {
                type_name: type_name.to_string(),
                value: values.first().cloned().unwrap_or_default(),
            });
        }

        let mut rendered = Vec::with_capacity(values.len());
        for value in values {
            let mapped = schema_map::production_type_value(value).ok_or_else(|| {
                TranslationError::UnknownEnumValue {
                    type_name: type_name.to_string(),
                    value: value.clone(),
                }
            })?;
            rendered.push(format!("'{}'", mapped));
        }

        if rendered.len() > 1 {
            Ok(format!("({})", rendered.join(", ")))
        } else {
            Ok(rendered.join(", "))
        }
    }

    /// Render an attribute descriptor as a correlated existence condition
    /// against the attribute table. Aliases are numbered per translation
    /// so several quantifiers in one filter stay independent.
    fn attribute_exists(&mut self, descriptor: &AttributeDescriptor) -> String {
        self.attribute_count += 1;
        let alias = format!("pp{}", self.attribute_count);
        let t = &self.tables;
        format!(
            "EXISTS (SELECT 1 FROM {table} {a} WHERE {a}.{fk} = {ea}.id AND {a}.{name_col} = {name} AND {a}.{value_col} {op} {value})",
            table = t.attribute_table,
            a = alias,
            fk = t.attribute_fk_column,
            ea = t.entity_alias,
            name_col = t.attribute_name_column,
            name = TypedLiteral::Text(descriptor.name.clone()).to_sql(),
            value_col = t.attribute_value_column,
            op = descriptor.operator.sql(),
            value = descriptor.value.to_sql(),
        )
    }
}
