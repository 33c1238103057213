//! Cross-backend checks: the SQL fragment and the in-memory verdict are
//! produced from the same tree, so for a fixture entity whose column
//! values we know, a filter that matches in memory must translate to a
//! fragment selecting that entity, and vice versa. SQL is not executed
//! here; agreement is checked on the fragments translation produces and
//! the verdicts evaluation returns for hand-checked filters.

use chrono::{TimeZone, Utc};

use odasql::entity_filter::{Entity, EntityFilter, PropertyValue};
use odasql::odata_ast::{BinaryOperator, Expression, MethodKind, PathSegment};
use odasql::schema_map::ColumnMapping;
use odasql::translator::{SqlFilterGenerator, TranslationError};

fn fixture() -> Entity {
    Entity::new()
        .with_property(
            "Name",
            PropertyValue::text("S1A_IW_GRDH_1SDV_20200516T054842"),
        )
        .with_property("ContentLength", PropertyValue::Integer(1_048_576))
        .with_property(
            "PublicationDate",
            PropertyValue::Timestamp(Utc.with_ymd_and_hms(2020, 5, 16, 8, 0, 0).unwrap()),
        )
        .with_attribute("orbitNumber", PropertyValue::Integer(32_641))
}

/// Filters that hold for the fixture, with the exact fragment each must
/// translate to.
fn matching_cases() -> Vec<(Expression, &'static str)> {
    vec![
        (
            Expression::binary(
                BinaryOperator::Gt,
                Expression::property("ContentLength"),
                Expression::int64(0),
            ),
            "ppf.file_size > 0",
        ),
        (
            Expression::method(
                MethodKind::Contains,
                vec![Expression::property("Name"), Expression::string("IW_GRDH")],
            ),
            "ppf.product_file_name LIKE '%IW_GRDH%'",
        ),
        (
            Expression::binary(
                BinaryOperator::Ge,
                Expression::property("PublicationDate"),
                Expression::datetime("2020-05-16T00:00:00Z"),
            ),
            "p.generation_time >= '2020-05-16 00:00:00.000000 +0000'",
        ),
        (
            Expression::member(vec![
                PathSegment::navigation("Attributes"),
                PathSegment::any(
                    "att",
                    Expression::binary(
                        BinaryOperator::And,
                        Expression::binary(
                            BinaryOperator::Eq,
                            Expression::member(vec![
                                PathSegment::lambda_variable("att"),
                                PathSegment::primitive("Name"),
                            ]),
                            Expression::string("orbitNumber"),
                        ),
                        Expression::binary(
                            BinaryOperator::Gt,
                            Expression::member(vec![
                                PathSegment::lambda_variable("att"),
                                PathSegment::primitive("Value"),
                            ]),
                            Expression::int64(30_000),
                        ),
                    ),
                ),
            ]),
            "EXISTS (SELECT 1 FROM product_parameter pp1 \
             WHERE pp1.product_id = p.id \
             AND pp1.parameter_name = 'orbitNumber' \
             AND pp1.parameter_value > 30000)",
        ),
    ]
}

#[test]
fn test_matching_filters_translate_and_match() {
    let entity = fixture();
    let evaluator = EntityFilter::new(&entity);
    for (filter, expected_sql) in matching_cases() {
        let sql = SqlFilterGenerator::new(ColumnMapping::product_default())
            .translate(Some(&filter))
            .unwrap();
        assert_eq!(sql, expected_sql);
        assert!(
            evaluator.matches(Some(&filter)).unwrap(),
            "fixture must satisfy {expected_sql}"
        );
    }
}

#[test]
fn test_negated_filters_agree() {
    // Negating each matching filter flips the in-memory verdict and
    // prefixes the fragment, with no other change.
    let entity = fixture();
    let evaluator = EntityFilter::new(&entity);
    for (filter, expected_sql) in matching_cases() {
        let negated = Expression::unary(odasql::odata_ast::UnaryOperator::Not, filter);
        let sql = SqlFilterGenerator::new(ColumnMapping::product_default())
            .translate(Some(&negated))
            .unwrap();
        assert_eq!(sql, format!("NOT {expected_sql}"));
        assert!(!evaluator.matches(Some(&negated)).unwrap());
    }
}

#[test]
fn test_both_backends_accept_absent_filter() {
    let entity = fixture();
    assert!(EntityFilter::new(&entity).matches(None).unwrap());
    assert_eq!(
        SqlFilterGenerator::new(ColumnMapping::product_default())
            .translate(None)
            .unwrap(),
        "TRUE"
    );
}

#[test]
fn test_both_backends_reject_malformed_lambda() {
    // Name compared with `ne`: rejected identically by both backends,
    // since both go through the shared lambda sub-translator.
    let body = Expression::binary(
        BinaryOperator::And,
        Expression::binary(
            BinaryOperator::Ne,
            Expression::member(vec![
                PathSegment::lambda_variable("att"),
                PathSegment::primitive("Name"),
            ]),
            Expression::string("orbitNumber"),
        ),
        Expression::binary(
            BinaryOperator::Gt,
            Expression::member(vec![
                PathSegment::lambda_variable("att"),
                PathSegment::primitive("Value"),
            ]),
            Expression::int64(0),
        ),
    );
    let filter = Expression::member(vec![
        PathSegment::navigation("Attributes"),
        PathSegment::any("att", body),
    ]);

    let sql_err = SqlFilterGenerator::new(ColumnMapping::product_default())
        .translate(Some(&filter))
        .unwrap_err();
    let entity = fixture();
    let eval_err = EntityFilter::new(&entity).matches(Some(&filter)).unwrap_err();

    assert_eq!(
        sql_err,
        TranslationError::OperatorNotAllowedForName("ne".to_string())
    );
    assert_eq!(sql_err, eval_err);
}
