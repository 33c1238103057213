//! End-to-end SQL generation over realistic catalog filters.

use odasql::odata_ast::{
    BinaryOperator, Expression, LiteralType, MethodKind, PathSegment, UnaryOperator,
};
use odasql::schema_map::{ColumnMapping, EN_PRODUCTION_TYPE};
use odasql::translator::{SqlFilterGenerator, TranslationError};

fn translate(expression: &Expression) -> Result<String, TranslationError> {
    let _ = env_logger::builder().is_test(true).try_init();
    SqlFilterGenerator::new(ColumnMapping::product_default()).translate(Some(expression))
}

fn attribute_any(name: &str, operator: BinaryOperator, value: Expression) -> Expression {
    let body = Expression::binary(
        BinaryOperator::And,
        Expression::binary(
            BinaryOperator::Eq,
            Expression::member(vec![
                PathSegment::lambda_variable("att"),
                PathSegment::primitive("Name"),
            ]),
            Expression::string(name),
        ),
        Expression::binary(
            operator,
            Expression::member(vec![
                PathSegment::lambda_variable("att"),
                PathSegment::primitive("Value"),
            ]),
            value,
        ),
    );
    Expression::member(vec![
        PathSegment::navigation("Attributes"),
        PathSegment::any("att", body),
    ])
}

#[test]
fn test_publication_window_filter() {
    // PublicationDate ge ... and PublicationDate lt ...
    let expression = Expression::binary(
        BinaryOperator::And,
        Expression::binary(
            BinaryOperator::Ge,
            Expression::property("PublicationDate"),
            Expression::datetime("2020-05-15T00:00:00.000Z"),
        ),
        Expression::binary(
            BinaryOperator::Lt,
            Expression::property("PublicationDate"),
            Expression::datetime("2020-05-16T00:00:00.000Z"),
        ),
    );
    assert_eq!(
        translate(&expression).unwrap(),
        "(p.generation_time >= '2020-05-15 00:00:00.000000 +0000' \
         AND p.generation_time < '2020-05-16 00:00:00.000000 +0000')"
    );
}

#[test]
fn test_name_prefix_and_sensing_window() {
    let expression = Expression::binary(
        BinaryOperator::And,
        Expression::method(
            MethodKind::StartsWith,
            vec![Expression::property("Name"), Expression::string("S3B_DO_0")],
        ),
        Expression::binary(
            BinaryOperator::And,
            Expression::binary(
                BinaryOperator::Ge,
                Expression::member(vec![
                    PathSegment::complex("ContentDate"),
                    PathSegment::primitive("Start"),
                ]),
                Expression::datetime("2020-03-18T03:49:30Z"),
            ),
            Expression::binary(
                BinaryOperator::Le,
                Expression::member(vec![
                    PathSegment::complex("ContentDate"),
                    PathSegment::primitive("End"),
                ]),
                Expression::datetime("2020-03-18T04:00:35Z"),
            ),
        ),
    );
    assert_eq!(
        translate(&expression).unwrap(),
        "(ppf.product_file_name LIKE 'S3B_DO_0%' \
         AND (p.sensing_start_time >= '2020-03-18 03:49:30.000000 +0000' \
         AND p.sensing_stop_time <= '2020-03-18 04:00:35.000000 +0000'))"
    );
}

#[test]
fn test_contains_leaves_wildcards_unescaped() {
    let expression = Expression::method(
        MethodKind::Contains,
        vec![Expression::property("Name"), Expression::string("1024 MB")],
    );
    assert_eq!(
        translate(&expression).unwrap(),
        "ppf.product_file_name LIKE '%1024 MB%'"
    );
}

#[test]
fn test_production_type_enum() {
    let expression = Expression::binary(
        BinaryOperator::Eq,
        Expression::property("ProductionType"),
        Expression::Enum {
            type_name: EN_PRODUCTION_TYPE.to_string(),
            values: vec!["on_demand_default".to_string()],
        },
    );
    assert_eq!(
        translate(&expression).unwrap(),
        "p.production_type = 'ON_DEMAND_DEFAULT'"
    );
}

#[test]
fn test_attribute_condition_becomes_exists_subquery() {
    let expression = attribute_any("orbitNumber", BinaryOperator::Ge, Expression::int64(987));
    assert_eq!(
        translate(&expression).unwrap(),
        "EXISTS (SELECT 1 FROM product_parameter pp1 \
         WHERE pp1.product_id = p.id \
         AND pp1.parameter_name = 'orbitNumber' \
         AND pp1.parameter_value >= 987)"
    );
}

#[test]
fn test_combined_attribute_and_field_filter() {
    let expression = Expression::binary(
        BinaryOperator::And,
        attribute_any(
            "productType",
            BinaryOperator::Eq,
            Expression::string("IW_GRDH_1S"),
        ),
        Expression::binary(
            BinaryOperator::Gt,
            Expression::property("ContentLength"),
            Expression::int64(0),
        ),
    );
    assert_eq!(
        translate(&expression).unwrap(),
        "(EXISTS (SELECT 1 FROM product_parameter pp1 \
         WHERE pp1.product_id = p.id \
         AND pp1.parameter_name = 'productType' \
         AND pp1.parameter_value = 'IW_GRDH_1S') \
         AND ppf.file_size > 0)"
    );
}

#[test]
fn test_not_over_parenthesized_disjunction() {
    let expression = Expression::unary(
        UnaryOperator::Not,
        Expression::binary(
            BinaryOperator::Or,
            Expression::binary(
                BinaryOperator::Eq,
                Expression::property("ContentLength"),
                Expression::int64(0),
            ),
            Expression::binary(
                BinaryOperator::Eq,
                Expression::property("Name"),
                Expression::string(""),
            ),
        ),
    );
    assert_eq!(
        translate(&expression).unwrap(),
        "NOT (ppf.file_size = 0 OR ppf.product_file_name = '')"
    );
}

#[test]
fn test_decimal_literal_passes_raw_text() {
    let expression = Expression::binary(
        BinaryOperator::Gt,
        Expression::property("ContentLength"),
        Expression::literal(LiteralType::Double, "0.50"),
    );
    assert_eq!(translate(&expression).unwrap(), "ppf.file_size > 0.50");
}

#[test]
fn test_unmapped_and_unknown_fields_fail_differently() {
    let unmapped = Expression::binary(
        BinaryOperator::Eq,
        Expression::property("ContentType"),
        Expression::string("application/octet-stream"),
    );
    assert_eq!(
        translate(&unmapped).unwrap_err(),
        TranslationError::UnmappedField("ContentType".to_string())
    );

    let unknown = Expression::binary(
        BinaryOperator::Eq,
        Expression::property("Footprint"),
        Expression::string("POLYGON(...)"),
    );
    assert_eq!(
        translate(&unknown).unwrap_err(),
        TranslationError::UnknownField("Footprint".to_string())
    );
}

#[test]
fn test_malformed_lambda_rejected_whole() {
    // Value-only lambda: no Name conjunct.
    let body = Expression::binary(
        BinaryOperator::And,
        Expression::binary(
            BinaryOperator::Ge,
            Expression::member(vec![
                PathSegment::lambda_variable("att"),
                PathSegment::primitive("Value"),
            ]),
            Expression::int64(1),
        ),
        Expression::binary(
            BinaryOperator::Le,
            Expression::member(vec![
                PathSegment::lambda_variable("att"),
                PathSegment::primitive("Value"),
            ]),
            Expression::int64(9),
        ),
    );
    let expression = Expression::member(vec![
        PathSegment::navigation("Attributes"),
        PathSegment::any("att", body),
    ]);
    assert!(matches!(
        translate(&expression).unwrap_err(),
        TranslationError::UnsupportedLambdaShape(_)
    ));
}

#[test]
fn test_full_sql_command_assembly() {
    let mut generator = SqlFilterGenerator::new(ColumnMapping::product_default());
    let filter = Expression::binary(
        BinaryOperator::Gt,
        Expression::property("ContentLength"),
        Expression::int64(0),
    );
    let command = format!(
        "{}{}",
        generator.sql_command(false),
        generator.translate(Some(&filter)).unwrap()
    );
    assert_eq!(
        command,
        "SELECT DISTINCT p.* FROM product p\n\
         JOIN product_file ppf ON ppf.product_id = p.id\n\
         WHERE ppf.file_size > 0"
    );
}

#[test]
fn test_count_command_with_absent_filter() {
    let mut generator = SqlFilterGenerator::new(ColumnMapping::product_default());
    let command = format!(
        "{}{}",
        generator.sql_command(true),
        generator.translate(None).unwrap()
    );
    assert_eq!(
        command,
        "SELECT count(DISTINCT p.*) FROM product p\n\
         JOIN product_file ppf ON ppf.product_id = p.id\n\
         WHERE TRUE"
    );
}
