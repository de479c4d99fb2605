use crate::builder::SqlBuilder;
use crate::condition::{Boundary, Operator};
use crate::dialect::Dialect;
use crate::error::BuilderError;
use crate::metadata::Entity;
use crate::predicate::Predicate;
use crate::value::SqlValue;
use pretty_assertions::assert_eq;
use time::macros::datetime;

struct Sample;

impl Entity for Sample {
    fn entity_name() -> &'static str {
        "Sample"
    }
}

fn builder() -> SqlBuilder {
    let mut b = SqlBuilder::new(Dialect::SqlServer);
    b.from("user", "");
    b
}

#[test]
fn where_defaults_to_equal() {
    let mut b = builder();
    b.where_("Name", "a");
    assert_eq!(
        b.to_sql().unwrap(),
        "Select *\nFrom [user]\nWhere [Name]=@_p_0"
    );
    assert_eq!(b.get_params(), vec![("@_p_0".to_string(), SqlValue::from("a"))]);
}

#[test]
fn named_shorthands_render_their_operators() {
    let mut b = builder();
    b.not_equal("A", 1)
        .greater("B", 2)
        .greater_equal("C", 3)
        .less("D", 4)
        .less_equal("E", 5);
    assert_eq!(
        b.get_condition(),
        Some(
            "[A]<>@_p_0 And [B]>@_p_1 And [C]>=@_p_2 And [D]<@_p_3 And [E]<=@_p_4".to_string()
        )
    );
}

#[test]
fn like_family_decorates_parameters() {
    let mut b = builder();
    b.contains("Name", "ab").starts("Code", "x").ends("Code", "y");
    assert_eq!(
        b.get_condition(),
        Some("[Name] Like @_p_0 And [Code] Like @_p_1 And [Code] Like @_p_2".to_string())
    );
    let params = b.get_params();
    assert_eq!(params[0].1, SqlValue::from("%ab%"));
    assert_eq!(params[1].1, SqlValue::from("x%"));
    assert_eq!(params[2].1, SqlValue::from("%y"));
}

#[test]
fn in_binds_one_param_per_element() {
    let mut b = builder();
    b.in_("Status", ["a", "b", "c"]);
    assert_eq!(
        b.to_sql().unwrap(),
        "Select *\nFrom [user]\nWhere [Status] In (@_p_0,@_p_1,@_p_2)"
    );
    assert_eq!(b.get_params().len(), 3);
}

#[test]
fn in_with_empty_list_is_elided() {
    let mut b = builder();
    b.in_("Status", Vec::<String>::new());
    assert_eq!(b.to_sql().unwrap(), "Select *\nFrom [user]");
}

#[test]
fn where_if_respects_condition() {
    let mut b = builder();
    b.where_if("A", 1, false).where_if("B", 2, true);
    assert_eq!(b.get_condition(), Some("[B]=@_p_0".to_string()));
}

#[test]
fn where_if_not_empty_skips_empty_values() {
    let mut b = builder();
    b.where_("Name", "a");
    let before_sql = b.to_sql().unwrap();
    let before_params = b.get_params();

    b.where_if_not_empty("A", SqlValue::Null)
        .where_if_not_empty("B", "")
        .where_if_not_empty("C", "   ")
        .where_if_not_empty("D", 0_i64)
        .where_if_not_empty("E", uuid::Uuid::nil());

    assert_eq!(b.to_sql().unwrap(), before_sql);
    assert_eq!(b.get_params(), before_params);

    b.where_if_not_empty("F", "x");
    assert_eq!(
        b.get_condition(),
        Some("[Name]=@_p_0 And [F]=@_p_1".to_string())
    );
}

#[test]
fn where_if_not_empty_op_applies_operator() {
    let mut b = builder();
    b.where_if_not_empty_op("Name", "ab", Operator::Contains);
    assert_eq!(b.get_condition(), Some("[Name] Like @_p_0".to_string()));
    assert_eq!(b.get_params()[0].1, SqlValue::from("%ab%"));
}

#[test]
fn single_predicate_if_not_empty() {
    let mut b = builder();
    b.where_if_not_empty_pred::<Sample>(&Predicate::eq("Name", ""));
    assert_eq!(b.to_sql().unwrap(), "Select *\nFrom [user]");

    let mut b = builder();
    b.where_if_not_empty_pred::<Sample>(&Predicate::eq("Name", "a"));
    assert_eq!(b.get_condition(), Some("[Name]=@_p_0".to_string()));
}

#[test]
fn multi_comparison_predicate_is_rejected() {
    let mut b = builder();
    let p = Predicate::eq("Name", "a").and(Predicate::eq("Mobile", "123"));
    b.where_if_not_empty_pred::<Sample>(&p);
    assert_eq!(b.to_sql().unwrap_err(), BuilderError::OnlyOnePredicate(2));
}

#[test]
fn null_value_renders_is_null() {
    let mut b = builder();
    b.where_("Name", SqlValue::Null).is_not_null("Age");
    assert_eq!(
        b.get_condition(),
        Some("[Name] Is Null And [Age] Is Not Null".to_string())
    );
    assert!(b.get_params().is_empty());
}

#[test]
fn is_empty_and_is_not_empty() {
    let mut b = builder();
    b.is_empty("Name");
    assert_eq!(
        b.get_condition(),
        Some("([Name] Is Null Or [Name]='')".to_string())
    );

    let mut b = builder();
    b.is_not_empty("Name");
    assert_eq!(
        b.get_condition(),
        Some("[Name] Is Not Null And [Name]<>''".to_string())
    );
}

#[test]
fn numeric_between_boundaries() {
    let mut b = builder();
    b.between("Age", Some(18), Some(30), Boundary::Both);
    assert_eq!(
        b.get_condition(),
        Some("[Age]>=@_p_0 And [Age]<=@_p_1".to_string())
    );

    let mut b = builder();
    b.between("Age", Some(18), Some(30), Boundary::Neither);
    assert_eq!(
        b.get_condition(),
        Some("[Age]>@_p_0 And [Age]<@_p_1".to_string())
    );

    let mut b = builder();
    b.between("Age", Some(18), None::<i32>, Boundary::Both);
    assert_eq!(b.get_condition(), Some("[Age]>=@_p_0".to_string()));

    let mut b = builder();
    b.between("Age", None::<i32>, None::<i32>, Boundary::Both);
    assert_eq!(b.get_condition(), None);
}

#[test]
fn date_between_without_time_normalizes_to_day_boundaries() {
    let mut b = builder();
    b.between_date(
        "CreateTime",
        Some(datetime!(2024-05-01 10:20:30 UTC)),
        Some(datetime!(2024-05-03 15:00:00 UTC)),
        false,
        None,
    );
    // 下界归零点，含上界折算为次日零点之前
    assert_eq!(
        b.get_condition(),
        Some("[CreateTime]>=@_p_0 And [CreateTime]<@_p_1".to_string())
    );
    let params = b.get_params();
    assert_eq!(
        params[0].1,
        SqlValue::from(datetime!(2024-05-01 00:00:00 UTC))
    );
    assert_eq!(
        params[1].1,
        SqlValue::from(datetime!(2024-05-04 00:00:00 UTC))
    );
}

#[test]
fn date_between_with_time_keeps_bounds() {
    let min = datetime!(2024-05-01 10:20:30 UTC);
    let max = datetime!(2024-05-03 15:00:00 UTC);
    let mut b = builder();
    b.between_date("CreateTime", Some(min), Some(max), true, None);
    assert_eq!(
        b.get_condition(),
        Some("[CreateTime]>=@_p_0 And [CreateTime]<=@_p_1".to_string())
    );
    let params = b.get_params();
    assert_eq!(params[0].1, SqlValue::from(min));
    assert_eq!(params[1].1, SqlValue::from(max));
}

#[test]
fn append_where_is_raw() {
    let mut b = builder();
    b.where_("A", 1).append_where("Exists (Select 1 From [log])");
    assert_eq!(
        b.get_condition(),
        Some("[A]=@_p_0 And Exists (Select 1 From [log])".to_string())
    );
}

#[test]
fn empty_column_is_reported() {
    let mut b = builder();
    b.where_(" ", 1);
    assert_eq!(b.to_sql().unwrap_err(), BuilderError::EmptyColumn);
}

#[test]
fn sum_of_products_through_builder() {
    let mut b = SqlBuilder::new(Dialect::SqlServer);
    b.from_entity::<Sample>("s", "");
    let p = Predicate::eq("Name", "a")
        .and(Predicate::eq("Age", 1).or(Predicate::eq("Age", 2)));
    b.where_pred::<Sample>(&p);
    assert_eq!(
        b.get_condition(),
        Some(
            "([s].[Name]=@_p_0 And [s].[Age]=@_p_1 Or [s].[Name]=@_p_2 And [s].[Age]=@_p_3)"
                .to_string()
        )
    );
}
