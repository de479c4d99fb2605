use crate::condition::{
    Condition, Operator, make_condition, make_in_condition, make_is_empty, make_is_not_empty,
};
use crate::dialect::Dialect;
use crate::param::ParameterManager;
use crate::value::SqlValue;
use pretty_assertions::assert_eq;

fn compare(left: &str, op: Operator, right: &str) -> Condition {
    Condition::Compare {
        left: left.to_string(),
        op,
        right: right.to_string(),
    }
}

#[test]
fn compare_renders_without_spaces() {
    assert_eq!(
        compare("[a]", Operator::Equal, "@_p_0").get_condition(),
        Some("[a]=@_p_0".to_string())
    );
    assert_eq!(
        compare("[a]", Operator::Less, "@_p_0").get_condition(),
        Some("[a]<@_p_0".to_string())
    );
}

#[test]
fn like_renders_with_spaces() {
    assert_eq!(
        compare("[a]", Operator::Contains, "@_p_0").get_condition(),
        Some("[a] Like @_p_0".to_string())
    );
}

#[test]
fn and_degrades_on_empty_side() {
    let x = compare("[a]", Operator::Equal, "@_p_0");
    let blank = Condition::Raw(String::new());

    let left_blank = Condition::And(Box::new(blank.clone()), Box::new(x.clone()));
    let right_blank = Condition::And(Box::new(x.clone()), Box::new(blank.clone()));
    assert_eq!(left_blank.get_condition(), x.get_condition());
    assert_eq!(right_blank.get_condition(), x.get_condition());

    let both_blank = Condition::And(Box::new(blank.clone()), Box::new(blank));
    assert_eq!(both_blank.get_condition(), None);
}

#[test]
fn or_is_symmetric_and_parenthesized() {
    let a = compare("[a]", Operator::Equal, "@_p_0");
    let b = compare("[b]", Operator::Equal, "@_p_1");
    let blank = Condition::Raw(String::new());

    let or = Condition::Or(Box::new(a.clone()), Box::new(b.clone()));
    assert_eq!(
        or.get_condition(),
        Some("([a]=@_p_0 Or [b]=@_p_1)".to_string())
    );

    let left_blank = Condition::Or(Box::new(blank.clone()), Box::new(a.clone()));
    let right_blank = Condition::Or(Box::new(a.clone()), Box::new(blank));
    assert_eq!(left_blank.get_condition(), a.get_condition());
    assert_eq!(right_blank.get_condition(), a.get_condition());
}

#[test]
fn combinator_helpers_degrade() {
    let a = compare("[a]", Operator::Equal, "@_p_0");
    assert_eq!(
        Condition::and(None, Some(a.clone()))
            .unwrap()
            .get_condition(),
        a.get_condition()
    );
    assert_eq!(
        Condition::or(Some(a.clone()), None).unwrap().get_condition(),
        a.get_condition()
    );
    assert_eq!(Condition::and(None, None), None);
}

#[test]
fn in_with_no_values_is_elided() {
    let empty = Condition::In {
        column: "[a]".to_string(),
        values: Vec::new(),
    };
    assert_eq!(empty.get_condition(), None);

    let wrapped = Condition::And(
        Box::new(empty),
        Box::new(compare("[b]", Operator::Equal, "@_p_0")),
    );
    assert_eq!(wrapped.get_condition(), Some("[b]=@_p_0".to_string()));
}

#[test]
fn null_value_degrades_to_is_null() {
    let params = ParameterManager::new(Dialect::SqlServer).into_ref();
    let c = make_condition("[a]".to_string(), SqlValue::Null, Operator::Equal, &params);
    assert_eq!(c.get_condition(), Some("[a] Is Null".to_string()));

    let c = make_condition(
        "[a]".to_string(),
        SqlValue::Null,
        Operator::NotEqual,
        &params,
    );
    assert_eq!(c.get_condition(), Some("[a] Is Not Null".to_string()));
    // Null 不产生参数
    assert!(params.borrow().is_empty());
}

#[test]
fn in_condition_binds_each_value() {
    let params = ParameterManager::new(Dialect::SqlServer).into_ref();
    let c = make_in_condition(
        "[a]".to_string(),
        vec![SqlValue::from("x"), SqlValue::from("y")],
        &params,
    );
    assert_eq!(
        c.get_condition(),
        Some("[a] In (@_p_0,@_p_1)".to_string())
    );
    assert_eq!(params.borrow().len(), 2);
}

#[test]
fn is_empty_is_or_of_null_and_blank() {
    assert_eq!(
        make_is_empty("[Name]".to_string()).get_condition(),
        Some("([Name] Is Null Or [Name]='')".to_string())
    );
}

#[test]
fn is_not_empty_is_the_dual() {
    assert_eq!(
        make_is_not_empty("[Name]".to_string()).get_condition(),
        Some("[Name] Is Not Null And [Name]<>''".to_string())
    );
}
