//! 类型化谓词：调用方直接构造的封闭组合子，替代运行时表达式反射。
//!
//! 解析统一采用“积之和”语义：谓词先展开为析取范式，
//! 再渲染成 Or 连接的 And 组。

use crate::alias::AliasRef;
use crate::condition::{Condition, Operator, make_condition, make_in_condition};
use crate::dialect::Dialect;
use crate::metadata::{Entity, EntityResolver, aliased_column};
use crate::param::ParamsRef;
use crate::value::SqlValue;

/// 布尔谓词树。属性名在解析时经由实体元数据映射为列名。
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        property: &'static str,
        op: Operator,
        value: SqlValue,
    },
    In {
        property: &'static str,
        values: Vec<SqlValue>,
    },
    IsNull {
        property: &'static str,
    },
    IsNotNull {
        property: &'static str,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    fn compare(property: &'static str, op: Operator, value: impl Into<SqlValue>) -> Self {
        Self::Compare {
            property,
            op,
            value: value.into(),
        }
    }

    pub fn eq(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::Equal, value)
    }

    pub fn ne(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::NotEqual, value)
    }

    pub fn gt(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::Greater, value)
    }

    pub fn ge(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::GreaterEqual, value)
    }

    pub fn lt(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::Less, value)
    }

    pub fn le(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::LessEqual, value)
    }

    /// `Like '%v%'`
    pub fn contains(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::Contains, value)
    }

    /// `Like 'v%'`
    pub fn starts(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::Starts, value)
    }

    /// `Like '%v'`
    pub fn ends(property: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::compare(property, Operator::Ends, value)
    }

    pub fn in_list(
        property: &'static str,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> Self {
        Self::In {
            property,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(property: &'static str) -> Self {
        Self::IsNull { property }
    }

    pub fn is_not_null(property: &'static str) -> Self {
        Self::IsNotNull { property }
    }

    pub fn and(self, other: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// 叶子比较的个数。
    pub fn comparison_count(&self) -> usize {
        match self {
            Self::And(l, r) | Self::Or(l, r) => l.comparison_count() + r.comparison_count(),
            _ => 1,
        }
    }

    /// 单叶子谓词携带的值是否为空（if-not-empty 判定）。
    ///
    /// IsNull/IsNotNull 不携带值，视为非空（总是附加）。
    pub(crate) fn is_empty_value(&self) -> bool {
        match self {
            Self::Compare { value, .. } => value.is_empty(),
            Self::In { values, .. } => values.is_empty(),
            _ => false,
        }
    }
}

/// 谓词解析器：把谓词树解析为 [`Condition`]，并向参数管理器登记绑定值。
pub(crate) struct PredicateResolver<'a> {
    dialect: Dialect,
    resolver: &'a EntityResolver,
    register: &'a AliasRef,
    params: &'a ParamsRef,
}

impl<'a> PredicateResolver<'a> {
    pub(crate) fn new(
        dialect: Dialect,
        resolver: &'a EntityResolver,
        register: &'a AliasRef,
        params: &'a ParamsRef,
    ) -> Self {
        Self {
            dialect,
            resolver,
            register,
            params,
        }
    }

    /// 解析为积之和形式：组内 And 连接，组间 Or 连接。
    pub(crate) fn resolve<E: Entity>(&self, predicate: &Predicate) -> Option<Condition> {
        let mut out: Option<Condition> = None;
        for group in dnf(predicate) {
            let mut conjunction: Option<Condition> = None;
            for leaf in group {
                conjunction = Condition::and(conjunction, Some(self.leaf::<E>(leaf)));
            }
            out = Condition::or(out, conjunction);
        }
        out
    }

    fn leaf<E: Entity>(&self, leaf: &Predicate) -> Condition {
        match leaf {
            Predicate::Compare {
                property,
                op,
                value,
            } => make_condition(
                self.column::<E>(property),
                value.clone(),
                *op,
                self.params,
            ),
            Predicate::In { property, values } => {
                make_in_condition(self.column::<E>(property), values.clone(), self.params)
            }
            Predicate::IsNull { property } => Condition::IsNull {
                column: self.column::<E>(property),
            },
            Predicate::IsNotNull { property } => Condition::IsNotNull {
                column: self.column::<E>(property),
            },
            // dnf 只产出叶子
            Predicate::And(..) | Predicate::Or(..) => unreachable!("dnf yields leaves only"),
        }
    }

    fn column<E: Entity>(&self, property: &str) -> String {
        aliased_column::<E>(self.dialect, self.resolver, self.register, property)
    }
}

/// 展开为析取范式：Or 拼接组，And 做组的笛卡尔积。
fn dnf(p: &Predicate) -> Vec<Vec<&Predicate>> {
    match p {
        Predicate::Or(l, r) => {
            let mut out = dnf(l);
            out.extend(dnf(r));
            out
        }
        Predicate::And(l, r) => {
            let left = dnf(l);
            let right = dnf(r);
            let mut out = Vec::with_capacity(left.len() * right.len());
            for lg in &left {
                for rg in &right {
                    let mut group = lg.clone();
                    group.extend(rg.iter().copied());
                    out.push(group);
                }
            }
            out
        }
        leaf => vec![vec![leaf]],
    }
}
