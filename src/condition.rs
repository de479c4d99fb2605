//! 条件树：叶子比较与 And/Or 组合，空操作数自动退化。

use crate::param::ParamsRef;
use crate::value::SqlValue;

/// 条件运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    /// `Like '%v%'`
    Contains,
    /// `Like 'v%'`
    Starts,
    /// `Like '%v'`
    Ends,
    In,
}

impl Operator {
    /// 渲染为 SQL 片段：比较符不带空格，单词运算符带空格。
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Contains | Self::Starts | Self::Ends => " Like ",
            Self::In => " In ",
        }
    }
}

/// Between 的边界包含标志。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    Neither,
    Left,
    Right,
    #[default]
    Both,
}

impl Boundary {
    pub(crate) fn left_inclusive(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    pub(crate) fn right_inclusive(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

/// 查询条件节点。不可变；`get_condition` 返回 `None` 的节点被父节点省略。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// 左右操作数均已渲染完毕（列名、参数名或字面片段）。
    Compare {
        left: String,
        op: Operator,
        right: String,
    },
    In {
        column: String,
        values: Vec<String>,
    },
    IsNull {
        column: String,
    },
    IsNotNull {
        column: String,
    },
    /// 原样拼接的 SQL 条件。
    Raw(String),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// 渲染条件；空操作数产出 `None`。
    ///
    /// `And(a, b)` 在任一侧为 `None` 时退化为另一侧；`Or` 同理且对称，
    /// 两侧都存在时以括号包裹。
    pub fn get_condition(&self) -> Option<String> {
        match self {
            Self::Compare { left, op, right } => {
                if left.trim().is_empty() || right.trim().is_empty() {
                    return None;
                }
                Some(format!("{left}{}{right}", op.sql()))
            }
            Self::In { column, values } => {
                if column.trim().is_empty() || values.is_empty() {
                    return None;
                }
                Some(format!("{column} In ({})", values.join(",")))
            }
            Self::IsNull { column } => {
                if column.trim().is_empty() {
                    return None;
                }
                Some(format!("{column} Is Null"))
            }
            Self::IsNotNull { column } => {
                if column.trim().is_empty() {
                    return None;
                }
                Some(format!("{column} Is Not Null"))
            }
            Self::Raw(sql) => {
                if sql.trim().is_empty() {
                    None
                } else {
                    Some(sql.clone())
                }
            }
            Self::And(l, r) => match (l.get_condition(), r.get_condition()) {
                (Some(l), Some(r)) => Some(format!("{l} And {r}")),
                (Some(l), None) => Some(l),
                (None, Some(r)) => Some(r),
                (None, None) => None,
            },
            Self::Or(l, r) => match (l.get_condition(), r.get_condition()) {
                (Some(l), Some(r)) => Some(format!("({l} Or {r})")),
                (Some(l), None) => Some(l),
                (None, Some(r)) => Some(r),
                (None, None) => None,
            },
        }
    }

    /// And 组合辅助：任一侧缺失时退化为另一侧。
    pub fn and(left: Option<Condition>, right: Option<Condition>) -> Option<Condition> {
        match (left, right) {
            (Some(l), Some(r)) => Some(Self::And(Box::new(l), Box::new(r))),
            (Some(l), None) => Some(l),
            (None, r) => r,
        }
    }

    /// Or 组合辅助，与 [`Condition::and`] 对称。
    pub fn or(left: Option<Condition>, right: Option<Condition>) -> Option<Condition> {
        match (left, right) {
            (Some(l), Some(r)) => Some(Self::Or(Box::new(l), Box::new(r))),
            (Some(l), None) => Some(l),
            (None, r) => r,
        }
    }
}

/// 由列名、值与运算符构造叶子条件并绑定参数。
///
/// `Equal`/`NotEqual` 遇到 Null 值退化为 `Is Null` / `Is Not Null`。
pub(crate) fn make_condition(
    column: String,
    value: SqlValue,
    op: Operator,
    params: &ParamsRef,
) -> Condition {
    if matches!(value, SqlValue::Null) {
        return match op {
            Operator::NotEqual => Condition::IsNotNull { column },
            _ => Condition::IsNull { column },
        };
    }
    let name = params.borrow_mut().add(value, op);
    Condition::Compare {
        left: column,
        op,
        right: name,
    }
}

/// In 条件：每个元素绑定为一个独立参数。
pub(crate) fn make_in_condition(
    column: String,
    values: Vec<SqlValue>,
    params: &ParamsRef,
) -> Condition {
    let names: Vec<String> = values
        .into_iter()
        .map(|v| params.borrow_mut().add(v, Operator::Equal))
        .collect();
    Condition::In {
        column,
        values: names,
    }
}

/// 空条件：`(c Is Null Or c='')`。
pub(crate) fn make_is_empty(column: String) -> Condition {
    Condition::Or(
        Box::new(Condition::IsNull {
            column: column.clone(),
        }),
        Box::new(Condition::Compare {
            left: column,
            op: Operator::Equal,
            right: "''".to_string(),
        }),
    )
}

/// 非空条件：`(c Is Not Null And c<>'')`，IsEmpty 的 De Morgan 对偶。
pub(crate) fn make_is_not_empty(column: String) -> Condition {
    Condition::And(
        Box::new(Condition::IsNotNull {
            column: column.clone(),
        }),
        Box::new(Condition::Compare {
            left: column,
            op: Operator::NotEqual,
            right: "''".to_string(),
        }),
    )
}
