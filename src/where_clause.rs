//! Where 子句：持有顶层条件树，所有查询条件从这里汇入。

use crate::alias::AliasRef;
use crate::condition::{
    Boundary, Condition, Operator, make_condition, make_in_condition, make_is_empty,
    make_is_not_empty,
};
use crate::dialect::Dialect;
use crate::error::{BuilderError, Result};
use crate::metadata::{Entity, EntityResolver};
use crate::param::ParamsRef;
use crate::predicate::{Predicate, PredicateResolver};
use crate::value::SqlValue;
use std::rc::Rc;
use time::{Duration, OffsetDateTime, Time};

#[derive(Debug)]
pub(crate) struct WhereClause {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    params: ParamsRef,
    condition: Option<Condition>,
}

impl WhereClause {
    pub(crate) fn new(
        dialect: Dialect,
        resolver: Rc<EntityResolver>,
        register: AliasRef,
        params: ParamsRef,
    ) -> Self {
        Self {
            dialect,
            resolver,
            register,
            params,
            condition: None,
        }
    }

    pub(crate) fn clone_with(
        &self,
        resolver: Rc<EntityResolver>,
        register: AliasRef,
        params: ParamsRef,
    ) -> Self {
        Self {
            dialect: self.dialect,
            resolver,
            register,
            params,
            condition: self.condition.clone(),
        }
    }

    /// And 连接一个条件。
    pub(crate) fn and(&mut self, condition: Condition) {
        self.condition = Condition::and(self.condition.take(), Some(condition));
    }

    /// Or 连接一个条件。
    pub(crate) fn or(&mut self, condition: Condition) {
        self.condition = Condition::or(self.condition.take(), Some(condition));
    }

    /// 设置查询条件；列名可带 `a.b` 前缀。
    pub(crate) fn where_(
        &mut self,
        column: &str,
        value: SqlValue,
        op: Operator,
    ) -> Result<()> {
        if column.trim().is_empty() {
            return Err(BuilderError::EmptyColumn);
        }
        let column = self.dialect.quote_column(column);
        self.and(make_condition(column, value, op, &self.params));
        Ok(())
    }

    /// 设置谓词条件（积之和展开）。
    pub(crate) fn where_pred<E: Entity>(&mut self, predicate: &Predicate) {
        let resolver =
            PredicateResolver::new(self.dialect, &self.resolver, &self.register, &self.params);
        if let Some(condition) = resolver.resolve::<E>(predicate) {
            self.and(condition);
        }
    }

    /// 值为空时忽略该条件。
    pub(crate) fn where_if_not_empty(
        &mut self,
        column: &str,
        value: SqlValue,
        op: Operator,
    ) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.where_(column, value, op)
    }

    /// 单条件谓词版本：多于一个比较时无法归因空值，判作调用方错误。
    pub(crate) fn where_if_not_empty_pred<E: Entity>(
        &mut self,
        predicate: &Predicate,
    ) -> Result<()> {
        let count = predicate.comparison_count();
        if count > 1 {
            return Err(BuilderError::OnlyOnePredicate(count));
        }
        if predicate.is_empty_value() {
            return Ok(());
        }
        self.where_pred::<E>(predicate);
        Ok(())
    }

    /// In 条件：每个元素一个参数。
    pub(crate) fn in_(&mut self, column: &str, values: Vec<SqlValue>) -> Result<()> {
        if column.trim().is_empty() {
            return Err(BuilderError::EmptyColumn);
        }
        let column = self.dialect.quote_column(column);
        self.and(make_in_condition(column, values, &self.params));
        Ok(())
    }

    /// 范围条件：按边界标志选择 `>`/`>=` 与 `<`/`<=`，缺失端省略。
    pub(crate) fn between(
        &mut self,
        column: &str,
        min: Option<SqlValue>,
        max: Option<SqlValue>,
        boundary: Boundary,
    ) -> Result<()> {
        if column.trim().is_empty() {
            return Err(BuilderError::EmptyColumn);
        }
        let column = self.dialect.quote_column(column);
        let left_op = if boundary.left_inclusive() {
            Operator::GreaterEqual
        } else {
            Operator::Greater
        };
        let right_op = if boundary.right_inclusive() {
            Operator::LessEqual
        } else {
            Operator::Less
        };
        let left = min.map(|v| make_condition(column.clone(), v, left_op, &self.params));
        let right = max.map(|v| make_condition(column.clone(), v, right_op, &self.params));
        if let Some(condition) = Condition::and(left, right) {
            self.and(condition);
        }
        Ok(())
    }

    /// 日期范围条件。
    ///
    /// `include_time` 为假时归一到日边界：下界取当日零点，含上界
    /// 改为“次日零点之前”（`< max.date + 1d`），保证当日数据全部命中。
    /// 边界缺省为 Both。
    pub(crate) fn between_date(
        &mut self,
        column: &str,
        min: Option<OffsetDateTime>,
        max: Option<OffsetDateTime>,
        include_time: bool,
        boundary: Option<Boundary>,
    ) -> Result<()> {
        let boundary = boundary.unwrap_or(Boundary::Both);
        if include_time {
            return self.between(
                column,
                min.map(SqlValue::from),
                max.map(SqlValue::from),
                boundary,
            );
        }
        let min = min.map(|v| v.replace_time(Time::MIDNIGHT));
        let max = max.map(|v| {
            let day = v.replace_time(Time::MIDNIGHT);
            if boundary.right_inclusive() {
                day + Duration::days(1)
            } else {
                day
            }
        });
        // 上界含边界时已折算为次日零点，比较必须用排他的 `<`。
        let effective = match boundary {
            Boundary::Both => Boundary::Left,
            Boundary::Right => Boundary::Neither,
            other => other,
        };
        self.between(
            column,
            min.map(SqlValue::from),
            max.map(SqlValue::from),
            effective,
        )
    }

    pub(crate) fn is_null(&mut self, column: &str) -> Result<()> {
        self.where_(column, SqlValue::Null, Operator::Equal)
    }

    pub(crate) fn is_not_null(&mut self, column: &str) -> Result<()> {
        self.where_(column, SqlValue::Null, Operator::NotEqual)
    }

    pub(crate) fn is_empty(&mut self, column: &str) -> Result<()> {
        if column.trim().is_empty() {
            return Err(BuilderError::EmptyColumn);
        }
        let column = self.dialect.quote_column(column);
        self.and(make_is_empty(column));
        Ok(())
    }

    pub(crate) fn is_not_empty(&mut self, column: &str) -> Result<()> {
        if column.trim().is_empty() {
            return Err(BuilderError::EmptyColumn);
        }
        let column = self.dialect.quote_column(column);
        self.and(make_is_not_empty(column));
        Ok(())
    }

    /// 原样追加条件片段。
    pub(crate) fn append_sql(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        self.and(Condition::Raw(sql.to_string()));
    }

    /// 顶层条件文本（不含 `Where` 关键字）。
    pub(crate) fn get_condition(&self) -> Option<String> {
        self.condition.as_ref().and_then(|c| c.get_condition())
    }

    pub(crate) fn to_sql(&self) -> Option<String> {
        self.get_condition().map(|c| format!("Where {c}"))
    }
}
