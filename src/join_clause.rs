//! Join 子句：有序的连接项，每项持有自己的 On 条件树。

use crate::alias::AliasRef;
use crate::condition::{Condition, Operator};
use crate::dialect::Dialect;
use crate::error::{BuilderError, Result};
use crate::metadata::{Entity, EntityResolver, aliased_column};
use crate::sql_item::SqlItem;
use std::any::TypeId;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl JoinType {
    fn sql(self) -> &'static str {
        match self {
            Self::Inner => "Join",
            Self::Left => "Left Join",
            Self::Right => "Right Join",
        }
    }
}

#[derive(Debug, Clone)]
struct JoinEntry {
    join_type: JoinType,
    table: SqlItem,
    on: Option<Condition>,
}

#[derive(Debug)]
pub(crate) struct JoinClause {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    entries: Vec<JoinEntry>,
}

impl JoinClause {
    pub(crate) fn new(dialect: Dialect, resolver: Rc<EntityResolver>, register: AliasRef) -> Self {
        Self {
            dialect,
            resolver,
            register,
            entries: Vec::new(),
        }
    }

    pub(crate) fn clone_with(&self, resolver: Rc<EntityResolver>, register: AliasRef) -> Self {
        Self {
            dialect: self.dialect,
            resolver,
            register,
            entries: self.entries.clone(),
        }
    }

    pub(crate) fn join(&mut self, join_type: JoinType, table: &str, alias: &str) {
        self.entries.push(JoinEntry {
            join_type,
            table: SqlItem::new(table, "", alias),
            on: None,
        });
    }

    /// 连接实体表，并注册别名供 On/Where 的列解析使用。
    pub(crate) fn join_entity<E: Entity>(
        &mut self,
        join_type: JoinType,
        alias: &str,
        schema: &str,
    ) -> Result<()> {
        let table = self.resolver.table::<E>();
        let schema = if schema.trim().is_empty() {
            self.resolver.schema::<E>().unwrap_or_default()
        } else {
            schema.to_string()
        };
        self.entries.push(JoinEntry {
            join_type,
            table: SqlItem::new(&table, &schema, alias),
            on: None,
        });
        let explicit = !alias.trim().is_empty();
        self.register.borrow_mut().register(
            TypeId::of::<E>(),
            E::entity_name(),
            self.resolver.alias::<E>(alias),
            explicit,
        )
    }

    /// 原样追加的连接片段。
    pub(crate) fn append_sql(&mut self, join_type: JoinType, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        self.entries.push(JoinEntry {
            join_type,
            table: SqlItem::raw(sql),
            on: None,
        });
    }

    /// 为最近一个连接追加 On 条件（列对列比较，多次调用 And 连接）。
    pub(crate) fn on(&mut self, left: &str, right: &str, op: Operator) -> Result<()> {
        let condition = Condition::Compare {
            left: self.dialect.quote_column(left),
            op,
            right: self.dialect.quote_column(right),
        };
        self.attach(condition)
    }

    /// 双实体 On 条件：两侧分别按各自实体解析为带别名的列。
    pub(crate) fn on_entity<L: Entity, R: Entity>(
        &mut self,
        left_property: &str,
        right_property: &str,
        op: Operator,
    ) -> Result<()> {
        let condition = Condition::Compare {
            left: aliased_column::<L>(self.dialect, &self.resolver, &self.register, left_property),
            op,
            right: aliased_column::<R>(
                self.dialect,
                &self.resolver,
                &self.register,
                right_property,
            ),
        };
        self.attach(condition)
    }

    fn attach(&mut self, condition: Condition) -> Result<()> {
        let Some(entry) = self.entries.last_mut() else {
            return Err(BuilderError::MissingJoin);
        };
        entry.on = Condition::and(entry.on.take(), Some(condition));
        Ok(())
    }

    pub(crate) fn to_sql(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let mut lines = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(table) = entry.table.to_sql(self.dialect) else {
                continue;
            };
            let mut line = format!("{} {table}", entry.join_type.sql());
            if let Some(on) = entry.on.as_ref().and_then(|c| c.get_condition()) {
                line.push_str(" On ");
                line.push_str(&on);
            }
            lines.push(line);
        }
        if lines.is_empty() {
            return None;
        }
        Some(lines.join("\n"))
    }
}
