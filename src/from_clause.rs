//! From 子句：表、实体、子查询与原样片段，多表时逗号连接。

use crate::alias::AliasRef;
use crate::dialect::Dialect;
use crate::error::{BuilderError, Result};
use crate::metadata::{Entity, EntityResolver};
use crate::sql_item::SqlItem;
use std::any::TypeId;
use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct FromClause {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    items: Vec<SqlItem>,
}

impl FromClause {
    pub(crate) fn new(dialect: Dialect, resolver: Rc<EntityResolver>, register: AliasRef) -> Self {
        Self {
            dialect,
            resolver,
            register,
            items: Vec::new(),
        }
    }

    pub(crate) fn clone_with(&self, resolver: Rc<EntityResolver>, register: AliasRef) -> Self {
        Self {
            dialect: self.dialect,
            resolver,
            register,
            items: self.items.clone(),
        }
    }

    /// 添加表。
    pub(crate) fn from(&mut self, table: &str, alias: &str) {
        self.items.push(SqlItem::new(table, "", alias));
    }

    /// 添加实体表，并注册实体别名供后续列解析使用。
    ///
    /// 显式 `schema` 参数覆盖元数据架构。
    pub(crate) fn from_entity<E: Entity>(&mut self, alias: &str, schema: &str) -> Result<()> {
        let table = self.resolver.table::<E>();
        let schema = if schema.trim().is_empty() {
            self.resolver.schema::<E>().unwrap_or_default()
        } else {
            schema.to_string()
        };
        self.items.push(SqlItem::new(&table, &schema, alias));
        let explicit = !alias.trim().is_empty();
        self.register.borrow_mut().register(
            TypeId::of::<E>(),
            E::entity_name(),
            self.resolver.alias::<E>(alias),
            explicit,
        )
    }

    /// 添加已渲染的子查询：`({inner}) As [alias]`。
    pub(crate) fn from_sub(&mut self, inner_sql: String, alias: &str) {
        self.items
            .push(SqlItem::rendered(format!("({inner_sql})"), alias));
    }

    /// 原样追加：尾项为 raw 时拼接，否则作为新的 raw 项。
    pub(crate) fn append_sql(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        if let Some(last) = self.items.last_mut() {
            if last.raw {
                last.name.push_str(sql);
                return;
            }
        }
        self.items.push(SqlItem::raw(sql));
    }

    /// 校验 From 目标已设置。
    pub(crate) fn validate(&self) -> Result<()> {
        if self.items.iter().all(|i| i.name.trim().is_empty()) {
            return Err(BuilderError::EmptyFrom);
        }
        Ok(())
    }

    pub(crate) fn to_sql(&self) -> Option<String> {
        let tables: Vec<String> = self
            .items
            .iter()
            .filter_map(|i| i.to_sql(self.dialect))
            .collect();
        if tables.is_empty() {
            return None;
        }
        Some(format!("From {}", tables.join(", ")))
    }
}
