//! Group By 子句。

use crate::alias::AliasRef;
use crate::dialect::Dialect;
use crate::metadata::{Entity, EntityResolver, aliased_column};
use crate::string_builder::{IntoStrings, collect_strings};
use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct GroupByClause {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    columns: Vec<String>,
    having: Option<String>,
}

impl GroupByClause {
    pub(crate) fn new(dialect: Dialect, resolver: Rc<EntityResolver>, register: AliasRef) -> Self {
        Self {
            dialect,
            resolver,
            register,
            columns: Vec::new(),
            having: None,
        }
    }

    pub(crate) fn clone_with(&self, resolver: Rc<EntityResolver>, register: AliasRef) -> Self {
        Self {
            dialect: self.dialect,
            resolver,
            register,
            columns: self.columns.clone(),
            having: self.having.clone(),
        }
    }

    /// 分组列（逗号分隔或列表），`having` 为空串时忽略。
    pub(crate) fn group_by(&mut self, columns: impl IntoStrings, having: &str) {
        for group in collect_strings(columns) {
            for column in group.split(',') {
                let column = column.trim();
                if column.is_empty() {
                    continue;
                }
                self.columns.push(self.dialect.quote_column(column));
            }
        }
        self.set_having(having);
    }

    pub(crate) fn group_by_entity<E: Entity>(&mut self, properties: &[&str], having: &str) {
        for property in properties {
            self.columns.push(aliased_column::<E>(
                self.dialect,
                &self.resolver,
                &self.register,
                property,
            ));
        }
        self.set_having(having);
    }

    fn set_having(&mut self, having: &str) {
        let having = having.trim();
        if !having.is_empty() {
            self.having = Some(having.to_string());
        }
    }

    /// 原样追加分组列。
    pub(crate) fn append_sql(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        self.columns.push(sql.to_string());
    }

    pub(crate) fn to_sql(&self) -> Option<String> {
        if self.columns.is_empty() {
            return None;
        }
        let mut out = format!("Group By {}", self.columns.join(","));
        if let Some(having) = &self.having {
            out.push_str(" Having ");
            out.push_str(having);
        }
        Some(out)
    }
}
