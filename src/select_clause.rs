//! Select 子句。

use crate::alias::AliasRef;
use crate::dialect::{Dialect, unquote};
use crate::metadata::{Entity, EntityResolver, aliased_column};
use crate::string_builder::{IntoStrings, collect_strings};
use std::rc::Rc;

/// 单个投影项：`sql` 为渲染完毕的片段，`output` 为可枚举的输出列名。
#[derive(Debug, Clone)]
struct SelectItem {
    sql: String,
    output: Option<String>,
}

#[derive(Debug)]
pub(crate) struct SelectClause {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    items: Vec<SelectItem>,
}

impl SelectClause {
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

    /// 设置列，逗号分隔或列表形式均可；`a.b As c` 的别名会被保留。
    pub(crate) fn select(&mut self, columns: impl IntoStrings) {
        self.select_with_prefix(columns, "");
    }

    /// 设置列，并为每一列加上表别名前缀。
    pub(crate) fn select_with_prefix(&mut self, columns: impl IntoStrings, table_alias: &str) {
        for group in collect_strings(columns) {
            for column in group.split(',') {
                let column = column.trim();
                if column.is_empty() {
                    continue;
                }
                self.add_column(column, table_alias);
            }
        }
    }

    /// 按实体属性设置列。
    pub(crate) fn select_entity<E: Entity>(&mut self, properties: &[&str]) {
        for property in properties {
            let sql = aliased_column::<E>(self.dialect, &self.resolver, &self.register, property);
            let output = self.resolver.column::<E>(property);
            self.items.push(SelectItem {
                sql,
                output: Some(output),
            });
        }
    }

    /// 原样追加投影片段。
    pub(crate) fn append_sql(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        self.items.push(SelectItem {
            sql: sql.to_string(),
            output: None,
        });
    }

    /// 替换投影为 `Count(*)`。
    pub(crate) fn count(&mut self) {
        self.items = vec![SelectItem {
            sql: "Count(*)".to_string(),
            output: None,
        }];
    }

    fn add_column(&mut self, column: &str, table_alias: &str) {
        let (name, alias) = split_alias(column);
        let qualified = if table_alias.trim().is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", table_alias.trim())
        };
        let mut sql = self.dialect.quote_column(&qualified);
        if let Some(alias) = alias {
            sql.push_str(" As ");
            sql.push_str(&self.dialect.safe_name(alias));
        }
        let output = if name == "*" || name.contains('(') {
            None
        } else {
            let last = name.rsplit('.').next().unwrap_or(name);
            Some(alias.unwrap_or(unquote(last)).to_string())
        };
        self.items.push(SelectItem {
            sql,
            output,
        });
    }

    /// 可枚举的输出列名；存在无法枚举的项（`*`、原样片段）时为 `None`。
    pub(crate) fn output_columns(&self) -> Option<Vec<String>> {
        if self.items.is_empty() {
            return None;
        }
        self.items
            .iter()
            .map(|i| i.output.clone())
            .collect::<Option<Vec<String>>>()
    }

    /// 输出 `Select {cols}`；未设置任何列时投影为 `*`。
    pub(crate) fn to_sql(&self) -> Option<String> {
        if self.items.is_empty() {
            return Some("Select *".to_string());
        }
        let cols: Vec<&str> = self.items.iter().map(|i| i.sql.as_str()).collect();
        Some(format!("Select {}", cols.join(",")))
    }
}

/// 拆出 `name As alias`（As 不区分大小写）。
fn split_alias(column: &str) -> (&str, Option<&str>) {
    let lower = column.to_ascii_lowercase();
    if let Some(pos) = lower.find(" as ") {
        let name = column[..pos].trim();
        let alias = column[pos + 4..].trim();
        if !alias.is_empty() {
            return (name, Some(alias));
        }
    }
    (column.trim(), None)
}
