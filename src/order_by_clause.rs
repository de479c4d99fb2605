//! Order By 子句。

use crate::alias::AliasRef;
use crate::dialect::Dialect;
use crate::metadata::{Entity, EntityResolver, aliased_column};
use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct OrderByClause {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    items: Vec<String>,
}

impl OrderByClause {
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

    /// 排序列表：`"Name Desc, Age"` 形式，列名加引号，方向关键字保留。
    pub(crate) fn order_by(&mut self, order: &str) {
        for item in split_order(self.dialect, order) {
            self.items.push(item);
        }
    }

    pub(crate) fn order_by_entity<E: Entity>(&mut self, property: &str, desc: bool) {
        let mut item = aliased_column::<E>(self.dialect, &self.resolver, &self.register, property);
        if desc {
            item.push_str(" Desc");
        }
        self.items.push(item);
    }

    /// 原样追加排序项。
    pub(crate) fn append_sql(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        self.items.push(sql.to_string());
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// 排序内容（不含 `Order By` 关键字），分页渲染使用。
    pub(crate) fn content(&self) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.join(","))
    }

    /// 空列表不输出，避免产生空的 `Order By`。
    pub(crate) fn to_sql(&self) -> Option<String> {
        self.content().map(|c| format!("Order By {c}"))
    }
}

/// 拆分排序列表并格式化每一项。
pub(crate) fn split_order(dialect: Dialect, order: &str) -> Vec<String> {
    order
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| format_order_item(dialect, item))
        .collect()
}

fn format_order_item(dialect: Dialect, item: &str) -> String {
    if item.contains('(') {
        return item.to_string();
    }
    let mut parts = item.split_whitespace();
    let Some(column) = parts.next() else {
        return String::new();
    };
    let mut out = dialect.quote_column(column);
    for word in parts {
        out.push(' ');
        out.push_str(word);
    }
    out
}
