//! 实体元数据：表名、架构与列名的解析。

use crate::alias::AliasRef;
use crate::dialect::Dialect;
use dyn_clone::DynClone;
use std::any::TypeId;
use std::fmt;

/// 可参与 SQL 构建的实体类型。
///
/// `entity_name` 既是元数据查询的 key，也是默认表名与默认别名。
pub trait Entity: 'static {
    fn entity_name() -> &'static str;
}

/// 实体元数据提供器。返回 `None` 表示无覆盖，回退默认规则。
pub trait EntityMetadata: DynClone {
    /// 表名覆盖。
    fn table(&self, entity: &str) -> Option<String>;
    /// 架构覆盖。
    fn schema(&self, entity: &str) -> Option<String>;
    /// 列名覆盖（计算列、重命名列）。
    fn column(&self, entity: &str, property: &str) -> Option<String>;
}

dyn_clone::clone_trait_object!(EntityMetadata);

/// 实体解析器：优先走元数据提供器，查不到时回退原始名称。
#[derive(Clone, Default)]
pub struct EntityResolver {
    metadata: Option<Box<dyn EntityMetadata>>,
}

impl fmt::Debug for EntityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityResolver")
            .field("has_metadata", &self.metadata.is_some())
            .finish()
    }
}

impl EntityResolver {
    pub fn new(metadata: Option<Box<dyn EntityMetadata>>) -> Self {
        Self { metadata }
    }

    /// 表名：元数据优先，回退实体名。
    pub fn table<E: Entity>(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|m| m.table(E::entity_name()))
            .unwrap_or_else(|| E::entity_name().to_string())
    }

    /// 架构：仅由元数据给出。
    pub fn schema<E: Entity>(&self) -> Option<String> {
        self.metadata.as_ref().and_then(|m| m.schema(E::entity_name()))
    }

    /// 列名：元数据优先，回退属性名。
    pub fn column<E: Entity>(&self, property: &str) -> String {
        self.metadata
            .as_ref()
            .and_then(|m| m.column(E::entity_name(), property))
            .unwrap_or_else(|| property.to_string())
    }

    /// 别名：显式参数优先，否则取实体名（同一次构建内保持确定）。
    pub fn alias<E: Entity>(&self, explicit: &str) -> String {
        let explicit = explicit.trim();
        if explicit.is_empty() {
            E::entity_name().to_string()
        } else {
            explicit.to_string()
        }
    }
}

/// 解析带别名前缀的列：别名来自注册器，列名经元数据解析后按方言加引号。
pub(crate) fn aliased_column<E: Entity>(
    dialect: Dialect,
    resolver: &EntityResolver,
    register: &AliasRef,
    property: &str,
) -> String {
    let column = resolver.column::<E>(property);
    match register.borrow().alias_of(TypeId::of::<E>()) {
        Some(alias) => dialect.quote_column(&format!("{alias}.{column}")),
        None => dialect.quote_column(&column),
    }
}
