//! 错误类型：构建期与渲染期的所有失败都汇聚到 [`BuilderError`]。

use thiserror::Error;

/// SQL 构建错误。
///
/// 所有变体都是同步、确定性的本地失败，不重试；
/// 渲染要么完整成功，要么在返回任何 SQL 之前失败。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// From 子句为空：调用 `to_sql()` 前必须设置 From 目标。
    #[error("builder from clause is empty, call from()/from_entity() first")]
    EmptyFrom,

    /// 列名为空。
    #[error("builder column name is empty")]
    EmptyColumn,

    /// 同一别名被绑定到两个不同的实体。
    #[error("builder alias `{alias}` is already bound to entity `{entity}`")]
    DuplicateAlias { alias: String, entity: String },

    /// 同一实体重复注册且未提供显式别名。
    #[error("builder entity `{0}` is already registered, pass an explicit alias")]
    DuplicateEntity(String),

    /// 合并外部子查询参数时名字冲突。
    #[error(
        "builder parameter `{0}` already exists, create sub queries with new_builder() or use a distinct tag"
    )]
    DuplicateParam(String),

    /// On 条件缺少前置的 Join。
    #[error("builder on() requires a preceding join()")]
    MissingJoin,

    /// 方言未实现请求的能力。
    #[error("builder pagination is not implemented for dialect {0}")]
    UnsupportedDialect(String),

    /// 该方言的分页必须提供排序。
    #[error("builder paged query on dialect {0} requires an order, set order_by() or the pager order")]
    MissingOrderBy(String),

    /// if-not-empty 系列只接受单个比较的谓词。
    #[error("builder only one comparison is allowed in this predicate, got {0}")]
    OnlyOnePredicate(usize),
}

pub type Result<T> = std::result::Result<T, BuilderError>;
