//! SQL 方言：标识符引号、参数前缀与分页语法。

use crate::error::{BuilderError, Result};
use std::fmt;

/// 方言枚举。无状态、`Copy`，每个 builder 构造时选定一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    SqlServer,
    MySql,
    PgSql,
    Oracle,
    Sqlite,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SqlServer => "SqlServer",
            Self::MySql => "MySql",
            Self::PgSql => "PgSql",
            Self::Oracle => "Oracle",
            Self::Sqlite => "Sqlite",
        };
        f.write_str(s)
    }
}

impl Dialect {
    /// 参数前缀。
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Oracle => ":",
            _ => "@",
        }
    }

    /// 为单个标识符加引号。
    ///
    /// `*` 与含括号的片段（函数调用等）原样返回；已带引号的名称先去引号再加。
    pub fn safe_name(self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() || name == "*" || name.contains('(') {
            return name.to_string();
        }
        let name = unquote(name);
        match self {
            Self::MySql => format!("`{name}`"),
            Self::SqlServer => format!("[{name}]"),
            Self::PgSql | Self::Oracle | Self::Sqlite => format!("\"{name}\""),
        }
    }

    /// 按 `.` 分段加引号：`a.b` 渲染为 `[a].[b]`。
    pub fn quote_column(self, column: &str) -> String {
        let column = column.trim();
        if column.contains('(') {
            return column.to_string();
        }
        let parts: Vec<String> = column
            .split('.')
            .filter(|p| !p.trim().is_empty())
            .map(|p| self.safe_name(p))
            .collect();
        parts.join(".")
    }

    /// 生成分页 SQL。窗口参数值在设置分页时即已绑定，这里只负责语法。
    pub(crate) fn page_sql(self, ctx: &PageContext<'_>) -> Result<String> {
        match self {
            Self::MySql => {
                let mut sql = ctx.body.to_string();
                if let Some(order) = ctx.order {
                    sql.push_str(&format!("\nOrder By {order}"));
                }
                sql.push_str(&format!("\nLimit {}, {}", ctx.first, ctx.second));
                Ok(sql)
            }
            Self::PgSql => {
                let mut sql = ctx.body.to_string();
                if let Some(order) = ctx.order {
                    sql.push_str(&format!("\nOrder By {order}"));
                }
                sql.push_str(&format!("\nLimit {} Offset {}", ctx.second, ctx.first));
                Ok(sql)
            }
            Self::SqlServer => {
                let order = ctx
                    .order
                    .ok_or_else(|| BuilderError::MissingOrderBy(self.to_string()))?;
                Ok(format!(
                    "{}\nOrder By {order}\nOffset {} Rows Fetch Next {} Rows Only",
                    ctx.body, ctx.first, ctx.second
                ))
            }
            Self::Oracle => {
                let order = ctx
                    .order
                    .ok_or_else(|| BuilderError::MissingOrderBy(self.to_string()))?;
                // Row_Number 包装：内层补序号列，外层按行号窗口过滤并还原投影。
                let outer = match &ctx.columns {
                    Some(cols) if !cols.is_empty() => {
                        let quoted: Vec<String> =
                            cols.iter().map(|c| self.safe_name(c)).collect();
                        quoted.join(",")
                    }
                    _ => "*".to_string(),
                };
                let ordinal = self.safe_name("RowNumber");
                let w = self.safe_name("w");
                Ok(format!(
                    "Select {outer} From (Select {t}.*,Row_Number() Over (Order By {order}) As {ordinal} From ({body}) {t}) {w} Where {w}.{ordinal}>{first} And {w}.{ordinal}<={second}",
                    t = self.safe_name("t"),
                    body = ctx.body,
                    first = ctx.first,
                    second = ctx.second,
                ))
            }
            Self::Sqlite => Err(BuilderError::UnsupportedDialect(self.to_string())),
        }
    }
}

/// 分页渲染上下文。
///
/// `first`/`second` 是已分配好的窗口参数占位符：对 Limit/Offset 族为
/// (偏移, 条数)，对 Row_Number 族为 (起始行号, 结束行号)。
pub(crate) struct PageContext<'a> {
    /// 不含 Order By 的语句主体。
    pub body: &'a str,
    /// 有效排序内容（`Order By` 之后的部分）。
    pub order: Option<&'a str>,
    pub first: &'a str,
    pub second: &'a str,
    /// 可枚举的输出列；无法枚举（原样片段、`*`）时为 `None`。
    pub columns: Option<Vec<String>>,
}

/// 去除标识符已有的引号（`[x]`、`` `x` ``、`"x"`）。
pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let stripped = match (bytes[0], bytes[bytes.len() - 1]) {
            (b'[', b']') | (b'`', b'`') | (b'"', b'"') => Some(&s[1..s.len() - 1]),
            _ => None,
        };
        if let Some(inner) = stripped {
            return inner;
        }
    }
    s
}
