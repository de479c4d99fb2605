//! SqlItem：表、子查询或原样片段。

use crate::dialect::Dialect;

/// From/Join 使用的表项。
///
/// `raw` 为真时 `name` 已是成形的 SQL，渲染时不再加引号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlItem {
    pub name: String,
    pub schema: Option<String>,
    pub alias: Option<String>,
    pub raw: bool,
}

impl SqlItem {
    pub fn new(name: &str, schema: &str, alias: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            schema: non_empty(schema),
            alias: non_empty(alias),
            raw: false,
        }
    }

    pub fn raw(sql: &str) -> Self {
        Self {
            name: sql.to_string(),
            schema: None,
            alias: None,
            raw: true,
        }
    }

    /// 已渲染好的片段（子查询）加别名。
    pub(crate) fn rendered(sql: String, alias: &str) -> Self {
        Self {
            name: sql,
            schema: None,
            alias: non_empty(alias),
            raw: true,
        }
    }

    /// 渲染：`[schema].[name] As [alias]`；raw 项原样输出（别名仍会追加）。
    pub fn to_sql(&self, dialect: Dialect) -> Option<String> {
        if self.name.trim().is_empty() {
            return None;
        }
        let mut out = if self.raw {
            self.name.clone()
        } else {
            match &self.schema {
                Some(schema) => format!(
                    "{}.{}",
                    dialect.safe_name(schema),
                    dialect.safe_name(&self.name)
                ),
                None => dialect.safe_name(&self.name),
            }
        };
        if let Some(alias) = &self.alias {
            out.push_str(" As ");
            out.push_str(&dialect.safe_name(alias));
        }
        Some(out)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::SqlItem;
    use crate::dialect::Dialect;

    #[test]
    fn plain_table() {
        let item = SqlItem::new("a", "", "b");
        assert_eq!(
            item.to_sql(Dialect::SqlServer),
            Some("[a] As [b]".to_string())
        );
    }

    #[test]
    fn schema_qualified() {
        let item = SqlItem::new("Sample", "b", "a");
        assert_eq!(
            item.to_sql(Dialect::SqlServer),
            Some("[b].[Sample] As [a]".to_string())
        );
    }

    #[test]
    fn raw_is_not_requoted() {
        let item = SqlItem::raw("(Select 1) t");
        assert_eq!(item.to_sql(Dialect::MySql), Some("(Select 1) t".to_string()));
    }

    #[test]
    fn blank_name_renders_nothing() {
        let item = SqlItem::new(" ", "", "");
        assert_eq!(item.to_sql(Dialect::MySql), None);
    }
}
