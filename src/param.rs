//! 参数管理器：分配唯一参数名并保存名字 → 值的绑定。
//!
//! SQL 文本中永远只出现参数名；值只在 `to_debug_sql` 的字面量替换中出现。

use crate::condition::Operator;
use crate::dialect::Dialect;
use crate::error::{BuilderError, Result};
use crate::value::SqlValue;
use std::cell::RefCell;
use std::rc::Rc;

/// builder 家族共享的参数管理器引用。
pub type ParamsRef = Rc<RefCell<ParameterManager>>;

/// 参数管理器。
///
/// 计数器按实例（而非全局）单调递增；`new_builder()` 产生的子查询 builder
/// 与父 builder 共享同一个实例，因此嵌套场景下名字不会冲突，
/// 声明顺序也是全局一致的。独立家族可用 `with_tag` 区分命名空间。
#[derive(Debug, Clone)]
pub struct ParameterManager {
    dialect: Dialect,
    tag: usize,
    index: usize,
    params: Vec<(String, SqlValue)>,
}

impl ParameterManager {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_tag(dialect, 0)
    }

    /// 带命名空间标签的管理器：名字形如 `@_p_{tag}_{n}`。
    pub fn with_tag(dialect: Dialect, tag: usize) -> Self {
        Self {
            dialect,
            tag,
            index: 0,
            params: Vec::new(),
        }
    }

    pub(crate) fn into_ref(self) -> ParamsRef {
        Rc::new(RefCell::new(self))
    }

    fn next_name(&mut self) -> String {
        let name = if self.tag == 0 {
            format!("{}_p_{}", self.dialect.prefix(), self.index)
        } else {
            format!("{}_p_{}_{}", self.dialect.prefix(), self.tag, self.index)
        };
        self.index += 1;
        name
    }

    /// 追加一个参数并返回生成的参数名；按运算符对值做 Like 装饰。
    pub fn add(&mut self, value: SqlValue, op: Operator) -> String {
        let value = decorate(value, op);
        let name = self.next_name();
        self.params.push((name.clone(), value));
        name
    }

    /// 以既有名字合并参数（嵌入外部家族的子查询时使用）。
    pub(crate) fn merge_named(&mut self, name: &str, value: SqlValue) -> Result<()> {
        if self.params.iter().any(|(n, _)| n == name) {
            return Err(BuilderError::DuplicateParam(name.to_string()));
        }
        self.params.push((name.to_string(), value));
        Ok(())
    }

    /// 声明顺序的参数列表。
    pub fn params(&self) -> &[(String, SqlValue)] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// 把 SQL 中的参数名替换为调试字面量。
    ///
    /// 长名在前替换，`@_p_1` 不会吞掉 `@_p_10` 的前缀。
    pub(crate) fn fill_literals(&self, sql: &str) -> String {
        let mut names: Vec<&(String, SqlValue)> = self.params.iter().collect();
        names.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        let mut out = sql.to_string();
        for (name, value) in names {
            out = out.replace(name.as_str(), &value.literal());
        }
        out
    }
}

/// Like 族运算符的值装饰。
fn decorate(value: SqlValue, op: Operator) -> SqlValue {
    match op {
        Operator::Contains => SqlValue::from(format!("%{}%", value.plain())),
        Operator::Starts => SqlValue::from(format!("{}%", value.plain())),
        Operator::Ends => SqlValue::from(format!("%{}", value.plain())),
        _ => value,
    }
}
