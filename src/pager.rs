//! 分页参数。

/// 分页描述：页号（从 1 开始）、页大小、总行数与排序。
///
/// 总行数由执行方在首次查询后回填（为 0 时执行方应先发 Count 查询，
/// 见 [`crate::builder::SqlBuilder::to_count_sql`]）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: u64,
    page_size: u64,
    pub total_count: u64,
    order: Option<String>,
}

impl Pager {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: if page_size == 0 { 20 } else { page_size },
            total_count: 0,
            order: None,
        }
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        let order = order.into();
        self.order = if order.trim().is_empty() {
            None
        } else {
            Some(order)
        };
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn order(&self) -> Option<&str> {
        self.order.as_deref()
    }

    /// 跳过的行数。
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    /// 本页条数。
    pub fn take(&self) -> u64 {
        self.page_size
    }

    /// 行号窗口起点（不含），Row_Number 风格方言使用。
    pub fn start_number(&self) -> u64 {
        self.skip()
    }

    /// 行号窗口终点（含）。
    pub fn end_number(&self) -> u64 {
        self.skip() + self.take()
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(1, 20)
    }
}
