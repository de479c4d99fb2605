//! SQL 文本拼接工具。

/// 按行拼接 SQL 段：空段跳过，段间以换行分隔。
#[derive(Debug, Default, Clone)]
pub(crate) struct SqlText {
    buf: String,
}

impl SqlText {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, sql: &str) {
        if sql.trim().is_empty() {
            return;
        }
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(sql);
    }

    pub(crate) fn append_opt(&mut self, sql: Option<String>) {
        if let Some(sql) = sql {
            self.append(&sql);
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

/// 不定长字符串列参数：`select("a,b")`、`select(["a", "b"])` 皆可。
pub trait IntoStrings {
    fn extend_into_strings(self, dst: &mut Vec<String>);
}

impl IntoStrings for String {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self);
    }
}

impl IntoStrings for &str {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self.to_string());
    }
}

impl<T, const N: usize> IntoStrings for [T; N]
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        for item in self {
            dst.push(item.into());
        }
    }
}

impl<T> IntoStrings for &[T]
where
    T: Into<String> + Clone,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        for item in self {
            dst.push(item.clone().into());
        }
    }
}

impl<T> IntoStrings for Vec<T>
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        for item in self {
            dst.push(item.into());
        }
    }
}

pub(crate) fn collect_strings<T: IntoStrings>(value: T) -> Vec<String> {
    let mut dst = Vec::new();
    value.extend_into_strings(&mut dst);
    dst
}
