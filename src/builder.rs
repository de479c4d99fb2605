//! SqlBuilder 门面：聚合各子句，按固定顺序渲染，支持分页与调试 SQL。
//!
//! 子句可以以任意顺序配置，渲染顺序恒为
//! Select、From、Join、Where、Group By、Order By，最后由分页包装。
//! 渲染是幂等的，可重复调用；单个实例不支持跨线程并发修改，
//! 并行构建请使用 [`SqlBuilder::new_builder`] 或 `clone()` 获得独立实例。

use crate::alias::{AliasRef, EntityAliasRegister};
use crate::condition::{Boundary, Condition, Operator};
use crate::dialect::{Dialect, PageContext};
use crate::error::{BuilderError, Result};
use crate::from_clause::FromClause;
use crate::group_by_clause::GroupByClause;
use crate::join_clause::{JoinClause, JoinType};
use crate::metadata::{Entity, EntityMetadata, EntityResolver, aliased_column};
use crate::order_by_clause::{OrderByClause, split_order};
use crate::pager::Pager;
use crate::param::{ParameterManager, ParamsRef};
use crate::predicate::Predicate;
use crate::select_clause::SelectClause;
use crate::string_builder::{IntoStrings, SqlText};
use crate::value::SqlValue;
use crate::where_clause::WhereClause;
use std::rc::Rc;
use time::OffsetDateTime;
use tracing::debug;

/// 已绑定窗口参数的分页状态。
#[derive(Debug, Clone)]
struct PagerState {
    pager: Pager,
    first: String,
    second: String,
}

/// SQL 生成器门面。
#[derive(Debug)]
pub struct SqlBuilder {
    dialect: Dialect,
    resolver: Rc<EntityResolver>,
    register: AliasRef,
    params: ParamsRef,
    select: SelectClause,
    from: FromClause,
    join: JoinClause,
    where_clause: WhereClause,
    group_by: GroupByClause,
    order_by: OrderByClause,
    pager: Option<PagerState>,
    /// 链式调用中发现的首个契约违反，渲染时返回。
    error: Option<BuilderError>,
}

impl SqlBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_tag(dialect, None, 0)
    }

    /// 注入实体元数据提供器。
    pub fn with_metadata(dialect: Dialect, metadata: Box<dyn EntityMetadata>) -> Self {
        Self::with_tag(dialect, Some(metadata), 0)
    }

    /// 独立 builder 家族：`tag` 进入参数名（`@_p_{tag}_{n}`），
    /// 使不同家族的 SQL 可以文本嵌套而不冲突。
    pub fn with_tag(
        dialect: Dialect,
        metadata: Option<Box<dyn EntityMetadata>>,
        tag: usize,
    ) -> Self {
        let resolver = Rc::new(EntityResolver::new(metadata));
        let params = ParameterManager::with_tag(dialect, tag).into_ref();
        Self::assemble(dialect, resolver, params)
    }

    fn assemble(dialect: Dialect, resolver: Rc<EntityResolver>, params: ParamsRef) -> Self {
        let register = EntityAliasRegister::new().into_ref();
        Self {
            dialect,
            resolver: resolver.clone(),
            register: register.clone(),
            params: params.clone(),
            select: SelectClause::new(dialect, resolver.clone(), register.clone()),
            from: FromClause::new(dialect, resolver.clone(), register.clone()),
            join: JoinClause::new(dialect, resolver.clone(), register.clone()),
            where_clause: WhereClause::new(dialect, resolver.clone(), register.clone(), params),
            group_by: GroupByClause::new(dialect, resolver.clone(), register.clone()),
            order_by: OrderByClause::new(dialect, resolver, register),
            pager: None,
            error: None,
        }
    }

    /// 创建子查询 builder：共享方言、元数据与参数家族，子句与别名全新。
    pub fn new_builder(&self) -> SqlBuilder {
        Self::assemble(self.dialect, self.resolver.clone(), self.params.clone())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 解析实体属性为带别名前缀的列（先 From/Join 注册别名再调用）。
    pub fn column<E: Entity>(&self, property: &str) -> String {
        aliased_column::<E>(self.dialect, &self.resolver, &self.register, property)
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    // ------------------------------------------------------------------
    // Select
    // ------------------------------------------------------------------

    /// 设置列：`select("a,b")` 或 `select(["a", "b"])`。
    pub fn select(&mut self, columns: impl IntoStrings) -> &mut Self {
        self.select.select(columns);
        self
    }

    /// 设置列并加表别名前缀。
    pub fn select_with_prefix(
        &mut self,
        columns: impl IntoStrings,
        table_alias: &str,
    ) -> &mut Self {
        self.select.select_with_prefix(columns, table_alias);
        self
    }

    /// 按实体属性设置列。
    pub fn select_entity<E: Entity>(&mut self, properties: &[&str]) -> &mut Self {
        self.select.select_entity::<E>(properties);
        self
    }

    /// 原样追加投影片段。
    pub fn append_select(&mut self, sql: &str) -> &mut Self {
        self.select.append_sql(sql);
        self
    }

    /// 投影替换为 `Count(*)`。
    pub fn count(&mut self) -> &mut Self {
        self.select.count();
        self
    }

    // ------------------------------------------------------------------
    // From
    // ------------------------------------------------------------------

    /// 设置表名；`alias` 为空串时不产生别名。
    pub fn from(&mut self, table: &str, alias: &str) -> &mut Self {
        self.from.from(table, alias);
        self
    }

    /// 设置实体表并注册别名；显式 `schema` 覆盖元数据架构。
    pub fn from_entity<E: Entity>(&mut self, alias: &str, schema: &str) -> &mut Self {
        let result = self.from.from_entity::<E>(alias, schema);
        self.record(result);
        self
    }

    /// 以子查询作为 From 目标：`({inner}) As [alias]`。
    ///
    /// 子查询在此刻渲染并快照；外部家族的参数会被合并，名字冲突
    /// 记为配置错误。
    pub fn from_sub(&mut self, sub: &SqlBuilder, alias: &str) -> &mut Self {
        match sub.to_sql() {
            Err(e) => self.record(Err(e)),
            Ok(sql) => {
                if !Rc::ptr_eq(&self.params, &sub.params) {
                    let foreign = sub.params.borrow().params().to_vec();
                    for (name, value) in foreign {
                        let merged = self.params.borrow_mut().merge_named(&name, value);
                        self.record(merged);
                    }
                }
                self.from.from_sub(sql, alias);
            }
        }
        self
    }

    /// 闭包形式的子查询：内部以 `new_builder()` 创建，参数天然同族。
    pub fn from_sub_with(&mut self, f: impl FnOnce(&mut SqlBuilder), alias: &str) -> &mut Self {
        let mut sub = self.new_builder();
        f(&mut sub);
        self.from_sub(&sub, alias)
    }

    /// 原样追加 From 片段。
    pub fn append_from(&mut self, sql: &str) -> &mut Self {
        self.from.append_sql(sql);
        self
    }

    // ------------------------------------------------------------------
    // Join
    // ------------------------------------------------------------------

    pub fn join(&mut self, table: &str, alias: &str) -> &mut Self {
        self.join.join(JoinType::Inner, table, alias);
        self
    }

    pub fn join_entity<E: Entity>(&mut self, alias: &str, schema: &str) -> &mut Self {
        let result = self.join.join_entity::<E>(JoinType::Inner, alias, schema);
        self.record(result);
        self
    }

    pub fn left_join(&mut self, table: &str, alias: &str) -> &mut Self {
        self.join.join(JoinType::Left, table, alias);
        self
    }

    pub fn left_join_entity<E: Entity>(&mut self, alias: &str, schema: &str) -> &mut Self {
        let result = self.join.join_entity::<E>(JoinType::Left, alias, schema);
        self.record(result);
        self
    }

    pub fn right_join(&mut self, table: &str, alias: &str) -> &mut Self {
        self.join.join(JoinType::Right, table, alias);
        self
    }

    pub fn right_join_entity<E: Entity>(&mut self, alias: &str, schema: &str) -> &mut Self {
        let result = self.join.join_entity::<E>(JoinType::Right, alias, schema);
        self.record(result);
        self
    }

    pub fn append_join(&mut self, sql: &str) -> &mut Self {
        self.join.append_sql(JoinType::Inner, sql);
        self
    }

    pub fn append_left_join(&mut self, sql: &str) -> &mut Self {
        self.join.append_sql(JoinType::Left, sql);
        self
    }

    pub fn append_right_join(&mut self, sql: &str) -> &mut Self {
        self.join.append_sql(JoinType::Right, sql);
        self
    }

    /// 为最近一个连接设置 On 条件（列对列，默认 Equal，多次调用 And 连接）。
    pub fn on(&mut self, left: &str, right: &str) -> &mut Self {
        self.on_op(left, right, Operator::Equal)
    }

    pub fn on_op(&mut self, left: &str, right: &str, op: Operator) -> &mut Self {
        let result = self.join.on(left, right, op);
        self.record(result);
        self
    }

    /// 双实体 On 条件：两侧按各自实体解析为带别名的列。
    pub fn on_entity<L: Entity, R: Entity>(
        &mut self,
        left_property: &str,
        right_property: &str,
    ) -> &mut Self {
        let result = self
            .join
            .on_entity::<L, R>(left_property, right_property, Operator::Equal);
        self.record(result);
        self
    }

    // ------------------------------------------------------------------
    // Where
    // ------------------------------------------------------------------

    /// And 连接一个条件树节点。
    pub fn and_(&mut self, condition: Condition) -> &mut Self {
        self.where_clause.and(condition);
        self
    }

    /// Or 连接一个条件树节点。
    pub fn or_(&mut self, condition: Condition) -> &mut Self {
        self.where_clause.or(condition);
        self
    }

    /// 相等查询条件（`where_op` 的 Equal 捷径）。
    pub fn where_(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::Equal)
    }

    pub fn where_op(
        &mut self,
        column: &str,
        value: impl Into<SqlValue>,
        op: Operator,
    ) -> &mut Self {
        let result = self.where_clause.where_(column, value.into(), op);
        self.record(result);
        self
    }

    /// 谓词条件（积之和展开）。
    pub fn where_pred<E: Entity>(&mut self, predicate: &Predicate) -> &mut Self {
        self.where_clause.where_pred::<E>(predicate);
        self
    }

    /// `condition` 为真时才添加。
    pub fn where_if(
        &mut self,
        column: &str,
        value: impl Into<SqlValue>,
        condition: bool,
    ) -> &mut Self {
        if condition {
            return self.where_(column, value);
        }
        self
    }

    pub fn where_if_pred<E: Entity>(&mut self, predicate: &Predicate, condition: bool) -> &mut Self {
        if condition {
            return self.where_pred::<E>(predicate);
        }
        self
    }

    /// 值为空（Null、空白串、零数值、nil uuid）时忽略该条件。
    pub fn where_if_not_empty(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_if_not_empty_op(column, value, Operator::Equal)
    }

    pub fn where_if_not_empty_op(
        &mut self,
        column: &str,
        value: impl Into<SqlValue>,
        op: Operator,
    ) -> &mut Self {
        let result = self
            .where_clause
            .where_if_not_empty(column, value.into(), op);
        self.record(result);
        self
    }

    /// 单条件谓词的 if-not-empty：谓词含多个比较时记为契约错误。
    pub fn where_if_not_empty_pred<E: Entity>(&mut self, predicate: &Predicate) -> &mut Self {
        let result = self.where_clause.where_if_not_empty_pred::<E>(predicate);
        self.record(result);
        self
    }

    /// 原样追加条件片段。
    pub fn append_where(&mut self, sql: &str) -> &mut Self {
        self.where_clause.append_sql(sql);
        self
    }

    pub fn equal(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_(column, value)
    }

    pub fn not_equal(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::NotEqual)
    }

    pub fn greater(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::Greater)
    }

    pub fn greater_equal(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::GreaterEqual)
    }

    pub fn less(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::Less)
    }

    pub fn less_equal(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::LessEqual)
    }

    /// 模糊匹配：`Like '%v%'`。
    pub fn contains(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::Contains)
    }

    /// 头匹配：`Like 'v%'`。
    pub fn starts(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::Starts)
    }

    /// 尾匹配：`Like '%v'`。
    pub fn ends(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_op(column, value, Operator::Ends)
    }

    /// In 条件：每个元素绑定一个参数。
    pub fn in_(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = impl Into<SqlValue>>,
    ) -> &mut Self {
        let values: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
        let result = self.where_clause.in_(column, values);
        self.record(result);
        self
    }

    /// 范围条件；缺失端省略，两端都缺失时不产生条件。
    pub fn between<T: Into<SqlValue>>(
        &mut self,
        column: &str,
        min: Option<T>,
        max: Option<T>,
        boundary: Boundary,
    ) -> &mut Self {
        let result = self.where_clause.between(
            column,
            min.map(Into::into),
            max.map(Into::into),
            boundary,
        );
        self.record(result);
        self
    }

    /// 日期范围条件；`include_time` 为假时归一到日边界。
    pub fn between_date(
        &mut self,
        column: &str,
        min: Option<OffsetDateTime>,
        max: Option<OffsetDateTime>,
        include_time: bool,
        boundary: Option<Boundary>,
    ) -> &mut Self {
        let result = self
            .where_clause
            .between_date(column, min, max, include_time, boundary);
        self.record(result);
        self
    }

    pub fn is_null(&mut self, column: &str) -> &mut Self {
        let result = self.where_clause.is_null(column);
        self.record(result);
        self
    }

    pub fn is_not_null(&mut self, column: &str) -> &mut Self {
        let result = self.where_clause.is_not_null(column);
        self.record(result);
        self
    }

    /// `(c Is Null Or c='')`
    pub fn is_empty(&mut self, column: &str) -> &mut Self {
        let result = self.where_clause.is_empty(column);
        self.record(result);
        self
    }

    /// `(c Is Not Null And c<>'')`
    pub fn is_not_empty(&mut self, column: &str) -> &mut Self {
        let result = self.where_clause.is_not_empty(column);
        self.record(result);
        self
    }

    // ------------------------------------------------------------------
    // Group By / Order By / Pager
    // ------------------------------------------------------------------

    /// 分组；`having` 为空串时忽略。
    pub fn group_by(&mut self, columns: impl IntoStrings, having: &str) -> &mut Self {
        self.group_by.group_by(columns, having);
        self
    }

    pub fn group_by_entity<E: Entity>(&mut self, properties: &[&str], having: &str) -> &mut Self {
        self.group_by.group_by_entity::<E>(properties, having);
        self
    }

    pub fn append_group_by(&mut self, sql: &str) -> &mut Self {
        self.group_by.append_sql(sql);
        self
    }

    /// 排序列表：`"Name Desc, Age"`。
    pub fn order_by(&mut self, order: &str) -> &mut Self {
        self.order_by.order_by(order);
        self
    }

    pub fn order_by_entity<E: Entity>(&mut self, property: &str, desc: bool) -> &mut Self {
        self.order_by.order_by_entity::<E>(property, desc);
        self
    }

    pub fn append_order_by(&mut self, sql: &str) -> &mut Self {
        self.order_by.append_sql(sql);
        self
    }

    /// 设置分页。窗口参数值此刻即绑定，保证渲染幂等。
    pub fn pager(&mut self, pager: Pager) -> &mut Self {
        let (first, second) = match self.dialect {
            Dialect::Oracle => (pager.start_number(), pager.end_number()),
            _ => (pager.skip(), pager.take()),
        };
        let first = self
            .params
            .borrow_mut()
            .add(SqlValue::U64(first), Operator::Equal);
        let second = self
            .params
            .borrow_mut()
            .add(SqlValue::U64(second), Operator::Equal);
        self.pager = Some(PagerState {
            pager,
            first,
            second,
        });
        self
    }

    // ------------------------------------------------------------------
    // 输出
    // ------------------------------------------------------------------

    /// 顶层查询条件文本（不含 `Where` 关键字）。
    pub fn get_condition(&self) -> Option<String> {
        self.where_clause.get_condition()
    }

    /// 声明顺序的参数列表，与 `to_sql()` 的产物配对交给执行方。
    pub fn get_params(&self) -> Vec<(String, SqlValue)> {
        self.params.borrow().params().to_vec()
    }

    pub fn get_param(&self, name: &str) -> Option<SqlValue> {
        self.params.borrow().get(name).cloned()
    }

    /// 校验：From 目标必须已设置。
    pub fn validate(&self) -> Result<()> {
        self.from.validate()
    }

    /// 生成参数化 SQL。幂等；失败时不返回任何 SQL。
    pub fn to_sql(&self) -> Result<String> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        self.validate()?;
        let sql = match &self.pager {
            None => self.no_pager_sql(),
            Some(state) => self.pager_sql(state)?,
        };
        debug!(
            target: "nova_sql",
            params = self.params.borrow().len(),
            "to_sql: {sql}"
        );
        Ok(sql)
    }

    /// 生成调试 SQL：参数替换为字面量。仅用于日志，绝不用于执行。
    pub fn to_debug_sql(&self) -> Result<String> {
        let sql = self.to_sql()?;
        let filled = self.params.borrow().fill_literals(&sql);
        debug!(target: "nova_sql", "to_debug_sql: {filled}");
        Ok(filled)
    }

    /// 同条件的 Count 查询：克隆后改投影为 `Count(*)`，去掉排序与分页。
    pub fn to_count_sql(&self) -> Result<String> {
        let mut counter = self.clone();
        counter.pager = None;
        counter.order_by.clear();
        counter.select.count();
        counter.to_sql()
    }

    fn no_pager_sql(&self) -> String {
        let mut text = SqlText::new();
        text.append_opt(self.select.to_sql());
        text.append_opt(self.from.to_sql());
        text.append_opt(self.join.to_sql());
        text.append_opt(self.where_clause.to_sql());
        text.append_opt(self.group_by.to_sql());
        text.append_opt(self.order_by.to_sql());
        text.into_string()
    }

    fn pager_sql(&self, state: &PagerState) -> Result<String> {
        // 主体不含 Order By，排序位置由方言的分页语法决定。
        let mut text = SqlText::new();
        text.append_opt(self.select.to_sql());
        text.append_opt(self.from.to_sql());
        text.append_opt(self.join.to_sql());
        text.append_opt(self.where_clause.to_sql());
        text.append_opt(self.group_by.to_sql());
        let body = text.into_string();
        let order = self.order_by.content().or_else(|| {
            state
                .pager
                .order()
                .map(|o| split_order(self.dialect, o).join(","))
        });
        let ctx = PageContext {
            body: &body,
            order: order.as_deref(),
            first: &state.first,
            second: &state.second,
            columns: self.select.output_columns(),
        };
        self.dialect.page_sql(&ctx)
    }
}

impl Clone for SqlBuilder {
    /// 深拷贝：参数、别名与全部子句状态互不共享，
    /// 方言与元数据提供器共享（二者无状态）。
    fn clone(&self) -> Self {
        let params = self.params.borrow().clone().into_ref();
        let register = self.register.borrow().clone().into_ref();
        let resolver = self.resolver.clone();
        Self {
            dialect: self.dialect,
            resolver: resolver.clone(),
            register: register.clone(),
            params: params.clone(),
            select: self.select.clone_with(resolver.clone(), register.clone()),
            from: self.from.clone_with(resolver.clone(), register.clone()),
            join: self.join.clone_with(resolver.clone(), register.clone()),
            where_clause: self
                .where_clause
                .clone_with(resolver.clone(), register.clone(), params.clone()),
            group_by: self.group_by.clone_with(resolver.clone(), register.clone()),
            order_by: self.order_by.clone_with(resolver, register),
            pager: self.pager.clone(),
            error: self.error.clone(),
        }
    }
}
