//! Fluent query-state accumulator.
//!
//! A [`QueryBuilder`] collects select/from/join/where/group/having/order/limit
//! fragments plus their bound parameters, and compiles them into a [`Request`]
//! for the execution layer.
//!
//! ```ignore
//! use arqb::{QueryBuilder, op};
//!
//! let mut qb = QueryBuilder::new();
//! qb.select(["id", "name"])
//!     .from("users")
//!     .and_where(op::eq("status", "active"))
//!     .order_by_desc("created_at")
//!     .limit(10);
//!
//! let req = qb.to_request();
//! assert_eq!(req.conditions.unwrap().sql, "status = ?");
//! ```

mod request;

pub use request::{Conditions, Request, RequestKey};

use crate::error::{QbError, QbResult};
use crate::naming::{Inflector, Model, TableNameResolver};
use crate::op::Condition;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// JOIN flavour. `Plain` renders a bare `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Plain,
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Plain => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state group that [`QueryBuilder::reset`] can clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPart {
    Select,
    From,
    Joins,
    /// Both the AND-where and OR-where groups.
    Where,
    Group,
    Having,
    Order,
    Limit,
    Offset,
    Include,
}

impl FromStr for ResetPart {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(ResetPart::Select),
            "from" => Ok(ResetPart::From),
            "joins" => Ok(ResetPart::Joins),
            "where" => Ok(ResetPart::Where),
            "group" => Ok(ResetPart::Group),
            "having" => Ok(ResetPart::Having),
            "order" => Ok(ResetPart::Order),
            "limit" => Ok(ResetPart::Limit),
            "offset" => Ok(ResetPart::Offset),
            "include" => Ok(ResetPart::Include),
            other => Err(QbError::invalid_argument(format!(
                "unsupported reset option \"{other}\""
            ))),
        }
    }
}

impl TryFrom<&str> for ResetPart {
    type Error = QbError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Mutable query state, compiled on demand with [`QueryBuilder::to_request`].
///
/// Every fragment list is paired with the parameters its placeholders bind, so
/// compilation only has to concatenate them in text order.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    model: Option<String>,
    select: Vec<String>,
    from: Option<String>,
    joins: Vec<String>,
    join_params: Vec<Value>,
    where_: Vec<String>,
    where_params: Vec<Value>,
    or_where: Vec<String>,
    or_where_params: Vec<Value>,
    group: Vec<String>,
    having: Vec<String>,
    having_params: Vec<Value>,
    order: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    include: Vec<String>,
}

impl QueryBuilder {
    /// An unbound builder. Terminal operations need a model; use
    /// [`QueryBuilder::model`] for those.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder bound to `model` without an alias. Nothing is seeded.
    pub fn model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }

    /// A builder bound to `model` and seeded with `` `table` `alias` `` and
    /// `` `alias`.* ``, resolving the table through the default [`Inflector`].
    pub fn aliased(model: impl Into<String>, alias: &str) -> Self {
        Self::aliased_with(model, alias, &Inflector::default())
    }

    /// Like [`QueryBuilder::aliased`] with a custom table name resolver.
    pub fn aliased_with(
        model: impl Into<String>,
        alias: &str,
        resolver: &impl TableNameResolver,
    ) -> Self {
        let model = model.into();
        let table = resolver.resolve_table_name(&model);
        Self::seeded(model, &table, alias)
    }

    /// A builder bound to `M` without an alias.
    pub fn for_model<M: Model>() -> Self {
        Self::model(M::NAME)
    }

    /// A builder bound to `M`, seeded from [`Model::table_name`] and `alias`.
    pub fn for_model_aliased<M: Model>(alias: &str) -> Self {
        Self::seeded(M::NAME.to_string(), &M::table_name(), alias)
    }

    fn seeded(model: String, table: &str, alias: &str) -> Self {
        let mut qb = Self::model(model);
        if !alias.is_empty() {
            qb.from = Some(format!("`{table}` `{alias}`"));
            qb.select.push(format!("`{alias}`.*"));
        }
        qb
    }

    /// The bound model identifier, if any.
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref()
    }

    // ==================== Mutators ====================

    /// Append SELECT fragments.
    pub fn select<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Replace the FROM expression.
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.from = Some(table.into());
        self
    }

    /// Append `KIND JOIN table [ON(condition)]`.
    ///
    /// Values bound by an operator condition are recorded ahead of every
    /// where/having parameter. `In`/`NotIn` conditions are rejected.
    pub fn join(
        &mut self,
        kind: JoinKind,
        table: impl AsRef<str>,
        on: Option<Condition>,
    ) -> QbResult<&mut Self> {
        let mut join = format!("{} {}", kind.keyword(), table.as_ref());
        if let Some(on) = on {
            let values = bound_values(&on, "join")?;
            join.push_str(&format!(" ON({on})"));
            self.join_params.extend(values);
        }
        self.joins.push(join);
        Ok(self)
    }

    pub fn inner_join(
        &mut self,
        table: impl AsRef<str>,
        on: impl Into<Condition>,
    ) -> QbResult<&mut Self> {
        self.join(JoinKind::Inner, table, Some(on.into()))
    }

    /// `LEFT JOIN`; `on` may be omitted.
    pub fn left_join(
        &mut self,
        table: impl AsRef<str>,
        on: Option<Condition>,
    ) -> QbResult<&mut Self> {
        self.join(JoinKind::Left, table, on)
    }

    /// `RIGHT JOIN`; `on` may be omitted.
    pub fn right_join(
        &mut self,
        table: impl AsRef<str>,
        on: Option<Condition>,
    ) -> QbResult<&mut Self> {
        self.join(JoinKind::Right, table, on)
    }

    /// AND a condition onto WHERE.
    pub fn and_where(&mut self, condition: impl Into<Condition>) -> &mut Self {
        self.and_where_with(condition, Vec::<Value>::new())
    }

    /// AND a condition onto WHERE with literal values for its placeholders.
    ///
    /// An operator that binds its own value(s) discards `values`.
    pub fn and_where_with<T: Into<Value>>(
        &mut self,
        condition: impl Into<Condition>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        let condition = condition.into();
        let params = extract_values(&condition, values);
        self.where_.push(condition.render());
        self.where_params.extend(params);
        self
    }

    /// Add a condition to the OR-group that is ANDed onto WHERE.
    pub fn or_where(&mut self, condition: impl Into<Condition>) -> &mut Self {
        self.or_where_with(condition, Vec::<Value>::new())
    }

    /// [`QueryBuilder::or_where`] with literal values.
    pub fn or_where_with<T: Into<Value>>(
        &mut self,
        condition: impl Into<Condition>,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        let condition = condition.into();
        let params = extract_values(&condition, values);
        self.or_where.push(condition.render());
        self.or_where_params.extend(params);
        self
    }

    /// Append GROUP BY fragments.
    pub fn group_by<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group.extend(columns.into_iter().map(Into::into));
        self
    }

    /// AND a condition onto HAVING. `In`/`NotIn` conditions are rejected.
    pub fn having(&mut self, condition: impl Into<Condition>) -> QbResult<&mut Self> {
        self.having_with(condition, Vec::<Value>::new())
    }

    /// [`QueryBuilder::having`] with literal values.
    pub fn having_with<T: Into<Value>>(
        &mut self,
        condition: impl Into<Condition>,
        values: impl IntoIterator<Item = T>,
    ) -> QbResult<&mut Self> {
        let condition = condition.into();
        let bound = bound_values(&condition, "having")?;
        let params = if has_bound_value(&condition) {
            bound
        } else {
            values.into_iter().map(Into::into).collect()
        };
        self.having.push(condition.render());
        self.having_params.extend(params);
        Ok(self)
    }

    /// Append `column DIRECTION` to ORDER BY.
    pub fn order_by(&mut self, column: impl AsRef<str>, order: Order) -> &mut Self {
        self.order.push(format!("{} {order}", column.as_ref()));
        self
    }

    pub fn order_by_asc(&mut self, column: impl AsRef<str>) -> &mut Self {
        self.order_by(column, Order::Asc)
    }

    pub fn order_by_desc(&mut self, column: impl AsRef<str>) -> &mut Self {
        self.order_by(column, Order::Desc)
    }

    /// Set LIMIT. `0` is treated as unset when compiling.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET. `0` is treated as unset when compiling.
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Append association names to eager-load.
    pub fn include<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(names.into_iter().map(Into::into));
        self
    }

    /// Clear the named state groups.
    ///
    /// Every name is validated before anything is cleared, so an unknown name
    /// leaves the builder untouched.
    pub fn reset<I, S>(&mut self, names: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts = names
            .into_iter()
            .map(|name| name.as_ref().parse::<ResetPart>())
            .collect::<QbResult<Vec<_>>>()?;
        for part in parts {
            self.reset_part(part);
        }
        Ok(self)
    }

    /// Clear one state group.
    pub fn reset_part(&mut self, part: ResetPart) -> &mut Self {
        match part {
            ResetPart::Select => self.select.clear(),
            ResetPart::From => self.from = None,
            ResetPart::Joins => {
                self.joins.clear();
                self.join_params.clear();
            }
            ResetPart::Where => {
                self.where_.clear();
                self.where_params.clear();
                self.or_where.clear();
                self.or_where_params.clear();
            }
            ResetPart::Group => self.group.clear(),
            ResetPart::Having => {
                self.having.clear();
                self.having_params.clear();
            }
            ResetPart::Order => self.order.clear(),
            ResetPart::Limit => self.limit = None,
            ResetPart::Offset => self.offset = None,
            ResetPart::Include => self.include.clear(),
        }
        self
    }

    // ==================== Compile ====================

    /// Compile the accumulated state. Only non-empty groups are present.
    pub fn to_request(&self) -> Request {
        let joined = |parts: &[String], sep: &str| (!parts.is_empty()).then(|| parts.join(sep));

        let request = Request {
            select: joined(&self.select, ", "),
            from: self.from.clone(),
            joins: joined(&self.joins, "\n"),
            group: joined(&self.group, ", "),
            having: joined(&self.having, " AND "),
            order: joined(&self.order, ", "),
            limit: self.limit.filter(|n| *n > 0),
            offset: self.offset.filter(|n| *n > 0),
            include: (!self.include.is_empty()).then(|| self.include.clone()),
            conditions: self.conditions(),
            set: None,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            keys = request.keys().len(),
            params = request.params().len(),
            "compiled query request"
        );

        request
    }

    fn conditions(&self) -> Option<Conditions> {
        let params: Vec<Value> = self
            .join_params
            .iter()
            .chain(&self.where_params)
            .chain(&self.or_where_params)
            .chain(&self.having_params)
            .cloned()
            .collect();

        if self.where_.is_empty() && self.or_where.is_empty() && params.is_empty() {
            return None;
        }

        let mut sql = if self.where_.is_empty() {
            "1=1".to_string()
        } else {
            self.where_.join(" AND ")
        };
        if !self.or_where.is_empty() {
            sql = format!("({sql}) AND ({})", self.or_where.join(" OR "));
        }

        Some(Conditions { sql, params })
    }

    /// Compile for a bulk delete. Only `conditions`, `limit` and `order` may be
    /// present.
    pub fn to_delete_request(&self) -> QbResult<Request> {
        self.bulk_request("delete_all")
    }

    /// Compile for a bulk update, adding `set`. Only `conditions`, `limit` and
    /// `order` may be present in the accumulated state.
    pub fn to_update_request<K, V>(&self, set: impl IntoIterator<Item = (K, V)>) -> QbResult<Request>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut request = self.bulk_request("update_all")?;
        request.set = Some(
            set.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect::<BTreeMap<_, _>>(),
        );
        Ok(request)
    }

    fn bulk_request(&self, operation: &str) -> QbResult<Request> {
        const ALLOWED: [RequestKey; 3] = [RequestKey::Conditions, RequestKey::Limit, RequestKey::Order];

        let request = self.to_request();
        let disallowed: Vec<&str> = request
            .keys()
            .into_iter()
            .filter(|key| !ALLOWED.contains(key))
            .map(RequestKey::as_str)
            .collect();

        if !disallowed.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(operation, keys = ?disallowed, "rejected bulk request");

            return Err(QbError::invalid_argument(format!(
                "unsupported request keys for {operation}: {}",
                disallowed.join(", ")
            )));
        }
        Ok(request)
    }
}

fn has_bound_value(condition: &Condition) -> bool {
    condition
        .as_operator()
        .is_some_and(|op| op.has_bound_value())
}

/// The operator's own values if it binds any, otherwise the literal values.
fn extract_values<T: Into<Value>>(
    condition: &Condition,
    literals: impl IntoIterator<Item = T>,
) -> Vec<Value> {
    match condition.bound_value() {
        Some(bound) => bound.flatten(),
        None => literals.into_iter().map(Into::into).collect(),
    }
}

/// Values bound by a join/having condition, rejecting set-membership operators.
fn bound_values(condition: &Condition, clause: &str) -> QbResult<Vec<Value>> {
    let Some(op) = condition.as_operator() else {
        return Ok(Vec::new());
    };
    if op.kind().is_set_membership() {
        return Err(QbError::invalid_argument(format!(
            "unsupported operator `{}` for {clause}",
            op.kind()
        )));
    }
    Ok(op.values())
}
