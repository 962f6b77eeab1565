//! Predicate operators for WHERE/HAVING/JOIN ... ON conditions.
//!
//! Every [`Operator`] renders itself as a SQL fragment with `?` placeholders and
//! reports the value(s) it binds, in placeholder order:
//!
//! ```ignore
//! use arqb::op;
//!
//! let cond = arqb::and![
//!     "t4.id = t2.id",
//!     op::eq("t4.group", "x"),
//!     op::between("t4.rank", 1, 10),
//! ];
//! assert_eq!(cond.render(), "(t4.id = t2.id AND t4.group = ? AND t4.rank BETWEEN ? AND ?)");
//! assert_eq!(cond.values().len(), 3);
//! ```
//!
//! Operators that cannot be rendered meaningfully (`IN` over an empty list,
//! ordering comparisons against NULL) are rejected when constructed.

mod bag;

pub use bag::{BoundValue, ValueBag};

use crate::error::{QbError, QbResult};
use crate::value::Value;
use std::fmt;

/// The closed set of operator variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    NotBetween,
    In,
    NotIn,
    Like,
    NotLike,
    FindInSet,
    And,
    Or,
}

impl OperatorKind {
    /// Variant name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Eq => "Eq",
            OperatorKind::Neq => "Neq",
            OperatorKind::Gt => "Gt",
            OperatorKind::Gte => "Gte",
            OperatorKind::Lt => "Lt",
            OperatorKind::Lte => "Lte",
            OperatorKind::Between => "Between",
            OperatorKind::NotBetween => "NotBetween",
            OperatorKind::In => "In",
            OperatorKind::NotIn => "NotIn",
            OperatorKind::Like => "Like",
            OperatorKind::NotLike => "NotLike",
            OperatorKind::FindInSet => "FindInSet",
            OperatorKind::And => "And",
            OperatorKind::Or => "Or",
        }
    }

    /// `true` for `In` / `NotIn`, whose single placeholder binds a whole list.
    pub fn is_set_membership(self) -> bool {
        matches!(self, OperatorKind::In | OperatorKind::NotIn)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    fn kind(self) -> OperatorKind {
        match self {
            Comparison::Eq => OperatorKind::Eq,
            Comparison::Neq => OperatorKind::Neq,
            Comparison::Gt => OperatorKind::Gt,
            Comparison::Gte => OperatorKind::Gte,
            Comparison::Lt => OperatorKind::Lt,
            Comparison::Lte => OperatorKind::Lte,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Neq => "!=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

impl Connective {
    fn separator(self) -> &'static str {
        match self {
            Connective::And => " AND ",
            Connective::Or => " OR ",
        }
    }

    /// Rendered in place of an empty group.
    fn identity(self) -> &'static str {
        match self {
            Connective::And => "(1=1)",
            Connective::Or => "(1=0)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum OperatorInner {
    /// `Eq`..`Lte`. Only `Eq`/`Neq` may hold `Value::Null`.
    Compare {
        cmp: Comparison,
        column: String,
        value: Value,
    },
    Between {
        column: String,
        min: Value,
        max: Value,
        negated: bool,
    },
    /// Never empty.
    InList {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    Like {
        column: String,
        pattern: String,
        raw: bool,
        negated: bool,
    },
    /// `set` is a raw SQL expression and is emitted verbatim.
    FindInSet {
        set: String,
        value: Value,
        negated: bool,
    },
    /// Fragments and values are captured when the group is built.
    Group {
        connective: Connective,
        fragments: Vec<String>,
        values: Vec<BoundValue>,
    },
}

/// A predicate operator.
///
/// The representation is private so that construction-time invariants hold for
/// every instance. Use the constructors here or the free functions in this module.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator(OperatorInner);

impl Operator {
    fn compare(cmp: Comparison, column: impl Into<String>, value: Value) -> Self {
        Operator(OperatorInner::Compare {
            cmp,
            column: column.into(),
            value,
        })
    }

    fn ordering(cmp: Comparison, column: impl Into<String>, value: Value) -> QbResult<Self> {
        if value.is_null() {
            return Err(QbError::invalid_argument(format!(
                "`{}` requires a non-null value",
                cmp.kind()
            )));
        }
        Ok(Self::compare(cmp, column, value))
    }

    fn in_list_inner(column: impl Into<String>, values: Vec<Value>, negated: bool) -> QbResult<Self> {
        if values.is_empty() {
            let kind = if negated {
                OperatorKind::NotIn
            } else {
                OperatorKind::In
            };
            return Err(QbError::invalid_argument(format!(
                "`{kind}` requires a non-empty value list"
            )));
        }
        Ok(Operator(OperatorInner::InList {
            column: column.into(),
            values,
            negated,
        }))
    }

    fn group<I, C>(connective: Connective, items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        let mut fragments = Vec::new();
        let mut values = Vec::new();
        for item in items {
            let item = item.into();
            if let Some(value) = item.bound_value() {
                values.push(value);
            }
            fragments.push(item.render());
        }
        Operator(OperatorInner::Group {
            connective,
            fragments,
            values,
        })
    }

    /// `column = ?`, or `column IS NULL` when `value` is null.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(Comparison::Eq, column, value.into())
    }

    /// `column != ?`, or `column IS NOT NULL` when `value` is null.
    pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(Comparison::Neq, column, value.into())
    }

    /// `column > ?`. Fails on a null value.
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Self> {
        Self::ordering(Comparison::Gt, column, value.into())
    }

    /// `column >= ?`. Fails on a null value.
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Self> {
        Self::ordering(Comparison::Gte, column, value.into())
    }

    /// `column < ?`. Fails on a null value.
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Self> {
        Self::ordering(Comparison::Lt, column, value.into())
    }

    /// `column <= ?`. Fails on a null value.
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Self> {
        Self::ordering(Comparison::Lte, column, value.into())
    }

    /// `column BETWEEN ? AND ?`
    pub fn between(
        column: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        Operator(OperatorInner::Between {
            column: column.into(),
            min: min.into(),
            max: max.into(),
            negated: false,
        })
    }

    /// `column NOT BETWEEN ? AND ?`
    pub fn not_between(
        column: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        Operator(OperatorInner::Between {
            column: column.into(),
            min: min.into(),
            max: max.into(),
            negated: true,
        })
    }

    /// `column IN(?)` binding the whole list. Fails on an empty list.
    pub fn in_list<T: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> QbResult<Self> {
        Self::in_list_inner(column, values.into_iter().map(Into::into).collect(), false)
    }

    /// `column NOT IN(?)` binding the whole list. Fails on an empty list.
    pub fn not_in<T: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> QbResult<Self> {
        Self::in_list_inner(column, values.into_iter().map(Into::into).collect(), true)
    }

    /// `column LIKE ?`. The bound pattern is `%value%` unless `raw` is set.
    pub fn like(column: impl Into<String>, value: impl Into<String>, raw: bool) -> Self {
        Operator(OperatorInner::Like {
            column: column.into(),
            pattern: value.into(),
            raw,
            negated: false,
        })
    }

    /// `column NOT LIKE ?`. The bound pattern is `%value%` unless `raw` is set.
    pub fn not_like(column: impl Into<String>, value: impl Into<String>, raw: bool) -> Self {
        Operator(OperatorInner::Like {
            column: column.into(),
            pattern: value.into(),
            raw,
            negated: true,
        })
    }

    /// `FIND_IN_SET(?, set)` or `NOT FIND_IN_SET(?, set)`.
    pub fn find_in_set(set: impl Into<String>, value: impl Into<Value>, negated: bool) -> Self {
        Operator(OperatorInner::FindInSet {
            set: set.into(),
            value: value.into(),
            negated,
        })
    }

    /// `(a AND b ...)`
    pub fn and<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self::group(Connective::And, items)
    }

    /// `(a OR b ...)`
    pub fn or<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Self::group(Connective::Or, items)
    }

    pub fn kind(&self) -> OperatorKind {
        match &self.0 {
            OperatorInner::Compare { cmp, .. } => cmp.kind(),
            OperatorInner::Between { negated, .. } => {
                if *negated {
                    OperatorKind::NotBetween
                } else {
                    OperatorKind::Between
                }
            }
            OperatorInner::InList { negated, .. } => {
                if *negated {
                    OperatorKind::NotIn
                } else {
                    OperatorKind::In
                }
            }
            OperatorInner::Like { negated, .. } => {
                if *negated {
                    OperatorKind::NotLike
                } else {
                    OperatorKind::Like
                }
            }
            OperatorInner::FindInSet { .. } => OperatorKind::FindInSet,
            OperatorInner::Group { connective, .. } => match connective {
                Connective::And => OperatorKind::And,
                Connective::Or => OperatorKind::Or,
            },
        }
    }

    /// Render the SQL fragment with `?` placeholders.
    pub fn render(&self) -> String {
        match &self.0 {
            OperatorInner::Compare { cmp, column, value } => match (cmp, value.is_null()) {
                (Comparison::Eq, true) => format!("{column} IS NULL"),
                (Comparison::Neq, true) => format!("{column} IS NOT NULL"),
                _ => format!("{column} {} ?", cmp.symbol()),
            },
            OperatorInner::Between {
                column, negated, ..
            } => {
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{column} {op} ? AND ?")
            }
            OperatorInner::InList {
                column, negated, ..
            } => {
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{column} {op}(?)")
            }
            OperatorInner::Like {
                column, negated, ..
            } => {
                let op = if *negated { "NOT LIKE" } else { "LIKE" };
                format!("{column} {op} ?")
            }
            OperatorInner::FindInSet { set, negated, .. } => {
                if *negated {
                    format!("NOT FIND_IN_SET(?, {set})")
                } else {
                    format!("FIND_IN_SET(?, {set})")
                }
            }
            OperatorInner::Group {
                connective,
                fragments,
                ..
            } => {
                if fragments.is_empty() {
                    return connective.identity().to_string();
                }
                format!("({})", fragments.join(connective.separator()))
            }
        }
    }

    /// Whether this operator binds at least one value.
    pub fn has_bound_value(&self) -> bool {
        match &self.0 {
            OperatorInner::Compare { value, .. } => !value.is_null(),
            OperatorInner::Group { values, .. } => !values.is_empty(),
            OperatorInner::Between { .. }
            | OperatorInner::InList { .. }
            | OperatorInner::Like { .. }
            | OperatorInner::FindInSet { .. } => true,
        }
    }

    /// The value(s) bound by this operator, structured as constructed.
    ///
    /// `Between` yields a bag `(min, max)`, `In`/`NotIn` a single list value, and
    /// `And`/`Or` a bag of their items' values (possibly nested bags).
    pub fn value(&self) -> Option<BoundValue> {
        if !self.has_bound_value() {
            return None;
        }
        let bound = match &self.0 {
            OperatorInner::Compare { value, .. } | OperatorInner::FindInSet { value, .. } => {
                BoundValue::Single(value.clone())
            }
            OperatorInner::Between { min, max, .. } => BoundValue::Bag(ValueBag::new(vec![
                BoundValue::Single(min.clone()),
                BoundValue::Single(max.clone()),
            ])),
            OperatorInner::InList { values, .. } => BoundValue::Single(Value::List(values.clone())),
            OperatorInner::Like { pattern, raw, .. } => {
                if *raw {
                    BoundValue::Single(Value::Text(pattern.clone()))
                } else {
                    BoundValue::Single(Value::Text(format!("%{pattern}%")))
                }
            }
            OperatorInner::Group { values, .. } => BoundValue::Bag(ValueBag::new(values.clone())),
        };
        Some(bound)
    }

    /// The bound values flattened into placeholder order.
    pub fn values(&self) -> Vec<Value> {
        self.value().map(|v| v.flatten()).unwrap_or_default()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A condition argument: either a raw SQL fragment or an [`Operator`].
///
/// Raw fragments are trusted verbatim and never contribute values on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Raw(String),
    Operator(Operator),
}

impl Condition {
    /// Create a raw SQL condition.
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    pub fn render(&self) -> String {
        match self {
            Condition::Raw(sql) => sql.clone(),
            Condition::Operator(op) => op.render(),
        }
    }

    /// The operator's bound value, if this is an operator that has one.
    pub fn bound_value(&self) -> Option<BoundValue> {
        match self {
            Condition::Raw(_) => None,
            Condition::Operator(op) => op.value(),
        }
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            Condition::Raw(_) => None,
            Condition::Operator(op) => Some(op),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Raw(sql) => f.write_str(sql),
            Condition::Operator(op) => fmt::Display::fmt(op, f),
        }
    }
}

impl From<&str> for Condition {
    fn from(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}

impl From<String> for Condition {
    fn from(sql: String) -> Self {
        Condition::Raw(sql)
    }
}

impl From<Operator> for Condition {
    fn from(op: Operator) -> Self {
        Condition::Operator(op)
    }
}

// ==================== Free constructors ====================

/// `column = ?` / `column IS NULL`
pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Operator {
    Operator::eq(column, value)
}

/// `column != ?` / `column IS NOT NULL`
pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Operator {
    Operator::neq(column, value)
}

/// `column > ?`
pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Operator> {
    Operator::gt(column, value)
}

/// `column >= ?`
pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Operator> {
    Operator::gte(column, value)
}

/// `column < ?`
pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Operator> {
    Operator::lt(column, value)
}

/// `column <= ?`
pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> QbResult<Operator> {
    Operator::lte(column, value)
}

/// `column BETWEEN ? AND ?`
pub fn between(
    column: impl Into<String>,
    min: impl Into<Value>,
    max: impl Into<Value>,
) -> Operator {
    Operator::between(column, min, max)
}

/// `column NOT BETWEEN ? AND ?`
pub fn not_between(
    column: impl Into<String>,
    min: impl Into<Value>,
    max: impl Into<Value>,
) -> Operator {
    Operator::not_between(column, min, max)
}

/// `column IN(?)`
pub fn in_list<T: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> QbResult<Operator> {
    Operator::in_list(column, values)
}

/// `column NOT IN(?)`
pub fn not_in<T: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> QbResult<Operator> {
    Operator::not_in(column, values)
}

/// `column LIKE ?` binding `%value%`
pub fn like(column: impl Into<String>, value: impl Into<String>) -> Operator {
    Operator::like(column, value, false)
}

/// `column LIKE ?` binding `value` unmodified
pub fn like_raw(column: impl Into<String>, value: impl Into<String>) -> Operator {
    Operator::like(column, value, true)
}

/// `column NOT LIKE ?` binding `%value%`
pub fn not_like(column: impl Into<String>, value: impl Into<String>) -> Operator {
    Operator::not_like(column, value, false)
}

/// `column NOT LIKE ?` binding `value` unmodified
pub fn not_like_raw(column: impl Into<String>, value: impl Into<String>) -> Operator {
    Operator::not_like(column, value, true)
}

/// `FIND_IN_SET(?, set)`
pub fn find_in_set(set: impl Into<String>, value: impl Into<Value>) -> Operator {
    Operator::find_in_set(set, value, false)
}

/// `NOT FIND_IN_SET(?, set)`
pub fn not_find_in_set(set: impl Into<String>, value: impl Into<Value>) -> Operator {
    Operator::find_in_set(set, value, true)
}

/// `(a AND b ...)`
pub fn and<I, C>(items: I) -> Operator
where
    I: IntoIterator<Item = C>,
    C: Into<Condition>,
{
    Operator::and(items)
}

/// `(a OR b ...)`
pub fn or<I, C>(items: I) -> Operator
where
    I: IntoIterator<Item = C>,
    C: Into<Condition>,
{
    Operator::or(items)
}

/// Build an `And` group from a mix of raw fragments and operators.
///
/// ```ignore
/// let cond = arqb::and!["tb3.active", arqb::op::eq("tb.id", 1)];
/// ```
#[macro_export]
macro_rules! and {
    () => {
        $crate::op::Operator::and(::std::vec::Vec::<$crate::op::Condition>::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::op::Operator::and(::std::vec![$($crate::op::Condition::from($item)),+])
    };
}

/// Build an `Or` group from a mix of raw fragments and operators.
#[macro_export]
macro_rules! or {
    () => {
        $crate::op::Operator::or(::std::vec::Vec::<$crate::op::Condition>::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::op::Operator::or(::std::vec![$($crate::op::Condition::from($item)),+])
    };
}

#[cfg(test)]
mod tests;
