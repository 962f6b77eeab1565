//! # arqb
//!
//! A fluent query builder for active-record style models.
//!
//! ## Features
//!
//! - **Predicate operators**: `Eq`, `Between`, `In`, `Like`, `FindInSet`, `And`/`Or` groups, ...
//!   each rendering a `?`-placeholder fragment plus its bound values in placeholder order
//! - **Query state accumulator**: select/from/joins/where/group/having/order/limit/offset/include
//! - **Structured output**: a [`Request`] with one flat, ordered parameter list for every placeholder
//! - **Fail fast**: invalid operators and misuse are rejected when constructed, never when compiled
//! - **Pluggable execution**: terminal operations delegate to any [`Executor`]
//!
//! ## Example
//!
//! ```ignore
//! use arqb::{QueryBuilder, op};
//!
//! let mut qb = QueryBuilder::aliased("Author", "t0");
//! qb.inner_join("books b", arqb::and!["b.author_id = t0.id", op::eq("b.status", "published")])?
//!     .and_where(op::in_list("t0.country", ["PL", "DE"])?)
//!     .or_where(op::like("t0.name", "ann"))
//!     .or_where(op::eq("t0.featured", true))
//!     .order_by_desc("t0.created_at")
//!     .limit(20);
//!
//! let request = qb.to_request();
//! // request.from       == "`authors` `t0`"
//! // request.conditions == ["(t0.country IN(?)) AND (t0.name LIKE ? OR t0.featured = ?)",
//! //                        "published", ["PL", "DE"], "%ann%", true]
//!
//! let authors = qb.all(&executor).await?;
//! ```

pub mod builder;
pub mod error;
pub mod exec;
pub mod naming;
pub mod op;
pub mod value;

pub use builder::{Conditions, JoinKind, Order, QueryBuilder, Request, RequestKey, ResetPart};
pub use error::{QbError, QbResult};
pub use exec::Executor;
pub use naming::{Inflector, Model, NamingConfig, TableNameResolver};
pub use op::{BoundValue, Condition, Operator, OperatorKind, ValueBag};
pub use value::Value;
