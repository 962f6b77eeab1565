//! The compiled request handed to the execution layer.

use crate::error::{QbError, QbResult};
use crate::value::Value;
use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Keys a compiled [`Request`] may carry, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestKey {
    Select,
    From,
    Joins,
    Group,
    Having,
    Order,
    Limit,
    Offset,
    Include,
    Conditions,
    Set,
}

impl RequestKey {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKey::Select => "select",
            RequestKey::From => "from",
            RequestKey::Joins => "joins",
            RequestKey::Group => "group",
            RequestKey::Having => "having",
            RequestKey::Order => "order",
            RequestKey::Limit => "limit",
            RequestKey::Offset => "offset",
            RequestKey::Include => "include",
            RequestKey::Conditions => "conditions",
            RequestKey::Set => "set",
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `conditions` entry: WHERE text followed by every bound parameter of the
/// query in placeholder order (JOIN ... ON, WHERE, OR-group, HAVING).
///
/// `sql` is the WHERE fragments joined by ` AND ` with no outer parentheses;
/// only when an OR-group exists is it emitted as `(<where>) AND (<or-group>)`.
///
/// Serializes as the flat sequence `[sql, p1, p2, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Conditions {
    /// The flat `[sql, p1, p2, ...]` form.
    pub fn to_vec(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.params.len() + 1);
        out.push(Value::Text(self.sql.clone()));
        out.extend(self.params.iter().cloned());
        out
    }
}

impl Serialize for Conditions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.params.len() + 1))?;
        seq.serialize_element(&self.sql)?;
        for param in &self.params {
            seq.serialize_element(param)?;
        }
        seq.end()
    }
}

/// A compiled query request. Absent fields were empty in the builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joins: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub having: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    /// Column assignments; only present on update-all requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<BTreeMap<String, Value>>,
}

impl Request {
    /// The keys present in this request, in emission order.
    pub fn keys(&self) -> Vec<RequestKey> {
        let present = [
            (RequestKey::Select, self.select.is_some()),
            (RequestKey::From, self.from.is_some()),
            (RequestKey::Joins, self.joins.is_some()),
            (RequestKey::Group, self.group.is_some()),
            (RequestKey::Having, self.having.is_some()),
            (RequestKey::Order, self.order.is_some()),
            (RequestKey::Limit, self.limit.is_some()),
            (RequestKey::Offset, self.offset.is_some()),
            (RequestKey::Include, self.include.is_some()),
            (RequestKey::Conditions, self.conditions.is_some()),
            (RequestKey::Set, self.set.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(key, is_present)| is_present.then_some(key))
            .collect()
    }

    pub fn contains(&self, key: RequestKey) -> bool {
        self.keys().contains(&key)
    }

    /// `true` when no key is present.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// The bound parameters, or an empty slice when there are no conditions.
    pub fn params(&self) -> &[Value] {
        self.conditions
            .as_ref()
            .map(|c| c.params.as_slice())
            .unwrap_or_default()
    }

    /// Render as a JSON object keyed like the execution layer expects.
    pub fn to_json(&self) -> QbResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| QbError::Serialization(e.to_string()))
    }
}
