//! Ordered, possibly nested, containers of bound values.

use crate::value::Value;

/// What an operator contributes for its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// One value for one placeholder (a `List` still counts as one, see `IN(?)`).
    Single(Value),
    /// Several values, possibly nested, for several placeholders.
    Bag(ValueBag),
}

impl BoundValue {
    /// Wrap anything convertible into a [`Value`].
    pub fn single(v: impl Into<Value>) -> Self {
        BoundValue::Single(v.into())
    }

    /// Flatten into the positional parameter order.
    pub fn flatten(&self) -> Vec<Value> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Value>) {
        match self {
            BoundValue::Single(v) => out.push(v.clone()),
            BoundValue::Bag(bag) => bag.flatten_into(out),
        }
    }

    /// Borrow the single value, if this is not a bag.
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            BoundValue::Single(v) => Some(v),
            BoundValue::Bag(_) => None,
        }
    }

    /// Borrow the bag, if this is one.
    pub fn as_bag(&self) -> Option<&ValueBag> {
        match self {
            BoundValue::Single(_) => None,
            BoundValue::Bag(bag) => Some(bag),
        }
    }
}

impl From<Value> for BoundValue {
    fn from(v: Value) -> Self {
        BoundValue::Single(v)
    }
}

impl From<ValueBag> for BoundValue {
    fn from(bag: ValueBag) -> Self {
        BoundValue::Bag(bag)
    }
}

/// An ordered sequence of bound values whose elements may themselves be bags.
///
/// [`ValueBag::values`] flattens recursively, preserving construction order, so
/// flattening `a` merged with `b` equals `a.values()` followed by `b.values()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueBag {
    items: Vec<BoundValue>,
}

impl ValueBag {
    /// Create a bag from its (unflattened) items.
    pub fn new(items: Vec<BoundValue>) -> Self {
        Self { items }
    }

    /// Append one item.
    pub fn push(&mut self, item: BoundValue) {
        self.items.push(item);
    }

    /// Append another bag as a nested element.
    pub fn merge(mut self, other: ValueBag) -> Self {
        self.items.push(BoundValue::Bag(other));
        self
    }

    /// Number of top-level items (not flattened).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items as constructed, without flattening.
    pub fn raw(&self) -> &[BoundValue] {
        &self.items
    }

    /// All values flattened into positional order.
    pub fn values(&self) -> Vec<Value> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Value>) {
        for item in &self.items {
            item.flatten_into(out);
        }
    }
}

impl FromIterator<BoundValue> for ValueBag {
    fn from_iter<I: IntoIterator<Item = BoundValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueBag {
    type Item = BoundValue;
    type IntoIter = std::vec::IntoIter<BoundValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(values: &[i64]) -> ValueBag {
        values.iter().map(|v| BoundValue::single(*v)).collect()
    }

    #[test]
    fn flattens_nested_bags_in_order() {
        let inner = bag(&[2, 3]);
        let mut outer = ValueBag::new(vec![BoundValue::single(1), BoundValue::Bag(inner)]);
        outer.push(BoundValue::single(4));

        assert_eq!(outer.len(), 3);
        assert_eq!(
            outer.values(),
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
        );
    }

    #[test]
    fn list_value_is_not_expanded() {
        let b = ValueBag::new(vec![BoundValue::single(vec![1, 2])]);
        assert_eq!(b.values(), vec![Value::from(vec![1, 2])]);
    }

    #[test]
    fn merge_is_associative_under_flatten() {
        let a = bag(&[1, 2]);
        let b = ValueBag::new(vec![BoundValue::Bag(bag(&[3])), BoundValue::single(4)]);

        let merged = ValueBag::default().merge(a.clone()).merge(b.clone());

        let mut expected = a.values();
        expected.extend(b.values());
        assert_eq!(merged.values(), expected);
    }

    #[test]
    fn raw_keeps_structure() {
        let b = ValueBag::new(vec![BoundValue::Bag(bag(&[1, 2]))]);
        assert_eq!(b.raw().len(), 1);
        assert!(b.raw()[0].as_bag().is_some());
    }
}
