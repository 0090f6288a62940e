//! Row filters, ordering and paging
//!
//! A [`Filter`] is a conjunction of [`Condition`]s plus an optional
//! disjunctive group, which is what the list and search screens need.
//! [`Filter::matches`] evaluates a filter in process; the REST adapter
//! renders the same filter as PostgREST query parameters.

use std::cmp::Ordering;

use serde_json::Value;

use crate::Row;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive pattern, `%` matches any run of characters
    ILike,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::ILike => "ilike",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: Op,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self { column: column.into(), op, value: value.into() }
    }

    /// Missing columns read as null.
    pub fn matches(&self, row: &Row) -> bool {
        let actual = row.get(&self.column).unwrap_or(&Value::Null);
        match self.op {
            Op::Eq => compare(actual, &self.value) == Some(Ordering::Equal),
            Op::Neq => compare(actual, &self.value) != Some(Ordering::Equal),
            Op::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            Op::Gte => matches!(compare(actual, &self.value), Some(Ordering::Greater | Ordering::Equal)),
            Op::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            Op::Lte => matches!(compare(actual, &self.value), Some(Ordering::Less | Ordering::Equal)),
            Op::ILike => match (actual, &self.value) {
                (Value::String(text), Value::String(pattern)) => ilike(text, pattern),
                _ => false,
            },
        }
    }
}

/// Every condition in `all` holds, and at least one in `any` when it is
/// not empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub all: Vec<Condition>,
    pub any: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Condition::new(column, Op::Eq, value))
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Condition::new(column, Op::Neq, value))
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Condition::new(column, Op::Gte, value))
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(Condition::new(column, Op::Lte, value))
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.all.push(condition);
        self
    }

    /// Any of `columns` contains `needle`, case-insensitively.
    pub fn search<I, S>(mut self, columns: I, needle: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern = format!("%{}%", needle.trim());
        self.any.extend(
            columns
                .into_iter()
                .map(|column| Condition::new(column, Op::ILike, pattern.clone())),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.all.iter().all(|c| c.matches(row))
            && (self.any.is_empty() || self.any.iter().any(|c| c.matches(row)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: true }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), ascending: false }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub order: Vec<Order>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    /// Zero-based page of `per_page` rows.
    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.offset = page.saturating_mul(per_page);
        self.limit = Some(per_page);
        self
    }

    /// Sort `rows` by the query order. Nulls sort last either way.
    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| {
            for order in &self.order {
                let left = a.get(&order.column).unwrap_or(&Value::Null);
                let right = b.get(&order.column).unwrap_or(&Value::Null);
                let ordering = match (left.is_null(), right.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => return Ordering::Greater,
                    (false, true) => return Ordering::Less,
                    (false, false) => compare(left, right).unwrap_or(Ordering::Equal),
                };
                let ordering = if order.ascending { ordering } else { ordering.reverse() };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

/// Numbers compare numerically, strings lexically. Mixed types, arrays and
/// objects are unordered, except null which only equals null.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        // Text columns filtered with numeric ids, as PostgREST does.
        (Value::String(a), Value::Number(b)) => Some(a.as_str().cmp(b.to_string().as_str())),
        _ => None,
    }
}

fn ilike(text: &str, pattern: &str) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();
    let segments: Vec<&str> = pattern.split('%').collect();
    let last = segments.len() - 1;
    let mut rest = text.as_str();
    for (index, segment) in segments.iter().enumerate() {
        if index == 0 {
            match rest.strip_prefix(segment) {
                Some(remaining) => rest = remaining,
                None => return false,
            }
        } else if index == last {
            return rest.ends_with(segment);
        } else {
            match rest.find(segment) {
                Some(at) => rest = &rest[at + segment.len()..],
                None => return false,
            }
        }
    }
    rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ilike() {
        assert!(ilike("Fuga de agua", "%AGUA%"));
        assert!(ilike("Fuga de agua", "fuga%"));
        assert!(ilike("Fuga de agua", "%agua"));
        assert!(ilike("abc", "abc"));
        assert!(!ilike("abcd", "abc"));
        assert!(!ilike("Fuga", "%agua%"));
        assert!(ilike("anything", "%%"));
    }

    #[test]
    fn test_filter_conjunction_and_search_group() {
        let filter = Filter::new()
            .eq("area_id", 3)
            .search(["alumno_nombre", "alumno_dni"], "ana");
        assert!(filter.matches(&row(json!({"area_id": 3, "alumno_nombre": "Ana Pérez", "alumno_dni": "1"}))));
        assert!(!filter.matches(&row(json!({"area_id": 4, "alumno_nombre": "Ana Pérez"}))));
        assert!(!filter.matches(&row(json!({"area_id": 3, "alumno_nombre": "Luis"}))));
    }

    #[test]
    fn test_range_conditions_on_timestamps() {
        let filter = Filter::new()
            .gte("submitted_at", "2026-01-01T00:00:00Z")
            .lte("submitted_at", "2026-01-31T23:59:59Z");
        assert!(filter.matches(&row(json!({"submitted_at": "2026-01-15T10:00:00Z"}))));
        assert!(!filter.matches(&row(json!({"submitted_at": "2026-02-01T00:00:00Z"}))));
    }

    #[test]
    fn test_missing_column_is_null() {
        let r = row(json!({"id": 1}));
        assert!(Condition::new("status", Op::Neq, "resolved").matches(&r));
        assert!(!Condition::new("status", Op::Eq, "resolved").matches(&r));
        assert!(Condition::new("status", Op::Eq, Value::Null).matches(&r));
    }

    #[test]
    fn test_sort_descending_with_nulls_last() {
        let mut rows = vec![
            row(json!({"id": 1, "submitted_at": "2026-01-01"})),
            row(json!({"id": 2})),
            row(json!({"id": 3, "submitted_at": "2026-03-01"})),
        ];
        Query::new().order(Order::desc("submitted_at")).sort(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_page_offsets() {
        let query = Query::new().page(2, 20);
        assert_eq!(query.offset, 40);
        assert_eq!(query.limit, Some(20));
    }
}
