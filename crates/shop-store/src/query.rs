//! Query model: equality filters, ordering and limits.

use crate::Document;
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// An equality condition on a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// A query over one collection.
///
/// ```
/// use shop_store::Query;
///
/// let query = Query::new()
///     .where_eq("slug", "raw-honey")
///     .order_by_desc("createdAt")
///     .limit(1);
/// assert_eq!(query.limit, Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    /// An unfiltered, unordered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Order by a field, newest/largest first.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some((field.into(), Direction::Descending));
        self
    }

    /// Order by a field, smallest first.
    pub fn order_by_asc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some((field.into(), Direction::Ascending));
        self
    }

    /// Cap the number of returned documents.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether a document satisfies every filter.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| match f.field.as_str() {
            crate::document::ID_FIELD => f.value.as_str() == Some(doc.id.as_str()),
            field => doc.get(field) == Some(&f.value),
        })
    }

    /// Apply filters, ordering and limit to a set of documents.
    pub fn apply<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.into_iter().filter(|d| self.matches(d)).cloned().collect();

        if let Some((field, direction)) = &self.order_by {
            out.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

/// Total order over optional JSON values: missing < null < bool < number < string.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> Document {
        Document::new(id, value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_equality_filter() {
        let docs = vec![
            doc("1", json!({ "slug": "honey" })),
            doc("2", json!({ "slug": "ghee" })),
        ];
        let found = Query::new().where_eq("slug", "ghee").apply(&docs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");
    }

    #[test]
    fn test_filter_on_id() {
        let docs = vec![doc("a", json!({})), doc("b", json!({}))];
        let found = Query::new().where_eq("id", "b").apply(&docs);
        assert_eq!(found[0].id, "b");
    }

    #[test]
    fn test_order_desc_with_limit() {
        let docs = vec![
            doc("old", json!({ "createdAt": 100 })),
            doc("new", json!({ "createdAt": 300 })),
            doc("mid", json!({ "createdAt": 200 })),
        ];
        let found = Query::new().order_by_desc("createdAt").limit(2).apply(&docs);
        let ids: Vec<&str> = found.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[test]
    fn test_missing_field_sorts_last_when_descending() {
        let docs = vec![doc("none", json!({})), doc("some", json!({ "createdAt": 1 }))];
        let found = Query::new().order_by_desc("createdAt").apply(&docs);
        assert_eq!(found[0].id, "some");
    }
}
