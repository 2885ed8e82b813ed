use crate::core::FieldId;
use crate::core::value::Value;
use indexmap::IndexMap;

/// Sole owner of the aggregated form state. Every step writes through
/// `merge`; keys accumulate across the whole session and are only wiped
/// wholesale by `reset`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormStore {
    values: IndexMap<FieldId, Value>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(initial: IndexMap<FieldId, Value>) -> Self {
        Self { values: initial }
    }

    /// Shallow merge, last write wins. Keys absent from `partial` are untouched.
    pub fn merge(&mut self, partial: IndexMap<FieldId, Value>) {
        for (field, value) in partial {
            self.values.insert(field, value);
        }
    }

    pub fn set(&mut self, field: impl Into<FieldId>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn reset(&mut self, initial: IndexMap<FieldId, Value>) {
        self.values = initial;
    }

    pub fn snapshot(&self) -> &IndexMap<FieldId, Value> {
        &self.values
    }

    pub fn to_owned_snapshot(&self) -> IndexMap<FieldId, Value> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::FormStore;
    use crate::core::value::Value;
    use indexmap::IndexMap;

    fn partial(entries: &[(&str, &str)]) -> IndexMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::text(*v)))
            .collect()
    }

    #[test]
    fn merge_unions_keys_and_last_write_wins() {
        let mut store = FormStore::new();
        store.merge(partial(&[("name", "a"), ("city", "gda")]));
        store.merge(partial(&[("name", "b"), ("zip", "80-001")]));

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("name").and_then(Value::as_text), Some("b"));
        assert_eq!(store.get("city").and_then(Value::as_text), Some("gda"));
        assert_eq!(store.get("zip").and_then(Value::as_text), Some("80-001"));
    }

    #[test]
    fn merge_with_empty_partial_changes_nothing() {
        let mut store = FormStore::with_initial(partial(&[("name", "a")]));
        store.merge(IndexMap::new());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("name").and_then(Value::as_text), Some("a"));
    }

    #[test]
    fn reset_replaces_everything() {
        let mut store = FormStore::with_initial(partial(&[("name", "a"), ("city", "gda")]));
        store.reset(partial(&[("name", "z")]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("name").and_then(Value::as_text), Some("z"));
        assert_eq!(store.get("city"), None);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut store = FormStore::new();
        store.set("first", Value::text("1"));
        store.set("second", Value::text("2"));
        store.set("first", Value::text("1b"));

        let keys = store.snapshot().keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, vec!["first", "second"]);
    }
}
