use crate::core::FieldId;
use crate::core::store::FormStore;
use crate::core::value::Value;
use indexmap::IndexMap;

/// Read-only view of the aggregated state handed to gate checks and
/// rendering delegates. Owns its copy so deferred checks can carry it
/// onto a worker thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepContext {
    values: IndexMap<FieldId, Value>,
}

impl StepContext {
    pub fn new(values: IndexMap<FieldId, Value>) -> Self {
        Self { values }
    }

    pub fn from_store(store: &FormStore) -> Self {
        Self {
            values: store.to_owned_snapshot(),
        }
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.value(field).and_then(Value::as_text)
    }

    pub fn is_empty(&self, field: &str) -> bool {
        self.value(field).is_none_or(Value::is_empty)
    }

    pub fn values(&self) -> &IndexMap<FieldId, Value> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<FieldId, Value> {
        self.values
    }
}
