use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque snapshot of a piece of state, only ever displayed or compared.
///
/// Serialized with an explicit tag so that `Unset` and a JSON `null` stay
/// distinct: `{"kind":"unset"}` and `{"kind":"value","value":null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StateValue {
    /// No previous value: the state is being set for the first time
    Unset,
    Value(serde_json::Value),
}

impl StateValue {
    /// Snapshot any serializable value.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => StateValue::Value(value),
            Err(e) => {
                tracing::warn!(error = %e, "State value is not serializable");
                StateValue::Value(serde_json::Value::String(format!(
                    "<{}>",
                    std::any::type_name::<T>()
                )))
            }
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, StateValue::Unset)
    }
}

impl From<serde_json::Value> for StateValue {
    fn from(value: serde_json::Value) -> Self {
        StateValue::Value(value)
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Unset => f.write_str("undefined"),
            StateValue::Value(serde_json::Value::String(s)) => f.write_str(s),
            StateValue::Value(value) => write!(f, "{}", value),
        }
    }
}

/// One captured state transition. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangeRecord {
    pub from_value: StateValue,
    pub to_value: StateValue,
    /// Name of the mutated binding, or the configured placeholder
    pub property_name: String,
    /// Trimmed trace with original positions
    pub annotated_trace: String,
    /// Untouched trace, kept for debugging the annotator itself
    pub full_trace: String,
    pub source_line_preview: String,
}

impl StateChangeRecord {
    pub fn is_initial_value(&self) -> bool {
        self.from_value.is_unset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(StateValue::Unset.to_string(), "undefined");
        assert_eq!(StateValue::of(&"hello").to_string(), "hello");
        assert_eq!(StateValue::of(&3).to_string(), "3");
        assert_eq!(StateValue::from(json!({"a": [1, 2]})).to_string(), r#"{"a":[1,2]}"#);
    }

    fn record(from_value: StateValue) -> StateChangeRecord {
        StateChangeRecord {
            to_value: StateValue::of(&0),
            property_name: "count".to_string(),
            annotated_trace: format!("StateChangeEvent (from: {}, to: 0)", from_value),
            full_trace: format!("StateChangeEvent (from: {}, to: 0)", from_value),
            source_line_preview: String::new(),
            from_value,
        }
    }

    #[test]
    fn test_unset_and_null_serialize_differently() {
        let unset = serde_json::to_value(record(StateValue::Unset)).unwrap();
        assert_eq!(unset["from_value"], json!({"kind": "unset"}));
        assert_eq!(unset["to_value"], json!({"kind": "value", "value": 0}));

        let null = serde_json::to_value(record(StateValue::from(json!(null)))).unwrap();
        assert_eq!(null["from_value"], json!({"kind": "value", "value": null}));
    }

    #[test]
    fn test_json_round_trip_keeps_initial_value_flag() {
        for from_value in [StateValue::Unset, StateValue::from(json!(null))] {
            let before = record(from_value);
            let text = serde_json::to_string(&before).unwrap();
            let after: StateChangeRecord = serde_json::from_str(&text).unwrap();

            assert_eq!(after.is_initial_value(), before.is_initial_value());
            assert_eq!(after, before);
        }
    }
}
