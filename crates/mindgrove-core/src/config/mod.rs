//! Engine configuration.
//!
//! Settings are kept as a JSON object addressed by dotted paths (`layout.verticalSpacing`), so
//! hosts can pass through whatever they persisted without a schema migration. Typed views
//! (`LayoutOptions`, `HistoryManager::from_config`, ...) read from it with defaults.

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig(Value);

impl Default for EngineConfig {
    fn default() -> Self {
        Self(default_config_value())
    }
}

fn default_config_value() -> Value {
    json!({
        "layout": {
            "direction": "horizontal",
            "strategy": "balancedTree",
            "auto": false,
            "horizontalSpacing": 200.0,
            "verticalSpacing": 80.0,
            "nodeSep": 50.0,
            "rankSep": 50.0,
            "edgeSep": 20.0,
            "baseRadius": 200.0,
            "radiusIncrement": 150.0,
            "defaultNodeWidth": 180.0,
            "defaultNodeHeight": 50.0
        },
        "history": {
            "capacity": 50
        },
        "clipboard": {
            "offsetStep": 20.0
        }
    })
}

impl EngineConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Built-in defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut config = Self::default();
        config.deep_merge(overrides);
        config
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    /// Finite numbers only; anything else yields `None`.
    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?
            .as_f64()
            .filter(|v| v.is_finite())
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        let value = self.lookup(dotted_path)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
        })
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Callers can build a config from any JSON value via `from_value`; coerce non-objects so
        // this never panics on host input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
