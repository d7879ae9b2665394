//! Scripted scenarios replayed against a select controller.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use droplist::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors raised while loading or replaying a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid select config: {0}")]
    Config(#[from] droplist::ConfigError),

    /// A step names a key no item was declared with.
    #[error("Step {step}: no item with key {key}")]
    UnknownKey { step: usize, key: Value },
}

/// An item declared up front or added by a step.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub key: Value,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

/// One user or form action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Open,
    Close,
    Toggle,
    /// Click an item.
    Activate { key: Value },
    /// Push a value from the form side.
    Write { key: Option<Value> },
    Add(ItemEntry),
    Remove { key: Value },
    DisableItem { key: Value, disabled: bool },
    SetDisabled { disabled: bool },
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SelectConfig<Value>,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// State observed after a step.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub step: usize,
    pub value: SelectValue<Value>,
    pub label: String,
    pub open: bool,
    /// Values emitted by the step, in order.
    pub emitted: Vec<SelectValue<Value>>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(text)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// Replay every step and collect what the control showed after each.
    pub fn run(self) -> Result<Vec<Outcome>, ScenarioError> {
        let registry = ItemRegistry::new();
        let mut handles: HashMap<String, ItemHandle> = HashMap::new();
        for item in self.items {
            declare(&registry, &mut handles, item);
        }

        let mut select = SelectController::new(self.config, &registry);
        let mut changes = select.value_changes();
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.into_iter().enumerate() {
            let number = index + 1;
            log::debug!("step {}: {:?}", number, step);

            match step {
                Step::Open => select.open(),
                Step::Close => select.close(),
                Step::Toggle => select.toggle(),
                Step::Activate { key } => {
                    let handle = lookup(&handles, number, &key)?;
                    if !registry.activate(handle) {
                        log::debug!("step {}: activation of {} not delivered", number, key);
                    }
                }
                Step::Write { key } => select.write_value(key),
                Step::Add(item) => declare(&registry, &mut handles, item),
                Step::Remove { key } => {
                    let handle = lookup(&handles, number, &key)?;
                    registry.deregister(handle);
                    handles.remove(&key.to_string());
                }
                Step::DisableItem { key, disabled } => {
                    let handle = lookup(&handles, number, &key)?;
                    registry.set_disabled(handle, disabled);
                }
                Step::SetDisabled { disabled } => select.set_disabled_state(disabled),
            }
            select.dispatch();

            let emitted = std::iter::from_fn(|| changes.try_recv().ok()).collect();
            outcomes.push(Outcome {
                step: number,
                value: select.value(),
                label: select.label().to_string(),
                open: select.is_open(),
                emitted,
            });
        }

        Ok(outcomes)
    }
}

// JSON values are not hashable, so items are indexed by their serialized key.
fn declare(registry: &ItemRegistry<Value>, handles: &mut HashMap<String, ItemHandle>, item: ItemEntry) {
    let index = item.key.to_string();
    let handle = registry.register(ItemDescriptor::new(item.key, item.label).with_disabled(item.disabled));
    handles.insert(index, handle);
}

fn lookup(handles: &HashMap<String, ItemHandle>, step: usize, key: &Value) -> Result<ItemHandle, ScenarioError> {
    handles
        .get(&key.to_string())
        .copied()
        .ok_or_else(|| ScenarioError::UnknownKey {
            step,
            key: key.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "config": { "placeholder": "Choose a item" },
        "items": [
            { "key": 1, "label": "a" },
            { "key": 2, "label": "b" }
        ],
        "steps": [
            { "action": "open" },
            { "action": "activate", "key": 2 },
            { "action": "write", "key": 1 },
            { "action": "remove", "key": 1 }
        ]
    }"#;

    #[test]
    fn replays_single_select_steps() {
        let outcomes = Scenario::parse(SCENARIO).unwrap().run().unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].open);
        assert_eq!(outcomes[0].label, "Choose a item");

        assert_eq!(outcomes[1].label, "b");
        assert!(!outcomes[1].open);
        assert_eq!(outcomes[1].emitted, vec![SelectValue::Single(Some(Value::from(2)))]);

        assert_eq!(outcomes[2].value, SelectValue::Single(Some(Value::from(1))));
        assert_eq!(outcomes[3].label, "Choose a item");
        assert!(outcomes[3].emitted.is_empty());
    }

    #[test]
    fn unknown_key_is_reported() {
        let text = r#"{ "steps": [ { "action": "activate", "key": "missing" } ] }"#;
        let err = Scenario::parse(text).unwrap().run().unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownKey { step: 1, .. }));
    }

    #[test]
    fn multi_scenario_keeps_overlay_open() {
        let text = r#"{
            "config": { "mode": "multi", "value": [] },
            "items": [ { "key": "x", "label": "X" }, { "key": "y", "label": "Y" } ],
            "steps": [
                { "action": "open" },
                { "action": "activate", "key": "y" },
                { "action": "activate", "key": "x" }
            ]
        }"#;
        let outcomes = Scenario::parse(text).unwrap().run().unwrap();

        let last = outcomes.last().unwrap();
        assert!(last.open);
        assert_eq!(last.label, "X Y");
        assert_eq!(
            last.value,
            SelectValue::Multi(vec![Value::from("y"), Value::from("x")])
        );
    }
}
