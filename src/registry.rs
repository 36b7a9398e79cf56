use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::info;

/// Labels shown to users and the Groq model ids they resolve to.
pub const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("Gemma2 💎", "gemma2-9b-it"),
    ("Llama3.1 🦙", "llama-3.1-8b-instant"),
    ("Mixtral New 🚀", "mixtral-8x7b-32768"),
];

pub const DEFAULT_LABEL: &str = "Llama3.1 🦙";

#[derive(Debug, Clone)]
struct ModelEntry {
    label: String,
    id: String,
}

/// Label to model-id table plus the active entry.
///
/// One instance is shared by every request through `AppState`. A selection
/// made by one client changes the model used by all later requests from any
/// client; callers should read the active id once per request.
#[derive(Debug)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    active: RwLock<usize>,
}

/// Outcome of [`ModelRegistry::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    Changed { label: String },
    Invalid,
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSelection::Changed { label } => write!(f, "Model changed to {label}"),
            ModelSelection::Invalid => f.write_str("Invalid model selected"),
        }
    }
}

impl ModelRegistry {
    /// Builds a registry from `(label, id)` pairs with `default_label` active.
    /// Returns `None` when the default label is not in the table.
    pub fn new<L, I>(models: impl IntoIterator<Item = (L, I)>, default_label: &str) -> Option<Self>
    where
        L: Into<String>,
        I: Into<String>,
    {
        let entries: Vec<ModelEntry> = models
            .into_iter()
            .map(|(label, id)| ModelEntry {
                label: label.into(),
                id: id.into(),
            })
            .collect();

        let active = entries.iter().position(|e| e.label == default_label)?;

        Some(Self {
            entries,
            active: RwLock::new(active),
        })
    }

    /// The built-in table with `default_label` active.
    pub fn with_defaults(default_label: &str) -> Option<Self> {
        Self::new(DEFAULT_MODELS.iter().copied(), default_label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn active_id(&self) -> String {
        self.entries[self.active_index()].id.clone()
    }

    pub fn active_label(&self) -> String {
        self.entries[self.active_index()].label.clone()
    }

    pub fn select(&self, label: &str) -> ModelSelection {
        let Some(index) = self.entries.iter().position(|e| e.label == label) else {
            info!(label, "ignoring unknown model label");
            return ModelSelection::Invalid;
        };

        *self.active.write().unwrap_or_else(PoisonError::into_inner) = index;
        info!(label, model_id = %self.entries[index].id, "active model changed");

        ModelSelection::Changed {
            label: label.to_string(),
        }
    }

    fn active_index(&self) -> usize {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ModelRegistry {
        ModelRegistry::with_defaults(DEFAULT_LABEL).unwrap()
    }

    #[test]
    fn starts_on_default_model() {
        let registry = registry();
        assert_eq!(registry.active_id(), "llama-3.1-8b-instant");
        assert_eq!(registry.active_label(), DEFAULT_LABEL);
    }

    #[test]
    fn select_known_label_switches_model() {
        let registry = registry();
        let outcome = registry.select("Gemma2 💎");

        assert_eq!(outcome.to_string(), "Model changed to Gemma2 💎");
        assert_eq!(registry.active_id(), "gemma2-9b-it");
    }

    #[test]
    fn select_unknown_label_keeps_active_model() {
        let registry = registry();
        registry.select("Mixtral New 🚀");

        let outcome = registry.select("unknown-label");

        assert_eq!(outcome, ModelSelection::Invalid);
        assert_eq!(outcome.to_string(), "Invalid model selected");
        assert_eq!(registry.active_id(), "mixtral-8x7b-32768");
    }

    #[test]
    fn labels_are_exact_matches() {
        let registry = registry();
        assert_eq!(registry.select("Gemma2"), ModelSelection::Invalid);
        assert_eq!(registry.select("gemma2-9b-it"), ModelSelection::Invalid);
    }

    #[test]
    fn labels_keep_table_order() {
        assert_eq!(
            registry().labels(),
            vec!["Gemma2 💎", "Llama3.1 🦙", "Mixtral New 🚀"]
        );
    }

    #[test]
    fn unknown_default_is_rejected() {
        assert!(ModelRegistry::with_defaults("GPT-9").is_none());
    }
}
