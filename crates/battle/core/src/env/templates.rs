//! Action template oracle.
//!
//! Provides access to the static definitions of named actions.

use crate::state::ActionTemplateId;

/// Static definition of a named action a squaddie can use.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTemplate {
    pub id: ActionTemplateId,
    pub name: String,
    /// Action points consumed when the action is used.
    pub action_point_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
}

impl ActionTemplate {
    pub fn new(id: impl Into<ActionTemplateId>, name: impl Into<String>, cost: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            action_point_cost: cost,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Oracle providing action templates by id.
///
/// Lookups may miss while content is still loading; callers decide how to
/// treat an absent template.
pub trait ActionTemplateOracle: Send + Sync {
    fn action_template(&self, id: &ActionTemplateId) -> Option<ActionTemplate>;

    /// Point cost of a template, if it is known.
    fn action_point_cost(&self, id: &ActionTemplateId) -> Option<u32> {
        self.action_template(id)
            .map(|template| template.action_point_cost)
    }

    /// Returns all known template ids.
    ///
    /// Used when capturing a snapshot of the repository.
    fn all_ids(&self) -> Vec<ActionTemplateId> {
        Vec::new()
    }
}
