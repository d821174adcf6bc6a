//! Snapshot-backed oracle adapters.
//!
//! A snapshot captures template data once so that replays and tests run
//! against a fixed repository regardless of what content is loaded later.

use std::collections::BTreeMap;

use super::{ActionTemplate, ActionTemplateOracle};
use crate::state::ActionTemplateId;

/// Action template repository frozen into a map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotTemplateOracle {
    templates: BTreeMap<ActionTemplateId, ActionTemplate>,
}

impl SnapshotTemplateOracle {
    pub fn new(templates: impl IntoIterator<Item = ActionTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.id.clone(), template))
                .collect(),
        }
    }

    /// Captures every template the oracle reports through [`ActionTemplateOracle::all_ids`].
    pub fn from_oracle(oracle: &dyn ActionTemplateOracle) -> Self {
        Self::new(
            oracle
                .all_ids()
                .iter()
                .filter_map(|id| oracle.action_template(id)),
        )
    }

    pub fn insert(&mut self, template: ActionTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl ActionTemplateOracle for SnapshotTemplateOracle {
    fn action_template(&self, id: &ActionTemplateId) -> Option<ActionTemplate> {
        self.templates.get(id).cloned()
    }

    fn all_ids(&self) -> Vec<ActionTemplateId> {
        self.templates.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_oracle_trait() {
        let original = SnapshotTemplateOracle::new([
            ActionTemplate::new("strike", "Strike", 1),
            ActionTemplate::new("fireball", "Fireball", 2),
        ]);

        let copy = SnapshotTemplateOracle::from_oracle(&original);
        assert_eq!(copy, original);
        assert_eq!(copy.action_point_cost(&"fireball".into()), Some(2));
        assert_eq!(copy.action_point_cost(&"unknown".into()), None);
    }
}
