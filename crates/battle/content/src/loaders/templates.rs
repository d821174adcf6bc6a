//! Action template loader.
//!
//! Loads action templates from RON data files. Each file holds a list of
//! `ActionTemplate` entries.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{ActionTemplate, ActionTemplateId, ActionTemplateOracle};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED: [(&str, &str); 2] = [
    ("basic.ron", include_str!("../../data/actions/basic.ron")),
    ("attack.ron", include_str!("../../data/actions/attack.ron")),
];

/// Registry of action templates, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ActionTemplateRegistry {
    templates: BTreeMap<ActionTemplateId, ActionTemplate>,
}

impl ActionTemplateRegistry {
    /// Loads all action templates from the embedded RON data files.
    pub fn load() -> LoadResult<Self> {
        let mut registry = Self::default();
        for (name, content) in EMBEDDED {
            registry.extend_from_str(name, content)?;
        }
        Ok(registry)
    }

    /// Loads action templates from a single RON file.
    pub fn load_from_path(path: &Path) -> LoadResult<Self> {
        let mut registry = Self::default();
        registry.merge_file(path)?;
        Ok(registry)
    }

    /// Adds the templates of another RON file to this registry.
    ///
    /// Fails if the file redefines an id already registered.
    pub fn merge_file(&mut self, path: &Path) -> LoadResult<()> {
        let content = read_file(path)?;
        self.extend_from_str(&path.display().to_string(), &content)
    }

    fn extend_from_str(&mut self, source: &str, content: &str) -> LoadResult<()> {
        let templates: Vec<ActionTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", source, e))?;

        let mut loaded = BTreeMap::new();
        for template in templates {
            if self.templates.contains_key(&template.id) || loaded.contains_key(&template.id) {
                anyhow::bail!("Duplicate action template '{}' in {}", template.id, source);
            }
            loaded.insert(template.id.clone(), template);
        }

        let count = loaded.len();
        self.templates.extend(loaded);

        debug!(source, count, total = self.templates.len(), "loaded action templates");
        Ok(())
    }

    pub fn get(&self, id: &ActionTemplateId) -> Option<&ActionTemplate> {
        self.templates.get(id)
    }

    /// Returns an iterator over all registered template ids.
    pub fn ids(&self) -> impl Iterator<Item = &ActionTemplateId> + '_ {
        self.templates.keys()
    }

    /// Returns templates carrying `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ActionTemplate> + 'a {
        self.templates
            .values()
            .filter(move |template| template.tags.iter().any(|t| t == tag))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl ActionTemplateOracle for ActionTemplateRegistry {
    fn action_template(&self, id: &ActionTemplateId) -> Option<ActionTemplate> {
        self.templates.get(id).cloned()
    }

    fn all_ids(&self) -> Vec<ActionTemplateId> {
        self.templates.keys().cloned().collect()
    }
}
