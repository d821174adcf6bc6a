//! Traits describing read-only battle collaborators.
//!
//! Oracles expose the action template repository and the external pathfinder.
//! The [`Env`] aggregate bundles them so the engine can reach everything it
//! needs without hard coupling to concrete implementations.
mod error;
mod pathfinder;
mod snapshot;
mod templates;

pub use error::OracleError;
pub use pathfinder::{
    MovementModifiers, MovementPath, OpenFieldPathfinder, PathfinderOracle, SearchLimit,
    SearchResult,
};
pub use snapshot::SnapshotTemplateOracle;
pub use templates::{ActionTemplate, ActionTemplateOracle};

/// Aggregates read-only oracles required by the resolver, committer and engine.
pub struct Env<'a, T, P>
where
    T: ActionTemplateOracle + ?Sized,
    P: PathfinderOracle + ?Sized,
{
    templates: Option<&'a T>,
    pathfinder: Option<&'a P>,
}

impl<T, P> Clone for Env<'_, T, P>
where
    T: ActionTemplateOracle + ?Sized,
    P: PathfinderOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, P> Copy for Env<'_, T, P>
where
    T: ActionTemplateOracle + ?Sized,
    P: PathfinderOracle + ?Sized,
{
}

pub type BattleEnv<'a> = Env<'a, dyn ActionTemplateOracle + 'a, dyn PathfinderOracle + 'a>;

impl<'a, T, P> Env<'a, T, P>
where
    T: ActionTemplateOracle + ?Sized,
    P: PathfinderOracle + ?Sized,
{
    pub fn new(templates: Option<&'a T>, pathfinder: Option<&'a P>) -> Self {
        Self {
            templates,
            pathfinder,
        }
    }

    pub fn with_all(templates: &'a T, pathfinder: &'a P) -> Self {
        Self::new(Some(templates), Some(pathfinder))
    }

    pub fn empty() -> Self {
        Self {
            templates: None,
            pathfinder: None,
        }
    }

    /// Returns the ActionTemplateOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TemplatesNotAvailable` if no template oracle was provided.
    pub fn templates(&self) -> Result<&'a T, OracleError> {
        self.templates.ok_or(OracleError::TemplatesNotAvailable)
    }

    /// Returns the PathfinderOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::PathfinderNotAvailable` if no pathfinder was provided.
    pub fn pathfinder(&self) -> Result<&'a P, OracleError> {
        self.pathfinder.ok_or(OracleError::PathfinderNotAvailable)
    }
}

impl<'a, T, P> Env<'a, T, P>
where
    T: ActionTemplateOracle + 'a,
    P: PathfinderOracle + 'a,
{
    /// Converts this environment into a trait-object based `BattleEnv`.
    pub fn into_battle_env(self) -> BattleEnv<'a> {
        let templates: Option<&'a dyn ActionTemplateOracle> =
            self.templates.map(|templates| templates as _);
        let pathfinder: Option<&'a dyn PathfinderOracle> =
            self.pathfinder.map(|pathfinder| pathfinder as _);
        Env::new(templates, pathfinder)
    }
}
