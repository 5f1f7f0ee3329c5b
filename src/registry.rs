//! Ordered component registry.
//!
//! The registry is the release order: every component's dependencies are
//! declared earlier in the list, so walking it front to back always releases
//! a dependency before its dependents.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::tools::ExternalTools;

type HookFn = dyn Fn() -> Result<()> + Send + Sync;

/// A named, zero-argument step run before committing a full release.
#[derive(Clone)]
pub struct PrecommitHook {
    name: String,
    action: Arc<HookFn>,
}

impl PrecommitHook {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        PrecommitHook {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    /// Builds a hook that runs each command line in order through `tools`,
    /// stopping at the first failure.
    pub fn from_commands(
        name: impl Into<String>,
        commands: Vec<String>,
        tools: Arc<dyn ExternalTools>,
    ) -> Result<Self> {
        let mut parsed = Vec::with_capacity(commands.len());
        for line in &commands {
            let mut words = line.split_whitespace().map(str::to_string);
            let program = words
                .next()
                .ok_or_else(|| ReleaseError::config("empty precommit command"))?;
            parsed.push((program, words.collect::<Vec<_>>()));
        }

        Ok(PrecommitHook::new(name, move || {
            for (program, args) in &parsed {
                tools.run_command(program, args)?;
            }
            Ok(())
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self) -> Result<()> {
        (self.action)()
    }
}

impl fmt::Debug for PrecommitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrecommitHook")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A single releasable repository.
///
/// The name doubles as the checkout directory under the workspace.
#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    pub dependencies: Vec<String>,
    pub precommit_hook: Option<PrecommitHook>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Component {
            name: name.into(),
            dependencies: Vec::new(),
            precommit_hook: None,
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_precommit_hook(mut self, hook: PrecommitHook) -> Self {
        self.precommit_hook = Some(hook);
        self
    }
}

/// The full, dependency-ordered list of components.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: Vec<Component>,
}

impl ComponentRegistry {
    /// Builds a registry, rejecting duplicate names and any dependency that
    /// is not declared earlier in the list.
    pub fn new(components: Vec<Component>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();

        for component in &components {
            for dependency in &component.dependencies {
                if !seen.contains(dependency.as_str()) {
                    return Err(ReleaseError::config(format!(
                        "component '{}' depends on '{}', which is not declared before it",
                        component.name, dependency
                    )));
                }
            }

            if !seen.insert(component.name.as_str()) {
                return Err(ReleaseError::config(format!(
                    "component '{}' is declared more than once",
                    component.name
                )));
            }
        }

        Ok(ComponentRegistry { components })
    }

    /// Builds the registry described by `config`, binding any precommit
    /// commands to `tools`.
    pub fn from_config(config: &Config, tools: Arc<dyn ExternalTools>) -> Result<Self> {
        let mut components = Vec::with_capacity(config.components.len());

        for entry in &config.components {
            let mut component =
                Component::new(entry.name.clone()).with_dependencies(entry.dependencies.clone());

            if !entry.precommit.is_empty() {
                let hook = PrecommitHook::from_commands(
                    format!("{}-precommit", entry.name),
                    entry.precommit.clone(),
                    Arc::clone(&tools),
                )?;
                component = component.with_precommit_hook(hook);
            }

            components.push(component);
        }

        ComponentRegistry::new(components)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Components from `start` (inclusive) to the end, or all of them when
    /// `start` is `None`. An unknown name is an error.
    pub fn components_from(&self, start: Option<&str>) -> Result<&[Component]> {
        let Some(name) = start else {
            return Ok(&self.components);
        };

        let index = self
            .components
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ReleaseError::NotFound {
                name: name.to_string(),
                available: self.names(),
            })?;

        Ok(&self.components[index..])
    }
}
