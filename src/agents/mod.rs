//! Agent registry: agent-type identifiers mapped to factory functions.

mod adaptive;
mod random;

pub use adaptive::{AdaptiveAgent, Checkpoint, CHECKPOINT_DIR};
pub use random::RandomAgent;

use crate::models::Agent;
use std::collections::BTreeMap;

/// Identifier of the default learning agent.
pub const DEFAULT_AGENT: &str = "Agent";

/// Construction parameters for one roster entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgentSpec {
    pub agent_type: String,
    pub name: String,
    pub character: String,
    /// Resume from a saved checkpoint if the agent supports it.
    pub load: bool,
}

pub type AgentFactory = fn(&AgentSpec) -> Box<dyn Agent>;

fn build_adaptive(spec: &AgentSpec) -> Box<dyn Agent> {
    if spec.load {
        Box::new(AdaptiveAgent::load(spec.name.clone(), spec.character.clone()))
    } else {
        Box::new(AdaptiveAgent::new(spec.name.clone(), spec.character.clone()))
    }
}

fn build_random(spec: &AgentSpec) -> Box<dyn Agent> {
    Box::new(RandomAgent::new(spec.name.clone(), spec.character.clone()))
}

#[derive(Clone, Default)]
pub struct AgentRegistry {
    factories: BTreeMap<String, AgentFactory>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `Agent` and `RandomAgent`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_AGENT, build_adaptive);
        registry.register("RandomAgent", build_random);
        registry
    }

    /// Add or replace a factory.
    pub fn register(&mut self, agent_type: impl Into<String>, factory: AgentFactory) {
        self.factories.insert(agent_type.into(), factory);
    }

    pub fn contains(&self, agent_type: &str) -> bool {
        self.factories.contains_key(agent_type)
    }

    pub fn agent_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// `None` if the agent type is not registered.
    pub fn build(&self, spec: &AgentSpec) -> Option<Box<dyn Agent>> {
        self.factories.get(&spec.agent_type).map(|factory| factory(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(agent_type: &str) -> AgentSpec {
        AgentSpec {
            agent_type: agent_type.to_string(),
            name: "Fighter".to_string(),
            character: "chunli".to_string(),
            load: false,
        }
    }

    #[test]
    fn builtins_resolve_by_identifier() {
        let registry = AgentRegistry::with_builtins();
        assert_eq!(registry.agent_types().collect::<Vec<_>>(), ["Agent", "RandomAgent"]);
        let agent = registry.build(&spec("RandomAgent")).unwrap();
        assert_eq!(agent.name(), "Fighter");
        assert_eq!(agent.character(), "chunli");
        assert!(registry.build(&spec("Missing")).is_none());
    }

    #[test]
    fn custom_factories_can_be_registered() {
        fn always_random(spec: &AgentSpec) -> Box<dyn Agent> {
            Box::new(RandomAgent::new(format!("{}!", spec.name), spec.character.clone()))
        }
        let mut registry = AgentRegistry::new();
        assert!(!registry.contains("Bot"));
        registry.register("Bot", always_random);
        let agent = registry.build(&spec("Bot")).unwrap();
        assert_eq!(agent.name(), "Fighter!");
    }
}
