//! Specialist registry - specialty tag to agent handle lookup.
//!
//! One agent per specialty tag; the orchestrator validates a requested
//! panel against this registry before fanning out.

use crate::ports::specialist::SpecialistAgent;
use consilium_domain::Specialty;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry mapping specialty tags to agent handles
#[derive(Default)]
pub struct SpecialistRegistry {
    agents: HashMap<Specialty, Arc<dyn SpecialistAgent>>,
}

impl SpecialistRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register an agent under its declared specialty.
    ///
    /// A later registration for the same tag replaces the earlier one.
    pub fn register(&mut self, agent: Arc<dyn SpecialistAgent>) {
        self.agents.insert(agent.specialty(), agent);
    }

    /// Look up the agent for a specialty
    pub fn get(&self, specialty: Specialty) -> Option<Arc<dyn SpecialistAgent>> {
        self.agents.get(&specialty).map(Arc::clone)
    }

    /// Look up an agent that is registered *and* currently available
    pub fn get_available(&self, specialty: Specialty) -> Option<Arc<dyn SpecialistAgent>> {
        self.get(specialty).filter(|agent| agent.is_available())
    }

    /// Resolve a requested panel to the available agents, preserving
    /// request order. Unregistered or unavailable tags are dropped.
    pub fn resolve_available(&self, requested: &[Specialty]) -> Vec<Arc<dyn SpecialistAgent>> {
        requested
            .iter()
            .filter_map(|specialty| self.get_available(*specialty))
            .collect()
    }

    /// All registered specialty tags
    pub fn specialties(&self) -> Vec<Specialty> {
        let mut tags: Vec<Specialty> = self.agents.keys().copied().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSpecialist;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = SpecialistRegistry::new();
        registry.register(Arc::new(MockSpecialist::new(
            "pain-1",
            Specialty::PainManagement,
        )));
        registry.register(Arc::new(MockSpecialist::new("move-1", Specialty::Movement)));

        let resolved = registry.resolve_available(&[
            Specialty::Movement,
            Specialty::Psychology, // not registered
            Specialty::PainManagement,
        ]);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].specialty(), Specialty::Movement);
        assert_eq!(resolved[1].specialty(), Specialty::PainManagement);
    }

    #[test]
    fn test_unavailable_agents_are_dropped() {
        let mut registry = SpecialistRegistry::new();
        registry.register(Arc::new(
            MockSpecialist::new("psy-1", Specialty::Psychology).unavailable(),
        ));

        assert!(registry.get(Specialty::Psychology).is_some());
        assert!(registry.get_available(Specialty::Psychology).is_none());
        assert!(registry.resolve_available(&[Specialty::Psychology]).is_empty());
    }

    #[test]
    fn test_later_registration_replaces() {
        let mut registry = SpecialistRegistry::new();
        registry.register(Arc::new(MockSpecialist::new("coord-1", Specialty::Coordination)));
        registry.register(Arc::new(MockSpecialist::new("coord-2", Specialty::Coordination)));

        assert_eq!(registry.len(), 1);
        let agent = registry.get(Specialty::Coordination).unwrap();
        assert_eq!(agent.id().as_str(), "coord-2");
    }
}
