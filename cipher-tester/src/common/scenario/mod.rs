pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::catalog_scenarios;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Registered scenario: CLI key, display name and plan builder.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioEntry {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub name: &'static str,
    pub build: fn() -> SimulationPlan,
}

impl ScenarioEntry {
    fn matches(&self, name: &str) -> bool {
        self.key == name || self.aliases.contains(&name)
    }

    pub fn scenario(&self) -> TestScenario {
        TestScenario::simulation(self.name, (self.build)())
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let name = name.to_lowercase();
    catalog_scenarios()
        .iter()
        .find(|entry| entry.matches(&name))
        .map(ScenarioEntry::scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|entry| (entry.key, entry.name))
        .collect()
}

/// Expand `all` into every registered key, keeping any other names as given.
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = names.iter().filter(|s| *s != "all").cloned().collect();
    if names.iter().any(|s| s == "all") {
        for (key, _) in list_scenarios() {
            if !expanded.iter().any(|s| s == key) {
                expanded.push(key.to_string());
            }
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_aliases_resolve() {
        assert_eq!(get_scenario("smoke").unwrap().name, "Smoke Test");
        assert_eq!(get_scenario("FULL-CLEAR").unwrap().name, "Full Campaign Clear");
        assert!(get_scenario("replay").is_some());
        assert!(get_scenario("nope").is_none());
    }

    #[test]
    fn all_expands_to_every_scenario_once() {
        let expanded = expand_scenarios(&["smoke".to_string(), "all".to_string()]);
        assert_eq!(expanded.len(), list_scenarios().len());
        assert_eq!(expanded[0], "smoke");
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = list_scenarios().into_iter().map(|(k, _)| k).collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }
}
