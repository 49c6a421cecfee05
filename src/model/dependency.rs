use std::collections::{HashMap, HashSet};

use super::task::Task;

/// Maps each prerequisite id to the ids of the tasks that depend on it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build from normalized tasks. Edge order follows task order.
    pub fn build(tasks: &[Task]) -> Self {
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for task in tasks {
            for dep in &task.dependencies {
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(task.id.clone());
            }
        }
        Self { dependents }
    }

    /// Direct dependents of `id`.
    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every task that transitively depends on `id`, in discovery order,
    /// each id once.
    ///
    /// Expansion is breadth-first. Each round collects the dependents of the
    /// current frontier and only admits ids that were not part of that
    /// round's own seed set into the next frontier; there is no global
    /// visited set, so a node reachable along two paths is expanded once
    /// per path. The loop also stops once a round discovers nothing new,
    /// which keeps cyclic input finite without changing the result.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut frontier: Vec<&str> = vec![id];

        while !frontier.is_empty() {
            let round: Vec<&str> = frontier
                .iter()
                .flat_map(|seed| self.dependents_of(seed))
                .map(String::as_str)
                .collect();

            let mut discovered = false;
            for dep in &round {
                if seen.insert(*dep) {
                    out.push((*dep).to_string());
                    discovered = true;
                }
            }
            if !discovered {
                break;
            }

            frontier = round
                .into_iter()
                .filter(|dep| !frontier.contains(dep))
                .collect();
        }

        out
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
