// src/plan/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::errors::StructuralError;
use crate::plan::model::ExecutionPlan;
use crate::types::TaskId;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct PlanNode {
    /// Direct dependencies, in the order the plan lists them (deduplicated).
    deps: Vec<TaskId>,
    /// Direct dependents: tasks that list this one as a dependency.
    dependents: Vec<TaskId>,
}

/// Adjacency view of an [`ExecutionPlan`], keyed by task id.
///
/// Construction checks everything that can be checked without running the
/// plan: ids are positive and unique, every dependency refers to a task in
/// the plan, and no task depends on itself. Cycles are *not* rejected here;
/// the wave driver discovers them when it runs out of ready tasks, so that
/// outcomes recorded before the stall are still reported.
#[derive(Debug, Clone)]
pub struct PlanGraph {
    nodes: BTreeMap<TaskId, PlanNode>,
}

impl PlanGraph {
    pub fn from_plan(plan: &ExecutionPlan) -> Result<Self, StructuralError> {
        let mut nodes: BTreeMap<TaskId, PlanNode> = BTreeMap::new();

        for task in &plan.tasks {
            if task.id == 0 {
                return Err(StructuralError::InvalidTaskId(task.id));
            }
            if nodes.contains_key(&task.id) {
                return Err(StructuralError::DuplicateTaskId(task.id));
            }

            let mut seen = BTreeSet::new();
            let deps = task
                .dependencies
                .iter()
                .copied()
                .filter(|dep| seen.insert(*dep))
                .collect();

            nodes.insert(
                task.id,
                PlanNode {
                    deps,
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: check edges and populate dependents.
        let ids: Vec<TaskId> = nodes.keys().copied().collect();
        for id in ids {
            let deps = nodes.get(&id).map(|n| n.deps.clone()).unwrap_or_default();
            for dep in deps {
                if dep == id {
                    return Err(StructuralError::SelfDependency(id));
                }
                match nodes.get_mut(&dep) {
                    Some(dep_node) => dep_node.dependents.push(id),
                    None => {
                        return Err(StructuralError::UnknownDependency {
                            task: id,
                            dependency: dep,
                        });
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All task ids, ascending.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.nodes.keys().copied()
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, id: TaskId) -> &[TaskId] {
        self.nodes
            .get(&id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Every task that waits on one of `roots`, directly or transitively,
    /// excluding the roots themselves. Ascending.
    pub fn downstream_of(&self, roots: &[TaskId]) -> Vec<TaskId> {
        let mut seen: BTreeSet<TaskId> = roots.iter().copied().collect();
        let mut stack: Vec<TaskId> = roots.to_vec();
        let mut downstream = BTreeSet::new();

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            for &dependent in &node.dependents {
                if seen.insert(dependent) {
                    downstream.insert(dependent);
                    stack.push(dependent);
                }
            }
        }

        downstream.into_iter().collect()
    }

    /// Find one dependency cycle among `candidates`, for diagnostics.
    ///
    /// Returns the ids of a strongly connected component with more than one
    /// member, ascending.
    pub fn find_cycle(&self, candidates: &BTreeSet<TaskId>) -> Option<Vec<TaskId>> {
        // Edge direction: dep -> task.
        let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();
        for &id in candidates {
            graph.add_node(id);
        }
        for &id in candidates {
            for &dep in self.dependencies_of(id) {
                if candidates.contains(&dep) {
                    graph.add_edge(dep, id, ());
                }
            }
        }

        tarjan_scc(&graph)
            .into_iter()
            .find(|component| component.len() > 1)
            .map(|mut component| {
                component.sort_unstable();
                component
            })
    }
}
