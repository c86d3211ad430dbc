//! petgraph-based directed graph wrapper over a project's relationships.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{Project, RelationshipType};
use crate::error::CompilerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    pub relationship_id: String,
    pub transition_type: RelationshipType,
}

#[derive(Debug)]
pub struct ProjectGraph {
    pub graph: DiGraph<String, EdgeLabel>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl ProjectGraph {
    pub fn build(project: &Project) -> Result<Self, Vec<CompilerError>> {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut errors = Vec::new();

        for state in &project.workflow_states {
            let id = state.id().to_string();
            let idx = graph.add_node(id.clone());
            node_indices.insert(id, idx);
        }

        for rel in &project.workflow_relationships {
            let source_idx = node_indices.get(&rel.source);
            let target_idx = node_indices.get(&rel.target);

            match (source_idx, target_idx) {
                (Some(&s), Some(&t)) => {
                    graph.add_edge(
                        s,
                        t,
                        EdgeLabel {
                            relationship_id: rel.id.clone(),
                            transition_type: rel.transition_type,
                        },
                    );
                }
                (None, _) => {
                    errors.push(CompilerError::InvalidRelationship {
                        id: rel.id.clone(),
                        message: format!("references unknown source state '{}'", rel.source),
                    });
                }
                (_, None) => {
                    errors.push(CompilerError::InvalidRelationship {
                        id: rel.id.clone(),
                        message: format!("references unknown target state '{}'", rel.target),
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProjectGraph {
            graph,
            node_indices,
        })
    }

    pub fn successors(&self, state_id: &str) -> Vec<(&str, &EdgeLabel)> {
        let Some(&idx) = self.node_indices.get(state_id) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .map(|n| {
                let edge_idx = self.graph.find_edge(idx, n).unwrap();
                (self.graph[n].as_str(), &self.graph[edge_idx])
            })
            .collect()
    }

    pub fn predecessors(&self, state_id: &str) -> Vec<(&str, &EdgeLabel)> {
        let Some(&idx) = self.node_indices.get(state_id) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .map(|n| {
                let edge_idx = self.graph.find_edge(n, idx).unwrap();
                (self.graph[n].as_str(), &self.graph[edge_idx])
            })
            .collect()
    }

    pub fn incoming_count(&self, state_id: &str) -> usize {
        self.predecessors(state_id).len()
    }
}
