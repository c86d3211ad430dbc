//! Translate non-Compute-Block predecessors into provider event objects.

use std::collections::HashMap;

use crate::layout::naming::slugify;
use crate::model::graph::ProjectGraph;
use crate::model::types::{Project, WorkflowState};

/// A provider-specific event source attached to a compute function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Schedule { expression: String },
    Sns { topic: String },
    Sqs { queue: String, batch_size: u32 },
    Http { path: String, method: String },
}

/// Build the block-id → incoming-event map by scanning every relationship
/// whose source is a non-Compute-Block state feeding a Compute Block.
pub fn collect_events(
    project: &Project,
    graph: &ProjectGraph,
) -> HashMap<String, Vec<TriggerEvent>> {
    let mut events: HashMap<String, Vec<TriggerEvent>> = HashMap::new();

    for state in &project.workflow_states {
        let Some(block) = state.as_compute_block() else {
            continue;
        };

        for (source_id, _) in graph.predecessors(&block.id) {
            let Some(source) = project
                .workflow_states
                .iter()
                .find(|s| s.id() == source_id)
            else {
                continue;
            };
            if let Some(event) = event_for_source(source) {
                events.entry(block.id.clone()).or_default().push(event);
            }
        }
    }

    events
}

fn event_for_source(source: &WorkflowState) -> Option<TriggerEvent> {
    match source {
        WorkflowState::Timer(timer) => Some(TriggerEvent::Schedule {
            expression: timer.schedule_expression.clone(),
        }),
        WorkflowState::Topic(topic) => Some(TriggerEvent::Sns {
            topic: slugify(&topic.name),
        }),
        WorkflowState::Queue(queue) => Some(TriggerEvent::Sqs {
            queue: slugify(&queue.name),
            batch_size: queue.batch_size,
        }),
        WorkflowState::ApiEndpoint(endpoint) => Some(TriggerEvent::Http {
            path: endpoint.api_path.clone(),
            method: endpoint.http_method.to_lowercase(),
        }),
        // Another Compute Block invokes directly; that is not an event source.
        WorkflowState::Lambda(_) | WorkflowState::ApiResponse(_) => None,
    }
}
