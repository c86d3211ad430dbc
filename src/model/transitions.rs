//! Static transition validity tables and per-relationship rule checks.
//!
//! Two tables: the broad table lists every `(source kind, destination kind)`
//! pair that may be connected at all; the complex table lists the pairs that
//! support the full relationship type set. Every other valid pair is "simple"
//! and supports only `Then`.

use super::types::{Project, RelationshipType, StateKind, WorkflowState};
use crate::error::CompilerError;

use RelationshipType::*;
use StateKind::*;

/// Every block-kind pair that may be connected by any relationship.
pub const VALID_TRANSITIONS: &[(StateKind, StateKind)] = &[
    (Lambda, Lambda),
    (Lambda, Topic),
    (Lambda, Queue),
    (Lambda, ApiResponse),
    (Topic, Lambda),
    (Queue, Lambda),
    (Timer, Lambda),
    (ApiEndpoint, Lambda),
];

/// Pairs that support the full relationship type set. Everything else in the
/// broad table is `Then`-only.
pub const COMPLEX_TRANSITIONS: &[(StateKind, StateKind)] = &[(Lambda, Lambda)];

const COMPLEX_TYPES: &[RelationshipType] = &[Then, If, Else, Exception, FanOut, FanIn];
const SIMPLE_TYPES: &[RelationshipType] = &[Then];
const NO_TYPES: &[RelationshipType] = &[];

/// True iff the pair appears in the broad table.
pub fn is_valid_transition(source: StateKind, destination: StateKind) -> bool {
    VALID_TRANSITIONS.contains(&(source, destination))
}

/// The relationship types allowed between two block kinds. Empty for pairs
/// that may not be connected at all.
pub fn allowed_types_for(source: StateKind, destination: StateKind) -> &'static [RelationshipType] {
    if COMPLEX_TRANSITIONS.contains(&(source, destination)) {
        COMPLEX_TYPES
    } else if is_valid_transition(source, destination) {
        SIMPLE_TYPES
    } else {
        NO_TYPES
    }
}

/// Check every relationship against the tables and the guard-expression rule.
/// Returns all errors found.
pub fn validate_relationships(project: &Project) -> Vec<CompilerError> {
    let mut errors = Vec::new();

    for rel in &project.workflow_relationships {
        let source = project.workflow_states.iter().find(|s| s.id() == rel.source);
        let target = project.workflow_states.iter().find(|s| s.id() == rel.target);

        let (Some(source), Some(target)) = (source, target) else {
            // Endpoint existence is ProjectGraph::build's error; skip here.
            continue;
        };

        rule_pair_is_allowed(rel.id.as_str(), source, target, rel.transition_type, &mut errors);
        rule_guard_expression(rel.id.as_str(), rel.transition_type, rel.expression.as_deref(), &mut errors);
    }

    errors
}

fn rule_pair_is_allowed(
    rel_id: &str,
    source: &WorkflowState,
    target: &WorkflowState,
    transition_type: RelationshipType,
    errors: &mut Vec<CompilerError>,
) {
    let allowed = allowed_types_for(source.kind(), target.kind());
    if allowed.is_empty() {
        errors.push(CompilerError::InvalidRelationship {
            id: rel_id.to_string(),
            message: format!(
                "'{}' may not transition to '{}'",
                source.name(),
                target.name()
            ),
        });
    } else if !allowed.contains(&transition_type) {
        errors.push(CompilerError::InvalidRelationship {
            id: rel_id.to_string(),
            message: format!(
                "transition type {:?} is not allowed from '{}' to '{}'",
                transition_type,
                source.name(),
                target.name()
            ),
        });
    }
}

fn rule_guard_expression(
    rel_id: &str,
    transition_type: RelationshipType,
    expression: Option<&str>,
    errors: &mut Vec<CompilerError>,
) {
    match transition_type {
        If if expression.is_none_or(|e| e.trim().is_empty()) => {
            errors.push(CompilerError::InvalidRelationship {
                id: rel_id.to_string(),
                message: "if transition requires a guard expression".into(),
            });
        }
        If => {}
        _ if expression.is_some() => {
            errors.push(CompilerError::InvalidRelationship {
                id: rel_id.to_string(),
                message: format!(
                    "transition type {:?} must not carry a guard expression",
                    transition_type
                ),
            });
        }
        _ => {}
    }
}
