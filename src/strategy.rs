//! Strategy Selector (C8): pluggable round-shaping consulted between
//! rounds. A pure function over a small `context -> modified_context +
//! action hint` value; the orchestrator retains final control over which
//! phase actually executes next.

use crate::model::ClusterSummary;

/// The four round-shaping strategies (§4.8). `Normal` is pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Normal,
    Mediated,
    ScopeReduced,
    PerspectiveShift,
}

/// What the selector was given to decide with.
pub struct StrategyContext<'a> {
    pub task_description: &'a str,
    pub disputed_items: &'a [ClusterSummary],
    /// Registration-order participant names, used to build the rotation
    /// for `PerspectiveShift`.
    pub participant_names: &'a [String],
}

/// The selector's output: a possibly-rewritten task description plus an
/// optional rotation to hand the orchestrator for `PerspectiveShift`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub task_description: String,
    /// `Some((arguer, argues_for))` pairs when the strategy is
    /// `PerspectiveShift`; empty otherwise. Built as a fixed rotation:
    /// `participant_names[i]` argues `participant_names[(i+1) % n]`'s
    /// position.
    pub rotation: Vec<(String, String)>,
}

/// Apply `strategy` to `context`, producing the next round's task
/// description and (for `PerspectiveShift`) a rotation table.
pub fn apply(strategy: Strategy, context: &StrategyContext<'_>) -> StrategyOutcome {
    match strategy {
        Strategy::Normal => StrategyOutcome {
            task_description: context.task_description.to_string(),
            rotation: Vec::new(),
        },
        Strategy::Mediated => StrategyOutcome {
            task_description: format!(
                "{}\n\n[A neutral facilitator asks all participants to restate their position clearly, noting any common ground before further argument.]",
                context.task_description
            ),
            rotation: Vec::new(),
        },
        Strategy::ScopeReduced => {
            let scoped: Vec<&str> = context
                .disputed_items
                .iter()
                .map(|c| c.representative_conclusion.as_str())
                .collect();
            let task_description = if scoped.is_empty() {
                context.task_description.to_string()
            } else {
                format!(
                    "{}\n\nFocus only on reconciling these disputed conclusions: {}",
                    context.task_description,
                    scoped.join("; ")
                )
            };
            StrategyOutcome { task_description, rotation: Vec::new() }
        }
        Strategy::PerspectiveShift => {
            let n = context.participant_names.len();
            let rotation = if n < 2 {
                Vec::new()
            } else {
                (0..n)
                    .map(|i| (context.participant_names[i].clone(), context.participant_names[(i + 1) % n].clone()))
                    .collect()
            };
            StrategyOutcome {
                task_description: context.task_description.to_string(),
                rotation,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(names: &'a [String], disputed: &'a [ClusterSummary]) -> StrategyContext<'a> {
        StrategyContext {
            task_description: "choose a gateway",
            disputed_items: disputed,
            participant_names: names,
        }
    }

    #[test]
    fn normal_is_pass_through() {
        let names = vec!["a".to_string()];
        let outcome = apply(Strategy::Normal, &context(&names, &[]));
        assert_eq!(outcome.task_description, "choose a gateway");
        assert!(outcome.rotation.is_empty());
    }

    #[test]
    fn mediated_appends_facilitator_instruction_without_changing_topology() {
        let names = vec!["a".to_string()];
        let outcome = apply(Strategy::Mediated, &context(&names, &[]));
        assert!(outcome.task_description.contains("choose a gateway"));
        assert!(outcome.task_description.contains("facilitator"));
        assert!(outcome.rotation.is_empty());
    }

    #[test]
    fn scope_reduced_narrows_to_disputed_conclusions() {
        let names = vec!["a".to_string()];
        let disputed = vec![ClusterSummary {
            representative_conclusion: "Kong".into(),
            participant_names: vec!["a".into()],
            size: 1,
        }];
        let outcome = apply(Strategy::ScopeReduced, &context(&names, &disputed));
        assert!(outcome.task_description.contains("Kong"));
    }

    #[test]
    fn perspective_shift_rotates_in_fixed_order() {
        let names: Vec<String> = ["a", "b", "c"].into_iter().map(String::from).collect();
        let outcome = apply(Strategy::PerspectiveShift, &context(&names, &[]));
        assert_eq!(
            outcome.rotation,
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string()),
                ("c".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn perspective_shift_with_fewer_than_two_participants_is_empty() {
        let names = vec!["a".to_string()];
        let outcome = apply(Strategy::PerspectiveShift, &context(&names, &[]));
        assert!(outcome.rotation.is_empty());
    }
}
