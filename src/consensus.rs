//! Consensus Protocol (C2): maps a set of analyses (or, for the
//! cross-review variant, a set of reviews) to a [`ConsensusResult`].

use crate::comparator;
use crate::model::{Analysis, ClusterSummary, ConsensusResult, ConsensusStatus, NextAction, Review};
use std::collections::HashMap;

/// Evaluate consensus over a snapshot of already-validated analyses.
///
/// `consensus_threshold` is the quorum threshold (default 0.8);
/// `similarity_threshold` is the comparator's clustering threshold
/// (default 0.3) — the two are deliberately distinct knobs.
pub fn evaluate(analyses: &[Analysis], consensus_threshold: f64, similarity_threshold: f64) -> ConsensusResult {
    let n = analyses.len();
    if n < 2 {
        return ConsensusResult {
            status: ConsensusStatus::NoConsensus,
            consensus_percentage: 0.0,
            agreed_items: Vec::new(),
            disputed_items: Vec::new(),
            next_action: Some(NextAction::NeedMoreAnalyses),
            details: ConsensusResult::detail("reason", "fewer than two analyses"),
        };
    }

    let normalized: Vec<String> = analyses
        .iter()
        .map(|a| normalize_conclusion(a.conclusion.as_deref().unwrap_or("")))
        .collect();

    if normalized.iter().all(|c| c.is_empty()) {
        return ConsensusResult {
            status: ConsensusStatus::NoConsensus,
            consensus_percentage: 0.0,
            agreed_items: Vec::new(),
            disputed_items: Vec::new(),
            next_action: Some(NextAction::Debate),
            details: ConsensusResult::detail("reason", "all conclusions empty"),
        };
    }

    let comparison = comparator::compare(&normalized, similarity_threshold);
    let largest_index = largest_cluster_index(&comparison.clusters);

    let mut agreed_items = Vec::new();
    let mut disputed_items = Vec::new();
    let mut largest_size = 0usize;

    for (idx, cluster) in comparison.clusters.iter().enumerate() {
        let summary = ClusterSummary {
            representative_conclusion: analyses[cluster.anchor]
                .conclusion
                .clone()
                .unwrap_or_default(),
            participant_names: cluster
                .members
                .iter()
                .map(|&i| analyses[i].participant_name.clone())
                .collect(),
            size: cluster.size(),
        };
        if idx == largest_index {
            largest_size = cluster.size();
            agreed_items.push(summary);
        } else {
            disputed_items.push(summary);
        }
    }

    let consensus_percentage = largest_size as f64 / n as f64;
    let (status, next_action) = classify(consensus_percentage, consensus_threshold, false);

    let mut details = serde_json::Map::new();
    details.insert("total_analyses".to_string(), n.into());
    details.insert("unique_clusters".to_string(), comparison.clusters.len().into());
    details.insert("max_similarity".to_string(), comparison.max_similarity.into());

    ConsensusResult {
        status,
        consensus_percentage,
        agreed_items,
        disputed_items,
        next_action,
        details,
    }
}

/// Cross-review variant: counts agreement vs. disagreement points across
/// all collected reviews. Not cluster-based, so `agreed_items` is left
/// empty; `disputed_items` is instead built from the reviews'
/// `disagreement_points`, grouped by the participant being reviewed, so
/// that `Strategy::ScopeReduced` has something to narrow on after the
/// CROSS_REVIEW -> DEBATE path (which never produces a comparator
/// clustering of its own). `next_action` on a partial result is always
/// `DEBATE` since review has already happened.
pub fn evaluate_cross_review(reviews: &[Review], consensus_threshold: f64) -> ConsensusResult {
    let agree: usize = reviews.iter().map(|r| r.agreement_points.len()).sum();
    let disagree: usize = reviews.iter().map(|r| r.disagreement_points.len()).sum();
    let total = agree + disagree;
    let agreement_ratio = if total == 0 { 0.0 } else { agree as f64 / total as f64 };

    let (status, next_action) = classify(agreement_ratio, consensus_threshold, true);
    let disputed_items = disputed_items_from_reviews(reviews);

    let mut details = serde_json::Map::new();
    details.insert("total_reviews".to_string(), reviews.len().into());
    details.insert("agreement_points".to_string(), agree.into());
    details.insert("disagreement_points".to_string(), disagree.into());

    ConsensusResult {
        status,
        consensus_percentage: agreement_ratio,
        agreed_items: Vec::new(),
        disputed_items,
        next_action,
        details,
    }
}

/// One disputed cluster per reviewed participant with at least one
/// disagreement point, in first-seen order across `reviews`. The
/// representative conclusion is the first disagreement point raised
/// against that participant; `participant_names` lists the reviewers who
/// raised one plus the reviewed participant itself.
fn disputed_items_from_reviews(reviews: &[Review]) -> Vec<ClusterSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut points: HashMap<String, Vec<String>> = HashMap::new();
    let mut reviewers: HashMap<String, Vec<String>> = HashMap::new();

    for review in reviews {
        if review.disagreement_points.is_empty() {
            continue;
        }
        if !points.contains_key(&review.reviewed_name) {
            order.push(review.reviewed_name.clone());
        }
        points.entry(review.reviewed_name.clone()).or_default().extend(review.disagreement_points.iter().cloned());
        reviewers.entry(review.reviewed_name.clone()).or_default().push(review.reviewer_name.clone());
    }

    order
        .into_iter()
        .map(|reviewed| {
            let disagreements = points.remove(&reviewed).unwrap_or_default();
            let mut participant_names = reviewers.remove(&reviewed).unwrap_or_default();
            participant_names.push(reviewed);
            ClusterSummary {
                representative_conclusion: disagreements.first().cloned().unwrap_or_default(),
                size: disagreements.len(),
                participant_names,
            }
        })
        .collect()
}

fn largest_cluster_index(clusters: &[comparator::Cluster]) -> usize {
    let mut best = 0;
    let mut best_size = 0;
    for (idx, cluster) in clusters.iter().enumerate() {
        if cluster.size() > best_size {
            best = idx;
            best_size = cluster.size();
        }
    }
    best
}

/// Shared status/next-action decision table.
///
/// | percentage | status | next_action |
/// |---|---|---|
/// | >= threshold | FULL_CONSENSUS | None |
/// | [0.5, threshold) | PARTIAL_CONSENSUS | CROSS_REVIEW (or DEBATE after review) |
/// | < 0.5 | NO_CONSENSUS | DEBATE |
fn classify(percentage: f64, threshold: f64, after_review: bool) -> (ConsensusStatus, Option<NextAction>) {
    if percentage >= threshold {
        (ConsensusStatus::FullConsensus, None)
    } else if percentage >= 0.5 {
        let action = if after_review { NextAction::Debate } else { NextAction::CrossReview };
        (ConsensusStatus::PartialConsensus, Some(action))
    } else {
        (ConsensusStatus::NoConsensus, Some(NextAction::Debate))
    }
}

fn normalize_conclusion(conclusion: &str) -> String {
    conclusion.trim().split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
