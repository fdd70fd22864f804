use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::answer::AnswerCandidate;
use crate::policy::PolicyStore;

use super::outcome::{GuardName, GuardOutcome};

/// Relative-staleness check against the policy table.
///
/// Resolves the most recent `effective_from` among the policies the answer
/// cites. Within the freshness window the guard passes and prefers that
/// policy. Outside the window it fails only if a newer policy exists on one
/// of the same topics; with nothing newer anywhere, old material is the best
/// available and passes.
///
/// Store errors fail closed: the outcome carries the error text instead of
/// propagating.
pub async fn temporal_guard(
    answer: &AnswerCandidate,
    store: &dyn PolicyStore,
    freshness_window_days: i64,
    today: NaiveDate,
) -> GuardOutcome {
    if answer.sources.is_empty() {
        return GuardOutcome::fail(GuardName::Temporal, "No sources provided");
    }

    let policy_ids = answer.policy_ids();
    if policy_ids.is_empty() {
        return GuardOutcome::fail(GuardName::Temporal, "No policy identifiers in sources");
    }

    let policies = match store.policies_by_ids(&policy_ids).await {
        Ok(policies) => policies,
        Err(e) => {
            warn!(error = %e, "Temporal guard policy lookup failed");
            return GuardOutcome::fail(GuardName::Temporal, format!("Policy lookup failed: {e}"));
        }
    };
    if policies.is_empty() {
        return GuardOutcome::fail(GuardName::Temporal, "No matching policies found");
    }

    let cutoff = today - Duration::days(freshness_window_days);
    let most_recent = policies
        .iter()
        .max_by_key(|p| p.effective_from.unwrap_or(NaiveDate::MIN));

    let Some(most_recent) = most_recent else {
        return GuardOutcome::fail(GuardName::Temporal, "No matching policies found");
    };

    if let Some(effective_from) = most_recent.effective_from {
        if effective_from >= cutoff {
            return GuardOutcome::pass(
                GuardName::Temporal,
                format!("Using most recent policy from {effective_from}"),
            )
            .with_detail(serde_json::json!({ "preferred_policy_id": most_recent.id }));
        }
    }

    // All cited policies are older than the window; fail only when fresher
    // material exists on the same topics.
    let topic_ids: Vec<String> = policies.iter().filter_map(|p| p.topic_id.clone()).collect();
    if !topic_ids.is_empty() {
        match store.newer_policy_exists(&topic_ids, cutoff).await {
            Ok(true) => {
                return GuardOutcome::fail(
                    GuardName::Temporal,
                    "Outdated policies used while newer policies are available",
                );
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Temporal guard topic lookup failed");
                return GuardOutcome::fail(
                    GuardName::Temporal,
                    format!("Policy lookup failed: {e}"),
                );
            }
        }
    }

    let effective = most_recent
        .effective_from
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    GuardOutcome::pass(
        GuardName::Temporal,
        format!("Using most recent available policy from {effective} (older than {freshness_window_days} days)"),
    )
    .with_detail(serde_json::json!({ "preferred_policy_id": most_recent.id }))
}
