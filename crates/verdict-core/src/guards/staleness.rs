use chrono::NaiveDate;

use super::outcome::{GuardName, GuardOutcome};

/// Absolute-staleness check: the newest source date must be at most
/// `max_age_days` old. A source dated exactly at the cutoff passes; one day
/// beyond fails. A missing date fails (unverifiable age is treated as stale).
pub fn staleness_guard(
    newest_source_date: Option<NaiveDate>,
    max_age_days: i64,
    today: NaiveDate,
) -> GuardOutcome {
    let Some(source_date) = newest_source_date else {
        return GuardOutcome::fail(GuardName::Staleness, "Source date is missing");
    };

    let age_days = (today - source_date).num_days();
    if age_days > max_age_days {
        GuardOutcome::fail(
            GuardName::Staleness,
            format!("Source is {age_days} days old, exceeding the maximum age of {max_age_days} days"),
        )
    } else {
        GuardOutcome::pass(
            GuardName::Staleness,
            format!("Source is {age_days} days old, within the acceptable range of {max_age_days} days"),
        )
    }
}
