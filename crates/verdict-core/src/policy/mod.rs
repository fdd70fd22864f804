//! Read-only policy freshness metadata.
//!
//! The temporal guard needs two lookups from the relational side: the
//! `effective_from` dates of the policies an answer cites, and whether a
//! newer policy exists on any of the same topics. Everything else about the
//! relational schema stays behind this boundary.

pub mod error;


pub use error::PolicyStoreError;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Freshness metadata for one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: String,
    pub effective_from: Option<NaiveDate>,
    /// Grouping used to find newer policies on the same subject.
    pub topic_id: Option<String>,
}

#[async_trait]
/// Relational lookup for policy freshness.
pub trait PolicyStore: Send + Sync {
    /// Fetches records for the given policy ids; unknown ids are skipped.
    async fn policies_by_ids(&self, ids: &[String]) -> Result<Vec<PolicyRecord>, PolicyStoreError>;

    /// Returns `true` if any policy on one of `topic_ids` has an
    /// `effective_from` on or after `cutoff`.
    async fn newer_policy_exists(
        &self,
        topic_ids: &[String],
        cutoff: NaiveDate,
    ) -> Result<bool, PolicyStoreError>;
}

/// Policy store backed by an in-process table.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    records: RwLock<Vec<PolicyRecord>>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<PolicyRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Inserts or replaces a record by id.
    pub fn upsert(&self, record: PolicyRecord) {
        let mut records = self.records.write();
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn policies_by_ids(&self, ids: &[String]) -> Result<Vec<PolicyRecord>, PolicyStoreError> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn newer_policy_exists(
        &self,
        topic_ids: &[String],
        cutoff: NaiveDate,
    ) -> Result<bool, PolicyStoreError> {
        let records = self.records.read();
        Ok(records.iter().any(|r| {
            r.topic_id
                .as_ref()
                .is_some_and(|topic| topic_ids.contains(topic))
                && r.effective_from.is_some_and(|date| date >= cutoff)
        }))
    }
}
