//! Timestamp stamping for the sample lifecycle.
//!
//! The service calls these explicitly; stores never touch timestamps.

use crate::domain::sample::{NewSample, SampleDetails, SampleRecord};
use chrono::{DateTime, Utc};

/// Prepares a fresh sample: both timestamps are set to `now`.
pub fn stamp_on_create(details: SampleDetails, now: DateTime<Utc>) -> NewSample {
    NewSample {
        details,
        created_at: now,
        updated_at: now,
    }
}

/// Replaces the mutable fields of `existing` and refreshes `updated_at`.
///
/// `id` and `created_at` are carried over. `updated_at` never moves backwards,
/// even if the wall clock does.
pub fn stamp_on_update(
    existing: SampleRecord,
    details: SampleDetails,
    now: DateTime<Utc>,
) -> SampleRecord {
    let updated_at = now.max(existing.updated_at).max(existing.created_at);
    SampleRecord {
        id: existing.id,
        details,
        created_at: existing.created_at,
        updated_at,
    }
}
