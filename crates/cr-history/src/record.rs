//! Turning service responses into storable run records.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::{RunMeta, RunRecord, ServiceResponse};
use crate::{HistoryError, HistoryResult};

/// Current time in the format used for `savedAt`.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build a history record from a successful response, stamped with the
/// current time.
pub fn build_record(response: ServiceResponse) -> HistoryResult<RunRecord> {
    build_record_at(response, Utc::now())
}

/// Build a history record stamped with `saved_at`.
///
/// Fails with [`HistoryError::MalformedResponse`] when `result.meta` lacks the
/// model name or any of the three numeric inputs.
pub fn build_record_at(
    response: ServiceResponse,
    saved_at: DateTime<Utc>,
) -> HistoryResult<RunRecord> {
    let meta_value = response
        .result
        .get("meta")
        .ok_or_else(|| HistoryError::MalformedResponse {
            reason: "result.meta is missing".to_string(),
        })?;

    let meta = meta_value.clone();
    serde_json::from_value::<RunMeta>(meta_value.clone()).map_err(|e| {
        HistoryError::MalformedResponse {
            reason: format!("result.meta is incomplete: {}", e),
        }
    })?;

    Ok(RunRecord {
        saved_at: format_timestamp(saved_at),
        result: response.result,
        meta,
        plot_image: response.plot_image,
    })
}
