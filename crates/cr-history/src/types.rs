//! Run record data types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Runs in chronological order, oldest first.
pub type RunHistory = Vec<RunRecord>;

/// One completed simulation run as persisted in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub saved_at: String,
    pub result: Value,
    /// Verbatim copy of `result.meta`, kept alongside for list rendering.
    pub meta: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_image: Option<String>,
}

impl RunRecord {
    /// Result payload for presenting this record again.
    pub fn payload(&self) -> RunPayload {
        RunPayload {
            result: self.result.clone(),
            plot_image: self.plot_image.clone(),
        }
    }

    /// Typed view of `meta`, or `None` when the stored copy lacks the model
    /// name or one of the three inputs.
    pub fn run_meta(&self) -> Option<RunMeta> {
        serde_json::from_value(self.meta.clone()).ok()
    }
}

/// Compact run description carried in `result.meta`.
///
/// Used to check and read `result.meta`. Records persist the raw value, so
/// fields beyond `model` and `inputs` (parameter set, output summary, ...)
/// only land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub model: String,
    pub inputs: RunInputs,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    pub c_rate: f64,
    pub t_hours: f64,
    pub init_soc: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Anything that can be shown as the current result: a fresh service
/// response or a record replayed from history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPayload {
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_image: Option<String>,
}

/// Successful reply from the remote simulation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub result: Value,
    #[serde(default, alias = "plot_png_base64", skip_serializing_if = "Option::is_none")]
    pub plot_image: Option<String>,
}

impl ServiceResponse {
    pub fn payload(&self) -> RunPayload {
        RunPayload {
            result: self.result.clone(),
            plot_image: self.plot_image.clone(),
        }
    }
}
