//! Remote simulation service client.

use std::time::Duration;

use cr_history::ServiceResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Models the simulation service accepts.
pub const KNOWN_MODELS: &[&str] = &["SPM", "Thevenin"];

/// Responses carry the full time series plus a base64 PNG.
const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub model: String,
    pub c_rate: f64,
    pub t_hours: f64,
    pub init_soc: f64,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            model: "SPM".to_string(),
            c_rate: 1.0,
            t_hours: 1.0,
            init_soc: 1.0,
        }
    }
}

impl SimulationRequest {
    /// Check the parameters against the ranges the service accepts.
    pub fn validate(&self) -> AppResult<()> {
        if self.model.trim().is_empty() {
            return Err(AppError::InvalidInput("model must not be empty".to_string()));
        }
        if !self.c_rate.is_finite() || self.c_rate <= 0.0 {
            return Err(AppError::InvalidInput("c_rate must be > 0".to_string()));
        }
        if !self.t_hours.is_finite() || self.t_hours <= 0.0 {
            return Err(AppError::InvalidInput("t_hours must be > 0".to_string()));
        }
        if !self.init_soc.is_finite() || !(0.0..=1.0).contains(&self.init_soc) {
            return Err(AppError::InvalidInput(
                "init_soc must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single-attempt call to the simulation service.
///
/// Implementations must be usable from a worker thread so frontends can keep
/// handling input while a run is in flight.
pub trait SimulationClient: Send + Sync {
    fn simulate(&self, request: &SimulationRequest) -> AppResult<ServiceResponse>;

    /// Liveness check. Returns the status string reported by the service.
    fn health(&self) -> AppResult<String>;
}

/// Blocking HTTP client for the simulation service.
pub struct HttpSimulationClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSimulationClient {
    /// `timeout` of `None` waits for as long as the transport allows.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: config.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn read_reply(
        &self,
        url: &str,
        response: ureq::http::Response<ureq::Body>,
    ) -> AppResult<(u16, String)> {
        let status = response.status().as_u16();
        let mut body = response.into_body();
        let text = body
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| {
                AppError::Transport(format!("Failed to read response from {}: {}", url, e))
            })?;
        Ok((status, text))
    }
}

impl SimulationClient for HttpSimulationClient {
    fn simulate(&self, request: &SimulationRequest) -> AppResult<ServiceResponse> {
        let url = format!("{}/api/run", self.base_url);
        tracing::debug!(%url, model = %request.model, "sending simulation request");

        let response = self
            .agent
            .post(&url)
            .send_json(request)
            .map_err(|e| AppError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let (status, text) = self.read_reply(&url, response)?;
        parse_service_reply(status, &text)
    }

    fn health(&self) -> AppResult<String> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| AppError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let (status, text) = self.read_reply(&url, response)?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        if !(200..300).contains(&status) {
            return Err(AppError::Transport(error_message(status, &body)));
        }
        Ok(body["status"].as_str().unwrap_or("unknown").to_string())
    }
}

/// Interpret a raw reply from `/api/run`.
///
/// Non-2xx statuses, bodies carrying an `error` field and unparseable bodies
/// all become [`AppError::Transport`] with a message fit for the status line.
pub fn parse_service_reply(status: u16, body: &str) -> AppResult<ServiceResponse> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if (200..300).contains(&status) => {
            return Err(AppError::Transport(format!(
                "Unreadable response from simulation service: {}",
                e
            )));
        }
        Err(_) => Value::Null,
    };

    if !(200..300).contains(&status) || value.get("error").is_some() {
        return Err(AppError::Transport(error_message(status, &value)));
    }

    serde_json::from_value(value).map_err(|e| {
        AppError::Transport(format!(
            "Unexpected response from simulation service: {}",
            e
        ))
    })
}

fn error_message(status: u16, body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_valid() {
        assert!(SimulationRequest::default().validate().is_ok());
    }

    #[test]
    fn validation_rules() {
        let base = SimulationRequest::default();

        let bad = [
            SimulationRequest { c_rate: 0.0, ..base.clone() },
            SimulationRequest { c_rate: f64::NAN, ..base.clone() },
            SimulationRequest { t_hours: -1.0, ..base.clone() },
            SimulationRequest { init_soc: 1.2, ..base.clone() },
            SimulationRequest { init_soc: -0.1, ..base.clone() },
            SimulationRequest { model: " ".to_string(), ..base.clone() },
        ];
        for request in bad {
            assert!(request.validate().is_err(), "{:?} should be rejected", request);
        }

        let edge = SimulationRequest { init_soc: 0.0, ..base };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn request_serializes_flat() {
        let request = SimulationRequest {
            model: "DFN".to_string(),
            c_rate: 1.0,
            t_hours: 2.0,
            init_soc: 0.8,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"model": "DFN", "c_rate": 1.0, "t_hours": 2.0, "init_soc": 0.8})
        );
    }

    #[test]
    fn success_reply_parses() {
        let body = r#"{"result": {"meta": {"model": "SPM"}}, "plot_png_base64": "data:image/png;base64,AA=="}"#;
        let response = parse_service_reply(200, body).unwrap();
        assert_eq!(response.result["meta"]["model"], "SPM");
        assert!(response.plot_image.is_some());
    }

    #[test]
    fn error_reply_uses_message_verbatim() {
        let err = parse_service_reply(400, r#"{"error": "c_rate must be > 0"}"#).unwrap_err();
        assert_eq!(err.to_string(), "c_rate must be > 0");

        let err =
            parse_service_reply(500, r#"{"error": "Simulation failed: solver diverged"}"#)
                .unwrap_err();
        assert_eq!(err.to_string(), "Simulation failed: solver diverged");
    }

    #[test]
    fn error_reply_without_body_reports_status() {
        let err = parse_service_reply(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn error_field_on_success_status_is_a_failure() {
        let err = parse_service_reply(200, r#"{"error": "busy"}"#).unwrap_err();
        assert!(matches!(err, AppError::Transport(ref m) if m == "busy"));
    }

    #[test]
    fn garbage_success_body_is_a_failure() {
        assert!(matches!(
            parse_service_reply(200, "not json"),
            Err(AppError::Transport(_))
        ));
        assert!(matches!(
            parse_service_reply(200, r#"{"plotImage": "x"}"#),
            Err(AppError::Transport(_))
        ));
    }
}
