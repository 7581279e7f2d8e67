//! Query helpers for the opaque simulation result document.

use serde_json::Value;

/// Headline numbers for the result panel. Every field is optional because
/// the result document is only guaranteed to carry `meta`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSummary {
    pub model: Option<String>,
    pub parameter_set: Option<String>,
    pub n_points: Option<u64>,
    pub v_min: Option<f64>,
    pub v_max: Option<f64>,
}

pub fn summarize(result: &Value) -> ResultSummary {
    let meta = &result["meta"];
    let outputs = &meta["outputs"];

    ResultSummary {
        model: meta["model"].as_str().map(str::to_string),
        parameter_set: meta["parameter_set"].as_str().map(str::to_string),
        n_points: outputs["n_points"].as_u64(),
        v_min: outputs["v_min"].as_f64(),
        v_max: outputs["v_max"].as_f64(),
    }
}

/// Extract a numeric series from `result.series`. Non-numeric entries are
/// skipped.
pub fn extract_series(result: &Value, name: &str) -> Option<Vec<f64>> {
    result["series"][name]
        .as_array()
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
}

/// Voltage against time in minutes, ready for plotting.
pub fn voltage_curve(result: &Value) -> Vec<[f64; 2]> {
    match (
        extract_series(result, "time_s"),
        extract_series(result, "voltage_v"),
    ) {
        (Some(time_s), Some(voltage_v)) => time_s
            .iter()
            .zip(voltage_v.iter())
            .map(|(t, v)| [t / 60.0, *v])
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_from_full_result() {
        let result = json!({
            "meta": {
                "model": "SPM",
                "parameter_set": "Chen2020",
                "inputs": {"c_rate": 1.0, "t_hours": 1.0, "init_soc": 1.0},
                "outputs": {"n_points": 120, "v_min": 3.05, "v_max": 4.17}
            }
        });
        let summary = summarize(&result);
        assert_eq!(summary.model.as_deref(), Some("SPM"));
        assert_eq!(summary.parameter_set.as_deref(), Some("Chen2020"));
        assert_eq!(summary.n_points, Some(120));
        assert_eq!(summary.v_min, Some(3.05));
        assert_eq!(summary.v_max, Some(4.17));
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let summary = summarize(&json!({"meta": {"model": "DFN"}}));
        assert_eq!(summary.model.as_deref(), Some("DFN"));
        assert!(summary.n_points.is_none());
        assert_eq!(summarize(&json!(null)), ResultSummary::default());
    }

    #[test]
    fn voltage_curve_in_minutes() {
        let result = json!({"series": {"time_s": [0.0, 60.0, 120.0], "voltage_v": [4.1, 3.9, 3.7]}});
        assert_eq!(
            voltage_curve(&result),
            vec![[0.0, 4.1], [1.0, 3.9], [2.0, 3.7]]
        );
    }

    #[test]
    fn voltage_curve_empty_without_series() {
        assert!(voltage_curve(&json!({"meta": {}})).is_empty());
        assert!(extract_series(&json!({}), "time_s").is_none());
    }
}
