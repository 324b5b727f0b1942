//! Response schemas for the websites endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ApiError;

/// A monitored website as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: u64,
    pub domain: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "alertStatus")]
    pub alert_status: String,
}

/// Envelope of `GET /website/websites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteList {
    pub items: Vec<Website>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

/// The performance graph series of one website.
///
/// `timestamps` are Unix milliseconds. Every line's `data` is index-aligned
/// with `timestamps`; a `None` entry means the check produced no value for
/// that sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub timestamps: Vec<i64>,
    pub lines: Vec<GraphLine>,
}

/// One metric line of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLine {
    pub legend: String,
    /// Samples. `null` and placeholders such as `"No Data"` decode to `None`;
    /// numeric strings are accepted as numbers.
    #[serde(deserialize_with = "lenient_samples")]
    pub data: Vec<Option<f64>>,
}

fn lenient_samples<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw.iter().map(sample_value).collect())
}

fn sample_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}


impl GraphData {
    /// Decode and validate a graph response body.
    ///
    /// Anything that is not a well-formed series (a `null` body, missing
    /// fields, lines whose length disagrees with the timestamps) becomes
    /// [`ApiError::MalformedSeries`] carrying the raw body.
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        let malformed = |reason: String| ApiError::MalformedSeries {
            reason,
            body: body.to_string(),
        };

        let graph: Option<GraphData> =
            serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
        let graph = graph.ok_or_else(|| malformed("empty response".to_string()))?;

        if let Some(line) = graph
            .lines
            .iter()
            .find(|line| line.data.len() != graph.timestamps.len())
        {
            return Err(malformed(format!(
                "line '{}' has {} values for {} timestamps",
                line.legend,
                line.data.len(),
                graph.timestamps.len()
            )));
        }

        Ok(graph)
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The last sample time in milliseconds.
    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_website_list() {
        let json = r#"{
            "total": 2,
            "items": [
                {"id": 11, "domain": "www.example.com", "name": "Example",
                 "status": "active", "alertStatus": "none", "type": "webcheck"},
                {"id": 12, "domain": "shop.example.com", "name": "Shop",
                 "status": "active", "alertStatus": "critical"}
            ]
        }"#;

        let list: WebsiteList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total, Some(2));
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].id, 11);
        assert_eq!(list.items[1].alert_status, "critical");
    }

    #[test]
    fn test_website_requires_all_fields() {
        let json = r#"{"items": [{"id": 1, "domain": "a.example.com", "name": "A"}]}"#;
        assert!(serde_json::from_str::<WebsiteList>(json).is_err());
    }

    #[test]
    fn test_graph_from_body() {
        let body = r#"{
            "timestamps": [1000, 2000],
            "lines": [{"legend": "Response Time - X", "data": [5, null]}]
        }"#;

        let graph = GraphData::from_body(body).unwrap();
        assert_eq!(graph.timestamps, vec![1000, 2000]);
        assert_eq!(graph.lines[0].data, vec![Some(5.0), None]);
        assert_eq!(graph.last_timestamp_ms(), Some(2000));
        assert!(!graph.is_empty());
    }

    #[test]
    fn test_graph_missing_timestamps() {
        let body = r#"{"lines": []}"#;
        match GraphData::from_body(body) {
            Err(ApiError::MalformedSeries { reason, body: raw }) => {
                assert!(reason.contains("timestamps"));
                assert_eq!(raw, body);
            }
            other => panic!("expected malformed series, got {:?}", other),
        }
    }

    #[test]
    fn test_graph_placeholder_samples_are_gaps() {
        let body = r#"{
            "timestamps": [1000, 2000, 3000, 4000],
            "lines": [{"legend": "Response Time - X", "data": [5, "No Data", "7.5", true]}]
        }"#;

        let graph = GraphData::from_body(body).unwrap();
        let line = &graph.lines[0];
        assert_eq!(line.data, vec![Some(5.0), None, Some(7.5), None]);
        assert_eq!(graph.last_timestamp_ms(), Some(4000));
    }

    #[test]
    fn test_graph_data_must_be_a_list() {
        let body = r#"{"timestamps": [1000], "lines": [{"legend": "X", "data": "No Data"}]}"#;
        assert!(matches!(
            GraphData::from_body(body),
            Err(ApiError::MalformedSeries { .. })
        ));
    }

    #[test]
    fn test_graph_null_body() {
        assert!(matches!(
            GraphData::from_body("null"),
            Err(ApiError::MalformedSeries { .. })
        ));
    }

    #[test]
    fn test_graph_misaligned_line() {
        let body = r#"{"timestamps": [1000, 2000], "lines": [{"legend": "X", "data": [1]}]}"#;
        let err = GraphData::from_body(body).unwrap_err();
        assert!(err.to_string().contains("line 'X' has 1 values for 2 timestamps"));
    }

    #[test]
    fn test_graph_empty_series() {
        let graph = GraphData::from_body(r#"{"timestamps": [], "lines": []}"#).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.last_timestamp_ms(), None);
    }
}
