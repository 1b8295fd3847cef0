//! Client for the external diet-generation service.
//!
//! The service runs as a separate process and exposes a single endpoint:
//! POST the patient id, get back a JSON body whose `status` field reports
//! whether chart generation succeeded. The client is fire-and-report: no
//! retry, no backoff, and a network failure surfaces as an error for the
//! caller to handle.

use serde::{Deserialize, Serialize};

/// Errors raised while talking to the generation service.
#[derive(Debug, thiserror::Error)]
pub enum DietGenError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned an unreadable body: {0}")]
    MalformedResponse(String),
}

/// Outcome reported by the generation service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationStatus {
    /// The service reported `"status": "success"`. Carries the generated
    /// chart payload, `null` when the service inlined none.
    Succeeded(serde_json::Value),
    /// Any other status string, carried verbatim for logging.
    Failed(String),
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    patient_id: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    status: String,
    #[serde(default)]
    chart: serde_json::Value,
}

/// HTTP client bound to one generation endpoint.
#[derive(Clone, Debug)]
pub struct DietGenClient {
    endpoint: String,
    http: reqwest::Client,
}

impl DietGenClient {
    /// Binds a client to the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Asks the service to generate a chart for `patient_id`.
    ///
    /// A reachable service always yields `Ok`: failure statuses are data,
    /// not errors. Only transport problems and unreadable bodies are `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`DietGenError`] when the request cannot be sent or the
    /// response body does not carry a `status` field.
    pub async fn request_generation(
        &self,
        patient_id: &str,
    ) -> Result<GenerationStatus, DietGenError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GenerationRequest { patient_id })
            .send()
            .await?;

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| DietGenError::MalformedResponse(e.to_string()))?;

        if body.status == "success" {
            Ok(GenerationStatus::Succeeded(body.chart))
        } else {
            tracing::warn!(
                "generation for patient {patient_id} reported status {:?}",
                body.status
            );
            Ok(GenerationStatus::Failed(body.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_snake_case_patient_id() {
        let body = serde_json::to_string(&GenerationRequest {
            patient_id: "uid-p1",
        })
        .expect("serialise request");
        assert_eq!(body, r#"{"patient_id":"uid-p1"}"#);
    }

    #[test]
    fn response_status_is_the_only_required_field() {
        let body: GenerationResponse =
            serde_json::from_str(r#"{"status": "success", "detail": "7-day chart"}"#)
                .expect("parse response");
        assert_eq!(body.status, "success");
        assert!(body.chart.is_null());
    }

    #[test]
    fn response_chart_payload_is_carried_through() {
        let body: GenerationResponse = serde_json::from_str(
            r#"{"status": "success", "chart": {"meals": [{"slot": "breakfast"}]}}"#,
        )
        .expect("parse response");
        assert_eq!(body.chart["meals"][0]["slot"], "breakfast");
    }
}
