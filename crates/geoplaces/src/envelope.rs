//! Response envelope shared by every geocoding/places endpoint.

use serde::Deserialize;
use serde_json::Value;

use crate::error::PlacesError;

pub(crate) const STATUS_OK: &str = "OK";
pub(crate) const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Top-level object wrapping status, results and the continuation token.
///
/// List endpoints populate `results`; the detail endpoint returns a single
/// `result` instead.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    pub status: String,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ResponseEnvelope {
    /// Classifies the `status` field.
    ///
    /// `OK` and `ZERO_RESULTS` both succeed. The three documented failure
    /// statuses map one-to-one onto error variants; anything else becomes
    /// [`PlacesError::Unknown`]. The error message is `error_message` when
    /// the server sent one, otherwise the status string itself, so it is
    /// never empty.
    ///
    /// # Errors
    ///
    /// Returns the matching [`PlacesError`] variant for a failure status.
    pub fn check_status(&self) -> Result<(), PlacesError> {
        if self.status == STATUS_OK || self.status == STATUS_ZERO_RESULTS {
            return Ok(());
        }
        let message = self
            .error_message
            .clone()
            .unwrap_or_else(|| self.status.clone());
        Err(match self.status.as_str() {
            "OVER_QUERY_LIMIT" => PlacesError::OverQueryLimit(message),
            "REQUEST_DENIED" => PlacesError::RequestDenied(message),
            "INVALID_REQUEST" => PlacesError::InvalidRequest(message),
            _ => PlacesError::Unknown {
                status: self.status.clone(),
                message,
            },
        })
    }

    /// Consumes the envelope into its raw result list.
    ///
    /// `ZERO_RESULTS` normalizes to an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::check_status`] failures, and returns
    /// [`PlacesError::MalformedResponse`] for an `OK` envelope that has no
    /// `results` array.
    pub fn into_results(self) -> Result<Vec<Value>, PlacesError> {
        self.check_status()?;
        if self.status == STATUS_ZERO_RESULTS {
            return Ok(Vec::new());
        }
        self.results.ok_or_else(|| {
            PlacesError::MalformedResponse("envelope has no `results` array".to_string())
        })
    }

    /// Consumes the envelope into the single `result` object returned by the
    /// detail endpoint.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::check_status`] failures, and returns
    /// [`PlacesError::MalformedResponse`] when `result` is absent (including
    /// a `ZERO_RESULTS` detail response, which the endpoint never produces
    /// for a valid place id).
    pub fn into_result(self) -> Result<Value, PlacesError> {
        self.check_status()?;
        self.result.ok_or_else(|| {
            PlacesError::MalformedResponse("envelope has no `result` object".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(body: Value) -> ResponseEnvelope {
        serde_json::from_value(body).expect("envelope should deserialize")
    }

    #[test]
    fn ok_status_succeeds() {
        let env = envelope(json!({ "status": "OK", "results": [] }));
        assert!(env.check_status().is_ok());
    }

    #[test]
    fn zero_results_is_success_with_empty_list() {
        let env = envelope(json!({ "status": "ZERO_RESULTS" }));
        let results = env.into_results().expect("zero results is not an error");
        assert!(results.is_empty());
    }

    #[test]
    fn failure_statuses_map_one_to_one() {
        let cases = [
            ("OVER_QUERY_LIMIT", "over query limit"),
            ("REQUEST_DENIED", "request denied"),
            ("INVALID_REQUEST", "invalid request"),
        ];
        for (status, prefix) in cases {
            let env = envelope(json!({ "status": status }));
            let err = env.check_status().unwrap_err();
            assert!(
                err.to_string().starts_with(prefix),
                "{status} mapped to unexpected error: {err}"
            );
        }
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let env = envelope(json!({ "status": "SOMETHING_NEW" }));
        let err = env.check_status().unwrap_err();
        assert!(matches!(err, PlacesError::Unknown { ref status, .. } if status == "SOMETHING_NEW"));
    }

    #[test]
    fn message_falls_back_to_status_string() {
        let env = envelope(json!({ "status": "OVER_QUERY_LIMIT" }));
        let err = env.check_status().unwrap_err();
        assert!(matches!(err, PlacesError::OverQueryLimit(ref m) if m == "OVER_QUERY_LIMIT"));
    }

    #[test]
    fn explicit_error_message_wins() {
        let env = envelope(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        let err = env.check_status().unwrap_err();
        assert!(
            matches!(err, PlacesError::RequestDenied(ref m) if m == "The provided API key is invalid.")
        );
    }

    #[test]
    fn ok_without_results_is_malformed() {
        let env = envelope(json!({ "status": "OK" }));
        let err = env.into_results().unwrap_err();
        assert!(matches!(err, PlacesError::MalformedResponse(_)));
    }

    #[test]
    fn ok_without_result_object_is_malformed() {
        let env = envelope(json!({ "status": "OK", "results": [] }));
        let err = env.into_result().unwrap_err();
        assert!(matches!(err, PlacesError::MalformedResponse(_)));
    }

    #[test]
    fn next_page_token_is_captured() {
        let env = envelope(json!({
            "status": "OK",
            "results": [],
            "next_page_token": "T1"
        }));
        assert_eq!(env.next_page_token.as_deref(), Some("T1"));
    }
}
