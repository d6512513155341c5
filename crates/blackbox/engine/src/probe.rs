//! Endpoint probe. One request per test case, with failures captured as data.

use serde_json::json;
use tracing::{debug, warn};

use crate::transport::{HttpMethod, ProbeRequest, Transport, TransportError, TransportResponse};
use crate::types::{Capability, InvocationMethod, Observation, OutputValue, ProbeFailure, TestCase};

/// Field carrying the input in payload-style requests.
pub const PAYLOAD_FIELD: &str = "data";
/// Field carrying the output in JSON responses.
pub const RESULT_FIELD: &str = "result";

/// Longest error body kept on an observation.
const MAX_ERROR_BODY: usize = 512;

/// Sends test cases to capabilities through an injected transport.
pub struct EndpointProbe<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> EndpointProbe<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The request that probing `input` against `capability` sends.
    pub fn request_for(&self, capability: &Capability, input: &str) -> ProbeRequest {
        let url = format!("{}{}", self.base_url, capability.path);
        match capability.method {
            InvocationMethod::Query => ProbeRequest {
                url,
                method: HttpMethod::Get,
                body: None,
            },
            InvocationMethod::Payload => ProbeRequest {
                url,
                method: HttpMethod::Post,
                body: Some(json!({ PAYLOAD_FIELD: input })),
            },
        }
    }

    /// Send one request and return the raw response.
    pub async fn exchange(
        &self,
        capability: &Capability,
        input: &str,
    ) -> Result<TransportResponse, TransportError> {
        self.transport.send(self.request_for(capability, input)).await
    }

    /// Probe one test case. Never fails: every outcome is an observation.
    pub async fn probe(&self, capability: &Capability, case: &TestCase) -> Observation {
        match self.exchange(capability, &case.input).await {
            Ok(response) => {
                debug!(
                    capability = %capability.name,
                    label = %case.label,
                    status = response.status,
                    "probe answered"
                );
                normalize(capability, case, &response)
            }
            Err(err) => {
                warn!(
                    capability = %capability.name,
                    label = %case.label,
                    error = %err,
                    "probe failed"
                );
                Observation::failure(
                    capability,
                    case,
                    None,
                    ProbeFailure::Transport {
                        message: err.to_string(),
                    },
                )
            }
        }
    }
}

/// Turn a raw response into an observation.
///
/// Non-2xx responses and undecodable JSON become failures. Bodies that are
/// not declared JSON are kept as opaque output.
pub fn normalize(
    capability: &Capability,
    case: &TestCase,
    response: &TransportResponse,
) -> Observation {
    if !response.is_success() {
        let failure = ProbeFailure::Status {
            status: response.status,
            body: truncate(&response.body, MAX_ERROR_BODY),
        };
        warn!(capability = %capability.name, label = %case.label, %failure, "probe rejected");
        return Observation::failure(capability, case, Some(response.status), failure);
    }

    if !response.is_json() {
        return Observation::success(
            capability,
            case,
            response.status,
            OutputValue::Opaque(response.body.clone()),
        );
    }

    match decode_result(&response.body) {
        Ok(value) => Observation::success(capability, case, response.status, value),
        Err(message) => {
            warn!(capability = %capability.name, label = %case.label, %message, "undecodable response");
            Observation::failure(
                capability,
                case,
                Some(response.status),
                ProbeFailure::Decode { message },
            )
        }
    }
}

fn decode_result(body: &str) -> Result<OutputValue, String> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "response is not a JSON object".to_string())?;
    object
        .get(RESULT_FIELD)
        .map(OutputValue::from_json)
        .ok_or_else(|| format!("response has no `{}` field", RESULT_FIELD))
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
