// Response Envelope - what a probe received

use serde_json::Value;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON
    Json(Value),
    /// Body kept as raw text because it is not valid JSON
    Raw { text: String, decode_error: String },
}

/// Status + body of one exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    /// Build an envelope from the raw status and body text
    ///
    /// Decoding never fails: a non-JSON body (including an empty one) is kept
    /// verbatim alongside the decode error.
    pub fn decode(status: u16, text: String) -> Self {
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => ResponseBody::Raw {
                text,
                decode_error: e.to_string(),
            },
        };
        Self { status, body }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.body, ResponseBody::Json(_))
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw { .. } => None,
        }
    }
}
