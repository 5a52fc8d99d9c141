// Ticketing payloads and search-response inspection

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Business code the API returns on success
pub const SUCCESS_CODE: i64 = 0;

/// Flight identifier taken from a search result and reused for ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(String);

impl FlightId {
    /// Create a flight id (must be non-empty)
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidFlightId("empty".to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticket search request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub from: String,
    pub to: String,
    /// YYYY-MM-DD
    pub date: String,
}

impl SearchQuery {
    /// Fixed example query used by the search probe
    pub fn example() -> Self {
        Self {
            from: "SHA".to_string(),
            to: "PEK".to_string(),
            date: "2025-12-01".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub name: String,
    pub id_type: String,
    pub id_number: String,
}

/// Ticket order request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub flight_id: FlightId,
    pub passengers: Vec<Passenger>,
    pub contact_name: String,
    pub contact_phone: String,
}

impl OrderRequest {
    /// Example order for `flight_id` with a single test passenger
    pub fn example(flight_id: FlightId) -> Self {
        Self {
            flight_id,
            passengers: vec![Passenger {
                name: "测试乘客".to_string(),
                id_type: "IDCard".to_string(),
                id_number: "110101199003070011".to_string(),
            }],
            contact_name: "测试联系人".to_string(),
            contact_phone: "13800138000".to_string(),
        }
    }
}

/// What a search response tells us about ordering
#[derive(Debug, Clone, PartialEq)]
pub enum SearchVerdict {
    /// Success code and at least one flight
    Found(FlightId),
    /// `code` missing or not the success code
    NotSuccessful {
        code: Option<Value>,
        message: Option<String>,
    },
    /// Success code but `data` missing, not a list, or empty
    NoFlights,
}

/// Inspect a decoded search response envelope
///
/// Expected shape: `{"code": 0, "data": [{"flightId": "..."}, ...]}`.
/// Only the first flight is considered.
///
/// # Errors
/// - `DomainError::MissingField` if the first flight has no `flightId`
/// - `DomainError::UnexpectedType` if `flightId` is not a string
/// - `DomainError::InvalidFlightId` if `flightId` is empty
pub fn inspect_search_response(body: &Value) -> Result<SearchVerdict> {
    let code = body.get("code");
    if !code.is_some_and(is_success_code) {
        return Ok(SearchVerdict::NotSuccessful {
            code: code.cloned(),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    let first = match body.get("data").and_then(Value::as_array) {
        Some(flights) => match flights.first() {
            Some(first) => first,
            None => return Ok(SearchVerdict::NoFlights),
        },
        None => return Ok(SearchVerdict::NoFlights),
    };

    let raw_id = first
        .get("flightId")
        .ok_or_else(|| DomainError::MissingField("data[0].flightId".to_string()))?;
    let id = raw_id.as_str().ok_or_else(|| DomainError::UnexpectedType {
        field: "data[0].flightId".to_string(),
        expected: "string".to_string(),
    })?;

    Ok(SearchVerdict::Found(FlightId::new(id)?))
}

/// Numeric zero, whether encoded as `0` or `0.0`
fn is_success_code(code: &Value) -> bool {
    match code {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i == SUCCESS_CODE,
            None => n.as_f64() == Some(SUCCESS_CODE as f64),
        },
        _ => false,
    }
}
