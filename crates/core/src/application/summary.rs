// Run summary types

use crate::domain::request::{HEALTH_PATH, ORDER_PATH, PING_PATH, SEARCH_PATH};
use crate::domain::{FlightId, HttpMethod};
use std::fmt;

/// The four probes, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Health,
    Ping,
    Search,
    Order,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 4] = [
        ProbeKind::Health,
        ProbeKind::Ping,
        ProbeKind::Search,
        ProbeKind::Order,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::Health => "health",
            ProbeKind::Ping => "ping",
            ProbeKind::Search => "search",
            ProbeKind::Order => "order",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            ProbeKind::Health | ProbeKind::Ping => HttpMethod::Get,
            ProbeKind::Search | ProbeKind::Order => HttpMethod::Post,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            ProbeKind::Health => HEALTH_PATH,
            ProbeKind::Ping => PING_PATH,
            ProbeKind::Search => SEARCH_PATH,
            ProbeKind::Order => ORDER_PATH,
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a single probe ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered (any status); `json` tells whether the body decoded
    Responded { status: u16, json: bool },
    /// Transport failure (connect, timeout, body read)
    Failed { reason: String },
    /// Not executed because a precondition was missing
    Skipped { reason: String },
}

impl ProbeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Responded { .. } => "responded",
            ProbeOutcome::Failed { .. } => "failed",
            ProbeOutcome::Skipped { .. } => "skipped",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ProbeOutcome::Responded { status, json: true } => format!("HTTP {} (json)", status),
            ProbeOutcome::Responded { status, json: false } => format!("HTTP {} (text)", status),
            ProbeOutcome::Failed { reason } | ProbeOutcome::Skipped { reason } => reason.clone(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ProbeOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    pub kind: ProbeKind,
    pub outcome: ProbeOutcome,
}

/// Result of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: Vec<ProbeRecord>,
    /// Flight id used for the order probe, if any
    pub flight_id: Option<FlightId>,
}

impl RunSummary {
    pub fn push(&mut self, kind: ProbeKind, outcome: ProbeOutcome) {
        self.records.push(ProbeRecord { kind, outcome });
    }

    pub fn outcome(&self, kind: ProbeKind) -> Option<&ProbeOutcome> {
        self.records
            .iter()
            .find(|record| record.kind == kind)
            .map(|record| &record.outcome)
    }
}
