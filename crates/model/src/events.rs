//! Event row types
//!
//! One struct per warehouse table. Optional fields are populated per event
//! kind and omitted from serialized rows when absent, so the same shape
//! works for streaming inserts and for ingest validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{COMPANY_EVENTS_TABLE, USER_EVENTS_TABLE};

/// Kind of a user-level event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEventKind {
    /// User registration
    Register,
    /// Call began; carries call_type, call_num_users, call_os, session_id
    CallStarted,
    /// Call finished; carries call_duration and session_id
    CallEnded,
    /// Post-call rating (1-5)
    Rating,
    /// Free-text comment
    Comment,
    /// Phone dial-in session
    Dialin,
    /// Support ticket opened
    SupportTicket,
}

impl UserEventKind {
    /// Parse from the wire string (e.g. "call_started")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "register" => Some(Self::Register),
            "call_started" => Some(Self::CallStarted),
            "call_ended" => Some(Self::CallEnded),
            "rating" => Some(Self::Rating),
            "comment" => Some(Self::Comment),
            "dialin" => Some(Self::Dialin),
            "support_ticket" => Some(Self::SupportTicket),
            _ => None,
        }
    }

    /// Wire string for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::CallStarted => "call_started",
            Self::CallEnded => "call_ended",
            Self::Rating => "rating",
            Self::Comment => "comment",
            Self::Dialin => "dialin",
            Self::SupportTicket => "support_ticket",
        }
    }
}

/// Kind of a company/device lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyEventKind {
    /// Devices purchased; carries the purchased count
    Purchased,
    /// Device provisioned; carries provisioned count, serial, box name
    Provisioned,
}

impl CompanyEventKind {
    /// Parse from the wire string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchased" => Some(Self::Purchased),
            "provisioned" => Some(Self::Provisioned),
            _ => None,
        }
    }

    /// Wire string for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchased => "purchased",
            Self::Provisioned => "provisioned",
        }
    }
}

/// One row in `user_events`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEvent {
    /// Event instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// Event kind
    #[serde(rename = "type")]
    pub kind: UserEventKind,
    /// User identifier (email)
    pub user: String,
    /// Company identifier
    pub company: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_num_users: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialin_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_driver: Option<String>,
}

impl UserEvent {
    /// Create a bare event with all type-specific fields unset
    pub fn new(
        kind: UserEventKind,
        timestamp: DateTime<Utc>,
        user: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind,
            user: user.into(),
            company: company.into(),
            call_duration: None,
            call_type: None,
            call_num_users: None,
            call_os: None,
            rating: None,
            comment: None,
            session_id: None,
            dialin_duration: None,
            ticket_number: None,
            ticket_driver: None,
        }
    }
}

/// One row in `company_events`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEvent {
    /// Event instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// Event kind
    #[serde(rename = "type")]
    pub kind: CompanyEventKind,
    /// Company identifier
    pub company: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_name: Option<String>,
}

impl CompanyEvent {
    /// A purchase of `count` devices
    pub fn purchased(timestamp: DateTime<Utc>, company: impl Into<String>, count: i64) -> Self {
        Self {
            timestamp,
            kind: CompanyEventKind::Purchased,
            company: company.into(),
            purchased: Some(count),
            provisioned: None,
            serial_number: None,
            box_name: None,
        }
    }

    /// A single device provisioned
    pub fn provisioned(
        timestamp: DateTime<Utc>,
        company: impl Into<String>,
        serial_number: impl Into<String>,
        box_name: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            kind: CompanyEventKind::Provisioned,
            company: company.into(),
            purchased: None,
            provisioned: Some(1),
            serial_number: Some(serial_number.into()),
            box_name: Some(box_name.into()),
        }
    }
}

/// Map a wire `type` string to its destination table, if the type is known
pub fn table_for_event_type(event_type: &str) -> Option<&'static str> {
    if CompanyEventKind::parse(event_type).is_some() {
        Some(COMPANY_EVENTS_TABLE)
    } else if UserEventKind::parse(event_type).is_some() {
        Some(USER_EVENTS_TABLE)
    } else {
        None
    }
}
