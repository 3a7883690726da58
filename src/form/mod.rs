//! Report and event forms
//!
//! Each form controller owns its field values and its location field,
//! validates presence (and event time ordering) and hands a finished record
//! to a `SubmissionSink`.

pub mod event;
pub mod issue;
pub mod submit;

pub use event::EventForm;
pub use issue::IssueForm;
pub use submit::{AcknowledgeSink, Receipt, SubmissionSink};

use crate::location::LocationSelection;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The two forms on the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Report a problem
    Issue,
    /// Create a community event
    Event,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue => write!(f, "issue"),
            Self::Event => write!(f, "event"),
        }
    }
}

/// Kind of community event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Cleanup,
    Repair,
    Other,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleanup => write!(f, "cleanup"),
            Self::Repair => write!(f, "repair"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cleanup" | "clean-up" | "clean_up" => Ok(Self::Cleanup),
            "repair" => Ok(Self::Repair),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown event type: {}", s)),
        }
    }
}

/// Reference to a chosen photo; the file itself is never read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    pub file_name: String,
    pub path: PathBuf,
}

impl PhotoAttachment {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file_name, path }
    }
}

/// A validation problem tied to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn required(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// All field errors found by one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Error for a specific field, if any
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// A submitted problem report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueReport {
    pub subject: String,
    pub details: String,
    pub location: LocationSelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoAttachment>,
}

/// A submitted community event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityEvent {
    pub event_type: EventType,
    pub details: String,
    pub start_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    pub location: LocationSelection,
}

/// The record carried by a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Issue(IssueReport),
    Event(CommunityEvent),
}

impl Record {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Issue(_) => FormKind::Issue,
            Self::Event(_) => FormKind::Event,
        }
    }

    pub fn location(&self) -> &LocationSelection {
        match self {
            Self::Issue(report) => &report.location,
            Self::Event(event) => &event.location,
        }
    }
}

/// Immutable record handed to the submission sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub record: Record,
}

impl Submission {
    pub fn new(record: Record) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            record,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.record.kind()
    }
}
