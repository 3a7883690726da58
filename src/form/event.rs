//! "Create an event" form
//!
//! Times are entered the way a `datetime-local` input produces them
//! (`2025-06-01T10:00`). Whether the end time is mandatory is policy taken
//! from `FormsConfig`.

use crate::config::FormsConfig;
use crate::error::{Error, Result};
use crate::form::submit::{hand_off, Receipt, SubmissionSink};
use crate::form::{
    CommunityEvent, EventType, FieldError, FormKind, Record, Submission, ValidationErrors,
};
use crate::location::LocationField;
use chrono::NaiveDateTime;

const TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date-time as entered in the form
pub fn parse_event_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Form controller for community events
#[derive(Debug)]
pub struct EventForm {
    event_type: EventType,
    details: String,
    start_time: String,
    end_time: String,
    location: LocationField,
    end_required: bool,
}

impl EventForm {
    pub fn new(policy: FormsConfig) -> Self {
        Self {
            event_type: EventType::default(),
            details: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            location: LocationField::new(FormKind::Event),
            end_required: policy.event_end_required,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn set_event_type(&mut self, event_type: EventType) {
        self.event_type = event_type;
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn set_details(&mut self, details: impl Into<String>) {
        self.details = details.into();
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn set_start_time(&mut self, start: impl Into<String>) {
        self.start_time = start.into();
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    pub fn set_end_time(&mut self, end: impl Into<String>) {
        self.end_time = end.into();
    }

    pub fn end_required(&self) -> bool {
        self.end_required
    }

    pub fn location(&self) -> &LocationField {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut LocationField {
        &mut self.location
    }

    /// Field-level problems preventing submission
    pub fn validation_errors(&self) -> ValidationErrors {
        let mut errors = Vec::new();

        if self.details.trim().is_empty() {
            errors.push(FieldError::required("details"));
        }

        let start = match self.start_time.trim() {
            "" => {
                errors.push(FieldError::required("start_time"));
                None
            }
            value => {
                let parsed = parse_event_time(value);
                if parsed.is_none() {
                    errors.push(FieldError::new("start_time", "is not a valid date and time"));
                }
                parsed
            }
        };

        let end = match self.end_time.trim() {
            "" => {
                if self.end_required {
                    errors.push(FieldError::required("end_time"));
                }
                None
            }
            value => {
                let parsed = parse_event_time(value);
                if parsed.is_none() {
                    errors.push(FieldError::new("end_time", "is not a valid date and time"));
                }
                parsed
            }
        };

        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                errors.push(FieldError::new("end_time", "must not be before the start time"));
            }
        }

        if self.location.selection().is_none() {
            errors.push(FieldError::required("location"));
        }

        ValidationErrors(errors)
    }

    pub fn validate(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Validate, hand the record to `sink` and clear the form
    ///
    /// Nothing changes if validation or the sink fails.
    pub fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<Receipt> {
        let errors = self.validation_errors();
        if !errors.is_empty() {
            return Err(Error::ValidationFailed(errors));
        }

        let missing = |field| Error::ValidationFailed(ValidationErrors(vec![FieldError::required(field)]));
        let start_time = parse_event_time(&self.start_time).ok_or_else(|| missing("start_time"))?;
        let location = self.location.selection().ok_or_else(|| missing("location"))?;

        let record = Record::Event(CommunityEvent {
            event_type: self.event_type,
            details: self.details.trim().to_string(),
            start_time,
            end_time: parse_event_time(&self.end_time),
            location,
        });

        let receipt = hand_off(sink, Submission::new(record))?;
        self.reset();
        Ok(receipt)
    }

    /// Clear every field, including the location
    pub fn reset(&mut self) {
        self.event_type = EventType::default();
        self.details.clear();
        self.start_time.clear();
        self.end_time.clear();
        self.location.reset();
    }
}
