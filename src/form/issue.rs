//! "Report a problem" form

use crate::error::{Error, Result};
use crate::form::submit::{hand_off, Receipt, SubmissionSink};
use crate::form::{FieldError, FormKind, IssueReport, PhotoAttachment, Record, Submission, ValidationErrors};
use crate::location::LocationField;

/// Form controller for issue reports
#[derive(Debug)]
pub struct IssueForm {
    subject: String,
    details: String,
    photo: Option<PhotoAttachment>,
    location: LocationField,
}

impl Default for IssueForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueForm {
    pub fn new() -> Self {
        Self {
            subject: String::new(),
            details: String::new(),
            photo: None,
            location: LocationField::new(FormKind::Issue),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn set_details(&mut self, details: impl Into<String>) {
        self.details = details.into();
    }

    pub fn photo(&self) -> Option<&PhotoAttachment> {
        self.photo.as_ref()
    }

    pub fn attach_photo(&mut self, photo: PhotoAttachment) {
        self.photo = Some(photo);
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
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
        if self.subject.trim().is_empty() {
            errors.push(FieldError::required("subject"));
        }
        if self.details.trim().is_empty() {
            errors.push(FieldError::required("details"));
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

        let location = self
            .location
            .selection()
            .ok_or_else(|| Error::ValidationFailed(ValidationErrors(vec![FieldError::required("location")])))?;

        let record = Record::Issue(IssueReport {
            subject: self.subject.trim().to_string(),
            details: self.details.trim().to_string(),
            location,
            photo: self.photo.clone(),
        });

        let receipt = hand_off(sink, Submission::new(record))?;
        self.reset();
        Ok(receipt)
    }

    /// Clear every field, including the location
    pub fn reset(&mut self) {
        self.subject.clear();
        self.details.clear();
        self.photo = None;
        self.location.reset();
    }
}
