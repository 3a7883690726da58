//! Submission sinks
//!
//! A sink receives the finished record of a form. The default sink only
//! acknowledges it to the user; a real deployment plugs in its own.

use crate::constants::locale::{EVENT_ACKNOWLEDGMENT, ISSUE_ACKNOWLEDGMENT};
use crate::error::{Error, Result};
use crate::form::{FormKind, Submission};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What the user gets back after a submission was handed off
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub submission: Submission,
    pub message: String,
}

/// Trait for submission collaborators
pub trait SubmissionSink: Send + Sync {
    /// Sink name, for logs
    fn name(&self) -> &'static str;

    /// Accept a finished record
    fn deliver(&self, submission: Submission) -> Result<Receipt>;
}

/// Hand a finished record to `sink`
///
/// A failing sink is reported as a submission error naming the sink.
pub fn hand_off(sink: &dyn SubmissionSink, submission: Submission) -> Result<Receipt> {
    let id = submission.id;
    match sink.deliver(submission) {
        Ok(receipt) => {
            debug!(%id, sink = sink.name(), "Submission delivered");
            Ok(receipt)
        }
        Err(e) => {
            warn!(%id, sink = sink.name(), "Submission failed: {}", e);
            Err(Error::Submission(format!("{} sink: {}", sink.name(), e)))
        }
    }
}

/// Sink that acknowledges every record and keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct AcknowledgeSink;

impl SubmissionSink for AcknowledgeSink {
    fn name(&self) -> &'static str {
        "acknowledge"
    }

    fn deliver(&self, submission: Submission) -> Result<Receipt> {
        info!(
            sink = self.name(),
            id = %submission.id,
            kind = %submission.kind(),
            location = submission.record.location().address(),
            "Submission acknowledged"
        );

        let message = match submission.kind() {
            FormKind::Issue => ISSUE_ACKNOWLEDGMENT,
            FormKind::Event => EVENT_ACKNOWLEDGMENT,
        };

        Ok(Receipt {
            submission,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Sinks that record or refuse submissions

    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub delivered: Mutex<Vec<Submission>>,
    }

    impl RecordingSink {
        pub fn count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }

        pub fn last(&self) -> Option<Submission> {
            self.delivered.lock().unwrap().last().cloned()
        }
    }

    impl SubmissionSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn deliver(&self, submission: Submission) -> Result<Receipt> {
            self.delivered.lock().unwrap().push(submission.clone());
            Ok(Receipt {
                submission,
                message: "recorded".to_string(),
            })
        }
    }

    #[derive(Debug, Default)]
    pub struct FailingSink;

    impl SubmissionSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn deliver(&self, _submission: Submission) -> Result<Receipt> {
            Err(Error::Submission("backend unreachable".to_string()))
        }
    }
}
