//! State for the help form: what the student has entered, the images
//! they attached, and the last reply from the coach.
//!
//! Only one request can be outstanding at a time. `begin_submit`
//! refuses to start another while one is in flight, and every
//! submission carries a generation number so an outcome that arrives
//! for anything other than the current submission is dropped.

use anyhow::Error;

use super::transport::HelpTransport;
use crate::api::public::help::{Attachment, HelpRequest};

/// Prefix that marks a failed request in the response area.
pub const ERROR_PREFIX: &str = "Oops — ";

pub const PLACEHOLDER: &str = "Hit Help to get coaching steps that point you in the right direction, without spoiling the solution.
  • Upload a screenshot of your prompt/error
  • Paste a minimal code snippet
  • Describe what you expected vs. what happened";

/// What the response area should show.
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Loading,
    Response(&'a str),
    Placeholder,
}

/// Handed out by `HelpForm::begin_submit` and given back with the
/// outcome in `HelpForm::finish_submit`.
#[derive(Debug)]
pub struct Submission {
    generation: u64,
    pub payload: HelpRequest,
}

#[derive(Debug, Default)]
pub struct HelpForm {
    code: String,
    ask: String,
    attachments: Vec<Attachment>,
    latest_file_name: Option<String>,
    ai_text: String,
    in_flight: bool,
    generation: u64,
}

impl HelpForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_code(&mut self, code: &str) {
        self.code = code.to_string();
    }

    pub fn set_ask(&mut self, ask: &str) {
        self.ask = ask.to_string();
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn ask(&self) -> &str {
        &self.ask
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Name shown next to the upload control.
    pub fn latest_file_name(&self) -> Option<&str> {
        self.latest_file_name.as_deref()
    }

    pub fn ai_text(&self) -> &str {
        &self.ai_text
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the Help control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    /// Appends attachments in the order given. The file label follows
    /// the first one of the batch.
    pub fn add_attachments(&mut self, attachments: Vec<Attachment>) {
        if let Some(first) = attachments.first() {
            self.latest_file_name = Some(first.name.clone());
        }
        self.attachments.extend(attachments);
    }

    /// Removes the attachment at `index`. Out of range indexes are
    /// ignored.
    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        if index >= self.attachments.len() {
            return None;
        }
        let removed = self.attachments.remove(index);
        if index == 0 {
            self.latest_file_name = self.attachments.first().map(|a| a.name.clone());
        }
        Some(removed)
    }

    /// Starts a submission from the current fields. Clears the last
    /// response and marks the form as in flight. Returns `None` if a
    /// request is already outstanding.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.in_flight {
            return None;
        }
        self.ai_text.clear();
        self.in_flight = true;
        self.generation += 1;

        Some(Submission {
            generation: self.generation,
            payload: HelpRequest {
                code: Some(self.code.clone()),
                ask: Some(self.ask.clone()),
                images: self.attachments.clone(),
            },
        })
    }

    /// Records the outcome of a submission. Returns `false` and leaves
    /// the form untouched when the submission is not the one in
    /// flight.
    pub fn finish_submit(&mut self, submission: Submission, outcome: Result<String, Error>) -> bool {
        if !self.in_flight || submission.generation != self.generation {
            tracing::debug!(
                "Dropping stale response for submission {}",
                submission.generation
            );
            return false;
        }

        self.ai_text = match outcome {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("Help request failed: {:#}", err);
                format!("{}{:#}", ERROR_PREFIX, err)
            }
        };
        self.in_flight = false;
        true
    }

    /// Sends the form to `transport` and waits for the reply. Exactly
    /// one request is made, failures end up in the response area.
    /// Returns `false` without sending anything if a request is already
    /// in flight.
    pub async fn submit<T: HelpTransport + ?Sized>(&mut self, transport: &T) -> bool {
        let Some(submission) = self.begin_submit() else {
            return false;
        };
        let outcome = transport.request_help(&submission.payload).await;
        self.finish_submit(submission, outcome)
    }

    pub fn view(&self) -> View<'_> {
        if self.in_flight {
            View::Loading
        } else if !self.ai_text.is_empty() {
            View::Response(&self.ai_text)
        } else {
            View::Placeholder
        }
    }
}
