//! Lifecycle of a single roast request.
//!
//! `begin` validates the input and hands out a [`Ticket`]; `complete` applies
//! the outcome for that ticket. Every `begin` and `cancel` bumps a generation
//! counter, so an outcome arriving for an older ticket is dropped and the most
//! recent submission always wins.

use tracing::{debug, info, warn};

use crate::notice::Notice;
use crate::roast::{RoastClient, RoastError, RoastRequest, RoastResponse};

pub const EMPTY_INPUT: &str = "Please enter some text to roast!";
pub const GENERATED: &str = "Roasts generated successfully!";
pub const GENERATE_FAILED: &str = "Failed to generate roasts. Please try again.";
pub const UNEXPECTED_SHAPE: &str = "The service returned an unexpected response.";
/// Shown in place of a response when the call failed.
pub const ERROR_MARKER: &str = "Error occurred while fetching response";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Pending => "Generating...",
            SubmissionState::Succeeded => "Done",
            SubmissionState::Failed => "Failed",
        }
    }
}

/// Handle for one in-flight submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    content: String,
}

impl Ticket {
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug)]
pub struct SubmissionController {
    state: SubmissionState,
    content: String,
    response: Option<String>,
    // content that produced `response`
    submitted: Option<String>,
    generation: u64,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionController {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            content: String::new(),
            response: None,
            submitted: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn set_content<S: Into<String>>(&mut self, s: S) {
        self.content = s.into();
        if matches!(
            self.state,
            SubmissionState::Succeeded | SubmissionState::Failed
        ) {
            self.state = SubmissionState::Idle;
        }
    }

    /// Last completed exchange, eligible for saving.
    pub fn saveable(&self) -> Option<(&str, &str)> {
        match (&self.submitted, &self.response) {
            (Some(c), Some(r)) => Some((c.as_str(), r.as_str())),
            _ => None,
        }
    }

    pub fn begin(&mut self) -> Result<Ticket, Notice> {
        if self.content.trim().is_empty() {
            debug!(target: "roast_core::submission", "rejecting empty input");
            return Err(Notice::error(EMPTY_INPUT));
        }
        if self.is_pending() {
            info!(target: "roast_core::submission", "superseding in-flight request gen={}", self.generation);
        }
        self.generation += 1;
        self.state = SubmissionState::Pending;
        info!(target: "roast_core::submission", "begin gen={} input_len={}", self.generation, self.content.len());
        Ok(Ticket {
            generation: self.generation,
            content: self.content.clone(),
        })
    }

    pub fn complete(
        &mut self,
        ticket: &Ticket,
        outcome: Result<serde_json::Value, RoastError>,
    ) -> Option<Notice> {
        if ticket.generation != self.generation || !self.is_pending() {
            debug!(target: "roast_core::submission", "discarding stale outcome gen={} current={}", ticket.generation, self.generation);
            return None;
        }
        self.submitted = Some(ticket.content.clone());
        let notice = match outcome.and_then(|v| {
            RoastResponse::from_value(&v)?;
            serde_json::to_string_pretty(&v).map_err(|e| RoastError::Decode(e.to_string()))
        }) {
            Ok(pretty) => {
                self.state = SubmissionState::Succeeded;
                self.response = Some(pretty);
                Notice::success(GENERATED)
            }
            Err(e) => {
                warn!(target: "roast_core::submission", "request failed gen={}: {}", ticket.generation, e);
                self.state = SubmissionState::Failed;
                self.response = Some(ERROR_MARKER.to_string());
                match e {
                    RoastError::Shape(_) => Notice::error(UNEXPECTED_SHAPE),
                    _ => Notice::error(GENERATE_FAILED),
                }
            }
        };
        Some(notice)
    }

    /// Invalidates the in-flight ticket. Returns false when nothing was pending.
    pub fn cancel(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.generation += 1;
        self.state = SubmissionState::Idle;
        info!(target: "roast_core::submission", "canceled; now gen={}", self.generation);
        true
    }

    pub async fn submit<C: RoastClient>(&mut self, client: &C) -> Notice {
        let ticket = match self.begin() {
            Ok(t) => t,
            Err(n) => return n,
        };
        let outcome = client.generate(&RoastRequest::new(ticket.content())).await;
        self.complete(&ticket, outcome)
            .unwrap_or_else(|| Notice::error(GENERATE_FAILED))
    }
}
