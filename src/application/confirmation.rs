// Confirm-then-continue flow shared by every mutating operation
use crate::application::error::RecordError;
use async_trait::async_trait;
use serde::Serialize;

/// Question shown to the operator before a staged mutation is applied.
///
/// `ticket` identifies the staged change; only the holder of the ticket can
/// confirm or decline it over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub ticket: u64,
    pub title: String,
    pub message: String,
}

impl Prompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ticket: 0,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Hands out confirmation tickets and checks them against the staged change
#[derive(Debug, Default)]
pub(crate) struct TicketCounter(u64);

impl TicketCounter {
    pub(crate) fn issue(&mut self, mut prompt: Prompt) -> Prompt {
        self.0 += 1;
        prompt.ticket = self.0;
        prompt
    }
}

/// Checks that `ticket` names the change currently awaiting confirmation
pub(crate) fn check_ticket(pending: Option<&Prompt>, ticket: u64) -> Result<(), RecordError> {
    match pending {
        None => Err(RecordError::NothingPending),
        Some(prompt) if prompt.ticket != ticket => Err(RecordError::StaleTicket(ticket)),
        Some(_) => Ok(()),
    }
}

/// Transient success notification emitted after a confirmed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Answers a prompt; the continuation runs only after this resolves
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, prompt: &Prompt) -> bool;
}

/// Confirmer with a fixed answer, handy for scripted callers
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, _prompt: &Prompt) -> bool {
        self.0
    }
}

/// Outcome of a mutation that went through confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Applied { acknowledgement: Acknowledgement },
    /// Confirmed, but there was nothing left to change
    Unchanged,
    Declined,
}

impl Resolution {
    pub fn from_ack(ack: Option<Acknowledgement>) -> Self {
        match ack {
            Some(acknowledgement) => Resolution::Applied { acknowledgement },
            None => Resolution::Unchanged,
        }
    }

    pub fn acknowledgement(&self) -> Option<&Acknowledgement> {
        match self {
            Resolution::Applied { acknowledgement } => Some(acknowledgement),
            _ => None,
        }
    }
}
