use std::path::PathBuf;

use shared::{
    domain::LifecycleState,
    error::{ErrorCode, Notice},
};
use thiserror::Error;

use crate::form::Field;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "RSVP submission is not yet configured. Please check back soon or contact us directly.";
pub const DELIVERY_FAILED_MESSAGE: &str = "Sorry, there was a problem submitting your RSVP. Please try again, or contact us directly if the problem persists.";
pub const REGISTRATION_CLOSED_MESSAGE: &str = "RSVPs are not being accepted right now.";
pub const BUSY_MESSAGE: &str = "Your RSVP is already being submitted.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Input that the rendered form could not have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("guest count {count} is outside 1..={max}")]
    GuestCountOutOfRange { count: u8, max: u8 },
    #[error("no guest row {index} (guest count is {count})")]
    GuestIndexOutOfRange { index: usize, count: usize },
    #[error("field {0:?} is not shown")]
    FieldHidden(Field),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub field: Field,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", join_labels(.0))]
    MissingRequired(Vec<MissingField>),
    #[error("missing dietary selection for: {}", .guests.join(", "))]
    MissingDietarySelection { guests: Vec<String> },
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingRequired(fields) => {
                format!("Please complete the required fields: {}", join_labels(fields))
            }
            Self::MissingDietarySelection { guests } => format!(
                "Please select at least one dietary option for: {}",
                guests.join(", ")
            ),
        }
    }
}

fn join_labels(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|f| f.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("delivery endpoint answered with status {status}")]
    Rejected { status: u16 },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("delivery endpoint is not configured")]
    NotConfigured,
    #[error("registration is {state}, submissions are not accepted")]
    RegistrationClosed { state: LifecycleState },
    #[error("a submission is already in flight")]
    Busy,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl SubmitError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotConfigured => ErrorCode::Configuration,
            Self::RegistrationClosed { .. } => ErrorCode::RegistrationClosed,
            Self::Busy => ErrorCode::Busy,
            Self::Validation(_) => ErrorCode::Validation,
            Self::Delivery(_) => ErrorCode::Transport,
        }
    }

    /// Recoverable errors leave the form intact for another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Delivery(_) | Self::Busy)
    }

    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::NotConfigured => NOT_CONFIGURED_MESSAGE.to_string(),
            Self::RegistrationClosed { .. } => REGISTRATION_CLOSED_MESSAGE.to_string(),
            Self::Busy => BUSY_MESSAGE.to_string(),
            Self::Validation(err) => err.user_message(),
            Self::Delivery(_) => DELIVERY_FAILED_MESSAGE.to_string(),
        };
        Notice::error(self.code(), message)
    }
}
