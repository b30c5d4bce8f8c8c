//! Client-side RSVP form controller: visibility gate, form field deriver,
//! validator, and submitter.

pub mod config;
pub mod controller;
pub mod delivery;
pub mod deriver;
pub mod error;
pub mod events;
pub mod form;
pub mod photos;
pub mod submitter;
pub mod validator;
pub mod visibility;

pub use config::{load_settings, DeliveryEndpoint, RecountPolicy, Settings};
pub use controller::RsvpController;
pub use delivery::{HttpDelivery, RsvpDelivery};
pub use deriver::{derive_view, reconcile, FormView};
pub use error::{ConfigError, DeliveryError, InputError, SubmitError, ValidationError};
pub use events::FormEvent;
pub use form::{Field, GuestEntry, RsvpForm};
pub use photos::PhotoUpload;
pub use submitter::{build_record, SubmitControl};
pub use validator::validate;
pub use visibility::{compute_state, Clock, FixedClock, SystemClock, VisibilityWatcher};
