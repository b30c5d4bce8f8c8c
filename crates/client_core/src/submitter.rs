//! Submit control state machine and record snapshotting.

use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use shared::{
    domain::{Attendance, YesNo},
    error::Notice,
    protocol::RsvpRecord,
};
use tokio::sync::watch;

use crate::{error::SubmitError, form::RsvpForm};

pub const DEFAULT_SUBMIT_LABEL: &str = "Send RSVP";
pub const BUSY_SUBMIT_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitButton {
    pub enabled: bool,
    pub label: String,
}

/// Idle/submitting state of the submit button, observable through
/// [`SubmitControl::subscribe`].
#[derive(Debug, Clone)]
pub struct SubmitControl {
    tx: Arc<watch::Sender<SubmitButton>>,
    idle_label: String,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_LABEL)
    }
}

impl SubmitControl {
    pub fn new(idle_label: impl Into<String>) -> Self {
        let idle_label = idle_label.into();
        let (tx, _rx) = watch::channel(SubmitButton {
            enabled: true,
            label: idle_label.clone(),
        });
        Self {
            tx: Arc::new(tx),
            idle_label,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitButton> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SubmitButton {
        self.tx.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        !self.tx.borrow().enabled
    }

    /// Moves to SUBMITTING. The returned guard moves back to IDLE when
    /// dropped, whichever way the attempt ends.
    pub fn begin(&self) -> Result<SubmitGuard, SubmitError> {
        let mut acquired = false;
        self.tx.send_if_modified(|button| {
            if !button.enabled {
                return false;
            }
            button.enabled = false;
            button.label = BUSY_SUBMIT_LABEL.to_string();
            acquired = true;
            true
        });

        if !acquired {
            return Err(SubmitError::Busy);
        }
        Ok(SubmitGuard {
            tx: Arc::clone(&self.tx),
            idle_label: self.idle_label.clone(),
        })
    }
}

#[must_use = "dropping the guard immediately re-enables the submit control"]
pub struct SubmitGuard {
    tx: Arc<watch::Sender<SubmitButton>>,
    idle_label: String,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        let label = std::mem::take(&mut self.idle_label);
        self.tx.send_modify(|button| {
            button.enabled = true;
            button.label = label;
        });
    }
}

/// Snapshot of the current form. Guest data is only carried when attending.
pub fn build_record(form: &RsvpForm) -> RsvpRecord {
    let attendance = form.attendance.unwrap_or(Attendance::No);
    let num_guests = u32::from(form.guest_count.unwrap_or(0));
    let mut record = RsvpRecord {
        attendance,
        num_guests,
        ..RsvpRecord::declined(form.primary_name())
    };

    let rows = form.attending_count();
    if rows == 0 {
        return record;
    }

    record.guest_names = form
        .guests
        .iter()
        .take(rows)
        .skip(1)
        .map(|g| g.name.trim().to_string())
        .collect();

    for (index, guest) in form.guests.iter().take(rows).enumerate() {
        record.dietary.insert(
            index,
            guest.dietary.iter().map(|option| (*option, true)).collect::<BTreeMap<_, _>>(),
        );
        if let Some(meal) = guest.meal {
            record.meals.insert(index, meal);
        }
    }

    record.dietary_details = form.dietary_details.trim().to_string();
    record.staying_overnight = form.staying_overnight;
    if form.staying_overnight == Some(YesNo::Yes) {
        record.accommodation = form.accommodation.clone();
    }
    record.song_request = form.song_request.trim().to_string();
    record
}

pub fn confirmation(record: &RsvpRecord) -> Notice {
    if record.is_attending() {
        Notice::success(format!(
            "Thank you for your RSVP, {}! We're thrilled that you'll be joining us with {} guest(s). We can't wait to celebrate with you!",
            record.name, record.num_guests
        ))
    } else {
        Notice::success(format!(
            "Thank you for your RSVP, {}. We're sorry you can't make it, but we appreciate you letting us know.",
            record.name
        ))
    }
}

#[cfg(test)]
#[path = "tests/submitter_tests.rs"]
mod tests;
