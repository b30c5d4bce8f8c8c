//! Typed RSVP form state. Rendering reads this; nothing reads the rendering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared::domain::{guest_display_name, Attendance, DietaryOption, MealChoice, YesNo};

use crate::config::RecountPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "index", rename_all = "snake_case")]
pub enum Field {
    Name,
    Attendance,
    GuestCount,
    GuestName(usize),
    Meal(usize),
    DietaryDetails,
    StayingOvernight,
    Accommodation,
    SongRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestEntry {
    /// Ignored for row 0, which takes the registrant's name.
    pub name: String,
    pub meal: Option<MealChoice>,
    pub dietary: BTreeSet<DietaryOption>,
}

impl GuestEntry {
    pub fn has_dietary_selection(&self) -> bool {
        !self.dietary.is_empty()
    }

    pub fn wants_other_dietary(&self) -> bool {
        self.dietary.contains(&DietaryOption::Other)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsvpForm {
    pub name: String,
    pub attendance: Option<Attendance>,
    pub guest_count: Option<u8>,
    /// One entry per attendee; row 0 is the registrant.
    pub guests: Vec<GuestEntry>,
    pub dietary_details: String,
    pub staying_overnight: Option<YesNo>,
    pub accommodation: Option<String>,
    pub song_request: String,
}

impl RsvpForm {
    pub fn is_attending(&self) -> bool {
        self.attendance == Some(Attendance::Yes)
    }

    pub fn primary_name(&self) -> &str {
        self.name.trim()
    }

    /// Rows that take part in the grids and the dietary check.
    pub fn attending_count(&self) -> usize {
        if self.is_attending() {
            usize::from(self.guest_count.unwrap_or(0))
        } else {
            0
        }
    }

    /// Label for row `index`, falling back to `Guest {index}` for blank names.
    pub fn display_name(&self, index: usize) -> String {
        if index == 0 {
            return self.primary_name().to_string();
        }
        let entered = self
            .guests
            .get(index)
            .map(|g| g.name.as_str())
            .unwrap_or_default();
        guest_display_name(index, entered)
    }

    pub fn any_other_dietary(&self) -> bool {
        self.guests
            .iter()
            .take(self.attending_count())
            .any(GuestEntry::wants_other_dietary)
    }

    /// Changes the guest count and regenerates the guest rows under `policy`.
    pub fn set_guest_count(&mut self, count: Option<u8>, policy: RecountPolicy) {
        if count == self.guest_count {
            return;
        }
        self.guest_count = count;
        let rows = usize::from(count.unwrap_or(0));
        match policy {
            RecountPolicy::Preserve => self.guests.resize_with(rows, GuestEntry::default),
            RecountPolicy::Rebuild => {
                self.guests.clear();
                self.guests.resize_with(rows, GuestEntry::default);
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
