use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Attendance, DietaryOption, MealChoice, YesNo};

/// Snapshot posted to the delivery endpoint on each submit attempt.
///
/// Guest-indexed maps are keyed by row index, so `"0"` is the primary
/// registrant. Dietary selections are encoded as `{option: true}` objects,
/// the shape the webhook already consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    pub name: String,
    pub attendance: Attendance,
    pub num_guests: u32,
    /// Non-primary guests, in row order.
    pub guest_names: Vec<String>,
    pub dietary: BTreeMap<usize, BTreeMap<DietaryOption, bool>>,
    pub dietary_details: String,
    pub meals: BTreeMap<usize, MealChoice>,
    pub staying_overnight: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<String>,
    pub song_request: String,
}

impl RsvpRecord {
    pub fn declined(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attendance: Attendance::No,
            num_guests: 0,
            guest_names: Vec::new(),
            dietary: BTreeMap::new(),
            dietary_details: String::new(),
            meals: BTreeMap::new(),
            staying_overnight: None,
            accommodation: None,
            song_request: String::new(),
        }
    }

    pub fn is_attending(&self) -> bool {
        self.attendance == Attendance::Yes
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub status: u16,
}
