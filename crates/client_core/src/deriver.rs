//! Which optional fields exist, which are required, and which get cleared.
//!
//! Both entry points recompute from the whole form every time; neither looks
//! at the previous view.

use std::collections::BTreeSet;

use serde::Serialize;
use shared::domain::{DietaryOption, MealChoice, YesNo};

use crate::form::{GuestEntry, RsvpForm};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub visible: bool,
    pub required: bool,
}

impl FieldState {
    pub const HIDDEN: FieldState = FieldState {
        visible: false,
        required: false,
    };

    pub fn shown(required: bool) -> Self {
        Self {
            visible: true,
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestNameInput {
    pub index: usize,
    pub placeholder: String,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealRow {
    pub index: usize,
    pub label: String,
    pub selected: Option<MealChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DietaryRow {
    pub index: usize,
    pub label: String,
    pub selected: BTreeSet<DietaryOption>,
}

/// Projection of an [`RsvpForm`] for the rendering collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub guest_count: FieldState,
    pub guest_names: Vec<GuestNameInput>,
    pub meal_rows: Vec<MealRow>,
    pub dietary_rows: Vec<DietaryRow>,
    pub dietary_details: FieldState,
    pub staying_overnight: FieldState,
    pub accommodation: FieldState,
    pub song_request: FieldState,
}

impl FormView {
    pub fn guest_names_visible(&self) -> bool {
        !self.guest_names.is_empty()
    }

    pub fn meal_grid_visible(&self) -> bool {
        !self.meal_rows.is_empty()
    }

    pub fn dietary_grid_visible(&self) -> bool {
        !self.dietary_rows.is_empty()
    }
}

/// Clears every value whose field is hidden and sizes the guest rows to the
/// guest count. Idempotent.
pub fn reconcile(form: &mut RsvpForm) {
    if !form.is_attending() {
        form.guest_count = None;
        form.guests.clear();
        form.staying_overnight = None;
        form.accommodation = None;
        form.song_request.clear();
        form.dietary_details.clear();
        return;
    }

    let rows = form.attending_count();
    form.guests.resize_with(rows, GuestEntry::default);
    if let Some(primary) = form.guests.first_mut() {
        primary.name = form.name.trim().to_string();
    }

    if form.staying_overnight != Some(YesNo::Yes) {
        form.accommodation = None;
    }
    if !form.any_other_dietary() {
        form.dietary_details.clear();
    }
}

pub fn derive_view(form: &RsvpForm) -> FormView {
    if !form.is_attending() {
        return FormView::default();
    }

    let rows = form.attending_count();

    let guest_names = if rows > 1 {
        (1..rows)
            .map(|index| GuestNameInput {
                index,
                placeholder: format!("Guest {index} full name"),
                value: form
                    .guests
                    .get(index)
                    .map(|g| g.name.clone())
                    .unwrap_or_default(),
                required: true,
            })
            .collect()
    } else {
        Vec::new()
    };

    let grids_shown = rows > 0 && !form.primary_name().is_empty();
    let (meal_rows, dietary_rows): (Vec<MealRow>, Vec<DietaryRow>) = if grids_shown {
        (0..rows)
            .map(|index| {
                let label = form.display_name(index);
                let entry = form.guests.get(index);
                (
                    MealRow {
                        index,
                        label: label.clone(),
                        selected: entry.and_then(|g| g.meal),
                    },
                    DietaryRow {
                        index,
                        label,
                        selected: entry.map(|g| g.dietary.clone()).unwrap_or_default(),
                    },
                )
            })
            .unzip()
    } else {
        (Vec::new(), Vec::new())
    };

    let any_other = dietary_rows
        .iter()
        .any(|row| row.selected.contains(&DietaryOption::Other));
    let overnight = form.staying_overnight == Some(YesNo::Yes);

    FormView {
        guest_count: FieldState::shown(true),
        guest_names,
        meal_rows,
        dietary_rows,
        dietary_details: if any_other {
            FieldState::shown(true)
        } else {
            FieldState::HIDDEN
        },
        staying_overnight: FieldState::shown(true),
        accommodation: if overnight {
            FieldState::shown(true)
        } else {
            FieldState::HIDDEN
        },
        song_request: FieldState::shown(false),
    }
}

#[cfg(test)]
#[path = "tests/deriver_tests.rs"]
mod tests;
