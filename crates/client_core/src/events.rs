//! Input events the rendering collaborator dispatches into the controller.

use shared::domain::{Attendance, DietaryOption, MealChoice, YesNo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    NameChanged(String),
    AttendanceChanged(Option<Attendance>),
    GuestCountChanged(Option<u8>),
    GuestNameChanged {
        index: usize,
        name: String,
    },
    MealSelected {
        index: usize,
        meal: MealChoice,
    },
    DietaryToggled {
        index: usize,
        option: DietaryOption,
        checked: bool,
    },
    DietaryDetailsChanged(String),
    OvernightChanged(Option<YesNo>),
    AccommodationChanged(Option<String>),
    SongRequestChanged(String),
}

impl FormEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FormEvent::NameChanged(_) => "name_changed",
            FormEvent::AttendanceChanged(_) => "attendance_changed",
            FormEvent::GuestCountChanged(_) => "guest_count_changed",
            FormEvent::GuestNameChanged { .. } => "guest_name_changed",
            FormEvent::MealSelected { .. } => "meal_selected",
            FormEvent::DietaryToggled { .. } => "dietary_toggled",
            FormEvent::DietaryDetailsChanged(_) => "dietary_details_changed",
            FormEvent::OvernightChanged(_) => "overnight_changed",
            FormEvent::AccommodationChanged(_) => "accommodation_changed",
            FormEvent::SongRequestChanged(_) => "song_request_changed",
        }
    }
}
