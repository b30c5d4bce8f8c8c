use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable event schedule the visibility gate is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub event_date: NaiveDate,
    /// Registration window opened by hand ahead of the close date.
    pub manually_opened: bool,
    /// Days before the event when registration closes.
    pub lead_time_days: u32,
}

impl EventConfig {
    pub fn new(event_date: NaiveDate, manually_opened: bool, lead_time_days: u32) -> Self {
        Self {
            event_date,
            manually_opened,
            lead_time_days,
        }
    }

    /// Midnight UTC on the event date.
    pub fn event_starts_at(&self) -> DateTime<Utc> {
        self.event_date.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn registration_closes_at(&self) -> DateTime<Utc> {
        self.event_starts_at()
            .checked_sub_signed(Duration::days(i64::from(self.lead_time_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    BeforeOpen,
    Open,
    Closed,
    AfterEvent,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BeforeOpen => "before_open",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::AfterEvent => "after_event",
        };
        f.write_str(label)
    }
}

/// Which navigation links and page sections are shown for a lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub state: LifecycleState,
    pub show_rsvp_nav: bool,
    pub show_rsvp_form: bool,
    pub show_photos_nav: bool,
    pub show_photos_section: bool,
}

impl From<LifecycleState> for Visibility {
    fn from(state: LifecycleState) -> Self {
        let open = state == LifecycleState::Open;
        let after_event = state == LifecycleState::AfterEvent;
        Self {
            state,
            show_rsvp_nav: open,
            show_rsvp_form: open,
            show_photos_nav: after_event,
            show_photos_section: after_event,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealChoice {
    Chicken,
    Beef,
    Fish,
    Vegetarian,
    Vegan,
}

impl MealChoice {
    pub const ALL: [MealChoice; 5] = [
        MealChoice::Chicken,
        MealChoice::Beef,
        MealChoice::Fish,
        MealChoice::Vegetarian,
        MealChoice::Vegan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Chicken => "Chicken (Poultry)",
            Self::Beef => "Beef (Red Meat)",
            Self::Fish => "Fish (Seafood)",
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryOption {
    None,
    GlutenFree,
    DairyFree,
    NutAllergy,
    ShellfishAllergy,
    Vegan,
    Vegetarian,
    Other,
}

impl DietaryOption {
    pub const ALL: [DietaryOption; 8] = [
        DietaryOption::None,
        DietaryOption::GlutenFree,
        DietaryOption::DairyFree,
        DietaryOption::NutAllergy,
        DietaryOption::ShellfishAllergy,
        DietaryOption::Vegan,
        DietaryOption::Vegetarian,
        DietaryOption::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::GlutenFree => "Gluten-Free",
            Self::DairyFree => "Dairy-Free",
            Self::NutAllergy => "Nut Allergy",
            Self::ShellfishAllergy => "Shellfish Allergy",
            Self::Vegan => "Vegan",
            Self::Vegetarian => "Vegetarian",
            Self::Other => "Other",
        }
    }
}

/// Display name for a guest row: the trimmed entered name, or `Guest {index}` when blank.
pub fn guest_display_name(index: usize, entered: &str) -> String {
    let trimmed = entered.trim();
    if trimmed.is_empty() {
        format!("Guest {index}")
    } else {
        trimmed.to_string()
    }
}
