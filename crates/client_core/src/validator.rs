use crate::{
    deriver::FormView,
    error::{MissingField, ValidationError},
    form::{Field, RsvpForm},
};

/// Blocks a submit attempt. Required fields are checked first, the way a
/// browser refuses to fire the submit handler; the dietary rule runs after.
pub fn validate(form: &RsvpForm, view: &FormView) -> Result<(), ValidationError> {
    let missing = missing_required(form, view);
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired(missing));
    }

    let guests = guests_without_dietary(form);
    if !guests.is_empty() {
        return Err(ValidationError::MissingDietarySelection { guests });
    }
    Ok(())
}

pub fn missing_required(form: &RsvpForm, view: &FormView) -> Vec<MissingField> {
    let mut missing = Vec::new();
    let mut push = |field: Field, label: String| missing.push(MissingField { field, label });

    if form.primary_name().is_empty() {
        push(Field::Name, "Name".to_string());
    }
    if form.attendance.is_none() {
        push(Field::Attendance, "Attendance".to_string());
    }
    if view.guest_count.required && !matches!(form.guest_count, Some(n) if n > 0) {
        push(Field::GuestCount, "Number of guests".to_string());
    }
    for input in &view.guest_names {
        if input.required && input.value.trim().is_empty() {
            push(
                Field::GuestName(input.index),
                format!("Guest {} name", input.index),
            );
        }
    }
    for row in &view.meal_rows {
        if row.selected.is_none() {
            push(Field::Meal(row.index), format!("Meal for {}", row.label));
        }
    }
    if view.dietary_details.required && form.dietary_details.trim().is_empty() {
        push(Field::DietaryDetails, "Dietary details".to_string());
    }
    if view.staying_overnight.required && form.staying_overnight.is_none() {
        push(Field::StayingOvernight, "Staying overnight".to_string());
    }
    if view.accommodation.required
        && form
            .accommodation
            .as_deref()
            .map_or(true, |v| v.trim().is_empty())
    {
        push(Field::Accommodation, "Accommodation".to_string());
    }
    missing
}

/// Display names of attending guests with no dietary box ticked.
pub fn guests_without_dietary(form: &RsvpForm) -> Vec<String> {
    let rows = form.attending_count();
    (0..rows)
        .filter(|&index| {
            !form
                .guests
                .get(index)
                .is_some_and(|g| g.has_dietary_selection())
        })
        .map(|index| form.display_name(index))
        .collect()
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
