use super::*;

use shared::domain::{DietaryOption, MealChoice};

use crate::deriver::reconcile;

fn attending_pair() -> RsvpForm {
    let mut form = RsvpForm {
        name: " Marilyn ".to_string(),
        attendance: Some(Attendance::Yes),
        guest_count: Some(2),
        staying_overnight: Some(YesNo::Yes),
        accommodation: Some("on-site bell tent".to_string()),
        song_request: " Dancing Queen ".to_string(),
        ..RsvpForm::default()
    };
    reconcile(&mut form);
    form.guests[0].meal = Some(MealChoice::Fish);
    form.guests[0].dietary.insert(DietaryOption::GlutenFree);
    form.guests[0].dietary.insert(DietaryOption::Other);
    form.guests[1].name = "Ian ".to_string();
    form.guests[1].meal = Some(MealChoice::Beef);
    form.guests[1].dietary.insert(DietaryOption::None);
    form.dietary_details = "no oats".to_string();
    reconcile(&mut form);
    form
}

#[test]
fn record_carries_per_guest_choices_when_attending() {
    let record = build_record(&attending_pair());

    assert_eq!(record.name, "Marilyn");
    assert_eq!(record.attendance, Attendance::Yes);
    assert_eq!(record.num_guests, 2);
    assert_eq!(record.guest_names, vec!["Ian".to_string()]);
    assert_eq!(record.meals.get(&0), Some(&MealChoice::Fish));
    assert_eq!(record.meals.get(&1), Some(&MealChoice::Beef));
    assert_eq!(record.dietary[&0].len(), 2);
    assert_eq!(record.dietary[&1].get(&DietaryOption::None), Some(&true));
    assert_eq!(record.dietary_details, "no oats");
    assert_eq!(record.staying_overnight, Some(YesNo::Yes));
    assert_eq!(record.accommodation.as_deref(), Some("on-site bell tent"));
    assert_eq!(record.song_request, "Dancing Queen");
}

#[test]
fn declined_record_has_no_guest_data() {
    let mut form = attending_pair();
    form.attendance = Some(Attendance::No);
    reconcile(&mut form);

    let record = build_record(&form);
    assert_eq!(record, RsvpRecord::declined("Marilyn"));
}

#[test]
fn wire_format_uses_webhook_field_names() {
    let mut form = attending_pair();
    form.staying_overnight = Some(YesNo::No);
    reconcile(&mut form);

    let json = serde_json::to_value(build_record(&form)).expect("json");
    assert_eq!(json["numGuests"], 2);
    assert_eq!(json["guestNames"][0], "Ian");
    assert_eq!(json["dietary"]["0"]["gluten-free"], true);
    assert_eq!(json["dietary"]["0"]["other"], true);
    assert_eq!(json["meals"]["1"], "beef");
    assert_eq!(json["stayingOvernight"], "no");
    assert!(json.get("accommodation").is_none());
    assert_eq!(json["songRequest"], "Dancing Queen");
}

#[test]
fn confirmation_wording_depends_on_attendance() {
    let attending = confirmation(&build_record(&attending_pair()));
    assert_eq!(
        attending.message,
        "Thank you for your RSVP, Marilyn! We're thrilled that you'll be joining us with 2 guest(s). We can't wait to celebrate with you!"
    );

    let declined = confirmation(&RsvpRecord::declined("Ian"));
    assert_eq!(
        declined.message,
        "Thank you for your RSVP, Ian. We're sorry you can't make it, but we appreciate you letting us know."
    );
}

#[test]
fn control_disables_while_submitting_and_restores_on_drop() {
    let control = SubmitControl::new("Send RSVP");
    let rx = control.subscribe();

    let guard = control.begin().expect("idle control");
    assert_eq!(
        *rx.borrow(),
        SubmitButton {
            enabled: false,
            label: BUSY_SUBMIT_LABEL.to_string()
        }
    );
    assert!(control.is_submitting());
    assert!(matches!(control.begin(), Err(SubmitError::Busy)));

    drop(guard);
    assert_eq!(
        control.current(),
        SubmitButton {
            enabled: true,
            label: "Send RSVP".to_string()
        }
    );
    assert!(control.begin().is_ok());
}
