//! RSVP form controller: applies input events, keeps the derived view in
//! step with the form, and runs submit attempts.

use std::sync::Arc;

use shared::{
    domain::{EventConfig, LifecycleState, Visibility},
    error::Notice,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::{DeliveryEndpoint, RecountPolicy, Settings},
    delivery::{HttpDelivery, RsvpDelivery},
    deriver::{derive_view, reconcile, FormView},
    error::{DeliveryError, InputError, SubmitError},
    events::FormEvent,
    form::{Field, RsvpForm},
    submitter::{build_record, confirmation, SubmitControl},
    validator::validate,
    visibility::{visibility, Clock, SystemClock},
};

pub struct RsvpController {
    event: EventConfig,
    endpoint: DeliveryEndpoint,
    max_guests: u8,
    recount_policy: RecountPolicy,
    form: RsvpForm,
    view: FormView,
    control: SubmitControl,
    delivery: Arc<dyn RsvpDelivery>,
    clock: Arc<dyn Clock>,
}

impl RsvpController {
    pub fn new(settings: &Settings) -> Result<Self, DeliveryError> {
        let delivery = HttpDelivery::new(settings.request_timeout)?;
        Ok(Self::with_dependencies(
            settings,
            Arc::new(delivery),
            Arc::new(SystemClock),
        ))
    }

    pub fn with_dependencies(
        settings: &Settings,
        delivery: Arc<dyn RsvpDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let form = RsvpForm::default();
        let view = derive_view(&form);
        Self {
            event: settings.event_config(),
            endpoint: settings.delivery_endpoint.clone(),
            max_guests: settings.max_guests,
            recount_policy: settings.recount_policy,
            form,
            view,
            control: SubmitControl::default(),
            delivery,
            clock,
        }
    }

    pub fn form(&self) -> &RsvpForm {
        &self.form
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    pub fn visibility(&self) -> Visibility {
        visibility(&self.event, self.clock.now())
    }

    /// Replaces the whole form, e.g. with a saved draft.
    pub fn load_draft(&mut self, form: RsvpForm) -> Result<&FormView, InputError> {
        if let Some(count) = form.guest_count {
            self.check_guest_count(count)?;
        }
        self.form = form;
        Ok(self.refresh())
    }

    pub fn handle(&mut self, event: FormEvent) -> Result<&FormView, InputError> {
        debug!(event = event.name(), "rsvp: form event");
        self.apply(event)?;
        Ok(self.refresh())
    }

    fn apply(&mut self, event: FormEvent) -> Result<(), InputError> {
        match event {
            FormEvent::NameChanged(name) => self.form.name = name,
            FormEvent::AttendanceChanged(attendance) => self.form.attendance = attendance,
            FormEvent::GuestCountChanged(count) => {
                self.require_visible(Field::GuestCount, self.view.guest_count.visible)?;
                if let Some(count) = count {
                    self.check_guest_count(count)?;
                }
                self.form.set_guest_count(count, self.recount_policy);
            }
            FormEvent::GuestNameChanged { index, name } => {
                if !self.view.guest_names.iter().any(|input| input.index == index) {
                    return Err(self.index_error(index, self.view.guest_names.len() + 1));
                }
                self.form.guests[index].name = name;
            }
            FormEvent::MealSelected { index, meal } => {
                if index >= self.view.meal_rows.len() {
                    return Err(self.index_error(index, self.view.meal_rows.len()));
                }
                self.form.guests[index].meal = Some(meal);
            }
            FormEvent::DietaryToggled {
                index,
                option,
                checked,
            } => {
                if index >= self.view.dietary_rows.len() {
                    return Err(self.index_error(index, self.view.dietary_rows.len()));
                }
                let selection = &mut self.form.guests[index].dietary;
                if checked {
                    selection.insert(option);
                } else {
                    selection.remove(&option);
                }
            }
            FormEvent::DietaryDetailsChanged(details) => {
                self.require_visible(Field::DietaryDetails, self.view.dietary_details.visible)?;
                self.form.dietary_details = details;
            }
            FormEvent::OvernightChanged(overnight) => {
                self.require_visible(Field::StayingOvernight, self.view.staying_overnight.visible)?;
                self.form.staying_overnight = overnight;
            }
            FormEvent::AccommodationChanged(accommodation) => {
                self.require_visible(Field::Accommodation, self.view.accommodation.visible)?;
                self.form.accommodation = accommodation;
            }
            FormEvent::SongRequestChanged(song) => {
                self.require_visible(Field::SongRequest, self.view.song_request.visible)?;
                self.form.song_request = song;
            }
        }
        Ok(())
    }

    fn refresh(&mut self) -> &FormView {
        reconcile(&mut self.form);
        self.view = derive_view(&self.form);
        &self.view
    }

    fn require_visible(&self, field: Field, visible: bool) -> Result<(), InputError> {
        if visible {
            Ok(())
        } else {
            Err(InputError::FieldHidden(field))
        }
    }

    fn check_guest_count(&self, count: u8) -> Result<(), InputError> {
        if count == 0 || count > self.max_guests {
            return Err(InputError::GuestCountOutOfRange {
                count,
                max: self.max_guests,
            });
        }
        Ok(())
    }

    fn index_error(&self, index: usize, count: usize) -> InputError {
        warn!(index, count, "rsvp: event for a guest row that is not shown");
        InputError::GuestIndexOutOfRange { index, count }
    }

    /// One submit attempt. On success the form is cleared; on any failure it
    /// is left as it was so the guest can retry.
    pub async fn submit(&mut self) -> Result<Notice, SubmitError> {
        let state = self.visibility().state;
        if state != LifecycleState::Open {
            warn!(%state, "rsvp: submit outside the registration window");
            return Err(SubmitError::RegistrationClosed { state });
        }

        if let Err(err) = validate(&self.form, &self.view) {
            info!(error = %err, "rsvp: submit blocked by validation");
            return Err(err.into());
        }

        let Some(endpoint) = self.endpoint.url().cloned() else {
            error!("rsvp: delivery endpoint not configured; set delivery_endpoint in rsvp.toml or RSVP_DELIVERY_ENDPOINT");
            return Err(SubmitError::NotConfigured);
        };

        let _guard = self.control.begin()?;
        let record = build_record(&self.form);
        info!(
            attendance = ?record.attendance,
            num_guests = record.num_guests,
            "rsvp: submitting"
        );

        match self.delivery.deliver(&endpoint, &record).await {
            Ok(receipt) => {
                info!(status = receipt.status, "rsvp: delivered");
                let notice = confirmation(&record);
                self.form.reset();
                self.refresh();
                Ok(notice)
            }
            Err(err) => {
                error!(error = %err, "rsvp: delivery failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
