//! # Booking Wizard
//!
//! The public booking flow as an explicit state machine:
//!
//! ```text
//! SelectService -> SelectBarber -> SelectDateTime -> CustomerDetails -> Confirmation
//! ```
//!
//! When the booking link fixes the barber, `SelectBarber` is removed from the
//! sequence in both directions. The legal sequence is a pure function of
//! [`WizardConfig`], so numbering and navigation never disagree.
//!
//! Slot availability is computed by the backend. The wizard only hands out a
//! [`SlotRequest`] when a date is picked and accepts the answer if it still
//! matches the current selection.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    context::{GENERIC_ERROR_KEY, Translator},
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, AvailabilityQuery, CreateAppointmentRequest},
        service::Service,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    SelectService,
    SelectBarber,
    SelectDateTime,
    CustomerDetails,
    Confirmation,
}

impl WizardStep {
    pub fn label_key(self) -> &'static str {
        match self {
            WizardStep::SelectService => "wizard.step.service",
            WizardStep::SelectBarber => "wizard.step.barber",
            WizardStep::SelectDateTime => "wizard.step.datetime",
            WizardStep::CustomerDetails => "wizard.step.details",
            WizardStep::Confirmation => "wizard.step.confirmation",
        }
    }
}

const FULL_SEQUENCE: [WizardStep; 4] = [
    WizardStep::SelectService,
    WizardStep::SelectBarber,
    WizardStep::SelectDateTime,
    WizardStep::CustomerDetails,
];

const BARBER_FIXED_SEQUENCE: [WizardStep; 3] = [
    WizardStep::SelectService,
    WizardStep::SelectDateTime,
    WizardStep::CustomerDetails,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardConfig {
    /// Barber fixed by the booking link, if any.
    pub preselected_barber_id: Option<String>,
}

impl WizardConfig {
    pub fn for_barber(barber_id: impl Into<String>) -> Self {
        Self {
            preselected_barber_id: Some(barber_id.into()),
        }
    }

    pub fn has_preselected_barber(&self) -> bool {
        self.preselected_barber_id.is_some()
    }

    /// Data-entry steps in order. `Confirmation` is reached only by submitting.
    pub fn steps(&self) -> &'static [WizardStep] {
        if self.has_preselected_barber() {
            &BARBER_FIXED_SEQUENCE
        } else {
            &FULL_SEQUENCE
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    /// 1-based position shown to the user; `None` for steps outside the sequence.
    pub fn step_number(&self, step: WizardStep) -> Option<usize> {
        self.steps()
            .iter()
            .position(|candidate| *candidate == step)
            .map(|index| index + 1)
    }

    pub fn next_step(&self, from: WizardStep) -> Option<WizardStep> {
        if from == WizardStep::CustomerDetails {
            return Some(WizardStep::Confirmation);
        }
        let index = self.steps().iter().position(|s| *s == from)?;
        self.steps().get(index + 1).copied()
    }

    pub fn previous_step(&self, from: WizardStep) -> Option<WizardStep> {
        let index = self.steps().iter().position(|s| *s == from)?;
        index.checked_sub(1).map(|prev| self.steps()[prev])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerDetails {
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Everything chosen so far in a booking session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingSelection {
    pub service: Option<Service>,
    pub barber_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub customer: CustomerDetails,
    pub notes: String,
}

/// A backend availability lookup issued by the wizard.
///
/// `token` identifies the date selection it was issued for; answers carrying an
/// older token are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub token: u64,
    pub query: AvailabilityQuery,
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    config: WizardConfig,
    step: WizardStep,
    selection: BookingSelection,
    slots: Vec<NaiveTime>,
    slot_token: u64,
    error: Option<String>,
    confirmed: Option<Appointment>,
}

impl BookingWizard {
    pub fn new(config: WizardConfig) -> Self {
        let selection = BookingSelection {
            barber_id: config.preselected_barber_id.clone(),
            ..BookingSelection::default()
        };

        Self {
            config,
            step: WizardStep::SelectService,
            selection,
            slots: Vec::new(),
            slot_token: 0,
            error: None,
            confirmed: None,
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn step_number(&self) -> Option<usize> {
        self.config.step_number(self.step)
    }

    pub fn step_count(&self) -> usize {
        self.config.step_count()
    }

    /// Numbered, translated labels for the progress indicator.
    pub fn step_labels(&self, translator: &dyn Translator) -> Vec<(usize, String)> {
        self.config
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| (index + 1, translator.translate(step.label_key())))
            .collect()
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    /// Bookable start times for the selected date, in backend order.
    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    /// Message from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confirmed(&self) -> Option<&Appointment> {
        self.confirmed.as_ref()
    }

    fn ensure_step(&self, expected: WizardStep) -> BookingResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(BookingError::Validation(format!(
                "Expected step {:?}, wizard is at {:?}",
                expected, self.step
            )))
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.config.next_step(self.step) {
            self.step = next;
        }
    }

    fn clear_time(&mut self) {
        self.selection.time = None;
        self.slots.clear();
        self.slot_token += 1;
    }

    pub fn select_service(&mut self, service: Service) -> BookingResult<()> {
        self.ensure_step(WizardStep::SelectService)?;
        // A different duration invalidates any slots already fetched.
        if self.selection.service.as_ref() != Some(&service) {
            self.clear_time();
        }
        self.selection.service = Some(service);
        self.advance();
        Ok(())
    }

    pub fn select_barber(&mut self, barber_id: impl Into<String>) -> BookingResult<()> {
        self.ensure_step(WizardStep::SelectBarber)?;
        let barber_id = barber_id.into();
        if self.selection.barber_id.as_deref() != Some(barber_id.as_str()) {
            self.clear_time();
        }
        self.selection.barber_id = Some(barber_id);
        self.advance();
        Ok(())
    }

    /// Picks a date and clears the time, even when the date is unchanged.
    ///
    /// Returns the availability lookup to run once barber and service are known.
    pub fn select_date(&mut self, date: NaiveDate) -> BookingResult<Option<SlotRequest>> {
        self.ensure_step(WizardStep::SelectDateTime)?;
        self.selection.date = Some(date);
        self.clear_time();
        Ok(self.slot_request())
    }

    /// The lookup for the current barber, date and service, if all are chosen.
    pub fn slot_request(&self) -> Option<SlotRequest> {
        let barber_id = self.selection.barber_id.clone()?;
        let date = self.selection.date?;
        let service = self.selection.service.as_ref()?;

        Some(SlotRequest {
            token: self.slot_token,
            query: AvailabilityQuery {
                barber_id,
                date,
                service_duration: service.duration_minutes,
            },
        })
    }

    /// Stores the backend's bookable instants, keeping only their time of day.
    ///
    /// Returns false when the answer is for a superseded request.
    pub fn receive_slots(&mut self, token: u64, instants: &[NaiveDateTime]) -> bool {
        if token != self.slot_token {
            return false;
        }
        self.slots = instants.iter().map(NaiveDateTime::time).collect();
        self.slots.dedup();
        true
    }

    /// A failed lookup leaves the slot list empty; the date stays selected.
    pub fn slots_failed(&mut self, token: u64) -> bool {
        if token != self.slot_token {
            return false;
        }
        self.slots.clear();
        true
    }

    pub fn select_time(&mut self, time: NaiveTime) -> BookingResult<()> {
        self.ensure_step(WizardStep::SelectDateTime)?;
        if self.selection.date.is_none() {
            return Err(BookingError::Validation(
                "Select a date before choosing a time".to_string(),
            ));
        }
        if !self.slots.contains(&time) {
            return Err(BookingError::Validation(format!(
                "{} is not an available slot",
                time.format("%H:%M")
            )));
        }
        self.selection.time = Some(time);
        self.advance();
        Ok(())
    }

    /// Steps back one applicable step. Nothing is cleared.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.config.previous_step(self.step) {
            self.step = previous;
        }
        self.step
    }

    pub fn set_customer(&mut self, customer: CustomerDetails) {
        self.selection.customer = customer;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.selection.notes = notes.into();
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::CustomerDetails
            && self.selection.service.is_some()
            && self.selection.barber_id.is_some()
            && self.selection.date.is_some()
            && self.selection.time.is_some()
            && self.selection.customer.is_complete()
    }

    /// Combines the selection into a create request.
    pub fn build_request(&self) -> BookingResult<CreateAppointmentRequest> {
        if !self.can_submit() {
            return Err(BookingError::Validation(
                "Booking is incomplete".to_string(),
            ));
        }

        let missing = || BookingError::Validation("Booking is incomplete".to_string());
        let service = self.selection.service.as_ref().ok_or_else(missing)?;
        let barber_id = self.selection.barber_id.clone().ok_or_else(missing)?;
        let date = self.selection.date.ok_or_else(missing)?;
        let time = self.selection.time.ok_or_else(missing)?;
        let customer = &self.selection.customer;
        let notes = self.selection.notes.trim();

        Ok(CreateAppointmentRequest {
            barber_id,
            service_id: service.id.clone(),
            appointment_date_time: date.and_time(time),
            customer_name: customer.name.trim().to_string(),
            customer_email: customer.email.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }

    pub fn submission_succeeded(&mut self, appointment: Appointment) {
        self.error = None;
        self.confirmed = Some(appointment);
        self.step = WizardStep::Confirmation;
    }

    /// Records the failure message; the wizard stays on the details step.
    pub fn submission_failed(&mut self, error: &BookingError, translator: &dyn Translator) {
        let fallback = translator.translate(GENERIC_ERROR_KEY);
        self.error = Some(error.user_message(&fallback));
    }
}
