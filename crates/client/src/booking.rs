//! # Public Booking
//!
//! Runs a [`BookingWizard`] against the backend: loads the shop's services and
//! barbers, fetches slot availability when a date is picked, and submits the
//! finished booking.

use barbershop_core::{
    context::Translator,
    errors::{BookingError, BookingResult},
    models::{appointment::Appointment, barber::Barber, service::Service},
    wizard::{BookingWizard, CustomerDetails, SlotRequest, WizardConfig, WizardStep},
};
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::BookingApi;

pub struct BookingSession<A: BookingApi> {
    api: Arc<A>,
    translator: Arc<dyn Translator>,
    wizard: BookingWizard,
    services: Vec<Service>,
    barbers: Vec<Barber>,
}

impl<A: BookingApi> BookingSession<A> {
    pub fn new(api: Arc<A>, translator: Arc<dyn Translator>, config: WizardConfig) -> Self {
        Self {
            api,
            translator,
            wizard: BookingWizard::new(config),
            services: Vec::new(),
            barbers: Vec::new(),
        }
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    /// Bookable services; inactive ones are hidden.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Bookable barbers; inactive ones are hidden.
    pub fn barbers(&self) -> &[Barber] {
        &self.barbers
    }

    /// Loads the shop's catalogue. Failures leave the affected list empty.
    pub async fn load(&mut self) {
        self.services = match self.api.services().await {
            Ok(services) => services.into_iter().filter(|s| s.active).collect(),
            Err(e) => {
                warn!("Failed to load services: {}", e);
                Vec::new()
            }
        };

        // The barber list is not shown when the link fixes the barber.
        if self.wizard.config().has_preselected_barber() {
            return;
        }

        self.barbers = match self.api.barbers().await {
            Ok(barbers) => barbers.into_iter().filter(|b| b.active).collect(),
            Err(e) => {
                warn!("Failed to load barbers: {}", e);
                Vec::new()
            }
        };
    }

    /// Picks a service. If a date was already chosen, its slots are re-fetched
    /// for the new duration.
    pub async fn select_service(&mut self, service_id: &str) -> BookingResult<()> {
        let service = self
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("Service {} not found", service_id)))?;
        self.wizard.select_service(service)?;
        self.refresh_slots().await;
        Ok(())
    }

    /// Picks a barber. If a date was already chosen, its slots are re-fetched.
    pub async fn select_barber(&mut self, barber_id: &str) -> BookingResult<()> {
        if !self.barbers.iter().any(|b| b.id == barber_id) {
            return Err(BookingError::NotFound(format!(
                "Barber {} not found",
                barber_id
            )));
        }
        self.wizard.select_barber(barber_id)?;
        self.refresh_slots().await;
        Ok(())
    }

    /// Reloads slots when landing on the date step with a date still selected
    /// and nothing fetched for the current selection.
    async fn refresh_slots(&mut self) {
        if self.wizard.step() != WizardStep::SelectDateTime || !self.wizard.slots().is_empty() {
            return;
        }
        if let Some(request) = self.wizard.slot_request() {
            self.fetch_slots(request).await;
        }
    }

    /// Picks a date and loads its slots.
    pub async fn select_date(&mut self, date: NaiveDate) -> BookingResult<()> {
        if let Some(request) = self.wizard.select_date(date)? {
            self.fetch_slots(request).await;
        }
        Ok(())
    }

    /// Asks the backend for bookable slots. A failure leaves the list empty.
    pub async fn fetch_slots(&mut self, request: SlotRequest) {
        match self.api.availability(&request.query).await {
            Ok(instants) => {
                if !self.wizard.receive_slots(request.token, &instants) {
                    info!("Discarding slots for superseded date {}", request.query.date);
                }
            }
            Err(e) => {
                warn!(
                    "Failed to load availability for barber {} on {}: {}",
                    request.query.barber_id, request.query.date, e
                );
                self.wizard.slots_failed(request.token);
            }
        }
    }

    pub fn select_time(&mut self, time: NaiveTime) -> BookingResult<()> {
        self.wizard.select_time(time)
    }

    pub fn back(&mut self) -> WizardStep {
        self.wizard.back()
    }

    pub fn set_customer(&mut self, customer: CustomerDetails) {
        self.wizard.set_customer(customer);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.wizard.set_notes(notes);
    }

    /// Creates the appointment.
    ///
    /// Nothing is sent while the booking is incomplete. On failure the message
    /// is kept on the wizard and the entered data stays in place.
    pub async fn submit(&mut self) -> BookingResult<Appointment> {
        let request = self.wizard.build_request()?;

        match self.api.create_appointment(&request).await {
            Ok(appointment) => {
                info!("Booked appointment {}", appointment.id);
                self.wizard.submission_succeeded(appointment.clone());
                Ok(appointment)
            }
            Err(e) => {
                warn!("Booking submission failed: {}", e);
                self.wizard.submission_failed(&e, self.translator.as_ref());
                Err(e)
            }
        }
    }
}
