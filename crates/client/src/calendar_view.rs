//! # Dashboard Calendar
//!
//! Couples the month grid and the appointment reconciler to the backend.
//!
//! Reads (reference data, appointment listings) never fail outward: errors are
//! logged and the affected list is left empty. The listing is fetched page by
//! page until the backend reports the last one.
//!
//! The filter is sent with the listing query and applied again to what is
//! shown, since live updates arrive unfiltered. Writes return their error once
//! to the caller and, on success, trigger a full reload of the visible range.

use barbershop_core::{
    calendar::{
        AppointmentFilter, DayCell, DaySchedule, MonthRef, build_month_grid, daily_schedule,
        day_rows, visible_range,
    },
    context::{GENERIC_ERROR_KEY, Translator},
    errors::{BookingError, BookingResult},
    models::{
        appointment::{
            Appointment, AppointmentQuery, AppointmentStatus, CreateAppointmentRequest,
            UpdateAppointmentRequest,
        },
        barber::Barber,
        business_hours::BusinessHours,
        service::Service,
    },
    reconciler::AppointmentBook,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    api::BookingApi,
    live::{LiveSubscription, LiveUpdateSource, SharedBook},
};

/// Page size requested for the visible range.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Upper bound on pages fetched for one range.
pub const MAX_PAGES: u32 = 20;

pub struct CalendarController<A: BookingApi> {
    api: Arc<A>,
    translator: Arc<dyn Translator>,
    book: SharedBook,
    month: MonthRef,
    filter: AppointmentFilter,
    barbers: Vec<Barber>,
    services: Vec<Service>,
    hours: Vec<BusinessHours>,
}

impl<A: BookingApi + 'static> CalendarController<A> {
    pub fn new(api: Arc<A>, translator: Arc<dyn Translator>, month: MonthRef) -> Self {
        Self {
            api,
            translator,
            book: Arc::new(RwLock::new(AppointmentBook::new())),
            month,
            filter: AppointmentFilter::default(),
            barbers: Vec::new(),
            services: Vec::new(),
            hours: Vec::new(),
        }
    }

    pub fn month(&self) -> MonthRef {
        self.month
    }

    pub fn filter(&self) -> &AppointmentFilter {
        &self.filter
    }

    pub fn barbers(&self) -> &[Barber] {
        &self.barbers
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn business_hours(&self) -> &[BusinessHours] {
        &self.hours
    }

    pub fn book(&self) -> SharedBook {
        self.book.clone()
    }

    /// Loads barbers, services and business hours, then the visible appointments.
    pub async fn load(&mut self) {
        self.barbers = self.api.barbers().await.unwrap_or_else(|e| {
            warn!("Failed to load barbers: {}", e);
            Vec::new()
        });
        self.services = self.api.services().await.unwrap_or_else(|e| {
            warn!("Failed to load services: {}", e);
            Vec::new()
        });
        self.hours = self.api.business_hours().await.unwrap_or_else(|e| {
            warn!("Failed to load business hours: {}", e);
            Vec::new()
        });

        self.reload().await;
    }

    /// The listing query for the visible grid range and current filter.
    pub fn query(&self) -> AppointmentQuery {
        let (start_date, end_date) = visible_range(self.month);
        AppointmentQuery {
            start_date,
            end_date,
            barber_id: self.filter.barber_id.clone(),
            status: self.filter.status,
            page: Some(0),
            size: Some(DEFAULT_PAGE_SIZE),
        }
    }

    /// Re-fetches the visible range and replaces the held appointments.
    pub async fn reload(&self) {
        let appointments = match self.fetch_range().await {
            Ok(appointments) => appointments,
            Err(e) => {
                warn!("Failed to load appointments: {}", e);
                Vec::new()
            }
        };

        self.book.write().await.apply_server_snapshot(appointments);
    }

    async fn fetch_range(&self) -> BookingResult<Vec<Appointment>> {
        let mut query = self.query();
        let mut appointments = Vec::new();

        for number in 0..MAX_PAGES {
            query.page = Some(number);
            let page = self.api.list_appointments(&query).await?;
            let last = page.is_last() || page.content.is_empty();
            appointments.extend(page.content);

            if last {
                info!(
                    "Loaded {} appointments for {} to {}",
                    appointments.len(),
                    query.start_date,
                    query.end_date
                );
                return Ok(appointments);
            }
        }

        warn!(
            "Stopped after {} pages for {} to {}; showing {} appointments",
            MAX_PAGES,
            query.start_date,
            query.end_date,
            appointments.len()
        );
        Ok(appointments)
    }

    pub async fn set_month(&mut self, month: MonthRef) {
        self.month = month;
        self.reload().await;
    }

    pub async fn set_filter(&mut self, filter: AppointmentFilter) {
        self.filter = filter;
        self.reload().await;
    }

    /// Held appointments that pass the current filter.
    pub async fn appointments(&self) -> Vec<Appointment> {
        self.filter.apply(self.book.read().await.appointments())
    }

    pub async fn grid(&self, today: NaiveDate) -> Vec<DayCell> {
        build_month_grid(self.month, &self.appointments().await, today)
    }

    pub fn day_schedule(&self, date: NaiveDate) -> DaySchedule {
        daily_schedule(date, &self.hours)
    }

    /// Time rows of the day view for `date`; empty when the shop is closed.
    pub fn day_rows(&self, date: NaiveDate, step: Duration) -> Vec<NaiveTime> {
        day_rows(self.day_schedule(date), step)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn barber(&self, id: &str) -> Option<&Barber> {
        self.barbers.iter().find(|b| b.id == id)
    }

    /// Opens an appointment in the detail panel.
    pub async fn select(&self, id: &str) -> bool {
        self.book.write().await.select_by_id(id)
    }

    pub async fn selected(&self) -> Option<Appointment> {
        self.book.read().await.selected().cloned()
    }

    pub async fn close_details(&self) {
        self.book.write().await.clear_selection();
    }

    /// Starts feeding pushed updates into this calendar's appointments.
    pub fn subscribe<S>(&self, source: S) -> LiveSubscription
    where
        S: LiveUpdateSource + 'static,
    {
        LiveSubscription::spawn(source, self.book.clone())
    }

    /// Moves an appointment to `status`, then reloads.
    ///
    /// Transitions the dashboard does not offer are refused without a request.
    pub async fn change_status(&self, id: &str, status: AppointmentStatus) -> BookingResult<()> {
        let current = self.book.read().await.get(id).map(|a| a.status);
        if let Some(current) = current {
            if !current.can_transition_to(status) {
                return Err(BookingError::Validation(format!(
                    "Cannot move appointment from {} to {}",
                    current, status
                )));
            }
        }

        self.api
            .update_appointment(id, &UpdateAppointmentRequest::status(status))
            .await
            .inspect_err(|e| warn!("Failed to update status of {}: {}", id, e))?;

        info!("Appointment {} moved to {}", id, status);
        self.reload().await;
        Ok(())
    }

    pub async fn reschedule(&self, id: &str, at: NaiveDateTime) -> BookingResult<()> {
        self.api
            .update_appointment(id, &UpdateAppointmentRequest::reschedule(at))
            .await
            .inspect_err(|e| warn!("Failed to reschedule {}: {}", id, e))?;

        info!("Appointment {} rescheduled to {}", id, at);
        self.reload().await;
        Ok(())
    }

    /// Cancels an appointment and closes the detail panel.
    pub async fn cancel(&self, id: &str) -> BookingResult<()> {
        self.api
            .cancel_appointment(id)
            .await
            .inspect_err(|e| warn!("Failed to cancel {}: {}", id, e))?;

        info!("Appointment {} cancelled", id);
        self.book.write().await.clear_selection();
        self.reload().await;
        Ok(())
    }

    pub async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> BookingResult<Appointment> {
        let created = self
            .api
            .create_appointment(request)
            .await
            .inspect_err(|e| warn!("Failed to create appointment: {}", e))?;

        info!("Appointment {} created", created.id);
        self.reload().await;
        Ok(created)
    }

    /// Inline message for a failed owner action.
    pub fn error_message(&self, error: &BookingError) -> String {
        error.user_message(&self.translator.translate(GENERIC_ERROR_KEY))
    }
}
