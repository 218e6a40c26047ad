//! # Backend API
//!
//! The operations the dashboard and booking flow need from the backend. All of
//! them are scoped to the session's shop.

use async_trait::async_trait;
use barbershop_core::{
    errors::BookingResult,
    models::{
        appointment::{
            Appointment, AppointmentQuery, AvailabilityQuery, CreateAppointmentRequest,
            UpdateAppointmentRequest,
        },
        barber::Barber,
        business_hours::BusinessHours,
        page::Page,
        service::Service,
    },
};
use chrono::NaiveDateTime;
use mockall::automock;

#[automock]
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET appointments` filtered by date range, barber and status.
    async fn list_appointments(&self, query: &AppointmentQuery) -> BookingResult<Page<Appointment>>;

    /// `POST appointments`
    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> BookingResult<Appointment>;

    /// `PUT appointments/{id}` with a status change or a new start time.
    async fn update_appointment(
        &self,
        id: &str,
        request: &UpdateAppointmentRequest,
    ) -> BookingResult<Appointment>;

    /// `DELETE appointments/{id}`; the backend marks it cancelled.
    async fn cancel_appointment(&self, id: &str) -> BookingResult<()>;

    /// Bookable start instants for a barber, date and service duration.
    async fn availability(&self, query: &AvailabilityQuery) -> BookingResult<Vec<NaiveDateTime>>;

    async fn barbers(&self) -> BookingResult<Vec<Barber>>;

    async fn services(&self) -> BookingResult<Vec<Service>>;

    async fn business_hours(&self) -> BookingResult<Vec<BusinessHours>>;
}
