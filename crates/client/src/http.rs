//! # HTTP Backend Client
//!
//! [`BookingApi`] over the backend's REST endpoints using reqwest. Every request
//! carries the shop header and, when the session has one, a bearer token.
//! Non-success responses become [`BookingError::Api`] with the backend's
//! `message` (or `error`) field when the body has one.

use async_trait::async_trait;
use barbershop_core::{
    context::SessionContext,
    errors::{BookingError, BookingResult},
    models::{
        appointment::{
            Appointment, AppointmentQuery, AvailabilityQuery, CreateAppointmentRequest, Slot,
            UpdateAppointmentRequest,
        },
        barber::Barber,
        business_hours::BusinessHours,
        page::Page,
        service::Service,
    },
};
use chrono::NaiveDateTime;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::api::BookingApi;

/// Header naming the shop a request is scoped to.
pub const SHOP_HEADER: &str = "X-Barbershop-Id";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    client: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl HttpBookingApi {
    pub fn new(base_url: &str, session: SessionContext, timeout: Duration) -> BookingResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BookingError::Validation(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BookingError::Validation(format!(
                "API base URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BookingError::Transport(eyre::Report::new(e)))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!("{} {}", method, url);

        let builder = self
            .client
            .request(method, url)
            .header(SHOP_HEADER, self.session.shop_id.as_str());

        match &self.session.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(builder: RequestBuilder) -> BookingResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| BookingError::Transport(eyre::Report::new(e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error))
            .filter(|text| !text.trim().is_empty());

        if status == StatusCode::NOT_FOUND {
            return Err(BookingError::NotFound(
                message.unwrap_or_else(|| "Requested resource does not exist".to_string()),
            ));
        }

        Err(BookingError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> BookingResult<T> {
        let response = Self::execute(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BookingError::Transport(eyre::Report::new(e)))
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_appointments(&self, query: &AppointmentQuery) -> BookingResult<Page<Appointment>> {
        Self::fetch(self.request(Method::GET, &["appointments"]).query(query)).await
    }

    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> BookingResult<Appointment> {
        Self::fetch(self.request(Method::POST, &["appointments"]).json(request)).await
    }

    async fn update_appointment(
        &self,
        id: &str,
        request: &UpdateAppointmentRequest,
    ) -> BookingResult<Appointment> {
        Self::fetch(self.request(Method::PUT, &["appointments", id]).json(request)).await
    }

    async fn cancel_appointment(&self, id: &str) -> BookingResult<()> {
        Self::execute(self.request(Method::DELETE, &["appointments", id])).await?;
        Ok(())
    }

    async fn availability(&self, query: &AvailabilityQuery) -> BookingResult<Vec<NaiveDateTime>> {
        let slots: Vec<Slot> = Self::fetch(
            self.request(Method::GET, &["appointments", "availability"])
                .query(query),
        )
        .await?;
        Ok(slots.into_iter().map(|Slot(at)| at).collect())
    }

    async fn barbers(&self) -> BookingResult<Vec<Barber>> {
        Self::fetch(self.request(Method::GET, &["barbers"])).await
    }

    async fn services(&self) -> BookingResult<Vec<Service>> {
        Self::fetch(self.request(Method::GET, &["services"])).await
    }

    async fn business_hours(&self) -> BookingResult<Vec<BusinessHours>> {
        Self::fetch(self.request(Method::GET, &["business-hours"])).await
    }
}
