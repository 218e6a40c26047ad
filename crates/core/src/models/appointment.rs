use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::service::Service;

/// Lifecycle status of an appointment as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    /// Statuses the dashboard offers as a next step from this one.
    ///
    /// The backend remains the authority on legality; this is only the set of
    /// action buttons shown for an appointment.
    pub fn allowed_transitions(self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Pending => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Confirmed => &[
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow => &[],
        }
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Whether the detail panel shows action buttons for this status.
    pub fn is_actionable(self) -> bool {
        !self.is_terminal()
    }

    /// Wire name, also used as the translation key suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub barber_id: String,
    pub service_id: String,
    /// Start of the appointment in shop-local time.
    #[serde(with = "local_date_time")]
    pub appointment_date_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Last modification time, when the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn date(&self) -> NaiveDate {
        self.appointment_date_time.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.appointment_date_time.time()
    }

    /// End time derived from the booked service's duration.
    pub fn end_time(&self, service: &Service) -> NaiveDateTime {
        self.appointment_date_time + Duration::minutes(i64::from(service.duration_minutes))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub barber_id: String,
    pub service_id: String,
    pub appointment_date_time: NaiveDateTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update: a status change, a reschedule, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date_time: Option<NaiveDateTime>,
}

impl UpdateAppointmentRequest {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            appointment_date_time: None,
        }
    }

    pub fn reschedule(at: NaiveDateTime) -> Self {
        Self {
            status: None,
            appointment_date_time: Some(at),
        }
    }
}

/// Filters for the appointment listing. Filtering happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl AppointmentQuery {
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            barber_id: None,
            status: None,
            page: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub barber_id: String,
    pub date: NaiveDate,
    pub service_duration: u32,
}

/// Shop-local date-times on the wire.
///
/// Accepts plain ISO date-times as well as RFC 3339 instants carrying `Z` or an
/// offset; for the latter the wall-clock time at that offset is kept. Writes the
/// plain form.
pub mod local_date_time {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    pub fn parse(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        text.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_local()))
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date-time: {}", raw)))
    }
}

/// A bookable start instant from the availability endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(#[serde(with = "local_date_time")] pub NaiveDateTime);
