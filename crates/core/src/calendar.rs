//! # Calendar
//!
//! Builds the render model for the dashboard calendar: a month grid padded to
//! whole Monday-to-Sunday weeks, with each day's appointments bucketed and
//! ordered by start time, plus the business-hours lookup for a single day.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};
use std::collections::BTreeMap;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, AppointmentStatus},
        business_hours::{BusinessHours, Weekday},
    },
};

/// A calendar month, identified by year and month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    first: NaiveDate,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> BookingResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or_else(|| BookingError::Validation(format!("Invalid month: {}-{}", year, month)))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the padding days borrowed from the neighbouring months.
    pub in_current_month: bool,
    pub is_today: bool,
    /// Appointments starting on `date`, earliest first.
    pub appointments: Vec<Appointment>,
}

/// First and last date shown in the grid for `month`.
///
/// The grid starts on the Monday on or before the 1st and ends on the Sunday
/// on or after the last day, so this is also the range to load appointments for.
pub fn visible_range(month: MonthRef) -> (NaiveDate, NaiveDate) {
    let first = month.first_day();
    let last = month.last_day();

    let lead = i64::from(first.weekday().num_days_from_monday());
    let trail = 6 - i64::from(last.weekday().num_days_from_monday());

    (first - Duration::days(lead), last + Duration::days(trail))
}

pub fn build_month_grid(
    month: MonthRef,
    appointments: &[Appointment],
    today: NaiveDate,
) -> Vec<DayCell> {
    let (start, end) = visible_range(month);

    let mut by_day: BTreeMap<NaiveDate, Vec<Appointment>> = BTreeMap::new();
    for appointment in appointments {
        let date = appointment.date();
        if date >= start && date <= end {
            by_day.entry(date).or_default().push(appointment.clone());
        }
    }

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let mut day_appointments = by_day.remove(&date).unwrap_or_default();
            day_appointments.sort_by_key(|a| a.appointment_date_time);
            DayCell {
                date,
                in_current_month: month.contains(date),
                is_today: date == today,
                appointments: day_appointments,
            }
        })
        .collect()
}

/// Splits a grid into rows of seven days.
pub fn grid_weeks(cells: &[DayCell]) -> Vec<&[DayCell]> {
    cells.chunks(7).collect()
}

/// Appointments starting on `date`, earliest first.
pub fn appointments_on(date: NaiveDate, appointments: &[Appointment]) -> Vec<Appointment> {
    let mut day: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.date() == date)
        .cloned()
        .collect();
    day.sort_by_key(|a| a.appointment_date_time);
    day
}

/// Opening hours for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySchedule {
    Closed,
    Open { open: NaiveTime, close: NaiveTime },
}

impl DaySchedule {
    pub fn is_open(&self) -> bool {
        matches!(self, DaySchedule::Open { .. })
    }
}

/// Looks up the configured hours for the weekday of `date`.
///
/// A weekday with no entry, an entry marked closed, or an open entry missing
/// either time is closed. There is no fallback to default hours.
pub fn daily_schedule(date: NaiveDate, hours: &[BusinessHours]) -> DaySchedule {
    let weekday = Weekday::of(date);

    match hours.iter().find(|entry| entry.day_of_week == weekday) {
        Some(BusinessHours {
            is_open: true,
            open_time: Some(open),
            close_time: Some(close),
            ..
        }) => DaySchedule::Open {
            open: *open,
            close: *close,
        },
        _ => DaySchedule::Closed,
    }
}

/// Row start times for the day view of an open day.
pub fn day_rows(schedule: DaySchedule, step: Duration) -> Vec<NaiveTime> {
    let DaySchedule::Open { open, close } = schedule else {
        return Vec::new();
    };
    if step <= Duration::zero() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut current = open;
    while current < close {
        rows.push(current);
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    rows
}

/// Client-side narrowing of an already loaded appointment list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub barber_id: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        let barber_ok = self
            .barber_id
            .as_ref()
            .is_none_or(|id| *id == appointment.barber_id);
        let status_ok = self.status.is_none_or(|status| status == appointment.status);
        barber_ok && status_ok
    }

    pub fn apply(&self, appointments: &[Appointment]) -> Vec<Appointment> {
        appointments
            .iter()
            .filter(|a| self.matches(a))
            .cloned()
            .collect()
    }
}
