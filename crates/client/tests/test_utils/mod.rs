#![allow(dead_code)]

use barbershop_core::models::{
    appointment::{Appointment, AppointmentStatus},
    barber::Barber,
    business_hours::{BusinessHours, Weekday},
    page::Page,
    service::Service,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_time(hm(h, min))
}

pub fn appointment(id: &str, barber_id: &str, start: NaiveDateTime) -> Appointment {
    Appointment {
        id: id.to_string(),
        barber_id: barber_id.to_string(),
        service_id: "svc-1".to_string(),
        appointment_date_time: start,
        status: AppointmentStatus::Pending,
        customer_name: format!("Customer {}", id),
        customer_email: format!("{}@example.com", id),
        customer_phone: "000".to_string(),
        notes: None,
        updated_at: None,
    }
}

pub fn with_status(mut appointment: Appointment, status: AppointmentStatus) -> Appointment {
    appointment.status = status;
    appointment
}

pub fn page(content: Vec<Appointment>) -> Page<Appointment> {
    let total = content.len() as u64;
    Page {
        content,
        number: 0,
        size: 500,
        total_elements: total,
        total_pages: 1,
    }
}

pub fn service(id: &str, minutes: u32) -> Service {
    Service {
        id: id.to_string(),
        name: format!("Service {}", id),
        description: None,
        price: 20.0,
        duration_minutes: minutes,
        active: true,
    }
}

pub fn barber(id: &str, active: bool) -> Barber {
    Barber {
        id: id.to_string(),
        first_name: "Barber".to_string(),
        last_name: id.to_string(),
        email: None,
        phone: None,
        bio: None,
        profile_image_url: None,
        active,
    }
}

pub fn week_hours() -> Vec<BusinessHours> {
    vec![
        BusinessHours::open(Weekday::Monday, hm(9, 0), hm(18, 0)),
        BusinessHours::closed(Weekday::Sunday),
    ]
}
