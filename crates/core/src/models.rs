pub mod appointment;
pub mod barber;
pub mod business_hours;
pub mod page;
pub mod service;
