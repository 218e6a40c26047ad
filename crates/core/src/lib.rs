//! # Barbershop Core
//!
//! Domain types and the pure scheduling logic behind the shop dashboard and the
//! public booking flow. Nothing in this crate performs I/O; the client crate
//! feeds it backend data and live updates.
//!
//! - **calendar**: month grids and per-day business-hours lookup
//! - **wizard**: the booking wizard step machine
//! - **reconciler**: the in-memory appointment collection kept in sync with the backend

pub mod calendar;
pub mod context;
pub mod errors;
pub mod models;
pub mod reconciler;
pub mod wizard;
