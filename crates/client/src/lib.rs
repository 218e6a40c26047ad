//! # Barbershop Client
//!
//! Connects the scheduling core to the booking backend.
//!
//! ## Architecture
//!
//! - **api**: the backend operations as an async trait, mockable in tests
//! - **http**: the reqwest implementation of that trait
//! - **live**: push-channel adapter feeding the appointment reconciler
//! - **calendar_view**: the owner's dashboard calendar
//! - **booking**: the public booking wizard session
//! - **config**: environment configuration

/// Backend operations
pub mod api;
/// Public booking wizard session
pub mod booking;
/// Dashboard calendar controller
pub mod calendar_view;
/// Configuration from environment variables
pub mod config;
/// REST implementation of the backend operations
pub mod http;
/// Live appointment updates
pub mod live;

pub use api::BookingApi;
pub use http::HttpBookingApi;
