use std::error::Error;
use barbershop_core::errors::{BookingError, BookingResult};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Appointment not found".to_string());
    let validation = BookingError::Validation("Invalid input".to_string());
    let api = BookingError::Api {
        status: 409,
        message: Some("Slot already taken".to_string()),
    };
    let api_without_message = BookingError::Api {
        status: 500,
        message: None,
    };
    let transport = BookingError::Transport(eyre::eyre!("Connection refused"));
    let internal = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Appointment not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        api.to_string(),
        "Backend rejected request (409): Slot already taken"
    );
    assert_eq!(
        api_without_message.to_string(),
        "Backend rejected request (500): no message"
    );
    assert!(transport.to_string().contains("Transport error:"));
    assert!(internal.to_string().contains("Internal error:"));
}

#[test]
fn test_user_message_prefers_backend_text() {
    let error = BookingError::Api {
        status: 409,
        message: Some("Slot already taken".to_string()),
    };
    assert_eq!(error.user_message("Try again"), "Slot already taken");
}

#[test]
fn test_user_message_falls_back() {
    let blank = BookingError::Api {
        status: 400,
        message: Some("   ".to_string()),
    };
    let missing = BookingError::Api {
        status: 500,
        message: None,
    };
    let transport = BookingError::Transport(eyre::eyre!("timeout"));

    assert_eq!(blank.user_message("Try again"), "Try again");
    assert_eq!(missing.user_message("Try again"), "Try again");
    assert_eq!(transport.user_message("Try again"), "Try again");
}

#[test]
fn test_user_message_shows_validation_text() {
    let error = BookingError::Validation("Phone is required".to_string());
    assert_eq!(error.user_message("Try again"), "Phone is required");
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let booking_error = BookingError::Internal(Box::new(io_error));

    assert!(booking_error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("socket closed");
    let booking_error: BookingError = report.into();

    assert!(matches!(booking_error, BookingError::Transport(_)));
    assert!(booking_error.to_string().contains("socket closed"));
}
