//! Shared response checks for entity collaborators

use pihole_core::traits::HttpResponse;
use pihole_core::{Error, Result};
use serde::Deserialize;

/// Fail with [`Error::UnexpectedStatus`] unless the response has `expected` status
pub(crate) fn expect_status(response: &HttpResponse, expected: u16, operation: &str) -> Result<()> {
    if response.status() == expected {
        Ok(())
    } else {
        Err(Error::unexpected_status(
            operation,
            response.status(),
            response.text(),
        ))
    }
}

/// Fail with [`Error::UnexpectedStatus`] unless the response is 2xx
pub(crate) fn expect_success(response: &HttpResponse, operation: &str) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(Error::unexpected_status(
            operation,
            response.status(),
            response.text(),
        ))
    }
}

/// Legacy mutation acknowledgement
#[derive(Debug, Deserialize)]
struct Ack {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Check a legacy `{"success": bool, "message": string}` acknowledgement
pub(crate) fn expect_ack(response: &HttpResponse, operation: &str) -> Result<()> {
    expect_success(response, operation)?;
    let ack: Ack = response.json(operation)?;
    if ack.success {
        Ok(())
    } else {
        Err(Error::rejected(operation, ack.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_status() {
        assert!(expect_status(&HttpResponse::new(201, ""), 201, "create").is_ok());
        let err = expect_status(&HttpResponse::new(400, "duplicate"), 201, "create").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedStatus { status: 400, ref body, .. } if body == "duplicate"
        ));
    }

    #[test]
    fn test_ack_rejection_carries_message() {
        let response = HttpResponse::new(200, r#"{"success":false,"message":"already exists"}"#);
        let err = expect_ack(&response, "add custom DNS record").unwrap_err();
        assert!(matches!(err, Error::Rejected { ref message, .. } if message == "already exists"));
    }

    #[test]
    fn test_ack_success() {
        let response = HttpResponse::new(200, r#"{"success":true,"message":""}"#);
        assert!(expect_ack(&response, "op").is_ok());
    }

    #[test]
    fn test_ack_malformed_is_decode_error() {
        let response = HttpResponse::new(200, "not json");
        assert!(matches!(
            expect_ack(&response, "op").unwrap_err(),
            Error::Decode { .. }
        ));
    }
}
