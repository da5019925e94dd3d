//! Interpretation of HTTP status codes
//!
//! Boolean endpoints (follow, star, membership) answer with a status and no
//! body. Everything here is a pure function of the response.

use hubkit_core::Response;
use serde::Deserialize;

use crate::error::TwoFactorType;
use crate::{Error, Result};

/// Header carrying two-factor challenges and codes
pub const OTP_HEADER: &str = "X-GitHub-OTP";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Build the error for a response the caller did not expect
///
/// A 401 announcing a required code becomes [`Error::TwoFactorRequired`];
/// everything else is an [`Error::Api`] carrying status and body.
pub fn error_for(response: &Response) -> Error {
    if response.status == 401 {
        if let Some(kind) = response.header(OTP_HEADER).and_then(TwoFactorType::from_otp_header) {
            return Error::TwoFactorRequired(kind);
        }
    }

    let body = response.text();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or_else(|_| default_reason(response.status).to_string());

    Error::Api {
        status: response.status,
        message,
        body,
    }
}

/// Pass 2xx responses through, turn anything else into an error
pub fn ensure_success(response: Response) -> Result<Response> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(error_for(&response))
    }
}

/// 204 means yes, 404 means no
pub fn no_content_to_bool(response: &Response) -> Result<bool> {
    match response.status {
        204 => Ok(true),
        404 => Ok(false),
        _ => Err(error_for(response)),
    }
}

/// Like [`no_content_to_bool`], but a 302 also means no
///
/// GitHub redirects a membership check to the public-membership endpoint
/// when the requester is not a member of the organization.
pub fn membership_to_bool(response: &Response) -> Result<bool> {
    match response.status {
        302 => Ok(false),
        _ => no_content_to_bool(response),
    }
}

fn default_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500..=599 => "Server Error",
        _ => "Unexpected status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_content_to_bool() {
        assert!(no_content_to_bool(&Response::new(204, "")).unwrap());
        assert!(!no_content_to_bool(&Response::new(404, "")).unwrap());

        for status in [200, 302, 409, 500] {
            let err = no_content_to_bool(&Response::new(status, "")).unwrap_err();
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn test_membership_to_bool_treats_redirect_as_no() {
        assert!(membership_to_bool(&Response::new(204, "")).unwrap());
        assert!(!membership_to_bool(&Response::new(404, "")).unwrap());
        assert!(!membership_to_bool(&Response::new(302, "")).unwrap());
        assert!(membership_to_bool(&Response::new(409, "")).is_err());
    }

    #[test]
    fn test_error_for_uses_github_message() {
        let response = Response::new(
            422,
            r#"{"message":"Validation Failed","documentation_url":"https://docs.github.com"}"#,
        );
        match error_for(&response) {
            Error::Api {
                status,
                message,
                body,
            } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Validation Failed");
                assert!(body.contains("documentation_url"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_for_detects_two_factor_challenge() {
        let response = Response::new(401, "").with_header("x-github-otp", "required; sms");
        assert!(matches!(
            error_for(&response),
            Error::TwoFactorRequired(TwoFactorType::Sms)
        ));

        let plain = Response::new(401, r#"{"message":"Bad credentials"}"#);
        assert_eq!(error_for(&plain).status(), Some(401));
    }

    #[test]
    fn test_ensure_success() {
        assert!(ensure_success(Response::new(201, "{}")).is_ok());
        let err = ensure_success(Response::new(500, "oops")).unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, ref message, .. } if message == "Server Error"));
    }
}
