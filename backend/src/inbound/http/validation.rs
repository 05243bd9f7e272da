//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected input becomes `400 invalid_request` with
//! `{"field": ..., "code": ...}` details so clients can point at the form
//! control that needs fixing.

use serde_json::json;

use crate::domain::{
    BugReportId, BugReportValidationError, Error, LoginValidationError, UserValidationError,
};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    MalformedForm,
    FileTooLarge,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::MalformedForm => "malformed_form",
            Self::FileTooLarge => "file_too_large",
        }
    }
}

pub(crate) fn field_error(field: &str, reason: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": reason,
    }))
}

fn http_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    field_error(field, code.as_str(), message)
}

pub(crate) fn malformed_form_error(field: &str, detail: impl std::fmt::Display) -> Error {
    http_error(
        field,
        ErrorCode::MalformedForm,
        format!("could not read {field}: {detail}"),
    )
}

pub(crate) fn file_too_large_error(field: &str, max_bytes: usize) -> Error {
    Error::invalid_request(format!("{field} must be at most {max_bytes} bytes")).with_details(
        json!({
            "field": field,
            "code": ErrorCode::FileTooLarge.as_str(),
            "maxBytes": max_bytes,
        }),
    )
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    field_error(err.field(), err.reason(), err.to_string())
}

pub(crate) fn bug_validation_error(err: BugReportValidationError) -> Error {
    field_error(err.field(), err.reason(), err.to_string())
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    let (field, reason) = match err {
        LoginValidationError::EmptyUsername => ("username", "empty_username"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    field_error(field, reason, err.to_string())
}

/// Parse a report id taken from the request path.
pub(crate) fn parse_bug_id(raw: i32) -> Result<BugReportId, Error> {
    BugReportId::new(raw).map_err(|_| {
        http_error(
            "id",
            ErrorCode::InvalidId,
            format!("bug report id must be positive, got {raw}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    fn details(err: &Error) -> (&str, &str) {
        let details = err.details().expect("details present");
        (
            details.get("field").and_then(Value::as_str).expect("field"),
            details.get("code").and_then(Value::as_str).expect("code"),
        )
    }

    #[rstest]
    #[case(UserValidationError::InvalidEmail, "email", "invalid_email")]
    #[case(UserValidationError::EmptyUsername, "username", "empty_username")]
    #[case(UserValidationError::PasswordTooLong { max: 100 }, "password", "password_too_long")]
    fn user_errors_name_their_field(
        #[case] err: UserValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = user_validation_error(err);
        assert_eq!(mapped.code(), DomainCode::InvalidRequest);
        assert_eq!(mapped.message(), err.to_string());
        assert_eq!(details(&mapped), (field, code));
    }

    #[rstest]
    #[case(BugReportValidationError::EmptyTitle, "title", "empty_title")]
    #[case(BugReportValidationError::EmptyDescription, "description", "empty_description")]
    #[case(BugReportValidationError::StatusTooLong { max: 50 }, "status", "status_too_long")]
    fn bug_errors_name_their_field(
        #[case] err: BugReportValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        assert_eq!(details(&bug_validation_error(err)), (field, code));
    }

    #[rstest]
    fn login_errors_name_their_field() {
        let err = login_validation_error(LoginValidationError::EmptyPassword);
        assert_eq!(err.message(), "password must not be empty");
        assert_eq!(details(&err), ("password", "empty_password"));
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_ids_are_rejected(#[case] raw: i32) {
        let err = parse_bug_id(raw).expect_err("invalid id");
        assert_eq!(details(&err), ("id", "invalid_id"));
    }

    #[rstest]
    fn oversized_files_report_the_limit() {
        let err = file_too_large_error("screenshot", 1024);
        let details = err.details().expect("details");
        assert_eq!(details["maxBytes"], 1024);
        assert_eq!(details["code"], "file_too_large");
    }
}
