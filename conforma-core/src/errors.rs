//! # Errors
//!
//! Conforma uses a small set of structured errors shared by every crate.
//! Core goals:
//! - consistent status codes + class names across all route handlers
//! - can be carried through anyhow::Error (so `?` composes freely)
//! - transport-agnostic (the server crate decides how to respond)
//!
//! The JSON shape is the client-facing `{ "error": { ... } }` envelope.

use std::fmt;

use anyhow::Error as AnyError;

/// Error classes understood by the route boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,       // 400
    NotAuthenticated, // 401
    PlanLimit,        // 402
    Forbidden,        // 403
    NotFound,         // 404
    Conflict,         // 409
    General,          // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::PlanLimit => 402,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::General => 500,
        }
    }

    /// Client-facing error `name` (e.g. "NotFound").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotAuthenticated => "NotAuthenticatedError",
            ErrorKind::PlanLimit => "PlanLimitError",
            ErrorKind::Forbidden => "ForbiddenError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Conflict => "ConflictError",
            ErrorKind::General => "GeneralError",
        }
    }
}

/// A structured Conforma error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Optional structured detail, e.g. per-field validation messages.
    pub details: Option<serde_json::Value>,
    pub source: Option<AnyError>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Convert into `anyhow::Error` so it flows through `?`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Turn any error into a Conforma Error:
    /// - if it's already one, keep it (lossless)
    /// - otherwise wrap as General
    pub fn normalize(err: AnyError) -> Error {
        match err.downcast::<Error>() {
            Ok(e) => e,
            Err(other) => Error::new(ErrorKind::General, other.to_string()).with_source(other),
        }
    }

    /// A version safe to return to clients:
    /// keep kind/message/details, drop the inner `source`.
    pub fn sanitize_for_client(&self) -> Error {
        Error {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }

    /// The `{ "error": { ... } }` envelope.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut body = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
        });

        if let Some(d) = &self.details {
            body["details"] = d.clone();
        }

        json!({ "error": body })
    }

    // ---- Constructors ----

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn plan_limit(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::PlanLimit, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, msg)
    }
    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::General, msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Convenience helper for "bail with a structured error".
#[macro_export]
macro_rules! bail_error {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::Error::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::Error::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_structured_errors() {
        let err = Error::not_found("risk not found").into_anyhow();
        let back = Error::normalize(err);
        assert_eq!(back.kind, ErrorKind::NotFound);
        assert_eq!(back.message, "risk not found");
    }

    #[test]
    fn normalize_wraps_plain_errors_as_general() {
        let back = Error::normalize(anyhow::anyhow!("boom"));
        assert_eq!(back.kind, ErrorKind::General);
        assert_eq!(back.code(), 500);
    }

    #[test]
    fn bail_error_carries_the_structured_kind() {
        fn lookup(found: bool) -> anyhow::Result<u8> {
            if !found {
                bail_error!(not_found, "record {} missing", 7);
            }
            Ok(1)
        }

        let err = lookup(false).unwrap_err();
        let e = Error::normalize(err);
        assert_eq!(e.kind, ErrorKind::NotFound);
        assert_eq!(e.message, "record 7 missing");
    }

    #[test]
    fn envelope_shape() {
        let err = Error::validation("invalid slug")
            .with_details(serde_json::json!({"slug": ["must be lowercase"]}));
        let body = err.to_json();
        assert_eq!(body["error"]["name"], "ValidationError");
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["details"]["slug"][0], "must be lowercase");
    }
}
