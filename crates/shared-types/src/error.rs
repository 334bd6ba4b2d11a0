use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// HTTP-facing application errors
// ---------------------------------------------------------------------------

/// Categorization of application errors surfaced over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    UpstreamError,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::Unauthorized => write!(f, "Unauthorized"),
            AppErrorKind::UpstreamError => write!(f, "UpstreamError"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured application error used across the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self { kind: AppErrorKind::NotFound, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { kind: AppErrorKind::BadRequest, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { kind: AppErrorKind::Unauthorized, message: message.into() }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self { kind: AppErrorKind::UpstreamError, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { kind: AppErrorKind::InternalError, message: message.into() }
    }

    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::Unauthorized => 401,
            AppErrorKind::UpstreamError => 502,
            AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Engine (dispatch/distribution) errors
// ---------------------------------------------------------------------------

/// Failure taxonomy of the dispatch and distribution engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum DispatchErrorKind {
    /// Caller error: a field the handler requires is absent. Fails fast,
    /// never retried, propagates to the dispatch caller.
    RequiredFieldMissing,
    /// A handler was invoked with an event it does not apply to.
    CannotHandle,
    /// The template renderer could not be reached within the retry budget.
    RendererUnreachable,
    /// The print channel rejected the content as malformed. Permanent; an
    /// operator must correct the underlying documents.
    BadDocumentFormat,
    /// The print channel could not be reached within the retry budget.
    PrintUnreachable,
    /// No department address for the (benefit, office) pair. Data quality,
    /// not transient.
    AddressNotFound,
    /// The case-record store rejected or failed a call.
    CaseStore,
    /// The document store could not supply a document's bytes.
    EvidenceStore,
}

impl fmt::Display for DispatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchErrorKind::RequiredFieldMissing => "RequiredFieldMissing",
            DispatchErrorKind::CannotHandle => "CannotHandle",
            DispatchErrorKind::RendererUnreachable => "RendererUnreachable",
            DispatchErrorKind::BadDocumentFormat => "BadDocumentFormat",
            DispatchErrorKind::PrintUnreachable => "PrintUnreachable",
            DispatchErrorKind::AddressNotFound => "AddressNotFound",
            DispatchErrorKind::CaseStore => "CaseStore",
            DispatchErrorKind::EvidenceStore => "EvidenceStore",
        };
        f.write_str(s)
    }
}

/// Structured engine error carrying its taxonomy kind and a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DispatchError {
    pub kind: DispatchErrorKind,
    pub message: String,
}

impl DispatchError {
    pub fn required_field_missing(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::RequiredFieldMissing, message: message.into() }
    }

    pub fn cannot_handle(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::CannotHandle, message: message.into() }
    }

    pub fn renderer_unreachable(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::RendererUnreachable, message: message.into() }
    }

    pub fn bad_document_format(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::BadDocumentFormat, message: message.into() }
    }

    pub fn print_unreachable(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::PrintUnreachable, message: message.into() }
    }

    pub fn address_not_found(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::AddressNotFound, message: message.into() }
    }

    pub fn case_store(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::CaseStore, message: message.into() }
    }

    pub fn evidence_store(message: impl Into<String>) -> Self {
        Self { kind: DispatchErrorKind::EvidenceStore, message: message.into() }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for DispatchError {}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err.kind {
            DispatchErrorKind::RequiredFieldMissing | DispatchErrorKind::CannotHandle => {
                AppError::bad_request(err.message)
            }
            DispatchErrorKind::AddressNotFound | DispatchErrorKind::BadDocumentFormat => {
                AppError { kind: AppErrorKind::InternalError, message: err.to_string() }
            }
            DispatchErrorKind::RendererUnreachable
            | DispatchErrorKind::PrintUnreachable
            | DispatchErrorKind::CaseStore
            | DispatchErrorKind::EvidenceStore => AppError::upstream(err.to_string()),
        }
    }
}
