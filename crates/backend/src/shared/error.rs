//! Error type shared by services and handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::api::ApiResponse;
use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

const INTEGRITY_MESSAGE: &str = "Erro de integridade dos dados";
const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Name or number already taken
    #[error("{0}")]
    Conflict(String),

    /// Constraint violation reported by the store
    #[error("{0}")]
    Integrity(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Integrity(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Taxonomy endpoints report store-level uniqueness violations as conflicts
    pub fn integrity_as_conflict(self, message: impl Into<String>) -> Self {
        match self {
            Self::Integrity(_) => Self::Conflict(message.into()),
            other => other,
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::warn!("Constraint violation: {}", detail);
                Self::Integrity(INTEGRITY_MESSAGE.into())
            }
            _ if is_lock_contention(&err) => {
                tracing::warn!("Concurrent write rejected: {}", err);
                Self::Integrity(INTEGRITY_MESSAGE.into())
            }
            _ => Self::Internal(err.into()),
        }
    }
}

/// SQLITE_BUSY / SQLITE_LOCKED, including their extended codes.
/// A writer that lost the race for the database lock gets one of these.
fn is_lock_contention(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) | DbErr::Conn(e) => e,
        _ => return false,
    };
    let RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) = runtime else {
        return false;
    };
    db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(is_lock_code)
        .unwrap_or(false)
}

fn is_lock_code(code: i32) -> bool {
    matches!(code & 0xff, 5 | 6)
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Dados inválidos: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(format!("Parâmetros inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(format!("Identificador inválido: {}", rejection.body_text()))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            Self::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                INTERNAL_MESSAGE.to_string()
            }
            Self::Validation(m) | Self::NotFound(m) | Self::Conflict(m) | Self::Integrity(m) => m,
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ServiceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Integrity("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_integrity_as_conflict() {
        let err = ServiceError::Integrity("dup".into()).integrity_as_conflict("Categoria já existe");
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Categoria já existe"));

        let err = ServiceError::NotFound("x".into()).integrity_as_conflict("ignored");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_lock_codes() {
        assert!(is_lock_code(5));
        assert!(is_lock_code(6));
        // SQLITE_BUSY_SNAPSHOT
        assert!(is_lock_code(517));
        // SQLITE_CONSTRAINT_UNIQUE
        assert!(!is_lock_code(2067));
        assert!(!is_lock_code(1));
    }

    #[test]
    fn test_plain_db_errors_are_internal() {
        let err: ServiceError = DbErr::Custom("disk I/O error".into()).into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn test_internal_response_does_not_leak_details() {
        let response = ServiceError::Internal(anyhow::anyhow!("secret table name")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], INTERNAL_MESSAGE);
    }
}
