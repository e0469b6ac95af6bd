use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Rejections raised by the roster, export, and storage layers.
#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("student name is required")]
    EmptyName,

    #[error("student id is required")]
    EmptyId,

    #[error("a student with id '{0}' is already enrolled")]
    DuplicateStudent(String),

    #[error("no enrolled student has id '{0}'")]
    UnknownStudent(String),

    #[error("day {0} is outside the program (days 1-40)")]
    DayOutOfRange(u8),

    #[error("training title cannot be empty")]
    EmptyTitle,

    #[error("start date '{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("invalid backup file: {0}")]
    InvalidBackup(String),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        let status = match &err {
            AttendanceError::DuplicateStudent(_) => StatusCode::CONFLICT,
            AttendanceError::UnknownStudent(_) => StatusCode::NOT_FOUND,
            AttendanceError::Serialize(_) | AttendanceError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            error!("request failed: {err}");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
