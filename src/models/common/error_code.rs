use actix_web::http::StatusCode;

use crate::errors::HWSystemError;

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    PayloadTooLarge = 1013,
    InternalServerError = 1500,

    // 提交相关
    EmptySubmission = 4000,
    SubmissionNotFound = 4001,
    SubmissionLocked = 4002,
    UnsupportedAttachmentKind = 4003,
    InvalidAttachmentPayload = 4004,
    AttachmentTooLarge = 4005,

    // 作业相关
    AssignmentNotFound = 5000,

    // 批改相关
    InvalidGrade = 6000,
    EmptyFeedback = 6001,
    UnknownSticker = 6002,
}

impl ErrorCode {
    /// 对应的 HTTP 状态码
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,
            ErrorCode::SubmissionNotFound | ErrorCode::AssignmentNotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorCode::SubmissionLocked => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge | ErrorCode::AttachmentTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<&HWSystemError> for ErrorCode {
    fn from(err: &HWSystemError) -> Self {
        match err {
            HWSystemError::EmptySubmission(_) => ErrorCode::EmptySubmission,
            HWSystemError::EmptyFeedback(_) => ErrorCode::EmptyFeedback,
            HWSystemError::InvalidGrade(_) => ErrorCode::InvalidGrade,
            HWSystemError::SubmissionLocked(_) => ErrorCode::SubmissionLocked,
            HWSystemError::AssignmentNotFound(_) => ErrorCode::AssignmentNotFound,
            HWSystemError::UnsupportedAttachmentKind(_) => ErrorCode::UnsupportedAttachmentKind,
            HWSystemError::SubmissionNotFound(_) => ErrorCode::SubmissionNotFound,
            HWSystemError::InvalidAttachmentPayload(_) => ErrorCode::InvalidAttachmentPayload,
            HWSystemError::AttachmentTooLarge(_) => ErrorCode::AttachmentTooLarge,
            HWSystemError::UnknownSticker(_) => ErrorCode::UnknownSticker,
            HWSystemError::Validation(_) => ErrorCode::BadRequest,
            HWSystemError::DatabaseConfig(_)
            | HWSystemError::DatabaseConnection(_)
            | HWSystemError::DatabaseOperation(_)
            | HWSystemError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
