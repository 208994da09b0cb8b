pub mod stickers;

pub mod submissions;

use actix_web::HttpResponse;
use tracing::{error, warn};

use crate::errors::HWSystemError;
use crate::models::{ApiResponse, ErrorCode};

pub use stickers::configure_sticker_routes;
pub use submissions::configure_submission_routes;

/// 将业务错误转换为统一响应
pub(crate) fn error_response(err: &HWSystemError) -> HttpResponse {
    let code = ErrorCode::from(err);
    if err.is_rule_violation() {
        warn!("Request rejected: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    HttpResponse::build(code.status_code()).json(ApiResponse::error_empty(code, err.message()))
}
