use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> Error {
    debug!("Rejected request parameters: {}", message);
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

/// JSON 请求体解析错误处理器
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    if let JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } = err
    {
        let message = format!("Request body too large: {err}");
        let response = HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
            ErrorCode::PayloadTooLarge,
            message.clone(),
        ));
        return InternalError::from_response(message, response).into();
    }
    bad_request(format!("Invalid JSON body: {err}"))
}

/// 查询参数解析错误处理器
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    bad_request(format!("Invalid query parameters: {err}"))
}

/// 路径参数解析错误处理器
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    bad_request(format!("Invalid path parameters: {err}"))
}
