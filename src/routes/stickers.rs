use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::models::ApiResponse;
use crate::models::stickers::catalog;

// 列出贴纸目录
pub async fn list_stickers() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(catalog::all(), "查询成功")))
}

// 配置路由
pub fn configure_sticker_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/stickers").route("", web::get().to(list_stickers)));
}
