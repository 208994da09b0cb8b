use std::sync::Arc;

use actix_web::{HttpResponse, Result as ActixResult, web};

use super::error_response;
use crate::models::ApiResponse;
use crate::models::submissions::{
    requests::{GradeSubmissionRequest, SubmitContentRequest},
    responses::{
        FeedbackResponse, StudentSubmissionResponse, SubmissionListResponse, SubmissionResponse,
    },
};
use crate::services::attachments::AttachmentPolicy;
use crate::services::{GradingPolicy, GradingWorkflow, SubmissionDraft, SubmissionLifecycle};
use crate::storage::Storage;

fn lifecycle(
    storage: &web::Data<Arc<dyn Storage>>,
    policy: &web::Data<AttachmentPolicy>,
) -> SubmissionLifecycle {
    SubmissionLifecycle::new(storage.get_ref().clone(), *policy.get_ref())
}

fn grading(
    storage: &web::Data<Arc<dyn Storage>>,
    policy: &web::Data<GradingPolicy>,
) -> GradingWorkflow {
    GradingWorkflow::new(storage.get_ref().clone(), *policy.get_ref())
}

// 创建或编辑提交
pub async fn create_or_edit_submission(
    storage: web::Data<Arc<dyn Storage>>,
    policy: web::Data<AttachmentPolicy>,
    path: web::Path<(i64, i64)>, // (assignment_id, student_id)
    body: web::Json<SubmitContentRequest>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, student_id) = path.into_inner();

    let content = match SubmissionDraft::from_request(body.into_inner()).and_then(|d| d.finalize())
    {
        Ok(content) => content,
        Err(e) => return Ok(error_response(&e)),
    };

    match lifecycle(&storage, &policy)
        .create_or_edit(assignment_id, student_id, content)
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResponse::from(submission),
            "提交成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 获取学生的提交
pub async fn get_student_submission(
    storage: web::Data<Arc<dyn Storage>>,
    policy: web::Data<AttachmentPolicy>,
    path: web::Path<(i64, i64)>, // (assignment_id, student_id)
) -> ActixResult<HttpResponse> {
    let (assignment_id, student_id) = path.into_inner();

    // 尚未提交时返回 200 + NOT_SUBMITTED，而不是 404
    match lifecycle(&storage, &policy)
        .fetch_for_student(assignment_id, student_id)
        .await
    {
        Ok(state) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentSubmissionResponse::from(state),
            "查询成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 列出作业下的提交
pub async fn list_assignment_submissions(
    storage: web::Data<Arc<dyn Storage>>,
    policy: web::Data<AttachmentPolicy>,
    path: web::Path<i64>, // assignment_id
) -> ActixResult<HttpResponse> {
    match lifecycle(&storage, &policy)
        .list_for_assignment(path.into_inner())
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse {
                items: items.into_iter().map(SubmissionResponse::from).collect(),
            },
            "查询成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 获取作业提交统计
pub async fn get_assignment_stats(
    storage: web::Data<Arc<dyn Storage>>,
    policy: web::Data<AttachmentPolicy>,
    path: web::Path<i64>, // assignment_id
) -> ActixResult<HttpResponse> {
    match lifecycle(&storage, &policy)
        .assignment_stats(path.into_inner())
        .await
    {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 评分
pub async fn grade_submission(
    storage: web::Data<Arc<dyn Storage>>,
    policy: web::Data<GradingPolicy>,
    path: web::Path<i64>, // submission_id
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let req = body.into_inner();

    match grading(&storage, &policy)
        .grade_with_sticker_ids(
            path.into_inner(),
            req.grade,
            req.free_text.as_deref(),
            &req.sticker_ids,
        )
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResponse::from(submission),
            "评分成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 获取评语分段
pub async fn get_submission_feedback(
    storage: web::Data<Arc<dyn Storage>>,
    policy: web::Data<GradingPolicy>,
    path: web::Path<i64>, // submission_id
) -> ActixResult<HttpResponse> {
    match grading(&storage, &policy)
        .feedback_segments(path.into_inner())
        .await
    {
        Ok((submission, segments)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackResponse {
                submission_id: submission.id,
                feedback: submission.feedback,
                segments,
            },
            "查询成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}")
            .route("/submissions", web::get().to(list_assignment_submissions))
            .route(
                "/submissions/{student_id}",
                web::put().to(create_or_edit_submission),
            )
            .route(
                "/submissions/{student_id}",
                web::get().to(get_student_submission),
            )
            .route("/stats", web::get().to(get_assignment_stats)),
    );

    cfg.service(
        web::scope("/api/v1/submissions/{submission_id}")
            .route("/grade", web::post().to(grade_submission))
            .route("/feedback", web::get().to(get_submission_feedback)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Assignment;
    use crate::storage::memory_storage::MemoryStorage;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn app_storage() -> Arc<dyn Storage> {
        let storage = MemoryStorage::new();
        storage.seed_assignment(Assignment {
            id: 1,
            title: "A1".to_string(),
            due_at: None,
            reference_material: None,
            created_at: chrono::Utc::now(),
        });
        Arc::new(storage)
    }

    macro_rules! init_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage))
                    .app_data(web::Data::new(AttachmentPolicy::default()))
                    .app_data(web::Data::new(GradingPolicy::default()))
                    .configure(configure_submission_routes)
                    .configure(crate::routes::configure_sticker_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_submit_grade_lock_flow() {
        let app = init_app!(app_storage());

        let req = test::TestRequest::get()
            .uri("/api/v1/assignments/1/submissions/7")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "NOT_SUBMITTED");

        let req = test::TestRequest::put()
            .uri("/api/v1/assignments/1/submissions/7")
            .set_json(json!({ "text": "42" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "SUBMITTED");
        let submission_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .set_json(json!({ "grade": 95, "free_text": "Nice work", "sticker_ids": ["star"] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "GRADED");
        assert_eq!(body["data"]["feedback"], "Nice work\n\n⭐ Excellent Work");

        let req = test::TestRequest::put()
            .uri("/api/v1/assignments/1/submissions/7")
            .set_json(json!({ "text": "43" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/submissions/{submission_id}/feedback"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["segments"][0]["kind"], "free_text");
        assert_eq!(body["data"]["segments"][1]["sticker_id"], "star");

        let req = test::TestRequest::get()
            .uri("/api/v1/assignments/1/stats")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["graded"], 1);
        assert_eq!(body["data"]["pending"], 0);
    }

    #[actix_web::test]
    async fn test_rule_violations_are_distinguishable() {
        let app = init_app!(app_storage());

        let req = test::TestRequest::put()
            .uri("/api/v1/assignments/1/submissions/7")
            .set_json(json!({ "text": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4000);

        let req = test::TestRequest::put()
            .uri("/api/v1/assignments/9/submissions/7")
            .set_json(json!({ "photo": { "kind": "image", "payload": "iVBORw0KGgo=" } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/v1/submissions/1/grade")
            .set_json(json!({ "grade": 101, "free_text": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 6000);

        let req = test::TestRequest::post()
            .uri("/api/v1/submissions/404/grade")
            .set_json(json!({ "grade": 90, "free_text": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_list_and_stickers() {
        let app = init_app!(app_storage());

        for student in [3, 4] {
            let req = test::TestRequest::put()
                .uri(&format!("/api/v1/assignments/1/submissions/{student}"))
                .set_json(json!({ "voice": { "kind": "audio", "payload": "T2dnUw==" } }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/v1/assignments/1/submissions")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["content"]["mode"], "voice");

        let req = test::TestRequest::get().uri("/api/v1/stickers").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["id"], "star");
    }
}
