use serde::Serialize;

use super::entities::{StudentSubmission, Submission, SubmissionStatus};
use crate::models::feedback::entities::FeedbackSegment;

/// 学生提交查询响应，未提交时 submission 为空
#[derive(Debug, Serialize)]
pub struct StudentSubmissionResponse {
    pub status: SubmissionStatus,
    pub submission: Option<Submission>,
}

impl From<StudentSubmission> for StudentSubmissionResponse {
    fn from(value: StudentSubmission) -> Self {
        Self {
            status: value.status(),
            submission: value.into_submission(),
        }
    }
}

/// 提交详情响应（附带派生状态）
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub status: SubmissionStatus,
    #[serde(flatten)]
    pub submission: Submission,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            status: submission.status(),
            submission,
        }
    }
}

/// 作业提交列表响应
#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionResponse>,
}

/// 评语分段响应
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub submission_id: i64,
    pub feedback: Option<String>,
    pub segments: Vec<FeedbackSegment>,
}
