use serde::Deserialize;

/// 附件请求体，payload 为 base64 文本
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentRequest {
    pub kind: String,
    pub payload: String,
}

/// 创建/编辑提交请求，四种内容只能给出一种
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitContentRequest {
    pub text: Option<String>,
    pub voice: Option<AttachmentRequest>,
    pub photo: Option<AttachmentRequest>,
    pub document: Option<AttachmentRequest>,
}

/// 批改请求
#[derive(Debug, Clone, Deserialize)]
pub struct GradeSubmissionRequest {
    pub grade: i64,
    pub free_text: Option<String>,
    #[serde(default)]
    pub sticker_ids: Vec<String>,
}

/// 新提交（存储层输入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: super::entities::SubmissionContent,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// 评分记录（存储层输入），分数与评语一次写入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRecord {
    pub grade: i32,
    pub feedback: Option<String>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
