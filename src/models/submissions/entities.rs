use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HWSystemError;

/// 附件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeKind {
    Audio,
    Image,
    Document,
}

impl MimeKind {
    pub const ALL: [MimeKind; 3] = [MimeKind::Audio, MimeKind::Image, MimeKind::Document];

    pub fn as_str(self) -> &'static str {
        match self {
            MimeKind::Audio => "audio",
            MimeKind::Image => "image",
            MimeKind::Document => "document",
        }
    }
}

impl fmt::Display for MimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeKind {
    type Err = HWSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(MimeKind::Audio),
            "image" => Ok(MimeKind::Image),
            "document" => Ok(MimeKind::Document),
            other => Err(HWSystemError::unsupported_attachment_kind(format!(
                "attachment kind '{other}' is not one of audio, image, document"
            ))),
        }
    }
}

/// 提交附件：base64 文本 + 类型标记
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub encoded_payload: String,
    pub mime_kind: MimeKind,
}

/// 提交内容模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    Text,
    Voice,
    Photo,
    Document,
}

impl ContentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentMode::Text => "text",
            ContentMode::Voice => "voice",
            ContentMode::Photo => "photo",
            ContentMode::Document => "document",
        }
    }

    /// 该模式要求的附件类型，文本模式没有附件
    pub fn required_kind(self) -> Option<MimeKind> {
        match self {
            ContentMode::Text => None,
            ContentMode::Voice => Some(MimeKind::Audio),
            ContentMode::Photo => Some(MimeKind::Image),
            ContentMode::Document => Some(MimeKind::Document),
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentMode {
    type Err = HWSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentMode::Text),
            "voice" => Ok(ContentMode::Voice),
            "photo" => Ok(ContentMode::Photo),
            "document" => Ok(ContentMode::Document),
            other => Err(HWSystemError::serialization(format!(
                "unknown content mode '{other}'"
            ))),
        }
    }
}

/// 提交内容，四种模式互斥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum SubmissionContent {
    Text(String),
    Voice(Attachment),
    Photo(Attachment),
    Document(Attachment),
}

impl SubmissionContent {
    pub fn mode(&self) -> ContentMode {
        match self {
            SubmissionContent::Text(_) => ContentMode::Text,
            SubmissionContent::Voice(_) => ContentMode::Voice,
            SubmissionContent::Photo(_) => ContentMode::Photo,
            SubmissionContent::Document(_) => ContentMode::Document,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SubmissionContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            SubmissionContent::Text(_) => None,
            SubmissionContent::Voice(a)
            | SubmissionContent::Photo(a)
            | SubmissionContent::Document(a) => Some(a),
        }
    }

    /// 按模式和附件组装内容（存储层还原时使用）
    pub fn from_parts(
        mode: ContentMode,
        text: Option<String>,
        attachment: Option<Attachment>,
    ) -> Result<Self, HWSystemError> {
        let missing = || {
            HWSystemError::serialization(format!("stored {mode} submission has no attachment"))
        };
        Ok(match mode {
            ContentMode::Text => SubmissionContent::Text(text.unwrap_or_default()),
            ContentMode::Voice => SubmissionContent::Voice(attachment.ok_or_else(missing)?),
            ContentMode::Photo => SubmissionContent::Photo(attachment.ok_or_else(missing)?),
            ContentMode::Document => SubmissionContent::Document(attachment.ok_or_else(missing)?),
        })
    }
}

/// 提交状态（由是否存在记录、是否有分数推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    NotSubmitted,
    Submitted,
    Graded,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::NotSubmitted => "NOT_SUBMITTED",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Graded => "GRADED",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已持久化的提交
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: SubmissionContent,
    pub is_late: bool,
    // 首次提交时间，编辑不改变
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn status(&self) -> SubmissionStatus {
        if self.grade.is_some() {
            SubmissionStatus::Graded
        } else {
            SubmissionStatus::Submitted
        }
    }

    /// 学生是否还能修改
    pub fn is_editable(&self) -> bool {
        self.status() != SubmissionStatus::Graded
    }
}

/// 学生视角的提交：未提交时没有记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentSubmission {
    NotSubmitted,
    Persisted(Submission),
}

impl StudentSubmission {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            StudentSubmission::NotSubmitted => SubmissionStatus::NotSubmitted,
            StudentSubmission::Persisted(submission) => submission.status(),
        }
    }

    pub fn submission(&self) -> Option<&Submission> {
        match self {
            StudentSubmission::NotSubmitted => None,
            StudentSubmission::Persisted(submission) => Some(submission),
        }
    }

    pub fn into_submission(self) -> Option<Submission> {
        match self {
            StudentSubmission::NotSubmitted => None,
            StudentSubmission::Persisted(submission) => Some(submission),
        }
    }
}

impl From<Option<Submission>> for StudentSubmission {
    fn from(value: Option<Submission>) -> Self {
        value.map_or(StudentSubmission::NotSubmitted, StudentSubmission::Persisted)
    }
}
