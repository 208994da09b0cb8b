//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content_mode: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content_text: Option<String>,
    pub attachment_kind: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub attachment_payload: Option<String>,
    pub is_late: bool,
    pub submitted_at: i64,
    pub updated_at: i64,
    pub grade: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 内容在表中的列表示：(模式, 文本, 附件类型, 附件内容)
pub type ContentColumns = (String, Option<String>, Option<String>, Option<String>);

/// 将业务内容拆成列
pub fn content_columns(
    content: &crate::models::submissions::entities::SubmissionContent,
) -> ContentColumns {
    let mode = content.mode().as_str().to_string();
    match content.attachment() {
        Some(attachment) => (
            mode,
            None,
            Some(attachment.mime_kind.as_str().to_string()),
            Some(attachment.encoded_payload.clone()),
        ),
        None => (mode, content.text().map(str::to_string), None, None),
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(
        self,
    ) -> crate::errors::Result<crate::models::submissions::entities::Submission> {
        use crate::models::submissions::entities::{Attachment, Submission, SubmissionContent};
        use chrono::{DateTime, Utc};

        let attachment = match (self.attachment_kind, self.attachment_payload) {
            (Some(kind), Some(payload)) => Some(Attachment {
                encoded_payload: payload,
                mime_kind: kind.parse()?,
            }),
            _ => None,
        };
        let content =
            SubmissionContent::from_parts(self.content_mode.parse()?, self.content_text, attachment)?;

        Ok(Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content,
            is_late: self.is_late,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            grade: self.grade,
            feedback: self.feedback,
            graded_at: self
                .graded_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }
}
