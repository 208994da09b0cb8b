//! 提交存储操作

use super::SeaOrmStorage;
use super::assignments::adjust_assignment_stats;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, content_columns};
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionContent},
    requests::{GradeRecord, NewSubmission},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use tracing::{debug, info, warn};

impl SeaOrmStorage {
    /// 插入提交并刷新统计；唯一键冲突时返回 None
    pub async fn insert_submission_impl(
        &self,
        submission: NewSubmission,
    ) -> Result<Option<Submission>> {
        let (mode, text, kind, payload) = content_columns(&submission.content);
        let submitted_at = submission.submitted_at.timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            assignment_id: Set(submission.assignment_id),
            student_id: Set(submission.student_id),
            content_mode: Set(mode),
            content_text: Set(text),
            attachment_kind: Set(kind),
            attachment_payload: Set(payload),
            is_late: Set(submission.is_late),
            submitted_at: Set(submitted_at),
            updated_at: Set(submitted_at),
            grade: Set(None),
            feedback: Set(None),
            graded_at: Set(None),
            ..Default::default()
        };

        let inserted = match model.insert(&txn).await {
            Ok(inserted) => inserted,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!(
                    "提交已存在: assignment={}, student={}",
                    submission.assignment_id, submission.student_id
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(HWSystemError::database_operation(format!(
                    "创建提交失败: {e}"
                )));
            }
        };

        adjust_assignment_stats(&txn, submission.assignment_id, 1, 0).await?;

        txn.commit()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("提交事务失败: {e}")))?;

        inserted.into_submission().map(Some)
    }

    /// 条件更新提交内容（仅未评分时生效）
    pub async fn update_submission_content_impl(
        &self,
        submission_id: i64,
        content: &SubmissionContent,
    ) -> Result<Submission> {
        let (mode, text, kind, payload) = content_columns(content);
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::ContentMode, Expr::value(mode))
            .col_expr(Column::ContentText, Expr::value(text))
            .col_expr(Column::AttachmentKind, Expr::value(kind))
            .col_expr(Column::AttachmentPayload, Expr::value(payload))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Grade.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("更新提交内容失败: {e}")))?;

        let current = self
            .get_submission_by_id_impl(submission_id)
            .await?
            .ok_or_else(|| {
                HWSystemError::submission_not_found(format!("submission {submission_id} does not exist"))
            })?;

        // 未更新任何行时以最新状态判定；部分驱动对无变化的更新也返回 0
        if result.rows_affected == 0 && !current.is_editable() {
            warn!("拒绝编辑已评分的提交: {}", submission_id);
            return Err(HWSystemError::submission_locked(format!(
                "submission {submission_id} has already been graded"
            )));
        }

        Ok(current)
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 获取学生某作业的提交
    pub async fn get_submission_by_pair_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询学生提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 列出作业下的全部提交
    pub async fn list_submissions_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交列表失败: {e}")))?;

        results.into_iter().map(|m| m.into_submission()).collect()
    }

    /// 评分：分数、评语和统计在同一事务中写入
    pub async fn apply_grade_impl(
        &self,
        submission_id: i64,
        grade: GradeRecord,
    ) -> Result<Submission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| {
                HWSystemError::submission_not_found(format!("submission {submission_id} does not exist"))
            })?;

        // 首次评分以 grade IS NULL 为条件写入，只有赢得该行的事务移动计数
        let first = Self::write_grade(&txn, submission_id, &grade, true).await?;
        let first_grade = first > 0;
        if first_grade {
            adjust_assignment_stats(&txn, existing.assignment_id, -1, 1).await?;
        } else {
            Self::write_grade(&txn, submission_id, &grade, false).await?;
        }

        let updated = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| {
                HWSystemError::submission_not_found(format!("submission {submission_id} does not exist"))
            })?;

        txn.commit()
            .await
            .map_err(|e| HWSystemError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "提交 {} 已评分: {} (重新评分: {})",
            submission_id,
            grade.grade,
            !first_grade
        );

        updated.into_submission()
    }

    async fn write_grade<C: ConnectionTrait>(
        conn: &C,
        submission_id: i64,
        grade: &GradeRecord,
        only_ungraded: bool,
    ) -> Result<u64> {
        let mut update = Submissions::update_many()
            .col_expr(Column::Grade, Expr::value(Some(grade.grade)))
            .col_expr(Column::Feedback, Expr::value(grade.feedback.clone()))
            .col_expr(
                Column::GradedAt,
                Expr::value(Some(grade.graded_at.timestamp())),
            )
            .filter(Column::Id.eq(submission_id));
        if only_ungraded {
            update = update.filter(Column::Grade.is_null());
        }

        let result = update
            .exec(conn)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("写入评分失败: {e}")))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::assignments::entities::Assignment;
    use crate::models::submissions::entities::{MimeKind, SubmissionStatus};
    use crate::services::attachments::encode;
    use crate::storage::Storage;
    use chrono::Utc;

    async fn storage_with_assignment() -> SeaOrmStorage {
        let storage = SeaOrmStorage::new_async(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .unwrap();
        storage
            .insert_assignment(&Assignment {
                id: 1,
                title: "A1".to_string(),
                due_at: None,
                reference_material: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        storage
    }

    fn new_submission(content: SubmissionContent) -> NewSubmission {
        NewSubmission {
            assignment_id: 1,
            student_id: 7,
            content,
            is_late: false,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_is_unique_per_pair() {
        let storage = storage_with_assignment().await;
        let first = storage
            .insert_submission(new_submission(SubmissionContent::Text("42".into())))
            .await
            .unwrap();
        assert!(first.is_some());

        let second = storage
            .insert_submission(new_submission(SubmissionContent::Text("43".into())))
            .await
            .unwrap();
        assert!(second.is_none());

        let stats = storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (1, 0));
    }

    #[tokio::test]
    async fn test_edit_then_grade_then_locked() {
        let storage = storage_with_assignment().await;
        let created = storage
            .insert_submission(new_submission(SubmissionContent::Text("42".into())))
            .await
            .unwrap()
            .unwrap();

        let photo = SubmissionContent::Photo(encode(b"\x89PNG", MimeKind::Image));
        let edited = storage
            .update_submission_content(created.id, &photo)
            .await
            .unwrap();
        assert_eq!(edited.content, photo);
        assert_eq!(edited.submitted_at, created.submitted_at);

        let graded = storage
            .apply_grade(
                created.id,
                GradeRecord {
                    grade: 95,
                    feedback: Some("Nice work".into()),
                    graded_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        assert_eq!(graded.status(), SubmissionStatus::Graded);

        let err = storage
            .update_submission_content(created.id, &SubmissionContent::Text("late".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::SubmissionLocked(_)));

        let stats = storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (0, 1));
    }

    #[tokio::test]
    async fn test_counters_move_once_per_submission() {
        let storage = storage_with_assignment().await;
        let mut ids = Vec::new();
        for student_id in [7, 8] {
            let created = storage
                .insert_submission(NewSubmission {
                    student_id,
                    ..new_submission(SubmissionContent::Text("42".into()))
                })
                .await
                .unwrap()
                .unwrap();
            ids.push(created.id);
        }

        let record = |value| GradeRecord {
            grade: value,
            feedback: Some("ok".into()),
            graded_at: Utc::now(),
        };
        storage.apply_grade(ids[0], record(80)).await.unwrap();
        storage.apply_grade(ids[1], record(90)).await.unwrap();
        let regraded = storage.apply_grade(ids[0], record(85)).await.unwrap();
        assert_eq!(regraded.grade, Some(85));

        let stats = storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (0, 2));
    }

    #[tokio::test]
    async fn test_stats_are_adjusted_in_place() {
        let storage = storage_with_assignment().await;
        storage
            .insert_submission(new_submission(SubmissionContent::Text("42".into())))
            .await
            .unwrap();

        // 已有计数在原值上增减，不会按当前快照整体改写
        adjust_assignment_stats(&storage.db, 1, 3, 2).await.unwrap();
        adjust_assignment_stats(&storage.db, 1, -1, 1).await.unwrap();

        let stats = storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (3, 3));
    }

    #[tokio::test]
    async fn test_missing_submission() {
        let storage = storage_with_assignment().await;
        let err = storage
            .update_submission_content(404, &SubmissionContent::Text("x".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::SubmissionNotFound(_)));

        let err = storage
            .apply_grade(
                404,
                GradeRecord {
                    grade: 50,
                    feedback: None,
                    graded_at: Utc::now(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::SubmissionNotFound(_)));
    }
}
