//! 提交生命周期
//!
//! NOT_SUBMITTED → SUBMITTED → GRADED。首次有效保存创建记录，
//! 评分前可反复保存，评分后学生端的写入一律被拒绝。

pub mod content;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{HWSystemError, Result};
use crate::models::assignments::{entities::Assignment, responses::AssignmentStats};
use crate::models::submissions::{
    entities::{StudentSubmission, Submission, SubmissionContent},
    requests::NewSubmission,
};
use crate::services::attachments::AttachmentPolicy;
use crate::storage::Storage;

pub struct SubmissionLifecycle {
    storage: Arc<dyn Storage>,
    policy: AttachmentPolicy,
}

impl SubmissionLifecycle {
    pub fn new(storage: Arc<dyn Storage>, policy: AttachmentPolicy) -> Self {
        Self { storage, policy }
    }

    /// 本地校验，任何存储调用之前完成
    fn validate(&self, content: &SubmissionContent) -> Result<()> {
        content::validate_content(content)?;
        if let Some(attachment) = content.attachment() {
            self.policy.check(attachment)?;
        }
        Ok(())
    }

    async fn resolve_assignment(&self, assignment_id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                HWSystemError::assignment_not_found(format!(
                    "assignment {assignment_id} does not exist"
                ))
            })
    }

    /// 创建或编辑提交
    ///
    /// 该 (作业, 学生) 已有记录时按编辑处理；已评分则返回 `SubmissionLocked`。
    pub async fn create_or_edit(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: SubmissionContent,
    ) -> Result<Submission> {
        self.validate(&content)?;
        let assignment = self.resolve_assignment(assignment_id).await?;

        if let Some(existing) = self
            .storage
            .get_submission_by_pair(assignment_id, student_id)
            .await?
        {
            return self.write_content(existing.id, &content).await;
        }

        let now = Utc::now();
        let inserted = self
            .storage
            .insert_submission(NewSubmission {
                assignment_id,
                student_id,
                content: content.clone(),
                is_late: assignment.is_late_at(now),
                submitted_at: now,
            })
            .await?;

        match inserted {
            Some(submission) => {
                info!(
                    "Submission {} created: assignment={}, student={}, mode={}",
                    submission.id,
                    assignment_id,
                    student_id,
                    submission.content.mode()
                );
                Ok(submission)
            }
            None => {
                // 并发的首次提交已经写入，本次按编辑处理
                debug!(
                    "Concurrent create for assignment={}, student={}, retrying as edit",
                    assignment_id, student_id
                );
                let existing = self
                    .storage
                    .get_submission_by_pair(assignment_id, student_id)
                    .await?
                    .ok_or_else(|| {
                        HWSystemError::database_operation(
                            "submission vanished after unique key conflict",
                        )
                    })?;
                self.write_content(existing.id, &content).await
            }
        }
    }

    /// 编辑已有提交的内容，不改变提交时间、分数和评语
    pub async fn edit(&self, submission_id: i64, content: SubmissionContent) -> Result<Submission> {
        self.validate(&content)?;
        self.write_content(submission_id, &content).await
    }

    async fn write_content(
        &self,
        submission_id: i64,
        content: &SubmissionContent,
    ) -> Result<Submission> {
        // 锁定判定交给存储层的条件写入，以提交时刻的最新状态为准
        let submission = self
            .storage
            .update_submission_content(submission_id, content)
            .await?;
        info!(
            "Submission {} edited, mode={}",
            submission_id,
            submission.content.mode()
        );
        Ok(submission)
    }

    /// 学生查询自己的提交，未提交不是错误
    pub async fn fetch_for_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<StudentSubmission> {
        let submission = self
            .storage
            .get_submission_by_pair(assignment_id, student_id)
            .await?;
        Ok(submission.into())
    }

    /// 列出作业下的全部提交
    pub async fn list_for_assignment(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.resolve_assignment(assignment_id).await?;
        self.storage.list_submissions_by_assignment(assignment_id).await
    }

    /// 作业的待批改/已批改计数
    pub async fn assignment_stats(&self, assignment_id: i64) -> Result<AssignmentStats> {
        self.resolve_assignment(assignment_id).await?;
        self.storage.get_assignment_stats(assignment_id).await
    }
}
