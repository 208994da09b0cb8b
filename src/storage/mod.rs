//! 存储协作方
//!
//! 汇集本系统依赖的外部协作方：作业服务（只读）、提交仓储和作业聚合计数。
//! 实现必须保证：
//! - 编辑内容是条件写入：存储中的记录已有分数时拒绝（`SubmissionLocked`）
//! - 评分的分数、评语与计数刷新作为一个原子单元提交
//! - 同一 (作业, 学生) 只有一条记录

use std::sync::Arc;

use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    assignments::{entities::Assignment, responses::AssignmentStats},
    submissions::{
        entities::{Submission, SubmissionContent},
        requests::{GradeRecord, NewSubmission},
    },
};

pub mod memory_storage;
pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业服务
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;

    /// 聚合计数
    // 获取作业的待批改/已批改计数，无记录时为 0
    async fn get_assignment_stats(&self, assignment_id: i64) -> Result<AssignmentStats>;

    /// 提交仓储
    // 插入新提交并计入待批改；该 (作业, 学生) 已有记录时返回 None
    async fn insert_submission(&self, submission: NewSubmission) -> Result<Option<Submission>>;
    // 条件更新内容：已评分返回 SubmissionLocked，不存在返回 SubmissionNotFound
    async fn update_submission_content(
        &self,
        submission_id: i64,
        content: &SubmissionContent,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取学生在某作业下的提交
    async fn get_submission_by_pair(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 列出作业下的全部提交（按首次提交时间）
    async fn list_submissions_by_assignment(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    // 原子地写入分数与评语并刷新计数，不存在返回 SubmissionNotFound
    async fn apply_grade(&self, submission_id: i64, grade: GradeRecord) -> Result<Submission>;
}

/// 根据数据库 URL 选择存储后端
pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    if config.url == memory_storage::MEMORY_URL {
        warn!("Using in-memory storage, data will be lost on shutdown");
        return Ok(Arc::new(memory_storage::MemoryStorage::new()));
    }
    let storage = sea_orm_storage::SeaOrmStorage::new_async(config).await?;
    Ok(Arc::new(storage))
}
