//! 内存存储实现
//!
//! 用于本地运行与测试。提交记录与统计由同一把锁保护，
//! 因此条件编辑、评分与计数刷新都是原子的。

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::errors::{HWSystemError, Result};
use crate::models::{
    assignments::{entities::Assignment, responses::AssignmentStats},
    submissions::{
        entities::{Submission, SubmissionContent},
        requests::{GradeRecord, NewSubmission},
    },
};
use crate::storage::Storage;

/// 选择内存存储的数据库 URL
pub const MEMORY_URL: &str = "memory";

#[derive(Default)]
struct SubmissionTable {
    next_id: i64,
    rows: BTreeMap<i64, Submission>,
    by_pair: HashMap<(i64, i64), i64>,
    stats: HashMap<i64, AssignmentStats>,
}

impl SubmissionTable {
    fn stats_mut(&mut self, assignment_id: i64) -> &mut AssignmentStats {
        self.stats
            .entry(assignment_id)
            .or_insert_with(|| AssignmentStats {
                assignment_id,
                ..Default::default()
            })
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    assignments: DashMap<i64, Assignment>,
    table: Mutex<SubmissionTable>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入作业（作业由外部服务维护）
    pub fn seed_assignment(&self, assignment: Assignment) {
        debug!("Seeding assignment {}", assignment.id);
        self.assignments.insert(assignment.id, assignment);
    }

    fn table(&self) -> Result<MutexGuard<'_, SubmissionTable>> {
        self.table
            .lock()
            .map_err(|e| HWSystemError::database_operation(format!("内存存储锁已损坏: {e}")))
    }
}

fn not_found(submission_id: i64) -> HWSystemError {
    HWSystemError::submission_not_found(format!("submission {submission_id} does not exist"))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        Ok(self
            .assignments
            .get(&assignment_id)
            .map(|entry| entry.value().clone()))
    }

    async fn get_assignment_stats(&self, assignment_id: i64) -> Result<AssignmentStats> {
        let table = self.table()?;
        Ok(table
            .stats
            .get(&assignment_id)
            .copied()
            .unwrap_or(AssignmentStats {
                assignment_id,
                ..Default::default()
            }))
    }

    async fn insert_submission(&self, submission: NewSubmission) -> Result<Option<Submission>> {
        let mut table = self.table()?;
        let pair = (submission.assignment_id, submission.student_id);
        if table.by_pair.contains_key(&pair) {
            return Ok(None);
        }

        table.next_id += 1;
        let row = Submission {
            id: table.next_id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            content: submission.content,
            is_late: submission.is_late,
            submitted_at: submission.submitted_at,
            updated_at: submission.submitted_at,
            grade: None,
            feedback: None,
            graded_at: None,
        };

        table.by_pair.insert(pair, row.id);
        table.rows.insert(row.id, row.clone());
        table.stats_mut(row.assignment_id).pending += 1;

        Ok(Some(row))
    }

    async fn update_submission_content(
        &self,
        submission_id: i64,
        content: &SubmissionContent,
    ) -> Result<Submission> {
        let mut table = self.table()?;
        let row = table
            .rows
            .get_mut(&submission_id)
            .ok_or_else(|| not_found(submission_id))?;

        if !row.is_editable() {
            warn!("Rejected edit of graded submission {}", submission_id);
            return Err(HWSystemError::submission_locked(format!(
                "submission {submission_id} has already been graded"
            )));
        }

        row.content = content.clone();
        row.updated_at = chrono::Utc::now();
        Ok(row.clone())
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        Ok(self.table()?.rows.get(&submission_id).cloned())
    }

    async fn get_submission_by_pair(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let table = self.table()?;
        Ok(table
            .by_pair
            .get(&(assignment_id, student_id))
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn list_submissions_by_assignment(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let table = self.table()?;
        let mut items: Vec<Submission> = table
            .rows
            .values()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect();
        items.sort_by_key(|s| (s.submitted_at, s.id));
        Ok(items)
    }

    async fn apply_grade(&self, submission_id: i64, grade: GradeRecord) -> Result<Submission> {
        let mut table = self.table()?;
        let row = table
            .rows
            .get_mut(&submission_id)
            .ok_or_else(|| not_found(submission_id))?;

        let first_grade = row.grade.is_none();
        row.grade = Some(grade.grade);
        row.feedback = grade.feedback;
        row.graded_at = Some(grade.graded_at);
        let updated = row.clone();

        if first_grade {
            let stats = table.stats_mut(updated.assignment_id);
            stats.pending -= 1;
            stats.graded += 1;
        }

        info!(
            "Submission {} graded {} (regrade: {})",
            submission_id, grade.grade, !first_grade
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_submission(student_id: i64) -> NewSubmission {
        NewSubmission {
            assignment_id: 1,
            student_id,
            content: SubmissionContent::Text("42".into()),
            is_late: false,
            submitted_at: Utc::now(),
        }
    }

    fn grade(value: i32) -> GradeRecord {
        GradeRecord {
            grade: value,
            feedback: None,
            graded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_counters_move_once_per_submission() {
        let storage = MemoryStorage::new();
        let a = storage.insert_submission(new_submission(1)).await.unwrap().unwrap();
        storage.insert_submission(new_submission(2)).await.unwrap();
        assert!(storage.insert_submission(new_submission(1)).await.unwrap().is_none());

        storage.apply_grade(a.id, grade(80)).await.unwrap();
        storage.apply_grade(a.id, grade(90)).await.unwrap();

        let stats = storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (1, 1));
        assert_eq!(
            storage.get_submission_by_id(a.id).await.unwrap().unwrap().grade,
            Some(90)
        );
    }

    #[tokio::test]
    async fn test_graded_row_rejects_content_update() {
        let storage = MemoryStorage::new();
        let a = storage.insert_submission(new_submission(1)).await.unwrap().unwrap();
        storage.apply_grade(a.id, grade(70)).await.unwrap();

        let err = storage
            .update_submission_content(a.id, &SubmissionContent::Text("new".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::SubmissionLocked(_)));
        assert_eq!(
            storage.get_submission_by_pair(1, 1).await.unwrap().unwrap().content,
            SubmissionContent::Text("42".into())
        );
    }
}
