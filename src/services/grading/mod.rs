//! 批改流程
//!
//! 校验分数、组合评语，然后由存储层一次性写入分数、评语与统计。
//! 已评分的提交可以重新评分，覆盖之前的分数和评语。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::GradingConfig;
use crate::errors::{HWSystemError, Result};
use crate::models::feedback::entities::FeedbackSegment;
use crate::models::stickers::{catalog, entities::Sticker};
use crate::models::submissions::{entities::Submission, requests::GradeRecord};
use crate::services::feedback;
use crate::storage::Storage;

pub const MIN_GRADE: i64 = 1;
pub const MAX_GRADE: i64 = 100;

/// 批改策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingPolicy {
    pub require_feedback: bool,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            require_feedback: true,
        }
    }
}

impl From<&GradingConfig> for GradingPolicy {
    fn from(config: &GradingConfig) -> Self {
        Self {
            require_feedback: config.require_feedback,
        }
    }
}

/// 校验分数范围 [1, 100]
pub fn validate_grade(value: i64) -> Result<i32> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&value) {
        return Err(HWSystemError::invalid_grade(format!(
            "grade {value} is outside {MIN_GRADE}..={MAX_GRADE}"
        )));
    }
    // 范围已校验，转换不会失败
    i32::try_from(value).map_err(|_| HWSystemError::invalid_grade(format!("grade {value} overflows")))
}

/// 按 ID 解析贴纸，保持顺序
pub fn resolve_stickers<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Sticker>> {
    ids.iter()
        .map(|id| {
            let id = id.as_ref();
            catalog::find_by_id(id)
                .copied()
                .ok_or_else(|| HWSystemError::unknown_sticker(format!("sticker '{id}' is not in the catalog")))
        })
        .collect()
}

pub struct GradingWorkflow {
    storage: Arc<dyn Storage>,
    policy: GradingPolicy,
}

impl GradingWorkflow {
    pub fn new(storage: Arc<dyn Storage>, policy: GradingPolicy) -> Self {
        Self { storage, policy }
    }

    /// 评分
    pub async fn grade(
        &self,
        submission_id: i64,
        grade_value: i64,
        free_text: Option<&str>,
        stickers: &[Sticker],
    ) -> Result<Submission> {
        let grade = validate_grade(grade_value)?;

        let feedback = match feedback::compose(free_text, stickers) {
            Ok(composed) => Some(composed),
            Err(HWSystemError::EmptyFeedback(_)) if !self.policy.require_feedback => None,
            Err(e) => return Err(e),
        };

        let submission = self
            .storage
            .apply_grade(
                submission_id,
                GradeRecord {
                    grade,
                    feedback,
                    graded_at: Utc::now(),
                },
            )
            .await
            .inspect_err(|e| warn!("Grading submission {} failed: {}", submission_id, e))?;

        info!(
            "Submission {} graded: grade={}, stickers={}",
            submission_id,
            grade,
            stickers.len()
        );
        Ok(submission)
    }

    /// 按贴纸 ID 评分
    pub async fn grade_with_sticker_ids<S: AsRef<str>>(
        &self,
        submission_id: i64,
        grade_value: i64,
        free_text: Option<&str>,
        sticker_ids: &[S],
    ) -> Result<Submission> {
        validate_grade(grade_value)?;
        let stickers = resolve_stickers(sticker_ids)?;
        self.grade(submission_id, grade_value, free_text, &stickers)
            .await
    }

    /// 读取提交评语并拆分为段落
    pub async fn feedback_segments(
        &self,
        submission_id: i64,
    ) -> Result<(Submission, Vec<FeedbackSegment>)> {
        let submission = self
            .storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| {
                HWSystemError::submission_not_found(format!(
                    "submission {submission_id} does not exist"
                ))
            })?;
        let segments = submission
            .feedback
            .as_deref()
            .map(feedback::parse)
            .unwrap_or_default();
        Ok((submission, segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Assignment;
    use crate::models::submissions::entities::{SubmissionContent, SubmissionStatus};
    use crate::services::SubmissionLifecycle;
    use crate::services::attachments::AttachmentPolicy;
    use crate::storage::memory_storage::MemoryStorage;

    struct Fixture {
        storage: Arc<MemoryStorage>,
        lifecycle: SubmissionLifecycle,
        grading: GradingWorkflow,
    }

    fn fixture(policy: GradingPolicy) -> Fixture {
        let storage = Arc::new(MemoryStorage::new());
        storage.seed_assignment(Assignment {
            id: 1,
            title: "A1".to_string(),
            due_at: None,
            reference_material: None,
            created_at: Utc::now(),
        });
        Fixture {
            lifecycle: SubmissionLifecycle::new(storage.clone(), AttachmentPolicy::default()),
            grading: GradingWorkflow::new(storage.clone(), policy),
            storage,
        }
    }

    async fn submit(fixture: &Fixture, student_id: i64) -> Submission {
        fixture
            .lifecycle
            .create_or_edit(1, student_id, SubmissionContent::Text("42".into()))
            .await
            .unwrap()
    }

    #[test]
    fn test_grade_bounds() {
        assert!(matches!(validate_grade(0), Err(HWSystemError::InvalidGrade(_))));
        assert!(matches!(validate_grade(101), Err(HWSystemError::InvalidGrade(_))));
        assert!(matches!(validate_grade(-5), Err(HWSystemError::InvalidGrade(_))));
        assert_eq!(validate_grade(1).unwrap(), 1);
        assert_eq!(validate_grade(100).unwrap(), 100);
    }

    #[test]
    fn test_resolve_stickers() {
        let stickers = resolve_stickers(&["star", "rocket"]).unwrap();
        assert_eq!(stickers[0].id, "star");
        assert_eq!(stickers[1].id, "rocket");
        assert!(matches!(
            resolve_stickers(&["star", "dragon"]),
            Err(HWSystemError::UnknownSticker(_))
        ));
    }

    #[tokio::test]
    async fn test_text_grade_lock_scenario() {
        let fixture = fixture(GradingPolicy::default());
        let submission = submit(&fixture, 7).await;
        assert_eq!(submission.status(), SubmissionStatus::Submitted);

        let graded = fixture
            .grading
            .grade_with_sticker_ids(submission.id, 95, Some("Nice work"), &["star"])
            .await
            .unwrap();
        assert_eq!(graded.status(), SubmissionStatus::Graded);
        assert_eq!(graded.grade, Some(95));
        assert_eq!(graded.feedback.as_deref(), Some("Nice work\n\n⭐ Excellent Work"));

        let err = fixture
            .lifecycle
            .edit(submission.id, SubmissionContent::Text("43".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::SubmissionLocked(_)));

        let stats = fixture.storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (0, 1));
    }

    #[tokio::test]
    async fn test_boundary_grades_apply() {
        let fixture = fixture(GradingPolicy::default());
        let low = submit(&fixture, 1).await;
        let high = submit(&fixture, 2).await;

        for (submission, value) in [(&low, 0), (&high, 101)] {
            let err = fixture
                .grading
                .grade(submission.id, value, Some("x"), &[])
                .await
                .unwrap_err();
            assert!(matches!(err, HWSystemError::InvalidGrade(_)));
        }
        // 校验失败不会写入
        assert_eq!(
            fixture.storage.get_assignment_stats(1).await.unwrap().graded,
            0
        );

        assert_eq!(
            fixture.grading.grade(low.id, 1, Some("x"), &[]).await.unwrap().grade,
            Some(1)
        );
        assert_eq!(
            fixture.grading.grade(high.id, 100, Some("x"), &[]).await.unwrap().grade,
            Some(100)
        );
    }

    #[tokio::test]
    async fn test_regrade_overwrites() {
        let fixture = fixture(GradingPolicy::default());
        let submission = submit(&fixture, 7).await;

        fixture
            .grading
            .grade(submission.id, 50, Some("First pass"), &[])
            .await
            .unwrap();
        let regraded = fixture
            .grading
            .grade_with_sticker_ids(submission.id, 80, None, &["thumbs_up"])
            .await
            .unwrap();
        assert_eq!(regraded.grade, Some(80));
        assert_eq!(regraded.feedback.as_deref(), Some("👍 Good Job"));

        let stats = fixture.storage.get_assignment_stats(1).await.unwrap();
        assert_eq!((stats.pending, stats.graded), (0, 1));
    }

    #[tokio::test]
    async fn test_feedback_requirement() {
        let strict = fixture(GradingPolicy::default());
        let submission = submit(&strict, 7).await;
        let err = strict
            .grading
            .grade(submission.id, 70, None, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::EmptyFeedback(_)));

        let lenient = fixture(GradingPolicy {
            require_feedback: false,
        });
        let submission = submit(&lenient, 7).await;
        let graded = lenient
            .grading
            .grade(submission.id, 70, Some("  "), &[])
            .await
            .unwrap();
        assert_eq!(graded.feedback, None);
        assert_eq!(graded.status(), SubmissionStatus::Graded);
    }

    #[tokio::test]
    async fn test_missing_submission() {
        let fixture = fixture(GradingPolicy::default());
        let err = fixture
            .grading
            .grade(404, 70, Some("x"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, HWSystemError::SubmissionNotFound(_)));
    }

    #[tokio::test]
    async fn test_feedback_segments() {
        let fixture = fixture(GradingPolicy::default());
        let submission = submit(&fixture, 7).await;
        fixture
            .grading
            .grade_with_sticker_ids(submission.id, 88, Some("Good job"), &["star", "bulb"])
            .await
            .unwrap();

        let (_, segments) = fixture.grading.feedback_segments(submission.id).await.unwrap();
        assert_eq!(segments.len(), 3);
        assert!(!segments[0].is_sticker());
        assert!(segments[1].is_sticker() && segments[2].is_sticker());
    }
}
