use serde::{Deserialize, Serialize};

/// 作业提交统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub assignment_id: i64,
    // 已提交未批改
    pub pending: i64,
    // 已批改
    pub graded: i64,
}
