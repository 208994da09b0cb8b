use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 作业（由作业服务维护，本系统只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 作业标题
    pub title: String,
    // 截止时间
    pub due_at: Option<DateTime<Utc>>,
    // 参考资料
    pub reference_material: Option<String>,
    // 创建时间
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// 给定时刻提交是否算迟交
    pub fn is_late_at(&self, at: DateTime<Utc>) -> bool {
        self.due_at.is_some_and(|due| at > due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_late_at() {
        let now = Utc::now();
        let mut assignment = Assignment {
            id: 1,
            title: "A1".to_string(),
            due_at: None,
            reference_material: None,
            created_at: now,
        };
        assert!(!assignment.is_late_at(now));

        assignment.due_at = Some(now);
        assert!(!assignment.is_late_at(now));
        assert!(assignment.is_late_at(now + Duration::seconds(1)));
    }
}
