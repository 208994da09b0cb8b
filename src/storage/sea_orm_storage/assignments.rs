//! 作业与统计存储操作

use super::SeaOrmStorage;
use crate::entity::assignment_stats::{
    ActiveModel as StatsActiveModel, Column as StatsColumn, Entity as AssignmentStatsEntity,
};
use crate::entity::assignments::{ActiveModel, Entity as Assignments};
use crate::errors::{HWSystemError, Result};
use crate::models::assignments::{entities::Assignment, responses::AssignmentStats};
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 写入作业（作业由外部服务维护，此处用于同步与初始化）
    pub async fn insert_assignment(&self, assignment: &Assignment) -> Result<Assignment> {
        let model = ActiveModel {
            id: Set(assignment.id),
            title: Set(assignment.title.clone()),
            due_at: Set(assignment.due_at.map(|dt| dt.timestamp())),
            reference_material: Set(assignment.reference_material.clone()),
            created_at: Set(assignment.created_at.timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("写入作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 获取作业统计
    pub async fn get_assignment_stats_impl(&self, assignment_id: i64) -> Result<AssignmentStats> {
        let result = AssignmentStatsEntity::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("查询作业统计失败: {e}")))?;

        Ok(result.map(|m| m.into_stats()).unwrap_or(AssignmentStats {
            assignment_id,
            ..Default::default()
        }))
    }
}

/// 在当前连接（通常是事务）内增减作业统计
///
/// 先保证统计行存在，再以 `col = col + delta` 原地更新；
/// 并发事务会在该行上排队，不会互相覆盖。
pub(super) async fn adjust_assignment_stats<C>(
    conn: &C,
    assignment_id: i64,
    pending_delta: i64,
    graded_delta: i64,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now().timestamp();

    let seed = StatsActiveModel {
        assignment_id: Set(assignment_id),
        pending_count: Set(0),
        graded_count: Set(0),
        updated_at: Set(now),
    };
    match AssignmentStatsEntity::insert(seed)
        .on_conflict(
            OnConflict::column(StatsColumn::AssignmentId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
    {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => {
            return Err(HWSystemError::database_operation(format!(
                "初始化作业统计失败: {e}"
            )));
        }
    }

    AssignmentStatsEntity::update_many()
        .col_expr(
            StatsColumn::PendingCount,
            Expr::col(StatsColumn::PendingCount).add(pending_delta),
        )
        .col_expr(
            StatsColumn::GradedCount,
            Expr::col(StatsColumn::GradedCount).add(graded_delta),
        )
        .col_expr(StatsColumn::UpdatedAt, Expr::value(now))
        .filter(StatsColumn::AssignmentId.eq(assignment_id))
        .exec(conn)
        .await
        .map_err(|e| HWSystemError::database_operation(format!("更新作业统计失败: {e}")))?;

    Ok(())
}
