use crate::config::AppConfig;
use crate::errors::HWSystemError;
use crate::services::GradingPolicy;
use crate::services::attachments::AttachmentPolicy;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub attachment_policy: AttachmentPolicy,
    pub grading_policy: GradingPolicy,
}

/// 准备服务器启动的上下文
/// 包括存储后端和提交/批改策略
pub async fn prepare_server_startup() -> crate::errors::Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let attachment_policy = AttachmentPolicy::from(&config.attachments);
    let grading_policy = GradingPolicy::from(&config.grading);
    debug!(
        "Attachment policy: max_size={} bytes, verify_signature={}; grading policy: require_feedback={}",
        attachment_policy.max_size,
        attachment_policy.verify_signature,
        grading_policy.require_feedback
    );

    Ok(StartupContext {
        storage,
        attachment_policy,
        grading_policy,
    })
}

/// 启动失败时输出的错误文本，开发构建带颜色
pub fn startup_error_message(err: &HWSystemError) -> String {
    #[cfg(debug_assertions)]
    {
        err.format_colored()
    }
    #[cfg(not(debug_assertions))]
    {
        err.format_simple()
    }
}
