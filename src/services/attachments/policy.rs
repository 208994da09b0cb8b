use tracing::debug;

use super::codec;
use crate::config::AttachmentConfig;
use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::Attachment;
use crate::utils::validate_magic_bytes;

/// 附件策略：大小上限与可选的文件头校验
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentPolicy {
    pub max_size: usize,
    pub verify_signature: bool,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_size: 20 * 1024 * 1024,
            verify_signature: false,
        }
    }
}

impl From<&AttachmentConfig> for AttachmentPolicy {
    fn from(config: &AttachmentConfig) -> Self {
        Self {
            max_size: config.max_size,
            verify_signature: config.verify_signature,
        }
    }
}

impl AttachmentPolicy {
    /// 解码并校验附件，返回解码后的字节数
    pub fn check(&self, attachment: &Attachment) -> Result<usize> {
        let bytes = codec::decode(attachment)?;

        if bytes.is_empty() {
            return Err(HWSystemError::empty_submission(format!(
                "{} attachment is empty",
                attachment.mime_kind
            )));
        }

        if bytes.len() > self.max_size {
            return Err(HWSystemError::attachment_too_large(format!(
                "attachment is {} bytes, limit is {} bytes",
                bytes.len(),
                self.max_size
            )));
        }

        if self.verify_signature && !validate_magic_bytes(&bytes, attachment.mime_kind) {
            return Err(HWSystemError::unsupported_attachment_kind(format!(
                "payload is not a recognised {} format",
                attachment.mime_kind
            )));
        }

        debug!(
            "Attachment accepted: kind={}, size={}",
            attachment.mime_kind,
            bytes.len()
        );
        Ok(bytes.len())
    }
}
