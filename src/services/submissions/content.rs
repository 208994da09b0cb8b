//! 提交内容草稿
//!
//! 四种内容是互斥的备选项：设置任意一种都会替换当前内容，最后一次操作生效。

use crate::errors::{HWSystemError, Result};
use crate::models::submissions::{
    entities::{Attachment, ContentMode, SubmissionContent},
    requests::{AttachmentRequest, SubmitContentRequest},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    content: Option<SubmissionContent>,
}

impl SubmissionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前模式
    pub fn mode(&self) -> Option<ContentMode> {
        self.content.as_ref().map(SubmissionContent::mode)
    }

    pub fn content(&self) -> Option<&SubmissionContent> {
        self.content.as_ref()
    }

    /// 设置文本；空文本只会清掉已有的文本，不影响其他模式
    pub fn set_text(&mut self, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if value.trim().is_empty() {
            self.clear(ContentMode::Text);
        } else {
            self.content = Some(SubmissionContent::Text(value));
        }
        self
    }

    pub fn set_voice(&mut self, attachment: Attachment) -> &mut Self {
        self.content = Some(SubmissionContent::Voice(attachment));
        self
    }

    pub fn set_photo(&mut self, attachment: Attachment) -> &mut Self {
        self.content = Some(SubmissionContent::Photo(attachment));
        self
    }

    pub fn set_document(&mut self, attachment: Attachment) -> &mut Self {
        self.content = Some(SubmissionContent::Document(attachment));
        self
    }

    /// 只清除指定模式的内容
    pub fn clear(&mut self, mode: ContentMode) -> &mut Self {
        if self.mode() == Some(mode) {
            self.content = None;
        }
        self
    }

    /// 完成草稿，内容为空时返回 `EmptySubmission`
    pub fn finalize(self) -> Result<SubmissionContent> {
        let content = self.content.ok_or_else(|| {
            HWSystemError::empty_submission("a submission needs text, voice, photo or document")
        })?;
        validate_content(&content)?;
        Ok(content)
    }

    /// 由请求体构造草稿，请求中只能出现一种内容
    pub fn from_request(request: SubmitContentRequest) -> Result<Self> {
        let SubmitContentRequest {
            text,
            voice,
            photo,
            document,
        } = request;

        let text = text.filter(|t| !t.trim().is_empty());
        let provided = usize::from(text.is_some())
            + usize::from(voice.is_some())
            + usize::from(photo.is_some())
            + usize::from(document.is_some());
        if provided > 1 {
            return Err(HWSystemError::validation(
                "only one of text, voice, photo or document may be submitted",
            ));
        }

        let mut draft = Self::new();
        if let Some(text) = text {
            draft.set_text(text);
        }
        if let Some(voice) = voice {
            draft.set_voice(attachment_from_request(voice)?);
        }
        if let Some(photo) = photo {
            draft.set_photo(attachment_from_request(photo)?);
        }
        if let Some(document) = document {
            draft.set_document(attachment_from_request(document)?);
        }
        Ok(draft)
    }
}

fn attachment_from_request(request: AttachmentRequest) -> Result<Attachment> {
    Ok(Attachment {
        mime_kind: request.kind.parse()?,
        encoded_payload: request.payload,
    })
}

/// 校验内容本身：文本非空，附件类型与模式一致
pub fn validate_content(content: &SubmissionContent) -> Result<()> {
    match content {
        SubmissionContent::Text(text) if text.trim().is_empty() => Err(
            HWSystemError::empty_submission("submission text is empty"),
        ),
        SubmissionContent::Text(_) => Ok(()),
        _ => {
            let mode = content.mode();
            match (content.attachment(), mode.required_kind()) {
                (Some(attachment), Some(required)) if attachment.mime_kind != required => {
                    Err(HWSystemError::unsupported_attachment_kind(format!(
                        "{mode} submissions need a {required} attachment, got {}",
                        attachment.mime_kind
                    )))
                }
                (Some(attachment), _) if attachment.encoded_payload.trim().is_empty() => Err(
                    HWSystemError::empty_submission(format!("{mode} attachment is empty")),
                ),
                _ => Ok(()),
            }
        }
    }
}
