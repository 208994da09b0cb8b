use serde::Serialize;

use crate::models::stickers::entities::Sticker;

/// 评语分段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackSegment {
    FreeText {
        text: String,
    },
    /// 形如 "{glyph} {label}" 的段落；能对应到目录时带上贴纸 ID
    Sticker {
        glyph: String,
        label: String,
        sticker_id: Option<&'static str>,
    },
}

impl FeedbackSegment {
    pub fn is_sticker(&self) -> bool {
        matches!(self, FeedbackSegment::Sticker { .. })
    }

    pub fn from_sticker(sticker: &'static Sticker) -> Self {
        FeedbackSegment::Sticker {
            glyph: sticker.glyph.to_string(),
            label: sticker.label.to_string(),
            sticker_id: Some(sticker.id),
        }
    }
}
