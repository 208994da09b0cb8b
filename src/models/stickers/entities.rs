use serde::Serialize;

/// 贴纸分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerCategory {
    Praise,
    Encouragement,
    Improvement,
}

/// 预置贴纸，不可由用户扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sticker {
    pub id: &'static str,
    pub glyph: &'static str,
    pub label: &'static str,
    pub category: StickerCategory,
}

impl Sticker {
    /// 评语中的渲染形式："{glyph} {label}"
    pub fn render(&self) -> String {
        format!("{} {}", self.glyph, self.label)
    }
}
