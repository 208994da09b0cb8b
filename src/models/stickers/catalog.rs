//! 贴纸目录
//!
//! 字形均为单个码点，不带变体选择符或零宽连接符，
//! 这样渲染后的贴纸段能被评语解析器识别。

use super::entities::{Sticker, StickerCategory};

pub static STICKERS: &[Sticker] = &[
    Sticker {
        id: "star",
        glyph: "⭐",
        label: "Excellent Work",
        category: StickerCategory::Praise,
    },
    Sticker {
        id: "trophy",
        glyph: "🏆",
        label: "Outstanding",
        category: StickerCategory::Praise,
    },
    Sticker {
        id: "hundred",
        glyph: "💯",
        label: "Perfect Score",
        category: StickerCategory::Praise,
    },
    Sticker {
        id: "party",
        glyph: "🎉",
        label: "Well Done",
        category: StickerCategory::Praise,
    },
    Sticker {
        id: "thumbs_up",
        glyph: "👍",
        label: "Good Job",
        category: StickerCategory::Encouragement,
    },
    Sticker {
        id: "rocket",
        glyph: "🚀",
        label: "Great Progress",
        category: StickerCategory::Encouragement,
    },
    Sticker {
        id: "muscle",
        glyph: "💪",
        label: "Keep It Up",
        category: StickerCategory::Encouragement,
    },
    Sticker {
        id: "bulb",
        glyph: "💡",
        label: "Creative Thinking",
        category: StickerCategory::Encouragement,
    },
    Sticker {
        id: "pencil",
        glyph: "📝",
        label: "Check Your Spelling",
        category: StickerCategory::Improvement,
    },
    Sticker {
        id: "magnifier",
        glyph: "🔍",
        label: "Show Your Work",
        category: StickerCategory::Improvement,
    },
    Sticker {
        id: "clock",
        glyph: "⏰",
        label: "Submit On Time",
        category: StickerCategory::Improvement,
    },
    Sticker {
        id: "books",
        glyph: "📚",
        label: "Review The Lesson",
        category: StickerCategory::Improvement,
    },
];

/// 列出全部贴纸
pub fn all() -> &'static [Sticker] {
    STICKERS
}

/// 按 ID 查找贴纸
pub fn find_by_id(id: &str) -> Option<&'static Sticker> {
    STICKERS.iter().find(|s| s.id == id)
}

/// 按渲染后的字形和标签反查贴纸
pub fn find_by_rendering(glyph: &str, label: &str) -> Option<&'static Sticker> {
    STICKERS
        .iter()
        .find(|s| s.glyph == glyph && s.label == label)
}
