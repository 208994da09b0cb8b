use super::SEGMENT_SEPARATOR;
use crate::errors::{HWSystemError, Result};
use crate::models::stickers::entities::Sticker;

/// 合并自由评语与贴纸
///
/// - 无贴纸：原样返回评语
/// - 有贴纸：每个贴纸渲染为 "{glyph} {label}"，以空行连接；有评语时评语在前
/// - 两者都为空：`EmptyFeedback`
pub fn compose(free_text: Option<&str>, stickers: &[Sticker]) -> Result<String> {
    // 仅用去空白后的结果判断是否为空，输出保留原文
    let text = free_text.filter(|t| !t.trim().is_empty());

    if stickers.is_empty() {
        return text.map(str::to_string).ok_or_else(|| {
            HWSystemError::empty_feedback("feedback needs free text or at least one sticker")
        });
    }

    let rendered = stickers
        .iter()
        .map(Sticker::render)
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR);

    Ok(match text {
        Some(text) => format!("{text}{SEGMENT_SEPARATOR}{rendered}"),
        None => rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stickers::catalog::find_by_id;

    #[test]
    fn test_text_and_sticker() {
        let star = *find_by_id("star").unwrap();
        assert_eq!(
            compose(Some("Nice work"), &[star]).unwrap(),
            "Nice work\n\n⭐ Excellent Work"
        );
    }

    #[test]
    fn test_text_only_is_verbatim() {
        assert_eq!(
            compose(Some("Line one\nline two"), &[]).unwrap(),
            "Line one\nline two"
        );
    }

    #[test]
    fn test_text_keeps_surrounding_whitespace() {
        let text = "  Indented answer:\n  - step one  ";
        assert_eq!(compose(Some(text), &[]).unwrap(), text);

        let star = *find_by_id("star").unwrap();
        assert_eq!(
            compose(Some(text), &[star]).unwrap(),
            format!("{text}\n\n⭐ Excellent Work")
        );
    }

    #[test]
    fn test_stickers_only() {
        let stickers = [*find_by_id("thumbs_up").unwrap(), *find_by_id("books").unwrap()];
        assert_eq!(
            compose(None, &stickers).unwrap(),
            "👍 Good Job\n\n📚 Review The Lesson"
        );
        assert_eq!(
            compose(Some("   "), &stickers).unwrap(),
            "👍 Good Job\n\n📚 Review The Lesson"
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(matches!(
            compose(None, &[]),
            Err(HWSystemError::EmptyFeedback(_))
        ));
        assert!(matches!(
            compose(Some(""), &[]),
            Err(HWSystemError::EmptyFeedback(_))
        ));
    }
}
