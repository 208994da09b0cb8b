use once_cell::sync::Lazy;
use regex::Regex;

use super::SEGMENT_SEPARATOR;
use crate::models::feedback::entities::FeedbackSegment;
use crate::models::stickers::catalog;

// 非单词非空白的前缀 + 空白 + 单词字符开头的标签
static STICKER_SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<glyph>[^\w\s]+)\s+(?P<label>\w.*)$").expect("Invalid sticker segment regex")
});

/// 将合并后的评语拆回段落
///
/// 以符号开头的普通段落也会被识别成贴纸，这是格式本身的局限。
/// 同理，自由评语内部的空行也是段落分隔符，含空行的评语会拆成多个自由文本段。
pub fn parse(composed: &str) -> Vec<FeedbackSegment> {
    let normalized = composed.replace("\r\n", "\n");

    normalized
        .split(SEGMENT_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(classify)
        .collect()
}

fn classify(segment: &str) -> FeedbackSegment {
    match STICKER_SEGMENT_RE.captures(segment) {
        Some(caps) => {
            let glyph = caps["glyph"].to_string();
            let label = caps["label"].trim_end().to_string();
            let sticker_id = catalog::find_by_rendering(&glyph, &label).map(|s| s.id);
            FeedbackSegment::Sticker {
                glyph,
                label,
                sticker_id,
            }
        }
        None => FeedbackSegment::FreeText {
            text: segment.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stickers::catalog::find_by_id;
    use crate::services::feedback::compose;

    #[test]
    fn test_round_trip_text_and_two_stickers() {
        let a = *find_by_id("star").unwrap();
        let b = *find_by_id("rocket").unwrap();
        let segments = parse(&compose(Some("Good job"), &[a, b]).unwrap());

        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[0],
            FeedbackSegment::FreeText {
                text: "Good job".to_string()
            }
        );
        assert_eq!(segments[1], FeedbackSegment::from_sticker(find_by_id("star").unwrap()));
        assert_eq!(
            segments[2],
            FeedbackSegment::from_sticker(find_by_id("rocket").unwrap())
        );
    }

    #[test]
    fn test_every_catalog_sticker_is_recognised() {
        for sticker in catalog::all() {
            let segments = parse(&sticker.render());
            assert_eq!(segments, vec![FeedbackSegment::from_sticker(sticker)]);
        }
    }

    #[test]
    fn test_multiline_free_text_stays_one_segment() {
        let segments = parse("First line\nsecond line");
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_sticker());
    }

    #[test]
    fn test_unknown_sticker_like_segment() {
        let segments = parse("Well done\n\n✔ Neat handwriting");
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1],
            FeedbackSegment::Sticker {
                glyph: "✔".to_string(),
                label: "Neat handwriting".to_string(),
                sticker_id: None,
            }
        );
    }

    #[test]
    fn test_leading_punctuation_misclassifies() {
        // 已知局限：以符号开头的普通文字会被当作贴纸
        let segments = parse("-- see attached notes");
        assert!(segments[0].is_sticker());
    }

    #[test]
    fn test_blank_line_in_free_text_splits() {
        // 已知局限：评语中的空行与分隔符无法区分
        let star = *find_by_id("star").unwrap();
        let segments = parse(&compose(Some("Para one\n\nPara two"), &[star]).unwrap());
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[1],
            FeedbackSegment::FreeText {
                text: "Para two".to_string()
            }
        );
        assert!(segments[2].is_sticker());
    }

    #[test]
    fn test_empty_and_crlf_input() {
        assert!(parse("").is_empty());
        let segments = parse("Nice work\r\n\r\n⭐ Excellent Work");
        assert_eq!(segments.len(), 2);
        assert!(segments[1].is_sticker());
    }
}
