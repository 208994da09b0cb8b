//! 评语组合与解析
//!
//! 教师的自由评语与贴纸合并为一个持久化字符串，段落之间以空行分隔。
//! 解析方向是启发式的：以符号开头、空白后接文字的段落被视为贴纸。

pub mod compose;
pub mod parse;

pub use compose::compose;
pub use parse::parse;

/// 段落分隔符
pub const SEGMENT_SEPARATOR: &str = "\n\n";
