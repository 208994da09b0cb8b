//! 附件编解码
//!
//! 二进制内容与标准 base64 文本互转，纯函数，无副作用。
//! 对任意字节序列 `b` 与任意类型 `k`，`decode(&encode(b, k)) == b`。

use base64::{Engine as _, engine::general_purpose};

use crate::errors::{HWSystemError, Result};
use crate::models::submissions::entities::{Attachment, MimeKind};

/// 编码为附件
pub fn encode(payload: &[u8], kind: MimeKind) -> Attachment {
    Attachment {
        encoded_payload: general_purpose::STANDARD.encode(payload),
        mime_kind: kind,
    }
}

/// 编码为附件，类型以字符串给出
pub fn encode_tagged(payload: &[u8], kind: &str) -> Result<Attachment> {
    Ok(encode(payload, kind.parse()?))
}

/// 解码附件内容
pub fn decode(attachment: &Attachment) -> Result<Vec<u8>> {
    decode_payload(&attachment.encoded_payload)
}

/// 解码附件内容，类型以字符串给出
pub fn decode_tagged(encoded: &str, kind: &str) -> Result<Vec<u8>> {
    let _: MimeKind = kind.parse()?;
    decode_payload(encoded)
}

fn decode_payload(encoded: &str) -> Result<Vec<u8>> {
    // 浏览器 FileReader 产生的 data URL 前缀
    let body = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| HWSystemError::invalid_attachment_payload(format!("payload is not valid base64: {e}")))
}
