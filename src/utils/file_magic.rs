use crate::models::submissions::entities::MimeKind;

/// 验证附件内容的魔术字节是否与声明的附件类型匹配
///
/// # Arguments
/// * `data` - 解码后的附件内容
/// * `kind` - 声明的附件类型
///
/// # Returns
/// * `true` - 识别出该类型的已知格式
/// * `false` - 内容为空或不是该类型的已知格式
pub fn validate_magic_bytes(data: &[u8], kind: MimeKind) -> bool {
    if data.is_empty() {
        return false;
    }

    match kind {
        MimeKind::Audio => is_audio(data),
        MimeKind::Image => is_image(data),
        MimeKind::Document => is_document(data),
    }
}

fn is_audio(data: &[u8]) -> bool {
    // MP3：ID3 标签或 MPEG 帧同步
    data.starts_with(b"ID3")
        || (data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0)
        // WAV
        || (data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE")
        || data.starts_with(b"OggS")
        || data.starts_with(b"fLaC")
        || data.starts_with(b"#!AMR")
        // WEBM / MKA (EBML)
        || data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3])
        // M4A / AAC (ISO BMFF)
        || (data.len() >= 8 && &data[4..8] == b"ftyp")
}

fn is_image(data: &[u8]) -> bool {
    data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
        || data.starts_with(&[0xFF, 0xD8, 0xFF])
        || data.starts_with(b"GIF87a")
        || data.starts_with(b"GIF89a")
        || (data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP")
        || data.starts_with(b"BM")
        // HEIC（手机拍照常见）
        || (data.len() >= 12 && &data[4..8] == b"ftyp" && matches!(&data[8..12], b"heic" | b"heix" | b"mif1"))
}

fn is_document(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
        // MS Office 旧格式 (OLE Compound Document)
        || data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        // MS Office 新格式 (ZIP-based OOXML)
        || data.starts_with(&[0x50, 0x4B, 0x03, 0x04])
        || data.starts_with(b"{\\rtf")
        // 纯文本：合法 UTF-8 且不含 NUL
        || (std::str::from_utf8(data).is_ok() && !data.contains(&0))
}
