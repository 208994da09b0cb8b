//! 附件编解码与附件策略

pub mod codec;
pub mod policy;

pub use codec::{decode, decode_tagged, encode, encode_tagged};
pub use policy::AttachmentPolicy;
