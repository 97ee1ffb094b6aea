pub mod error_code;
pub mod packet;

pub use error_code::ErrorCode;
pub use packet::{ItemEncoding, PacketShape, Quality, MAX_ITEM_SIZE, MAX_PACKET_LENGTH};
