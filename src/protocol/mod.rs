//! Wire protocol: length-prefixed binary frames for search requests and responses.

pub mod codec;
pub mod frame;

pub use codec::{decode_request, decode_response, declared_len, encode_request, encode_response};
pub use frame::{read_frame, write_frame};
