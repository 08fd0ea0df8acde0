//! Wire protocol for the keybridge native messaging host.
//!
//! A browser extension talks to the host over stdio using native messaging
//! frames: a 4-byte length prefix in host byte order followed by that many
//! bytes of UTF-8 JSON. The host reads exactly one [`Request`] frame, writes
//! exactly one [`Response`] frame, and exits.
//!
//! ```text
//! request:  {"action": "listKeys", "args": [false], "kwargs": {"sigs": true}}
//! response: {"type": "success", "data": [ ...key records... ]}
//! ```

mod error;
mod frame;
mod message;

pub use self::error::FramingError;
pub use self::frame::{PREFIX_LEN, encode_frame, read_frame, write_frame};
pub use self::message::{Request, Response, ResponseStatus};
