//! Length-prefixed frame reading and writing.
//!
//! The prefix is an unsigned 32-bit length in host byte order, as the native
//! messaging protocol requires. Exactly one frame is read and one written per
//! process, so neither direction buffers across calls.

use std::io::{ErrorKind, Read, Write};

use crate::error::FramingError;
use crate::message::{Request, Response};

/// Size of the length prefix in bytes.
pub const PREFIX_LEN: usize = 4;

/// Reads one request frame and decodes its payload.
///
/// Returns `Ok(None)` when the input is already at end of stream: the parent
/// had nothing to send, which is not an error.
///
/// # Errors
///
/// Returns [`FramingError::Truncated`] when the prefix or payload ends early,
/// [`FramingError::TooLarge`] when the announced length exceeds `max_len`
/// (the payload is not read), and [`FramingError::Parse`] when the payload is
/// not a UTF-8 JSON request.
pub fn read_frame(input: &mut impl Read, max_len: u32) -> Result<Option<Request>, FramingError> {
    let mut prefix = [0_u8; PREFIX_LEN];
    let received = read_fully(input, &mut prefix)?;
    if received == 0 {
        return Ok(None);
    }
    if received < PREFIX_LEN {
        return Err(FramingError::Truncated {
            expected: PREFIX_LEN,
            received,
        });
    }

    let announced = decode_prefix(prefix);
    if announced > max_len {
        return Err(FramingError::TooLarge {
            size: u64::from(announced),
            limit: u64::from(max_len),
        });
    }

    let expected = usize::try_from(announced).map_err(|_| FramingError::TooLarge {
        size: u64::from(announced),
        limit: u64::from(max_len),
    })?;
    let mut payload = vec![0_u8; expected];
    let received = read_fully(input, &mut payload)?;
    if received < expected {
        return Err(FramingError::Truncated { expected, received });
    }

    let text = String::from_utf8(payload)
        .map_err(|error| FramingError::parse(format!("payload is not UTF-8: {error}")))?;
    Request::parse(&text).map(Some)
}

/// Encodes a response as prefix plus JSON bytes.
///
/// # Errors
///
/// Returns [`FramingError::Serialize`] when serialisation fails and
/// [`FramingError::TooLarge`] when the payload does not fit a 32-bit prefix.
pub fn encode_frame(response: &Response) -> Result<Vec<u8>, FramingError> {
    let payload = serde_json::to_vec(response)
        .map_err(|error| FramingError::Serialize(std::sync::Arc::new(error)))?;
    let length = u32::try_from(payload.len()).map_err(|_| FramingError::TooLarge {
        size: u64::try_from(payload.len()).unwrap_or(u64::MAX),
        limit: u64::from(u32::MAX),
    })?;

    let mut frame = Vec::with_capacity(PREFIX_LEN + payload.len());
    frame.extend_from_slice(&encode_prefix(length));
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Writes one response frame and flushes the output.
///
/// # Errors
///
/// Returns an error when encoding, writing, or flushing fails.
pub fn write_frame(output: &mut impl Write, response: &Response) -> Result<(), FramingError> {
    let frame = encode_frame(response)?;
    output.write_all(&frame).map_err(FramingError::write)?;
    output.flush().map_err(FramingError::write)
}

#[expect(
    clippy::host_endian_bytes,
    reason = "native messaging prefixes use host byte order"
)]
const fn decode_prefix(prefix: [u8; PREFIX_LEN]) -> u32 {
    u32::from_ne_bytes(prefix)
}

#[expect(
    clippy::host_endian_bytes,
    reason = "native messaging prefixes use host byte order"
)]
const fn encode_prefix(length: u32) -> [u8; PREFIX_LEN] {
    length.to_ne_bytes()
}

/// Fills `buffer` until it is full or the stream ends, returning the number
/// of bytes read.
fn read_fully(input: &mut impl Read, buffer: &mut [u8]) -> Result<usize, FramingError> {
    let mut filled = 0;
    while let Some(remaining) = buffer.get_mut(filled..) {
        if remaining.is_empty() {
            break;
        }
        match input.read(remaining) {
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(FramingError::read(error)),
        }
    }
    Ok(filled)
}
