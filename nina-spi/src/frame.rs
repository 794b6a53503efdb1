//! Command frame encoding and reply decoding.

use crate::error::{NinaError, Stage};
use bluepad32::{Block, Response, MAX_BLOCK_LEN, MAX_RESPONSE_BLOCKS};

/// Frame start byte, both directions.
pub const START_CMD: u8 = 0xE0;

/// Frame end byte, both directions.
pub const END_CMD: u8 = 0xEE;

/// Sent by the peer instead of [`START_CMD`] when it rejects a command.
pub const ERR_CMD: u8 = 0xEF;

/// Set on the command byte of a reply.
pub const REPLY_FLAG: u8 = 1 << 7;

/// Link-level firmware version query.
pub const GET_FW_VERSION_CMD: u8 = 0x37;

/// Largest command frame this crate sends.
pub const MAX_FRAME_LEN: usize = 64;

/// Encode a command frame into `buf`.
///
/// Returns the padded frame length (a multiple of 4).
///
/// # Example
///
/// ```
/// use nina_spi::encode_command;
///
/// let mut buf = [0u8; 64];
/// let len = encode_command(0x02, &[&[1], &[0x0F]], &mut buf).unwrap();
/// assert_eq!(&buf[..len], &[0xE0, 0x02, 2, 1, 1, 1, 0x0F, 0xEE]);
/// ```
pub fn encode_command(cmd: u8, params: &[&[u8]], buf: &mut [u8]) -> Result<usize, NinaError> {
    // header (3) + params + end (1)
    let payload: usize = params.iter().map(|p| 1 + p.len()).sum();
    let len = 3 + payload + 1;
    let padded = (len + 3) & !3;

    if padded > buf.len()
        || params.len() > usize::from(u8::MAX)
        || params.iter().any(|p| p.len() > usize::from(u8::MAX))
    {
        return Err(NinaError::FrameTooLong);
    }

    buf[0] = START_CMD;
    buf[1] = cmd & !REPLY_FLAG;
    buf[2] = params.len() as u8;
    let mut pos = 3;
    for param in params {
        buf[pos] = param.len() as u8;
        pos += 1;
        buf[pos..pos + param.len()].copy_from_slice(param);
        pos += param.len();
    }
    buf[pos] = END_CMD;
    buf[pos + 1..padded].fill(0);

    Ok(padded)
}

/// Decode the reply to `cmd`, pulling bytes from `read_byte`.
///
/// Up to `start_attempts` bytes are read looking for [`START_CMD`];
/// `backoff` runs between attempts. Everything after the start byte must
/// follow the reply layout exactly.
pub fn read_response(
    cmd: u8,
    start_attempts: u8,
    mut read_byte: impl FnMut() -> Result<u8, NinaError>,
    mut backoff: impl FnMut(),
) -> Result<Response, NinaError> {
    wait_start(start_attempts, &mut read_byte, &mut backoff)?;
    expect(&mut read_byte, cmd | REPLY_FLAG)?;

    let count = read_byte()?;
    if usize::from(count) > MAX_RESPONSE_BLOCKS {
        return Err(NinaError::TooManyBlocks(count));
    }

    let mut response = Response::new();
    for _ in 0..count {
        let len = read_byte()?;
        if usize::from(len) > MAX_BLOCK_LEN {
            return Err(NinaError::BlockTooLong(len));
        }

        let mut block = Block::new();
        for _ in 0..len {
            // Capacity checked above
            let _ = block.push(read_byte()?);
        }
        // Count checked above
        let _ = response.push(block);
    }

    expect(&mut read_byte, END_CMD)?;
    Ok(response)
}

fn wait_start(
    attempts: u8,
    read_byte: &mut impl FnMut() -> Result<u8, NinaError>,
    backoff: &mut impl FnMut(),
) -> Result<(), NinaError> {
    for _ in 0..attempts {
        match read_byte()? {
            START_CMD => return Ok(()),
            ERR_CMD => return Err(NinaError::ErrorReply),
            _ => backoff(),
        }
    }
    Err(NinaError::Timeout(Stage::StartByte))
}

fn expect(
    read_byte: &mut impl FnMut() -> Result<u8, NinaError>,
    expected: u8,
) -> Result<(), NinaError> {
    let got = read_byte()?;
    if got != expected {
        return Err(NinaError::UnexpectedByte { expected, got });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec;
    use std::vec::Vec;

    fn feed(bytes: &[u8]) -> impl FnMut() -> Result<u8, NinaError> + '_ {
        let mut iter = bytes.iter();
        move || iter.next().copied().ok_or(NinaError::Timeout(Stage::Ready))
    }

    #[test]
    fn test_encode_no_params() {
        let mut buf = [0xAAu8; MAX_FRAME_LEN];
        let len = encode_command(0x09, &[], &mut buf).unwrap();
        assert_eq!(&buf[..len], &[START_CMD, 0x09, 0, END_CMD]);
    }

    #[test]
    fn test_encode_pads_to_multiple_of_four() {
        let mut buf = [0xAAu8; MAX_FRAME_LEN];
        let len = encode_command(0x03, &[&[2], &[0xFF, 0x00, 0x80]], &mut buf).unwrap();
        assert_eq!(len, 12);
        assert_eq!(
            &buf[..len],
            &[START_CMD, 0x03, 2, 1, 2, 3, 0xFF, 0x00, 0x80, END_CMD, 0, 0]
        );
    }

    #[test]
    fn test_encode_clears_reply_flag() {
        let mut buf = [0u8; MAX_FRAME_LEN];
        encode_command(0x85, &[], &mut buf).unwrap();
        assert_eq!(buf[1], 0x05);
    }

    #[test]
    fn test_encode_rejects_oversized_frame() {
        let mut buf = [0u8; 8];
        assert_eq!(
            encode_command(0x02, &[&[0u8; 8]], &mut buf),
            Err(NinaError::FrameTooLong)
        );
    }

    #[test]
    fn test_read_response_skips_leading_junk() {
        let bytes = [0xFF, 0x00, START_CMD, 0x80, 1, 2, 1, 0, END_CMD];
        let mut backoffs = 0;
        let response = read_response(0x00, 10, feed(&bytes), || backoffs += 1).unwrap();

        assert_eq!(backoffs, 2);
        assert_eq!(response.len(), 1);
        assert_eq!(response[0].as_slice(), &[1, 0]);
    }

    #[test]
    fn test_read_response_multiple_blocks() {
        let bytes = [START_CMD, 0x89, 3, 1, 0xAA, 0, 2, 0xBB, 0xCC, END_CMD];
        let response = read_response(0x09, 10, feed(&bytes), || {}).unwrap();

        let blocks: Vec<&[u8]> = response.iter().map(|b| b.as_slice()).collect();
        assert_eq!(blocks, vec![&[0xAA][..], &[][..], &[0xBB, 0xCC][..]]);
    }

    #[test]
    fn test_read_response_error_reply() {
        let bytes = [0x00, ERR_CMD];
        assert_eq!(
            read_response(0x02, 10, feed(&bytes), || {}),
            Err(NinaError::ErrorReply)
        );
    }

    #[test]
    fn test_read_response_start_timeout() {
        let bytes = [0u8; 4];
        assert_eq!(
            read_response(0x02, 3, feed(&bytes), || {}),
            Err(NinaError::Timeout(Stage::StartByte))
        );
    }

    #[test]
    fn test_read_response_wrong_command() {
        let bytes = [START_CMD, 0x83, 0, END_CMD];
        assert_eq!(
            read_response(0x02, 10, feed(&bytes), || {}),
            Err(NinaError::UnexpectedByte {
                expected: 0x82,
                got: 0x83
            })
        );
    }

    #[test]
    fn test_read_response_missing_end() {
        let bytes = [START_CMD, 0x85, 1, 1, 1, 0x00];
        assert_eq!(
            read_response(0x05, 10, feed(&bytes), || {}),
            Err(NinaError::UnexpectedByte {
                expected: END_CMD,
                got: 0x00
            })
        );
    }

    #[test]
    fn test_read_response_limits() {
        let bytes = [START_CMD, 0x89, 5];
        assert_eq!(
            read_response(0x09, 10, feed(&bytes), || {}),
            Err(NinaError::TooManyBlocks(5))
        );

        let bytes = [START_CMD, 0x89, 1, 200];
        assert_eq!(
            read_response(0x09, 10, feed(&bytes), || {}),
            Err(NinaError::BlockTooLong(200))
        );
    }
}
