//! # Variable-Length Lengths
//!
//! Field lengths and slot numbers inside an encoded record are written with a
//! marker-byte varint: small values cost one byte, and the marker tells the
//! reader how many bytes follow.
//!
//! | Value Range              | Bytes | Marker         |
//! |--------------------------|-------|----------------|
//! | 0 - 240                  | 1     | value itself   |
//! | 241 - 2287               | 2     | 241..=248      |
//! | 2288 - 67823             | 3     | 249            |
//! | 67824 - 16777215         | 4     | 250            |
//! | 16777216 - 4294967295    | 5     | 251            |
//! | above                    | 9     | 255            |
//!
//! Markers 252-254 are reserved and rejected on decode.

use eyre::{bail, ensure, Result};

const ONE_BYTE_MAX: u64 = 240;
const TWO_BYTE_MIN: u64 = ONE_BYTE_MAX + 1;
const TWO_BYTE_MAX: u64 = 2287;
const THREE_BYTE_MIN: u64 = TWO_BYTE_MAX + 1;
const THREE_BYTE_MAX: u64 = 67823;
const FOUR_BYTE_MIN: u64 = THREE_BYTE_MAX + 1;
const FOUR_BYTE_MAX: u64 = 0xFF_FFFF;
const FIVE_BYTE_MIN: u64 = FOUR_BYTE_MAX + 1;
const FIVE_BYTE_MAX: u64 = 0xFFFF_FFFF;

const MARKER_THREE: u8 = 249;
const MARKER_FOUR: u8 = 250;
const MARKER_FIVE: u8 = 251;
const MARKER_NINE: u8 = 255;

pub fn varint_len(value: u64) -> usize {
    match value {
        0..=ONE_BYTE_MAX => 1,
        TWO_BYTE_MIN..=TWO_BYTE_MAX => 2,
        THREE_BYTE_MIN..=THREE_BYTE_MAX => 3,
        FOUR_BYTE_MIN..=FOUR_BYTE_MAX => 4,
        FIVE_BYTE_MIN..=FIVE_BYTE_MAX => 5,
        _ => 9,
    }
}

/// Appends the encoding of `value` to `out` and returns the bytes written.
pub fn put_varint(value: u64, out: &mut Vec<u8>) -> usize {
    match value {
        0..=ONE_BYTE_MAX => out.push(value as u8),
        TWO_BYTE_MIN..=TWO_BYTE_MAX => {
            let v = value - TWO_BYTE_MIN;
            out.extend_from_slice(&[241 + (v >> 8) as u8, v as u8]);
        }
        THREE_BYTE_MIN..=THREE_BYTE_MAX => {
            let v = value - THREE_BYTE_MIN;
            out.extend_from_slice(&[MARKER_THREE, (v >> 8) as u8, v as u8]);
        }
        FOUR_BYTE_MIN..=FOUR_BYTE_MAX => {
            out.push(MARKER_FOUR);
            out.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
        }
        FIVE_BYTE_MIN..=FIVE_BYTE_MAX => {
            out.push(MARKER_FIVE);
            out.extend_from_slice(&(value as u32).to_be_bytes());
        }
        _ => {
            out.push(MARKER_NINE);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
    varint_len(value)
}

/// Decodes one varint from the front of `buf`, returning `(value, bytes_read)`.
pub fn read_varint(buf: &[u8]) -> Result<(u64, usize)> {
    let Some(&marker) = buf.first() else {
        bail!("empty buffer for varint decode");
    };

    let width = match marker {
        0..=240 => return Ok((marker as u64, 1)),
        241..=248 => 2,
        MARKER_THREE => 3,
        MARKER_FOUR => 4,
        MARKER_FIVE => 5,
        MARKER_NINE => 9,
        _ => bail!("invalid varint marker: {}", marker),
    };
    ensure!(buf.len() >= width, "truncated {}-byte varint", width);

    let tail = &buf[1..width];
    let value = match marker {
        241..=248 => TWO_BYTE_MIN + (((marker - 241) as u64) << 8) + tail[0] as u64,
        MARKER_THREE => THREE_BYTE_MIN + ((tail[0] as u64) << 8) + tail[1] as u64,
        _ => tail.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64),
    };
    Ok((value, width))
}
