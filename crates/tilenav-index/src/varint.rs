//! Base-128 variable-length integers.
//!
//! Seven payload bits per byte, least-significant group first. The high bit
//! of each byte is set when another byte follows.

use std::io::{Read, Write};

use crate::error::{IndexError, IndexResult};

const CONTINUE: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;

fn read_byte<R: Read>(r: &mut R) -> IndexResult<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

/// Read a varint of at most `max_bits` significant bits.
fn read_bits<R: Read>(r: &mut R, max_bits: u32) -> IndexResult<u64> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    loop {
        let b = read_byte(r)?;
        let payload = (b & PAYLOAD) as u64;
        if shift >= max_bits || (shift > 0 && payload >> (max_bits - shift).min(63) != 0) {
            return Err(IndexError::corrupt(
                "varint",
                format!("value exceeds {max_bits} bits"),
            ));
        }
        value |= payload << shift;
        if b & CONTINUE == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

/// Read an unsigned 32-bit varint.
pub fn read_u32<R: Read>(r: &mut R) -> IndexResult<u32> {
    read_bits(r, 32).map(|v| v as u32)
}

/// Read an unsigned 64-bit varint.
pub fn read_u64<R: Read>(r: &mut R) -> IndexResult<u64> {
    read_bits(r, 64)
}

/// Write an unsigned 64-bit varint.
pub fn write_u64<W: Write>(w: &mut W, mut v: u64) -> IndexResult<()> {
    let mut buf = [0u8; 10];
    let mut n = 0;
    loop {
        let group = (v as u8) & PAYLOAD;
        v >>= 7;
        if v == 0 {
            buf[n] = group;
            n += 1;
            break;
        }
        buf[n] = group | CONTINUE;
        n += 1;
    }
    w.write_all(&buf[..n])?;
    Ok(())
}

/// Write an unsigned 32-bit varint.
pub fn write_u32<W: Write>(w: &mut W, v: u32) -> IndexResult<()> {
    write_u64(w, v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_u64(&mut out, v).unwrap();
        out
    }

    #[test]
    fn single_byte_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn multi_byte_is_little_endian_groups() {
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
        assert_eq!(encode(16_384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn reads_what_it_writes_at_boundaries() {
        for v in [0u32, 127, 128, 16_383, 16_384, u32::MAX] {
            let bytes = encode(v as u64);
            assert_eq!(read_u32(&mut bytes.as_slice()).unwrap(), v);
        }
        let bytes = encode(u64::MAX);
        assert_eq!(bytes.len(), 10);
        assert_eq!(read_u64(&mut bytes.as_slice()).unwrap(), u64::MAX);
    }

    #[test]
    fn u32_overflow_is_corrupt() {
        let bytes = encode(u32::MAX as u64 + 1);
        let err = read_u32(&mut bytes.as_slice()).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn truncated_input_is_io_error() {
        let err = read_u32(&mut [0x80u8, 0x80].as_slice()).unwrap_err();
        assert!(matches!(err, IndexError::Io(_)));
    }
}
