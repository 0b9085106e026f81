use std::io::{BufRead, Read};

use crate::bitbuf::BitBuffer;
use crate::error::Result;

const INITIAL_BINARY_BYTES: usize = 0x100;

pub fn read_characters<R: Read>(mut reader: R) -> Result<BitBuffer> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(BitBuffer::from_bytes(&bytes))
}

// Inverse of BitBuffer's Display. Stops at a newline, end of stream, or
// the first glyph that is not '0' or '1'.
pub fn read_binary<R: BufRead>(reader: R) -> Result<BitBuffer> {
    let mut buf = BitBuffer::new_empty(INITIAL_BINARY_BYTES * 8);
    for glyph in reader.bytes() {
        match glyph? {
            b'0' => buf.push_bit(0),
            b'1' => buf.push_bit(1),
            _ => break,
        }
    }
    Ok(buf)
}
