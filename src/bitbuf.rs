use std::fmt;

use crate::common::{Bit, Word};
use crate::error::{Error, Result};

// Smallest backing store, so that doubling always makes progress.
const MIN_BYTES: usize = 4;

/// A growable, bit-addressable sequence of bits backed by bytes.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8`, counted from the
/// least-significant bit. Bits at or past `bit_len()` are unspecified.
///
/// Growth policy: once a push leaves the buffer more than 75% full, the
/// backing storage doubles.
#[derive(Clone, Debug)]
pub struct BitBuffer {
    storage: Vec<u8>,
    bit_length: usize,
    residue: Word,
}

impl BitBuffer {
    // Twice the input size, so an appended remainder rarely forces a grow.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut storage = vec![0u8; (bytes.len() * 2).max(MIN_BYTES)];
        storage[..bytes.len()].copy_from_slice(bytes);
        Self {
            storage,
            bit_length: bytes.len() * 8,
            residue: 0,
        }
    }

    pub fn new_empty(initial_capacity_bits: usize) -> Self {
        let bytes = initial_capacity_bits.div_ceil(8).max(MIN_BYTES);
        Self {
            storage: vec![0u8; bytes],
            bit_length: 0,
            residue: 0,
        }
    }

    pub fn bit_len(&self) -> usize {
        self.bit_length
    }

    pub fn is_empty(&self) -> bool {
        self.bit_length == 0
    }

    pub fn capacity_bits(&self) -> usize {
        self.storage.len() * 8
    }

    /// Remainder left by the CRC pass that produced this buffer, 0 if none.
    pub fn residue(&self) -> Word {
        self.residue
    }

    pub(crate) fn set_residue(&mut self, residue: Word) {
        self.residue = residue;
    }

    #[inline]
    pub fn get_bit(&self, index: usize) -> Bit {
        (self.storage[index / 8] >> (index % 8)) & 1
    }

    // In place: never grows, never moves bit_len().
    #[inline]
    pub fn set_bit(&mut self, index: usize, value: Bit) {
        let mask = 1u8 << (index % 8);
        let byte = &mut self.storage[index / 8];
        if value & 1 == 1 {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    pub fn push_bit(&mut self, value: Bit) {
        if self.bit_length >= self.capacity_bits() {
            self.grow();
        }
        self.set_bit(self.bit_length, value);
        self.bit_length += 1;
        if self.bit_length * 4 > self.capacity_bits() * 3 {
            self.grow();
        }
    }

    pub fn pop_bit(&mut self) -> Result<Bit> {
        if self.bit_length == 0 {
            return Err(Error::EmptyBuffer);
        }
        self.bit_length -= 1;
        Ok(self.get_bit(self.bit_length))
    }

    pub fn truncate(&mut self, bit_length: usize) {
        self.bit_length = self.bit_length.min(bit_length);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.bit_length.div_ceil(8)]
    }

    pub fn whole_bytes_mut(&mut self) -> &mut [u8] {
        let n = self.bit_length / 8;
        &mut self.storage[..n]
    }

    pub fn bits(&self) -> impl Iterator<Item = Bit> + '_ {
        (0..self.bit_length).map(move |i| self.get_bit(i))
    }

    // Byte view, MSB first, unlike Display's bit-index order.
    pub fn octets(&self) -> String {
        self.as_bytes()
            .iter()
            .map(|b| format!("{:08b}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn grow(&mut self) {
        let doubled = self.storage.len() * 2;
        self.storage.resize(doubled, 0);
    }
}

// Equality looks at valid bits only; the slack past `bit_len()` and the
// residue are ignored.
impl PartialEq for BitBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.bit_length == other.bit_length && self.bits().eq(other.bits())
    }
}

impl Eq for BitBuffer {}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}
