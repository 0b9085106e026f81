// The shift register is kept as a plain u32, but the remainder bits are
// read out of it as a 4-byte array, bit i in byte i / 8. That array has
// to look the same on every host, so the in-memory layout is put into
// little-endian order before any bit is read from it.

use crate::common::Word;

// Lands in byte 0 as 0x0b only on a big-endian host.
const MARKER: Word = 0x0bff_ff00;
const BIG: u8 = 0x0b;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub fn host() -> Self {
        if host_is_big_endian() {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    pub fn layout(self, word: Word) -> [u8; 4] {
        match self {
            ByteOrder::Little => word.to_le_bytes(),
            ByteOrder::Big => word.to_be_bytes(),
        }
    }
}

pub fn host_is_big_endian() -> bool {
    MARKER.to_ne_bytes()[0] == BIG
}

pub fn reverse_bytes(word: Word) -> Word {
    word.swap_bytes()
}

// Byte 0 of the result carries bits 0..8 whatever `order` was.
pub fn normalize(memory: [u8; 4], order: ByteOrder) -> [u8; 4] {
    match order {
        ByteOrder::Little => memory,
        ByteOrder::Big => reverse_bytes(Word::from_le_bytes(memory)).to_le_bytes(),
    }
}
