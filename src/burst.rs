use rand::Rng;

use crate::common::Fill;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Burst {
    pub offset: usize,
    pub bits: usize,
    pub fill: Fill,
}

// Start byte is uniform in 0..=len - ceil(bits / 8) - 1, else 0. The
// trailing bits % 8 land in the low end of the next byte, where bit
// indices continue. Anything past the slice is dropped.
pub fn inject_burst<R: Rng + ?Sized>(
    bytes: &mut [u8],
    burst_bits: usize,
    fill: Fill,
    rng: &mut R,
) -> Option<Burst> {
    if burst_bits == 0 {
        return None;
    }

    let span = burst_bits.div_ceil(8);
    let offset = match bytes.len().checked_sub(span + 1) {
        Some(last) => rng.random_range(0..=last),
        None => 0,
    };

    let whole = burst_bits / 8;
    let end = (offset + whole).min(bytes.len());
    bytes[offset..end].fill(fill.byte());
    let mut written = (end - offset) * 8;

    let partial = burst_bits % 8;
    if partial > 0 {
        if let Some(byte) = bytes.get_mut(offset + whole) {
            let mask = (1u8 << partial) - 1;
            match fill {
                Fill::High => *byte |= mask,
                Fill::Low => *byte &= !mask,
            }
            written += partial;
        }
    }

    Some(Burst {
        offset,
        bits: written,
        fill,
    })
}
