use rand::Rng;

pub type Bit = u8;
pub type Word = u32;

// Which half of the channel a CRC pass plays.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

// Value written over the span of a burst error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    High,
    Low,
}

impl Fill {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random::<bool>() {
            Fill::High
        } else {
            Fill::Low
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Fill::High => 0xFF,
            Fill::Low => 0x00,
        }
    }
}
