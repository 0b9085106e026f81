// Bit-serial CRC over a BitBuffer, laid out like the hardware LFSR:
//
//   message bits, then `degree` zeros
//          |
//          v
//   +---+---+-- ... --+---+
//   | d-1             | 0 | <- shift left, new bit enters at 0
//   +---+---+-- ... --+---+
//     |
//     +--> bit shifted out of the top == 1  =>  XOR with the plate
//
// The plate is the generator with its leading coefficient dropped. After
// the last zero has been fed, the register holds the remainder.

use crate::bitbuf::BitBuffer;
use crate::common::{Bit, Mode, Word};
use crate::endian::{self, ByteOrder};
use crate::error::{Error, Result};
use crate::trace::{Event, NullTracer, Tracer};

// x^26 + x^23 + x^22 + x^16 + x^12 + x^11 + x^10 + x^8 + x^7 + x^5 + x^4
// + x^2 + x + 1. The CRC-32 coefficients without the x^32 term, which a
// 32-bit word cannot hold.
pub const DEFAULT_GENERATOR: Word = 0x04C1_1DB7;

const fn degree_of(value: Word) -> u32 {
    Word::BITS - 1 - value.leading_zeros()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Generator {
    value: Word,
    degree: u32,
}

impl Generator {
    pub fn new(value: Word) -> Result<Self> {
        if value < 2 {
            return Err(Error::InvalidGenerator(value));
        }
        Ok(Self {
            value,
            degree: degree_of(value),
        })
    }

    pub fn value(&self) -> Word {
        self.value
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn xor_plate(&self) -> Word {
        self.value & crop_mask(self.degree)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            value: DEFAULT_GENERATOR,
            degree: degree_of(DEFAULT_GENERATOR),
        }
    }
}

fn crop_mask(width: u32) -> Word {
    Word::MAX >> (Word::BITS - width)
}

#[derive(Clone, Debug)]
pub struct ShiftRegister {
    value: Word,
    width: u32,
    crop: Word,
    high: Word,
    plate: Word,
    // Top bit of the register after the previous step.
    carry: bool,
}

impl ShiftRegister {
    pub fn new(generator: &Generator) -> Self {
        let width = generator.degree();
        Self {
            value: 0,
            width,
            crop: crop_mask(width),
            high: 1 << (width - 1),
            plate: generator.xor_plate(),
            carry: false,
        }
    }

    // Returns whether the plate was XORed in.
    pub fn shift(&mut self, bit: Bit) -> bool {
        self.value = ((self.value << 1) & self.crop) | Word::from(bit & 1);
        let xored = self.carry;
        if xored {
            self.value ^= self.plate;
        }
        self.carry = self.value & self.high != 0;
        xored
    }

    pub fn value(&self) -> Word {
        self.value
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn plate(&self) -> Word {
        self.plate
    }

    pub fn bytes(&self, order: ByteOrder) -> [u8; 4] {
        endian::normalize(order.layout(self.value), order)
    }
}

/// Divides `message` by `generator` and returns a fresh copy of it whose
/// residue is the remainder. `Mode::Encode` also appends the remainder,
/// most significant bit first, so decoding that copy leaves residue 0.
pub fn crc<T: Tracer + ?Sized>(
    message: &BitBuffer,
    generator: &Generator,
    mode: Mode,
    tracer: &mut T,
) -> BitBuffer {
    crc_with_byte_order(message, generator, mode, ByteOrder::host(), tracer)
}

pub fn crc_with_byte_order<T: Tracer + ?Sized>(
    message: &BitBuffer,
    generator: &Generator,
    mode: Mode,
    order: ByteOrder,
    tracer: &mut T,
) -> BitBuffer {
    let degree = generator.degree() as usize;
    let mut register = ShiftRegister::new(generator);
    tracer.event(&Event::XorPlate {
        plate: register.plate(),
        width: register.width(),
    });

    let fed = message.bit_len();
    for index in 0..fed + degree {
        let bit = if index < fed { message.get_bit(index) } else { 0 };
        let xored = register.shift(bit);
        tracer.event(&Event::Step {
            step: index + 1,
            register: register.value(),
            width: register.width(),
            fed: bit,
            xored,
        });
    }

    let bytes = register.bytes(order);
    let mut out = BitBuffer::from_bytes(message.as_bytes());
    out.truncate(fed);
    out.set_residue(Word::from_le_bytes(bytes));

    if mode == Mode::Encode {
        for i in (0..degree).rev() {
            let value = (bytes[i / 8] >> (i % 8)) & 1;
            out.push_bit(value);
            tracer.event(&Event::Append {
                register_bit: i as u32,
                value,
                position: out.bit_len() - 1,
            });
        }
    }

    tracer.event(&Event::Done {
        mode,
        input: message,
        output: &out,
    });
    out
}

pub fn encode(message: &BitBuffer, generator: &Generator) -> BitBuffer {
    crc(message, generator, Mode::Encode, &mut NullTracer)
}

pub fn decode(message: &BitBuffer, generator: &Generator) -> BitBuffer {
    crc(message, generator, Mode::Decode, &mut NullTracer)
}
