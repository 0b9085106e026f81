use std::fmt;

use crate::bitbuf::BitBuffer;
use crate::common::{Bit, Mode, Word};

pub trait Tracer {
    fn event(&mut self, event: &Event<'_>);
}

#[derive(Clone, Copy, Debug)]
pub enum Event<'a> {
    XorPlate { plate: Word, width: u32 },
    // step counts from 1
    Step {
        step: usize,
        register: Word,
        width: u32,
        fed: Bit,
        xored: bool,
    },
    Append {
        register_bit: u32,
        value: Bit,
        position: usize,
    },
    Done {
        mode: Mode,
        input: &'a BitBuffer,
        output: &'a BitBuffer,
    },
}

// Low `width` bits of `word`, most significant first.
pub fn word_bits(word: Word, width: u32) -> String {
    (0..width)
        .rev()
        .map(|i| if (word >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::XorPlate { plate, width } => {
                write!(f, "XORPLATE:     {}", word_bits(plate, width))
            }
            Event::Step {
                step,
                register,
                width,
                fed,
                xored,
            } => {
                write!(
                    f,
                    "[{:02}] SHIFTREG: {}  FED: {}",
                    step,
                    word_bits(register, width),
                    fed
                )?;
                if xored {
                    f.write_str("  XOR EVENT")?;
                }
                Ok(())
            }
            Event::Append {
                register_bit,
                value,
                position,
            } => write!(
                f,
                "({}) copying {} from shiftreg to output bit #{}",
                register_bit, value, position
            ),
            Event::Done {
                mode,
                input,
                output,
            } => write!(f, "{:?} IN:  {}\n{:?} OUT: {}", mode, input, mode, output),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn event(&mut self, _event: &Event<'_>) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn event(&mut self, event: &Event<'_>) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", event);
        }
    }
}
