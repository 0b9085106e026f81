// One run of the channel simulation:
//
//   input --(encode)--> prepared --(burst)--> received --(decode)--> residue
//
// Encode and decode are each optional; the burst only happens when a
// length is configured.

use std::fmt;

use rand::Rng;

use crate::bitbuf::BitBuffer;
use crate::burst::{inject_burst, Burst};
use crate::common::{Fill, Mode, Word};
use crate::crc::{crc, Generator};
use crate::error::{Error, Result};
use crate::trace::Tracer;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Characters,
    Binary,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Send,
    Receive,
    #[default]
    SendReceive,
}

impl Direction {
    pub fn sends(self) -> bool {
        matches!(self, Direction::Send | Direction::SendReceive)
    }

    pub fn receives(self) -> bool {
        matches!(self, Direction::Receive | Direction::SendReceive)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub format: InputFormat,
    pub direction: Direction,
    pub generator: Generator,
    // 0 disables injection
    pub burst_bits: usize,
    pub binary_only: bool,
}

pub fn parse_generator(text: &str) -> Result<Word> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => Word::from_str_radix(hex, 16),
        None => text.parse::<Word>(),
    };
    parsed.map_err(|_| Error::ParseGenerator(text.to_string()))
}

#[derive(Clone, Debug)]
pub struct Outcome {
    pub direction: Direction,
    pub message: BitBuffer,
    pub burst: Option<Burst>,
}

impl Outcome {
    pub fn residue(&self) -> Word {
        self.message.residue()
    }

    pub fn exit_code(&self) -> i32 {
        (self.residue() != 0) as i32
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let residue = self.residue();
        if residue == 0 {
            if self.direction.receives() {
                return f.write_str("NO CORRUPTION DETECTED.");
            }
            return f.write_str("NO RESIDUE GENERATED.");
        }
        if self.direction.receives() {
            writeln!(f, "*** CORRUPTION DETECTED ***")?;
        }
        write!(f, "*** RESIDUE: {:#x}", residue)
    }
}

pub fn run<R: Rng + ?Sized, T: Tracer + ?Sized>(
    config: &Config,
    input: &BitBuffer,
    rng: &mut R,
    tracer: &mut T,
) -> Outcome {
    let mut prepared = if config.direction.sends() {
        crc(input, &config.generator, Mode::Encode, tracer)
    } else {
        input.clone()
    };

    let mut burst = None;
    if config.burst_bits > 0 {
        let fill = Fill::random(rng);
        burst = inject_burst(prepared.whole_bytes_mut(), config.burst_bits, fill, rng);
        if let Some(b) = &burst {
            log::debug!(
                "burst of {} {:?} bits at byte {} ({} requested)",
                b.bits,
                b.fill,
                b.offset,
                config.burst_bits
            );
        }
    }

    let message = if config.direction.receives() {
        crc(&prepared, &config.generator, Mode::Decode, tracer)
    } else {
        prepared
    };

    Outcome {
        direction: config.direction,
        message,
        burst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::encode;
    use crate::trace::NullTracer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(direction: Direction, generator: Word, burst_bits: usize) -> Config {
        Config {
            direction,
            generator: Generator::new(generator).unwrap(),
            burst_bits,
            ..Config::default()
        }
    }

    #[test]
    fn parses_hex_and_decimal() -> Result<()> {
        assert_eq!(parse_generator("0x04C11DB7")?, 0x04C1_1DB7);
        assert_eq!(parse_generator("0X18005")?, 0x1_8005);
        assert_eq!(parse_generator("263")?, 0x107);
        assert_eq!(parse_generator(" 7 ")?, 7);
        assert!(matches!(parse_generator("0xZZ"), Err(Error::ParseGenerator(_))));
        assert!(matches!(parse_generator("seven"), Err(Error::ParseGenerator(_))));
        assert!(matches!(parse_generator("0x1_0000_0000"), Err(Error::ParseGenerator(_))));
        assert!(matches!(parse_generator("4294967296"), Err(Error::ParseGenerator(_))));
        Ok(())
    }

    #[test]
    fn defaults_are_a_clean_round_trip() {
        let config = Config::default();
        assert_eq!(config.direction, Direction::SendReceive);
        assert_eq!(config.format, InputFormat::Characters);
        assert_eq!(config.generator, Generator::default());
        assert_eq!(config.burst_bits, 0);

        let mut rng = StdRng::seed_from_u64(0);
        let input = BitBuffer::from_bytes(b"Hello World\n");
        let outcome = run(&config, &input, &mut rng, &mut NullTracer);
        assert_eq!(outcome.residue(), 0);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.message.bit_len(), 96 + 26);
        assert!(outcome.burst.is_none());
        assert_eq!(outcome.to_string(), "NO CORRUPTION DETECTED.");
    }

    #[test]
    fn send_only_reports_the_remainder() {
        let mut rng = StdRng::seed_from_u64(0);
        let input = BitBuffer::from_bytes(b"A");
        let outcome = run(&config(Direction::Send, 0x1_8005, 0), &input, &mut rng, &mut NullTracer);
        assert_eq!(outcome.message.bit_len(), 24);
        assert_eq!(outcome.residue(), 0x030C);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.to_string(), "*** RESIDUE: 0x30c");
    }

    #[test]
    fn send_only_with_no_remainder() {
        let mut rng = StdRng::seed_from_u64(0);
        let input = BitBuffer::new_empty(0);
        let outcome = run(&config(Direction::Send, 0x107, 0), &input, &mut rng, &mut NullTracer);
        assert_eq!(outcome.to_string(), "NO RESIDUE GENERATED.");
    }

    #[test]
    fn receive_only_checks_an_encoded_message() {
        let mut rng = StdRng::seed_from_u64(0);
        let g = Generator::new(0x1_8005).unwrap();
        let encoded = encode(&BitBuffer::from_bytes(b"pipeline"), &g);
        let cfg = config(Direction::Receive, 0x1_8005, 0);

        let outcome = run(&cfg, &encoded, &mut rng, &mut NullTracer);
        assert_eq!(outcome.residue(), 0);
        assert_eq!(outcome.message, encoded);

        let raw = BitBuffer::from_bytes(b"pipeline");
        let outcome = run(&cfg, &raw, &mut rng, &mut NullTracer);
        assert_ne!(outcome.residue(), 0);
        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.to_string().starts_with("*** CORRUPTION DETECTED ***\n*** RESIDUE: 0x"));
    }

    #[test]
    fn chained_runs_through_bit_text() -> Result<()> {
        // send | receive, as two processes talking over '0'/'1' text.
        let mut rng = StdRng::seed_from_u64(0);
        let input = BitBuffer::from_bytes(b"chain");
        let sent = run(&config(Direction::Send, 0x107, 0), &input, &mut rng, &mut NullTracer);
        let text = format!("{}\n", sent.message);
        let parsed = crate::io::read_binary(std::io::Cursor::new(text.into_bytes()))?;
        let received = run(&config(Direction::Receive, 0x107, 0), &parsed, &mut rng, &mut NullTracer);
        assert_eq!(received.exit_code(), 0);
        Ok(())
    }

    #[test]
    fn bursts_are_caught_when_they_change_data() {
        let input = BitBuffer::from_bytes(&[0x55; 64]);
        let mut changed = 0;
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = run(
                &config(Direction::SendReceive, 0x1_8005, 12),
                &input,
                &mut rng,
                &mut NullTracer,
            );
            let burst = outcome.burst.unwrap();
            assert_eq!(burst.bits, 12);
            // 0x55 never matches an all-ones or all-zeros byte, so every
            // burst modifies the message and a 16-bit CRC sees it.
            assert_ne!(outcome.residue(), 0);
            changed += 1;
        }
        assert_eq!(changed, 50);
    }

    #[test]
    fn input_is_not_consumed() {
        let mut rng = StdRng::seed_from_u64(9);
        let input = BitBuffer::from_bytes(&[0x00; 16]);
        let before = input.clone();
        let _ = run(&config(Direction::SendReceive, 0x107, 30), &input, &mut rng, &mut NullTracer);
        assert_eq!(input, before);
        assert_eq!(input.as_bytes(), before.as_bytes());
    }
}
