pub mod common;
pub mod error;
pub mod bitbuf;
pub mod endian;
pub mod trace;
pub mod crc;
pub mod burst;
pub mod io;
pub mod config;

pub use bitbuf::BitBuffer;
pub use burst::{inject_burst, Burst};
pub use common::{Bit, Fill, Mode, Word};
pub use config::{Config, Direction, InputFormat, Outcome};
pub use crc::{crc, decode, encode, Generator, ShiftRegister, DEFAULT_GENERATOR};
pub use error::{Error, Result};
pub use trace::{Event, LogTracer, NullTracer, Tracer};
