use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("generator {0:#x} has degree 0; it needs at least two significant bits")]
    InvalidGenerator(u32),

    #[error("cannot parse generator {0:?}: expected 0x-prefixed hex or decimal")]
    ParseGenerator(String),

    #[error("attempt to pop an empty bit buffer")]
    EmptyBuffer,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
