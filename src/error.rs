//! Error types of the coder.

use thiserror::Error;

use crate::entropy::ari::Border;
use crate::model::Symbol;

/// Everything that can stop an encoding or decoding session.
#[derive(Debug, Error)]
pub enum Error {
    /// Precision outside of the supported fixed-point range.
    #[error("precision {0} is outside of the supported range [{min}, {max}]",
        min = crate::entropy::ari::MIN_PRECISION, max = crate::entropy::ari::MAX_PRECISION)]
    InvalidPrecision(u32),

    /// The model and the coder were built with different precisions.
    #[error("model precision {model} does not match coder precision {coder}")]
    PrecisionMismatch { model: u32, coder: u32 },

    /// The symbol has an empty cumulative range and can not be coded.
    #[error("symbol {symbol} has zero probability in the current model")]
    ZeroProbability { symbol: Symbol },

    /// Narrowing collapsed the interval, the precision is too low for the model.
    #[error("interval of length {length} collapsed while narrowing to [{low}, {high})")]
    EmptyInterval { length: Border, low: Border, high: Border },

    /// Rescaled cumulative table exceeds the fixed-point unit.
    #[error("cumulative total {total} exceeds the fixed-point unit {unit}")]
    ModelOverflow { total: u64, unit: u64 },

    /// Adaptive models need at least one symbol between rescales.
    #[error("update range must be positive")]
    InvalidUpdateRange,

    /// The caller-provided output capacity is used up.
    #[error("output buffer limit of {limit} bytes exhausted")]
    OutputExhausted { limit: usize },

    /// Bit access beyond the end of a buffer.
    #[error("bit index {index} is out of range for a buffer of {len} bits")]
    OutOfRange { index: usize, len: usize },

    /// A carry ran past the first bit of the session.
    #[error("carry propagated past the start of the stream")]
    CarryOverflow,

    /// The code value points into unused probability mass.
    #[error("corrupt or desynchronized stream at bit {position}")]
    CorruptStream { position: usize },

    /// I/O failure of the surrounding tooling.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for coder operations.
pub type Result<T> = std::result::Result<T, Error>;
