/*!

Order-0 byte probability models

Every model exposes a `Frequencies` table: per-symbol counts and their
cumulative distribution normalized to `2^precision`. Encoder and decoder
stay in sync only if both sides build and update their tables identically.

*/

use std::fmt;

use crate::entropy::{self, ari::{self, Border, Wide}};
use crate::{Error, Result};

/// Fixed table built from a reference sample
pub mod fixed;
/// Table periodically rescaled from the coded symbols
pub mod adaptive;

pub type Symbol = u8;
pub type Count = u32;

pub const ALPHABET: usize = 0x100;
/// Count added per occurrence when building from a sample
pub const DEFAULT_WEIGHT: Count = 16;


/// Symbol counts with their normalized cumulative distribution.
///
/// `cumulative[0]` is zero and the table is non-decreasing. Truncation may
/// leave `cumulative[ALPHABET]` a bit under `2^precision`; the rest of the
/// unit is never assigned to a symbol.
#[derive(Clone, Debug)]
pub struct Frequencies {
    counts      : [Count; ALPHABET],
    cumulative  : [Border; ALPHABET + 1],
    precision   : u32,
}

impl Frequencies {
    /// Create an equiprobable table
    pub fn new_uniform(precision: u32) -> Result<Frequencies> {
        let mut freq = Frequencies {
            counts      : [1; ALPHABET],
            cumulative  : [0; ALPHABET + 1],
            precision   : ari::check_precision(precision)?,
        };
        freq.reset_uniform();
        Ok(freq)
    }

    /// Create a table from a reference sample, see `build_from_sample`
    pub fn new_sample(precision: u32, sample: &[u8], weight: Count) -> Result<Frequencies> {
        let mut freq = Frequencies::new_uniform(precision)?;
        freq.build_from_sample(sample, weight)?;
        Ok(freq)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn counts(&self) -> &[Count; ALPHABET] {
        &self.counts
    }

    pub fn cumulative(&self) -> &[Border; ALPHABET + 1] {
        &self.cumulative
    }

    /// Cumulative range `[low, high)` of a symbol
    #[inline]
    pub fn range(&self, symbol: Symbol) -> (Border, Border) {
        let s = symbol as usize;
        (self.cumulative[s], self.cumulative[s + 1])
    }

    /// Set all counts back to one, leaving the cumulative table as is
    pub fn reset_counts(&mut self) {
        self.counts = [1; ALPHABET];
    }

    /// Add `weight` to the count of a symbol
    #[inline]
    pub fn add(&mut self, symbol: Symbol, weight: Count) {
        let count = &mut self.counts[symbol as usize];
        *count = count.saturating_add(weight);
    }

    /// Reset to the equiprobable distribution
    pub fn reset_uniform(&mut self) {
        self.reset_counts();
        let unit = 1 << self.precision;
        for (s, c) in self.cumulative.iter_mut().enumerate() {
            *c = ((s as Wide * unit) / ALPHABET as Wide) as Border;
        }
    }

    /// Count every byte of `sample` with `weight` on top of the unit counts
    /// and normalize.
    pub fn build_from_sample(&mut self, sample: &[u8], weight: Count) -> Result<()> {
        self.reset_counts();
        for &b in sample {
            self.add(b, weight);
        }
        self.rescale(weight as u64 * sample.len() as u64)
    }

    /// Turn the counts into the cumulative table.
    ///
    /// `total` is the weight accumulated on top of the unit counts, so that
    /// `total + ALPHABET` is the count sum.
    pub fn rescale(&mut self, total: u64) -> Result<()> {
        let unit = (1 as Wide) << self.precision;
        let denominator = total + ALPHABET as Wide;
        let mut sum: Wide = 0;
        for (s, &count) in self.counts.iter().enumerate() {
            self.cumulative[s] = sum as Border;
            sum += count as Wide * unit / denominator;
            if sum > unit {
                return Err(Error::ModelOverflow { total: sum, unit });
            }
        }
        self.cumulative[ALPHABET] = sum as Border;
        debug!("Rescaled table over {} counts, {} of {} assigned", denominator, sum, unit);
        Ok(())
    }
}

impl fmt::Display for Frequencies {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let norm = ((1 as Wide) << self.precision) as f64;
        for s in 0 .. ALPHABET {
            let (low, high) = self.range(s as Symbol);
            writeln!(f, "P[{}]={:.6}, C[{}]={:.6}", s,
                (high - low) as f64 / norm, s, low as f64 / norm)?;
        }
        Ok(())
    }
}


/// A byte coding model
pub trait Model {
    /// Return to the initial state of a coding pass
    fn reset(&mut self);
    /// Table to code the next symbol with
    fn frequencies(&self) -> &Frequencies;
    /// Account for a coded symbol
    fn update(&mut self, symbol: Symbol) -> Result<()>;

    /// Encode a symbol and update
    fn encode(&mut self, symbol: Symbol, eh: &mut entropy::Encoder<'_>) -> Result<()> {
        eh.encode(symbol, self.frequencies())?;
        self.update(symbol)
    }

    /// Decode a symbol and update
    fn decode(&mut self, dh: &mut entropy::Decoder<'_>) -> Result<Symbol> {
        let symbol = dh.decode(self.frequencies())?;
        self.update(symbol)?;
        Ok(symbol)
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn frequencies(&self) -> &Frequencies {
        (**self).frequencies()
    }

    fn update(&mut self, symbol: Symbol) -> Result<()> {
        (**self).update(symbol)
    }
}
