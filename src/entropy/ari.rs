/*!

Fixed-point interval arithmetic shared by the encoder and the decoder.

The interval is `[base, base + length)` in units of `2^-precision`, relative to
the bits already emitted. Narrowing a symbol range out of it may wrap `base`
past the unit, which turns into a carry on the emitted bits. Renormalization
only looks at the length: whenever it falls under one half, the top bit of
`base` is final and gets shifted out.

There is no straddle (underflow) case. An interval that keeps covering the
midpoint is carried along by the carry propagation instead, so long runs of
ones may pile up in the output before a carry resolves them.

*/

use super::bits::{Bit, BitBuffer};
use crate::{Error, Result};

/// Interval bounds, cumulative frequencies and code values.
pub type Border = u32;
/// Intermediate type of every `length * cumulative` product.
///
/// Both factors are at most `2^MAX_PRECISION`, so the product always fits.
pub type Wide = u64;

pub const MIN_PRECISION: u32 = 12;
pub const MAX_PRECISION: u32 = 31;
pub const DEFAULT_PRECISION: u32 = 16;

/// Check that `precision` fits the fixed-point arithmetic.
pub fn check_precision(precision: u32) -> Result<u32> {
    if (MIN_PRECISION ..= MAX_PRECISION).contains(&precision) {
        Ok(precision)
    } else {
        Err(Error::InvalidPrecision(precision))
    }
}

/// `value * cumulative / 2^precision`, computed in `Wide`.
#[inline]
pub fn scale(value: Border, cumulative: Border, precision: u32) -> Border {
    ((value as Wide * cumulative as Wide) >> precision) as Border
}


/// Current coding interval.
///
/// On the decoder side `base` holds the offset of the code value inside the
/// interval instead of the interval start.
#[derive(Clone, Debug)]
pub struct Range {
    base        : Border,
    length      : Border,
    precision   : u32,
}

impl Range {
    /// Create the initial interval `[0, 1)` for a given precision
    pub fn new(precision: u32) -> Result<Range> {
        let precision = check_precision(precision)?;
        Ok(Range {
            base        : 0,
            length      : (1 << precision) - 1,
            precision,
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn base(&self) -> Border {
        self.base
    }

    pub fn length(&self) -> Border {
        self.length
    }

    #[inline]
    fn mask(&self) -> Border {
        (1 << self.precision) - 1
    }

    #[inline]
    fn half(&self) -> Border {
        1 << (self.precision - 1)
    }

    #[inline]
    fn scaled(&self, cumulative: Border) -> Border {
        scale(self.length, cumulative, self.precision)
    }

    /// Shift out the settled top bits of `base` until `length` covers
    /// at least one half again.
    fn roll(&self, mut base: Border, mut length: Border, out: &mut BitBuffer) -> Result<(Border, Border)> {
        while length < self.half() {
            out.push((base >> (self.precision - 1)) as Bit)?;
            length = (length << 1) & self.mask();
            base = (base << 1) & self.mask();
        }
        Ok((base, length))
    }

    /// Narrow the interval to the cumulative range `[low, high)`.
    ///
    /// Returns true if the new base wrapped and a carry was propagated into
    /// the bits of `out` written after `floor`.
    pub fn encode(&mut self, low: Border, high: Border, out: &mut BitBuffer, floor: usize) -> Result<bool> {
        debug_assert!(low <= high);
        let top = self.scaled(high);
        let increment = self.scaled(low);
        let base = (self.base + increment) & self.mask();
        let length = top - increment;
        if length == 0 {
            return Err(Error::EmptyInterval { length: self.length, low, high });
        }
        let carry = base < self.base;
        if carry {
            out.propagate_carry(floor)?;
        }
        let (base, length) = self.roll(base, length, out)?;
        self.base = base;
        self.length = length;
        Ok(carry)
    }

    /// Emit the code tail: a value one quarter above `base`, which lies
    /// inside the final interval whatever bits follow it.
    pub fn post_encode(&mut self, out: &mut BitBuffer, floor: usize) -> Result<()> {
        let quarter = 1 << (self.precision - 2);
        let base = (self.base + quarter) & self.mask();
        if base < self.base {
            out.propagate_carry(floor)?;
        }
        self.roll(base, quarter - 1, out)?;
        self.base = 0;
        self.length = 0;
        Ok(())
    }

    /// Load the first `precision` bits of the code value.
    pub fn start(&mut self, code: Border) {
        self.base = code & self.mask();
        self.length = self.mask();
    }

    /// Find the symbol whose scaled cumulative range holds the code value,
    /// and narrow the interval to it.
    ///
    /// `cumulative` must be non-decreasing and start with zero.
    pub fn decode(&mut self, cumulative: &[Border]) -> Option<usize> {
        let value = self.base;
        let (mut low, mut high) = (0, cumulative.len() - 1);
        let (mut x, mut y) = (0, self.scaled(cumulative[high]));
        if value >= y {
            return None;
        }
        while high - low > 1 {
            let mid = (low + high) / 2;
            let z = self.scaled(cumulative[mid]);
            if z > value {
                high = mid;
                y = z;
            } else {
                low = mid;
                x = z;
            }
        }
        self.base = value - x;
        self.length = y - x;
        Some(low)
    }

    /// True while the decoder has to consume more bits.
    #[inline]
    pub fn needs_bit(&self) -> bool {
        self.length < self.half()
    }

    /// Shift one code bit in.
    #[inline]
    pub fn feed(&mut self, bit: Bit) {
        self.base = ((self.base << 1) & self.mask()) + bit as Border;
        self.length = (self.length << 1) & self.mask();
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn precision_bounds() {
        assert!(Range::new(MIN_PRECISION - 1).is_err());
        assert!(Range::new(MAX_PRECISION + 1).is_err());
        let range = Range::new(MAX_PRECISION).unwrap();
        assert_eq!(range.length(), (1 << 31) - 1);
        assert_eq!(Range::new(DEFAULT_PRECISION).unwrap().length(), 0xFFFF);
    }

    #[test]
    fn widened_product() {
        let unit = 1 << MAX_PRECISION;
        let max = unit - 1;
        assert_eq!(scale(max, unit, MAX_PRECISION), max);
        assert_eq!(scale(max, unit / 2, MAX_PRECISION), max / 2);
    }

    #[test]
    fn empty_tail() {
        let mut range = Range::new(16).unwrap();
        let mut out = BitBuffer::new();
        range.post_encode(&mut out, 0).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.as_bytes(), &[0x40]);
    }

    #[test]
    fn narrow_and_roll() {
        let mut range = Range::new(16).unwrap();
        let mut out = BitBuffer::new();
        // the upper quarter of [0, 1)
        let carry = range.encode(0xC000, 0x10000, &mut out, 0).unwrap();
        assert!(!carry);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(0).unwrap(), 1);
        assert_eq!(range.length(), 0x8000);
        assert_eq!(range.base(), 0x7FFE);
    }

    #[test]
    fn collapsed_interval() {
        let mut range = Range::new(16).unwrap();
        let mut out = BitBuffer::new();
        assert!(matches!(range.encode(100, 100, &mut out, 0), Err(Error::EmptyInterval { .. })));
    }

    #[test]
    fn decode_rejects_reserved_mass() {
        let mut range = Range::new(16).unwrap();
        range.start(0xFFF0);
        let mut cumulative = [0 as Border; 257];
        for (i, c) in cumulative.iter_mut().enumerate() {
            *c = (i as Border) * 0x80;
        }
        assert_eq!(range.decode(&cumulative), None);
    }
}
