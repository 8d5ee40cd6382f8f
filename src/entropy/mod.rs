/*!

Symbol-level arithmetic coding against a cumulative frequency table.

*/

pub mod ari;
pub mod bits;

use crate::model::{Frequencies, Symbol};
use crate::{Error, Result};
use self::bits::BitBuffer;


fn check_model(range: &ari::Range, freq: &Frequencies) -> Result<()> {
    if freq.precision() == range.precision() {
        Ok(())
    } else {
        Err(Error::PrecisionMismatch { model: freq.precision(), coder: range.precision() })
    }
}

/// An arithmetic encoder helper, appending to a borrowed bit stream
pub struct Encoder<'a> {
    stream  : &'a mut BitBuffer,
    range   : ari::Range,
    start   : usize,
    carries : usize,
}

impl<'a> Encoder<'a> {
    /// Start a coding session at the current end of `stream`
    pub fn new(stream: &'a mut BitBuffer, precision: u32) -> Result<Encoder<'a>> {
        let start = stream.len();
        Ok(Encoder {
            stream,
            range   : ari::Range::new(precision)?,
            start,
            carries : 0,
        })
    }

    /// Encode a symbol
    pub fn encode(&mut self, symbol: Symbol, freq: &Frequencies) -> Result<()> {
        check_model(&self.range, freq)?;
        let (low, high) = freq.range(symbol);
        if low >= high {
            return Err(Error::ZeroProbability { symbol });
        }
        if self.range.encode(low, high, self.stream, self.start)? {
            self.carries += 1;
        }
        trace!("Encoded {} into [{}, {})", symbol, low, high);
        Ok(())
    }

    /// Bits emitted by this session so far
    pub fn bits(&self) -> usize {
        self.stream.len() - self.start
    }

    /// Number of carries propagated into emitted bits
    pub fn carries(&self) -> usize {
        self.carries
    }

    /// Finish encoding by writing the code tail, returns the total number of bits
    pub fn finish(mut self) -> Result<usize> {
        self.range.post_encode(self.stream, self.start)?;
        Ok(self.bits())
    }
}


/// An arithmetic decoder helper, reading from a borrowed code stream
///
/// Bits past the end of the input read as zero.
pub struct Decoder<'a> {
    input   : &'a [u8],
    range   : ari::Range,
    cursor  : usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder and load the first code bits
    pub fn new(input: &'a [u8], precision: u32) -> Result<Decoder<'a>> {
        let mut range = ari::Range::new(precision)?;
        let code = (0 .. precision as usize).fold(0 as ari::Border, |code, i| {
            (code << 1) | Decoder::bit_at(input, i) as ari::Border
        });
        range.start(code);
        Ok(Decoder {
            input,
            range,
            cursor  : precision as usize - 1,
        })
    }

    fn bit_at(input: &[u8], index: usize) -> bits::Bit {
        bits::get_bit(input, index).unwrap_or(0)
    }

    /// Index of the last consumed bit
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Decode a symbol
    pub fn decode(&mut self, freq: &Frequencies) -> Result<Symbol> {
        check_model(&self.range, freq)?;
        let symbol = self.range.decode(freq.cumulative())
            .ok_or(Error::CorruptStream { position: self.cursor })?;
        while self.range.needs_bit() {
            self.cursor += 1;
            self.range.feed(Decoder::bit_at(self.input, self.cursor));
        }
        trace!("Decoded {}", symbol);
        Ok(symbol as Symbol)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Frequencies;

    #[test]
    fn roundtrip() {
        let data = [1u8, 84, 15, 91, 0, 255, 255, 0];
        let freq = Frequencies::new_uniform(16).unwrap();
        let mut buffer = BitBuffer::new();
        let mut eh = Encoder::new(&mut buffer, 16).unwrap();
        for &d in data.iter() {
            eh.encode(d, &freq).unwrap();
        }
        let total = eh.finish().unwrap();
        assert_eq!(total, buffer.len());
        let mut dh = Decoder::new(buffer.as_bytes(), 16).unwrap();
        for &d in data.iter() {
            assert_eq!(dh.decode(&freq).unwrap(), d);
        }
    }

    #[test]
    fn carry_into_emitted_bits() {
        let freq = Frequencies::new_uniform(16).unwrap();
        let mut buffer = BitBuffer::new();
        let mut eh = Encoder::new(&mut buffer, 16).unwrap();
        eh.encode(2, &freq).unwrap();
        assert_eq!((eh.bits(), eh.carries()), (7, 0));
        // base 0xFF80 plus the increment of 255 wraps past the unit
        eh.encode(255, &freq).unwrap();
        assert_eq!(eh.carries(), 1);
        assert_eq!(eh.finish().unwrap(), 17);
        assert_eq!(buffer.as_bytes(), &[0x02, 0xFE, 0x80]);
        let mut dh = Decoder::new(buffer.as_bytes(), 16).unwrap();
        assert_eq!(dh.decode(&freq).unwrap(), 2);
        assert_eq!(dh.decode(&freq).unwrap(), 255);
    }

    #[test]
    fn precision_mismatch() {
        let freq = Frequencies::new_uniform(20).unwrap();
        let mut buffer = BitBuffer::new();
        let mut eh = Encoder::new(&mut buffer, 16).unwrap();
        assert!(matches!(eh.encode(0, &freq),
            Err(Error::PrecisionMismatch { model: 20, coder: 16 })));
    }

    #[test]
    fn zero_probability() {
        let mut freq = Frequencies::new_uniform(16).unwrap();
        freq.build_from_sample(&[7u8; 10000], 16).unwrap();
        let mut buffer = BitBuffer::new();
        let mut eh = Encoder::new(&mut buffer, 16).unwrap();
        eh.encode(7, &freq).unwrap();
        assert!(matches!(eh.encode(8, &freq), Err(Error::ZeroProbability { symbol: 8 })));
    }
}
