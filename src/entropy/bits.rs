/*!

Bit-granular access to byte buffers.

Bits are addressed most significant first: bit 0 is the top bit of byte 0,
bit 8 the top bit of byte 1.

*/

use crate::{Error, Result};

pub type Bit = u8;

#[inline]
fn locate(index: usize) -> (usize, u8) {
    (index >> 3, 0x80 >> (index & 7))
}

/// Read bit `index` of `bytes`.
pub fn get_bit(bytes: &[u8], index: usize) -> Result<Bit> {
    let (pos, mask) = locate(index);
    match bytes.get(pos) {
        Some(byte) => Ok((byte & mask != 0) as Bit),
        None => Err(Error::OutOfRange { index, len: bytes.len() * 8 }),
    }
}

/// Write bit `index` of `bytes`, any non-zero `bit` sets it.
pub fn set_bit(bytes: &mut [u8], index: usize, bit: Bit) -> Result<()> {
    let len = bytes.len() * 8;
    let (pos, mask) = locate(index);
    let byte = bytes.get_mut(pos).ok_or(Error::OutOfRange { index, len })?;
    if bit != 0 {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
    Ok(())
}


/// Output bit stream of an encoder.
///
/// Bits are appended at the cursor; the only backward access is the carry
/// propagation into bits that were already written. Storage grows on demand,
/// up to an optional byte limit.
#[derive(Clone, Debug, Default)]
pub struct BitBuffer {
    bytes   : Vec<u8>,
    cursor  : usize,
    limit   : Option<usize>,
}

impl BitBuffer {
    /// Create an empty buffer without capacity limit
    pub fn new() -> BitBuffer {
        BitBuffer::default()
    }

    /// Create an empty buffer that refuses to grow past `limit` bytes
    pub fn with_limit(limit: usize) -> BitBuffer {
        BitBuffer {
            bytes   : Vec::with_capacity(limit),
            cursor  : 0,
            limit   : Some(limit),
        }
    }

    /// Number of bits written so far, the position of the next bit
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Number of bytes touched by the written bits
    pub fn bytes_len(&self) -> usize {
        self.bytes.len()
    }

    /// Read back a written bit
    pub fn get(&self, index: usize) -> Result<Bit> {
        if index >= self.cursor {
            return Err(Error::OutOfRange { index, len: self.cursor });
        }
        get_bit(&self.bytes, index)
    }

    /// Append a bit at the cursor
    pub fn push(&mut self, bit: Bit) -> Result<()> {
        if self.cursor == self.bytes.len() * 8 {
            if let Some(limit) = self.limit {
                if self.bytes.len() >= limit {
                    return Err(Error::OutputExhausted { limit });
                }
            }
            self.bytes.push(0);
        }
        set_bit(&mut self.bytes, self.cursor, bit)?;
        self.cursor += 1;
        Ok(())
    }

    /// Add one to the binary number formed by the bits in `[floor, cursor)`.
    ///
    /// Trailing ones turn into zeros and the first zero found turns into one.
    pub fn propagate_carry(&mut self, floor: usize) -> Result<()> {
        let mut index = self.cursor;
        while index > floor {
            index -= 1;
            if get_bit(&self.bytes, index)? == 0 {
                return set_bit(&mut self.bytes, index, 1);
            }
            set_bit(&mut self.bytes, index, 0)?;
        }
        Err(Error::CarryOverflow)
    }

    /// Written bytes, the unused low bits of the last one are zero
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
