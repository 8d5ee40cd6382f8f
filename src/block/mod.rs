/*!

Block encoding/decoding: whole buffers through a model

The coded stream carries no header. The decoder has to be told the number of
symbols, the precision and an identically configured model.

*/

use crate::entropy::{self, bits::BitBuffer};
use crate::model::Model;
use crate::Result;

#[cfg(feature="tune")]
fn print_stats(eh: &entropy::Encoder<'_>) {
    info!("Carries propagated: {}", eh.carries());
}

#[cfg(not(feature="tune"))]
fn print_stats(_eh: &entropy::Encoder<'_>) {
    //empty
}


/// Block encoder
pub struct Encoder<M> {
    /// Encoding model
    pub model   : M,
}

impl<M: Model> Encoder<M> {
    /// Create a new Encoder instance
    pub fn new(mut model: M) -> Encoder<M> {
        model.reset();
        Encoder {
            model,
        }
    }

    pub fn precision(&self) -> u32 {
        self.model.frequencies().precision()
    }

    /// Encode a block to the end of `output`, returns the number of bits emitted
    pub fn encode(&mut self, input: &[u8], output: &mut BitBuffer) -> Result<usize> {
        self.model.reset();
        let mut eh = entropy::Encoder::new(output, self.precision())?;
        for &sym in input.iter() {
            self.model.encode(sym, &mut eh)?;
        }
        print_stats(&eh);
        let bits = eh.finish()?;
        info!("Encoded {} bytes into {} bits", input.len(), bits);
        Ok(bits)
    }
}


/// Block decoder
pub struct Decoder<M> {
    /// Decoding model
    pub model   : M,
}

impl<M: Model> Decoder<M> {
    /// Create a new Decoder instance
    pub fn new(mut model: M) -> Decoder<M> {
        model.reset();
        Decoder {
            model,
        }
    }

    pub fn precision(&self) -> u32 {
        self.model.frequencies().precision()
    }

    /// Decode `output.len()` symbols from the coded `input`
    pub fn decode(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        self.model.reset();
        let mut dh = entropy::Decoder::new(input, self.precision())?;
        for sym in output.iter_mut() {
            *sym = self.model.decode(&mut dh)?;
        }
        info!("Decoded {} bytes from {} bits", output.len(), dh.position() + 1);
        Ok(())
    }
}
