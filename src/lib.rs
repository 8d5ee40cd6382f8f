/*!

Order-0 arithmetic coder for byte streams

Each byte is coded against a 256-symbol cumulative frequency table in
fixed-point arithmetic. Tables are either built once from a reference sample
(`model::fixed`) or learned while coding (`model::adaptive`).

The coded stream is a raw, most significant bit first packing with no header.
Decoding needs the symbol count, the precision and an identical model, all
passed out of band.

# Example

```rust
use arith::block::{Decoder, Encoder};
use arith::entropy::bits::BitBuffer;
use arith::model::fixed;

let text = b"aaaabbbbcccc";
let mut output = BitBuffer::new();
let mut encoder = Encoder::new(fixed::Model::new_sample(16, text).unwrap());
let bits = encoder.encode(text, &mut output).unwrap();
assert!(bits < 8 * text.len());

let mut decoded = vec![0u8; text.len()];
let mut decoder = Decoder::new(fixed::Model::new_sample(16, text).unwrap());
decoder.decode(output.as_bytes(), &mut decoded).unwrap();
assert_eq!(&decoded[..], &text[..]);
```

*/

#[macro_use]
extern crate log;

/// Whole-buffer encoding and decoding
pub mod block;
/// Interval arithmetic and bit streams
pub mod entropy;
/// Byte probability models
pub mod model;

mod error;

pub use error::{Error, Result};
