/*!

A static model: the table is built once and never changes while coding.

Both sides have to build it from the same reference sample, with the same
weight and precision.

*/

use super::{Count, Frequencies, Symbol, DEFAULT_WEIGHT};
use crate::Result;


/// Static byte frequency model
#[derive(Clone, Debug)]
pub struct Model {
    freq: Frequencies,
}

impl Model {
    /// Create an equiprobable model
    pub fn new_uniform(precision: u32) -> Result<Model> {
        Ok(Model {
            freq: Frequencies::new_uniform(precision)?,
        })
    }

    /// Create a model from a reference sample with the default weight
    pub fn new_sample(precision: u32, sample: &[u8]) -> Result<Model> {
        Model::new_weighted(precision, sample, DEFAULT_WEIGHT)
    }

    /// Create a model from a reference sample, counting each byte `weight` times
    pub fn new_weighted(precision: u32, sample: &[u8], weight: Count) -> Result<Model> {
        Ok(Model {
            freq: Frequencies::new_sample(precision, sample, weight)?,
        })
    }
}

impl super::Model for Model {
    fn reset(&mut self) {}

    fn frequencies(&self) -> &Frequencies {
        &self.freq
    }

    fn update(&mut self, _symbol: Symbol) -> Result<()> {
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Model as _;

    #[test]
    fn table_is_static() {
        let mut model = Model::new_sample(16, b"static text").unwrap();
        let before = *model.frequencies().cumulative();
        for &b in b"something else entirely" {
            model.update(b).unwrap();
        }
        model.reset();
        assert_eq!(*model.frequencies().cumulative(), before);
    }

    #[test]
    fn weight_sharpens() {
        let light = Model::new_weighted(16, b"zzzz", 1).unwrap();
        let heavy = Model::new_weighted(16, b"zzzz", 64).unwrap();
        let width = |m: &Model| {
            let (low, high) = m.frequencies().range(b'z');
            high - low
        };
        assert!(width(&heavy) > width(&light));
    }
}
