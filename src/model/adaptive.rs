/*!

Adaptive model: starts equiprobable and learns from the coded symbols.

Every coded symbol bumps its count. After `update_range` symbols the
cumulative table is rebuilt from the counts. With `range_clear` the counts
then restart from one, so each table only reflects the last range; without
it they keep accumulating over the whole stream.

The decoder has to use the same `update_range` and `range_clear` as the
encoder. Accumulated counts eventually squeeze rarely seen symbols out of a
low precision table, long streams without `range_clear` want more bits.

*/

use super::{Frequencies, Symbol};
use crate::{Error, Result};

/// Symbols between two table rebuilds, as used by the reference test suite
pub const DEFAULT_UPDATE_RANGE: usize = 128;


/// Periodically rescaled byte frequency model
#[derive(Clone, Debug)]
pub struct Model {
    freq        : Frequencies,
    update_range: usize,
    range_clear : bool,
    /// symbols since the last rebuild
    pending     : usize,
    /// symbols counted since the last count reset
    accumulated : u64,
}

impl Model {
    /// Create a new adaptive model
    pub fn new(precision: u32, update_range: usize, range_clear: bool) -> Result<Model> {
        if update_range == 0 {
            return Err(Error::InvalidUpdateRange);
        }
        Ok(Model {
            freq        : Frequencies::new_uniform(precision)?,
            update_range,
            range_clear,
            pending     : 0,
            accumulated : 0,
        })
    }
}

impl super::Model for Model {
    fn reset(&mut self) {
        self.freq.reset_uniform();
        self.pending = 0;
        self.accumulated = 0;
    }

    fn frequencies(&self) -> &Frequencies {
        &self.freq
    }

    fn update(&mut self, symbol: Symbol) -> Result<()> {
        self.freq.add(symbol, 1);
        self.pending += 1;
        self.accumulated += 1;
        if self.pending >= self.update_range {
            self.freq.rescale(self.accumulated)?;
            self.pending = 0;
            if self.range_clear {
                self.freq.reset_counts();
                self.accumulated = 0;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Model as _, ALPHABET};
    use crate::model::test::check_normalized;

    #[test]
    fn zero_range() {
        assert!(matches!(Model::new(16, 0, false), Err(Error::InvalidUpdateRange)));
    }

    #[test]
    fn rebuild_schedule() {
        let mut model = Model::new(16, 4, false).unwrap();
        let uniform = *model.frequencies().cumulative();
        for _ in 0 .. 3 {
            model.update(b'x').unwrap();
        }
        assert_eq!(*model.frequencies().cumulative(), uniform);
        model.update(b'x').unwrap();
        check_normalized(model.frequencies());
        // 5 of 260 counts
        assert_eq!(model.frequencies().range(b'x'), (30240, 30240 + 1260));
    }

    #[test]
    fn clear_forgets() {
        let mut keep = Model::new(16, 8, false).unwrap();
        let mut clear = Model::new(16, 8, true).unwrap();
        for m in [&mut keep, &mut clear] {
            for _ in 0 .. 8 {
                m.update(b'a').unwrap();
            }
            for _ in 0 .. 8 {
                m.update(b'b').unwrap();
            }
            check_normalized(m.frequencies());
        }
        let width = |m: &Model, s| {
            let (low, high) = m.frequencies().range(s);
            high - low
        };
        // the second table of the clearing model only saw 'b'
        assert_eq!(width(&clear, b'a'), width(&clear, b'c'));
        assert!(width(&keep, b'a') > width(&keep, b'c'));
        assert_eq!(width(&keep, b'a'), width(&keep, b'b'));
        assert_eq!(clear.frequencies().counts().iter().sum::<u32>(), ALPHABET as u32);
    }

    #[test]
    fn reset_restarts() {
        let mut model = Model::new(16, 1, false).unwrap();
        model.update(7).unwrap();
        model.update(7).unwrap();
        model.reset();
        let fresh = Model::new(16, 1, false).unwrap();
        assert_eq!(model.frequencies().cumulative(), fresh.frequencies().cumulative());
        assert_eq!(model.frequencies().counts(), fresh.frequencies().counts());
    }
}
