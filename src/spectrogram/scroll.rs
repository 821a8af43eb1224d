//! Scroll offset into the frequency history.

/// Normalized read/write position in the frequency textures, always in [0, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOffset {
    value: f64,
    step: f64,
}

impl ScrollOffset {
    /// Start at 0 with a fixed per-frame step (wrapped into [0, 1))
    pub fn new(step: f32) -> Self {
        Self {
            value: 0.0,
            step: wrap_unit(step as f64),
        }
    }

    pub fn value(&self) -> f32 {
        self.value as f32
    }

    /// Offset after one more advance, without mutating
    pub fn peek_next(&self) -> f32 {
        wrap_unit(self.value + self.step) as f32
    }

    /// Advance by one step modulo 1 and return the new offset
    pub fn advance(&mut self) -> f32 {
        self.value = wrap_unit(self.value + self.step);
        self.value as f32
    }

    /// Texture row holding the newest sample when the shaders read with `offset`
    ///
    /// The shaders sample row `(v + offset) * size`; the row just below
    /// `offset * size` is the one the far edge of the mesh (v → 1) lands on.
    pub fn head_row(offset: f32, size: u32) -> u32 {
        if size == 0 {
            return 0;
        }
        let base = (wrap_unit(offset as f64) * size as f64).floor() as u32 % size;
        (base + size - 1) % size
    }
}

/// Values this close below 1 count as a full wrap
const WRAP_EPSILON: f64 = 1e-6;

/// Wrap into [0, 1)
///
/// A step stored as f32 (0.005 → 0.00499999989) would otherwise land just
/// short of 1 after `1 / step` ticks and take an extra tick to wrap.
fn wrap_unit(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    if wrapped >= 1.0 - WRAP_EPSILON {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_wraps_and_stays_in_range() {
        let step = 0.005;
        let mut scroll = ScrollOffset::new(step);
        let ticks = (1.0 / step).ceil() as usize;

        let mut wrapped = false;
        let mut previous = scroll.value();
        for _ in 0..ticks {
            let current = scroll.advance();
            assert!((0.0..1.0).contains(&current));
            if current < previous {
                wrapped = true;
            }
            previous = current;
        }

        assert!(wrapped, "offset never wrapped after {} ticks", ticks);
    }

    #[test]
    fn test_scroll_advances_monotonically_between_wraps() {
        let mut scroll = ScrollOffset::new(0.3);

        assert!((scroll.advance() - 0.3).abs() < 1e-6);
        assert!((scroll.advance() - 0.6).abs() < 1e-6);
        assert!((scroll.advance() - 0.9).abs() < 1e-6);
        assert!((scroll.advance() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_peek_matches_advance() {
        let mut scroll = ScrollOffset::new(0.005);
        for _ in 0..500 {
            let peeked = scroll.peek_next();
            assert_eq!(peeked, scroll.advance());
        }
    }

    #[test]
    fn test_head_row() {
        assert_eq!(ScrollOffset::head_row(0.0, 256), 255);
        assert_eq!(ScrollOffset::head_row(0.5, 256), 127);
        assert_eq!(ScrollOffset::head_row(0.999, 256), 254);
        assert_eq!(ScrollOffset::head_row(0.25, 4), 0);
    }
}
