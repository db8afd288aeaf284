use crate::utils::Range;

/// Linear mapping of a value from one range onto another.
///
/// This is the Arduino `map()` function: the value is not clamped, so an input outside `from`
/// lands outside `to`. The result is always a `f64`: callers round to their own unit.
pub trait Scalable: Copy {
    /// Maps `self` from the `from` range onto the `to` range.
    ///
    /// ```
    /// use pantilt_radar::utils::{Range, Scalable};
    ///
    /// // Sweep angle to normalized servo value.
    /// let angle = 90u16.scale(Range::from([0, 180]), Range::from([-1.0, 1.0]));
    /// assert_eq!(angle, 0.0);
    /// // Normalized servo value to pulse width.
    /// let pulse = (-1.0f64).scale(Range::from([-1.0, 1.0]), Range::from([1000.0, 2000.0]));
    /// assert_eq!(pulse, 1000.0);
    /// ```
    fn scale(self, from: Range<Self>, to: Range<f64>) -> f64;
}

macro_rules! impl_scalable {
    ($($variant:ty),*) => {
        $(
            impl Scalable for $variant {
                fn scale(self, from: Range<Self>, to: Range<f64>) -> f64 {
                    (self as f64 - from.start as f64) * (to.end - to.start)
                        / (from.end as f64 - from.start as f64)
                        + to.start
                }
            }
        )*
    };
}

impl_scalable!(u8, u16, u32, i16, i32, f32, f64);

#[cfg(test)]
mod tests {
    use super::Scalable;
    use crate::utils::Range;

    #[test]
    fn test_scale_u16() {
        assert_eq!(0u16.scale(Range::from([0, 180]), Range::from([-1.0, 1.0])), -1.0);
        assert_eq!(90u16.scale(Range::from([0, 180]), Range::from([-1.0, 1.0])), 0.0);
        assert_eq!(180u16.scale(Range::from([0, 180]), Range::from([-1.0, 1.0])), 1.0);
    }

    #[test]
    fn test_scale_inverted_target() {
        assert_eq!(0u16.scale(Range::from([0, 180]), Range::from([2000.0, 1000.0])), 2000.0);
        assert_eq!(180u16.scale(Range::from([0, 180]), Range::from([2000.0, 1000.0])), 1000.0);
    }

    #[test]
    fn test_scale_out_of_range_is_not_clamped() {
        assert_eq!(2.0f64.scale(Range::from([-1.0, 1.0]), Range::from([1000.0, 2000.0])), 2500.0);
    }

    #[test]
    fn test_scale_f64() {
        assert!((0.5f64.scale(Range::from([0.0, 1.0]), Range::from([0.0, 250.0])) - 125.0).abs() < f64::EPSILON);
        assert!((25.0f64.scale(Range::from([0.0, 100.0]), Range::from([0.0, 250.0])) - 62.5).abs() < f64::EPSILON);
    }
}
