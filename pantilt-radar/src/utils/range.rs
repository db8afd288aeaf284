use std::fmt::{Display, Formatter};

/// An inclusive `[start, end]` interval: degrees, pulse widths, display distances...
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[T; 2]", into = "[T; 2]"))]
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Range<T: Copy> {
    pub start: T,
    pub end: T,
}

impl<T: Copy> From<[T; 2]> for Range<T> {
    fn from(value: [T; 2]) -> Self {
        Self {
            start: value[0],
            end: value[1],
        }
    }
}

impl<T: Copy> From<Range<T>> for [T; 2] {
    fn from(value: Range<T>) -> Self {
        [value.start, value.end]
    }
}

impl<T: Copy + PartialOrd> Range<T> {
    /// Returns the same range with `start <= end`, no matter the order it was given in.
    pub fn ordered(self) -> Self {
        match self.start <= self.end {
            true => self,
            false => Self {
                start: self.end,
                end: self.start,
            },
        }
    }

    /// Checks whether `value` lies within the range (bounds included).
    pub fn contains(&self, value: T) -> bool {
        let range = self.ordered();
        range.start <= value && value <= range.end
    }

    /// Forces `value` into the range.
    pub fn clamp(&self, value: T) -> T {
        let range = self.ordered();
        match value {
            v if v < range.start => range.start,
            v if v > range.end => range.end,
            v => v,
        }
    }
}

impl<T: Copy + Display> Display for Range<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_from_array() {
        let range: Range<u16> = [1000, 2000].into();
        assert_eq!(range.start, 1000);
        assert_eq!(range.end, 2000);
        let back: [u16; 2] = range.into();
        assert_eq!(back, [1000, 2000]);
    }

    #[test]
    fn test_range_ordered() {
        assert_eq!(Range::from([180, 0]).ordered(), Range::from([0, 180]));
        assert_eq!(Range::from([0, 180]).ordered(), Range::from([0, 180]));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::from([0u16, 180]);
        assert!(range.contains(0));
        assert!(range.contains(180));
        assert!(range.contains(90));
        assert!(!range.contains(181));
        assert!(Range::from([180u16, 0]).contains(12));
    }

    #[test]
    fn test_range_clamp() {
        let range = Range::from([1000u16, 2000]);
        assert_eq!(range.clamp(600), 1000);
        assert_eq!(range.clamp(2400), 2000);
        assert_eq!(range.clamp(1500), 1500);
        assert_eq!(Range::from([1.0, -1.0]).clamp(-3.0), -1.0);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(format!("{}", Range::from([0, 180])), "0-180");
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn test_range_serialize() {
            let range = Range { start: 6, end: 12 };
            let json = serde_json::to_string(&range).unwrap();
            assert_eq!(json, r#"[6,12]"#);
        }

        #[test]
        fn test_range_deserialize() {
            let range: Range<u8> = serde_json::from_str(r#"[7,14]"#).unwrap();
            assert_eq!(range, Range::from([7, 14]));
        }
    }
}
