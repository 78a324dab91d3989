//! Cell value codecs.
//!
//! Every type a [`Grid`](crate::Grid) can store implements [`CellValue`],
//! which fixes its GSLIB type name, its text form and its numeric
//! conversions. The set is closed: there is no runtime type lookup.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use num_traits::NumCast;

/// A value that can be stored in a grid cell.
pub trait CellValue: Copy + PartialEq + Debug + Display + Send + Sync + 'static {
    /// Name written into GSLIB title lines (.NET type names, for
    /// compatibility with existing model files).
    const TYPE_NAME: &'static str;

    /// Widen to `f64` for statistics, sentinels and GSLIB sentinel checks.
    fn to_f64(self) -> f64;

    /// Narrow from `f64`. Returns `None` when the value is not representable
    /// (out of range, fractional for integer types, NaN for integer types).
    fn from_f64(value: f64) -> Option<Self>;

    /// Parse the text form of a single value.
    fn parse_cell(text: &str) -> Option<Self>;

    /// Text form of a single value.
    fn format_cell(self) -> String {
        self.to_string()
    }

    /// Convert between cell types through `f64`, failing when the target
    /// cannot represent the value.
    fn convert<V: CellValue>(self) -> Option<V> {
        V::from_f64(self.to_f64())
    }
}

macro_rules! impl_cell_value_int {
    ($t:ty, $name:expr) => {
        impl CellValue for $t {
            const TYPE_NAME: &'static str = $name;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Option<Self> {
                if !value.is_finite() || value.fract() != 0.0 {
                    return None;
                }
                <$t as NumCast>::from(value)
            }

            fn parse_cell(text: &str) -> Option<Self> {
                let text = text.trim();
                <$t as FromStr>::from_str(text)
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(Self::from_f64))
            }
        }
    };
}

macro_rules! impl_cell_value_float {
    ($t:ty, $name:expr) => {
        impl CellValue for $t {
            const TYPE_NAME: &'static str = $name;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Option<Self> {
                if value.is_finite() && value.abs() > <$t>::MAX as f64 {
                    return None;
                }
                Some(value as $t)
            }

            fn parse_cell(text: &str) -> Option<Self> {
                <$t as FromStr>::from_str(text.trim()).ok()
            }
        }
    };
}

impl_cell_value_float!(f64, "Double");
impl_cell_value_float!(f32, "Single");
impl_cell_value_int!(i64, "Int64");
impl_cell_value_int!(i32, "Int32");
impl_cell_value_int!(i16, "Int16");
impl_cell_value_int!(u8, "Byte");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(f64::TYPE_NAME, "Double");
        assert_eq!(f32::TYPE_NAME, "Single");
        assert_eq!(i32::TYPE_NAME, "Int32");
        assert_eq!(u8::TYPE_NAME, "Byte");
    }

    #[test]
    fn test_float_codec() {
        assert_eq!(f64::parse_cell(" 2.5 "), Some(2.5));
        assert_eq!(f64::parse_cell("-99"), Some(-99.0));
        assert_eq!(f64::parse_cell("1E-3"), Some(0.001));
        assert_eq!(f64::parse_cell("abc"), None);
        assert_eq!(2.0f64.format_cell(), "2");
        assert_eq!(0.25f64.format_cell(), "0.25");
    }

    #[test]
    fn test_integer_codec() {
        assert_eq!(i32::parse_cell("42"), Some(42));
        assert_eq!(i32::parse_cell("-99.0"), Some(-99));
        assert_eq!(i32::parse_cell("2.5"), None);
        assert_eq!(u8::parse_cell("256"), None);
        assert_eq!(u8::parse_cell("-1"), None);
    }

    #[test]
    fn test_checked_conversion() {
        assert_eq!(3.0f64.convert::<i32>(), Some(3));
        assert_eq!(3.5f64.convert::<i32>(), None);
        assert_eq!(f64::NAN.convert::<i64>(), None);
        assert_eq!(300i32.convert::<u8>(), None);
        assert_eq!(7u8.convert::<f64>(), Some(7.0));
        assert_eq!(1e300f64.convert::<f32>(), None);
        assert!(f64::NAN.convert::<f32>().unwrap().is_nan());
    }
}
