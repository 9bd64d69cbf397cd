use super::{read_text_token, ScalarCodec};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;
use type_mapping::{PostgresReader, PostgresTuple, ScalarValue, TupleError};

/// Accumulate a bare integer token straight from the reader.
///
/// Digits of a negative number are subtracted rather than added so the
/// minimum value never passes through its unrepresentable positive.
fn read_integer(
    reader: &mut PostgresReader<'_>,
    first: u8,
    match_end: u8,
    type_name: &str,
) -> Result<i64, TupleError> {
    let negative = first == b'-';
    let mut cur = if negative { reader.read() } else { Some(first) };
    let mut value: i64 = 0;
    let mut digits = 0usize;
    loop {
        match cur {
            None => break,
            Some(c) if c == b',' || c == match_end => break,
            Some(c) if c.is_ascii_digit() => {
                let digit = i64::from(c - b'0');
                value = value
                    .checked_mul(10)
                    .and_then(|v| {
                        if negative {
                            v.checked_sub(digit)
                        } else {
                            v.checked_add(digit)
                        }
                    })
                    .ok_or_else(|| reader.invalid_value(type_name, "out of range"))?;
                digits += 1;
            }
            Some(c) => {
                return Err(reader.invalid_value(
                    type_name,
                    format!("unexpected character '{}'", char::from(c).escape_default()),
                ));
            }
        }
        cur = reader.read();
    }
    if digits == 0 {
        return Err(reader.invalid_value(type_name, "no digits"));
    }
    Ok(value)
}

macro_rules! integer_codec {
    ($ty:ty, $name:expr) => {
        impl ScalarCodec for $ty {
            const TYPE_NAME: &'static str = $name;

            fn zero() -> Self {
                0
            }

            fn from_text(text: &str) -> Result<Self, String> {
                text.trim().parse::<$ty>().map_err(|e| e.to_string())
            }

            fn to_tuple(&self) -> PostgresTuple {
                PostgresTuple::from(*self)
            }

            fn read_token(
                reader: &mut PostgresReader<'_>,
                first: u8,
                context: usize,
                match_end: u8,
            ) -> Result<Self, TupleError> {
                if first == b'"' || first == b'\\' {
                    return read_text_token(reader, first, context, match_end);
                }
                let value = read_integer(reader, first, match_end, $name)?;
                <$ty>::try_from(value).map_err(|_| reader.invalid_value($name, "out of range"))
            }
        }
    };
}

integer_codec!(i16, "int2");
integer_codec!(i32, "int4");
integer_codec!(i64, "int8");

impl ScalarCodec for bool {
    const TYPE_NAME: &'static str = "bool";

    fn zero() -> Self {
        false
    }

    fn from_text(text: &str) -> Result<Self, String> {
        match text {
            "t" | "true" => Ok(true),
            "f" | "false" => Ok(false),
            other => Err(format!("expected 't' or 'f', found '{}'", other)),
        }
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::from(*self)
    }
}

fn parse_float(text: &str) -> Result<f64, String> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => other.trim().parse::<f64>().map_err(|e| e.to_string()),
    }
}

impl ScalarCodec for f64 {
    const TYPE_NAME: &'static str = "float8";
    const NULL_FAST_PATH: bool = false;

    fn zero() -> Self {
        0.0
    }

    fn from_text(text: &str) -> Result<Self, String> {
        parse_float(text)
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::from(*self)
    }
}

impl ScalarCodec for f32 {
    const TYPE_NAME: &'static str = "float4";
    const NULL_FAST_PATH: bool = false;

    fn zero() -> Self {
        0.0
    }

    fn from_text(text: &str) -> Result<Self, String> {
        match text {
            "NaN" => Ok(f32::NAN),
            "Infinity" => Ok(f32::INFINITY),
            "-Infinity" => Ok(f32::NEG_INFINITY),
            other => other.trim().parse::<f32>().map_err(|e| e.to_string()),
        }
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::from(*self)
    }
}

/// numeric: `NaN`, `Infinity` and `-Infinity` have no `Decimal` counterpart
/// and fail to decode as a malformed literal
impl ScalarCodec for Decimal {
    const TYPE_NAME: &'static str = "numeric";
    const NULL_FAST_PATH: bool = false;

    fn zero() -> Self {
        Decimal::ZERO
    }

    fn from_text(text: &str) -> Result<Self, String> {
        Decimal::from_str(text.trim())
            .or_else(|_| Decimal::from_scientific(text.trim()))
            .map_err(|e| e.to_string())
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::Scalar(ScalarValue::Literal(Cow::Owned(self.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{parse_collection, parse_nullable};
    use rand::Rng;

    fn field<S: ScalarCodec>(literal: &str) -> Result<Option<S>, TupleError> {
        let mut reader = PostgresReader::new(literal);
        reader.read();
        parse_nullable::<S>(&mut reader, 1)
    }

    #[test]
    fn test_integer_extremes_round_trip() {
        for value in [i32::MIN, -1, 0, 1, i32::MAX] {
            let literal = format!("({})", value.to_tuple().build_tuple(false));
            assert_eq!(field::<i32>(&literal).unwrap(), Some(value));
        }
        assert_eq!(i32::MIN.to_tuple().build_tuple(false), "-2147483648");

        let literal = format!("({})", i64::MIN.to_tuple().build_tuple(false));
        assert_eq!(field::<i64>(&literal).unwrap(), Some(i64::MIN));

        let literal = format!("({})", i16::MIN.to_tuple().build_tuple(false));
        assert_eq!(field::<i16>(&literal).unwrap(), Some(i16::MIN));
    }

    #[test]
    fn test_integer_overflow_is_malformed() {
        assert!(field::<i32>("(2147483648)").unwrap_err().is_malformed());
        assert!(field::<i64>("(99999999999999999999)").unwrap_err().is_malformed());
        assert!(field::<i16>("(-32769)").is_err());
    }

    #[test]
    fn test_integer_rejects_garbage() {
        assert!(field::<i32>("(12a)").is_err());
        assert!(field::<i32>("(-)").is_err());
    }

    #[test]
    fn test_quoted_integer_is_accepted() {
        assert_eq!(field::<i32>(r#"("42")"#).unwrap(), Some(42));
    }

    #[test]
    fn test_random_integers_round_trip() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let value: i64 = rng.random();
            let literal = format!("({})", value.to_tuple().build_tuple(false));
            assert_eq!(field::<i64>(&literal).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_bool() {
        assert_eq!(field::<bool>("(t)").unwrap(), Some(true));
        assert_eq!(field::<bool>("(f)").unwrap(), Some(false));
        assert!(field::<bool>("(x)").is_err());
        assert_eq!(true.to_tuple().build_tuple(false), "t");
    }

    #[test]
    fn test_float_special_values() {
        let mut reader = PostgresReader::new("{NaN,Infinity,-Infinity,1.5,NULL}");
        let values = parse_collection::<f64>(&mut reader, 0).unwrap().unwrap();
        assert!(values[0].is_nan());
        assert_eq!(values[1], f64::INFINITY);
        assert_eq!(values[2], f64::NEG_INFINITY);
        assert_eq!(values[3], 1.5);
        assert_eq!(values[4], 0.0);
        assert_eq!(f32::NAN.to_tuple().build_tuple(false), "NaN");
    }

    #[test]
    fn test_decimal() {
        let value = Decimal::from_str("-12.3400").unwrap();
        assert_eq!(value.to_tuple().build_tuple(false), "-12.3400");
        assert_eq!(field::<Decimal>("(-12.3400)").unwrap(), Some(value));
        assert!(field::<Decimal>("(NaN)").is_err());
        assert!(field::<Decimal>("(-Infinity)").is_err());
    }
}
