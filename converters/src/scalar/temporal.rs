use super::ScalarCodec;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use std::borrow::Cow;
use type_mapping::{PostgresTuple, ScalarValue};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIMESTAMPTZ_OUTPUT: &str = "%Y-%m-%d %H:%M:%S%.f+00";
const TIMESTAMPTZ_INPUT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

const INFINITY: &str = "infinity";
const NEG_INFINITY: &str = "-infinity";
const BC_SUFFIX: &str = " BC";
/// Leap year standing in for a BC year while chrono parses or prints
const PROXY_YEAR: i32 = 2000;

/// Parse with `parse`, accepting PostgreSQL's `YYYY-... BC` era suffix.
///
/// Year 1 BC is astronomical year 0.
fn parse_era<T: Datelike>(
    text: &str,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, String> {
    let Some(body) = text.strip_suffix(BC_SUFFIX) else {
        return parse(text);
    };
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    let year: i32 = body[..digits]
        .parse()
        .map_err(|_| format!("invalid BC year in '{}'", text))?;
    if year == 0 {
        return Err(format!("invalid BC year in '{}'", text));
    }
    let proxy = parse(&format!("{}{}", PROXY_YEAR, &body[digits..]))?;
    proxy
        .with_year(1 - year)
        .ok_or_else(|| format!("'{}' is not a valid date", text))
}

/// Format with `format`, writing years before 1 AD the way PostgreSQL does
fn format_era<T: Datelike>(value: &T, format: impl Fn(&T) -> String) -> String {
    if value.year() > 0 {
        return format(value);
    }
    match value.with_year(PROXY_YEAR) {
        Some(proxy) => {
            let text = format(&proxy);
            format!("{:04}{}{}", 1 - value.year(), &text[4..], BC_SUFFIX)
        }
        None => format(value),
    }
}

/// date: `infinity` and `-infinity` map to [`NaiveDate::MAX`] and [`NaiveDate::MIN`]
impl ScalarCodec for NaiveDate {
    const TYPE_NAME: &'static str = "date";

    fn zero() -> Self {
        NaiveDate::default()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        match text {
            INFINITY => Ok(NaiveDate::MAX),
            NEG_INFINITY => Ok(NaiveDate::MIN),
            other => parse_era(other, |text| {
                NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| e.to_string())
            }),
        }
    }

    fn to_tuple(&self) -> PostgresTuple {
        if *self == NaiveDate::MAX {
            PostgresTuple::literal(INFINITY)
        } else if *self == NaiveDate::MIN {
            PostgresTuple::literal(NEG_INFINITY)
        } else if self.year() > 0 {
            PostgresTuple::Scalar(ScalarValue::Literal(Cow::Owned(
                self.format(DATE_FORMAT).to_string(),
            )))
        } else {
            PostgresTuple::text(format_era(self, |date| date.format(DATE_FORMAT).to_string()))
        }
    }
}

/// timestamp: infinities map to [`NaiveDateTime::MAX`] and [`NaiveDateTime::MIN`]
impl ScalarCodec for NaiveDateTime {
    const TYPE_NAME: &'static str = "timestamp";

    fn zero() -> Self {
        NaiveDateTime::default()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        match text {
            INFINITY => Ok(NaiveDateTime::MAX),
            NEG_INFINITY => Ok(NaiveDateTime::MIN),
            other => parse_era(other, |text| {
                NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|e| e.to_string())
            }),
        }
    }

    fn to_tuple(&self) -> PostgresTuple {
        if *self == NaiveDateTime::MAX {
            PostgresTuple::literal(INFINITY)
        } else if *self == NaiveDateTime::MIN {
            PostgresTuple::literal(NEG_INFINITY)
        } else {
            PostgresTuple::text(format_era(self, |value| {
                value.format(TIMESTAMP_FORMAT).to_string()
            }))
        }
    }
}

/// timestamptz: written in UTC, read back from any offset the server uses.
/// Infinities map to `DateTime::<Utc>::MAX_UTC` and `DateTime::<Utc>::MIN_UTC`.
impl ScalarCodec for DateTime<Utc> {
    const TYPE_NAME: &'static str = "timestamptz";

    fn zero() -> Self {
        DateTime::<Utc>::default()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        match text {
            INFINITY => Ok(DateTime::<Utc>::MAX_UTC),
            NEG_INFINITY => Ok(DateTime::<Utc>::MIN_UTC),
            other => parse_era(other, |text| {
                DateTime::parse_from_str(text, TIMESTAMPTZ_INPUT)
                    .map(|value| value.with_timezone(&Utc))
                    .map_err(|e| e.to_string())
            }),
        }
    }

    fn to_tuple(&self) -> PostgresTuple {
        if *self == DateTime::<Utc>::MAX_UTC {
            PostgresTuple::literal(INFINITY)
        } else if *self == DateTime::<Utc>::MIN_UTC {
            PostgresTuple::literal(NEG_INFINITY)
        } else {
            PostgresTuple::text(format_era(self, |value| {
                value.format(TIMESTAMPTZ_OUTPUT).to_string()
            }))
        }
    }
}
