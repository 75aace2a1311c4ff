//! The `DateTime` scalar.
//!
//! Always serialized as ISO-8601 UTC with millisecond precision. Input may be an
//! ISO/RFC 3339 string or a number of seconds since the Unix epoch; anything else
//! is rejected.

use chrono::Utc;
use juniper::{GraphQLScalar, InputValue, ScalarValue, Value};

use folio_core::timestamp::{self, RawTimestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, GraphQLScalar)]
#[graphql(
    name = "DateTime",
    description = "ISO-8601 timestamp in UTC",
    to_output_with = to_output,
    from_input_with = from_input,
    parse_token(String, f64, i32)
)]
pub struct DateTimeScalar(pub chrono::DateTime<Utc>);

impl From<chrono::DateTime<Utc>> for DateTimeScalar {
    fn from(at: chrono::DateTime<Utc>) -> Self {
        Self(at)
    }
}

fn to_output<S: ScalarValue>(value: &DateTimeScalar) -> Value<S> {
    Value::scalar(timestamp::to_iso(&value.0))
}

fn from_input<S: ScalarValue>(input: &InputValue<S>) -> Result<DateTimeScalar, String> {
    let raw = if let Some(text) = input.as_string_value() {
        RawTimestamp::Text(text)
    } else if let Some(secs) = input.as_int_value() {
        RawTimestamp::EpochSeconds(f64::from(secs))
    } else if let Some(secs) = input.as_float_value() {
        RawTimestamp::EpochSeconds(secs)
    } else {
        return Err(format!("Value is not a valid DateTime: {input}"));
    };

    timestamp::normalize(raw)
        .map(DateTimeScalar)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use juniper::DefaultScalarValue;

    use super::*;

    #[test]
    fn test_serializes_with_millis() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let value: Value<DefaultScalarValue> = to_output(&DateTimeScalar(at));
        assert_eq!(value.as_string_value(), Some("2024-03-01T12:30:00.000Z"));
    }

    #[test]
    fn test_accepts_strings_and_epochs() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let text = InputValue::<DefaultScalarValue>::scalar("2024-03-01T00:00:00Z");
        assert_eq!(from_input(&text).unwrap().0, expected);

        let epoch = InputValue::<DefaultScalarValue>::scalar(expected.timestamp() as f64);
        assert_eq!(from_input(&epoch).unwrap().0, expected);
    }

    #[test]
    fn test_rejects_garbage() {
        let input = InputValue::<DefaultScalarValue>::scalar("yesterday");
        assert!(from_input(&input).is_err());

        let input = InputValue::<DefaultScalarValue>::scalar(true);
        assert!(from_input(&input).is_err());
    }
}
