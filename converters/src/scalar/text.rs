use super::ScalarCodec;
use type_mapping::PostgresTuple;
use uuid::Uuid;

impl ScalarCodec for String {
    const TYPE_NAME: &'static str = "text";
    const NULL_FAST_PATH: bool = false;

    fn zero() -> Self {
        String::new()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        Ok(text.to_owned())
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::text(self.as_str())
    }
}

impl ScalarCodec for Uuid {
    const TYPE_NAME: &'static str = "uuid";

    fn zero() -> Self {
        Uuid::nil()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        Uuid::parse_str(text).map_err(|e| e.to_string())
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::from(*self)
    }
}

impl ScalarCodec for serde_json::Value {
    const TYPE_NAME: &'static str = "json";
    const NULL_FAST_PATH: bool = false;

    fn zero() -> Self {
        serde_json::Value::Null
    }

    fn from_text(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    fn to_tuple(&self) -> PostgresTuple {
        PostgresTuple::text(self.to_string())
    }
}

/// bytea in PostgreSQL's hex output format
impl ScalarCodec for Vec<u8> {
    const TYPE_NAME: &'static str = "bytea";

    fn zero() -> Self {
        Vec::new()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        let digits = text
            .strip_prefix("\\x")
            .ok_or_else(|| "expected hex format starting with \\x".to_string())?;
        hex::decode(digits).map_err(|e| e.to_string())
    }

    fn to_tuple(&self) -> PostgresTuple {
        let mut text = String::with_capacity(2 + self.len() * 2);
        text.push_str("\\x");
        text.push_str(&hex::encode(self));
        PostgresTuple::text(text)
    }
}
