use crate::{Context, Result, Value};
use serde::{Serialize, de::DeserializeOwned};

/// Serialize a field flagged `json` into the text bound for its column.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let text = serde_json::to_string(value).context("Could not encode the field as JSON")?;
    Ok(Value::Varchar(Some(text)))
}

/// Decode the content of a `json` column, text or bytes.
///
/// A NULL cell decodes as the JSON `null`, so `Option` fields become `None`
/// while fields that do not accept null fail.
pub fn decode_json<T: DeserializeOwned>(value: Value) -> Result<T> {
    let result = match value {
        Value::Null
        | Value::Varchar(None, ..)
        | Value::Unknown(None, ..)
        | Value::Blob(None, ..) => serde_json::from_str("null"),
        Value::Varchar(Some(v), ..) | Value::Unknown(Some(v), ..) => serde_json::from_str(&v),
        Value::Blob(Some(v), ..) => serde_json::from_slice(&v),
        other => {
            return Err(anyhow::anyhow!(
                "Cannot decode JSON from a value of type {other:?}"
            ));
        }
    };
    result.context("Could not decode the column as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        theme: String,
        size: u8,
    }

    #[test]
    fn text_and_bytes() {
        let settings = Settings {
            theme: "dark".into(),
            size: 3,
        };
        let encoded = encode_json(&settings).unwrap();
        assert_eq!(
            encoded,
            Value::Varchar(Some(r#"{"theme":"dark","size":3}"#.into()))
        );
        let decoded: Settings = decode_json(encoded).unwrap();
        assert_eq!(decoded, settings);
        let decoded: Vec<i32> = decode_json(Value::Blob(Some(b"[1,2]".to_vec().into()))).unwrap();
        assert_eq!(decoded, [1, 2]);
    }

    #[test]
    fn null_and_malformed() {
        let decoded: Option<Settings> = decode_json(Value::Null).unwrap();
        assert_eq!(decoded, None);
        assert!(decode_json::<Settings>(Value::Null).is_err());
        assert!(decode_json::<Settings>(Value::Varchar(Some("{oops".into()))).is_err());
        assert!(decode_json::<Settings>(Value::Int32(Some(1))).is_err());
    }
}
