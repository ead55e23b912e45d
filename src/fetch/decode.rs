//! Payload decoding.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::fetch::types::DecodeError;

/// Turns raw response bytes into a record.
pub trait Decoder: Send + Sync + 'static {
    type Record: Send + 'static;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Record, DecodeError>;
}

/// Decodes JSON payloads with serde.
pub struct JsonDecoder<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("record", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Decoder for JsonDecoder<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Record = T;

    fn decode(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(bytes).map_err(|e| DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::types::Todo;

    #[test]
    fn test_decode_todo() {
        let decoder = JsonDecoder::<Todo>::new();
        let todo = decoder
            .decode(br#"{"userId": 1, "id": 1, "title": "delectus aut autem", "completed": true}"#)
            .unwrap();

        assert_eq!(todo.id, 1);
        assert!(todo.completed);
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        let decoder = JsonDecoder::<Todo>::new();
        let err = decoder.decode(b"<html>not json</html>").unwrap_err();
        assert!(err.to_string().starts_with("error decoding response:"));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let decoder = JsonDecoder::<Todo>::new();
        assert!(decoder.decode(b"{}").is_err());
    }
}
