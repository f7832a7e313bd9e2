//! Storage codec for RelState
//!
//! Converts between values and the byte shapes a storage cell can hold.
//! String and Integer use native column affinity and stay untagged; every
//! other kind becomes a blob whose first byte is the kind discriminant.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::codec::wire::{structured_from_text, structured_to_text};
use crate::error::{Error, Result};
use crate::value::Value;

/// Blob discriminant for Boolean (payload: one flag byte)
pub const TAG_BOOLEAN: u8 = 0;
/// Blob discriminant for Decimal (payload: numerator ‖ denominator)
pub const TAG_DECIMAL: u8 = 1;
/// Blob discriminant for Structured (payload: UTF-8 structured text)
pub const TAG_STRUCTURED: u8 = 2;
/// Blob discriminant for Bytes (payload: the raw bytes)
pub const TAG_BYTES: u8 = 3;

/// The exact shapes a storage cell can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCell {
    /// Native TEXT cell (String values, untagged)
    Text(String),
    /// Native INTEGER cell (Integer values, untagged)
    Int(i64),
    /// Tagged blob cell (all other kinds)
    Blob(Vec<u8>),
}

/// Encode a value into its storage cell. Never fails for well-typed input.
pub fn encode_storage(value: &Value) -> StorageCell {
    match value {
        Value::String(s) => StorageCell::Text(s.clone()),
        Value::Integer(i) => StorageCell::Int(*i),
        Value::Boolean(b) => StorageCell::Blob(vec![TAG_BOOLEAN, u8::from(*b)]),
        Value::Decimal(d) => {
            let mut blob = vec![TAG_DECIMAL];
            blob.extend(encode_decimal_payload(d));
            StorageCell::Blob(blob)
        }
        Value::Structured(s) => {
            let mut blob = vec![TAG_STRUCTURED];
            blob.extend(structured_to_text(s).into_bytes());
            StorageCell::Blob(blob)
        }
        Value::Bytes(b) => {
            let mut blob = Vec::with_capacity(b.len() + 1);
            blob.push(TAG_BYTES);
            blob.extend_from_slice(b);
            StorageCell::Blob(blob)
        }
    }
}

/// Decode a storage cell back into a value.
pub fn decode_storage(cell: &StorageCell) -> Result<Value> {
    match cell {
        StorageCell::Text(s) => Ok(Value::String(s.clone())),
        StorageCell::Int(i) => Ok(Value::Integer(*i)),
        StorageCell::Blob(blob) => {
            let (&tag, payload) = blob
                .split_first()
                .ok_or_else(|| Error::malformed("empty blob cell"))?;
            match tag {
                TAG_BOOLEAN => match payload {
                    [flag] => Ok(Value::Boolean(*flag != 0)),
                    _ => Err(Error::malformed(format!(
                        "boolean payload must be one byte, got {}",
                        payload.len()
                    ))),
                },
                TAG_DECIMAL => Ok(Value::Decimal(decode_decimal_payload(payload)?)),
                TAG_STRUCTURED => {
                    let text = std::str::from_utf8(payload).map_err(|e| {
                        Error::malformed(format!("structured payload is not UTF-8: {}", e))
                    })?;
                    Ok(Value::Structured(structured_from_text(text)?))
                }
                TAG_BYTES => Ok(Value::Bytes(payload.to_vec())),
                other => Err(Error::UnknownStorageTag(other)),
            }
        }
    }
}

/// Encode a reduced rational as numerator ‖ denominator.
///
/// Each half is a minimal signed big-endian byte string; the shorter half
/// is left-padded with its sign byte so both halves have equal length,
/// which lets the decoder split at the midpoint.
pub fn encode_decimal_payload(value: &BigRational) -> Vec<u8> {
    let numer = value.numer().to_signed_bytes_be();
    let denom = value.denom().to_signed_bytes_be();
    let width = numer.len().max(denom.len());
    let mut payload = Vec::with_capacity(width * 2);
    extend_padded(&mut payload, &numer, width, value.numer().is_negative());
    extend_padded(&mut payload, &denom, width, false);
    payload
}

fn extend_padded(out: &mut Vec<u8>, bytes: &[u8], width: usize, negative: bool) {
    let fill = if negative { 0xff } else { 0x00 };
    out.resize(out.len() + width - bytes.len(), fill);
    out.extend_from_slice(bytes);
}

/// Split a decimal payload at its midpoint and rebuild the rational.
pub fn decode_decimal_payload(payload: &[u8]) -> Result<BigRational> {
    if payload.is_empty() || payload.len() % 2 != 0 {
        return Err(Error::malformed(format!(
            "decimal payload length {} is not a positive even number",
            payload.len()
        )));
    }
    let mid = payload.len() / 2;
    let numer = BigInt::from_signed_bytes_be(&payload[..mid]);
    let denom = BigInt::from_signed_bytes_be(&payload[mid..]);
    if denom.is_zero() {
        return Err(Error::malformed("decimal payload has zero denominator"));
    }
    Ok(BigRational::new(numer, denom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Structured;
    use indexmap::indexmap;
    use num_traits::One;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_untagged_cells() {
        assert_eq!(
            encode_storage(&Value::from("hello")),
            StorageCell::Text("hello".to_string())
        );
        assert_eq!(encode_storage(&Value::from(-3i64)), StorageCell::Int(-3));
    }

    #[test]
    fn test_boolean_blob() {
        assert_eq!(
            encode_storage(&Value::from(true)),
            StorageCell::Blob(vec![0x00, 0x01])
        );
        assert_eq!(
            encode_storage(&Value::from(false)),
            StorageCell::Blob(vec![0x00, 0x00])
        );
        assert_eq!(
            decode_storage(&StorageCell::Blob(vec![0x00, 0x01])).unwrap(),
            Value::from(true)
        );
    }

    #[test]
    fn test_decimal_round_trip() {
        let big = BigRational::new(
            BigInt::from(10u32).pow(60) + BigInt::one(),
            BigInt::from(10u32).pow(45) + BigInt::from(7),
        );
        for value in [
            ratio(1, 3),
            ratio(-1, 3),
            ratio(3, 2),
            ratio(0, 1),
            ratio(-255, 256),
            ratio(i64::MAX, 1),
            big,
        ] {
            let cell = encode_storage(&Value::Decimal(value.clone()));
            assert_eq!(
                decode_storage(&cell).unwrap(),
                Value::Decimal(value.clone()),
                "value {}",
                value
            );
        }
    }

    #[test]
    fn test_decimal_payload_layout() {
        // 1/3: numerator 0x01, denominator 0x03, already equal length.
        assert_eq!(encode_decimal_payload(&ratio(1, 3)), vec![0x01, 0x03]);
        // 1/256: denominator needs two bytes, numerator zero-padded.
        assert_eq!(
            encode_decimal_payload(&ratio(1, 256)),
            vec![0x00, 0x01, 0x01, 0x00]
        );
        // -1/256: negative numerator sign-padded with 0xff.
        assert_eq!(
            encode_decimal_payload(&ratio(-1, 256)),
            vec![0xff, 0xff, 0x01, 0x00]
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let value = Value::Structured(Structured::Map(indexmap! {
            "a".to_string() => Value::decimal(1, 3),
            "b".to_string() => Value::from(vec![1u8, 2, 3]),
        }));
        assert_eq!(encode_storage(&value), encode_storage(&value));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        // Unknown tag.
        assert!(matches!(
            decode_storage(&StorageCell::Blob(vec![0x09, 0x00])),
            Err(Error::UnknownStorageTag(0x09))
        ));
        // Empty blob.
        assert!(decode_storage(&StorageCell::Blob(vec![])).is_err());
        // Odd-length decimal payload.
        assert!(decode_storage(&StorageCell::Blob(vec![TAG_DECIMAL, 1, 2, 3])).is_err());
        // Zero denominator.
        assert!(decode_storage(&StorageCell::Blob(vec![TAG_DECIMAL, 1, 0])).is_err());
        // Oversized boolean payload.
        assert!(decode_storage(&StorageCell::Blob(vec![TAG_BOOLEAN, 1, 1])).is_err());
    }

    #[test]
    fn test_structured_blob_round_trip() {
        let value = Value::Structured(Structured::Seq(vec![
            Value::from("x"),
            Value::decimal(1, 3),
            Value::Structured(Structured::Map(indexmap! {
                "inner".to_string() => Value::from(false),
            })),
        ]));
        let cell = encode_storage(&value);
        if let StorageCell::Blob(blob) = &cell {
            assert_eq!(blob[0], TAG_STRUCTURED);
        } else {
            panic!("structured value must encode to a blob");
        }
        assert_eq!(decode_storage(&cell).unwrap(), value);
    }
}
