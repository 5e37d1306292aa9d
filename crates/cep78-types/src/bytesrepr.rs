//! Binary value format.
//!
//! Integers are little-endian; `U512` is a one-byte magnitude length followed
//! by the minimal little-endian magnitude. Strings, lists and maps carry a
//! 4-byte little-endian length or count prefix. Values whose declared type is
//! [`ClType::Any`] are written self-describing in the ledger's value envelope:
//! `u32` byte length, the untagged value, then its type descriptor.
//!
//! Decoding consumes exactly the bytes belonging to the declared type and
//! hands back the remainder, so concatenated values can be walked one by one.

use primitive_types::U512;

use crate::cl_type::ClType;
use crate::errors::DecodeError;
use crate::key::Key;
use crate::value::ClValue;

/// Maximum nesting of type descriptors and values the decoder follows.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Upper bound on the element count of collections whose elements encode to zero bytes.
const ZERO_WIDTH_ELEMENT_LIMIT: usize = 1024;

const U512_MAX_BYTES: usize = 64;

/// Cursor over an input buffer.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn into_remainder(self) -> &'a [u8] {
        self.bytes
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.bytes.len() < n {
            return Err(DecodeError::UnexpectedEndOfInput {
                needed: n,
                remaining: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    pub(crate) fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u32()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|e| DecodeError::invalid("String", e.to_string()))
    }

    /// Reads a collection count and checks the input can hold that many elements.
    fn count(&mut self, min_element_len: usize) -> Result<usize, DecodeError> {
        let count = self.u32()? as usize;
        if min_element_len == 0 {
            if count > ZERO_WIDTH_ELEMENT_LIMIT {
                return Err(DecodeError::invalid(
                    "collection",
                    format!("{} zero-width elements exceed the limit", count),
                ));
            }
        } else if count.saturating_mul(min_element_len) > self.remaining() {
            return Err(DecodeError::UnexpectedEndOfInput {
                needed: count.saturating_mul(min_element_len),
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }
}

pub(crate) fn write_u32(value: u32, out: &mut Vec<u8>) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_string(value: &str, out: &mut Vec<u8>) {
    write_u32(value.len() as u32, out);
    out.extend_from_slice(value.as_bytes());
}

fn write_u512(value: &U512, out: &mut Vec<u8>) {
    let mut le = [0u8; U512_MAX_BYTES];
    value.to_little_endian(&mut le);
    let len = le.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    out.push(len as u8);
    out.extend_from_slice(&le[..len]);
}

/// Encodes `value` under `declared`.
///
/// Only [`ClType::Any`] changes the output (the value is wrapped in its
/// envelope); every other declared type writes the value's own untagged
/// encoding.
pub fn encode(value: &ClValue, declared: &ClType, out: &mut Vec<u8>) {
    if *declared == ClType::Any {
        let body = to_bytes(value);
        write_u32(body.len() as u32, out);
        out.extend_from_slice(&body);
        value.cl_type().write_bytes(out);
        return;
    }
    match value {
        ClValue::Bool(v) => out.push(u8::from(*v)),
        ClValue::U8(v) => out.push(*v),
        ClValue::U32(v) => write_u32(*v, out),
        ClValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        ClValue::U512(v) => write_u512(v, out),
        ClValue::String(v) => write_string(v, out),
        ClValue::Key(key) => key.write_bytes(out),
        ClValue::ByteArray(bytes) => out.extend_from_slice(bytes),
        ClValue::Option { inner, value } => match value {
            Some(v) => {
                out.push(1);
                encode(v, inner, out);
            }
            None => out.push(0),
        },
        ClValue::List { item, items } => {
            write_u32(items.len() as u32, out);
            for element in items {
                encode(element, item, out);
            }
        }
        ClValue::Map {
            key,
            value,
            entries,
        } => {
            write_u32(entries.len() as u32, out);
            for (k, v) in entries {
                encode(k, key, out);
                encode(v, value, out);
            }
        }
    }
}

/// Untagged encoding of `value` under its own type.
pub fn to_bytes(value: &ClValue) -> Vec<u8> {
    let mut out = Vec::new();
    encode(value, &value.cl_type(), &mut out);
    out
}

/// Self-describing encoding of `value`: `u32` length, value bytes, type
/// descriptor.
pub fn to_tagged_bytes(value: &ClValue) -> Vec<u8> {
    let mut out = Vec::new();
    encode(value, &ClType::Any, &mut out);
    out
}

/// Decodes a value of the declared type, returning it with the remainder.
///
/// Passing [`ClType::Any`] reads the self-describing form.
pub fn from_bytes<'a>(bytes: &'a [u8], ty: &ClType) -> Result<(ClValue, &'a [u8]), DecodeError> {
    let mut reader = Reader::new(bytes);
    let value = decode(&mut reader, ty, 0)?;
    Ok((value, reader.into_remainder()))
}

/// Decodes the self-describing form and checks it announces `expected`.
///
/// Fails with [`DecodeError::TypeMismatch`] when the descriptor names another
/// type. `expected` may be [`ClType::Any`] to accept whatever is encoded.
/// Bytes after the descriptor are returned untouched; dictionary writes
/// carry the seed address and item key there.
pub fn from_tagged_bytes<'a>(
    bytes: &'a [u8],
    expected: &ClType,
) -> Result<(ClValue, &'a [u8]), DecodeError> {
    let mut reader = Reader::new(bytes);
    let (found, value) = read_envelope(&mut reader, 0)?;
    if *expected != ClType::Any && found != *expected {
        return Err(DecodeError::TypeMismatch {
            expected: expected.clone(),
            found,
        });
    }
    Ok((value, reader.into_remainder()))
}

fn read_envelope(reader: &mut Reader<'_>, depth: usize) -> Result<(ClType, ClValue), DecodeError> {
    let len = reader.u32()? as usize;
    let body = reader.take(len)?;
    let ty = ClType::read(reader, depth)?;
    if ty == ClType::Any {
        return Err(DecodeError::invalid(
            "Any",
            "self-describing value declares type Any",
        ));
    }
    let mut body = Reader::new(body);
    let value = decode(&mut body, &ty, depth)?;
    if body.remaining() != 0 {
        return Err(DecodeError::invalid(
            "envelope",
            format!("{} trailing bytes after {}", body.remaining(), ty),
        ));
    }
    Ok((ty, value))
}

fn decode(reader: &mut Reader<'_>, ty: &ClType, depth: usize) -> Result<ClValue, DecodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(DecodeError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }
    let value = match ty {
        ClType::Bool => match reader.u8()? {
            0 => ClValue::Bool(false),
            1 => ClValue::Bool(true),
            other => return Err(DecodeError::invalid("Bool", format!("byte {}", other))),
        },
        ClType::U8 => ClValue::U8(reader.u8()?),
        ClType::U32 => ClValue::U32(reader.u32()?),
        ClType::U64 => ClValue::U64(reader.u64()?),
        ClType::U512 => {
            let len = reader.u8()? as usize;
            if len > U512_MAX_BYTES {
                return Err(DecodeError::invalid(
                    "U512",
                    format!("magnitude of {} bytes", len),
                ));
            }
            ClValue::U512(U512::from_little_endian(reader.take(len)?))
        }
        ClType::String => ClValue::String(reader.string()?),
        ClType::Key => ClValue::Key(Key::read(reader)?),
        ClType::ByteArray(len) => ClValue::ByteArray(reader.take(*len as usize)?.to_vec()),
        ClType::Option(inner) => match reader.u8()? {
            0 => ClValue::none((**inner).clone()),
            1 => {
                let value = decode(reader, inner, depth + 1)?;
                ClValue::some((**inner).clone(), value)
            }
            other => {
                return Err(DecodeError::invalid(
                    "Option",
                    format!("presence byte {}", other),
                ))
            }
        },
        ClType::List(item) => {
            let count = reader.count(item.min_encoded_len())?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode(reader, item, depth + 1)?);
            }
            ClValue::list((**item).clone(), items)
        }
        ClType::Map { key, value } => {
            let count = reader.count(key.min_encoded_len() + value.min_encoded_len())?;
            let mut entries = Vec::with_capacity(count);
            for _ in 0..count {
                let k = decode(reader, key, depth + 1)?;
                let v = decode(reader, value, depth + 1)?;
                entries.push((k, v));
            }
            ClValue::map((**key).clone(), (**value).clone(), entries)
        }
        ClType::Any => read_envelope(reader, depth + 1)?.1,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u512_uses_minimal_magnitude() {
        assert_eq!(to_bytes(&ClValue::u512(0u64)), vec![0]);
        assert_eq!(to_bytes(&ClValue::u512(255u64)), vec![1, 0xff]);
        assert_eq!(to_bytes(&ClValue::u512(256u64)), vec![2, 0x00, 0x01]);
    }

    #[test]
    fn string_has_u32_length_prefix() {
        assert_eq!(to_bytes(&ClValue::from("ab")), vec![2, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn option_presence_byte() {
        assert_eq!(to_bytes(&ClValue::none(ClType::U8)), vec![0]);
        assert_eq!(to_bytes(&ClValue::some(ClType::U8, ClValue::U8(9))), vec![1, 9]);
    }

    #[test]
    fn any_typed_elements_are_tagged() {
        let map = ClValue::map(
            ClType::String,
            ClType::Any,
            vec![(ClValue::from("n"), ClValue::U8(4))],
        );
        assert_eq!(
            to_bytes(&map),
            vec![1, 0, 0, 0, 1, 0, 0, 0, b'n', 1, 0, 0, 0, 4, 3]
        );
        let bytes = to_bytes(&map);
        let (decoded, rest) = from_bytes(&bytes, &map.cl_type()).unwrap();
        assert_eq!(decoded, map);
        assert!(rest.is_empty());
    }

    #[test]
    fn remainder_allows_sequential_reads() {
        let mut bytes = to_bytes(&ClValue::U32(7));
        bytes.extend(to_bytes(&ClValue::from("x")));
        let (first, rest) = from_bytes(&bytes, &ClType::U32).unwrap();
        let (second, rest) = from_bytes(rest, &ClType::String).unwrap();
        assert_eq!(first, ClValue::U32(7));
        assert_eq!(second, ClValue::from("x"));
        assert!(rest.is_empty());
    }

    #[test]
    fn tagged_decode_reports_mismatch() {
        let bytes = to_tagged_bytes(&ClValue::U64(1));
        assert_eq!(
            from_tagged_bytes(&bytes, &ClType::String).unwrap_err(),
            DecodeError::TypeMismatch {
                expected: ClType::String,
                found: ClType::U64,
            }
        );
        let (value, _) = from_tagged_bytes(&bytes, &ClType::U64).unwrap();
        assert_eq!(value, ClValue::U64(1));
    }

    #[test]
    fn invalid_bool_byte() {
        assert!(matches!(
            from_bytes(&[2], &ClType::Bool),
            Err(DecodeError::InvalidValue { kind: "Bool", .. })
        ));
    }

    #[test]
    fn oversized_u512_length() {
        let mut bytes = vec![65u8];
        bytes.extend(vec![1u8; 65]);
        assert!(matches!(
            from_bytes(&bytes, &ClType::U512),
            Err(DecodeError::InvalidValue { kind: "U512", .. })
        ));
    }

    #[test]
    fn huge_count_fails_before_allocating() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 1, 2];
        assert!(matches!(
            from_bytes(&bytes, &ClType::list(ClType::U64)),
            Err(DecodeError::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn zero_width_elements_are_bounded() {
        let bytes = [0xff, 0xff, 0x00, 0x00];
        assert!(matches!(
            from_bytes(&bytes, &ClType::list(ClType::ByteArray(0))),
            Err(DecodeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn nested_any_is_rejected() {
        assert!(matches!(
            from_bytes(&[0, 0, 0, 0, 21], &ClType::Any),
            Err(DecodeError::InvalidValue { kind: "Any", .. })
        ));
    }

    #[test]
    fn envelope_layout() {
        let bytes = to_tagged_bytes(&ClValue::U64(1));
        assert_eq!(bytes, vec![8, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 5]);
        let (value, rest) = from_tagged_bytes(&bytes, &ClType::Any).unwrap();
        assert_eq!(value, ClValue::U64(1));
        assert!(rest.is_empty());
    }

    #[test]
    fn envelope_rejects_trailing_body_bytes() {
        let bytes = [2, 0, 0, 0, 7, 7, 3];
        assert!(matches!(
            from_tagged_bytes(&bytes, &ClType::Any),
            Err(DecodeError::InvalidValue { kind: "envelope", .. })
        ));
    }

    #[test]
    fn bytes_after_envelope_are_left_over() {
        let mut bytes = to_tagged_bytes(&ClValue::from("x"));
        bytes.extend_from_slice(&[0xaa; 32]);
        let (value, rest) = from_tagged_bytes(&bytes, &ClType::String).unwrap();
        assert_eq!(value, ClValue::from("x"));
        assert_eq!(rest, &[0xaa; 32][..]);
    }
}
