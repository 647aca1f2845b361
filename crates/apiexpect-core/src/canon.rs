//! Canonical form used by every equality and containment check.
//!
//! Any `Serialize` value is turned into a JSON tree in which:
//!
//! - every number is stored as `f64`
//! - structs and maps become string-keyed objects
//! - `None` and unit become `null`
//!
//! Two values are equal when their canonical trees are structurally equal.
//! Numbers are compared exactly, without any tolerance.

use serde::ser::{self, Impossible};
use serde::Serialize;
use serde_json::{Map, Number as JsonNumber, Value as Json};

use crate::chain::Chain;
use crate::error::{CanonError, CanonResult};

/// Returns a human-readable name for the kind of a JSON value.
#[must_use]
pub fn kind_of(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Rewrites every number in `value` as an `f64`-backed number.
///
/// Applying it twice yields the same tree as applying it once.
#[must_use]
pub fn normalize(value: Json) -> Json {
    match value {
        Json::Number(n) => Json::Number(float_number(n)),
        Json::Array(items) => Json::Array(items.into_iter().map(normalize).collect()),
        Json::Object(map) => Json::Object(
            map.into_iter()
                .map(|(key, item)| (key, normalize(item)))
                .collect(),
        ),
        other => other,
    }
}

fn float_number(n: JsonNumber) -> JsonNumber {
    n.as_f64().and_then(JsonNumber::from_f64).unwrap_or(n)
}

/// Converts any serializable value to canonical form.
///
/// # Example
///
/// ```
/// use apiexpect_core::canonicalize;
///
/// let a = canonicalize(&123_i32).unwrap();
/// let b = canonicalize(&123.0_f64).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> CanonResult<Json> {
    Ok(normalize(serde_json::to_value(value)?))
}

/// Converts a numeric scalar of any width to `f64`.
///
/// Non-finite floats are kept as they are; they have no JSON form and
/// never go through the JSON tree.
pub fn canonicalize_number<T: Serialize + ?Sized>(value: &T) -> CanonResult<f64> {
    value.serialize(NumberSerializer)
}

/// Converts a map-like value (a map or a struct) to a canonical object.
pub fn canonicalize_map<T: Serialize + ?Sized>(value: &T) -> CanonResult<Map<String, Json>> {
    match canonicalize(value)? {
        Json::Object(map) => Ok(map),
        // nil maps compare as empty
        Json::Null => Ok(Map::new()),
        other => Err(CanonError::unexpected_kind("object", kind_of(&other))),
    }
}

/// Converts a sequence-like value to a canonical array.
pub fn canonicalize_array<T: Serialize + ?Sized>(value: &T) -> CanonResult<Vec<Json>> {
    match canonicalize(value)? {
        Json::Array(items) => Ok(items),
        Json::Null => Ok(Vec::new()),
        other => Err(CanonError::unexpected_kind("array", kind_of(&other))),
    }
}

/// Converts every item of an iterator to canonical form.
pub fn canonicalize_all<I>(values: I) -> CanonResult<Vec<Json>>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    values.into_iter().map(|value| canonicalize(&value)).collect()
}

/// Accepts numeric scalars only, reporting the kind of anything else.
struct NumberSerializer;

fn not_a_number<R>(kind: &'static str) -> CanonResult<R> {
    Err(CanonError::NotANumber { kind })
}

#[allow(clippy::cast_precision_loss)]
impl ser::Serializer for NumberSerializer {
    type Ok = f64;
    type Error = CanonError;
    type SerializeSeq = Impossible<f64, CanonError>;
    type SerializeTuple = Impossible<f64, CanonError>;
    type SerializeTupleStruct = Impossible<f64, CanonError>;
    type SerializeTupleVariant = Impossible<f64, CanonError>;
    type SerializeMap = Impossible<f64, CanonError>;
    type SerializeStruct = Impossible<f64, CanonError>;
    type SerializeStructVariant = Impossible<f64, CanonError>;

    fn serialize_bool(self, _v: bool) -> CanonResult<f64> {
        not_a_number("boolean")
    }

    fn serialize_i8(self, v: i8) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_i16(self, v: i16) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_i32(self, v: i32) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_i64(self, v: i64) -> CanonResult<f64> {
        Ok(v as f64)
    }

    fn serialize_i128(self, v: i128) -> CanonResult<f64> {
        Ok(v as f64)
    }

    fn serialize_u8(self, v: u8) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_u16(self, v: u16) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_u32(self, v: u32) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_u64(self, v: u64) -> CanonResult<f64> {
        Ok(v as f64)
    }

    fn serialize_u128(self, v: u128) -> CanonResult<f64> {
        Ok(v as f64)
    }

    fn serialize_f32(self, v: f32) -> CanonResult<f64> {
        Ok(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> CanonResult<f64> {
        Ok(v)
    }

    fn serialize_char(self, _v: char) -> CanonResult<f64> {
        not_a_number("string")
    }

    fn serialize_str(self, _v: &str) -> CanonResult<f64> {
        not_a_number("string")
    }

    fn serialize_bytes(self, _v: &[u8]) -> CanonResult<f64> {
        not_a_number("array")
    }

    fn serialize_none(self) -> CanonResult<f64> {
        not_a_number("null")
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> CanonResult<f64> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> CanonResult<f64> {
        not_a_number("null")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> CanonResult<f64> {
        not_a_number("null")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> CanonResult<f64> {
        not_a_number("string")
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> CanonResult<f64> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> CanonResult<f64> {
        not_a_number("object")
    }

    fn serialize_seq(self, _len: Option<usize>) -> CanonResult<Self::SerializeSeq> {
        not_a_number("array")
    }

    fn serialize_tuple(self, _len: usize) -> CanonResult<Self::SerializeTuple> {
        not_a_number("array")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> CanonResult<Self::SerializeTupleStruct> {
        not_a_number("array")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> CanonResult<Self::SerializeTupleVariant> {
        not_a_number("object")
    }

    fn serialize_map(self, _len: Option<usize>) -> CanonResult<Self::SerializeMap> {
        not_a_number("object")
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> CanonResult<Self::SerializeStruct> {
        not_a_number("object")
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> CanonResult<Self::SerializeStructVariant> {
        not_a_number("object")
    }
}

/// Pretty-prints a value for failure messages.
pub(crate) fn dump(value: &Json) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Records a canonicalization error on the chain.
pub(crate) fn on_chain<R>(chain: &mut Chain, result: CanonResult<R>) -> Option<R> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            chain.fail(format_args!("{err}"));
            None
        }
    }
}

pub(crate) fn canon_value<T: Serialize + ?Sized>(chain: &mut Chain, value: &T) -> Option<Json> {
    on_chain(chain, canonicalize(value))
}

pub(crate) fn canon_number<T: Serialize + ?Sized>(chain: &mut Chain, value: &T) -> Option<f64> {
    on_chain(chain, canonicalize_number(value))
}

pub(crate) fn canon_map<T: Serialize + ?Sized>(
    chain: &mut Chain,
    value: &T,
) -> Option<Map<String, Json>> {
    on_chain(chain, canonicalize_map(value))
}

pub(crate) fn canon_array<T: Serialize + ?Sized>(chain: &mut Chain, value: &T) -> Option<Vec<Json>> {
    on_chain(chain, canonicalize_array(value))
}

pub(crate) fn canon_all<I>(chain: &mut Chain, values: I) -> Option<Vec<Json>>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    on_chain(chain, canonicalize_all(values))
}

/// Multiset equality: same elements with the same multiplicity, in any order.
pub(crate) fn same_elements(actual: &[Json], expected: &[Json]) -> bool {
    if actual.len() != expected.len() {
        return false;
    }
    let mut used = vec![false; actual.len()];
    for item in expected {
        let slot = actual
            .iter()
            .enumerate()
            .position(|(i, candidate)| !used[i] && candidate == item);
        match slot {
            Some(i) => used[i] = true,
            None => return false,
        }
    }
    true
}

/// Returns true if `inner` is a recursive subset of `outer`.
///
/// Objects match when every key of `inner` is present in `outer` with a
/// matching value. Arrays match element-wise and must have equal length.
/// Scalars must be equal.
pub(crate) fn contains_subset(outer: &Json, inner: &Json) -> bool {
    match (outer, inner) {
        (Json::Object(outer), Json::Object(inner)) => inner.iter().all(|(key, value)| {
            outer
                .get(key)
                .is_some_and(|candidate| contains_subset(candidate, value))
        }),
        (Json::Array(outer), Json::Array(inner)) => {
            outer.len() == inner.len()
                && outer
                    .iter()
                    .zip(inner)
                    .all(|(candidate, value)| contains_subset(candidate, value))
        }
        _ => outer == inner,
    }
}
