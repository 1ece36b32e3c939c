//! `Variant` extended with two structural kinds (Array, Object) and a
//! recursive access/mutation API.

use crate::error::{Error, Result, TypeError};
use crate::map::InsertOrderedMap;
use crate::variant::{self, Variant};
use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::trace;

/// Discriminant over all ten kinds a [`DynamicData`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Double,
    Pointer,
    String,
    Array,
    Object,
}

impl Kind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Pointer => "pointer",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<variant::Kind> for Kind {
    fn from(k: variant::Kind) -> Self {
        match k {
            variant::Kind::Null => Kind::Null,
            variant::Kind::Bool => Kind::Bool,
            variant::Kind::Int => Kind::Int,
            variant::Kind::Uint => Kind::Uint,
            variant::Kind::Float => Kind::Float,
            variant::Kind::Double => Kind::Double,
            variant::Kind::Pointer => Kind::Pointer,
            variant::Kind::String => Kind::String,
        }
    }
}

#[derive(Debug, Clone)]
enum Content {
    Scalar(Variant),
    Array(Vec<DynamicData>),
    Object(InsertOrderedMap<String, DynamicData>),
}

/// Dynamic container for all sorts of data: can hold any scalar as well as
/// arrays and objects.
///
/// Custom types are expected to go through the [`Serializable`] adapter
/// rather than being stored directly — there is no escape hatch for
/// arbitrary Rust types here, only the ten kinds the format understands.
#[derive(Debug, Clone)]
pub struct DynamicData {
    name: Option<String>,
    content: Content,
}

impl Default for DynamicData {
    /// Constructs a `Null` value.
    fn default() -> Self {
        Self {
            name: None,
            content: Content::Scalar(Variant::Null),
        }
    }
}

fn type_error(kind: Kind, operation: &'static str) -> Error {
    Error::Type(TypeError {
        kind: kind.as_str(),
        operation,
    })
}

impl DynamicData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs an empty Array.
    pub fn array() -> Self {
        Self {
            name: None,
            content: Content::Array(Vec::new()),
        }
    }

    /// Constructs an empty Object.
    pub fn object() -> Self {
        Self {
            name: None,
            content: Content::Object(InsertOrderedMap::new()),
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.content {
            Content::Scalar(v) => v.kind().into(),
            Content::Array(_) => Kind::Array,
            Content::Object(_) => Kind::Object,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.content, Content::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.content, Content::Object(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.content, Content::Scalar(Variant::Null))
    }

    /// Member/key used to reach this value from its parent Object, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Element count for Array/Object; `0` for any other kind.
    pub fn count(&self) -> usize {
        match &self.content {
            Content::Array(v) => v.len(),
            Content::Object(m) => m.len(),
            Content::Scalar(_) => 0,
        }
    }

    fn scalar(&self) -> Option<&Variant> {
        match &self.content {
            Content::Scalar(v) => Some(v),
            _ => None,
        }
    }

    fn promote_to_object(&mut self) {
        if self.is_null() {
            self.content = Content::Object(InsertOrderedMap::new());
        }
    }

    fn promote_to_array(&mut self) {
        if self.is_null() {
            self.content = Content::Array(Vec::new());
        }
    }

    // -- scalar conversions, delegated to Variant -------------------------

    pub fn as_bool(&self) -> Result<bool> {
        self.scalar()
            .map(Variant::as_bool)
            .ok_or_else(|| type_error(self.kind(), "convert to bool"))
    }

    pub fn as_int(&self) -> Result<i64> {
        self.scalar()
            .ok_or_else(|| type_error(self.kind(), "convert to int"))?
            .as_int()
    }

    pub fn as_double(&self) -> Result<f64> {
        self.scalar()
            .ok_or_else(|| type_error(self.kind(), "convert to double"))?
            .as_double()
    }

    pub fn as_string(&self) -> Result<String> {
        self.scalar()
            .map(Variant::as_string)
            .ok_or_else(|| type_error(self.kind(), "convert to string"))
    }

    pub fn as_pointer(&self) -> Result<usize> {
        self.scalar()
            .ok_or_else(|| type_error(self.kind(), "convert to pointer"))?
            .as_pointer()
    }

    // -- object member access ---------------------------------------------

    /// Const lookup by key. `MemberNotExisting` if absent, `TypeError` if
    /// this value is not an Object.
    pub fn get(&self, key: &str) -> Result<&DynamicData> {
        match &self.content {
            Content::Object(m) => m.get(key).ok_or_else(|| Error::member_not_existing(key)),
            _ => Err(type_error(self.kind(), "index by key")),
        }
    }

    /// Mutable lookup, auto-vivifying: promotes `Null` to Object, and
    /// inserts a `Null` child named `key` the first time it's referenced.
    pub fn get_or_insert(&mut self, key: &str) -> Result<&mut DynamicData> {
        self.promote_to_object();
        match &mut self.content {
            Content::Object(m) => {
                if !m.contains_key(key) {
                    let mut child = DynamicData::default();
                    child.name = Some(key.to_string());
                    m.insert(key.to_string(), child);
                }
                Ok(m.get_mut(key).expect("just inserted"))
            }
            _ => Err(type_error(self.kind(), "index by key")),
        }
    }

    /// Const lookup by position. `OutOfRange` if out of bounds, `TypeError`
    /// if this value is not an Array.
    pub fn get_index(&self, index: usize) -> Result<&DynamicData> {
        match &self.content {
            Content::Array(v) => v.get(index).ok_or(Error::OutOfRange {
                index,
                length: v.len(),
            }),
            _ => Err(type_error(self.kind(), "index by position")),
        }
    }

    /// Mutable lookup by position. Promotes `Null` to Array, then
    /// bounds-checks — insertion happens only through [`Self::add`].
    pub fn get_index_mut(&mut self, index: usize) -> Result<&mut DynamicData> {
        self.promote_to_array();
        match &mut self.content {
            Content::Array(v) => {
                let length = v.len();
                v.get_mut(index).ok_or(Error::OutOfRange { index, length })
            }
            _ => Err(type_error(self.kind(), "index by position")),
        }
    }

    /// Appends to the Array (promoting `Null` first). `TypeError` on any
    /// other kind.
    pub fn add(&mut self, value: DynamicData) -> Result<&mut Self> {
        self.promote_to_array();
        match &mut self.content {
            Content::Array(v) => {
                v.push(value);
                Ok(self)
            }
            _ => Err(type_error(self.kind(), "add element to")),
        }
    }

    /// Inserts or replaces an Object member, preserving insertion order on
    /// replace (promoting `Null` first). `TypeError` on any other kind.
    pub fn add_member(&mut self, key: impl Into<String>, mut value: DynamicData) -> Result<&mut Self> {
        self.promote_to_object();
        let key = key.into();
        match &mut self.content {
            Content::Object(m) => {
                value.name = Some(key.clone());
                m.insert(key, value);
                Ok(self)
            }
            _ => Err(type_error(self.kind(), "add member to")),
        }
    }

    /// Removes the element at `index`. Array only.
    pub fn remove_at(&mut self, index: usize) -> Result<DynamicData> {
        match &mut self.content {
            Content::Array(v) => {
                if index >= v.len() {
                    return Err(Error::OutOfRange {
                        index,
                        length: v.len(),
                    });
                }
                Ok(v.remove(index))
            }
            _ => Err(type_error(self.kind(), "remove element from")),
        }
    }

    /// Removes a named member. Object only. No-op if the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        match &mut self.content {
            Content::Object(m) => {
                m.remove(key);
                Ok(())
            }
            _ => Err(type_error(self.kind(), "remove member from")),
        }
    }

    pub fn member_exists(&self, key: &str) -> Result<bool> {
        match &self.content {
            Content::Object(m) => Ok(m.contains_key(key)),
            _ => Err(type_error(self.kind(), "check member existence on")),
        }
    }

    /// Member names in insertion order. Object only.
    pub fn member_names(&self) -> Result<Vec<String>> {
        match &self.content {
            Content::Object(m) => Ok(m.keys().cloned().collect()),
            _ => Err(type_error(self.kind(), "list members of")),
        }
    }

    /// Convenience wrapper around [`Self::member_names`] for callers who'd
    /// rather get an empty list than handle `TypeError`. Not part of the
    /// original contract; kept small and explicitly documented as such.
    pub fn member_names_or_empty(&self) -> Vec<String> {
        self.member_names().unwrap_or_default()
    }

    /// Array elements in order. Array only.
    pub fn items(&self) -> Result<&[DynamicData]> {
        match &self.content {
            Content::Array(v) => Ok(v),
            _ => Err(type_error(self.kind(), "iterate elements of")),
        }
    }

    /// Object members as `(key, value)` pairs in insertion order.
    pub fn members(&self) -> Result<impl Iterator<Item = (&str, &DynamicData)>> {
        match &self.content {
            Content::Object(m) => Ok(m.iter().map(|(k, v)| (k.as_str(), v))),
            _ => Err(type_error(self.kind(), "iterate members of")),
        }
    }

    /// Drops all children and resets this value to `Null`.
    pub fn clear(&mut self) {
        self.content = Content::Scalar(Variant::Null);
    }

    /// Tries to assign the value at `index` into `lvalue`; returns `false`
    /// (leaving `lvalue` untouched) on any failure.
    pub fn try_assign(&self, lvalue: &mut DynamicData, index: impl DynIndex) -> bool {
        match index.resolve(self) {
            Ok(v) => {
                *lvalue = v.clone();
                true
            }
            Err(_) => false,
        }
    }

    /// Returns the value at `index`, or `default` on any failure.
    pub fn try_get(&self, index: impl DynIndex, default: DynamicData) -> DynamicData {
        index.resolve(self).cloned().unwrap_or(default)
    }
}

impl PartialEq for DynamicData {
    /// Structural deep equality: same kind, same scalar value, and (for
    /// Array/Object) the same ordered children. The `name` field is
    /// positional metadata, not part of a value's identity, and is ignored.
    fn eq(&self, other: &Self) -> bool {
        match (&self.content, &other.content) {
            (Content::Scalar(a), Content::Scalar(b)) => a == b,
            (Content::Array(a), Content::Array(b)) => a == b,
            (Content::Object(a), Content::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DynamicData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::encode::encode(self, &crate::encode::EncodeOptions::default()) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "<unencodable {} value>", self.kind()),
        }
    }
}

impl Index<&str> for DynamicData {
    type Output = DynamicData;

    fn index(&self, key: &str) -> &DynamicData {
        self.get(key).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl IndexMut<&str> for DynamicData {
    fn index_mut(&mut self, key: &str) -> &mut DynamicData {
        self.get_or_insert(key).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Index<usize> for DynamicData {
    type Output = DynamicData;

    fn index(&self, index: usize) -> &DynamicData {
        self.get_index(index).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl IndexMut<usize> for DynamicData {
    fn index_mut(&mut self, index: usize) -> &mut DynamicData {
        self.get_index_mut(index).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Into<Variant>> From<T> for DynamicData {
    fn from(value: T) -> Self {
        let variant = value.into();
        trace!(kind = ?variant.kind(), "constructing DynamicData scalar");
        Self {
            name: None,
            content: Content::Scalar(variant),
        }
    }
}

/// An index type usable with [`DynamicData::try_get`]/[`DynamicData::try_assign`].
///
/// Implemented for `&str` (object member lookup) and `usize` (array element
/// lookup); the generic `TryGet`/`TryAssign` template of the original
/// design becomes this small sealed-by-convention trait in Rust.
pub trait DynIndex {
    fn resolve<'a>(&self, data: &'a DynamicData) -> Result<&'a DynamicData>;
}

impl DynIndex for &str {
    fn resolve<'a>(&self, data: &'a DynamicData) -> Result<&'a DynamicData> {
        data.get(self)
    }
}

impl DynIndex for usize {
    fn resolve<'a>(&self, data: &'a DynamicData) -> Result<&'a DynamicData> {
        data.get_index(*self)
    }
}

/// Interface for data objects that are able to convert to/from
/// [`DynamicData`]. The core defines only the trait; concrete adapters are
/// user code.
pub trait Serializable {
    fn to_data(&self) -> DynamicData;
    fn from_data(&mut self, data: &DynamicData) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        assert_eq!(DynamicData::new().kind(), Kind::Null);
    }

    #[test]
    fn promotion_on_string_index() {
        let mut d = DynamicData::new();
        d["a"] = 1i64.into();
        d["b"] = 2i64.into();
        assert_eq!(d.kind(), Kind::Object);
        assert_eq!(d.member_names().unwrap(), vec!["a", "b"]);
        assert_eq!(d["a"].as_int().unwrap(), 1);
    }

    #[test]
    fn promotion_on_integer_index_requires_add() {
        let mut d = DynamicData::new();
        d.add(1i64.into()).unwrap();
        d.add(2i64.into()).unwrap();
        assert_eq!(d.kind(), Kind::Array);
        assert_eq!(d.count(), 2);
        assert_eq!(d[0].as_int().unwrap(), 1);
    }

    #[test]
    fn const_get_on_absent_key_fails_member_not_existing() {
        let mut d = DynamicData::object();
        d.add_member("x", 1i64.into()).unwrap();
        match d.get("y") {
            Err(Error::MemberNotExisting(k)) => assert_eq!(k, "y"),
            other => panic!("expected MemberNotExisting, got {other:?}"),
        }
    }

    #[test]
    fn type_errors_on_wrong_kind_access() {
        let d = DynamicData::from(42i64);
        assert!(matches!(d.get("x"), Err(Error::Type(_))));
        let o = DynamicData::object();
        assert!(matches!(o.get_index(0), Err(Error::Type(_))));
    }

    #[test]
    fn out_of_range_array_access() {
        let mut d = DynamicData::array();
        d.add(1i64.into()).unwrap();
        match d.get_index(5) {
            Err(Error::OutOfRange { index, length }) => {
                assert_eq!(index, 5);
                assert_eq!(length, 1);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn remove_and_readd_preserves_insertion_semantics() {
        let mut d = DynamicData::object();
        d.add_member("a", 1i64.into()).unwrap();
        d.add_member("b", 2i64.into()).unwrap();
        d.add_member("c", 3i64.into()).unwrap();
        d.remove("b").unwrap();
        assert_eq!(d.member_names().unwrap(), vec!["a", "c"]);
        d.add_member("b", 4i64.into()).unwrap();
        assert_eq!(d.member_names().unwrap(), vec!["a", "c", "b"]);
    }

    #[test]
    fn structural_equality() {
        let mut a = DynamicData::object();
        a.add_member("x", 1i64.into()).unwrap();
        let mut b = DynamicData::object();
        b.add_member("x", 1i64.into()).unwrap();
        assert_eq!(a, b);

        b.add_member("x", 2i64.into()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn try_get_and_try_assign() {
        let mut d = DynamicData::object();
        d.add_member("x", 7i64.into()).unwrap();

        let present = d.try_get("x", DynamicData::from(0i64));
        assert_eq!(present.as_int().unwrap(), 7);
        let missing = d.try_get("y", DynamicData::from(-1i64));
        assert_eq!(missing.as_int().unwrap(), -1);

        let mut lvalue = DynamicData::new();
        assert!(d.try_assign(&mut lvalue, "x"));
        assert_eq!(lvalue.as_int().unwrap(), 7);
        assert!(!d.try_assign(&mut lvalue, "missing"));
    }

    #[test]
    fn clear_resets_to_null() {
        let mut d = DynamicData::object();
        d.add_member("x", 1i64.into()).unwrap();
        d.clear();
        assert!(d.is_null());
        assert_eq!(d.count(), 0);
    }
}
