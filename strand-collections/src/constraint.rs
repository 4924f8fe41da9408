//! Runtime type tags that keep a collection homogeneous.
//!
//! A collection that accepts values of more than one Rust type (most often
//! `serde_json::Value`, or an enum of domain objects) can still promise that
//! everything it holds has one declared shape. The shape is a [`TypeTag`]:
//! either a keyword from a fixed vocabulary or a fully qualified type path.
//!
//! ```text
//! array | object | bool | int | float | string | callable | a::b::Type
//! ```
//!
//! A [`TypeConstraint`] holds one tag per role (item, or key and value). Each
//! tag is set once, normally right after construction, and cannot be changed
//! afterwards; an absent tag means the role is untyped. The owning collection
//! calls the matching `check_*` method before it touches its structure, so a
//! rejected value never leaves a partial mutation behind.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use strand_collections::TypeConstraint;
//!
//! let constraint = TypeConstraint::for_items(Some("int")).unwrap();
//!
//! assert!(constraint.check_item(&json!(42)).is_ok());
//!
//! let err = constraint.check_item(&json!("42")).unwrap_err();
//! assert_eq!(err.to_string(), r#"item must be of type int, string given: String("42")"#);
//! ```

use core::fmt;
use core::str::FromStr;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::Value;

/// Value category used by keyword tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Sequences and maps.
    Array,
    /// Structured domain objects.
    Object,
    /// Booleans.
    Bool,
    /// Integers of any width.
    Int,
    /// Floating point numbers.
    Float,
    /// Strings and characters.
    String,
    /// Wrapped functions, see [`Callable`].
    Callable,
    /// The absence of a value. Never a valid tag keyword.
    Null,
}

impl Kind {
    /// Kinds that may appear as a keyword tag.
    pub const KEYWORDS: [Kind; 7] = [
        Kind::Array,
        Kind::Object,
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::String,
        Kind::Callable,
    ];

    /// Returns the keyword spelling of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Callable => "callable",
            Kind::Null => "null",
        }
    }

    /// Looks up a tag keyword. `"null"` is not a keyword.
    pub fn from_keyword(word: &str) -> Option<Kind> {
        Self::KEYWORDS.into_iter().find(|kind| kind.as_str() == word)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TypeTag
// =============================================================================

/// Declared type of a collection role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// One of the scalar/callable keywords.
    Keyword(Kind),
    /// A fully qualified type or trait path, e.g. `shop::order::Order`.
    Named(String),
}

impl TypeTag {
    /// Parses a keyword or a `::`-separated type path.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvalidTag`] for anything else, including
    /// the `null` keyword.
    pub fn parse(tag: &str) -> Result<Self, ConstraintError> {
        if let Some(kind) = Kind::from_keyword(tag) {
            return Ok(TypeTag::Keyword(kind));
        }
        if tag != Kind::Null.as_str() && is_type_path(tag) {
            return Ok(TypeTag::Named(tag.to_owned()));
        }
        Err(ConstraintError::InvalidTag {
            tag: tag.to_owned(),
        })
    }

    /// Returns `true` if `value` satisfies this tag.
    pub fn accepts<V: Classify + ?Sized>(&self, value: &V) -> bool {
        match self {
            TypeTag::Keyword(kind) => value.kind() == *kind,
            TypeTag::Named(name) => value.is_instance_of(name),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Keyword(kind) => f.write_str(kind.as_str()),
            TypeTag::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for TypeTag {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypeTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TypeTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = <Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        TypeTag::parse(&tag).map_err(serde::de::Error::custom)
    }
}

fn is_type_path(path: &str) -> bool {
    !path.is_empty() && path.split("::").all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    segment != "_" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

// =============================================================================
// Classify
// =============================================================================

/// Runtime classification of a value, consumed by [`TypeTag::accepts`].
///
/// Scalars, strings, sequences, maps and `serde_json::Value` are classified
/// out of the box. Domain objects report [`Kind::Object`] and their fully
/// qualified path:
///
/// ```
/// use strand_collections::{Classify, Kind, TypeTag};
///
/// #[derive(Debug)]
/// struct Order { id: u64 }
///
/// impl Classify for Order {
///     fn kind(&self) -> Kind { Kind::Object }
///     fn type_name(&self) -> Option<&str> { Some("shop::Order") }
///     fn is_instance_of(&self, name: &str) -> bool {
///         matches!(name, "shop::Order" | "shop::Billable")
///     }
/// }
///
/// let order = Order { id: 1 };
/// assert!(TypeTag::parse("shop::Billable").unwrap().accepts(&order));
/// assert!(TypeTag::parse("object").unwrap().accepts(&order));
/// ```
pub trait Classify: fmt::Debug {
    /// Returns the value's category.
    fn kind(&self) -> Kind;

    /// Returns the fully qualified type path of an object value.
    fn type_name(&self) -> Option<&str> {
        None
    }

    /// Returns `true` if the value is, or implements, the named type.
    fn is_instance_of(&self, name: &str) -> bool {
        self.type_name() == Some(name)
    }
}

macro_rules! impl_classify {
    ($kind:expr => $($ty:ty),*) => {
        $(
            impl Classify for $ty {
                #[inline]
                fn kind(&self) -> Kind {
                    $kind
                }
            }
        )*
    };
}

impl_classify!(Kind::Bool => bool);
impl_classify!(Kind::Int => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_classify!(Kind::Float => f32, f64);
impl_classify!(Kind::String => str, String, char, Cow<'_, str>);
impl_classify!(Kind::Null => ());

impl<T: fmt::Debug> Classify for [T] {
    fn kind(&self) -> Kind {
        Kind::Array
    }
}

impl<T: fmt::Debug, const N: usize> Classify for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Array
    }
}

impl<T: fmt::Debug> Classify for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Array
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> Classify for HashMap<K, V, H> {
    fn kind(&self) -> Kind {
        Kind::Array
    }
}

impl<K: fmt::Debug, V: fmt::Debug> Classify for BTreeMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Array
    }
}

impl<T: Classify> Classify for Option<T> {
    fn kind(&self) -> Kind {
        self.as_ref().map_or(Kind::Null, Classify::kind)
    }

    fn type_name(&self) -> Option<&str> {
        self.as_ref().and_then(Classify::type_name)
    }

    fn is_instance_of(&self, name: &str) -> bool {
        self.as_ref().is_some_and(|value| value.is_instance_of(name))
    }
}

macro_rules! impl_classify_forward {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Classify + ?Sized> Classify for $wrapper<T> {
                #[inline]
                fn kind(&self) -> Kind {
                    (**self).kind()
                }

                #[inline]
                fn type_name(&self) -> Option<&str> {
                    (**self).type_name()
                }

                #[inline]
                fn is_instance_of(&self, name: &str) -> bool {
                    (**self).is_instance_of(name)
                }
            }
        )*
    };
}

impl_classify_forward!(Box, Rc);

impl<T: Classify + ?Sized> Classify for &T {
    #[inline]
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    #[inline]
    fn type_name(&self) -> Option<&str> {
        (**self).type_name()
    }

    #[inline]
    fn is_instance_of(&self, name: &str) -> bool {
        (**self).is_instance_of(name)
    }
}

/// JSON objects classify as [`Kind::Object`]; arrays as [`Kind::Array`].
/// Numbers that fit `i64`/`u64` are ints, everything else is a float.
impl Classify for Value {
    fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Kind::Int,
            Value::Number(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

/// A named function value, classified as [`Kind::Callable`].
pub struct Callable<F> {
    name: Cow<'static, str>,
    func: F,
}

impl<F> Callable<F> {
    /// Wraps `func` under a printable name.
    pub fn new(name: impl Into<Cow<'static, str>>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }

    /// Returns the printable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wrapped function.
    pub fn func(&self) -> &F {
        &self.func
    }
}

impl<F> fmt::Debug for Callable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").field(&self.name).finish()
    }
}

impl<F> Classify for Callable<F> {
    fn kind(&self) -> Kind {
        Kind::Callable
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Collection role a tag applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Items of a set-like collection.
    Item,
    /// Keys of a map-like collection.
    Key,
    /// Values of a map-like collection.
    Value,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Item => "item",
            Role::Key => "key",
            Role::Value => "value",
        })
    }
}

/// Misuse of a [`TypeConstraint`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    /// The tag is neither a keyword nor a type path.
    #[error(
        "invalid type tag {tag:?}: expected array, object, bool, int, float, string, callable or a type path"
    )]
    InvalidTag {
        /// The rejected tag.
        tag: String,
    },

    /// The role's tag was already fixed.
    #[error("{role} type is already set")]
    AlreadySet {
        /// Role whose tag was already fixed.
        role: Role,
    },
}

/// A value rejected by its role's tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{role} must be of type {expected}, {received} given: {repr}")]
pub struct TypeMismatch {
    /// Role the value was offered for.
    pub role: Role,
    /// The declared tag.
    pub expected: TypeTag,
    /// Type path or kind of the offending value.
    pub received: String,
    /// Printed representation of the offending value.
    pub repr: String,
}

// =============================================================================
// TypeConstraint
// =============================================================================

/// Set-once type tags for the item role, or the key and value roles.
///
/// A role that was never set, or was set to `None`, accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeConstraint {
    item: Option<Option<TypeTag>>,
    key: Option<Option<TypeTag>>,
    value: Option<Option<TypeTag>>,
}

impl TypeConstraint {
    /// Creates a constraint with every role still unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a constraint with the item tag fixed.
    pub fn for_items(item: Option<&str>) -> Result<Self, ConstraintError> {
        let mut constraint = Self::new();
        constraint.set_item_type(item)?;
        Ok(constraint)
    }

    /// Creates a constraint with the key and value tags fixed.
    pub fn for_entries(key: Option<&str>, value: Option<&str>) -> Result<Self, ConstraintError> {
        let mut constraint = Self::new();
        constraint.set_key_type(key)?;
        constraint.set_value_type(value)?;
        Ok(constraint)
    }

    /// Fixes the item tag. `None` declares the role untyped.
    ///
    /// # Errors
    ///
    /// [`ConstraintError::InvalidTag`] for an unknown tag,
    /// [`ConstraintError::AlreadySet`] on a second call.
    pub fn set_item_type(&mut self, tag: Option<&str>) -> Result<(), ConstraintError> {
        set_once(&mut self.item, Role::Item, tag)
    }

    /// Fixes the key tag. `None` declares the role untyped.
    pub fn set_key_type(&mut self, tag: Option<&str>) -> Result<(), ConstraintError> {
        set_once(&mut self.key, Role::Key, tag)
    }

    /// Fixes the value tag. `None` declares the role untyped.
    pub fn set_value_type(&mut self, tag: Option<&str>) -> Result<(), ConstraintError> {
        set_once(&mut self.value, Role::Value, tag)
    }

    /// Returns the item tag, if one is declared.
    pub fn item_type(&self) -> Option<&TypeTag> {
        self.item.as_ref().and_then(Option::as_ref)
    }

    /// Returns the key tag, if one is declared.
    pub fn key_type(&self) -> Option<&TypeTag> {
        self.key.as_ref().and_then(Option::as_ref)
    }

    /// Returns the value tag, if one is declared.
    pub fn value_type(&self) -> Option<&TypeTag> {
        self.value.as_ref().and_then(Option::as_ref)
    }

    /// Validates an incoming item.
    pub fn check_item<V: Classify + ?Sized>(&self, item: &V) -> Result<(), TypeMismatch> {
        check(self.item_type(), Role::Item, item)
    }

    /// Validates an incoming key.
    pub fn check_key<V: Classify + ?Sized>(&self, key: &V) -> Result<(), TypeMismatch> {
        check(self.key_type(), Role::Key, key)
    }

    /// Validates an incoming value.
    pub fn check_value<V: Classify + ?Sized>(&self, value: &V) -> Result<(), TypeMismatch> {
        check(self.value_type(), Role::Value, value)
    }

    /// Validates a key/value pair, key first.
    pub fn check_entry<K, V>(&self, key: &K, value: &V) -> Result<(), TypeMismatch>
    where
        K: Classify + ?Sized,
        V: Classify + ?Sized,
    {
        self.check_key(key)?;
        self.check_value(value)
    }
}

fn set_once(
    slot: &mut Option<Option<TypeTag>>,
    role: Role,
    tag: Option<&str>,
) -> Result<(), ConstraintError> {
    if slot.is_some() {
        return Err(ConstraintError::AlreadySet { role });
    }
    *slot = Some(tag.map(TypeTag::parse).transpose()?);
    Ok(())
}

fn check<V: Classify + ?Sized>(
    tag: Option<&TypeTag>,
    role: Role,
    value: &V,
) -> Result<(), TypeMismatch> {
    let Some(expected) = tag else {
        return Ok(());
    };
    if expected.accepts(value) {
        return Ok(());
    }

    let received = value
        .type_name()
        .map_or_else(|| value.kind().to_string(), str::to_owned);
    tracing::debug!(%role, %expected, %received, "rejected value by type constraint");

    Err(TypeMismatch {
        role,
        expected: expected.clone(),
        received,
        repr: format!("{value:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Widget;

    impl Classify for Widget {
        fn kind(&self) -> Kind {
            Kind::Object
        }

        fn type_name(&self) -> Option<&str> {
            Some("factory::parts::Widget")
        }

        fn is_instance_of(&self, name: &str) -> bool {
            matches!(name, "factory::parts::Widget" | "factory::Part")
        }
    }

    #[test]
    fn keywords_parse() {
        for kind in Kind::KEYWORDS {
            assert_eq!(TypeTag::parse(kind.as_str()), Ok(TypeTag::Keyword(kind)));
        }
    }

    #[test]
    fn null_is_not_a_keyword() {
        assert_eq!(Kind::from_keyword("null"), None);
        assert_eq!(
            TypeTag::parse("null"),
            Err(ConstraintError::InvalidTag {
                tag: "null".to_string()
            })
        );
    }

    #[test]
    fn type_paths_parse() {
        assert_eq!(
            TypeTag::parse("factory::parts::Widget"),
            Ok(TypeTag::Named("factory::parts::Widget".to_string()))
        );
        assert!(TypeTag::parse("Widget").is_ok());
        assert!(TypeTag::parse("_private::Thing2").is_ok());
    }

    #[test]
    fn malformed_tags_rejected() {
        for tag in ["", "::Widget", "a::", "a:::b", "a..b", "9lives", "a b", "_", "a::_"] {
            assert_eq!(
                TypeTag::parse(tag),
                Err(ConstraintError::InvalidTag {
                    tag: tag.to_string()
                }),
                "tag {tag:?}"
            );
        }
    }

    #[test]
    fn tag_display_roundtrips() {
        for tag in ["int", "callable", "a::b::C"] {
            assert_eq!(tag.parse::<TypeTag>().unwrap().to_string(), tag);
        }
    }

    #[test]
    fn scalar_kinds() {
        assert_eq!(true.kind(), Kind::Bool);
        assert_eq!(3u8.kind(), Kind::Int);
        assert_eq!((-3i64).kind(), Kind::Int);
        assert_eq!(1.5f64.kind(), Kind::Float);
        assert_eq!("s".kind(), Kind::String);
        assert_eq!(String::new().kind(), Kind::String);
        assert_eq!(vec![1, 2].kind(), Kind::Array);
        assert_eq!(BTreeMap::<u8, u8>::new().kind(), Kind::Array);
        assert_eq!(None::<u8>.kind(), Kind::Null);
        assert_eq!(Some(2u8).kind(), Kind::Int);
        assert_eq!(Callable::new("noop", || ()).kind(), Kind::Callable);
    }

    #[test]
    fn json_kinds() {
        assert_eq!(json!(null).kind(), Kind::Null);
        assert_eq!(json!(false).kind(), Kind::Bool);
        assert_eq!(json!(1).kind(), Kind::Int);
        assert_eq!(json!(u64::MAX).kind(), Kind::Int);
        assert_eq!(json!(1.0).kind(), Kind::Float);
        assert_eq!(json!("x").kind(), Kind::String);
        assert_eq!(json!([1]).kind(), Kind::Array);
        assert_eq!(json!({"a": 1}).kind(), Kind::Object);
    }

    #[test]
    fn named_tag_uses_instance_check() {
        let part = TypeTag::parse("factory::Part").unwrap();
        let other = TypeTag::parse("factory::Gear").unwrap();
        assert!(part.accepts(&Widget));
        assert!(!other.accepts(&Widget));
        assert!(!part.accepts(&json!({"kind": "factory::Part"})));
    }

    #[test]
    fn unset_roles_accept_everything() {
        let constraint = TypeConstraint::new();
        assert!(constraint.check_item(&json!(null)).is_ok());
        assert!(constraint.check_entry(&1u8, &Widget).is_ok());
    }

    #[test]
    fn untyped_role_accepts_everything() {
        let constraint = TypeConstraint::for_items(None).unwrap();
        assert_eq!(constraint.item_type(), None);
        assert!(constraint.check_item(&1.5).is_ok());
        assert!(constraint.check_item(&Widget).is_ok());
    }

    #[test]
    fn tags_are_set_once() {
        let mut constraint = TypeConstraint::for_items(Some("int")).unwrap();
        assert_eq!(
            constraint.set_item_type(Some("string")),
            Err(ConstraintError::AlreadySet { role: Role::Item })
        );
        assert_eq!(
            constraint.item_type(),
            Some(&TypeTag::Keyword(Kind::Int))
        );

        let mut untyped = TypeConstraint::for_items(None).unwrap();
        assert!(untyped.set_item_type(Some("int")).is_err());
    }

    #[test]
    fn invalid_tag_does_not_consume_slot() {
        let mut constraint = TypeConstraint::new();
        assert!(constraint.set_item_type(Some("not a tag")).is_err());
        assert!(constraint.set_item_type(Some("float")).is_ok());
    }

    #[test]
    fn mismatch_names_expected_received_and_value() {
        let constraint = TypeConstraint::for_items(Some("string")).unwrap();
        let err = constraint.check_item(&42u32).unwrap_err();

        assert_eq!(err.role, Role::Item);
        assert_eq!(err.expected, TypeTag::Keyword(Kind::String));
        assert_eq!(err.received, "int");
        assert_eq!(err.repr, "42");
        assert_eq!(err.to_string(), "item must be of type string, int given: 42");
    }

    #[test]
    fn mismatch_reports_object_type_name() {
        let constraint = TypeConstraint::for_items(Some("factory::Gear")).unwrap();
        let err = constraint.check_item(&Widget).unwrap_err();
        assert_eq!(err.received, "factory::parts::Widget");
        assert_eq!(
            err.to_string(),
            "item must be of type factory::Gear, factory::parts::Widget given: Widget"
        );
    }

    #[test]
    fn entry_checks_key_before_value() {
        let constraint = TypeConstraint::for_entries(Some("string"), Some("float")).unwrap();

        assert!(constraint.check_entry("k", &1.0).is_ok());

        let err = constraint.check_entry(&1, &"v").unwrap_err();
        assert_eq!(err.role, Role::Key);

        let err = constraint.check_entry("k", &"v").unwrap_err();
        assert_eq!(err.role, Role::Value);
        assert_eq!(err.to_string(), r#"value must be of type float, string given: "v""#);
    }
}
