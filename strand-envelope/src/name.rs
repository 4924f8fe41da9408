//! Canonical type names.
//!
//! The wire form of a type name is its Rust path with `::` written as `.`:
//!
//! ```text
//! Rust path:       my_app::model::Order
//! canonical name:  my_app.model.Order
//! ```
//!
//! Generic arguments are carried along verbatim, so
//! `alloc::vec::Vec<i32>` becomes `alloc.vec.Vec<i32>`.

use std::any;

use crate::error::{EnvelopeError, Result};

/// Converts a Rust path to its canonical name.
///
/// ```
/// use strand_envelope::name::canonical_name;
///
/// assert_eq!(canonical_name("my_app::model::Order").unwrap(), "my_app.model.Order");
/// assert!(canonical_name("my_app::::Order").is_err());
/// ```
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidName`] if the result would be malformed
/// (see [`validate`]).
pub fn canonical_name(rust_path: &str) -> Result<String> {
    let name = rust_path.replace("::", ".");
    validate(&name)?;
    Ok(name)
}

/// Converts a canonical name back to a Rust path.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidName`] if `canonical` is malformed.
pub fn type_path(canonical: &str) -> Result<String> {
    validate(canonical)?;
    Ok(canonical.replace('.', "::"))
}

/// Canonical name of `T`, derived from [`std::any::type_name`].
///
/// The exact text of `type_name` is not stable across compiler versions, so
/// names that end up in persisted data should be chosen explicitly with
/// [`Registry::register_as`](crate::Registry::register_as).
pub fn canonical_name_of<T: ?Sized>() -> String {
    any::type_name::<T>().replace("::", ".")
}

/// Checks that `name` is a well-formed canonical name.
///
/// Outside generic arguments the name must be a non-empty run of
/// dot-separated, non-empty segments, with no whitespace or `:`. Angle
/// brackets must balance.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidName`] naming the offending input.
pub fn validate(name: &str) -> Result<()> {
    let invalid = || EnvelopeError::InvalidName {
        name: name.to_owned(),
    };

    let mut depth = 0usize;
    let mut segment_len = 0usize;

    for ch in name.chars() {
        match ch {
            '<' => {
                depth += 1;
                segment_len += 1;
            }
            '>' => {
                depth = depth.checked_sub(1).ok_or_else(invalid)?;
                segment_len += 1;
            }
            '.' if depth == 0 => {
                if segment_len == 0 {
                    return Err(invalid());
                }
                segment_len = 0;
            }
            ':' if depth == 0 => return Err(invalid()),
            c if depth == 0 && c.is_whitespace() => return Err(invalid()),
            _ => segment_len += 1,
        }
    }

    if depth != 0 || segment_len == 0 {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_paths() {
        let canonical = canonical_name("shop::order::LineItem").unwrap();
        assert_eq!(canonical, "shop.order.LineItem");
        assert_eq!(type_path(&canonical).unwrap(), "shop::order::LineItem");
    }

    #[test]
    fn single_segment() {
        assert_eq!(canonical_name("Order").unwrap(), "Order");
        assert_eq!(type_path("Order").unwrap(), "Order");
    }

    #[test]
    fn rejects_empty_segments() {
        for bad in ["", ".", "a..b", ".a", "a.", "::a", "a::", "a:::b"] {
            assert!(
                matches!(canonical_name(bad), Err(EnvelopeError::InvalidName { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn rejects_whitespace_and_colons() {
        assert!(validate("a b").is_err());
        assert!(validate("a:b").is_err());
        assert!(type_path("a::b").is_err());
    }

    #[test]
    fn generics_are_carried() {
        let name = canonical_name_of::<Vec<String>>();
        assert_eq!(name, "alloc.vec.Vec<alloc.string.String>");
        validate(&name).unwrap();
        assert_eq!(
            type_path(&name).unwrap(),
            "alloc::vec::Vec<alloc::string::String>"
        );

        assert!(validate("Map<K, V>").is_ok());
        assert!(validate("Vec<i32").is_err());
        assert!(validate("Vec>").is_err());
    }

    #[test]
    fn invalid_name_message() {
        let err = validate("a..b").unwrap_err();
        assert_eq!(err.to_string(), r#"invalid type name: "a..b""#);
    }
}
