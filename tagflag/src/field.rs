//! Field descriptors and the per-type visiting traits.
//!
//! The derive macro turns each struct field into a [`FieldSpec`] and calls
//! [`SchemaField::visit`] on the field's type. Scalars register a flag,
//! records recurse, and collection or pointer-like types report
//! [`TagflagError::UnsupportedType`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::{KeyPath, SchemaWalker, TagflagError, TagflagResult};

/// Static metadata for one struct field, as read from its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust identifier of the field.
    pub ident: &'static str,
    /// Key tag from `#[serde(rename = "...")]`, if any.
    pub key: Option<&'static str>,
    /// Declared default from `#[tagflag(default = "...")]`.
    pub default: Option<&'static str>,
    /// Help text from `#[tagflag(usage = "...")]` or the doc comment.
    pub usage: Option<&'static str>,
    /// Whether the field carries `#[serde(flatten)]`.
    pub flatten: bool,
}

impl FieldSpec {
    /// A bare descriptor with no attributes.
    #[must_use]
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            key: None,
            default: None,
            usage: None,
            flatten: false,
        }
    }

    /// Set the key tag.
    #[must_use]
    pub const fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the declared default.
    #[must_use]
    pub const fn default_value(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the help text.
    #[must_use]
    pub const fn usage(mut self, usage: &'static str) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Mark the field as flattened into its parent's namespace.
    #[must_use]
    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }
}

/// A configuration record whose fields can be walked.
///
/// Implemented by `#[derive(Schema)]`; the generated [`Schema::walk`] visits
/// every field in declaration order.
pub trait Schema {
    /// Visit each field of `Self` under `prefix`.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by a field visit.
    fn walk(walker: &mut SchemaWalker, prefix: &KeyPath) -> TagflagResult<()>;
}

/// How a field's type takes part in the walk.
pub trait SchemaField {
    /// Visit a field of this type described by `field` under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error when registration fails or the type is unsupported.
    fn visit(walker: &mut SchemaWalker, prefix: &KeyPath, field: &FieldSpec)
    -> TagflagResult<()>;
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {$(
        impl SchemaField for $ty {
            fn visit(
                walker: &mut SchemaWalker,
                prefix: &KeyPath,
                field: &FieldSpec,
            ) -> TagflagResult<()> {
                walker.leaf::<$ty>(prefix, field)
            }
        }
    )*};
}

scalar_field!(
    bool, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);

fn unsupported<T: ?Sized>(prefix: &KeyPath, field: &FieldSpec) -> TagflagResult<()> {
    Err(TagflagError::UnsupportedType {
        field: prefix.describe(field.key, field.ident),
        type_name: std::any::type_name::<T>(),
    })
}

macro_rules! unsupported_field {
    ($(impl<$($gen:ident),*> for $ty:ty;)*) => {$(
        impl<$($gen),*> SchemaField for $ty {
            fn visit(
                _walker: &mut SchemaWalker,
                prefix: &KeyPath,
                field: &FieldSpec,
            ) -> TagflagResult<()> {
                unsupported::<Self>(prefix, field)
            }
        }
    )*};
}

unsupported_field! {
    impl<T> for Vec<T>;
    impl<T> for VecDeque<T>;
    impl<T, S> for HashSet<T, S>;
    impl<T> for BTreeSet<T>;
    impl<K, V, S> for HashMap<K, V, S>;
    impl<K, V> for BTreeMap<K, V>;
    impl<T> for Option<T>;
    impl<T> for Box<T>;
    impl<T> for Rc<T>;
    impl<T> for Arc<T>;
}

impl<T, const N: usize> SchemaField for [T; N] {
    fn visit(_walker: &mut SchemaWalker, prefix: &KeyPath, field: &FieldSpec) -> TagflagResult<()> {
        unsupported::<Self>(prefix, field)
    }
}
