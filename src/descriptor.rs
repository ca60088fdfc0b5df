//! Type descriptors: the key that selects both the record file and the codec.
//!
//! A [`TypeDescriptor<T>`] carries `T` at compile time (so serde picks the
//! right implementation, generics and tagged enums included) and the
//! record's Type Identifier at runtime.
//!
//! Identifiers are derived from [`std::any::type_name`]: generic arguments
//! are dropped and `::` becomes `.`, so `my_app::state::Wallet<u32>` is
//! stored as `my_app.state.Wallet`. Types without a nameable path
//! (closures, tuples, arrays, references, trait objects) get no identifier
//! and are rejected by the engine.
//!
//! # Stability
//!
//! The output of `type_name` is not guaranteed to stay the same across
//! compiler versions, and derived identifiers follow the module path, so
//! moving or renaming a type moves its record too. When the identifier
//! changes, the old file is no longer found and reads quietly return the
//! default. For state that must survive toolchain upgrades and refactors,
//! pin the identifier with [`TypeDescriptor::named`]:
//!
//! ```
//! use persista::TypeDescriptor;
//!
//! struct Wallet;
//!
//! let ty = TypeDescriptor::<Wallet>::named("wallet.v1");
//! assert_eq!(ty.type_id(), Some("wallet.v1"));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Runtime token for the exact type `T` being persisted.
pub struct TypeDescriptor<T: ?Sized> {
    id: Option<Cow<'static, str>>,
    type_name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ?Sized> TypeDescriptor<T> {
    /// Descriptor with the identifier derived from `T`'s path.
    pub fn of() -> Self {
        let type_name = std::any::type_name::<T>();
        Self {
            id: type_identifier(type_name).map(Cow::Owned),
            type_name,
            _marker: PhantomData,
        }
    }

    /// Same as [`of`](Self::of), inferring `T` from a value.
    pub fn of_val(_value: &T) -> Self {
        Self::of()
    }

    /// Descriptor with an explicit identifier, independent of where `T` lives.
    ///
    /// Ids that can't be a plain record file name (empty, starting with `.`,
    /// or containing a path separator) leave the descriptor without an
    /// identifier. Names starting with `.` are reserved for in-flight writes.
    pub fn named(id: impl Into<Cow<'static, str>>) -> Self {
        let id = id.into();
        Self {
            id: is_valid_file_name(&id).then_some(id),
            type_name: std::any::type_name::<T>(),
            _marker: PhantomData,
        }
    }

    /// Descriptor with no identifier at all.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            type_name: std::any::type_name::<T>(),
            _marker: PhantomData,
        }
    }

    /// The Type Identifier, if `T` has one.
    pub fn type_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Full Rust type name, generic arguments included.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<T: ?Sized> Clone for TypeDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            type_name: self.type_name,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::of()
    }
}

impl<T: ?Sized> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Derive a Type Identifier from a `std::any::type_name` string.
pub fn type_identifier(type_name: &str) -> Option<String> {
    // Drop everything inside <...>
    let mut depth = 0usize;
    let mut base = String::with_capacity(type_name.len());
    for c in type_name.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            _ if depth == 0 => base.push(c),
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }

    let segments: Vec<&str> = base.split("::").collect();
    if !segments.iter().all(|s| is_identifier(s)) {
        return None;
    }
    Some(segments.join("."))
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn is_valid_file_name(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\', '\0'])
}
