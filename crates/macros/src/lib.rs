//! Procedural macros for stencil key access.
//!
//! * `#[derive(Queryable)]` - implements `Queryable` and `DeclaredMembers` and
//!   submits the type's declaration to the process-wide capability registry.

use proc_macro::TokenStream;

/// Queryable derive implementation.
mod queryable;

/// Derives `Queryable` and `DeclaredMembers` for a struct with named fields.
///
/// Every field becomes a readable member unless skipped. Field values are
/// converted with `ToValue`.
///
/// Field attributes:
/// * `#[key(skip)]` - not readable and not declared
/// * `#[key(rename = "fullName")]` - read under a different key
/// * `#[key(flatten)]` - inherit the field type's declared members; unknown
///   keys are forwarded to it
///
/// Container attributes:
/// * `#[queryable(accessors(a, b))]` - zero-argument `&self` methods readable
///   as members
/// * `#[queryable(only(a, b))]` - declare just these own members
///
/// ```ignore
/// #[derive(Queryable)]
/// #[queryable(accessors(display_name))]
/// struct User {
///     name: String,
///     #[key(skip)]
///     password_hash: String,
///     #[key(flatten)]
///     person: Person,
/// }
/// ```
#[proc_macro_derive(Queryable, attributes(key, queryable))]
pub fn derive_queryable(input: TokenStream) -> TokenStream {
	queryable::derive_queryable(input)
}
