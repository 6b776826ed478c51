//! Queryable derive macro implementation.
//!
//! Expands a named-field struct into:
//! - a `Queryable` impl whose `get` matches declared member names
//! - a `DeclaredMembers` impl listing those names and flattened parents
//! - an `inventory` submission feeding the global capability registry

use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input};

/// One readable member of the derived type.
struct Member {
	/// Template-facing name; raw identifiers lose their `r#` prefix.
	key: String,
	span: Span,
	read: TokenStream2,
}

/// A `#[key(flatten)]` field.
struct Parent {
	field: Ident,
	ty: Type,
}

#[derive(Default)]
struct FieldAttrs {
	skip: bool,
	flatten: bool,
	rename: Option<LitStr>,
}

#[derive(Default)]
struct ContainerAttrs {
	accessors: Vec<Ident>,
	only: Option<Vec<Ident>>,
}

/// Entry point for the `#[derive(Queryable)]` macro.
pub fn derive_queryable(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	expand(&input).unwrap_or_else(syn::Error::into_compile_error).into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"Queryable cannot be derived for generic types; implement it by hand",
		));
	}

	let Data::Struct(data) = &input.data else {
		return Err(syn::Error::new_spanned(
			&input.ident,
			"Queryable can only be derived for structs",
		));
	};
	let Fields::Named(fields) = &data.fields else {
		return Err(syn::Error::new_spanned(
			&input.ident,
			"Queryable can only be derived for structs with named fields",
		));
	};

	let container = parse_container_attrs(input)?;

	let mut members = Vec::new();
	let mut parents = Vec::new();
	for field in &fields.named {
		let Some(ident) = field.ident.clone() else {
			continue;
		};
		let attrs = parse_field_attrs(field)?;

		if attrs.flatten {
			parents.push(Parent {
				field: ident,
				ty: field.ty.clone(),
			});
			continue;
		}
		if attrs.skip {
			continue;
		}

		let (key, span) = match &attrs.rename {
			Some(lit) => (lit.value(), lit.span()),
			None => (ident.unraw().to_string(), ident.span()),
		};
		members.push(Member {
			key,
			span,
			read: quote! { ::stencil_key_access::ToValue::to_value(&self.#ident) },
		});
	}

	for accessor in &container.accessors {
		members.push(Member {
			key: accessor.unraw().to_string(),
			span: accessor.span(),
			read: quote! { ::stencil_key_access::ToValue::to_value(&self.#accessor()) },
		});
	}

	let mut seen = HashSet::new();
	if let Some(dup) = members.iter().find(|m| !seen.insert(m.key.clone())) {
		return Err(syn::Error::new(
			dup.span,
			format!("duplicate readable member `{}`", dup.key),
		));
	}

	if let Some(only) = &container.only {
		for name in only {
			if !members.iter().any(|m| name.unraw() == m.key) {
				return Err(syn::Error::new_spanned(
					name,
					format!("`{name}` in only(...) is not a field or accessor"),
				));
			}
		}
		let keep: HashSet<String> = only.iter().map(|name| name.unraw().to_string()).collect();
		members.retain(|m| keep.contains(&m.key));
	}

	let name = &input.ident;
	let keys: Vec<&str> = members.iter().map(|m| m.key.as_str()).collect();
	let reads = members.iter().map(|m| &m.read);
	let parent_fields = parents.iter().map(|p| &p.field);
	let parent_tys: Vec<&Type> = parents.iter().map(|p| &p.ty).collect();

	// Flattened fields must themselves declare members.
	let parent_check = (!parent_tys.is_empty()).then(|| {
		quote! {
			const _: fn() = || {
				fn assert_declared<T: ::stencil_key_access::DeclaredMembers>() {}
				#( assert_declared::<#parent_tys>(); )*
			};
		}
	});

	Ok(quote! {
		impl ::stencil_key_access::Queryable for #name {
			fn get(&self, key: &str) -> ::core::option::Option<::stencil_key_access::Value> {
				match key {
					#( #keys => ::core::option::Option::Some(#reads), )*
					_ => {
						#(
							if let ::core::option::Option::Some(value) =
								::stencil_key_access::Queryable::get(&self.#parent_fields, key)
							{
								return ::core::option::Option::Some(value);
							}
						)*
						::core::option::Option::None
					}
				}
			}
		}

		impl ::stencil_key_access::DeclaredMembers for #name {
			const MEMBERS: &'static [&'static str] = &[#(#keys),*];

			fn parents() -> ::std::vec::Vec<::stencil_key_access::ParentRef> {
				::std::vec![#( ::stencil_key_access::ParentRef::of::<#parent_tys>() ),*]
			}
		}

		#parent_check

		::stencil_key_access::__private::inventory::submit! {
			::stencil_key_access::registry::DeclReg(
				<#name as ::stencil_key_access::DeclaredMembers>::type_decl
			)
		}
	})
}

fn parse_container_attrs(input: &DeriveInput) -> syn::Result<ContainerAttrs> {
	let mut attrs = ContainerAttrs::default();
	for attr in input.attrs.iter().filter(|a| a.path().is_ident("queryable")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("accessors") {
				meta.parse_nested_meta(|inner| {
					attrs.accessors.push(inner.path.require_ident()?.clone());
					Ok(())
				})
			} else if meta.path.is_ident("only") {
				let only = attrs.only.get_or_insert_with(Vec::new);
				meta.parse_nested_meta(|inner| {
					only.push(inner.path.require_ident()?.clone());
					Ok(())
				})
			} else {
				Err(meta.error("unknown queryable attribute; expected `accessors` or `only`"))
			}
		})?;
	}
	Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
	let mut attrs = FieldAttrs::default();
	for attr in field.attrs.iter().filter(|a| a.path().is_ident("key")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("skip") {
				attrs.skip = true;
				Ok(())
			} else if meta.path.is_ident("flatten") {
				attrs.flatten = true;
				Ok(())
			} else if meta.path.is_ident("rename") {
				attrs.rename = Some(meta.value()?.parse()?);
				Ok(())
			} else {
				Err(meta.error("unknown key attribute; expected `skip`, `rename` or `flatten`"))
			}
		})?;
	}

	let conflicting = [attrs.skip, attrs.flatten, attrs.rename.is_some()]
		.iter()
		.filter(|set| **set)
		.count();
	if conflicting > 1 {
		return Err(syn::Error::new_spanned(
			field,
			"`skip`, `rename` and `flatten` are mutually exclusive",
		));
	}
	Ok(attrs)
}
