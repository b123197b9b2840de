mod codegen;
mod derive;
mod shared;
mod tag;
mod type_ref;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemType};

/// `#[derive(MsgPack)]`: generates `encode`/`decode`/`msgsize` for a struct
/// by running its fields through `msgpack-schema`'s ingester and resolver
/// and rendering the resolved element tree against `msgpack-core`.
///
/// Field attributes (`#[msg(...)]`) follow the tag grammar `msgpack-schema`
/// already parses: `rename = "..."`, `skip`, `extension`, `as = "T"`,
/// `using = "to_fn/from_fn"`.
#[proc_macro_derive(MsgPack, attributes(msg))]
pub fn derive_msgpack(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(input).into()
}

/// Registers a plain type alias of a primitive (`#[msgpack_alias] type
/// Celsius = f64;`) in the session shared across this crate's derives, so a
/// struct field typed `Celsius` elaborates straight to `Base::known(Float64)`
/// instead of an unresolved identifier. A type alias can't carry
/// `#[derive(...)]` itself, which is why this needs its own attribute
/// rather than piggybacking on `MsgPack`.
///
/// Place this above the alias before any `#[derive(MsgPack)]` that
/// references it — macro expansion runs in source order within a
/// compilation unit, and the alias must be registered before a struct
/// deriving `MsgPack` looks it up.
#[proc_macro_attribute]
pub fn msgpack_alias(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_ty = parse_macro_input!(item as ItemType);
    let name = item_ty.ident.to_string();
    let type_ref = type_ref::type_ref_from_syn(&item_ty.ty);
    shared::register_alias(name, &type_ref);
    quote::quote!(#item_ty).into()
}
