//! Reads a field's `#[msg(...)]` attribute and renders it into the same tag
//! grammar `msgpack_schema::ingest` already parses (`"name"`, `"-"`,
//! `"name,extension"`, `"name,as:T,using:to/from"`) so the ingester's tag
//! handling is exercised exactly as the spec describes it, rather than
//! duplicated here.

use syn::{Attribute, Meta};

pub fn tag_from_attrs(attrs: &[Attribute]) -> Option<String> {
    let attr = attrs.iter().find(|a| a.path().is_ident("msg"))?;
    let Meta::List(list) = &attr.meta else {
        panic!("expected `#[msg(...)]`");
    };

    let mut name = None;
    let mut skip = false;
    let mut extension = false;
    let mut as_ty = None;
    let mut using = None;

    list.parse_nested_meta(|meta| {
        if meta.path.is_ident("skip") {
            skip = true;
            return Ok(());
        }
        if meta.path.is_ident("extension") {
            extension = true;
            return Ok(());
        }
        if meta.path.is_ident("rename") {
            let value: syn::LitStr = meta.value()?.parse()?;
            name = Some(value.value());
            return Ok(());
        }
        if meta.path.is_ident("as") {
            let value: syn::LitStr = meta.value()?.parse()?;
            as_ty = Some(value.value());
            return Ok(());
        }
        if meta.path.is_ident("using") {
            let value: syn::LitStr = meta.value()?.parse()?;
            using = Some(value.value());
            return Ok(());
        }
        Err(meta.error("unrecognized `msg` attribute fragment"))
    })
    .unwrap_or_else(|e| panic!("{e}"));

    if skip {
        return Some("-".to_string());
    }

    let mut fragments = vec![name.unwrap_or_default()];
    if extension {
        fragments.push("extension".to_string());
    }
    if let Some(as_ty) = as_ty {
        fragments.push(format!("as:{as_ty}"));
    }
    if let Some(using) = using {
        fragments.push(format!("using:{using}"));
    }
    Some(fragments.join(","))
}
