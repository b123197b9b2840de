//! Drives a `syn::DeriveInput` through `msgpack_schema`'s ingester and
//! resolver (C6/C7) and renders the result with [`crate::codegen`]. Mirrors
//! the host crate's `cilium-derive` shape: parse with `syn`, panic on
//! unsupported input the way `from_repr.rs` panics on `Union`/`Struct`.

use msgpack_schema::{Elem, FieldDecl, Shape, TypeDecl};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields};

use crate::codegen::{gen_decode_block, gen_encode, gen_msgsize};
use crate::shared;
use crate::tag::tag_from_attrs;
use crate::type_ref::type_ref_from_syn;

pub fn expand(input: DeriveInput) -> TokenStream {
    let Data::Struct(data) = &input.data else {
        panic!("MsgPack can only be derived for structs");
    };
    if !input.generics.params.is_empty() {
        panic!("generic types are not supported by msgpack-derive");
    }

    let name = input.ident.to_string();
    let field_decls = collect_field_decls(&data.fields);
    let decl = TypeDecl { name: name.clone(), shape: Shape::Record { fields: field_decls } };

    let mut session = shared::lock();
    let (mut elaborated, mut diagnostics) = msgpack_schema::ingest(&mut session, std::slice::from_ref(&decl));
    let Some(elem) = elaborated.pop() else {
        panic!("`{name}` has no usable fields to derive MsgPack for");
    };
    let mut elem = elem;
    msgpack_schema::resolve(&session, &name, &mut elem, &mut diagnostics);
    session.mark_processed(name.clone());
    drop(session);

    let Elem::Ptr(inner) = &elem else { unreachable!("records always elaborate as Ptr(Struct)") };
    let Elem::Struct(s) = inner.as_ref() else { unreachable!("records always elaborate as Ptr(Struct)") };

    let ident = input.ident;
    let cursor = format_ident!("cursor");

    let field_tags: Vec<&str> = s.fields.iter().map(|f| f.field_tag.as_deref().unwrap_or(f.field_name.as_str())).collect();

    let encode_stmts: Vec<TokenStream> = s
        .fields
        .iter()
        .zip(&field_tags)
        .map(|(f, tag)| {
            let field_ident = format_ident!("{}", f.field_name);
            let write_value = gen_encode(&f.field_elem, &quote!(&self.#field_ident));
            quote! {
                msgpack_core::codec::write::write_str(buf, #tag);
                #write_value
            }
        })
        .collect();

    let decode_arms: Vec<TokenStream> = s
        .fields
        .iter()
        .zip(&field_tags)
        .map(|(f, tag)| {
            let slot = format_ident!("__slot_{}", f.field_name);
            let block = gen_decode_block(&f.field_elem, &cursor);
            quote! { #tag => { #slot = Some(#block); } }
        })
        .collect();

    let slot_decls: Vec<TokenStream> = s.fields.iter().map(|f| format_ident!("__slot_{}", f.field_name)).map(|slot| quote!(let mut #slot = None;)).collect();

    let field_assigns: Vec<TokenStream> = s
        .fields
        .iter()
        .zip(&field_tags)
        .map(|(f, tag)| {
            let field_ident = format_ident!("{}", f.field_name);
            let slot = format_ident!("__slot_{}", f.field_name);
            let missing = format!("missing field \"{tag}\"");
            quote!(#field_ident: #slot.ok_or(msgpack_core::Error::Fatal(#missing))?,)
        })
        .collect();

    let msgsize_terms: Vec<TokenStream> = s
        .fields
        .iter()
        .zip(&field_tags)
        .map(|(f, tag)| {
            let field_ident = format_ident!("{}", f.field_name);
            let term = gen_msgsize(&f.field_elem, &quote!(&self.#field_ident));
            quote!(msgpack_core::codec::msgsize::msgsize_str(#tag.len()) + #term)
        })
        .collect();

    let num_fields = s.fields.len() as u32;

    let elaborated_names: std::collections::HashSet<&str> = s.fields.iter().map(|f| f.field_name.as_str()).collect();
    let skipped_defaults: Vec<TokenStream> = struct_field_names(&data.fields)
        .into_iter()
        .filter(|name| !elaborated_names.contains(name.as_str()))
        .map(|name| {
            let field_ident = format_ident!("{}", name);
            quote!(#field_ident: ::std::default::Default::default(),)
        })
        .collect();

    quote! {
        impl #ident {
            pub fn encode(&self, buf: &mut Vec<u8>) {
                msgpack_core::codec::write::write_map_len(buf, #num_fields);
                #(#encode_stmts)*
            }

            pub fn decode(bytes: &[u8]) -> msgpack_core::Result<(Self, &[u8])> {
                let mut #cursor = bytes;
                let __len;
                (__len, #cursor) = msgpack_core::codec::read::read_map_len(#cursor)?;
                #(#slot_decls)*
                for _ in 0..__len {
                    let __key;
                    (__key, #cursor) = msgpack_core::codec::read::read_str(#cursor)?;
                    match __key {
                        #(#decode_arms)*
                        _ => { #cursor = msgpack_core::skip(#cursor)?; }
                    }
                }
                Ok((Self { #(#field_assigns)* #(#skipped_defaults)* }, #cursor))
            }

            pub fn msgsize(&self) -> usize {
                msgpack_core::codec::msgsize::msgsize_map_header(#num_fields) #(+ #msgsize_terms)*
            }
        }

        impl msgpack_core::Msgsize for #ident {
            fn msgsize(&self) -> usize {
                #ident::msgsize(self)
            }
        }
    }
}

fn struct_field_names(fields: &Fields) -> Vec<String> {
    match fields {
        Fields::Named(named) => named.named.iter().map(|f| f.ident.as_ref().unwrap().to_string()).collect(),
        Fields::Unnamed(_) | Fields::Unit => Vec::new(),
    }
}

fn collect_field_decls(fields: &Fields) -> Vec<FieldDecl> {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let field_name = field.ident.as_ref().expect("named field without an ident").to_string();
                FieldDecl { name: field_name, type_ref: type_ref_from_syn(&field.ty), tag: tag_from_attrs(&field.attrs), anonymous: false }
            })
            .collect(),
        Fields::Unnamed(_) => panic!("tuple structs are not supported by msgpack-derive"),
        Fields::Unit => Vec::new(),
    }
}
