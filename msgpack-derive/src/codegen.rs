//! The mechanical emitter (C8's one intended consumer, SPEC_FULL §15:
//! "the one mechanical walk the spec allows"): drives
//! `msgpack_schema::sink::{Sink, drive}` over the resolved `Elem` tree
//! rather than re-deriving the same dispatch by hand — the visitor
//! contract C8 names as the interface an emitter consumes (spec §4.7,
//! §6.3). Every `Base::Ident` arm assumes the referenced type derives
//! `MsgPack` itself and exposes the same three methods this macro
//! generates.

use msgpack_schema::{drive, Base, BaseName, Elem, Sink, StructField};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// Emits a statement sequence that writes `value` (an expression of type
/// `&T` for whatever Rust type this field was declared as) into `buf`.
pub fn gen_encode(elem: &Elem, value: &TokenStream) -> TokenStream {
    let mut sink = EncodeSink { value: value.clone(), tokens: TokenStream::new() };
    drive(&mut sink, elem);
    sink.tokens
}

struct EncodeSink {
    value: TokenStream,
    tokens: TokenStream,
}

impl Sink for EncodeSink {
    fn visit_ptr(&mut self, inner: &Elem) {
        let value = self.value.clone();
        let inner_tokens = gen_encode(inner, &quote!(__inner));
        self.tokens = quote! {
            match #value {
                Some(__inner) => { #inner_tokens }
                None => { msgpack_core::codec::write::write_nil(buf); }
            }
        };
    }

    fn visit_slice(&mut self, inner: &Elem) {
        let value = self.value.clone();
        let inner_tokens = gen_encode(inner, &quote!(__item));
        self.tokens = quote! {
            msgpack_core::codec::write::write_array_len(buf, (#value).len() as u32);
            for __item in (#value).iter() {
                #inner_tokens
            }
        };
    }

    fn visit_array(&mut self, _size: &str, inner: &Elem) {
        self.visit_slice(inner);
    }

    fn visit_map(&mut self, value_elem: &Elem) {
        let value = self.value.clone();
        let inner_tokens = gen_encode(value_elem, &quote!(__v));
        self.tokens = quote! {
            msgpack_core::codec::write::write_map_len(buf, (#value).len() as u32);
            for (__k, __v) in (#value).iter() {
                msgpack_core::codec::write::write_str(buf, __k);
                #inner_tokens
            }
        };
    }

    fn visit_struct(&mut self, _name: &str, _as_tuple: bool, _fields: &[StructField]) {
        panic!("nested anonymous struct fields are not supported; derive MsgPack on the referenced type");
    }

    fn visit_base(&mut self, base: &Base) {
        let value = self.value.clone();
        // A field tagged `as:T,using:to/from` converts through `to` before
        // the base write (spec §4.5); an alias rewritten by the resolver
        // with no shim just writes the resolved base kind directly.
        self.tokens = match (base.convert, &base.shim_from_base) {
            (true, Some(shim_from)) => {
                let shim_fn = format_ident!("{}", shim_from);
                let write_shimmed = gen_encode_base(base, &quote!(&__shimmed));
                quote! {
                    let __shimmed = #shim_fn(#value);
                    #write_shimmed
                }
            }
            _ => gen_encode_base(base, &value),
        };
    }
}

fn gen_encode_base(base: &Base, value: &TokenStream) -> TokenStream {
    match base.name {
        BaseName::String => quote!(msgpack_core::codec::write::write_str(buf, #value);),
        BaseName::Bytes => quote!(msgpack_core::codec::write::write_bin(buf, #value);),
        BaseName::Int | BaseName::Int8 | BaseName::Int16 | BaseName::Int32 | BaseName::Int64 => {
            quote!(msgpack_core::codec::write::write_int(buf, *#value as i64);)
        }
        BaseName::Uint | BaseName::Uint8 | BaseName::Uint16 | BaseName::Uint32 | BaseName::Uint64 | BaseName::Byte => {
            quote!(msgpack_core::codec::write::write_uint(buf, *#value as u64);)
        }
        BaseName::Bool => quote!(msgpack_core::codec::write::write_bool(buf, *#value);),
        BaseName::Float32 => quote!(msgpack_core::codec::write::write_f32(buf, *#value);),
        BaseName::Float64 => quote!(msgpack_core::codec::write::write_f64(buf, *#value);),
        BaseName::Complex64 | BaseName::Complex128 | BaseName::Time | BaseName::Ext => quote!((#value).encode(buf);),
        BaseName::Ident => {
            let ident = format_ident!("{}", base.ident.as_deref().expect("unresolved ident missing its name"));
            quote!(#ident::encode(#value, buf);)
        }
        BaseName::Intf => panic!("dynamic `Intf` fields are not supported by msgpack-derive"),
    }
}

/// Emits a block expression (of the field's Rust type) that decodes one
/// value out of `cursor`, advancing it as it goes via plain assignment —
/// never `let`-shadowing, so updates made inside a loop body are visible
/// after the loop exits.
pub fn gen_decode_block(elem: &Elem, cursor: &Ident) -> TokenStream {
    let mut sink = DecodeSink { cursor: cursor.clone(), tokens: TokenStream::new() };
    drive(&mut sink, elem);
    sink.tokens
}

struct DecodeSink {
    cursor: Ident,
    tokens: TokenStream,
}

impl Sink for DecodeSink {
    fn visit_ptr(&mut self, inner: &Elem) {
        let cursor = self.cursor.clone();
        let inner_block = gen_decode_block(inner, &self.cursor);
        self.tokens = quote! {
            {
                if msgpack_core::codec::read::peek_kind(#cursor)? == msgpack_core::Kind::Nil {
                    #cursor = msgpack_core::codec::read::read_nil(#cursor)?;
                    None
                } else {
                    Some(#inner_block)
                }
            }
        };
    }

    fn visit_slice(&mut self, inner: &Elem) {
        let cursor = self.cursor.clone();
        let inner_block = gen_decode_block(inner, &self.cursor);
        self.tokens = quote! {
            {
                let __len;
                (__len, #cursor) = msgpack_core::codec::read::read_array_len(#cursor)?;
                let mut __vec = Vec::with_capacity(__len as usize);
                for _ in 0..__len {
                    __vec.push(#inner_block);
                }
                __vec
            }
        };
    }

    fn visit_array(&mut self, size: &str, inner: &Elem) {
        let cursor = self.cursor.clone();
        let inner_block = gen_decode_block(inner, &self.cursor);
        let size_tokens: TokenStream = size.parse().unwrap_or_else(|_| panic!("invalid array size `{size}`"));
        self.tokens = quote! {
            {
                let __len;
                (__len, #cursor) = msgpack_core::codec::read::read_array_len(#cursor)?;
                if __len as usize != #size_tokens {
                    return Err(msgpack_core::Error::ArrayError { wanted: #size_tokens, got: __len as usize });
                }
                let mut __vec = Vec::with_capacity(__len as usize);
                for _ in 0..__len {
                    __vec.push(#inner_block);
                }
                __vec.try_into().unwrap_or_else(|_| panic!("array length mismatch"))
            }
        };
    }

    fn visit_map(&mut self, value_elem: &Elem) {
        let cursor = self.cursor.clone();
        let inner_block = gen_decode_block(value_elem, &self.cursor);
        self.tokens = quote! {
            {
                let __len;
                (__len, #cursor) = msgpack_core::codec::read::read_map_len(#cursor)?;
                let mut __map = std::collections::HashMap::with_capacity(__len as usize);
                for _ in 0..__len {
                    let __k;
                    (__k, #cursor) = msgpack_core::codec::read::read_str(#cursor)?;
                    let __k = __k.to_string();
                    let __v = #inner_block;
                    __map.insert(__k, __v);
                }
                __map
            }
        };
    }

    fn visit_struct(&mut self, _name: &str, _as_tuple: bool, _fields: &[StructField]) {
        panic!("nested anonymous struct fields are not supported; derive MsgPack on the referenced type");
    }

    fn visit_base(&mut self, base: &Base) {
        let cursor = self.cursor.clone();
        let block = gen_decode_base(base, &cursor);
        // The decoded value is still in the wire base type at this point;
        // `shim_to_base` converts it back into the field's own type (spec
        // §4.5's `using:to/from` pair, applied at the other end from encode).
        self.tokens = match &base.shim_to_base {
            Some(shim_to) => {
                let shim_fn = format_ident!("{}", shim_to);
                quote! {{ let __raw = #block; #shim_fn(&__raw) }}
            }
            None => block,
        };
    }
}

fn gen_decode_base(base: &Base, cursor: &Ident) -> TokenStream {
    match base.name {
        BaseName::String => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_str(#cursor)?; __v.to_string() }},
        BaseName::Bytes => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_bin(#cursor)?; __v.to_vec() }},
        BaseName::Int => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_i64(#cursor)?; __v as isize }},
        BaseName::Int8 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_int8(#cursor)?; __v }},
        BaseName::Int16 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_int16(#cursor)?; __v }},
        BaseName::Int32 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_int32(#cursor)?; __v }},
        BaseName::Int64 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_i64(#cursor)?; __v }},
        BaseName::Uint => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_u64(#cursor)?; __v as usize }},
        BaseName::Uint8 | BaseName::Byte => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_u64(#cursor)?; __v as u8 }},
        BaseName::Uint16 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_u64(#cursor)?; __v as u16 }},
        BaseName::Uint32 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_u64(#cursor)?; __v as u32 }},
        BaseName::Uint64 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_u64(#cursor)?; __v }},
        BaseName::Bool => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_bool(#cursor)?; __v }},
        BaseName::Float32 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_f32(#cursor)?; __v }},
        BaseName::Float64 => quote! {{ let __v; (__v, #cursor) = msgpack_core::codec::read::read_f64(#cursor)?; __v }},
        BaseName::Complex64 => quote! {{ let __v; (__v, #cursor) = msgpack_core::ext::Complex64::decode(#cursor)?; __v }},
        BaseName::Complex128 => quote! {{ let __v; (__v, #cursor) = msgpack_core::ext::Complex128::decode(#cursor)?; __v }},
        BaseName::Time => quote! {{ let __v; (__v, #cursor) = msgpack_core::ext::Timestamp::decode(#cursor)?; __v }},
        BaseName::Ext => quote! {{ let __v; (__v, #cursor) = msgpack_core::ext::Extension::decode(#cursor)?; __v }},
        BaseName::Ident => {
            let ident = format_ident!("{}", base.ident.as_deref().expect("unresolved ident missing its name"));
            quote! {{ let __v; (__v, #cursor) = #ident::decode(#cursor)?; __v }}
        }
        BaseName::Intf => panic!("dynamic `Intf` fields are not supported by msgpack-derive"),
    }
}

/// Emits an expression computing the upper-bound wire size of `value`
/// (SPEC_FULL §14).
pub fn gen_msgsize(elem: &Elem, value: &TokenStream) -> TokenStream {
    let mut sink = MsgsizeSink { value: value.clone(), tokens: TokenStream::new() };
    drive(&mut sink, elem);
    sink.tokens
}

struct MsgsizeSink {
    value: TokenStream,
    tokens: TokenStream,
}

impl Sink for MsgsizeSink {
    fn visit_ptr(&mut self, inner: &Elem) {
        let value = self.value.clone();
        let inner_tokens = gen_msgsize(inner, &quote!(__inner));
        self.tokens = quote!(match #value { Some(__inner) => #inner_tokens, None => msgpack_core::codec::msgsize::msgsize_nil() });
    }

    fn visit_slice(&mut self, inner: &Elem) {
        let value = self.value.clone();
        let inner_tokens = gen_msgsize(inner, &quote!(__item));
        self.tokens = quote! {
            (msgpack_core::codec::msgsize::msgsize_array_header((#value).len() as u32)
                + (#value).iter().map(|__item| #inner_tokens).sum::<usize>())
        };
    }

    fn visit_array(&mut self, _size: &str, inner: &Elem) {
        self.visit_slice(inner);
    }

    fn visit_map(&mut self, value_elem: &Elem) {
        let value = self.value.clone();
        let inner_tokens = gen_msgsize(value_elem, &quote!(__v));
        self.tokens = quote! {
            (msgpack_core::codec::msgsize::msgsize_map_header((#value).len() as u32)
                + (#value).iter().map(|(__k, __v)| msgpack_core::codec::msgsize::msgsize_str(__k.len()) + #inner_tokens).sum::<usize>())
        };
    }

    fn visit_struct(&mut self, _name: &str, _as_tuple: bool, _fields: &[StructField]) {
        panic!("nested anonymous struct fields are not supported; derive MsgPack on the referenced type");
    }

    fn visit_base(&mut self, base: &Base) {
        let value = self.value.clone();
        self.tokens = match (base.convert, &base.shim_from_base) {
            (true, Some(shim_from)) => {
                let shim_fn = format_ident!("{}", shim_from);
                let term = gen_msgsize_base(base, &quote!(&__shimmed));
                quote!({ let __shimmed = #shim_fn(#value); #term })
            }
            _ => gen_msgsize_base(base, &value),
        };
    }
}

fn gen_msgsize_base(base: &Base, value: &TokenStream) -> TokenStream {
    match base.name {
        BaseName::String => quote!(msgpack_core::codec::msgsize::msgsize_str((#value).len())),
        BaseName::Bytes => quote!(msgpack_core::codec::msgsize::msgsize_bin((#value).len())),
        BaseName::Int | BaseName::Int8 | BaseName::Int16 | BaseName::Int32 | BaseName::Int64 => {
            quote!(msgpack_core::codec::msgsize::msgsize_int(*#value as i64))
        }
        BaseName::Uint | BaseName::Uint8 | BaseName::Uint16 | BaseName::Uint32 | BaseName::Uint64 | BaseName::Byte => {
            quote!(msgpack_core::codec::msgsize::msgsize_uint(*#value as u64))
        }
        BaseName::Bool => quote!(msgpack_core::codec::msgsize::msgsize_bool()),
        BaseName::Float32 => quote!(msgpack_core::codec::msgsize::msgsize_f32()),
        BaseName::Float64 => quote!(msgpack_core::codec::msgsize::msgsize_f64()),
        // fixext8 (complex64), fixext16 (complex128), ext8 w/ 12-byte payload (time) — all fixed widths.
        BaseName::Complex64 => quote!(10usize),
        BaseName::Complex128 => quote!(18usize),
        BaseName::Time => quote!(15usize),
        BaseName::Ext => quote!((#value).msgsize()),
        BaseName::Ident => {
            let ident = format_ident!("{}", base.ident.as_deref().expect("unresolved ident missing its name"));
            quote!(#ident::msgsize(#value))
        }
        BaseName::Intf => panic!("dynamic `Intf` fields are not supported by msgpack-derive"),
    }
}
