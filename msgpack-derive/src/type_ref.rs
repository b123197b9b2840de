//! Translates a `syn::Type` into the `msgpack_schema::TypeRef` shapes the
//! ingester (C6) expects, the producer side of the contract in
//! `msgpack_schema::decl` (SPEC_FULL §0: "concrete `TypeDecl` producer").

use msgpack_schema::{BaseName, TypeRef};
use syn::{GenericArgument, PathArguments, Type};

pub fn type_ref_from_syn(ty: &Type) -> TypeRef {
    match ty {
        Type::Path(type_path) => {
            let segment = type_path.path.segments.last().expect("empty type path");
            let name = segment.ident.to_string();

            if let Some(known) = known_base(&name) {
                return TypeRef::Known(known);
            }

            match name.as_str() {
                "Vec" => {
                    let inner = single_generic_arg(&segment.arguments);
                    if is_u8(inner) {
                        TypeRef::ByteSlice
                    } else {
                        TypeRef::SliceOf(Box::new(type_ref_from_syn(inner)))
                    }
                }
                "Option" => TypeRef::PointerTo(Box::new(type_ref_from_syn(single_generic_arg(&segment.arguments)))),
                "HashMap" | "BTreeMap" => {
                    let (key, value) = two_generic_args(&segment.arguments);
                    TypeRef::MapFrom { key: Box::new(type_ref_from_syn(key)), value: Box::new(type_ref_from_syn(value)) }
                }
                _ => TypeRef::Ident(name),
            }
        }
        Type::Array(array) => {
            TypeRef::ArrayOf { size: expr_to_string(&array.len), elem: Box::new(type_ref_from_syn(&array.elem)) }
        }
        Type::Reference(reference) => type_ref_from_syn(&reference.elem),
        other => panic!("unsupported field type `{}`", quote::quote!(#other)),
    }
}

fn expr_to_string(expr: &syn::Expr) -> String {
    quote::quote!(#expr).to_string()
}

fn known_base(name: &str) -> Option<BaseName> {
    Some(match name {
        "String" => BaseName::String,
        "bool" => BaseName::Bool,
        "i8" => BaseName::Int8,
        "i16" => BaseName::Int16,
        "i32" => BaseName::Int32,
        "i64" | "isize" => BaseName::Int64,
        "u8" => BaseName::Uint8,
        "u16" => BaseName::Uint16,
        "u32" => BaseName::Uint32,
        "u64" | "usize" => BaseName::Uint64,
        "f32" => BaseName::Float32,
        "f64" => BaseName::Float64,
        "Complex64" => BaseName::Complex64,
        "Complex128" => BaseName::Complex128,
        "Timestamp" => BaseName::Time,
        "Extension" => BaseName::Ext,
        _ => return None,
    })
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.path.segments.last().map(|s| s.ident == "u8").unwrap_or(false))
}

fn single_generic_arg(args: &PathArguments) -> &Type {
    let PathArguments::AngleBracketed(angled) = args else { panic!("expected a generic type argument") };
    match angled.args.first().expect("expected one generic argument") {
        GenericArgument::Type(ty) => ty,
        _ => panic!("expected a type generic argument"),
    }
}

fn two_generic_args(args: &PathArguments) -> (&Type, &Type) {
    let PathArguments::AngleBracketed(angled) = args else { panic!("expected generic type arguments") };
    let mut types = angled.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    let key = types.next().expect("expected a key type argument");
    let value = types.next().expect("expected a value type argument");
    (key, value)
}
