//! C6.2 — the `TypeDecl` producer contract (spec §6.2). This is the
//! normalized input the ingester consumes; `msgpack-derive` is the concrete
//! producer that builds this stream from `syn::DeriveInput` (parsing Rust
//! source is itself out of scope here — we only specify the contract the
//! producer must satisfy, per spec §1's "Deliberately out of scope").

/// One declared type, with its outer shape.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub shape: Shape,
}

/// A raw field as the producer observed it, before tag parsing.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub type_ref: TypeRef,
    pub tag: Option<String>,
    /// True for an embedded/anonymous field (spec §4.5: "Embedded
    /// (anonymous) field: the name is derived from the type expression").
    pub anonymous: bool,
}

/// A reference to another type, as written in source — not yet resolved to
/// a `BaseName`. Mirrors the shapes a field's type expression can take.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Ident(String),
    /// A qualified name (`pkg.Ident`); rejected with a warning when used on
    /// an embedded field (spec §4.5).
    Qualified(String, String),
    ByteSlice,
    SliceOf(Box<TypeRef>),
    ArrayOf { size: String, elem: Box<TypeRef> },
    PointerTo(Box<TypeRef>),
    MapFrom { key: Box<TypeRef>, value: Box<TypeRef> },
    Known(crate::elem::BaseName),
}

/// The outer shape of a declared type (spec §4.5).
#[derive(Debug, Clone)]
pub enum Shape {
    Record { fields: Vec<FieldDecl> },
    Alias(TypeRef),
    ArrayOf { size: String, elem: TypeRef },
    SliceOf(TypeRef),
    PointerTo(TypeRef),
    MapFrom { key: TypeRef, value: TypeRef },
}
