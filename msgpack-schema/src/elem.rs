//! C5 — the element tree (spec §3.3). Modeled as a tagged sum plus a
//! visitor (spec §9 design note: "pattern-match per variant; no vtable is
//! required"), the way the host crate's `structured::types::Type` is a
//! `Copy` enum over `{Primitive, Class, Interface}` rather than a class
//! hierarchy.

use std::fmt;

/// The known base kinds an `Elem::Base` can resolve to, plus `Ident` for an
/// identifier that hasn't been resolved yet (spec §3.3).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BaseName {
    String,
    Bytes,
    Byte,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Bool,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Time,
    Intf,
    Ext,
    /// An identifier not (yet) reduced to a known base — a reference to
    /// another declared type.
    Ident,
}

impl BaseName {
    /// Parses the textual name a `msg:"...,as:T,..."` tag fragment or a
    /// `#[msgpack_alias(T)]` attribute spells `T` with, matching this enum's
    /// own variant names (the inverse of [`BaseName::fmt`]'s `Display` impl).
    /// Returns `None` for `Ident` itself and for anything unrecognized — an
    /// alias always targets a *known* base kind.
    #[must_use]
    pub fn parse_name(s: &str) -> Option<BaseName> {
        Some(match s {
            "String" => BaseName::String,
            "Bytes" => BaseName::Bytes,
            "Byte" => BaseName::Byte,
            "Int" => BaseName::Int,
            "Int8" => BaseName::Int8,
            "Int16" => BaseName::Int16,
            "Int32" => BaseName::Int32,
            "Int64" => BaseName::Int64,
            "Uint" => BaseName::Uint,
            "Uint8" => BaseName::Uint8,
            "Uint16" => BaseName::Uint16,
            "Uint32" => BaseName::Uint32,
            "Uint64" => BaseName::Uint64,
            "Bool" => BaseName::Bool,
            "Float32" => BaseName::Float32,
            "Float64" => BaseName::Float64,
            "Complex64" => BaseName::Complex64,
            "Complex128" => BaseName::Complex128,
            "Time" => BaseName::Time,
            "Intf" => BaseName::Intf,
            "Ext" => BaseName::Ext,
            _ => return None,
        })
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseName::String => "String",
            BaseName::Bytes => "Bytes",
            BaseName::Byte => "Byte",
            BaseName::Int => "Int",
            BaseName::Int8 => "Int8",
            BaseName::Int16 => "Int16",
            BaseName::Int32 => "Int32",
            BaseName::Int64 => "Int64",
            BaseName::Uint => "Uint",
            BaseName::Uint8 => "Uint8",
            BaseName::Uint16 => "Uint16",
            BaseName::Uint32 => "Uint32",
            BaseName::Uint64 => "Uint64",
            BaseName::Bool => "Bool",
            BaseName::Float32 => "Float32",
            BaseName::Float64 => "Float64",
            BaseName::Complex64 => "Complex64",
            BaseName::Complex128 => "Complex128",
            BaseName::Time => "Time",
            BaseName::Intf => "Intf",
            BaseName::Ext => "Ext",
            BaseName::Ident => "Ident",
        };
        f.write_str(s)
    }
}

/// A leaf of the element tree: a known base kind, or an unresolved
/// identifier, with the attributes §3.3 calls for.
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub name: BaseName,
    /// The textual name when `name == BaseName::Ident`, or the alias name a
    /// known base was reached through (spec §3.3).
    pub ident: Option<String>,
    /// Set when the field requires an explicit conversion in emitted code
    /// (a named alias of a base kind, or a `using:`-shimmed field).
    pub convert: bool,
    pub shim_to_base: Option<String>,
    pub shim_from_base: Option<String>,
}

impl Base {
    pub fn known(name: BaseName) -> Self {
        Base { name, ident: None, convert: false, shim_to_base: None, shim_from_base: None }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Base { name: BaseName::Ident, ident: Some(name.into()), convert: false, shim_to_base: None, shim_from_base: None }
    }
}

/// One field of an elaborated `Struct` (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub field_name: String,
    /// The wire key; `None` means the field is omitted (`msg:"-"`).
    pub field_tag: Option<String>,
    pub field_elem: Elem,
}

/// An elaborated record type (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<StructField>,
    pub as_tuple: bool,
}

/// The polymorphic element-tree node (spec §3.3). A `Ptr`'s value is never
/// itself a `Ptr` — pointers collapse at ingest (enforced in
/// [`crate::ingest`], not representable here by construction since nothing
/// stops a caller from nesting `Ptr(Ptr(..))` by hand; the ingester is the
/// single producer that upholds the invariant).
#[derive(Debug, Clone, PartialEq)]
pub enum Elem {
    Ptr(Box<Elem>),
    Slice(Box<Elem>),
    Array { size: String, elem: Box<Elem> },
    /// Map keys are always strings on the wire (spec §3.3); only the value
    /// type varies.
    Map(Box<Elem>),
    Struct(Struct),
    Base(Base),
}

impl Elem {
    #[must_use]
    pub fn is_ident(&self) -> bool {
        matches!(self, Elem::Base(Base { name: BaseName::Ident, .. }))
    }

    /// Pattern-matching visitor over the variant set (spec §6.3/§9): walks
    /// every child `Elem`, depth-first, calling `f` on each node including
    /// `self`.
    pub fn walk(&self, f: &mut impl FnMut(&Elem)) {
        f(self);
        match self {
            Elem::Ptr(inner) | Elem::Slice(inner) => inner.walk(f),
            Elem::Array { elem, .. } => elem.walk(f),
            Elem::Map(value) => value.walk(f),
            Elem::Struct(s) => {
                for field in &s.fields {
                    field.field_elem.walk(f);
                }
            }
            Elem::Base(_) => {}
        }
    }

    /// Mutable counterpart of [`Elem::walk`], used by the resolver (C7) to
    /// rewrite `Base{Ident}` nodes in place.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Elem)) {
        f(self);
        match self {
            Elem::Ptr(inner) | Elem::Slice(inner) => inner.walk_mut(f),
            Elem::Array { elem, .. } => elem.walk_mut(f),
            Elem::Map(value) => value.walk_mut(f),
            Elem::Struct(s) => {
                for field in &mut s.fields {
                    field.field_elem.walk_mut(f);
                }
            }
            Elem::Base(_) => {}
        }
    }
}
