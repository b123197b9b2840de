//! C8 — the sink contract (spec §4.7, §6.3): the interface an emitter
//! consumes, plus the diagnostics contract (spec §6.4) in the concrete shape
//! SPEC_FULL §14 calls for.

use std::fmt;

use crate::elem::{Base, Elem};

/// A visitor over the resolved element tree. An emitter is a pure function
/// of the tree plus a naming strategy for temporaries (spec §4.7); the core
/// never calls back into it, so `Sink` only needs to be implementable, not
/// driven, from this crate.
pub trait Sink {
    fn visit_ptr(&mut self, inner: &Elem);
    fn visit_slice(&mut self, inner: &Elem);
    fn visit_array(&mut self, size: &str, inner: &Elem);
    fn visit_map(&mut self, value: &Elem);
    fn visit_struct(&mut self, name: &str, as_tuple: bool, fields: &[crate::elem::StructField]);
    fn visit_base(&mut self, base: &Base);
}

/// Drives a [`Sink`] over an `Elem`, dispatching on the variant set (spec
/// §6.3). This is the "mechanical walk" the spec says the renderer performs;
/// it lives here so every emitter gets it for free instead of re-deriving
/// the dispatch.
pub fn drive(sink: &mut impl Sink, elem: &Elem) {
    match elem {
        Elem::Ptr(inner) => sink.visit_ptr(inner),
        Elem::Slice(inner) => sink.visit_slice(inner),
        Elem::Array { size, elem } => sink.visit_array(size, elem),
        Elem::Map(value) => sink.visit_map(value),
        Elem::Struct(s) => sink.visit_struct(&s.name, s.as_tuple, &s.fields),
        Elem::Base(base) => sink.visit_base(base),
    }
}

/// One classification of a warning or fatal problem raised during ingest or
/// resolution (spec §6.4: "a one-line classification string").
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Classification {
    UnknownTagFragment,
    QualifiedEmbeddedFieldSkipped,
    ExtensionFieldInvalidBase,
    ZeroUsableFieldsDropped,
    UnresolvedIdent,
    ShimTargetBaseUnknown,
    NonStringMapKeyRejected,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Classification::UnknownTagFragment => "unknown tag fragment",
            Classification::QualifiedEmbeddedFieldSkipped => "qualified embedded field skipped",
            Classification::ExtensionFieldInvalidBase => "extension field does not resolve to a base type",
            Classification::ZeroUsableFieldsDropped => "record dropped: zero usable fields",
            Classification::UnresolvedIdent => "identifier assumed external",
            Classification::ShimTargetBaseUnknown => "as: target does not name a known base kind",
            Classification::NonStringMapKeyRejected => "map key is not String, rejected at ingest",
        };
        f.write_str(s)
    }
}

/// A single diagnostic (spec §6.4): the declaration name, the field name if
/// applicable, and a classification. Warnings never abort a run (spec §6.4);
/// only [`crate::resolve::resolve`] callers that specifically treat
/// `UnresolvedIdent` as fatal would do so, and that is a caller policy, not
/// this type's concern.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    pub decl_name: String,
    pub field_name: Option<String>,
    pub classification: Classification,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field_name {
            Some(field) => write!(f, "{}.{}: {}", self.decl_name, field, self.classification),
            None => write!(f, "{}: {}", self.decl_name, self.classification),
        }
    }
}
