//! C6 — the two-pass ingester (spec §4.5, §6.2). Pass one registers every
//! declared type's name against the `identTable` so forward references
//! resolve regardless of declaration order; pass two elaborates each
//! `TypeDecl` into an `Elem` tree, parsing `msg` tags along the way.

use crate::decl::{FieldDecl, Shape, TypeDecl, TypeRef};
use crate::elem::{Base, BaseName, Elem, Struct, StructField};
use crate::session::Session;
use crate::sink::{Classification, Diagnostic};

/// Runs both passes over a batch of declarations from one compilation unit,
/// returning the elaborated trees (always wrapped in `Ptr` per spec §4.5:
/// "top-level records elaborate as `Ptr(Struct)`, matching the calling
/// convention of a struct passed by reference") alongside any diagnostics
/// raised along the way. Declarations with zero usable fields are dropped
/// (spec §4.5) and do not appear in the result.
pub fn ingest(session: &mut Session, decls: &[TypeDecl]) -> (Vec<Elem>, Vec<Diagnostic>) {
    register(session, decls);

    let mut elaborated = Vec::with_capacity(decls.len());
    let mut diagnostics = Vec::new();
    for decl in decls {
        if let Some(elem) = elaborate(session, decl, &mut diagnostics) {
            elaborated.push(elem);
        }
    }
    (elaborated, diagnostics)
}

/// Pass one: populate `identTable` with every declared name's outer base
/// kind, without descending into field types. A `Record` registers as
/// `Ident` (itself a struct); aliases register as whatever base their
/// target names, left as `Ident` if that target isn't itself known yet —
/// the resolver (C7) is what later rewrites those.
fn register(session: &mut Session, decls: &[TypeDecl]) {
    for decl in decls {
        let base = match &decl.shape {
            Shape::Record { .. } => BaseName::Ident,
            Shape::Alias(type_ref) => base_name_of(type_ref),
            Shape::ArrayOf { .. } | Shape::SliceOf(_) | Shape::PointerTo(_) | Shape::MapFrom { .. } => BaseName::Ident,
        };
        session.register_ident(decl.name.clone(), base);
    }
}

fn base_name_of(type_ref: &TypeRef) -> BaseName {
    match type_ref {
        TypeRef::Known(name) => *name,
        _ => BaseName::Ident,
    }
}

/// Pass two: elaborate one declaration. Returns `None` when the declaration
/// is a record with no usable fields (spec §4.5), recording why.
fn elaborate(session: &Session, decl: &TypeDecl, diagnostics: &mut Vec<Diagnostic>) -> Option<Elem> {
    let shape = match &decl.shape {
        Shape::Record { fields } => {
            let mut elaborated_fields = Vec::with_capacity(fields.len());
            for field in fields {
                if let Some(f) = elaborate_field(session, &decl.name, field, diagnostics) {
                    elaborated_fields.push(f);
                }
            }
            if elaborated_fields.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::debug!(decl = %decl.name, "dropping record with zero usable fields");
                diagnostics.push(Diagnostic {
                    decl_name: decl.name.clone(),
                    field_name: None,
                    classification: Classification::ZeroUsableFieldsDropped,
                });
                return None;
            }
            Elem::Struct(Struct { name: decl.name.clone(), fields: elaborated_fields, as_tuple: false })
        }
        Shape::Alias(type_ref) => elaborate_type_ref(session, type_ref, &decl.name, None, diagnostics),
        Shape::ArrayOf { size, elem } => {
            Elem::Array { size: size.clone(), elem: Box::new(elaborate_type_ref(session, elem, &decl.name, None, diagnostics)) }
        }
        Shape::SliceOf(elem) => Elem::Slice(Box::new(elaborate_type_ref(session, elem, &decl.name, None, diagnostics))),
        Shape::PointerTo(inner) => Elem::Ptr(Box::new(elaborate_type_ref(session, inner, &decl.name, None, diagnostics))),
        Shape::MapFrom { key, value } => {
            if !key_is_string(session, key) {
                diagnostics.push(Diagnostic {
                    decl_name: decl.name.clone(),
                    field_name: None,
                    classification: Classification::NonStringMapKeyRejected,
                });
            }
            Elem::Map(Box::new(elaborate_type_ref(session, value, &decl.name, None, diagnostics)))
        }
    };

    Some(match shape {
        Elem::Struct(_) => Elem::Ptr(Box::new(shape)),
        other => other,
    })
}

/// Parses one field's `msg` tag and elaborates its type, per spec §4.5's
/// tag grammar: `msg:"name"`, `msg:"-"` (omit), `msg:"name,extension"`,
/// `msg:"name,as:T,using:to/from"`. Returns `None` for an omitted field.
fn elaborate_field(
    session: &Session,
    decl_name: &str,
    field: &FieldDecl,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<StructField> {
    let tag = ParsedTag::parse(field.tag.as_deref());

    if tag.omit {
        return None;
    }

    if field.anonymous && matches!(field.type_ref, TypeRef::Qualified(..)) {
        diagnostics.push(Diagnostic {
            decl_name: decl_name.to_string(),
            field_name: Some(field.name.clone()),
            classification: Classification::QualifiedEmbeddedFieldSkipped,
        });
        return None;
    }

    if let Some(unknown) = &tag.unknown_fragment {
        #[cfg(feature = "tracing")]
        tracing::warn!(decl = %decl_name, field = %field.name, fragment = %unknown, "unknown tag fragment");
        #[cfg(not(feature = "tracing"))]
        let _ = unknown;
        diagnostics.push(Diagnostic {
            decl_name: decl_name.to_string(),
            field_name: Some(field.name.clone()),
            classification: Classification::UnknownTagFragment,
        });
    }

    let mut elem = elaborate_type_ref(session, &field.type_ref, decl_name, Some(field.name.as_str()), diagnostics);

    if tag.extension {
        match &mut elem {
            Elem::Base(base) if base.name != BaseName::Ident => base.name = BaseName::Ext,
            _ => {
                diagnostics.push(Diagnostic {
                    decl_name: decl_name.to_string(),
                    field_name: Some(field.name.clone()),
                    classification: Classification::ExtensionFieldInvalidBase,
                });
            }
        }
    }

    if let Some(unknown) = &tag.shim_target_unknown {
        diagnostics.push(Diagnostic {
            decl_name: decl_name.to_string(),
            field_name: Some(field.name.clone()),
            classification: Classification::ShimTargetBaseUnknown,
        });
        let _ = unknown;
    }

    if tag.shim_target.is_some() || tag.shim_to.is_some() || tag.shim_from.is_some() {
        if let Elem::Base(base) = &mut elem {
            if let Some(target) = tag.shim_target {
                base.name = target;
            }
            base.convert = true;
            base.shim_to_base = tag.shim_to.clone();
            base.shim_from_base = tag.shim_from.clone();
        }
    }

    let field_name = if field.anonymous { embedded_field_name(&field.type_ref) } else { field.name.clone() };
    let field_tag = Some(tag.name.unwrap_or(field_name.clone()));

    Some(StructField { field_name, field_tag, field_elem: elem })
}

/// Derives a field name for an embedded (anonymous) field from its type
/// expression (spec §4.5: "the name is derived from the type expression").
fn embedded_field_name(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Ident(name) => name.clone(),
        TypeRef::Qualified(_, name) => name.clone(),
        TypeRef::PointerTo(inner) => embedded_field_name(inner),
        _ => "_".to_string(),
    }
}

fn elaborate_type_ref(
    session: &Session,
    type_ref: &TypeRef,
    decl_name: &str,
    field_name: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Elem {
    match type_ref {
        TypeRef::Known(name) => Elem::Base(Base::known(*name)),
        TypeRef::ByteSlice => Elem::Slice(Box::new(Elem::Base(Base::known(BaseName::Byte)))),
        TypeRef::SliceOf(inner) => Elem::Slice(Box::new(elaborate_type_ref(session, inner, decl_name, field_name, diagnostics))),
        TypeRef::ArrayOf { size, elem } => Elem::Array {
            size: size.clone(),
            elem: Box::new(elaborate_type_ref(session, elem, decl_name, field_name, diagnostics)),
        },
        TypeRef::PointerTo(inner) => Elem::Ptr(Box::new(elaborate_type_ref(session, inner, decl_name, field_name, diagnostics))),
        TypeRef::MapFrom { key, value } => {
            // Map keys are always String on the wire (spec §3.3); a
            // non-string key is rejected at ingest, not silently accepted.
            if !key_is_string(session, key) {
                diagnostics.push(Diagnostic {
                    decl_name: decl_name.to_string(),
                    field_name: field_name.map(str::to_string),
                    classification: Classification::NonStringMapKeyRejected,
                });
            }
            Elem::Map(Box::new(elaborate_type_ref(session, value, decl_name, field_name, diagnostics)))
        }
        TypeRef::Qualified(_, name) => Elem::Base(Base::ident(name.clone())),
        TypeRef::Ident(name) => match session.lookup_ident(name) {
            Some(base) if base != BaseName::Ident => Elem::Base(Base::known(base)),
            _ => Elem::Base(Base::ident(name.clone())),
        },
    }
}

/// Whether a map key `TypeRef` resolves to `BaseName::String` — directly, or
/// through a named alias already registered in `identTable` (spec §3.3:
/// "Map keys are always `String` on the wire; non-string maps are rejected
/// at ingest").
fn key_is_string(session: &Session, key: &TypeRef) -> bool {
    match key {
        TypeRef::Known(BaseName::String) => true,
        TypeRef::Ident(name) => session.lookup_ident(name) == Some(BaseName::String),
        _ => false,
    }
}

/// The parsed form of an `msg:"..."` tag. `as:T` and `using:to/from` are two
/// independent fragments (spec §4.5): `as:T` names the target *base kind*
/// the field converts to, `using:to/from` names the *shim function pair*
/// that performs the conversion. Keeping them as separate fields (rather
/// than collapsing both into the same `shim_to`/`shim_from` pair) is what
/// lets the application site rewrite `Base::name` to `T` independently of
/// recording the shim function names.
struct ParsedTag {
    name: Option<String>,
    omit: bool,
    extension: bool,
    shim_target: Option<BaseName>,
    shim_target_unknown: Option<String>,
    shim_to: Option<String>,
    shim_from: Option<String>,
    unknown_fragment: Option<String>,
}

impl ParsedTag {
    fn parse(raw: Option<&str>) -> Self {
        let empty = || ParsedTag {
            name: None,
            omit: false,
            extension: false,
            shim_target: None,
            shim_target_unknown: None,
            shim_to: None,
            shim_from: None,
            unknown_fragment: None,
        };
        let Some(raw) = raw else {
            return empty();
        };
        if raw == "-" {
            return ParsedTag { omit: true, ..empty() };
        }

        let mut parts = raw.split(',');
        let name = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        let mut extension = false;
        let mut shim_target = None;
        let mut shim_target_unknown = None;
        let mut shim_to = None;
        let mut shim_from = None;
        let mut unknown_fragment = None;

        for fragment in parts {
            if fragment == "extension" {
                extension = true;
            } else if let Some(as_ty) = fragment.strip_prefix("as:") {
                match BaseName::parse_name(as_ty) {
                    Some(base) => shim_target = Some(base),
                    None => shim_target_unknown = Some(as_ty.to_string()),
                }
            } else if let Some(using) = fragment.strip_prefix("using:") {
                if let Some((to, from)) = using.split_once('/') {
                    shim_to = Some(to.to_string());
                    shim_from = Some(from.to_string());
                }
            } else if !fragment.is_empty() {
                unknown_fragment = Some(fragment.to_string());
            }
        }

        ParsedTag { name, omit: false, extension, shim_target, shim_target_unknown, shim_to, shim_from, unknown_fragment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_field(name: &str) -> FieldDecl {
        FieldDecl { name: name.to_string(), type_ref: TypeRef::Known(BaseName::String), tag: None, anonymous: false }
    }

    #[test]
    fn record_elaborates_as_pointer_to_struct() {
        let mut session = Session::new();
        let decl = TypeDecl { name: "Widget".into(), shape: Shape::Record { fields: vec![string_field("Name")] } };
        let (elems, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(diags.is_empty());
        assert_eq!(elems.len(), 1);
        assert!(matches!(&elems[0], Elem::Ptr(inner) if matches!(**inner, Elem::Struct(_))));
    }

    #[test]
    fn dash_tag_omits_field() {
        let mut session = Session::new();
        let mut field = string_field("Secret");
        field.tag = Some("-".into());
        let decl = TypeDecl { name: "Widget".into(), shape: Shape::Record { fields: vec![field, string_field("Name")] } };
        let (elems, _) = ingest(&mut session, std::slice::from_ref(&decl));
        let Elem::Ptr(inner) = &elems[0] else { panic!("expected Ptr") };
        let Elem::Struct(s) = &**inner else { panic!("expected Struct") };
        assert_eq!(s.fields.len(), 1);
        assert_eq!(s.fields[0].field_name, "Name");
    }

    #[test]
    fn record_with_only_omitted_fields_is_dropped() {
        let mut session = Session::new();
        let mut field = string_field("Secret");
        field.tag = Some("-".into());
        let decl = TypeDecl { name: "Empty".into(), shape: Shape::Record { fields: vec![field] } };
        let (elems, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(elems.is_empty());
        assert_eq!(diags[0].classification, Classification::ZeroUsableFieldsDropped);
    }

    #[test]
    fn extension_tag_on_non_base_field_is_invalid() {
        let mut session = Session::new();
        let mut field = FieldDecl { name: "Inner".into(), type_ref: TypeRef::Ident("Other".into()), tag: Some("name,extension".into()), anonymous: false };
        field.tag = Some("inner,extension".into());
        let decl = TypeDecl { name: "Widget".into(), shape: Shape::Record { fields: vec![field] } };
        let (_, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(diags.iter().any(|d| d.classification == Classification::ExtensionFieldInvalidBase));
    }

    #[test]
    fn qualified_embedded_field_is_skipped_with_diagnostic() {
        let mut session = Session::new();
        let field = FieldDecl { name: "Embedded".into(), type_ref: TypeRef::Qualified("pkg".into(), "Thing".into()), tag: None, anonymous: true };
        let decl = TypeDecl { name: "Widget".into(), shape: Shape::Record { fields: vec![field, string_field("Name")] } };
        let (elems, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(diags.iter().any(|d| d.classification == Classification::QualifiedEmbeddedFieldSkipped));
        let Elem::Ptr(inner) = &elems[0] else { panic!("expected Ptr") };
        let Elem::Struct(s) = &**inner else { panic!("expected Struct") };
        assert_eq!(s.fields.len(), 1);
    }

    #[test]
    fn forward_reference_resolves_via_registration_pass() {
        let mut session = Session::new();
        let later = TypeDecl { name: "Later".into(), shape: Shape::Alias(TypeRef::Known(BaseName::String)) };
        let field = FieldDecl { name: "Ref".into(), type_ref: TypeRef::Ident("Later".into()), tag: None, anonymous: false };
        let first = TypeDecl { name: "First".into(), shape: Shape::Record { fields: vec![field] } };
        let (elems, _) = ingest(&mut session, &[first, later]);
        let Elem::Ptr(inner) = &elems[0] else { panic!("expected Ptr") };
        let Elem::Struct(s) = &**inner else { panic!("expected Struct") };
        assert!(matches!(&s.fields[0].field_elem, Elem::Base(Base { name: BaseName::String, .. })));
    }

    #[test]
    fn as_and_using_together_rewrite_base_and_keep_both_shims() {
        let mut session = Session::new();
        let mut field = FieldDecl { name: "Temp".into(), type_ref: TypeRef::Known(BaseName::Int64), tag: None, anonymous: false };
        field.tag = Some("temp,as:Float64,using:to_float/from_float".into());
        let decl = TypeDecl { name: "Thermo".into(), shape: Shape::Record { fields: vec![field] } };
        let (elems, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(diags.is_empty());
        let Elem::Ptr(inner) = &elems[0] else { panic!("expected Ptr") };
        let Elem::Struct(s) = &**inner else { panic!("expected Struct") };
        let Elem::Base(base) = &s.fields[0].field_elem else { panic!("expected Base") };
        assert_eq!(base.name, BaseName::Float64, "as:T must overwrite the base kind, not just the shim names");
        assert!(base.convert);
        assert_eq!(base.shim_to_base.as_deref(), Some("to_float"));
        assert_eq!(base.shim_from_base.as_deref(), Some("from_float"));
    }

    #[test]
    fn unknown_as_target_is_diagnosed() {
        let mut session = Session::new();
        let mut field = FieldDecl { name: "Temp".into(), type_ref: TypeRef::Known(BaseName::Int64), tag: None, anonymous: false };
        field.tag = Some("temp,as:Kelvin,using:to_kelvin/from_kelvin".into());
        let decl = TypeDecl { name: "Thermo".into(), shape: Shape::Record { fields: vec![field] } };
        let (_, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(diags.iter().any(|d| d.classification == Classification::ShimTargetBaseUnknown));
    }

    #[test]
    fn non_string_map_key_is_rejected_with_diagnostic() {
        let mut session = Session::new();
        let field = FieldDecl {
            name: "Scores".into(),
            type_ref: TypeRef::MapFrom { key: Box::new(TypeRef::Known(BaseName::Int64)), value: Box::new(TypeRef::Known(BaseName::String)) },
            tag: None,
            anonymous: false,
        };
        let decl = TypeDecl { name: "Widget".into(), shape: Shape::Record { fields: vec![field] } };
        let (_, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(diags.iter().any(|d| d.classification == Classification::NonStringMapKeyRejected));
    }

    #[test]
    fn string_keyed_map_is_not_rejected() {
        let mut session = Session::new();
        let field = FieldDecl {
            name: "Scores".into(),
            type_ref: TypeRef::MapFrom { key: Box::new(TypeRef::Known(BaseName::String)), value: Box::new(TypeRef::Known(BaseName::Int64)) },
            tag: None,
            anonymous: false,
        };
        let decl = TypeDecl { name: "Widget".into(), shape: Shape::Record { fields: vec![field] } };
        let (_, diags) = ingest(&mut session, std::slice::from_ref(&decl));
        assert!(!diags.iter().any(|d| d.classification == Classification::NonStringMapKeyRejected));
    }
}
