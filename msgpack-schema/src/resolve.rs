//! C7 — the reference resolver (spec §4.6, §6.2): a second pass over
//! already-elaborated trees that rewrites `Base{Ident}` nodes once the full
//! session-scoped `identTable` is known, rather than only what was visible
//! to [`crate::ingest`] at elaboration time. This is what lets a type
//! declared later in the same run, or already emitted in an earlier run
//! against the same `Session`, resolve correctly.

use crate::elem::{Base, BaseName, Elem};
use crate::session::Session;
use crate::sink::{Classification, Diagnostic};

/// Rewrites every `Base{Ident}` reachable from `elem` in place:
///
/// * if the name names a type already emitted (`Session::is_processed`),
///   the node is left alone — the emitter can reference it directly;
/// * if the name is known but not yet processed, the node is rewritten to
///   the resolved base kind with `convert` set, so the emitter inserts the
///   conversion a forward reference requires;
/// * otherwise the identifier is assumed to name a type external to this
///   session (spec §4.6) and a diagnostic is recorded, leaving the node
///   unresolved.
pub fn resolve(session: &Session, decl_name: &str, elem: &mut Elem, diagnostics: &mut Vec<Diagnostic>) {
    elem.walk_mut(&mut |node| {
        let Elem::Base(base) = node else { return };
        if base.name != BaseName::Ident {
            return;
        }
        let Some(ident) = base.ident.clone() else { return };

        if session.is_processed(&ident) {
            return;
        }

        match session.lookup_ident(&ident) {
            Some(resolved) if resolved != BaseName::Ident => {
                *base = Base { name: resolved, ident: Some(ident), convert: true, shim_to_base: None, shim_from_base: None };
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(decl = %decl_name, ident = %ident, "identifier assumed external");
                diagnostics.push(Diagnostic {
                    decl_name: decl_name.to_string(),
                    field_name: None,
                    classification: Classification::UnresolvedIdent,
                });
            }
        }
    });
}

/// Runs [`resolve`] over a batch of elaborated trees, tagged with the
/// declaration name each came from for diagnostic purposes.
pub fn resolve_all(session: &Session, named: &mut [(String, Elem)]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (name, elem) in named.iter_mut() {
        resolve(session, name, elem, &mut diagnostics);
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elem::Struct;

    #[test]
    fn processed_ident_is_left_alone() {
        let mut session = Session::new();
        session.mark_processed("Other");
        let mut elem = Elem::Base(Base::ident("Other"));
        let mut diags = Vec::new();
        resolve(&session, "Widget", &mut elem, &mut diags);
        assert!(diags.is_empty());
        assert!(elem.is_ident());
    }

    #[test]
    fn known_unprocessed_ident_is_rewritten_with_convert() {
        let mut session = Session::new();
        session.register_ident("Other", BaseName::String);
        let mut elem = Elem::Base(Base::ident("Other"));
        let mut diags = Vec::new();
        resolve(&session, "Widget", &mut elem, &mut diags);
        assert!(diags.is_empty());
        let Elem::Base(base) = &elem else { panic!() };
        assert_eq!(base.name, BaseName::String);
        assert!(base.convert);
    }

    #[test]
    fn unknown_ident_is_recorded_as_unresolved() {
        let session = Session::new();
        let mut elem = Elem::Base(Base::ident("Mystery"));
        let mut diags = Vec::new();
        resolve(&session, "Widget", &mut elem, &mut diags);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].classification, Classification::UnresolvedIdent);
        assert!(elem.is_ident());
    }

    #[test]
    fn resolver_descends_into_struct_fields() {
        let mut session = Session::new();
        session.register_ident("Other", BaseName::Int64);
        let mut elem = Elem::Ptr(Box::new(Elem::Struct(Struct {
            name: "Widget".into(),
            as_tuple: false,
            fields: vec![crate::elem::StructField {
                field_name: "Ref".into(),
                field_tag: Some("ref".into()),
                field_elem: Elem::Base(Base::ident("Other")),
            }],
        })));
        let mut diags = Vec::new();
        resolve(&session, "Widget", &mut elem, &mut diags);
        assert!(diags.is_empty());
        let Elem::Ptr(inner) = &elem else { panic!() };
        let Elem::Struct(s) = &**inner else { panic!() };
        let Elem::Base(base) = &s.fields[0].field_elem else { panic!() };
        assert_eq!(base.name, BaseName::Int64);
    }
}
