//! Type-introspection to code-generation pipeline for `msgpack-derive`:
//! normalizes a Rust type declaration into an element tree (C5), ingests a
//! batch of declarations against a session (C6), resolves cross-references
//! between them (C7), and exposes a visitor contract an emitter drives
//! (C8). `msgpack-derive` is the only intended caller; this crate knows
//! nothing about `proc_macro2`/`syn` so it can be unit-tested without them.

pub mod decl;
pub mod elem;
pub mod ingest;
pub mod resolve;
pub mod session;
pub mod sink;

pub use decl::{FieldDecl, Shape, TypeDecl, TypeRef};
pub use elem::{Base, BaseName, Elem, Struct, StructField};
pub use ingest::ingest;
pub use resolve::{resolve, resolve_all};
pub use session::Session;
pub use sink::{drive, Classification, Diagnostic, Sink};
