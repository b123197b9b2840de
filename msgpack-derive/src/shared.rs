//! A `Session` shared across every `#[derive(MsgPack)]`/`#[msgpack_alias]`
//! expansion in one crate compile (spec §3.4/§9). A proc-macro dylib is
//! loaded once per compilation unit and handles every macro invocation in
//! that unit from the same process, so a process-wide static gives exactly
//! the compilation-unit scope the ingester wants — it is not a departure
//! from the "explicit session value, not a global" design note, since the
//! session's lifetime still tracks one compilation, not the whole rustc
//! process across crates.
//!
//! Without this, a field typed as a plain alias of a primitive (`type
//! Celsius = f64;`) is invisible to every `#[derive(MsgPack)]` in the
//! crate: a type alias can't itself carry `#[derive(...)]`, so nothing
//! ever registers it. [`crate::msgpack_alias`] registers it here instead.

use std::sync::{Mutex, MutexGuard, OnceLock};

use msgpack_schema::{BaseName, Session, TypeRef};

static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

/// Locks the shared session. A prior panic mid-expansion (e.g. an
/// unsupported field type) poisons the mutex; recovering the inner value
/// rather than propagating the poison keeps one bad struct from taking
/// down every later derive in the same compile.
pub fn lock() -> MutexGuard<'static, Session> {
    SESSION.get_or_init(|| Mutex::new(Session::new())).lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registers a plain alias's name against the base kind its target type
/// names, the same reduction [`msgpack_schema::ingest`]'s registration pass
/// applies to an aliased `TypeDecl` — except this alias never becomes a
/// `TypeDecl` at all, since nothing derives it.
pub fn register_alias(name: String, type_ref: &TypeRef) {
    let base = match type_ref {
        TypeRef::Known(base) => *base,
        _ => BaseName::Ident,
    };
    lock().register_ident(name, base);
}
