//! The pipeline's compilation-unit-scoped state (spec §3.4), re-architected
//! per the §9 design note as an explicit value threaded through the
//! ingester and resolver instead of process-wide globals — the same shape
//! as the host crate's `structured::context::Context`, which holds its
//! `loaded_assemblies` map and arena as fields on a value the caller owns
//! and passes around, rather than statics.

use bumpalo::Bump;
use fxhash::FxHashMap;

use crate::elem::BaseName;

/// Owns the two global tables from spec §3.4 for the lifetime of one
/// ingest+resolve run, plus the arena backing interned names. Dropped at the
/// end of a run; nothing here outlives a `Session`.
pub struct Session {
    arena: Bump,
    /// Every type declared in the compilation unit and the base kind it
    /// reduces to (`Ident` if itself a record) — spec §3.4.
    ident_table: FxHashMap<String, BaseName>,
    /// Types for which generated code has already been materialized; the
    /// resolver leaves references through these alone (spec §3.4, §4.6).
    processed_table: FxHashMap<String, ()>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Session { arena: Bump::new(), ident_table: FxHashMap::default(), processed_table: FxHashMap::default() }
    }

    /// Interns a name in the session's arena, returning a `'static`-free
    /// borrow tied to the session's own lifetime.
    pub fn intern(&self, s: &str) -> &str {
        self.arena.alloc_str(s)
    }

    pub fn register_ident(&mut self, name: impl Into<String>, base: BaseName) {
        self.ident_table.insert(name.into(), base);
    }

    #[must_use]
    pub fn lookup_ident(&self, name: &str) -> Option<BaseName> {
        self.ident_table.get(name).copied()
    }

    pub fn mark_processed(&mut self, name: impl Into<String>) {
        self.processed_table.insert(name.into(), ());
    }

    #[must_use]
    pub fn is_processed(&self, name: &str) -> bool {
        self.processed_table.contains_key(name)
    }

    #[must_use]
    pub fn ident_table(&self) -> &FxHashMap<String, BaseName> {
        &self.ident_table
    }
}
