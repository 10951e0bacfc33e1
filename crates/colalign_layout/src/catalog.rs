//! Type alignment model
//!
//! Maps PostgreSQL type identifiers to their on-disk size and alignment.
//! Variable-length types carry the [`Alignment::Variable`] sentinel and are
//! never padded against. Unknown identifiers resolve to a configurable
//! fallback so a lookup never fails.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Revision of the built-in type table. Bump whenever a layout changes.
pub const CATALOG_REVISION: u32 = 1;

/// Width recorded for variable-length values. Not their real size.
pub const VARIABLE_NOMINAL_SIZE: u32 = 10;

/// Byte boundary a value must start on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Alignment {
    /// Start offset must be a multiple of this many bytes. `Bytes(0)` imposes nothing.
    Bytes(u32),
    /// Variable-length storage, no alignment requirement.
    Variable,
}

impl Alignment {
    /// Raw value used for [`Alignment::Variable`] in serialized output.
    pub const SENTINEL: i64 = -1;

    #[inline]
    pub fn is_variable(self) -> bool {
        matches!(self, Alignment::Variable)
    }

    /// Boundary that padding has to satisfy, `None` when unconstrained.
    #[inline]
    pub fn boundary(self) -> Option<u32> {
        match self {
            Alignment::Bytes(0) | Alignment::Variable => None,
            Alignment::Bytes(bytes) => Some(bytes),
        }
    }

    #[inline]
    pub fn as_raw(self) -> i64 {
        match self {
            Alignment::Bytes(bytes) => i64::from(bytes),
            Alignment::Variable => Self::SENTINEL,
        }
    }

    /// Ordering key for placement: fixed alignments outrank variable ones,
    /// larger boundaries outrank smaller ones.
    #[inline]
    pub(crate) fn placement_key(self) -> (bool, u32) {
        match self {
            Alignment::Bytes(bytes) => (true, bytes),
            Alignment::Variable => (false, 0),
        }
    }
}

impl From<Alignment> for i64 {
    fn from(value: Alignment) -> Self {
        value.as_raw()
    }
}

impl TryFrom<i64> for Alignment {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw == Self::SENTINEL {
            return Ok(Alignment::Variable);
        }
        u32::try_from(raw)
            .map(Alignment::Bytes)
            .map_err(|_| format!("invalid alignment {raw}: expected -1 or a byte count"))
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("variable") {
            return Ok(Alignment::Variable);
        }
        let raw: i64 = trimmed
            .parse()
            .map_err(|_| format!("Unknown alignment: {s}"))?;
        Alignment::try_from(raw)
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

/// Storage footprint of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLayout {
    pub size: u32,
    pub alignment: Alignment,
}

impl TypeLayout {
    pub const fn new(size: u32, alignment: Alignment) -> Self {
        Self { size, alignment }
    }

    /// Fixed-length type aligned on its own size.
    pub const fn fixed(size: u32) -> Self {
        Self::new(size, Alignment::Bytes(size))
    }

    pub const fn aligned(size: u32, alignment: u32) -> Self {
        Self::new(size, Alignment::Bytes(alignment))
    }

    pub const fn variable() -> Self {
        Self::new(VARIABLE_NOMINAL_SIZE, Alignment::Variable)
    }
}

impl Default for TypeLayout {
    fn default() -> Self {
        Self::variable()
    }
}

/// PostgreSQL layouts (`pg_type.typlen` / `typalign`), keyed by the
/// information_schema spelling and the usual aliases.
static BUILTIN_LAYOUTS: Lazy<AHashMap<&'static str, TypeLayout>> = Lazy::new(|| {
    let entries: &[(&[&str], TypeLayout)] = &[
        (&["boolean", "bool"], TypeLayout::fixed(1)),
        (&["\"char\""], TypeLayout::fixed(1)),
        (&["name"], TypeLayout::aligned(64, 1)),
        (
            &["smallint", "int2", "smallserial", "serial2"],
            TypeLayout::fixed(2),
        ),
        (
            &["integer", "int", "int4", "serial", "serial4"],
            TypeLayout::fixed(4),
        ),
        (&["bigint", "int8", "bigserial", "serial8"], TypeLayout::fixed(8)),
        (&["real", "float4"], TypeLayout::fixed(4)),
        (&["double precision", "float8", "float"], TypeLayout::fixed(8)),
        (&["money"], TypeLayout::fixed(8)),
        (
            &["oid", "regclass", "regproc", "regtype", "xid", "cid"],
            TypeLayout::fixed(4),
        ),
        (&["pg_lsn"], TypeLayout::fixed(8)),
        (&["tid"], TypeLayout::aligned(6, 2)),
        (&["date"], TypeLayout::fixed(4)),
        (&["time without time zone", "time"], TypeLayout::fixed(8)),
        (&["time with time zone", "timetz"], TypeLayout::aligned(12, 8)),
        (
            &["timestamp without time zone", "timestamp"],
            TypeLayout::fixed(8),
        ),
        (
            &["timestamp with time zone", "timestamptz"],
            TypeLayout::fixed(8),
        ),
        (&["interval"], TypeLayout::aligned(16, 8)),
        (&["uuid"], TypeLayout::aligned(16, 1)),
        (&["macaddr"], TypeLayout::aligned(6, 4)),
        (&["macaddr8"], TypeLayout::aligned(8, 4)),
        (&["point"], TypeLayout::aligned(16, 8)),
        (
            &[
                "text",
                "character varying",
                "varchar",
                "character",
                "char",
                "bpchar",
                "bytea",
                "numeric",
                "decimal",
                "json",
                "jsonb",
                "xml",
                "inet",
                "cidr",
                "bit",
                "bit varying",
                "varbit",
                "tsvector",
                "tsquery",
                "array",
            ],
            TypeLayout::variable(),
        ),
    ];

    let mut map = AHashMap::new();
    for (names, layout) in entries {
        for name in *names {
            map.insert(*name, *layout);
        }
    }
    map
});

/// Lower-cases, drops type modifiers such as `(32)` and collapses whitespace.
fn normalize(identifier: &str) -> String {
    let mut stripped = String::with_capacity(identifier.len());
    let mut depth = 0usize;
    for ch in identifier.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(ch.to_ascii_lowercase()),
            _ => {}
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves type identifiers to layouts.
///
/// The built-in table is shared process-wide; a catalog only adds its own
/// fallback and per-type overrides on top of it.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    fallback: TypeLayout,
    overrides: AHashMap<String, TypeLayout>,
}

impl TypeCatalog {
    pub fn new(fallback: TypeLayout) -> Self {
        Self {
            fallback,
            overrides: AHashMap::new(),
        }
    }

    /// Built-in PostgreSQL table with the default fallback.
    pub fn postgres() -> Self {
        Self::new(TypeLayout::default())
    }

    /// Overrides (or adds) the layout of one type identifier.
    pub fn with_override(mut self, identifier: &str, layout: TypeLayout) -> Self {
        self.overrides.insert(normalize(identifier), layout);
        self
    }

    pub fn fallback(&self) -> TypeLayout {
        self.fallback
    }

    pub fn lookup(&self, identifier: &str) -> Option<TypeLayout> {
        let key = normalize(identifier);
        if let Some(layout) = self.overrides.get(&key) {
            return Some(*layout);
        }
        if key.ends_with("[]") {
            return Some(TypeLayout::variable());
        }
        BUILTIN_LAYOUTS.get(key.as_str()).copied()
    }

    #[inline]
    pub fn is_known(&self, identifier: &str) -> bool {
        self.lookup(identifier).is_some()
    }

    /// Layout for `identifier`, or the fallback when it is unknown.
    pub fn resolve(&self, identifier: &str) -> TypeLayout {
        self.lookup(identifier).unwrap_or_else(|| {
            debug!(data_type = identifier, fallback = ?self.fallback, "unknown data type");
            self.fallback
        })
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::postgres()
    }
}
