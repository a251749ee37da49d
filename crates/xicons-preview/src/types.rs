//
// types.rs
//
// Core value types shared across the scan-and-decoration engine
//

use serde::{Deserialize, Serialize};

/// A zero-based line/character position within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open character range within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Stable identity of an editor view. Multiple editors can show the same
/// document; decoration caches are partitioned per editor, not per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u64);

/// Opaque host-allocated decoration identity. The host mints these via
/// `EditorHost::create_decoration`; ids are unique for the host's lifetime,
/// so equality doubles as identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecorationHandle {
    id: u64,
}

impl DecorationHandle {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Cache key uniquely identifying "this icon at this range" within an editor.
pub type CacheKey = String;

/// A single resolved icon occurrence inside an import's brace group.
/// Transient: consumed immediately to build a `DecorationRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMatch {
    pub icon_name: String,
    pub icon_package_name: String,
    /// Byte offset of the identifier's first character in the scanned text.
    pub start_offset: usize,
    /// Byte offset just past the identifier's last character.
    pub end_offset: usize,
}

/// One decoration to reconcile against an editor's cache during a scan cycle.
#[derive(Debug, Clone)]
pub struct DecorationRequest {
    pub editor: EditorId,
    pub range: Range,
    pub icon_name: String,
    pub icon_package_name: String,
    pub cache_key: CacheKey,
}

/// Derive the cache key for an icon decoration from its range and name.
///
/// Two requests with an identical key are the same visual decoration across
/// scans, even when produced by different scan passes. The range is rendered
/// as JSON so the key is stable and self-describing.
pub fn make_cache_key(range: &Range, icon_name: &str) -> CacheKey {
    // Serializing a plain pair of positions cannot fail.
    let range_json = serde_json::to_string(range).unwrap_or_default();
    format!("{range_json}---{icon_name}")
}
