// lib.rs — Incremental scan-and-decoration engine for inline icon previews.
//
// Scans editor text for qualifying icon-library imports, resolves each
// imported identifier to a character range, and reconciles a per-editor
// cache of decoration handles so re-scans reuse unchanged decorations and
// clear stale ones. The editor host and the icon-asset resolver are
// collaborators behind the traits in `host`.

pub mod config;
pub mod debounce;
pub mod decoration_cache;
pub mod engine;
pub mod host;
pub mod icon_source;
pub mod import_matcher;
pub mod range_resolver;
pub mod render;
pub mod scanner;
pub mod types;

// test_utils is available in test builds and when the `test-support` feature
// is enabled, so integration tests and downstream harnesses can import the
// fake host directly.
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;



pub use config::PreviewConfig;
pub use engine::PreviewEngine;
pub use host::{EditorHost, IconResolver};
pub use icon_source::CdnIconResolver;
pub use scanner::ScanStrategy;
pub use types::{DecorationHandle, DecorationRequest, EditorId, Position, Range};
