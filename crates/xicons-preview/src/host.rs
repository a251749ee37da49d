//
// host.rs
//
// Collaborator contracts: the editor host and the icon-asset resolver
//

use async_trait::async_trait;
use url::Url;

use crate::render::RenderSpec;
use crate::types::{DecorationHandle, EditorId, Position, Range};

/// The editor host the engine runs inside.
///
/// The host owns documents (mutable text buffers with a stable URI) and
/// editors (views of a document, possibly several per document). This core
/// only reads snapshots and drives the decoration primitive; it never
/// mutates host state.
pub trait EditorHost: Send + Sync {
    /// Current text snapshot of a document, or `None` if it is not open.
    fn document_text(&self, uri: &Url) -> Option<String>;

    /// Convert a byte offset within the document's current snapshot to a
    /// line/character position.
    fn position_at(&self, uri: &Url, offset: usize) -> Position;

    /// Editors currently displaying the given document (split views yield
    /// several).
    fn visible_editors(&self, uri: &Url) -> Vec<EditorId>;

    /// Every currently visible document, for initial activation.
    fn visible_documents(&self) -> Vec<Url>;

    /// Allocate a fresh decoration handle. The handle renders nothing until
    /// a decoration is applied with it.
    fn create_decoration(&self) -> DecorationHandle;

    /// Attach a rendered decoration to a range in an editor.
    fn apply_decoration(
        &self,
        editor: EditorId,
        handle: &DecorationHandle,
        range: Range,
        spec: &RenderSpec,
    );

    /// Remove a decoration's visual effect from an editor. Idempotent; a
    /// handle the host no longer renders is a harmless no-op.
    fn clear_decoration(&self, editor: EditorId, handle: &DecorationHandle);
}

/// Resolves an icon name to an embeddable image.
///
/// Contract: returns a cached result instantly when one exists for the same
/// `(subpackage, icon name)` pair; resolves to an empty string on any
/// retrieval failure and never errors past this boundary.
#[async_trait]
pub trait IconResolver: Send + Sync {
    /// Resolve `(icon_name, package_name)` to an image data URL, or an
    /// empty string when the asset cannot be retrieved.
    async fn resolve_icon(&self, icon_name: &str, package_name: &str) -> String;
}
