//! Read-only view over a parsed XML tree.

use std::borrow::Cow;
use std::collections::BTreeSet;

/// One node of an already-parsed document, as seen by the decoder.
///
/// Implementations are borrowed views: the decoder never clones a fragment,
/// it only hands out references with the lifetime of the underlying tree.
pub trait Fragment {
    /// The element name of this node.
    fn tag(&self) -> &str;

    /// All direct children with the given tag, in document order.
    fn children_named(&self, tag: &str) -> Vec<&Self>;

    /// The first direct child with the given tag.
    fn child_named(&self, tag: &str) -> Option<&Self> {
        self.children_named(tag).into_iter().next()
    }

    /// The value of the named attribute on this node.
    fn attribute_named(&self, name: &str) -> Option<&str>;

    /// The text content of this node, if it has any.
    fn text(&self) -> Option<Cow<'_, str>>;

    /// The CDATA content of this node, if it has any.
    fn cdata(&self) -> Option<Cow<'_, [u8]>>;

    /// The set of distinct tags among the direct children of this node.
    fn child_names(&self) -> BTreeSet<&str>;
}
