//! [`Fragment`] over owned elements.

use std::borrow::Cow;
use std::collections::BTreeSet;

use xmlmap_dom::Fragment;

use crate::{Content, Element};

impl Fragment for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn children_named(&self, tag: &str) -> Vec<&Self> {
        self.child_elements().filter(|e| e.tag == tag).collect()
    }

    fn attribute_named(&self, name: &str) -> Option<&str> {
        self.get_attr(name)
    }

    /// Direct text children, concatenated. Descendant text is not included.
    fn text(&self) -> Option<Cow<'_, str>> {
        let mut texts = self.children.iter().filter_map(Content::as_text);
        let first = texts.next()?;
        match texts.next() {
            None => Some(Cow::Borrowed(first)),
            Some(second) => {
                let mut joined = String::from(first);
                joined.push_str(second);
                texts.for_each(|t| joined.push_str(t));
                Some(Cow::Owned(joined))
            }
        }
    }

    /// The last direct CDATA child.
    fn cdata(&self) -> Option<Cow<'_, [u8]>> {
        self.children
            .iter()
            .rev()
            .find_map(Content::as_cdata)
            .map(Cow::Borrowed)
    }

    fn child_names(&self) -> BTreeSet<&str> {
        self.child_elements().map(|e| e.tag.as_str()).collect()
    }
}
