//! RSS 2.0 and iTunes podcast feeds, read by either xmlmap engine.
//!
//! The same [`Channel`] model comes out of both paths:
//!
//! - [`parse_str`], [`parse_reader`] and [`parse_file`] stream the document
//!   through a [`StackBuilder`](xmlmap_stream::StackBuilder) without keeping
//!   it in memory;
//! - [`decode_str`] parses an [`Element`] tree first and decodes the channel
//!   out of it.
//!
//! ```
//! let xml = r#"<rss version="2.0"><channel>
//!   <title>Daily</title>
//!   <item><title>Monday</title><pubDate>Mon, 05 Oct 2020 06:00:00 +0000</pubDate></item>
//!   <item><title>Tuesday</title><pubDate>Tue, 06 Oct 2020 06:00:00 +0000</pubDate></item>
//! </channel></rss>"#;
//!
//! let streamed = xmlmap_rss::parse_str(xml).unwrap();
//! let decoded = xmlmap_rss::decode_str(xml).unwrap();
//! assert_eq!(streamed, decoded);
//! assert_eq!(
//!     streamed.latest_item().and_then(|i| i.title.as_deref()),
//!     Some("Tuesday")
//! );
//! ```

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

mod tracing_macros;
pub(crate) use tracing_macros::trace;

mod decode;
mod entity;
mod error;
mod model;

use std::io::Read;
use std::path::Path;

use xmlmap_node::Element;
use xmlmap_stream::StreamParser;

pub use entity::RssEntity;
pub use error::RssError;
pub use model::{Channel, ChannelImage, Enclosure, Item};
pub use xmlmap_stream::BuilderOptions;

/// Stream a feed held in memory.
pub fn parse_str(xml: &str) -> Result<Channel, RssError> {
    let root = StreamParser::new(RssEntity::channel()).parse_bytes(xml.as_bytes())?;
    into_channel(root)
}

/// Stream a feed from any reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Channel, RssError> {
    parse_reader_with_options(reader, BuilderOptions::default())
}

/// Stream a feed from any reader, with explicit builder options.
pub fn parse_reader_with_options<R: Read>(
    reader: R,
    options: BuilderOptions,
) -> Result<Channel, RssError> {
    let root = StreamParser::with_options(RssEntity::channel(), options).parse_reader(reader)?;
    into_channel(root)
}

/// Stream a feed from a file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Channel, RssError> {
    let root = StreamParser::new(RssEntity::channel()).parse_file(path)?;
    into_channel(root)
}

/// Parse a feed into a tree, then decode its channel.
///
/// The channel may be the document root or a direct child of it, as in
/// `<rss><channel>…</channel></rss>`.
pub fn decode_str(xml: &str) -> Result<Channel, RssError> {
    let root = Element::parse(xml)?;
    let channel = if root.tag == "channel" {
        &root
    } else {
        root.child_elements()
            .find(|e| e.tag == "channel")
            .ok_or(RssError::MissingChannel)?
    };
    let channel: Channel = xmlmap_node::from_element(channel)?;
    trace!(items = channel.items.len(), "decoded channel");
    Ok(channel)
}

fn into_channel(root: RssEntity) -> Result<Channel, RssError> {
    match root {
        RssEntity::Channel(channel) => {
            trace!(items = channel.items.len(), "streamed channel");
            Ok(channel)
        }
        _ => Err(RssError::MissingChannel),
    }
}
