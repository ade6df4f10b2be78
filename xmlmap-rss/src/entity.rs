//! Streaming construction of the feed model.

use xmlmap_dom::coerce::{coerce_bool_exact, coerce_date, coerce_i32, coerce_url, parse_bool};
use xmlmap_stream::Entity;

use crate::model::{Channel, ChannelImage, Enclosure, Item, lossy};

/// The feed model as seen by the [`StackBuilder`](xmlmap_stream::StackBuilder).
///
/// `<channel>`, `<item>`, `<image>` and `<enclosure>` are entities; every
/// other element is a scalar field of the entity it appears in. Only the first
/// enclosure of an item is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum RssEntity {
    /// A `<channel>`.
    Channel(Channel),
    /// An `<item>` inside a channel.
    Item(Item),
    /// The `<image>` of a channel.
    Image(ChannelImage),
    /// An `<enclosure>` inside an item.
    Enclosure(Enclosure),
}

impl RssEntity {
    /// An empty channel, the root of a streamed feed.
    pub fn channel() -> Self {
        RssEntity::Channel(Channel::default())
    }
}

impl Entity for RssEntity {
    fn tag(&self) -> &str {
        match self {
            RssEntity::Channel(_) => "channel",
            RssEntity::Item(_) => "item",
            RssEntity::Image(_) => "image",
            RssEntity::Enclosure(_) => "enclosure",
        }
    }

    fn set_value(&mut self, value: String, tag: &str) {
        match self {
            RssEntity::Channel(channel) => channel.set_value(value, tag),
            RssEntity::Item(item) => item.set_value(value, tag),
            RssEntity::Image(image) => image.set_value(value, tag),
            RssEntity::Enclosure(_) => {}
        }
    }

    fn set_data(&mut self, data: Vec<u8>, tag: &str) {
        match self {
            RssEntity::Channel(channel) if tag == "description" => {
                channel.description.get_or_insert_with(|| lossy(&data));
            }
            RssEntity::Item(item) => match tag {
                "description" => {
                    item.description.get_or_insert_with(|| lossy(&data));
                }
                "content:encoded" => {
                    item.content_encoded.get_or_insert_with(|| lossy(&data));
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn set_attribute(&mut self, value: String, tag: Option<&str>, attribute: &str) {
        match (self, tag, attribute) {
            (RssEntity::Channel(channel), Some("itunes:image"), "href") => {
                channel.itunes_image = coerce_url(Some(&value));
            }
            (RssEntity::Item(item), Some("guid"), "isPermaLink") => {
                item.guid_is_permalink = coerce_bool_exact(Some(&value));
            }
            (RssEntity::Enclosure(enclosure), None, attribute) => match attribute {
                "url" => enclosure.url = coerce_url(Some(&value)),
                "length" => enclosure.length = value.parse().ok(),
                "type" => enclosure.mime_type = Some(value),
                _ => {}
            },
            _ => {}
        }
    }

    fn make_child_entity(&self, tag: &str) -> Option<Self> {
        match (self, tag) {
            (RssEntity::Channel(_), "item") => Some(RssEntity::Item(Item::default())),
            (RssEntity::Channel(_), "image") => Some(RssEntity::Image(ChannelImage::default())),
            (RssEntity::Item(_), "enclosure") => Some(RssEntity::Enclosure(Enclosure::default())),
            _ => None,
        }
    }

    fn set_child_entity(&mut self, child: Self, _tag: &str) {
        match (self, child) {
            (RssEntity::Channel(channel), RssEntity::Item(item)) => channel.items.push(item),
            (RssEntity::Channel(channel), RssEntity::Image(image)) => channel.image = Some(image),
            (RssEntity::Item(item), RssEntity::Enclosure(enclosure)) => {
                item.enclosure.get_or_insert(enclosure);
            }
            _ => {}
        }
    }
}

impl Channel {
    fn set_value(&mut self, value: String, tag: &str) {
        match tag {
            "title" => self.title = Some(value),
            "link" => self.link = coerce_url(Some(&value)),
            "description" => self.description = Some(value),
            "language" => self.language = Some(value),
            "copyright" => self.copyright = Some(value),
            "itunes:author" => self.author = Some(value),
            "itunes:explicit" => self.explicit = parse_bool(Some(&value)),
            "lastBuildDate" => self.last_build_date = coerce_date(Some(&value)),
            _ => {}
        }
    }
}

impl Item {
    fn set_value(&mut self, value: String, tag: &str) {
        match tag {
            "title" => self.title = Some(value),
            "link" => self.link = coerce_url(Some(&value)),
            "guid" => self.guid = Some(value),
            "description" => self.description = Some(value),
            "content:encoded" => self.content_encoded = Some(value),
            "pubDate" => self.pub_date = coerce_date(Some(&value)),
            "itunes:duration" => self.duration = Some(value),
            "itunes:episode" => self.episode = coerce_i32(Some(&value)),
            "itunes:explicit" => self.explicit = parse_bool(Some(&value)),
            _ => {}
        }
    }
}

impl ChannelImage {
    fn set_value(&mut self, value: String, tag: &str) {
        match tag {
            "url" => self.url = coerce_url(Some(&value)),
            "title" => self.title = Some(value),
            "link" => self.link = coerce_url(Some(&value)),
            _ => {}
        }
    }
}
