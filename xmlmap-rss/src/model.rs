//! The feed data model.

use http::Uri;
use xmlmap_dom::Date;

/// An RSS `<channel>`, with the iTunes podcast extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    /// `<title>`
    pub title: Option<String>,
    /// `<link>`
    pub link: Option<Uri>,
    /// `<description>`, from text or CDATA.
    pub description: Option<String>,
    /// `<language>`
    pub language: Option<String>,
    /// `<copyright>`
    pub copyright: Option<String>,
    /// `<itunes:author>`
    pub author: Option<String>,
    /// The `href` of `<itunes:image>`.
    pub itunes_image: Option<Uri>,
    /// `<itunes:explicit>`
    pub explicit: bool,
    /// `<lastBuildDate>`
    pub last_build_date: Option<Date>,
    /// `<image>`
    pub image: Option<ChannelImage>,
    /// Every `<item>`, in document order.
    pub items: Vec<Item>,
}

impl Channel {
    /// The item with the newest publication date.
    ///
    /// Items without a date are never picked. On a tie the later item wins.
    pub fn latest_item(&self) -> Option<&Item> {
        self.items
            .iter()
            .filter(|item| item.pub_date.is_some())
            .max_by_key(|item| item.pub_date)
    }
}

/// An RSS `<item>`: one episode or article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    /// `<title>`
    pub title: Option<String>,
    /// `<link>`
    pub link: Option<Uri>,
    /// `<guid>`
    pub guid: Option<String>,
    /// The `isPermaLink` attribute of `<guid>`.
    pub guid_is_permalink: bool,
    /// `<description>`, from text or CDATA.
    pub description: Option<String>,
    /// `<content:encoded>`, from text or CDATA.
    pub content_encoded: Option<String>,
    /// `<pubDate>`
    pub pub_date: Option<Date>,
    /// `<enclosure>`
    pub enclosure: Option<Enclosure>,
    /// `<itunes:duration>`, as written.
    pub duration: Option<String>,
    /// `<itunes:episode>`
    pub episode: Option<i32>,
    /// `<itunes:explicit>`
    pub explicit: bool,
}

/// The attributes of an `<enclosure>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enclosure {
    /// `url`
    pub url: Option<Uri>,
    /// `length`, in bytes.
    pub length: Option<u64>,
    /// `type`
    pub mime_type: Option<String>,
}

/// A channel `<image>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelImage {
    /// `<url>`
    pub url: Option<Uri>,
    /// `<title>`
    pub title: Option<String>,
    /// `<link>`
    pub link: Option<Uri>,
}

/// CDATA as text. Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlmap_dom::coerce::parse_date;

    fn item(title: &str, date: Option<&str>) -> Item {
        Item {
            title: Some(title.into()),
            pub_date: date.and_then(parse_date),
            ..Default::default()
        }
    }

    #[test]
    fn latest_item_compares_instants() {
        let channel = Channel {
            items: vec![
                item("old", Some("Sat, 15 Aug 2020 03:00:00 +0000")),
                item("undated", None),
                // 21:15 UTC, later than it looks
                item("new", Some("Wed, 07 Oct 2020 14:15:08 PDT")),
                item("mid", Some("Wed, 07 Oct 2020 18:00:00 +0000")),
            ],
            ..Default::default()
        };
        assert_eq!(
            channel.latest_item().and_then(|i| i.title.as_deref()),
            Some("new")
        );
    }

    #[test]
    fn latest_item_needs_a_date() {
        let channel = Channel {
            items: vec![item("undated", None)],
            ..Default::default()
        };
        assert!(channel.latest_item().is_none());
    }
}
