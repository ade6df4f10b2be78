//! Decoding the feed model from a parsed tree.

use xmlmap_dom::coerce::coerce_bool_exact;
use xmlmap_dom::{Decode, DecodeError, Fragment, FragmentDecoder, KeyedContainer};

use crate::model::{Channel, ChannelImage, Enclosure, Item, lossy};

/// Text of the child `tag`, or its CDATA when it has no text.
fn text_or_cdata<F: Fragment>(
    c: &KeyedContainer<'_, '_, F>,
    tag: &str,
) -> Result<Option<String>, DecodeError> {
    if let Some(text) = c.decode_if_present::<String>(tag)? {
        return Ok(Some(text));
    }
    let data = c.decode_cdata_if_present(&format!("{tag}@"))?;
    Ok(data.as_deref().map(lossy))
}

impl Decode for Channel {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let c = decoder.keyed()?;
        Ok(Channel {
            title: c.decode_if_present("title")?,
            link: c.decode_if_present("link")?,
            description: text_or_cdata(&c, "description")?,
            language: c.decode_if_present("language")?,
            copyright: c.decode_if_present("copyright")?,
            author: c.decode_if_present("itunes:author")?,
            itunes_image: c.decode_if_present("itunes:image@href")?,
            explicit: c.decode_if_present("itunes:explicit")?.unwrap_or(false),
            last_build_date: c.decode_if_present("lastBuildDate")?,
            image: c.decode_nested_if_present("image")?,
            items: c.decode_nested_if_present("item")?.unwrap_or_default(),
        })
    }
}

impl Decode for Item {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let c = decoder.keyed()?;
        let permalink: Option<String> = c.decode_if_present("guid@isPermaLink")?;
        // Several enclosures are legal; the model keeps the first.
        let enclosures: Option<Vec<Enclosure>> = c.decode_nested_if_present("enclosure")?;
        Ok(Item {
            title: c.decode_if_present("title")?,
            link: c.decode_if_present("link")?,
            guid: c.decode_if_present("guid")?,
            guid_is_permalink: coerce_bool_exact(permalink.as_deref()),
            description: text_or_cdata(&c, "description")?,
            content_encoded: text_or_cdata(&c, "content:encoded")?,
            pub_date: c.decode_if_present("pubDate")?,
            enclosure: enclosures.and_then(|e| e.into_iter().next()),
            duration: c.decode_if_present("itunes:duration")?,
            episode: c.decode_if_present("itunes:episode")?,
            explicit: c.decode_if_present("itunes:explicit")?.unwrap_or(false),
        })
    }
}

impl Decode for Enclosure {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let c = decoder.keyed()?;
        Ok(Enclosure {
            url: c.decode_if_present("@url")?,
            length: c.decode_if_present("@length")?,
            mime_type: c.decode_if_present("@type")?,
        })
    }
}

impl Decode for ChannelImage {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let c = decoder.keyed()?;
        Ok(ChannelImage {
            url: c.decode_if_present("url")?,
            title: c.decode_if_present("title")?,
            link: c.decode_if_present("link")?,
        })
    }
}
