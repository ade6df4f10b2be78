use chrono::{Datelike, Timelike};
use indoc::indoc;
use test_log::test;
use xmlmap_rss::{Channel, RssError, decode_str, parse_str};

const PODCAST: &str = include_str!("fixtures/podcast.xml");
const NEWS: &str = include_str!("fixtures/news.xml");

fn both(xml: &str) -> [Channel; 2] {
    [parse_str(xml).unwrap(), decode_str(xml).unwrap()]
}

#[test]
fn podcast_channel_fields() {
    for channel in both(PODCAST) {
        assert_eq!(channel.title.as_deref(), Some("Morning Signal"));
        assert_eq!(
            channel.link.as_ref().map(|u| u.to_string()).as_deref(),
            Some("https://signal.example.com/")
        );
        assert_eq!(
            channel.description.as_deref(),
            Some("A daily <em>briefing</em> on systems programming.")
        );
        assert_eq!(channel.language.as_deref(), Some("en-us"));
        assert_eq!(channel.copyright.as_deref(), Some("© 2020 Signal Media"));
        assert_eq!(channel.author.as_deref(), Some("Signal Media"));
        assert_eq!(
            channel.itunes_image.as_ref().and_then(|u| u.host()),
            Some("signal.example.com")
        );
        assert!(channel.explicit);

        let built = channel.last_build_date.unwrap();
        assert_eq!(built.offset().local_minus_utc(), -7 * 3600);
        assert_eq!((built.day(), built.hour()), (7, 14));

        let image = channel.image.as_ref().unwrap();
        assert_eq!(image.title.as_deref(), Some("Morning Signal"));
        assert_eq!(
            image.url.as_ref().map(|u| u.path()),
            Some("/logo.png")
        );
        assert_eq!(channel.items.len(), 3);
    }
}

#[test]
fn podcast_items() {
    for channel in both(PODCAST) {
        let first = &channel.items[0];
        assert_eq!(first.title.as_deref(), Some("Episode 12: Lock-free queues"));
        assert_eq!(first.guid.as_deref(), Some("signal-0012"));
        assert!(!first.guid_is_permalink);
        assert_eq!(
            first.description.as_deref(),
            Some("Why compare-and-swap is not enough.")
        );
        assert_eq!(
            first.content_encoded.as_deref(),
            Some(r#"<p>Show notes with <a href="https://example.com">links</a>.</p>"#)
        );
        let enclosure = first.enclosure.as_ref().unwrap();
        assert_eq!(enclosure.length, Some(31_457_280));
        assert_eq!(enclosure.mime_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(
            enclosure.url.as_ref().map(|u| u.path()),
            Some("/12.mp3")
        );
        assert_eq!(first.duration.as_deref(), Some("00:32:10"));
        assert_eq!(first.episode, Some(12));
        assert!(!first.explicit);

        let second = &channel.items[1];
        assert!(second.guid_is_permalink);
        assert_eq!(second.description.as_deref(), Some("Bump allocation & friends."));
        assert!(second.explicit);

        let trailer = &channel.items[2];
        assert_eq!(trailer.episode, None);
        assert_eq!(trailer.enclosure, None);
        assert_eq!(trailer.link, None);
    }
}

#[test]
fn latest_item_is_the_newest_episode() {
    for channel in both(PODCAST) {
        let latest = channel.latest_item().unwrap();
        assert_eq!(latest.guid.as_deref(), Some("signal-0012"));
    }
}

#[test]
fn malformed_values_are_absent() {
    for channel in both(NEWS) {
        assert_eq!(channel.last_build_date, None);
        assert_eq!(channel.description.as_deref(), Some("Local news, tides & weather."));

        let ferry = &channel.items[0];
        assert_eq!(
            ferry.description.as_deref(),
            Some("<p>Weekend sailings move to 9am.</p>")
        );
        assert_eq!(ferry.pub_date.unwrap().hour(), 8);

        let tides = &channel.items[1];
        assert_eq!(tides.link, None);
        assert_eq!(tides.pub_date, None);
        assert_eq!(channel.latest_item().and_then(|i| i.title.as_deref()), Some("Ferry schedule changes"));
    }
}

#[test]
fn feeds_without_a_channel() {
    let xml = indoc! {r#"
        <feed xmlns="http://www.w3.org/2005/Atom">
          <title>Not RSS</title>
        </feed>
    "#};
    assert!(matches!(parse_str(xml), Err(RssError::MissingChannel)));
    assert!(matches!(decode_str(xml), Err(RssError::MissingChannel)));
}

#[test]
fn truncated_feeds_keep_what_streamed() {
    let cut = PODCAST.find("<title>Trailer</title>").unwrap();
    let channel = parse_str(&PODCAST[..cut]).unwrap();
    // The open trailer item never closed, so it was never attached.
    assert_eq!(channel.items.len(), 2);

    assert!(matches!(decode_str(&PODCAST[..cut]), Err(RssError::Node(_))));
}

#[test]
fn first_enclosure_wins() {
    let xml = indoc! {r#"
        <rss><channel><item>
          <enclosure url="https://cdn.example.com/hi.m4a" type="audio/mp4"/>
          <enclosure url="https://cdn.example.com/lo.mp3" length="99" type="audio/mpeg"/>
        </item></channel></rss>
    "#};
    for channel in both(xml) {
        let enclosure = channel.items[0].enclosure.as_ref().unwrap();
        assert_eq!(enclosure.url.as_ref().map(|u| u.path()), Some("/hi.m4a"));
        assert_eq!(enclosure.length, None);
        assert_eq!(enclosure.mime_type.as_deref(), Some("audio/mp4"));
    }
}

#[test]
fn small_chunks_keep_items_apart() {
    use xmlmap_rss::{BuilderOptions, parse_reader_with_options};

    let xml = indoc! {r#"
        <rss><channel>
          <item><title>one</title><link>https://example.com/1</link></item>
          <item><title>two</title><link>https://example.com/2</link></item>
        </channel></rss>
    "#};
    let reference = parse_str(xml).unwrap();
    assert_eq!(reference.items.len(), 2);

    for chunk_size in [16, 20, 40] {
        let options = BuilderOptions::default().with_chunk_size(chunk_size);
        let channel = parse_reader_with_options(xml.as_bytes(), options).unwrap();
        let items: Vec<_> = channel
            .items
            .iter()
            .map(|i| (i.title.as_deref(), i.link.as_ref().map(|u| u.path())))
            .collect();
        assert_eq!(
            items,
            vec![(Some("one"), Some("/1")), (Some("two"), Some("/2"))],
            "chunk size {chunk_size}"
        );
        assert_eq!(channel, reference, "chunk size {chunk_size}");
    }
}
