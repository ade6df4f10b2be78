use xmlmap_stream::{BuilderOptions, Entity, StreamParser};

#[derive(Debug, Default, PartialEq)]
struct Channel {
    title: Option<String>,
    items: Vec<Item>,
}

#[derive(Debug, Default, PartialEq)]
struct Item {
    title: Option<String>,
}

enum Rss {
    Channel(Channel),
    Item(Item),
}

impl Entity for Rss {
    fn tag(&self) -> &str {
        match self {
            Rss::Channel(_) => "channel",
            Rss::Item(_) => "item",
        }
    }

    fn set_value(&mut self, value: String, tag: &str) {
        if tag != "title" {
            return;
        }
        match self {
            Rss::Channel(c) => c.title = Some(value),
            Rss::Item(i) => i.title = Some(value),
        }
    }

    fn make_child_entity(&self, tag: &str) -> Option<Self> {
        match (self, tag) {
            (Rss::Channel(_), "item") => Some(Rss::Item(Item::default())),
            _ => None,
        }
    }

    fn set_child_entity(&mut self, child: Self, _tag: &str) {
        if let (Rss::Channel(c), Rss::Item(i)) = (self, child) {
            c.items.push(i);
        }
    }
}

const FEED: &[u8] = b"<rss><channel><title>Radio</title>\
    <item><title>One</title></item><item><title>Two</title></item></channel></rss>";

#[tokio::test]
async fn parses_from_an_async_reader() {
    let options = BuilderOptions::default().with_chunk_size(4);
    let root = StreamParser::with_options(Rss::Channel(Channel::default()), options)
        .parse_async(FEED)
        .await
        .unwrap();
    let Rss::Channel(channel) = root else {
        panic!("expected a channel");
    };
    assert_eq!(channel.title.as_deref(), Some("Radio"));
    let titles: Vec<_> = channel.items.iter().filter_map(|i| i.title.as_deref()).collect();
    assert_eq!(titles, ["One", "Two"]);
}

#[tokio::test]
async fn async_and_blocking_agree() {
    let blocking = StreamParser::new(Rss::Channel(Channel::default()))
        .parse_reader(FEED)
        .unwrap();
    let streamed = StreamParser::new(Rss::Channel(Channel::default()))
        .parse_async(FEED)
        .await
        .unwrap();
    match (blocking, streamed) {
        (Rss::Channel(a), Rss::Channel(b)) => assert_eq!(a, b),
        _ => panic!("expected channels"),
    }
}
