use indoc::indoc;
use test_log::test;
use xmlmap_dom::{Decode, DecodeError, Fragment, FragmentDecoder};
use xmlmap_node::{Element, NodeError, from_element, from_str};

#[derive(Debug, PartialEq)]
struct Episode {
    guid: String,
    permalink: bool,
    title: Option<String>,
    notes: Option<Vec<u8>>,
    audio: Option<String>,
    episode: Option<u32>,
}

impl Decode for Episode {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let c = decoder.keyed()?;
        Ok(Episode {
            guid: c.decode("guid")?,
            permalink: c.decode_if_present("guid@isPermaLink")?.unwrap_or(false),
            title: c.decode_if_present("title")?,
            notes: c.decode_cdata_if_present("notes@")?,
            audio: c.decode_if_present("enclosure@url")?,
            episode: c.decode_if_present("episode")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Show {
    version: String,
    title: String,
    episodes: Vec<Episode>,
}

impl Decode for Show {
    fn decode<F: Fragment>(decoder: &FragmentDecoder<'_, F>) -> Result<Self, DecodeError> {
        let c = decoder.keyed()?;
        Ok(Show {
            version: c.decode("@version")?,
            title: c.decode("title")?,
            episodes: c.decode_nested_if_present("episode")?.unwrap_or_default(),
        })
    }
}

const SHOW: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <show version="2.0">
      <title>Night &amp; Day</title>
      <episode>
        <guid isPermaLink="true">https://example.com/1</guid>
        <title>Pilot</title>
        <notes><![CDATA[<p>Welcome</p>]]></notes>
        <enclosure url="https://example.com/1.mp3" length="1024" type="audio/mpeg"/>
        <episode>1</episode>
      </episode>
      <episode>
        <guid>two</guid>
        <episode>two</episode>
      </episode>
    </show>
"#};

#[test]
fn decodes_from_parsed_text() {
    let show: Show = from_str(SHOW).unwrap();
    assert_eq!(show.version, "2.0");
    assert_eq!(show.title, "Night & Day");
    assert_eq!(
        show.episodes,
        vec![
            Episode {
                guid: "https://example.com/1".into(),
                permalink: true,
                title: Some("Pilot".into()),
                notes: Some(b"<p>Welcome</p>".to_vec()),
                audio: Some("https://example.com/1.mp3".into()),
                episode: Some(1),
            },
            Episode {
                guid: "two".into(),
                permalink: false,
                title: None,
                notes: None,
                audio: None,
                episode: None,
            },
        ]
    );
}

#[test]
fn nested_elements_with_the_same_tag_are_not_siblings() {
    // `<episode>` inside `<episode>` is a child of the item, not another item.
    let show: Show = from_str(SHOW).unwrap();
    assert_eq!(show.episodes.len(), 2);
}

#[test]
fn built_trees_decode_the_same_way() {
    let tree = Element::new("show")
        .with_attr("version", "2.0")
        .with_child(Element::new("title").with_text("Night & Day"));
    let show: Show = from_element(&tree).unwrap();
    assert_eq!(show.title, "Night & Day");
    assert!(show.episodes.is_empty());
}

#[test]
fn missing_required_value_reports_its_path() {
    let err = from_str::<Show>(r#"<show version="1"><title>t</title><episode/></show>"#)
        .unwrap_err();
    match err {
        NodeError::Decode(DecodeError::MissingValue { path, key }) => {
            assert_eq!(key, "guid");
            assert_eq!(path, "episode[0]");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_xml_is_not_decoded() {
    let err = from_str::<Show>("<show><title>t</show>").unwrap_err();
    assert!(matches!(err, NodeError::Unbalanced { .. }), "{err}");
}
