//! Push-style XML tokenizer on top of quick-xml.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::errors::SyntaxError;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::TokenizerError;
use crate::{trace, warning};

/// Receiver of tokenizer events, in document order.
pub trait SaxHandler {
    /// An element opened. Duplicate attribute names keep the last value.
    fn start_element(&mut self, name: &str, attributes: HashMap<String, String>);

    /// A run of character data. One text run may arrive in several calls, and
    /// whitespace-only runs are delivered too.
    fn characters(&mut self, text: &str);

    /// A CDATA section.
    fn cdata(&mut self, data: &[u8]);

    /// An element closed.
    fn end_element(&mut self, name: &str);

    /// The input is exhausted. Called exactly once, after every other event.
    fn end_document(&mut self);

    /// The tokenizer hit malformed input. Tokenizing continues afterwards.
    fn parse_error(&mut self, error: TokenizerError);
}

/// Tokenizer fed with arbitrary byte chunks.
///
/// Bytes are buffered until they contain complete markup, so chunk
/// boundaries may fall anywhere, including inside a tag or a CDATA section.
/// Empty elements are reported as a start followed by an end.
#[derive(Debug, Default)]
pub struct PushTokenizer {
    buffer: Vec<u8>,
    depth: usize,
    finished: bool,
}

impl PushTokenizer {
    /// Create a tokenizer with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`finish`](Self::finish) has been called since the last reset.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Forget all buffered input so the tokenizer can be reused.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.depth = 0;
        self.finished = false;
    }

    /// Append a chunk and deliver every event it completes.
    pub fn feed<H: SaxHandler + ?Sized>(&mut self, chunk: &[u8], handler: &mut H) {
        if self.finished {
            warning!(len = chunk.len(), "chunk fed after finish, ignoring");
            return;
        }
        self.buffer.extend_from_slice(chunk);

        // Anything after the last `>` cannot be complete markup yet.
        let Some(end) = self.buffer.iter().rposition(|&b| b == b'>') else {
            return;
        };
        let consumed = scan(&self.buffer[..=end], false, &mut self.depth, handler);
        self.buffer.drain(..consumed);
        trace!(consumed, buffered = self.buffer.len(), "fed chunk");
    }

    /// Deliver the remaining events, then `end_document`.
    pub fn finish<H: SaxHandler + ?Sized>(&mut self, handler: &mut H) {
        if self.finished {
            return;
        }
        self.finished = true;

        scan(&self.buffer, true, &mut self.depth, handler);
        self.buffer.clear();

        if self.depth > 0 {
            handler.parse_error(TokenizerError::UnexpectedEof {
                open_elements: self.depth,
            });
        }
        handler.end_document();
    }
}

/// Deliver the events in `input`, returning how many bytes were consumed.
///
/// Unless `at_eof`, a construct cut off by the end of `input` is left
/// unconsumed so it can be retried with more data. Any other malformed
/// markup is reported and skipped up to its closing `>`.
fn scan<H: SaxHandler + ?Sized>(
    input: &[u8],
    at_eof: bool,
    depth: &mut usize,
    handler: &mut H,
) -> usize {
    let mut consumed = 0;
    // A fresh reader per pass: quick-xml stops for good after a syntax error.
    while consumed < input.len() {
        let base = consumed;
        let mut reader = Reader::from_reader(&input[base..]);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        // Start tags may have been delivered by an earlier chunk.
        config.allow_unmatched_ends = true;
        config.expand_empty_elements = true;

        loop {
            let event = reader.read_event();
            let position = base + reader.buffer_position() as usize;
            match event {
                Ok(Event::Eof) => return input.len(),
                Ok(Event::Text(_)) if !at_eof && position >= input.len() => return consumed,
                Ok(event) => {
                    if let Err(error) = dispatch(event, reader.decoder(), depth, handler) {
                        handler.parse_error(error);
                    }
                }
                Err(quick_xml::Error::Syntax(cause)) if !at_eof && runs_out(&cause) => {
                    return consumed;
                }
                Err(quick_xml::Error::IllFormed(error)) => {
                    // The reader has already stepped over the offending markup.
                    handler.parse_error(TokenizerError::Syntax(error.to_string()));
                }
                Err(error) => {
                    let at = base + reader.error_position() as usize;
                    trace!(at, "skipping malformed markup");
                    handler.parse_error(TokenizerError::Syntax(error.to_string()));
                    consumed = resume_after(input, at);
                    break;
                }
            }
            consumed = position;
        }
    }
    consumed.min(input.len())
}

/// Whether a syntax error means the input ended inside a construct.
fn runs_out(cause: &SyntaxError) -> bool {
    !matches!(cause, SyntaxError::InvalidBangMarkup)
}

/// Offset just past the first `>` after the `<` at `at`, or the end of input.
fn resume_after(input: &[u8], at: usize) -> usize {
    let from = (at + 1).min(input.len());
    input[from..]
        .iter()
        .position(|&b| b == b'>')
        .map_or(input.len(), |i| from + i + 1)
}

fn dispatch<H: SaxHandler + ?Sized>(
    event: Event<'_>,
    decoder: Decoder,
    depth: &mut usize,
    handler: &mut H,
) -> Result<(), TokenizerError> {
    match event {
        Event::Start(e) => {
            let (name, attributes) = start_parts(&e, decoder)?;
            *depth += 1;
            handler.start_element(&name, attributes);
        }
        Event::Empty(e) => {
            let (name, attributes) = start_parts(&e, decoder)?;
            handler.start_element(&name, attributes);
            handler.end_element(&name);
        }
        Event::End(e) => {
            let qname = e.name();
            let name = utf8(qname.as_ref())?;
            *depth = depth.saturating_sub(1);
            handler.end_element(name);
        }
        Event::Text(e) => {
            let text = e
                .decode()
                .map_err(|err| TokenizerError::Syntax(err.to_string()))?;
            handler.characters(&text);
        }
        Event::GeneralRef(e) => {
            // quick-xml reports `&...;` separately from the surrounding text.
            let raw = e
                .decode()
                .map_err(|err| TokenizerError::Syntax(err.to_string()))?;
            handler.characters(&resolve_entity(&raw)?);
        }
        Event::CData(e) => handler.cdata(e.as_ref()),
        Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) | Event::Eof => {}
    }
    Ok(())
}

fn start_parts(
    e: &BytesStart<'_>,
    decoder: Decoder,
) -> Result<(String, HashMap<String, String>), TokenizerError> {
    let qname = e.name();
    let name = utf8(qname.as_ref())?.to_owned();

    let mut attributes = HashMap::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|err| TokenizerError::Syntax(err.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| TokenizerError::Syntax(err.to_string()))?
            .into_owned();
        attributes.insert(key.to_owned(), value);
    }
    Ok((name, attributes))
}

fn utf8(bytes: &[u8]) -> Result<&str, TokenizerError> {
    std::str::from_utf8(bytes).map_err(TokenizerError::InvalidUtf8)
}

/// Resolve a general entity reference to its character value.
/// Handles both named entities (lt, gt, amp, etc.) and numeric entities (&#10;, &#x09;, etc.)
fn resolve_entity(raw: &str) -> Result<String, TokenizerError> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.into());
    }

    if let Some(rest) = raw.strip_prefix('#') {
        let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            u32::from_str_radix(hex, 16)
        } else {
            rest.parse::<u32>()
        }
        .map_err(|_| TokenizerError::Syntax(format!("invalid numeric entity: &{raw};")))?;

        let ch = char::from_u32(code)
            .ok_or_else(|| TokenizerError::Syntax(format!("invalid code point: {code}")))?;
        return Ok(ch.to_string());
    }

    // Unknown entity - keep it verbatim
    Ok(format!("&{raw};"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Ev {
        Start(String, Vec<(String, String)>),
        Text(String),
        Cdata(Vec<u8>),
        End(String),
        Error,
        EndDocument,
    }

    #[derive(Default)]
    struct Recorder(Vec<Ev>);

    impl Recorder {
        /// Events with adjacent text runs merged.
        fn merged(&self) -> Vec<&Ev> {
            let mut out: Vec<&Ev> = Vec::new();
            for ev in &self.0 {
                if let (Ev::Text(_), Some(Ev::Text(_))) = (ev, out.last()) {
                    continue;
                }
                out.push(ev);
            }
            out
        }

        fn text(&self) -> String {
            self.0
                .iter()
                .filter_map(|e| match e {
                    Ev::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl SaxHandler for Recorder {
        fn start_element(&mut self, name: &str, attributes: HashMap<String, String>) {
            let mut attrs: Vec<_> = attributes.into_iter().collect();
            attrs.sort();
            self.0.push(Ev::Start(name.into(), attrs));
        }
        fn characters(&mut self, text: &str) {
            self.0.push(Ev::Text(text.into()));
        }
        fn cdata(&mut self, data: &[u8]) {
            self.0.push(Ev::Cdata(data.to_vec()));
        }
        fn end_element(&mut self, name: &str) {
            self.0.push(Ev::End(name.into()));
        }
        fn end_document(&mut self) {
            self.0.push(Ev::EndDocument);
        }
        fn parse_error(&mut self, _error: TokenizerError) {
            self.0.push(Ev::Error);
        }
    }

    const DOC: &str = r#"<?xml version="1.0"?><a x="1"><b>hi &amp; bye</b><c/><d><![CDATA[<raw>]]></d></a>"#;

    fn run_chunked(input: &[u8], chunk: usize) -> Recorder {
        let mut tokenizer = PushTokenizer::new();
        let mut recorder = Recorder::default();
        for piece in input.chunks(chunk) {
            tokenizer.feed(piece, &mut recorder);
        }
        tokenizer.finish(&mut recorder);
        recorder
    }

    #[test]
    fn whole_document() {
        let recorder = run_chunked(DOC.as_bytes(), DOC.len());
        assert_eq!(
            recorder.merged(),
            vec![
                &Ev::Start("a".into(), vec![("x".into(), "1".into())]),
                &Ev::Start("b".into(), vec![]),
                &Ev::Text("hi ".into()),
                &Ev::End("b".into()),
                &Ev::Start("c".into(), vec![]),
                &Ev::End("c".into()),
                &Ev::Start("d".into(), vec![]),
                &Ev::Cdata(b"<raw>".to_vec()),
                &Ev::End("d".into()),
                &Ev::End("a".into()),
                &Ev::EndDocument,
            ]
        );
        assert_eq!(recorder.text(), "hi & bye");
    }

    #[test]
    fn every_chunk_size_gives_the_same_events() {
        let reference = run_chunked(DOC.as_bytes(), DOC.len());
        for size in 1..DOC.len() {
            let recorder = run_chunked(DOC.as_bytes(), size);
            assert_eq!(recorder.merged(), reference.merged(), "chunk size {size}");
            assert_eq!(recorder.text(), reference.text(), "chunk size {size}");
        }
    }

    #[test]
    fn whitespace_runs_are_delivered() {
        let recorder = run_chunked(b"<a>\n  <b/>\n</a>", 64);
        assert!(recorder.0.contains(&Ev::Text("\n  ".into())));
    }

    #[test]
    fn duplicate_attributes_keep_the_last_value() {
        let recorder = run_chunked(br#"<a k="first" k="last"/>"#, 64);
        assert_eq!(
            recorder.0[0],
            Ev::Start("a".into(), vec![("k".into(), "last".into())])
        );
    }

    #[test]
    fn namespace_declarations_are_not_attributes() {
        let recorder = run_chunked(
            br#"<rss xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd" version="2.0"/>"#,
            64,
        );
        assert_eq!(
            recorder.0[0],
            Ev::Start("rss".into(), vec![("version".into(), "2.0".into())])
        );
    }

    #[test]
    fn numeric_references_resolve() {
        let recorder = run_chunked(b"<a>&#65;&#x42;</a>", 64);
        assert_eq!(recorder.text(), "AB");
    }

    #[test]
    fn truncated_input_reports_unexpected_eof() {
        let recorder = run_chunked(b"<a><b>text", 4);
        assert!(recorder.0.contains(&Ev::Error));
        assert_eq!(recorder.0.last(), Some(&Ev::EndDocument));
    }

    #[test]
    fn end_tags_split_from_their_start_tags_are_delivered() {
        let recorder = run_chunked(b"<root><a>1</a></root>", 8);
        assert!(!recorder.0.contains(&Ev::Error));
        assert_eq!(
            recorder.0.iter().filter(|e| matches!(e, Ev::End(_))).count(),
            2
        );
        assert_eq!(recorder.0[recorder.0.len() - 2], Ev::End("root".into()));
    }

    #[test]
    fn malformed_markup_mid_stream_is_skipped() {
        const BROKEN: &[u8] = b"<root><a>1</a><!x><b>2</b><c>3</c></root>";
        for size in [1, 8, BROKEN.len()] {
            let mut tokenizer = PushTokenizer::new();
            let mut recorder = Recorder::default();
            for piece in BROKEN.chunks(size) {
                tokenizer.feed(piece, &mut recorder);
            }
            // Everything after the bad markup arrives without waiting for finish.
            assert!(
                recorder.0.contains(&Ev::End("root".into())),
                "chunk size {size}: {:?}",
                recorder.0
            );
            tokenizer.finish(&mut recorder);

            let errors = recorder.0.iter().filter(|e| **e == Ev::Error).count();
            assert_eq!(errors, 1, "chunk size {size}");
            assert!(recorder.0.contains(&Ev::Start("b".into(), vec![])));
            assert!(recorder.0.contains(&Ev::Start("c".into(), vec![])));
            assert_eq!(recorder.text(), "123");
        }
    }

    #[test]
    fn cdata_split_across_chunks_is_not_an_error() {
        let doc = b"<a><![CDATA[x > y]]></a>";
        for size in 1..doc.len() {
            let recorder = run_chunked(doc, size);
            assert!(!recorder.0.contains(&Ev::Error), "chunk size {size}");
            assert!(recorder.0.contains(&Ev::Cdata(b"x > y".to_vec())));
        }
    }

    #[test]
    fn finish_is_idempotent_and_feed_after_finish_is_ignored() {
        let mut tokenizer = PushTokenizer::new();
        let mut recorder = Recorder::default();
        tokenizer.feed(b"<a/>", &mut recorder);
        tokenizer.finish(&mut recorder);
        tokenizer.finish(&mut recorder);
        tokenizer.feed(b"<b/>", &mut recorder);
        let ends = recorder
            .0
            .iter()
            .filter(|e| **e == Ev::EndDocument)
            .count();
        assert_eq!(ends, 1);
        assert!(!recorder.0.contains(&Ev::Start("b".into(), vec![])));

        tokenizer.reset();
        assert!(!tokenizer.is_finished());
    }
}
