use pretty_assertions::assert_eq;
use rstest::rstest;
use xstream::{decode_str, encode_text_with, url_decode, url_encode, SliceReader, WriteResult, WriterOptions, XmlWriter};

#[derive(Debug, PartialEq)]
enum Item {
    Start(String, Vec<(String, String)>),
    Text(String),
    End(String),
}

fn write_catalog(w: &mut XmlWriter<Vec<u8>>) -> WriteResult<()> {
    w.start_document()?;
    w.element("catalog", |w| {
        w.start_element("entry")?;
        w.write_attribute("id", "a&b")?;
        w.write_attribute("title", "\"Quotes\" <and> 'apostrophes'")?;
        w.text_element("name", "Fish & Chips")?;
        w.text_element("note", "tab\there, café")?;
        w.end_element()?;
        w.element("empty", |_| Ok(()))?;
        w.text_element("control", "bell\u{7}")
    })?;
    w.end_document()
}

fn read_items(xml: &[u8]) -> Vec<Item> {
    let mut r = SliceReader::new(xml);
    let mut items = Vec::new();
    while r.next() {
        if r.is_start_element() {
            items.push(Item::Start(r.name().into_owned(), r.attributes()));
        } else if r.is_end_element() {
            let text = r.text();
            if !text.trim().is_empty() {
                items.push(Item::Text(text));
            }
            items.push(Item::End(r.name().into_owned()));
        }
    }
    assert!(!r.is_error(), "{:?}", r.error());
    items
}

#[rstest]
#[case::passthrough(WriterOptions::default())]
#[case::ascii_only(WriterOptions::new().utf8_passthrough(false))]
#[case::two_space_indent(WriterOptions::new().indent_step(2))]
fn test_writer_output_reads_back(#[case] options: WriterOptions) {
    let mut w = XmlWriter::with_options(Vec::new(), options);
    write_catalog(&mut w).unwrap();
    let xml = w.into_inner().unwrap();

    let s = |v: &str| v.to_string();
    assert_eq!(
        read_items(&xml),
        vec![
            Item::Start(s("catalog"), vec![]),
            Item::Start(
                s("entry"),
                vec![
                    (s("id"), s("a&b")),
                    (s("title"), s("\"Quotes\" <and> 'apostrophes'")),
                ]
            ),
            Item::Start(s("name"), vec![]),
            Item::Text(s("Fish & Chips")),
            Item::End(s("name")),
            Item::Start(s("note"), vec![]),
            Item::Text(s("tab\there, café")),
            Item::End(s("note")),
            Item::End(s("entry")),
            Item::Start(s("empty"), vec![]),
            Item::End(s("empty")),
            Item::Start(s("control"), vec![]),
            Item::Text(s("bell\u{7}")),
            Item::End(s("control")),
            Item::End(s("catalog")),
        ]
    );
}

#[test]
fn test_ascii_only_output() {
    let mut w = XmlWriter::with_options(Vec::new(), WriterOptions::new().utf8_passthrough(false));
    write_catalog(&mut w).unwrap();
    let xml = w.into_inner().unwrap();
    assert!(xml.is_ascii());
}

#[rstest]
#[case("&")]
#[case("<tag attr=\"v\">")]
#[case("it's \"quoted\"")]
#[case("a > b && c < d")]
#[case("日本語 & more")]
fn test_entity_round_trip(#[case] text: &str) {
    for passthrough in [true, false] {
        let encoded = encode_text_with(text, passthrough);
        assert_eq!(decode_str(encoded.as_bytes()), text);
    }
}

#[rstest]
#[case("a b/c?d=e&f", true, false, "a+b%2Fc%3Fd%3De%26f")]
#[case("a b/c", false, false, "a+b/c")]
#[case("~_.-", true, false, "~_.-")]
#[case("é", true, false, "%C3%A9")]
#[case("é", true, true, "é")]
fn test_url_codec(
    #[case] input: &str,
    #[case] encode_slash: bool,
    #[case] utf8_passthrough: bool,
    #[case] expected: &str,
) {
    let encoded = url_encode(input, encode_slash, utf8_passthrough);
    assert_eq!(encoded, expected);
    assert_eq!(url_decode(&encoded), input);
}
