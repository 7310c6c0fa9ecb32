mod common;

use common::{assert_partition, parse};
use proptest::prelude::*;
use toml_lst::encoding::EncodedSource;
use toml_lst::{ParserInput, ParserOptions, TomlParser};

const CORPUS: &[&str] = &[
    "",
    "\n",
    "a=1",
    "a = 1",
    "  a   =   1   ",
    "a\t=\t1\t# tab\t\n",
    "# c\r\na = 1\r\n\r\n",
    "\"quoted key\" = 'v'\n'lit.key' = \"w\"\n",
    "a . b . c = 1\n",
    "site.\"google.com\" = true\n",
    "s = \"\"\"\nRoses are red\n  Violets are blue\"\"\"\n",
    "s = '''\n  keep # not a comment\n'''  # real comment\n",
    "dt = 1979-05-27T00:32:00.999999-07:00\n",
    "ld = 1979-05-27 # date only\n",
    "big = 9_223_372_036_854_775_808\n",
    "f = +inf\ng = -nan\nh = 6.626e-34\n",
    "arr = [ 1, 2 , 3 ]\n",
    "arr = [\n  # leading\n  'a',\n\n  'b', # trailing\n]\n",
    "nested = [[1, 2], ['a', \"b\"]]\n",
    "inline = {a = 1, b = { c = [true] }}\n",
    "[table]\n\n[ spaced . header ]  # note\n[[array.of.tables]]\n",
    "[[ fruits ]]\nname = \"apple\"\n\n  [fruits.physical]  \n  color = \"red\"\n",
    "# only\n# comments\n\n",
    "key = \"value\" #",
    "key = 'é ünïcödé ☃' # ✓\n",
    "emoji = \"🦀\"\n# 🦀 in a comment line\n",
    "a.b = 1\n",
    "a.b\t= 1\n[x . y]\nz.w  =  2\n",
    "a = 1 # note\u{A0}\nb = 2\n",
    "c = 'd' # wide\u{3000}\u{2003}\n# nel\u{85}\ne = 3 # nel\u{85}",
];

#[test]
fn corpus_round_trips() {
    for source in CORPUS {
        let document = parse(source);
        assert_eq!(document.print(), *source);
        assert_partition(&document, source);
    }
}

#[test]
fn corpus_survives_verification() {
    let parser = TomlParser::new(ParserOptions {
        verify_round_trip: true,
        ..ParserOptions::default()
    });
    let inputs: Vec<_> = CORPUS
        .iter()
        .enumerate()
        .map(|(i, source)| ParserInput::from_text(format!("corpus-{}.toml", i), source))
        .collect();
    for (input, result) in inputs.iter().zip(parser.parse_inputs(&inputs)) {
        let document = result.unwrap_or_else(|e| panic!("{}: {}", input.path.display(), e));
        assert_eq!(document.path, input.path);
    }
}

#[test]
fn bytes_round_trip_through_charset() {
    let cases: &[&[u8]] = &[
        b"a = 1\n",
        b"\xEF\xBB\xBF# bom\na = 'x'\n",
        b"name = \"caf\xE9\" # latin-1\n",
        b"name = 'x' # caf\xE9\xA0\nnext = 1 # nbsp\xA0\xA0\n",
    ];
    for bytes in cases {
        let input = ParserInput::new("bytes.toml", EncodedSource::decode(bytes));
        let document = TomlParser::default().parse_input(&input).unwrap();
        assert_eq!(document.to_bytes().unwrap(), *bytes);
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn blank() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_-]{0,6}",
        "\"[a-zé .\u{A0}\u{3000}]{0,5}\"",
        "'[a-z☃ #\u{2003}]{0,5}'",
        "[a-z]{1,3} ?\\. ?[a-z]{1,3}",
    ]
}

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[+-]?[1-9][0-9]{0,5}",
        "0x[0-9a-f]{1,4}",
        "[1-9][0-9]{0,2}\\.[0-9]{1,3}",
        Just("true".to_string()),
        Just("false".to_string()),
        "'[a-zé☃ #=\u{A0}\u{85}]{0,8}'",
        "\"[a-z🦀 #\\[\u{3000}\u{2003}]{0,8}\"",
        Just("1979-05-27T07:32:00Z".to_string()),
        Just("07:32:00".to_string()),
        "\\[ ?[0-9](, [0-9]){0,3} ?\\]",
        "\\{ ?[a-z] = [0-9] ?\\}",
    ]
}

fn comment() -> impl Strategy<Value = String> {
    "#[ a-z=#é☃🦀\u{A0}\u{85}\u{2003}\u{3000}]{0,10}"
}

/// Blanks after a comment may include Unicode whitespace.
fn comment_tail() -> impl Strategy<Value = String> {
    "[ \t\u{A0}\u{2003}\u{3000}]{0,3}"
}

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        (
            blank(),
            key(),
            blank(),
            blank(),
            value(),
            proptest::option::of((blank(), comment(), comment_tail())),
            blank()
        )
            .prop_map(|(lead, k, before_eq, after_eq, v, c, tail)| {
                let comment = c
                    .map(|(b, c, t)| format!("{}{}{}", b, c, t))
                    .unwrap_or_default();
                format!("{}{}{}={}{}{}{}", lead, k, before_eq, after_eq, v, comment, tail)
            }),
        (
            blank(),
            "\\[{1,2}",
            key(),
            proptest::option::of((comment(), comment_tail()))
        )
            .prop_map(|(lead, open, k, c)| {
                let close = if open.len() == 2 { "]]" } else { "]" };
                let comment = c.map(|(c, t)| format!("{}{}", c, t)).unwrap_or_default();
                format!("{}{}{}{}{}", lead, open, k, close, comment)
            }),
        (blank(), comment(), comment_tail())
            .prop_map(|(lead, c, tail)| format!("{}{}{}", lead, c, tail)),
        blank(),
    ]
}

fn document() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(line(), 0..10),
        prop_oneof![Just("\n"), Just("\r\n")],
        any::<bool>(),
    )
        .prop_map(|(lines, newline, trailing)| {
            let mut text = lines.join(newline);
            if trailing {
                text.push_str(newline);
            }
            text
        })
}

proptest! {
    #[test]
    fn generated_documents_round_trip(source in document()) {
        let document = TomlParser::default().parse_str(&source).unwrap();
        prop_assert_eq!(document.print(), source.clone());
        assert_partition(&document, &source);
    }
}
