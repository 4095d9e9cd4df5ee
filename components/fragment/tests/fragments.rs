use assert_matches::assert_matches;

use xmlaudit_fragment::{
    escape, highlight, locate, validate, FragmentValidator, Markers, ParseError, Reason,
    Suppressions, TextPosition, ValidationOutcome, Verdict, Wrapper,
};

fn invalid(text: &str) -> (String, String) {
    match validate(text) {
        ValidationOutcome::Invalid {
            message,
            highlighted,
        } => (message, highlighted),
        ValidationOutcome::Valid => panic!("{:?} should be invalid", text),
    }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}

#[test]
fn text_without_markup_is_not_parsed() {
    let validator = FragmentValidator::default();
    for text in ["", "plain", "Smith & Sons", "&bogus; &#0; ]]>", "a > b"] {
        assert_eq!(Verdict::WellFormed, validator.inspect(text), "{}", text);
    }
}

#[test]
fn well_formed_fragments() {
    for text in [
        "<p>a <b>c</b> d</p>",
        "<emph render=\"italic\">Smith & Sons</emph>",
        "first <p>one</p> between <p>two</p> last",
        "<list><item>1</item>\n<item>2</item></list>",
        "<extref ns2:href=\"http://example.org/?a=1&b=2\" ns2:type=\"simple\">x</extref>",
        "<extref xlink:href=\"http://example.org\">x</extref>",
        "&lt;not a tag&gt; <lb/>",
    ] {
        assert_eq!(ValidationOutcome::Valid, validate(text), "{}", text);
    }
}

#[test]
fn escaping_is_idempotent_on_references() {
    assert_eq!("&amp;", escape("&amp;").as_str());
    assert_eq!(escape("a & b").as_str(), escape(escape("a & b").as_str()).as_str());
}

#[test]
fn bare_ampersand_is_valid() {
    assert_eq!(ValidationOutcome::Valid, validate("Smith & Sons"));
    assert_eq!(ValidationOutcome::Valid, validate("<title>Smith & Sons</title>"));
}

#[test]
fn unterminated_tag() {
    let (message, highlighted) = invalid("<p>unterminated");
    assert!(!message.is_empty());
    assert_eq!("<<<<p>>>>unterminated", highlighted);
}

#[test]
fn first_line_error_is_not_shifted_by_the_wrapper() {
    let (_, highlighted) = invalid("Some text <emph>never closed");
    assert_eq!("Some text <<<<emph>>>>never closed", highlighted);
}

#[test]
fn error_after_escaped_ampersands() {
    let (_, highlighted) = invalid("A & B && C <b><i>x</b></i>");
    assert_eq!("A & B && C <b><i>x<<<</b>>>></i>", highlighted);
}

#[test]
fn error_on_later_line() {
    let (message, highlighted) = invalid("first line\n<p>second <b>bold</p>");
    assert_eq!("expected </b> but got </p>", message);
    assert_eq!("first line\n<p>second <b>bold<<<</p>>>>", highlighted);
}

#[test]
fn entity_errors_mark_a_single_character() {
    let (message, highlighted) = invalid("<p>caf&eacute;</p>");
    assert_eq!("entity `eacute` is not defined", message);
    assert_eq!("<p>caf<<<&>>>eacute;</p>", highlighted);
}

#[test]
fn tolerated_prefix_is_suppressed() {
    let validator = FragmentValidator::new(Wrapper::bare(), Suppressions::default(), Markers::default());
    assert_matches!(
        validator.inspect("<ns2:note>text</ns2:note>"),
        Verdict::Suppressed(error) if matches!(error.reason(), Reason::UnboundPrefix { .. })
    );
    assert_eq!(ValidationOutcome::Valid, validator.validate("<ns2:note>text</ns2:note>"));
    assert_eq!(ValidationOutcome::Valid, validate("<ns2:note>text</ns2:note>"));
}

#[test]
fn other_prefixes_are_reported() {
    let (message, highlighted) = invalid("see <ref foo:target=\"x\">here</ref>");
    assert!(message.contains("foo"));
    assert_eq!("see <<<<ref foo:target=\"x\">>>>here</ref>", highlighted);
}

#[test]
fn attributes_need_separating_whitespace() {
    let (message, highlighted) = invalid("<a b=\"1\"c=\"2\"/>");
    assert_eq!("malformed attribute: missing whitespace between attributes", message);
    assert_eq!("<<<<a b=\"1\"c=\"2\"/>>>>", highlighted);
    assert_eq!(ValidationOutcome::Valid, validate("<a b=\"1\" c=\"2\"/>"));
}

#[test]
fn tag_cut_off_at_end() {
    for (text, expected) in [
        ("Title <emph", "Title <<<<>>>emph"),
        ("<p>text</p", "<p>text<<<<>>>/p"),
        ("<p>a</p><", "<p>a</p><<<<>>>"),
    ] {
        let (message, highlighted) = invalid(text);
        assert_eq!("tag is not closed", message, "{}", text);
        assert_eq!(expected, highlighted, "{}", text);
    }
}

#[test]
fn suppressions_are_configurable() {
    let validator = FragmentValidator::new(
        Wrapper::bare(),
        Suppressions::new(["ns2", "foo"]),
        Markers::default(),
    );
    assert_eq!(ValidationOutcome::Valid, validator.validate("<foo:a/>"));
    assert!(!validator.validate("<bar:a/>").is_valid());

    let strict = FragmentValidator::new(Wrapper::bare(), Suppressions::none(), Markers::default());
    assert!(!strict.validate("<ns2:note>text</ns2:note>").is_valid());
}

#[test]
fn unresolvable_positions_leave_text_unchanged() {
    let fragment = escape("<p>");
    let error = ParseError::new(
        Reason::TrailingContent,
        Some(TextPosition::LineColumn { line: 1, column: 500 }),
    );
    let offset = locate(&fragment, 6, &error);
    assert_eq!(None, offset);
    assert_eq!("<p>", highlight("<p>", offset, &Markers::default()));
    assert_eq!("<p>", highlight("<p>", Some(usize::MAX), &Markers::default()));
}

#[test]
fn highlighted_text_keeps_the_original() {
    for text in [
        "<p>unterminated",
        "x</p>",
        "<a href=x>y</a>",
        "a < b",
        "<p>\u{1}</p>",
        "caf\u{e9} & <b>bold</i>",
        "<!-- a -- b -->",
        "line\n<p attr=\"x</p>",
        "<?xml version=\"1.0\"?><p/>",
    ] {
        let (message, highlighted) = invalid(text);
        assert!(!message.is_empty(), "{}", text);
        assert!(is_subsequence(text, &highlighted), "{:?} / {:?}", text, highlighted);
    }
}

#[test]
fn custom_markers() {
    let validator = FragmentValidator::new(
        Wrapper::default(),
        Suppressions::default(),
        Markers::new("<<<ERROR HERE>>>", ""),
    );
    assert_eq!(
        ValidationOutcome::Invalid {
            message: "end tag </p> has no matching start tag".to_string(),
            highlighted: "text<<<ERROR HERE>>></p>".to_string(),
        },
        validator.validate("text</p>")
    );
}
