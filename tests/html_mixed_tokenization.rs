//! End-to-end behavior of the composite tokenizer over small documents.

mod common;

use common::{render, text_of, ChunkedMode};
use htmlmixed::html_mixed::{Embedded, NEUTRAL_INDENT};
use htmlmixed::modes::{CssMode, PlainTextMode, XmlMode};
use htmlmixed::runmode::tokenize_line;
use htmlmixed::{run_mode, Grammar, HtmlMixed, HtmlMixedMode, Indent, Mode, Style, StyledSpan};
use rstest::rstest;

fn run_lines<M: Mode>(mode: &M, state: &mut M::State, lines: &[&str]) -> Vec<StyledSpan> {
    let mut spans = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        tokenize_line(mode, state, index, line, &mut spans).expect("tokenize line");
    }
    spans
}

#[test]
fn script_region_round_trip() {
    let spans = run_mode(&HtmlMixedMode::default(), "<script>var x=1;</script>").unwrap();
    insta::assert_snapshot!(render(&spans), @r###"
    html tag "<"
    html tag "script"
    html tag ">"
    javascript keyword "var"
    javascript - " "
    javascript def "x"
    javascript operator "="
    javascript number "1"
    javascript - ";"
    html tag "</"
    html tag "script"
    html tag ">"
    "###);
}

#[rstest]
#[case::no_type("<script>", Grammar::Script)]
#[case::javascript(r#"<script type="text/javascript">"#, Grammar::Script)]
#[case::ecmascript(r#"<script type='application/ecmascript'>"#, Grammar::Script)]
#[case::upper_case_type(r#"<SCRIPT TYPE="TEXT/JAVASCRIPT">"#, Grammar::Script)]
#[case::plain_text(r#"<script type="text/plain">"#, Grammar::UnknownScript)]
#[case::module(r#"<script type="module">"#, Grammar::UnknownScript)]
#[case::handlebars(r#"<script type="text/x-handlebars-template">"#, Grammar::Host)]
#[case::mustache(r#"<script type="text/x-mustache">"#, Grammar::Host)]
#[case::style("<style>", Grammar::Style)]
#[case::style_with_attributes("<STYLE media=screen>", Grammar::Style)]
#[case::self_closing_script("<script/>", Grammar::Host)]
#[case::other_element("<div>", Grammar::Host)]
fn grammar_after_opening_tag(#[case] line: &str, #[case] expected: Grammar) {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    run_lines(&mode, &mut state, &[line]);
    assert_eq!(state.active_grammar(), expected);
}

#[test]
fn plain_text_script_never_enters_javascript() {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    let spans = run_lines(
        &mode,
        &mut state,
        &[
            r#"<script type="text/plain">"#,
            "var x = 1; // not code",
            "</script>",
        ],
    );
    assert!(spans.iter().all(|span| span.mode != "javascript"));
    assert_eq!(text_of(&spans, "text"), "var x = 1; // not code");
    assert_eq!(state.active_grammar(), Grammar::Host);
}

#[test]
fn handlebars_template_stays_in_host() {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    let mut spans = Vec::new();
    let lines = [
        r#"<script type="text/x-handlebars-template">"#,
        "<p>{{name}}</p>",
        "{{#if x}} a = 1; {{/if}}",
        "<br>",
        "text",
        "</script>",
    ];
    for (index, line) in lines.iter().enumerate() {
        tokenize_line(&mode, &mut state, index, line, &mut spans).expect("tokenize line");
        assert_eq!(state.active_grammar(), Grammar::Host, "after line {}", index + 1);
    }
    assert!(spans.iter().all(|span| span.mode == "html"));
    assert!(state.host_state().context().is_none());
}

#[rstest]
#[case::void_element(r#"<script type="text/x-mustache"><img src=x>"#)]
#[case::closed_element(r#"<script type="text/x-mustache"><b>{{x}}</b>"#)]
fn template_body_tags_do_not_enter_a_region(#[case] line: &str) {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    let spans = run_lines(&mode, &mut state, &[line, "var y = 2;"]);
    assert_eq!(state.active_grammar(), Grammar::Host);
    assert!(spans.iter().all(|span| span.mode == "html"));
}

#[test]
fn unterminated_string_ending_in_partial_tag_stays_whole() {
    let spans = run_mode(&HtmlMixedMode::default(), "<script>var s = 'a </scr").unwrap();
    let last = spans.last().expect("spans");
    assert_eq!(
        (last.mode, last.style, last.text.as_str()),
        ("javascript", Some(Style::String), "'a </scr")
    );
}

#[test]
fn style_region_switches_back_at_closing_tag() {
    let mode = HtmlMixedMode::default();
    let spans = run_mode(&mode, "<style>body { color: red }</style><p>").unwrap();
    let styled = |text: &str| {
        spans
            .iter()
            .find(|span| span.text == text)
            .map(|span| (span.mode, span.style))
    };
    assert_eq!(styled("body"), Some(("css", Some(Style::Tag))));
    assert_eq!(styled("color"), Some(("css", Some(Style::Property))));
    assert_eq!(styled("red"), Some(("css", Some(Style::Atom))));
    assert_eq!(styled("</"), Some(("html", Some(Style::Tag))));
    assert_eq!(text_of(&spans, "css"), "body { color: red }");
    assert_eq!(spans.last().map(|span| span.text.as_str()), Some(">"));
}

#[test]
fn unterminated_region_stays_active() {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    run_lines(&mode, &mut state, &["<style>", "p { color: red }", "a {"]);
    assert_eq!(state.active_grammar(), Grammar::Style);
}

#[test]
fn comment_running_past_closing_tag_is_cut() {
    let mode = HtmlMixedMode::default();
    let spans = run_mode(&mode, "<script>/* open </script><b>").unwrap();
    assert_eq!(text_of(&spans, "javascript"), "/* open ");
    assert!(spans.iter().any(|span| span.text == "b" && span.mode == "html"));
}

#[rstest]
fn torn_closing_tag_is_left_for_host(
    #[values(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13)] chunk: usize,
) {
    let mode = HtmlMixed::new(XmlMode::default(), ChunkedMode(chunk), CssMode::default(), PlainTextMode);
    let spans = run_mode(&mode, "<script>abcd</script>").unwrap();

    assert_eq!(text_of(&spans, "chunked"), "abcd");
    assert!(spans
        .iter()
        .filter(|span| span.mode == "chunked")
        .all(|span| !span.text.contains('<')));
    let tail: Vec<_> = spans[spans.len() - 3..]
        .iter()
        .map(|span| (span.mode, span.text.as_str()))
        .collect();
    assert_eq!(tail, vec![("html", "</"), ("html", "script"), ("html", ">")]);
}

#[test]
fn copied_state_is_independent() {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    run_lines(&mode, &mut state, &["<style>"]);

    let copy = mode.copy_state(&state);
    let pristine = copy.clone();
    run_lines(&mode, &mut state, &["p { color: red }</style>"]);

    assert_eq!(copy, pristine);
    assert_eq!(copy.active_grammar(), Grammar::Style);
    assert_eq!(state.active_grammar(), Grammar::Host);
    match copy.embedded_state() {
        Some(Embedded::Style(css)) => assert_eq!(css.depth(), 0),
        other => panic!("expected css state, got {:?}", other),
    }

    let mut resumed = copy;
    let spans = run_lines(&mode, &mut resumed, &["p { color: red }</style>"]);
    assert_eq!(text_of(&spans, "css"), "p { color: red }");
    assert_eq!(resumed.active_grammar(), Grammar::Host);
}

#[test]
fn indentation_per_grammar() {
    let mode = HtmlMixedMode::default();
    let mut state = mode.start_state(0);
    run_lines(&mode, &mut state, &["<div>", "  <script type=\"text/template\">"]);
    assert_eq!(state.active_grammar(), Grammar::UnknownScript);
    assert_eq!(mode.indent(&state, "anything"), NEUTRAL_INDENT);
    assert_eq!(mode.indent(&state, "</script>"), Indent::Column(2));

    let mut state = mode.start_state(0);
    run_lines(&mode, &mut state, &["<body>", "  <script>", "    if (x) {"]);
    assert_eq!(mode.indent(&state, "y();"), Indent::Column(6));
    assert_eq!(mode.indent(&state, "}"), Indent::Column(4));
    assert_eq!(mode.indent(&state, "</script>"), Indent::Column(2));
}

#[test]
fn electric_chars_and_token_grammar() {
    let mode = HtmlMixedMode::default();
    assert_eq!(mode.electric_chars(), "/{}:");
    let mut state = mode.start_state(0);
    run_lines(&mode, &mut state, &["<script>x"]);
    assert_eq!(mode.token_grammar(&state), "javascript");
    assert_eq!(mode.inner_mode(&state).name(), "javascript");
}
