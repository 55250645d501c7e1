use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::{parses, writes};

fn rewritten(source: &str) -> String {
    writes(&parses(source).unwrap()).unwrap()
}

#[test]
fn canonical_attribute_is_byte_identical() {
    assert_eq!(rewritten("a = 1\n"), "a = 1\n");
}

#[test]
fn missing_spaces_are_inserted() {
    assert_eq!(rewritten("a=1\n"), "a = 1\n");
    assert_eq!(rewritten("y = 1+2\n"), "y = 1 + 2\n");
    assert_eq!(rewritten("z = a&&b\n"), "z = a && b\n");
}

#[test]
fn one_line_block_round_trips() {
    assert_eq!(rewritten("b \"x\" { y = true }\n"), "b \"x\" { y = true }\n");
    assert_eq!(rewritten("b {}\n"), "b {}\n");
}

#[test]
fn multi_line_block_round_trips() {
    let source = indoc! {r#"
        resource "x" "y" {
          a = 1

          b = 2
        }
    "#};
    assert_eq!(rewritten(source), source);
}

#[test]
fn comments_are_preserved_verbatim() {
    let source = indoc! {r#"
        # top comment
        a = 1 # trailing
        // another
        /* block
           comment */
        b = 2
    "#};
    assert_eq!(rewritten(source), source);
}

#[test]
fn trailing_comma_before_closer_is_suppressed() {
    assert_eq!(rewritten("t = [1, 2,]\n"), "t = [1, 2]\n");
    assert_eq!(rewritten("o = { a = 1, }\n"), "o = { a = 1 }\n");
    assert_eq!(rewritten("r = f(1, 2,)\n"), "r = f(1, 2)\n");
}

#[test]
fn multiline_tuple_keeps_its_commas() {
    let source = indoc! {r#"
        t = [
          1,
          2,
        ]
    "#};
    assert_eq!(rewritten(source), source);
}

#[test]
fn conditional_and_for_spacing() {
    assert_eq!(rewritten("x = a ? 1 : 2\n"), "x = a ? 1 : 2\n");
    assert_eq!(
        rewritten("d = [for x in xs : x + 1 if x > 0]\n"),
        "d = [for x in xs : x + 1 if x > 0]\n"
    );
}

#[test]
fn unary_operators_bind_tight() {
    assert_eq!(rewritten("n = -1\n"), "n = -1\n");
    assert_eq!(rewritten("n = !ok\n"), "n = !ok\n");
    assert_eq!(rewritten("n = 1 - -2\n"), "n = 1 - -2\n");
}

#[test]
fn heredoc_emitted_verbatim() {
    let source = "x = <<EOF\nhello\n  world\nEOF\n";
    assert_eq!(rewritten(source), source);
}

#[test]
fn postfix_chains_stay_tight() {
    assert_eq!(rewritten("v = a[0].b.*.c\n"), "v = a[0].b.*.c\n");
    assert_eq!(rewritten("v = a[*].b\n"), "v = a[*].b\n");
    assert_eq!(rewritten("r = provider::scope::f(1)\n"), "r = provider::scope::f(1)\n");
}

#[test]
fn multi_line_expressions_keep_their_breaks() {
    let source = indoc! {r#"
        x = 1 +
          2
    "#};
    assert_eq!(rewritten(source), source);
}

#[test]
fn blank_lines_survive() {
    assert_eq!(rewritten("a = 1\n\n\nb = 2\n"), "a = 1\n\n\nb = 2\n");
}

#[test]
fn missing_final_newline_is_added() {
    assert_eq!(rewritten("a = 1"), "a = 1\n");
}

#[test]
fn crlf_normalizes_to_lf() {
    assert_eq!(rewritten("a = 1\r\nb = 2\r\n"), "a = 1\nb = 2\n");
}
