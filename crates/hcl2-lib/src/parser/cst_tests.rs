use crate::{Error, parses};

#[test]
fn attribute_with_literal() {
    let doc = parses("a = 1").unwrap();
    insta::assert_snapshot!(doc.dump_cst(), @r#"
    Root
      Body
        Attribute
          Ident "a"
          Whitespace " "
          Eq "="
          Whitespace " "
          Literal
            IntLit "1"
        Newline "\n"
    "#);
}

#[test]
fn one_line_block() {
    let doc = parses("b \"x\" { y = true }").unwrap();
    insta::assert_snapshot!(doc.dump_cst(), @r#"
    Root
      Body
        Block
          Ident "b"
          Whitespace " "
          StringLit "\"x\""
          Whitespace " "
          LBrace "{"
          Body
            Whitespace " "
            Attribute
              Ident "y"
              Whitespace " "
              Eq "="
              Whitespace " "
              Literal
                Ident "true"
          Whitespace " "
          RBrace "}"
        Newline "\n"
    "#);
}

#[test]
fn comment_preserved_in_body() {
    let doc = parses("# top\na = 1\n").unwrap();
    insta::assert_snapshot!(doc.dump_cst(), @r##"
    Root
      Body
        LineComment "# top"
        Newline "\n"
        Attribute
          Ident "a"
          Whitespace " "
          Eq "="
          Whitespace " "
          Literal
            IntLit "1"
        Newline "\n"
    "##);
}

#[test]
fn binary_precedence_nests_tighter_operators() {
    let doc = parses("x = 1 + 2 * 3\n").unwrap();
    insta::assert_snapshot!(doc.dump_cst(), @r#"
    Root
      Body
        Attribute
          Ident "x"
          Whitespace " "
          Eq "="
          Whitespace " "
          BinaryOp
            Literal
              IntLit "1"
            Whitespace " "
            Plus "+"
            Whitespace " "
            BinaryOp
              Literal
                IntLit "2"
              Whitespace " "
              Star "*"
              Whitespace " "
              Literal
                IntLit "3"
        Newline "\n"
    "#);
}

#[test]
fn for_tuple_expression() {
    let doc = parses("d = [for x in xs : x + 1 if x > 0]\n").unwrap();
    insta::assert_snapshot!(doc.dump_cst(), @r#"
    Root
      Body
        Attribute
          Ident "d"
          Whitespace " "
          Eq "="
          Whitespace " "
          ForTupleExpr
            LBrack "["
            ForIntro
              Ident "for"
              Whitespace " "
              Ident "x"
              Whitespace " "
              Ident "in"
              Whitespace " "
              Variable
                Ident "xs"
              Whitespace " "
              Colon ":"
            Whitespace " "
            BinaryOp
              Variable
                Ident "x"
              Whitespace " "
              Plus "+"
              Whitespace " "
              Literal
                IntLit "1"
            Whitespace " "
            ForCond
              Ident "if"
              Whitespace " "
              BinaryOp
                Variable
                  Ident "x"
                Whitespace " "
                Gt ">"
                Whitespace " "
                Literal
                  IntLit "0"
            RBrack "]"
        Newline "\n"
    "#);
}

#[test]
fn document_text_is_the_normalized_source() {
    let doc = parses("a = 1").unwrap();
    assert_eq!(doc.text(), "a = 1\n");
}

#[test]
fn missing_value_is_a_syntax_error() {
    let err = parses("a =").unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }), "{err:?}");
}

#[test]
fn two_statements_on_one_line_rejected() {
    let err = parses("a = 1 b = 2\n").unwrap_err();
    match err {
        Error::Syntax { expected, .. } => assert_eq!(expected, "newline after statement"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unterminated_heredoc_is_a_heredoc_error() {
    let err = parses("x = <<EOF\nhello\n").unwrap_err();
    assert!(matches!(err, Error::Heredoc { .. }), "{err:?}");
}

#[test]
fn duplicate_labels_and_nested_blocks_parse() {
    let source = "resource \"a\" \"b\" {\n  nested {\n    x = 1\n  }\n}\n";
    assert!(parses(source).is_ok());
}

#[test]
fn error_position_is_one_based() {
    let err = parses("a = @\n").unwrap_err();
    match err {
        Error::Syntax { line, col, .. } => {
            assert_eq!(line, 1);
            assert_eq!(col, 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
