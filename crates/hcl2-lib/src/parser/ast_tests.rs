use crate::parser::ast::{Body, BodyItem, Expr, Root};
use crate::parses;

fn body(source: &str) -> Body {
    let doc = parses(source).unwrap();
    Root::cast(doc.root()).unwrap().body().unwrap()
}

#[test]
fn attribute_accessors() {
    let body = body("a = 1\n");
    let items: Vec<_> = body.items().collect();
    assert_eq!(items.len(), 1);
    let BodyItem::Attribute(attr) = &items[0] else {
        panic!("expected an attribute");
    };
    assert_eq!(attr.name().unwrap().text(), "a");
    assert!(matches!(attr.value(), Some(Expr::Literal(_))));
}

#[test]
fn block_accessors() {
    let body = body("resource \"aws_s3_bucket\" \"a\" {\n  x = 1\n}\n");
    let items: Vec<_> = body.items().collect();
    let BodyItem::Block(block) = &items[0] else {
        panic!("expected a block");
    };
    assert_eq!(block.type_token().unwrap().text(), "resource");
    let labels: Vec<String> = block
        .labels()
        .iter()
        .map(|label| label.text().to_string())
        .collect();
    assert_eq!(labels, ["\"aws_s3_bucket\"", "\"a\""]);

    let inner: Vec<_> = block.body().unwrap().items().collect();
    assert_eq!(inner.len(), 1);
}

#[test]
fn block_body_identifiers_are_not_labels() {
    let body = body("b x y { z = 1 }\n");
    let BodyItem::Block(block) = body.items().next().unwrap() else {
        panic!("expected a block");
    };
    let labels: Vec<String> = block
        .labels()
        .iter()
        .map(|label| label.text().to_string())
        .collect();
    assert_eq!(labels, ["x", "y"]);
}

#[test]
fn tuple_and_object_children() {
    let body = body("t = [1, 2, 3]\no = { a = 1, b = 2 }\n");
    let items: Vec<_> = body.items().collect();

    let BodyItem::Attribute(t) = &items[0] else {
        panic!("expected an attribute");
    };
    let Some(Expr::Tuple(tuple)) = t.value() else {
        panic!("expected a tuple");
    };
    assert_eq!(tuple.elements().count(), 3);

    let BodyItem::Attribute(o) = &items[1] else {
        panic!("expected an attribute");
    };
    let Some(Expr::Object(object)) = o.value() else {
        panic!("expected an object");
    };
    let elems: Vec<_> = object.elems().collect();
    assert_eq!(elems.len(), 2);
    assert_eq!(elems[0].key_tokens()[0].text(), "a");
    assert!(matches!(elems[0].value(), Some(Expr::Literal(_))));
}

#[test]
fn parenthesised_object_key() {
    let body = body("o = { (k) = 1 }\n");
    let BodyItem::Attribute(attr) = body.items().next().unwrap() else {
        panic!("expected an attribute");
    };
    let Some(Expr::Object(object)) = attr.value() else {
        panic!("expected an object");
    };
    let elem = object.elems().next().unwrap();
    assert!(elem.key_tokens().is_empty());
    assert!(elem.key_expr().is_some());
    assert!(matches!(elem.value(), Some(Expr::Literal(_))));
}

#[test]
fn unary_accessors() {
    let body = body("n = -x\n");
    let BodyItem::Attribute(attr) = body.items().next().unwrap() else {
        panic!("expected an attribute");
    };
    let Some(Expr::Unary(unary)) = attr.value() else {
        panic!("expected a unary expression");
    };
    assert_eq!(unary.operator().unwrap().text(), "-");
    assert!(matches!(unary.operand(), Some(Expr::Variable(_))));
}

#[test]
fn expression_casts_cover_postfix_chains() {
    let body = body("v = a[0].b.*.c\n");
    let BodyItem::Attribute(attr) = body.items().next().unwrap() else {
        panic!("expected an attribute");
    };
    // Outermost wrapper is the trailing get-attr.
    assert!(matches!(attr.value(), Some(Expr::GetAttr(_))));
}
