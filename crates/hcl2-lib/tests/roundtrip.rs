//! End-to-end round-trip properties over a corpus of representative
//! documents. Corpus entries are written in canonical layout (two-space
//! indent, spaced operators), so text reconstruction is expected to be
//! byte-identical, not merely semantically equal.

use indoc::indoc;
use pretty_assertions::assert_eq;

use hcl2_lib::{Value, loads, loads_with_meta, parses, reverse_transform, writes};

/// A document shaped like real Terraform, in canonical layout.
const TERRAFORM: &str = indoc! {r#"
    terraform {
      required_version = ">= 1.5.0"
    }

    variable "region" {
      type = string
      default = "eu-central-1"
    }

    locals {
      name = "app-${var.region}"
      count = length(var.azs) > 2 ? 3 : 1
    }

    resource "aws_instance" "web" {
      ami = data.aws_ami.ubuntu.id
      instance_type = var.instance_type
      tags = {
        Name = local.name
        env = "prod"
      }

      root_block_device {
        volume_size = 40
      }
    }

    output "ids" {
      value = [for i in aws_instance.web : i.id]
    }
"#};

const CORPUS: &[&str] = &[
    "a = 1\n",
    "a = 1.5\nb = -3\nc = true\nd = null\ne = \"text\"\n",
    "b \"x\" { y = true }\n",
    "b {}\n",
    "resource \"aws_s3_bucket\" \"a\" {\n  bucket = \"a\"\n  tags = { env = \"dev\", team = \"infra\" }\n}\n",
    "outer {\n  inner {\n    a = 1\n  }\n\n  inner {\n    a = 2\n  }\n}\n",
    "locals {\n  xs = [1, 2, 3]\n  ys = [\n    \"a\",\n    \"b\",\n  ]\n}\n",
    "o = { a = 1, b = 2 }\n",
    "d = [for x in xs : x + 1 if x > 0]\n",
    "m = { for k, v in m : k => v }\n",
    "c = x ? \"a\" : \"b\"\n",
    "r = f(1, 2)\nn = provider::scope::f(x...)\n",
    "v = tolist(a.*.id)\nw = a[*].id\nu = a[0].b\n",
    "greeting = \"hello ${var.name}!\"\npair = \"${a}-${b}\"\nescaped = \"prefix:$${aws:username}-suffix\"\n",
    "x = <<EOF\nhello\n  world\nEOF\n",
    "y = <<-END\n  indented\n  END\n",
    "# top comment\na = 1 # trailing\nb = 2\n",
    "sum = 1 + 2 * 3\ncmp = a == b || c < d\nneg = !enabled\n",
    "x = (1 + 2)\n",
];

/// Sources that are deliberately not in canonical layout.
const NONCANONICAL: &[&str] = &["a=1", "y = 1+2\n", "t = [1,2,]\n", "b{x=1}\n", "a = 1\r\nb = 2\r\n"];

#[test]
fn parse_total_on_corpus() {
    for source in CORPUS.iter().copied().chain([TERRAFORM]) {
        loads(source).unwrap_or_else(|err| panic!("{source:?}: {err}"));
    }
}

#[test]
fn value_round_trip() {
    for source in CORPUS.iter().copied().chain([TERRAFORM]) {
        let value = loads(source).unwrap();
        let doc = reverse_transform(&value).unwrap();
        let text = writes(&doc).unwrap();
        let reloaded = loads(&text).unwrap_or_else(|err| panic!("{text:?}: {err}"));
        assert_eq!(reloaded, value, "value round-trip failed for {source:?}");
    }
}

#[test]
fn value_round_trip_with_metadata() {
    for source in CORPUS.iter().copied().chain([TERRAFORM]) {
        let value = loads_with_meta(source).unwrap();
        let doc = reverse_transform(&value).unwrap();
        let text = writes(&doc).unwrap();
        assert_eq!(
            loads(&text).unwrap(),
            loads(source).unwrap(),
            "metadata round-trip failed for {source:?}"
        );
    }
}

#[test]
fn text_round_trip_is_byte_identical_on_canonical_sources() {
    for source in CORPUS.iter().copied().chain([TERRAFORM]) {
        let text = writes(&parses(source).unwrap()).unwrap();
        assert_eq!(&text, source);
    }
}

#[test]
fn rewriting_is_idempotent() {
    for source in CORPUS.iter().chain(NONCANONICAL).copied().chain([TERRAFORM]) {
        let once = writes(&parses(source).unwrap()).unwrap();
        let twice = writes(&parses(&once).unwrap()).unwrap();
        assert_eq!(twice, once, "rewrite not idempotent for {source:?}");
    }
}

#[test]
fn no_trailing_commas_before_closers() {
    for source in CORPUS.iter().chain(NONCANONICAL).copied().chain([TERRAFORM]) {
        let text = writes(&parses(source).unwrap()).unwrap();
        assert!(!text.contains(",)"), "{text:?}");
        assert!(!text.contains(",}"), "{text:?}");
        assert!(!text.contains(",]"), "{text:?}");
    }
}

#[test]
fn no_nested_interpolation_markers() {
    fn walk(value: &Value) {
        match value {
            Value::String(s) => assert!(!s.contains("${${"), "{s:?}"),
            Value::Array(items) => items.iter().for_each(walk),
            Value::Object(map) => map.values().for_each(walk),
            _ => {}
        }
    }
    for source in CORPUS.iter().copied().chain([TERRAFORM]) {
        walk(&loads(source).unwrap());
    }
}
