//! Programmatic construction of value trees.
//!
//! The reverse transformer tells blocks and object-valued attributes apart by
//! the `__start_line__`/`__end_line__` metadata inside block bodies. Hand-built
//! mappings rarely carry it, so this builder injects `-1` sentinels ("line
//! unknown") in the right places; `build()` output round-trips through
//! [`reverse_transform`](crate::reverse_transform) like a `loads_with_meta`
//! result does.

use crate::value::{END_LINE_KEY, Map, START_LINE_KEY, Value};

/// Accumulates attributes and blocks for one body.
///
/// Child bodies are built separately and moved in:
///
/// ```
/// use hcl2_lib::Builder;
///
/// let doc = Builder::new()
///     .block(
///         "resource",
///         ["aws_s3_bucket", "logs"],
///         Builder::new().attribute("bucket", "logs"),
///     )
///     .build();
/// let hcl = hcl2_lib::writes(&hcl2_lib::reverse_transform(&doc).unwrap()).unwrap();
/// assert_eq!(hcl, "resource \"aws_s3_bucket\" \"logs\" {\n  bucket = \"logs\"\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    attributes: Map,
    blocks: Vec<BlockEntry>,
}

#[derive(Debug, Clone)]
struct BlockEntry {
    block_type: String,
    labels: Vec<String>,
    body: Builder,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one literal attribute on this body.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets several attributes at once, in iteration order.
    pub fn attributes<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in entries {
            self.attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Appends a block. Blocks with equal type and labels accumulate in
    /// insertion order.
    pub fn block<L>(mut self, block_type: impl Into<String>, labels: L, body: Builder) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
    {
        self.blocks.push(BlockEntry {
            block_type: block_type.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            body,
        });
        self
    }

    /// Folds another builder's content into this one: attributes extend,
    /// block runs concatenate per type.
    pub fn merge(mut self, other: Builder) -> Self {
        self.attributes.extend(other.attributes);
        self.blocks.extend(other.blocks);
        self
    }

    /// The value tree for this body, with `-1` line sentinels on every block
    /// body mapping.
    pub fn build(&self) -> Value {
        let mut body = Map::new();
        body.insert(START_LINE_KEY.to_string(), Value::Int(-1));
        body.insert(END_LINE_KEY.to_string(), Value::Int(-1));
        for (name, value) in &self.attributes {
            body.insert(name.clone(), value.clone());
        }

        for entry in &self.blocks {
            let mut block = entry.body.build();
            for label in entry.labels.iter().rev() {
                let mut wrapper = Map::new();
                wrapper.insert(label.clone(), block);
                block = Value::Object(wrapper);
            }
            let slot = body
                .entry(entry.block_type.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !matches!(slot, Value::Array(_)) {
                // An attribute used the same name; the block run wins.
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                items.push(block);
            }
        }

        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(builder: &Builder) -> String {
        let doc = crate::reverse_transform(&builder.build()).unwrap();
        crate::writes(&doc).unwrap()
    }

    #[test]
    fn attributes_only() {
        let builder = Builder::new().attribute("a", 1).attribute("b", "x");
        assert_eq!(written(&builder), "a = 1\nb = \"x\"\n");
    }

    #[test]
    fn nested_blocks_accumulate() {
        let nested = Builder::new()
            .block("nested_block_1", ["a"], Builder::new().attribute("foo", "bar"))
            .block(
                "nested_block_1",
                ["a", "b"],
                Builder::new().attribute("bar", "foo"),
            )
            .block(
                "nested_block_1",
                Vec::<String>::new(),
                Builder::new().attribute("foobar", "barfoo"),
            )
            .block(
                "nested_block_2",
                Vec::<String>::new(),
                Builder::new().attribute("barfoo", "foobar"),
            );

        let builder = Builder::new()
            .block("block", Vec::<String>::new(), Builder::new().attribute("a", 1))
            .block(
                "block",
                ["label"],
                Builder::new().attribute("b", 2).merge(nested),
            );

        let value = builder.build();
        let root = value.as_object().unwrap();
        let blocks = root.get("block").unwrap().as_array().unwrap();
        assert_eq!(blocks.len(), 2);

        let labelled = blocks[1].as_object().unwrap();
        let body = labelled.get("label").unwrap().as_object().unwrap();
        let nested_1 = body.get("nested_block_1").unwrap().as_array().unwrap();
        assert_eq!(nested_1.len(), 3);
    }

    #[test]
    fn build_injects_line_sentinels() {
        let value = Builder::new()
            .block("b", ["x"], Builder::new().attribute("y", true))
            .build();
        let root = value.as_object().unwrap();
        assert_eq!(root.get(START_LINE_KEY), Some(&Value::Int(-1)));

        let block = root.get("b").unwrap().as_array().unwrap()[0]
            .as_object()
            .unwrap();
        let body = block.get("x").unwrap().as_object().unwrap();
        assert_eq!(body.get(START_LINE_KEY), Some(&Value::Int(-1)));
        assert_eq!(body.get(END_LINE_KEY), Some(&Value::Int(-1)));
    }

    #[test]
    fn string_attributes_with_newlines_become_escapes() {
        let builder = Builder::new().block(
            "block",
            ["block_with_newlines"],
            Builder::new().attribute("a", "line1\nline2"),
        );
        assert_eq!(
            written(&builder),
            "block \"block_with_newlines\" {\n  a = \"line1\\nline2\"\n}\n"
        );
    }

    #[test]
    fn wrapped_expression_attribute_inlined() {
        let builder = Builder::new().block(
            "locals",
            Vec::<String>::new(),
            Builder::new().attribute("name3", "${test(\"a\")}"),
        );
        assert_eq!(written(&builder), "locals {\n  name3 = test(\"a\")\n}\n");
    }

    #[test]
    fn namespaced_function_attribute_inlined() {
        let builder = Builder::new().block(
            "locals",
            Vec::<String>::new(),
            Builder::new().attribute("name2", "${provider::test2::test(\"a\")}"),
        );
        assert_eq!(
            written(&builder),
            "locals {\n  name2 = provider::test2::test(\"a\")\n}\n"
        );
    }

    #[test]
    fn interpolated_strings_stay_quoted() {
        let builder = Builder::new().block(
            "locals",
            Vec::<String>::new(),
            Builder::new()
                .attribute("simple_interpolation", "prefix:${var.foo}-suffix")
                .attribute("escaped_interpolation", "prefix:$${aws:username}-suffix"),
        );
        assert_eq!(
            written(&builder),
            "locals {\n  simple_interpolation = \"prefix:${var.foo}-suffix\"\n  escaped_interpolation = \"prefix:$${aws:username}-suffix\"\n}\n"
        );
    }
}
