//! Structured content tree produced from a guide's markdown body

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parsed body of a guide, ready to render any number of times
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredContent {
    pub blocks: Vec<Block>,
}

impl StructuredContent {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Headings in document order as (level, id, text)
    pub fn headings(&self) -> Vec<(u8, &str, String)> {
        fn walk<'a>(blocks: &'a [Block], out: &mut Vec<(u8, &'a str, String)>) {
            for block in blocks {
                match block {
                    Block::Heading { level, id, content } => {
                        out.push((*level, id.as_str(), plain_text(content)))
                    }
                    Block::BlockQuote { children } => walk(children, out),
                    Block::List { items, .. } => {
                        for item in items {
                            walk(item, out);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.blocks, &mut out);
        out
    }
}

/// Block-level node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        /// Anchor id, unique within the guide
        id: String,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    List {
        /// First number of an ordered list, `None` for bullets
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    BlockQuote {
        children: Vec<Block>,
    },
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    Component(Component),
    /// Lowercase HTML passed through verbatim
    Html {
        raw: String,
    },
    Table {
        /// One entry per column
        alignments: Vec<Alignment>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Rule,
}

/// Column alignment of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// Inline node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text {
        text: String,
    },
    Code {
        code: String,
    },
    Emphasis {
        content: Vec<Inline>,
    },
    Strong {
        content: Vec<Inline>,
    },
    Strikethrough {
        content: Vec<Inline>,
    },
    Link {
        href: String,
        title: String,
        content: Vec<Inline>,
    },
    Image {
        src: String,
        alt: String,
        title: String,
    },
    Component(Component),
    Html {
        raw: String,
    },
    /// Checkbox opening a task list item
    TaskMarker {
        checked: bool,
    },
    SoftBreak,
    HardBreak,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }
}

/// A reference to a registered, non-markdown component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub props: IndexMap<String, PropValue>,
}

/// Value of a component attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropValue {
    /// `name="value"` or `name='value'`
    Text(String),
    /// `name={expr}`, kept as the source between the braces
    Expression(String),
    /// Bare `name`
    Flag,
}

impl PropValue {
    /// Value as it should appear in an HTML attribute
    pub fn as_attr(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            PropValue::Expression(e) => Some(e.trim().trim_matches(|c| c == '"' || c == '\'')),
            PropValue::Flag => None,
        }
    }
}

/// Concatenated text of inline nodes, without markup
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text { text } => out.push_str(text),
            Inline::Code { code } => out.push_str(code),
            Inline::Emphasis { content }
            | Inline::Strong { content }
            | Inline::Strikethrough { content }
            | Inline::Link { content, .. } => out.push_str(&plain_text(content)),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Component(_) | Inline::Html { .. } | Inline::TaskMarker { .. } => {}
        }
    }
    out
}
