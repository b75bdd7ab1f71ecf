//! Markdown to structured content
//!
//! Walks the pulldown-cmark event stream with a frame stack and builds a
//! [`StructuredContent`] tree. Raw HTML that names a component is resolved
//! against the [`ComponentRegistry`]; any other HTML passes through.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use std::collections::HashSet;
use thiserror::Error;

use super::component::{
    find_component_tag, is_component_markup, parse_component_tag, parse_components,
    ComponentError, ComponentRegistry,
};
use super::tree::{plain_text, Alignment, Block, Component, Inline, StructuredContent};

/// Why a markdown body could not be turned into structured content
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("unsupported markdown element: {0}")]
    Unsupported(String),

    #[error("unbalanced markdown structure")]
    Unbalanced,
}

/// Turns markdown bodies into structured content
#[derive(Debug, Clone, Default)]
pub struct MarkdownTransformer {
    registry: ComponentRegistry,
}

impl MarkdownTransformer {
    pub fn new(registry: ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Parse markdown into a tree of block and inline nodes
    pub fn transform(&self, markdown: &str) -> Result<StructuredContent, TransformError> {
        // No YAML metadata blocks: front-matter is split off before this point
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut builder = TreeBuilder {
            registry: &self.registry,
            stack: vec![Frame::Root(Vec::new())],
            ids: HashSet::new(),
        };
        for event in parser {
            builder.event(event)?;
        }
        builder.finish()
    }
}

enum SpanKind {
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: String },
    Image { src: String, title: String },
}

impl SpanKind {
    fn finish(self, content: Vec<Inline>) -> Inline {
        match self {
            SpanKind::Emphasis => Inline::Emphasis { content },
            SpanKind::Strong => Inline::Strong { content },
            SpanKind::Strikethrough => Inline::Strikethrough { content },
            SpanKind::Link { href, title } => Inline::Link {
                href,
                title,
                content,
            },
            SpanKind::Image { src, title } => Inline::Image {
                src,
                alt: plain_text(&content),
                title,
            },
        }
    }
}

enum Frame {
    Root(Vec<Block>),
    Item(Vec<Block>),
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    /// `implicit` marks text of a tight list item, which has no paragraph events
    Paragraph {
        content: Vec<Inline>,
        implicit: bool,
    },
    Span {
        kind: SpanKind,
        content: Vec<Inline>,
    },
    Code {
        lang: Option<String>,
        code: String,
    },
    Html(String),
    Table {
        alignments: Vec<Alignment>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    TableRow {
        head: bool,
        cells: Vec<Vec<Inline>>,
    },
    Cell(Vec<Inline>),
}

struct TreeBuilder<'r> {
    registry: &'r ComponentRegistry,
    stack: Vec<Frame>,
    /// Heading anchors already handed out
    ids: HashSet<String>,
}

impl TreeBuilder<'_> {
    fn event(&mut self, event: Event<'_>) -> Result<(), TransformError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                self.close_implicit()?;
                self.close()
            }
            Event::Text(text) => self.text(text),
            Event::Code(code) => self.push_inline(Inline::Code {
                code: code.into_string(),
            }),
            Event::Html(raw) => match self.stack.last_mut() {
                Some(Frame::Html(buf)) => {
                    buf.push_str(&raw);
                    Ok(())
                }
                _ => self.html_block(raw.into_string()),
            },
            Event::InlineHtml(raw) => self.inline_html(&raw),
            Event::TaskListMarker(checked) => self.push_inline(Inline::TaskMarker { checked }),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => {
                self.close_implicit()?;
                self.push_block(Block::Rule)
            }
            other => Err(TransformError::Unsupported(format!("{:?}", other))),
        }
    }

    fn start(&mut self, tag: Tag<'_>) -> Result<(), TransformError> {
        let frame = match tag {
            Tag::Emphasis => return self.open_span(SpanKind::Emphasis),
            Tag::Strong => return self.open_span(SpanKind::Strong),
            Tag::Strikethrough => return self.open_span(SpanKind::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => {
                return self.open_span(SpanKind::Link {
                    href: dest_url.into_string(),
                    title: title.into_string(),
                })
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                return self.open_span(SpanKind::Image {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                })
            }
            Tag::Paragraph => Frame::Paragraph {
                content: Vec::new(),
                implicit: false,
            },
            Tag::Heading { level, .. } => Frame::Heading {
                level: level as u8,
                content: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::Quote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::Code {
                lang: code_lang(kind),
                code: String::new(),
            },
            Tag::HtmlBlock => Frame::Html(String::new()),
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item(Vec::new()),
            Tag::Table(alignments) => Frame::Table {
                alignments: alignments.into_iter().map(alignment).collect(),
                head: Vec::new(),
                rows: Vec::new(),
            },
            Tag::TableHead => Frame::TableRow {
                head: true,
                cells: Vec::new(),
            },
            Tag::TableRow => Frame::TableRow {
                head: false,
                cells: Vec::new(),
            },
            Tag::TableCell => Frame::Cell(Vec::new()),
            other => return Err(TransformError::Unsupported(format!("{:?}", other))),
        };

        self.close_implicit()?;
        self.stack.push(frame);
        Ok(())
    }

    fn open_span(&mut self, kind: SpanKind) -> Result<(), TransformError> {
        self.ensure_inline_context();
        self.stack.push(Frame::Span {
            kind,
            content: Vec::new(),
        });
        Ok(())
    }

    /// Inline content directly inside a block container gets a paragraph
    fn ensure_inline_context(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame::Root(_) | Frame::Item(_) | Frame::Quote(_))
        ) {
            self.stack.push(Frame::Paragraph {
                content: Vec::new(),
                implicit: true,
            });
        }
    }

    fn close_implicit(&mut self) -> Result<(), TransformError> {
        if matches!(
            self.stack.last(),
            Some(Frame::Paragraph { implicit: true, .. })
        ) {
            self.close()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransformError> {
        let frame = self.stack.pop().ok_or(TransformError::Unbalanced)?;
        match frame {
            Frame::Root(_) => Err(TransformError::Unbalanced),
            Frame::Item(blocks) => match self.stack.last_mut() {
                Some(Frame::List { items, .. }) => {
                    items.push(blocks);
                    Ok(())
                }
                _ => Err(TransformError::Unbalanced),
            },
            Frame::Quote(children) => self.push_block(Block::BlockQuote { children }),
            Frame::List { start, items } => self.push_block(Block::List { start, items }),
            Frame::Heading { level, content } => {
                let content = self.text_components(content)?;
                let id = self.unique_id(&plain_text(&content));
                self.push_block(Block::Heading { level, id, content })
            }
            Frame::Paragraph { content, .. } => {
                let content = self.text_components(content)?;
                match standalone_components(&content) {
                    Some(components) => {
                        for component in components {
                            self.push_block(Block::Component(component))?;
                        }
                        Ok(())
                    }
                    None => self.push_block(Block::Paragraph { content }),
                }
            }
            Frame::Span { kind, content } => {
                let content = self.text_components(content)?;
                self.push_inline(kind.finish(content))
            }
            Frame::Code { lang, code } => self.push_block(Block::CodeBlock { lang, code }),
            Frame::Html(raw) => self.html_block(raw),
            Frame::Table {
                alignments,
                head,
                rows,
            } => self.push_block(Block::Table {
                alignments,
                head,
                rows,
            }),
            Frame::TableRow { head, cells } => match self.stack.last_mut() {
                Some(Frame::Table {
                    head: table_head,
                    rows,
                    ..
                }) => {
                    if head {
                        *table_head = cells;
                    } else {
                        rows.push(cells);
                    }
                    Ok(())
                }
                _ => Err(TransformError::Unbalanced),
            },
            Frame::Cell(content) => {
                let content = self.text_components(content)?;
                match self.stack.last_mut() {
                    Some(Frame::TableRow { cells, .. }) => {
                        cells.push(content);
                        Ok(())
                    }
                    _ => Err(TransformError::Unbalanced),
                }
            }
        }
    }

    fn finish(mut self) -> Result<StructuredContent, TransformError> {
        self.close_implicit()?;
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(Frame::Root(blocks)), true) => Ok(StructuredContent::new(blocks)),
            _ => Err(TransformError::Unbalanced),
        }
    }

    fn text(&mut self, text: CowStr<'_>) -> Result<(), TransformError> {
        match self.stack.last_mut() {
            Some(Frame::Code { code, .. }) => {
                code.push_str(&text);
                Ok(())
            }
            Some(Frame::Html(buf)) => {
                buf.push_str(&text);
                Ok(())
            }
            _ => self.push_inline(Inline::text(text.into_string())),
        }
    }

    fn push_inline(&mut self, inline: Inline) -> Result<(), TransformError> {
        self.ensure_inline_context();
        let content = match self.stack.last_mut() {
            Some(
                Frame::Paragraph { content, .. }
                | Frame::Heading { content, .. }
                | Frame::Span { content, .. }
                | Frame::Cell(content),
            ) => content,
            _ => return Err(TransformError::Unbalanced),
        };

        // pulldown-cmark splits text runs; keep one node per run
        if let Inline::Text { text } = &inline {
            if let Some(Inline::Text { text: prev }) = content.last_mut() {
                prev.push_str(text);
                return Ok(());
            }
        }
        content.push(inline);
        Ok(())
    }

    fn push_block(&mut self, block: Block) -> Result<(), TransformError> {
        match self.stack.last_mut() {
            Some(Frame::Root(blocks) | Frame::Item(blocks) | Frame::Quote(blocks)) => {
                blocks.push(block);
                Ok(())
            }
            _ => Err(TransformError::Unbalanced),
        }
    }

    fn html_block(&mut self, raw: String) -> Result<(), TransformError> {
        match parse_components(&raw, self.registry)? {
            Some(components) => {
                for component in components {
                    self.push_block(Block::Component(component))?;
                }
                Ok(())
            }
            None => self.push_block(Block::Html { raw }),
        }
    }

    fn inline_html(&mut self, raw: &str) -> Result<(), TransformError> {
        if is_component_markup(raw) {
            if let Some(components) = parse_components(raw, self.registry)? {
                for component in components {
                    self.push_inline(Inline::Component(component))?;
                }
                return Ok(());
            }
        }
        self.push_inline(Inline::Html {
            raw: raw.to_string(),
        })
    }

    /// Component tags markdown left as literal text, e.g. with `{[1, 2]}` props
    fn text_components(&self, content: Vec<Inline>) -> Result<Vec<Inline>, TransformError> {
        let mut out = Vec::with_capacity(content.len());
        for inline in content {
            let text = match inline {
                Inline::Text { text } => text,
                other => {
                    out.push(other);
                    continue;
                }
            };

            let mut rest = text.as_str();
            while let Some(start) = find_component_tag(rest) {
                if start > 0 {
                    out.push(Inline::text(&rest[..start]));
                }
                let (component, len) = parse_component_tag(&rest[start..], self.registry)?;
                out.push(Inline::Component(component));
                rest = &rest[start + len..];
            }
            if !rest.is_empty() {
                out.push(Inline::text(rest));
            }
        }
        Ok(out)
    }

    fn unique_id(&mut self, text: &str) -> String {
        let mut base = slug::slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }

        let mut id = base.clone();
        let mut n = 1;
        while self.ids.contains(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        self.ids.insert(id.clone());
        id
    }
}

/// Components of a paragraph that holds nothing else
fn standalone_components(content: &[Inline]) -> Option<Vec<Component>> {
    let mut components = Vec::new();
    for inline in content {
        match inline {
            Inline::Component(c) => components.push(c.clone()),
            Inline::Text { text } if text.trim().is_empty() => {}
            Inline::SoftBreak => {}
            _ => return None,
        }
    }
    if components.is_empty() {
        None
    } else {
        Some(components)
    }
}

fn alignment(align: pulldown_cmark::Alignment) -> Alignment {
    match align {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

/// Language token of a code fence info string
fn code_lang(kind: CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}
