//! HTML rendering of structured content, with syntax highlighting

use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::content::{Alignment, Block, Component, Inline, StructuredContent};
use crate::helpers::{html_escape, link_to};

/// Renders [`StructuredContent`] trees to HTML
pub struct HtmlRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl HtmlRenderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create with the site's highlight settings
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render a content tree to HTML
    pub fn render(&self, content: &StructuredContent) -> String {
        let mut out = String::new();
        self.render_blocks(&content.blocks, &mut out);
        out
    }

    fn render_blocks(&self, blocks: &[Block], out: &mut String) {
        for block in blocks {
            self.render_block(block, out);
        }
    }

    fn render_block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Heading { level, id, content } => {
                out.push_str(&format!(r#"<h{} id="{}">"#, level, html_escape(id)));
                self.render_inlines(content, out);
                out.push_str(&format!("</h{}>\n", level));
            }
            Block::Paragraph { content } => {
                out.push_str("<p>");
                self.render_inlines(content, out);
                out.push_str("</p>\n");
            }
            Block::List { start, items } => {
                let close = match start {
                    None => {
                        out.push_str("<ul>\n");
                        "</ul>\n"
                    }
                    Some(1) => {
                        out.push_str("<ol>\n");
                        "</ol>\n"
                    }
                    Some(n) => {
                        out.push_str(&format!(r#"<ol start="{}">"#, n));
                        out.push('\n');
                        "</ol>\n"
                    }
                };
                for item in items {
                    out.push_str("<li>");
                    // a leading paragraph renders inline, like a tight list
                    match item.split_first() {
                        Some((Block::Paragraph { content }, rest)) => {
                            self.render_inlines(content, out);
                            if !rest.is_empty() {
                                out.push('\n');
                                self.render_blocks(rest, out);
                            }
                        }
                        _ => self.render_blocks(item, out),
                    }
                    out.push_str("</li>\n");
                }
                out.push_str(close);
            }
            Block::BlockQuote { children } => {
                out.push_str("<blockquote>\n");
                self.render_blocks(children, out);
                out.push_str("</blockquote>\n");
            }
            Block::CodeBlock { lang, code } => {
                out.push_str(&self.highlight_code(code, lang.as_deref()));
                out.push('\n');
            }
            Block::Component(component) => {
                out.push_str(&self.component(component));
                out.push('\n');
            }
            Block::Html { raw } => out.push_str(raw),
            Block::Table {
                alignments,
                head,
                rows,
            } => {
                out.push_str("<table>\n<thead>\n<tr>\n");
                for (i, cell) in head.iter().enumerate() {
                    self.table_cell("th", alignments.get(i), cell, out);
                }
                out.push_str("</tr>\n</thead>\n<tbody>\n");
                for row in rows {
                    out.push_str("<tr>\n");
                    for (i, cell) in row.iter().enumerate() {
                        self.table_cell("td", alignments.get(i), cell, out);
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n</table>\n");
            }
            Block::Rule => out.push_str("<hr>\n"),
        }
    }

    fn render_inlines(&self, inlines: &[Inline], out: &mut String) {
        for inline in inlines {
            match inline {
                Inline::Text { text } => out.push_str(&html_escape(text)),
                Inline::Code { code } => {
                    out.push_str(&format!("<code>{}</code>", html_escape(code)));
                }
                Inline::Emphasis { content } => self.wrap("em", content, out),
                Inline::Strong { content } => self.wrap("strong", content, out),
                Inline::Strikethrough { content } => self.wrap("del", content, out),
                Inline::Link {
                    href,
                    title,
                    content,
                } => {
                    let mut text = String::new();
                    self.render_inlines(content, &mut text);
                    let link = link_to(href, &text);
                    if title.is_empty() {
                        out.push_str(&link);
                    } else {
                        out.push_str(&link.replacen(
                            "<a ",
                            &format!(r#"<a title="{}" "#, html_escape(title)),
                            1,
                        ));
                    }
                }
                Inline::Image { src, alt, title } => {
                    out.push_str(&crate::helpers::image_tag(src, alt, Some(title)));
                }
                Inline::Component(component) => out.push_str(&self.component(component)),
                Inline::Html { raw } => out.push_str(raw),
                Inline::TaskMarker { checked } => {
                    out.push_str(if *checked {
                        r#"<input type="checkbox" disabled checked> "#
                    } else {
                        r#"<input type="checkbox" disabled> "#
                    });
                }
                Inline::SoftBreak => out.push('\n'),
                Inline::HardBreak => out.push_str("<br>\n"),
            }
        }
    }

    fn table_cell(
        &self,
        tag: &str,
        alignment: Option<&Alignment>,
        content: &[Inline],
        out: &mut String,
    ) {
        let style = match alignment {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            Some(Alignment::None) | None => "",
        };
        out.push_str(&format!("<{}{}>", tag, style));
        self.render_inlines(content, out);
        out.push_str(&format!("</{}>\n", tag));
    }

    fn wrap(&self, tag: &str, content: &[Inline], out: &mut String) {
        out.push_str(&format!("<{}>", tag));
        self.render_inlines(content, out);
        out.push_str(&format!("</{}>", tag));
    }

    /// Render a component reference
    fn component(&self, component: &Component) -> String {
        if component.name == "Image" {
            let mut attrs = String::new();
            for key in ["src", "alt"] {
                let value = component
                    .props
                    .get(key)
                    .and_then(|v| v.as_attr())
                    .unwrap_or("");
                attrs.push_str(&format!(r#" {}="{}""#, key, html_escape(value)));
            }
            for (key, value) in &component.props {
                if key == "src" || key == "alt" {
                    continue;
                }
                let key = if key == "className" { "class" } else { key };
                match value.as_attr() {
                    Some(v) => attrs.push_str(&format!(r#" {}="{}""#, key, html_escape(v))),
                    None => attrs.push_str(&format!(" {}", key)),
                }
            }
            return format!("<img{}>", attrs);
        }

        let mut attrs = format!(r#" data-component="{}""#, html_escape(&component.name));
        for (key, value) in &component.props {
            match value.as_attr() {
                Some(v) => attrs.push_str(&format!(
                    r#" data-{}="{}""#,
                    key.to_lowercase(),
                    html_escape(v)
                )),
                None => attrs.push_str(&format!(" data-{}", key.to_lowercase())),
            }
        }
        format!("<div{}></div>", attrs)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        {
            Some(theme) => theme,
            None => return plain(),
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    self.add_line_numbers(&highlighted, lang)
                } else {
                    format!(
                        r#"<figure class="highlight {}">{}</figure>"#,
                        html_escape(lang),
                        highlighted
                    )
                }
            }
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain()
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            html_escape(lang),
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
