//! Embedded component references and the registry they resolve against
//!
//! A raw HTML tag whose name starts with an uppercase letter is a component
//! reference, e.g. `<Image src="/cat.png" alt="A cat" width={500} />`.
//! Components are always self-closing.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::tree::{Component, PropValue};
use crate::config::ComponentConfig;

lazy_static! {
    static ref TAG_NAME: Regex = Regex::new(r"^<([A-Z][A-Za-z0-9_.]*)").unwrap();
    static ref ATTR_NAME: Regex = Regex::new(r"^[A-Za-z_][\w:.-]*").unwrap();
    static ref QUOTED: Regex = Regex::new(r#"^(?:"([^"]*)"|'([^']*)')"#).unwrap();
    static ref CLOSE_TAG: Regex = Regex::new(r"^</([A-Z][A-Za-z0-9_.]*)\s*>").unwrap();
    static ref TAG_START: Regex = Regex::new(r"</?[A-Z]").unwrap();
}

/// Problems with a component reference
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ComponentError {
    #[error("unknown component <{0}>")]
    Unknown(String),

    #[error("component <{0}> must be self-closing")]
    NotSelfClosing(String),

    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    #[error("component <{component}> is missing required prop `{prop}`")]
    MissingProp { component: String, prop: String },

    #[error("component <{component}> sets `{prop}` more than once")]
    DuplicateProp { component: String, prop: String },

    #[error("malformed component tag near `{0}`")]
    Malformed(String),
}

/// Names of the components guides may embed, with their required props
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, Vec<String>>,
}

impl ComponentRegistry {
    /// An empty registry: every component reference is rejected
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the site configuration
    pub fn from_config(components: &[ComponentConfig]) -> Self {
        let mut registry = Self::new();
        for c in components {
            registry.register(&c.name, c.required.iter().map(String::as_str));
        }
        registry
    }

    pub fn register<'a>(
        &mut self,
        name: &str,
        required: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.components.insert(
            name.to_string(),
            required.into_iter().map(str::to_string).collect(),
        );
        self
    }

    /// Check a parsed reference against the registry
    pub fn resolve(&self, component: &Component) -> Result<(), ComponentError> {
        let required = self
            .components
            .get(&component.name)
            .ok_or_else(|| ComponentError::Unknown(component.name.clone()))?;

        for prop in required {
            if !component.props.contains_key(prop) {
                return Err(ComponentError::MissingProp {
                    component: component.name.clone(),
                    prop: prop.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Whether raw HTML should be read as component references
pub fn is_component_markup(raw: &str) -> bool {
    let raw = raw.trim_start();
    let rest = raw
        .strip_prefix("</")
        .or_else(|| raw.strip_prefix('<'))
        .unwrap_or("");
    rest.starts_with(|c: char| c.is_ascii_uppercase())
}

/// Byte offset of the first thing in `text` that opens a component tag
pub fn find_component_tag(text: &str) -> Option<usize> {
    TAG_START.find(text).map(|m| m.start())
}

/// Parse the component tag at the start of `input` and resolve it
///
/// Returns the component and the number of bytes the tag spans.
pub fn parse_component_tag(
    input: &str,
    registry: &ComponentRegistry,
) -> Result<(Component, usize), ComponentError> {
    if let Some(caps) = CLOSE_TAG.captures(input) {
        return Err(ComponentError::UnexpectedClose(caps[1].to_string()));
    }

    let (component, len) = parse_tag(input)?;
    registry.resolve(&component)?;
    Ok((component, len))
}

/// Parse one or more consecutive component tags and resolve each one
///
/// Returns `Ok(None)` when the markup is ordinary HTML.
pub fn parse_components(
    raw: &str,
    registry: &ComponentRegistry,
) -> Result<Option<Vec<Component>>, ComponentError> {
    if !is_component_markup(raw) {
        return Ok(None);
    }

    let mut components = Vec::new();
    let mut rest = raw.trim();

    while !rest.is_empty() {
        let (component, len) = parse_component_tag(rest, registry)?;
        components.push(component);
        rest = rest[len..].trim_start();
    }

    Ok(Some(components))
}

fn parse_tag(input: &str) -> Result<(Component, usize), ComponentError> {
    let malformed = || ComponentError::Malformed(snippet(input));

    let caps = TAG_NAME.captures(input).ok_or_else(malformed)?;
    let name = caps[1].to_string();
    let mut pos = caps[0].len();
    let mut props = IndexMap::new();

    loop {
        let rest = input[pos..].trim_start();
        pos = input.len() - rest.len();

        if rest.starts_with("/>") {
            return Ok((Component { name, props }, pos + 2));
        }
        if rest.starts_with('>') {
            return Err(ComponentError::NotSelfClosing(name));
        }

        let key = ATTR_NAME.find(rest).ok_or_else(malformed)?.as_str();
        let after_key = &rest[key.len()..];

        let (value, remaining) = match after_key.trim_start().strip_prefix('=') {
            Some(v) => {
                let v = v.trim_start();
                if let Some(quoted) = QUOTED.captures(v) {
                    let text = quoted
                        .get(1)
                        .or_else(|| quoted.get(2))
                        .map_or("", |m| m.as_str());
                    (PropValue::Text(text.to_string()), &v[quoted[0].len()..])
                } else if v.starts_with('{') {
                    let end = expression_end(v).ok_or_else(malformed)?;
                    (
                        PropValue::Expression(v[1..end - 1].trim().to_string()),
                        &v[end..],
                    )
                } else {
                    return Err(malformed());
                }
            }
            None => (PropValue::Flag, after_key),
        };

        if props.insert(key.to_string(), value).is_some() {
            return Err(ComponentError::DuplicateProp {
                component: name,
                prop: key.to_string(),
            });
        }
        pos = input.len() - remaining.len();
    }
}

/// End of a `{...}` expression, counting nested braces and skipping quoted text
fn expression_end(expr: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;

    for (i, c) in expr.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn snippet(s: &str) -> String {
    let line = s.lines().next().unwrap_or("");
    if line.chars().count() > 40 {
        format!("{}...", line.chars().take(40).collect::<String>())
    } else {
        line.to_string()
    }
}
