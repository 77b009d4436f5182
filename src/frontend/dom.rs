//! A minimal element tree, enough to apply directive plans and inspect the result.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct BoxGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxGeometry {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub children: Vec<Element>,
    pub text: Option<String>,
    /// Rendered box relative to the offset parent.
    pub layout: BoxGeometry,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_layout(mut self, layout: BoxGeometry) -> Self {
        self.layout = layout;
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn css(&mut self, rules: &BTreeMap<String, String>) {
        self.style
            .extend(rules.iter().map(|(p, v)| (p.clone(), v.clone())));
    }

    pub fn style_of(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn last_child(&self) -> Option<&Element> {
        self.children.last()
    }
}

/// Escapes text for use in element content and double-quoted attribute values.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            if value.is_empty() {
                write!(f, " {}", name)?;
            } else {
                write!(f, " {}=\"{}\"", name, escape(value))?;
            }
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(p, v)| format!("{}: {}", p, escape(v)))
                .collect();
            write!(f, " style=\"{}\"", style.join("; "))?;
        }
        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", escape(text))?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        if self.tag != "input" {
            write!(f, "</{}>", self.tag)?;
        }
        Ok(())
    }
}
