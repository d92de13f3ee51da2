//! Output tree handed to the rendering component.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct Rgb(u32);

impl Rgb {
    /// Builds a color from its `0xRRGGBB` value; higher bits are discarded.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    /// Returns the `0xRRGGBB` value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepted configuration spellings: `0xffcc00`, `"#ffcc00"`, `"ffcc00"`, `"0xffcc00"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Number(u32),
    Text(String),
}

impl TryFrom<ColorValue> for Rgb {
    type Error = String;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        let value = match value {
            ColorValue::Number(n) => n,
            ColorValue::Text(text) => {
                let digits = text
                    .strip_prefix('#')
                    .or_else(|| text.strip_prefix("0x"))
                    .unwrap_or(&text);
                u32::from_str_radix(digits, 16)
                    .map_err(|e| format!("invalid color `{text}`: {e}"))?
            }
        };
        if value > 0x00ff_ffff {
            return Err(format!("color {value:#x} does not fit in 24 bits"));
        }
        Ok(Self(value))
    }
}

/// Visual attributes of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    /// Fill color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Rgb>,
    /// Color of the edge to the parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<Rgb>,
    /// Image file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A displayable tree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Identifier of the entity shown, absent for synthetic nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Text shown on the node.
    pub label: String,
    /// Free-text detail (comments, annotations, type lists).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Visual attributes.
    pub style: NodeStyle,
    /// Request to send back to expand the hidden part of this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_point: Option<String>,
    /// Ordered children.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a leaf with a label and nothing else.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the entity identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the content, ignoring blank text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.content = (!content.trim().is_empty()).then_some(content);
        self
    }

    /// Sets the style.
    #[must_use]
    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the mount point.
    #[must_use]
    pub fn with_mount_point(mut self, mount_point: impl Into<String>) -> Self {
        self.mount_point = Some(mount_point.into());
        self
    }

    /// Replaces the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Returns the first direct child with the given label.
    #[must_use]
    pub fn child(&self, label: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Returns this node and all its descendants, depth first.
    #[must_use]
    pub fn descendants(&self) -> Vec<&TreeNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }
        nodes
    }

    /// Renders the tree as an indented outline, one node per line.
    ///
    /// Nodes carrying a mount point are suffixed with `[+]`.
    #[must_use]
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        render_outline_item(&mut out, self, 0);
        out
    }
}

fn render_outline_item(out: &mut String, node: &TreeNode, depth: usize) {
    let marker = if node.mount_point.is_some() { " [+]" } else { "" };
    out.push_str(&format!("{}{}{}\n", "  ".repeat(depth), node.label, marker));
    for child in &node.children {
        render_outline_item(out, child, depth + 1);
    }
}
