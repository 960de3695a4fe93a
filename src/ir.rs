use serde::{Deserialize, Serialize};

/// Layout axis for a diagram. Nodes stack along this axis in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Vertical
    }
}

/// Closed set of semantic color tags for diagram nodes. Purely visual
/// grouping; the theme maps each tag to a fill/border pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    Blue,
    Green,
    Orange,
    Purple,
    Gray,
}

impl Default for NodeColor {
    fn default() -> Self {
        Self::Blue
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    /// Secondary text under the label; embedded '\n' splits lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    #[serde(default)]
    pub color: NodeColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub dashed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub direction: Direction,
    pub nodes: Vec<DiagramNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Diagram {
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Note,
    Tip,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callout {
    pub kind: CalloutKind,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Open string; unknown tags fall back to plain monospace rendering.
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBlock {
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLink {
    pub label: String,
    pub href: String,
}

/// One content block inside a section. Externally tagged, so page files
/// spell each block as `{ "code": { ... } }`, `{ "diagram": { ... } }` etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    Prose(String),
    Callout(Callout),
    Code(CodeBlock),
    Command(CommandBlock),
    Links(Vec<PageLink>),
    Diagram(Diagram),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Page {
    pub fn diagrams(&self) -> impl Iterator<Item = &Diagram> {
        self.sections.iter().flat_map(|section| {
            section.blocks.iter().filter_map(|block| match block {
                Block::Diagram(diagram) => Some(diagram),
                _ => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deserializes_from_lowercase_names() {
        let vertical: Direction = serde_json::from_str("\"vertical\"").unwrap();
        assert_eq!(vertical, Direction::Vertical);
        let horizontal: Direction = serde_json::from_str("\"horizontal\"").unwrap();
        assert_eq!(horizontal, Direction::Horizontal);
        assert!(serde_json::from_str::<Direction>("\"TB\"").is_err());
    }

    #[test]
    fn diagram_node_lookup() {
        let diagram = Diagram {
            title: String::new(),
            direction: Direction::Vertical,
            nodes: vec![DiagramNode {
                id: "rg".to_string(),
                label: "Resource Group".to_string(),
                sublabel: None,
                color: NodeColor::Blue,
            }],
            connections: Vec::new(),
        };
        assert!(diagram.node("rg").is_some());
        assert!(diagram.node("sa").is_none());
    }
}
