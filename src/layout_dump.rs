use crate::layout::DiagramLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub direction: String,
    pub width: f32,
    pub height: f32,
    pub title: Option<String>,
    pub nodes: Vec<NodeDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_lines: Vec<String>,
    pub sublabel_lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: String,
    pub to: String,
    pub dashed: bool,
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub label: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &DiagramLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                color: format!("{:?}", node.color),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                label_lines: node.label.lines.clone(),
                sublabel_lines: node
                    .sublabel
                    .as_ref()
                    .map(|block| block.lines.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let connectors = layout
            .connectors
            .iter()
            .map(|connector| ConnectorDump {
                from: connector.from.clone(),
                to: connector.to.clone(),
                dashed: connector.dashed,
                start: [connector.start.0, connector.start.1],
                end: [connector.end.0, connector.end.1],
                label: connector
                    .label
                    .as_ref()
                    .map(|block| block.lines.join("\n")),
            })
            .collect();

        LayoutDump {
            direction: format!("{:?}", layout.direction),
            width: layout.width,
            height: layout.height,
            title: layout.title.as_ref().map(|block| block.lines.join(" ")),
            nodes,
            connectors,
        }
    }
}

/// Writes the layouts of every diagram on the page as a pretty JSON array.
pub fn write_layout_dump(path: &Path, layouts: &[DiagramLayout]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dumps: Vec<LayoutDump> = layouts.iter().map(LayoutDump::from_layout).collect();
    serde_json::to_writer_pretty(writer, &dumps)?;
    Ok(())
}
