use crate::config::LayoutConfig;
use crate::ir::{Diagram, Direction, NodeColor};
use crate::text_metrics;
use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

impl TextBlock {
    pub fn measure(text: &str, font_size: f32, font_family: &str, line_height: f32) -> Self {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let width = lines
            .iter()
            .map(|line| text_metrics::measure_text_width(line, font_size, font_family))
            .fold(0.0f32, f32::max);
        let height = lines.len() as f32 * font_size * line_height;
        Self {
            lines,
            width,
            height,
            font_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: TextBlock,
    pub sublabel: Option<TextBlock>,
    pub color: NodeColor,
}

impl NodeLayout {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct ConnectorLayout {
    pub from: String,
    pub to: String,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub label: Option<TextBlock>,
    pub label_anchor: Option<(f32, f32)>,
    pub dashed: bool,
}

#[derive(Debug, Clone)]
pub struct DiagramLayout {
    pub direction: Direction,
    pub title: Option<TextBlock>,
    pub title_anchor: (f32, f32),
    pub nodes: Vec<NodeLayout>,
    pub connectors: Vec<ConnectorLayout>,
    pub width: f32,
    pub height: f32,
}

/// Linear placement: nodes sit in input order along the diagram axis with a
/// fixed gap, centered on the cross axis. Input order is the sole
/// positioning signal.
pub fn compute_layout(diagram: &Diagram, theme: &Theme, config: &LayoutConfig) -> DiagramLayout {
    let title = (!diagram.title.trim().is_empty()).then(|| {
        TextBlock::measure(
            diagram.title.trim(),
            theme.font_size * 1.1,
            &theme.font_family,
            config.label_line_height,
        )
    });

    let boxes: Vec<(TextBlock, Option<TextBlock>, f32, f32)> = diagram
        .nodes
        .iter()
        .map(|node| {
            let label = TextBlock::measure(
                &node.label,
                theme.font_size,
                &theme.font_family,
                config.label_line_height,
            );
            let sublabel = node.sublabel.as_deref().map(|text| {
                TextBlock::measure(
                    text,
                    theme.font_size * config.sublabel_font_scale,
                    &theme.font_family,
                    config.label_line_height,
                )
            });
            let text_width = label
                .width
                .max(sublabel.as_ref().map_or(0.0, |block| block.width));
            let text_height = label.height + sublabel.as_ref().map_or(0.0, |block| block.height);
            let width = (text_width + config.node_padding_x * 2.0).max(config.min_node_width);
            let height = (text_height + config.node_padding_y * 2.0).max(config.min_node_height);
            (label, sublabel, width, height)
        })
        .collect();

    let title_height = title
        .as_ref()
        .map_or(0.0, |block| block.height + config.title_gap);
    let origin = config.diagram_padding;

    let cross_extent = boxes
        .iter()
        .map(|(_, _, width, height)| match diagram.direction {
            Direction::Vertical => *width,
            Direction::Horizontal => *height,
        })
        .fold(0.0f32, f32::max);

    let mut nodes = Vec::with_capacity(boxes.len());
    // The title band pushes content down; horizontal diagrams advance along
    // x, so the band only offsets their cross axis.
    let mut cursor = match diagram.direction {
        Direction::Vertical => origin + title_height,
        Direction::Horizontal => origin,
    };
    for (node, (label, sublabel, width, height)) in diagram.nodes.iter().zip(boxes) {
        let (x, y) = match diagram.direction {
            Direction::Vertical => (origin + (cross_extent - width) / 2.0, cursor),
            Direction::Horizontal => (cursor, origin + title_height + (cross_extent - height) / 2.0),
        };
        let advance = match diagram.direction {
            Direction::Vertical => height,
            Direction::Horizontal => width,
        };
        nodes.push(NodeLayout {
            id: node.id.clone(),
            x,
            y,
            width,
            height,
            label,
            sublabel,
            color: node.color,
        });
        cursor += advance + config.node_spacing;
    }

    let connectors = diagram
        .connections
        .iter()
        .filter_map(|connection| {
            let from = nodes.iter().find(|node| node.id == connection.from)?;
            let to = nodes.iter().find(|node| node.id == connection.to)?;
            let start = border_point(from, to.center());
            let end = border_point(to, from.center());
            let label = connection.label.as_deref().map(|text| {
                TextBlock::measure(
                    text,
                    theme.font_size * config.sublabel_font_scale,
                    &theme.font_family,
                    config.label_line_height,
                )
            });
            let label_anchor = label
                .as_ref()
                .map(|_| ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0));
            Some(ConnectorLayout {
                from: connection.from.clone(),
                to: connection.to.clone(),
                start,
                end,
                label,
                label_anchor,
                dashed: connection.dashed,
            })
        })
        .collect();

    let mut width = origin;
    let mut height = origin;
    for node in &nodes {
        width = width.max(node.x + node.width);
        height = height.max(node.y + node.height);
    }
    if let Some(block) = &title {
        width = width.max(origin + block.width);
    }
    width += config.diagram_padding;
    height += config.diagram_padding;

    let title_anchor = (width / 2.0, origin + title.as_ref().map_or(0.0, |b| b.font_size));

    DiagramLayout {
        direction: diagram.direction,
        title,
        title_anchor,
        nodes,
        connectors,
        width,
        height,
    }
}

/// Point where the segment from this node's center toward `toward` crosses
/// the node's border. Keeps connectors from starting under the box.
fn border_point(node: &NodeLayout, toward: (f32, f32)) -> (f32, f32) {
    let (cx, cy) = node.center();
    let dx = toward.0 - cx;
    let dy = toward.1 - cy;
    if dx == 0.0 && dy == 0.0 {
        return (cx, cy);
    }
    let half_w = node.width / 2.0;
    let half_h = node.height / 2.0;
    let tx = if dx == 0.0 { f32::INFINITY } else { half_w / dx.abs() };
    let ty = if dy == 0.0 { f32::INFINITY } else { half_h / dy.abs() };
    let t = tx.min(ty);
    (cx + dx * t, cy + dy * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Connection, DiagramNode};

    fn node(id: &str, label: &str) -> DiagramNode {
        DiagramNode {
            id: id.to_string(),
            label: label.to_string(),
            sublabel: None,
            color: NodeColor::Blue,
        }
    }

    fn diagram(direction: Direction, nodes: Vec<DiagramNode>, connections: Vec<Connection>) -> Diagram {
        Diagram {
            title: "Topology".to_string(),
            direction,
            nodes,
            connections,
        }
    }

    #[test]
    fn vertical_preserves_input_order_top_to_bottom() {
        let diagram = diagram(
            Direction::Vertical,
            vec![node("a", "A"), node("b", "B"), node("c", "C")],
            Vec::new(),
        );
        let layout = compute_layout(&diagram, &Theme::light(), &LayoutConfig::default());
        assert_eq!(layout.nodes.len(), 3);
        assert!(layout.nodes[0].y < layout.nodes[1].y);
        assert!(layout.nodes[1].y < layout.nodes[2].y);
    }

    #[test]
    fn horizontal_preserves_input_order_left_to_right() {
        let diagram = diagram(
            Direction::Horizontal,
            vec![node("a", "A"), node("b", "B"), node("c", "C")],
            Vec::new(),
        );
        let layout = compute_layout(&diagram, &Theme::light(), &LayoutConfig::default());
        assert!(layout.nodes[0].x < layout.nodes[1].x);
        assert!(layout.nodes[1].x < layout.nodes[2].x);
    }

    #[test]
    fn connector_joins_node_borders() {
        let diagram = diagram(
            Direction::Vertical,
            vec![node("a", "A"), node("b", "B")],
            vec![Connection {
                from: "a".to_string(),
                to: "b".to_string(),
                label: Some("Contains".to_string()),
                dashed: true,
            }],
        );
        let layout = compute_layout(&diagram, &Theme::light(), &LayoutConfig::default());
        assert_eq!(layout.connectors.len(), 1);
        let connector = &layout.connectors[0];
        let a = &layout.nodes[0];
        let b = &layout.nodes[1];
        // Starts on A's bottom edge, ends on B's top edge.
        assert!((connector.start.1 - (a.y + a.height)).abs() < 0.01);
        assert!((connector.end.1 - b.y).abs() < 0.01);
        assert!(connector.dashed);
        assert_eq!(connector.label.as_ref().unwrap().lines, vec!["Contains"]);
    }

    #[test]
    fn dangling_connection_produces_no_connector() {
        let diagram = diagram(
            Direction::Vertical,
            vec![node("a", "A")],
            vec![Connection {
                from: "a".to_string(),
                to: "ghost".to_string(),
                label: None,
                dashed: false,
            }],
        );
        let layout = compute_layout(&diagram, &Theme::light(), &LayoutConfig::default());
        assert!(layout.connectors.is_empty());
    }

    #[test]
    fn sublabel_widens_the_box() {
        let mut with_sub = node("a", "A");
        with_sub.sublabel = Some("Standard LRS replication zone".to_string());
        let plain = diagram(Direction::Vertical, vec![node("a", "A")], Vec::new());
        let subbed = diagram(Direction::Vertical, vec![with_sub], Vec::new());
        let config = LayoutConfig::default();
        let plain_layout = compute_layout(&plain, &Theme::light(), &config);
        let subbed_layout = compute_layout(&subbed, &Theme::light(), &config);
        assert!(subbed_layout.nodes[0].width >= plain_layout.nodes[0].width);
        assert!(subbed_layout.nodes[0].height > plain_layout.nodes[0].height);
    }

    #[test]
    fn nodes_share_spacing_along_the_axis() {
        let diagram = diagram(
            Direction::Vertical,
            vec![node("a", "A"), node("b", "B"), node("c", "C")],
            Vec::new(),
        );
        let config = LayoutConfig::default();
        let layout = compute_layout(&diagram, &Theme::light(), &config);
        let gap_ab = layout.nodes[1].y - (layout.nodes[0].y + layout.nodes[0].height);
        let gap_bc = layout.nodes[2].y - (layout.nodes[1].y + layout.nodes[1].height);
        assert!((gap_ab - config.node_spacing).abs() < 0.01);
        assert!((gap_ab - gap_bc).abs() < 0.01);
    }
}
