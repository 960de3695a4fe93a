use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{DiagramLayout, TextBlock};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Renders one laid-out diagram as a standalone SVG fragment.
pub fn diagram_svg(layout: &DiagramLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(160.0);
    let height = layout.height.max(120.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.2} {height:.2}\" role=\"img\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" rx=\"12\" fill=\"{}\"/>",
        theme.diagram_background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"{size}\" markerHeight=\"{size}\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.connector_color,
        size = config.arrow_size
    ));
    svg.push_str("</defs>");

    if let Some(title) = &layout.title {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
            layout.title_anchor.0,
            layout.title_anchor.1,
            escape_xml(&theme.font_family),
            title.font_size,
            theme.heading_color,
            escape_xml(&title.lines.join(" "))
        ));
    }

    for connector in &layout.connectors {
        let dash = if connector.dashed {
            " stroke-dasharray=\"6 4\""
        } else {
            ""
        };
        svg.push_str(&format!(
            "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"{} marker-end=\"url(#arrow)\"/>",
            connector.start.0,
            connector.start.1,
            connector.end.0,
            connector.end.1,
            theme.connector_color,
            dash
        ));

        if let (Some(label), Some((x, y))) = (&connector.label, connector.label_anchor) {
            let rect_w = label.width + config.connector_label_padding_x * 2.0;
            let rect_h = label.height + config.connector_label_padding_y * 2.0;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{rect_w:.2}\" height=\"{rect_h:.2}\" rx=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"0.8\"/>",
                x - rect_w / 2.0,
                y - rect_h / 2.0,
                theme.connector_label_background,
                theme.rule_color
            ));
            svg.push_str(&text_block_svg(
                x,
                y - label.height / 2.0,
                label,
                &theme.font_family,
                &theme.muted_text_color,
                config,
            ));
        }
    }

    for node in &layout.nodes {
        let palette = theme.node_palette(node.color);
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"/>",
            node.x, node.y, node.width, node.height, palette.fill, palette.border
        ));
        let (center_x, center_y) = node.center();
        let stack_height =
            node.label.height + node.sublabel.as_ref().map_or(0.0, |block| block.height);
        let mut top = center_y - stack_height / 2.0;
        svg.push_str(&text_block_svg(
            center_x,
            top,
            &node.label,
            &theme.font_family,
            &palette.text,
            config,
        ));
        if let Some(sublabel) = &node.sublabel {
            top += node.label.height;
            svg.push_str(&text_block_svg(
                center_x,
                top,
                sublabel,
                &theme.font_family,
                &palette.text,
                config,
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Emits a centered multi-line text element whose top edge sits at `top`.
fn text_block_svg(
    x: f32,
    top: f32,
    block: &TextBlock,
    font_family: &str,
    fill: &str,
    config: &LayoutConfig,
) -> String {
    let line_step = block.font_size * config.label_line_height;
    let first_baseline = top + block.font_size;
    let mut text = format!(
        "<text x=\"{x:.2}\" y=\"{first_baseline:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{fill}\">",
        escape_xml(font_family),
        block.font_size
    );
    for (idx, line) in block.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_step };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{svg}");
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Connection, Diagram, DiagramNode, Direction, NodeColor};
    use crate::layout::compute_layout;

    fn sample_diagram() -> Diagram {
        Diagram {
            title: "Resource hierarchy".to_string(),
            direction: Direction::Vertical,
            nodes: vec![
                DiagramNode {
                    id: "a".to_string(),
                    label: "A".to_string(),
                    sublabel: None,
                    color: NodeColor::Blue,
                },
                DiagramNode {
                    id: "b".to_string(),
                    label: "B".to_string(),
                    sublabel: Some("West Europe".to_string()),
                    color: NodeColor::Green,
                },
            ],
            connections: vec![Connection {
                from: "a".to_string(),
                to: "b".to_string(),
                label: Some("Contains".to_string()),
                dashed: true,
            }],
        }
    }

    #[test]
    fn renders_nodes_connector_and_title() {
        let theme = Theme::light();
        let config = LayoutConfig::default();
        let layout = compute_layout(&sample_diagram(), &theme, &config);
        let svg = diagram_svg(&layout, &theme, &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Resource hierarchy"));
        assert!(svg.contains(">A</tspan>"));
        assert!(svg.contains("West Europe"));
        assert!(svg.contains("stroke-dasharray=\"6 4\""));
        assert!(svg.contains("Contains"));
        assert!(svg.contains(&theme.node_green.fill));
    }

    #[test]
    fn solid_connector_has_no_dasharray() {
        let mut diagram = sample_diagram();
        diagram.connections[0].dashed = false;
        let theme = Theme::light();
        let config = LayoutConfig::default();
        let layout = compute_layout(&diagram, &theme, &config);
        let svg = diagram_svg(&layout, &theme, &config);
        assert!(!svg.contains("stroke-dasharray=\"6 4\""));
    }

    #[test]
    fn labels_are_xml_escaped() {
        let mut diagram = sample_diagram();
        diagram.nodes[0].label = "<VNet> & \"peers\"".to_string();
        let theme = Theme::light();
        let config = LayoutConfig::default();
        let layout = compute_layout(&diagram, &theme, &config);
        let svg = diagram_svg(&layout, &theme, &config);
        assert!(svg.contains("&lt;VNet&gt; &amp; &quot;peers&quot;"));
    }
}
