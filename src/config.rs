use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between consecutive nodes along the diagram axis.
    pub node_spacing: f32,
    pub node_padding_x: f32,
    pub node_padding_y: f32,
    pub min_node_width: f32,
    pub min_node_height: f32,
    pub diagram_padding: f32,
    pub title_gap: f32,
    pub label_line_height: f32,
    pub sublabel_font_scale: f32,
    pub connector_label_padding_x: f32,
    pub connector_label_padding_y: f32,
    pub arrow_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 56.0,
            node_padding_x: 26.0,
            node_padding_y: 14.0,
            min_node_width: 120.0,
            min_node_height: 44.0,
            diagram_padding: 24.0,
            title_gap: 18.0,
            label_line_height: 1.4,
            sublabel_font_scale: 0.82,
            connector_label_padding_x: 6.0,
            connector_label_padding_y: 3.0,
            arrow_size: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::light();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_spacing: Option<f32>,
    node_padding_x: Option<f32>,
    node_padding_y: Option<f32>,
    min_node_width: Option<f32>,
    min_node_height: Option<f32>,
    diagram_padding: Option<f32>,
    label_line_height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    mono_font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    link_color: Option<String>,
    code_background: Option<String>,
    connector_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
}

/// Loads a JSON config of optional overrides merged over the defaults.
/// A missing path yields the default config.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = match theme_name {
            "slate" | "dark" => Theme::slate(),
            _ => Theme::light(),
        };
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.mono_font_family {
            config.theme.mono_font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.link_color {
            config.theme.link_color = v;
        }
        if let Some(v) = vars.code_background {
            config.theme.code_background = v;
        }
        if let Some(v) = vars.connector_color {
            config.theme.connector_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_spacing {
            config.layout.node_spacing = v;
        }
        if let Some(v) = layout.node_padding_x {
            config.layout.node_padding_x = v;
        }
        if let Some(v) = layout.node_padding_y {
            config.layout.node_padding_y = v;
        }
        if let Some(v) = layout.min_node_width {
            config.layout.min_node_width = v;
        }
        if let Some(v) = layout.min_node_height {
            config.layout.min_node_height = v;
        }
        if let Some(v) = layout.diagram_padding {
            config.layout.diagram_padding = v;
        }
        if let Some(v) = layout.label_line_height {
            config.layout.label_line_height = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_render_background_tracks_theme() {
        let config = Config::default();
        assert_eq!(config.render.background, config.theme.background);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.node_spacing, LayoutConfig::default().node_spacing);
    }
}
