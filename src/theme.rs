use crate::ir::{CalloutKind, NodeColor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePalette {
    pub fill: String,
    pub border: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalloutPalette {
    pub background: String,
    pub border: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub mono_font_family: String,
    pub font_size: f32,
    pub code_font_size: f32,
    pub background: String,
    pub text_color: String,
    pub heading_color: String,
    pub muted_text_color: String,
    pub rule_color: String,
    pub link_color: String,
    pub code_background: String,
    pub code_text_color: String,
    pub code_filename_background: String,
    pub command_background: String,
    pub command_text_color: String,
    pub prompt_color: String,
    pub connector_color: String,
    pub connector_label_background: String,
    pub diagram_background: String,
    pub node_blue: NodePalette,
    pub node_green: NodePalette,
    pub node_orange: NodePalette,
    pub node_purple: NodePalette,
    pub node_gray: NodePalette,
    pub callout_note: CalloutPalette,
    pub callout_tip: CalloutPalette,
    pub callout_warning: CalloutPalette,
    pub highlight_keyword: String,
    pub highlight_string: String,
    pub highlight_comment: String,
    pub highlight_number: String,
    pub highlight_builtin: String,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            mono_font_family: "JetBrains Mono, SFMono-Regular, Menlo, monospace".to_string(),
            font_size: 15.0,
            code_font_size: 13.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            heading_color: "#0F1722".to_string(),
            muted_text_color: "#5B6B80".to_string(),
            rule_color: "#E3E9F2".to_string(),
            link_color: "#1D4ED8".to_string(),
            code_background: "#0F172A".to_string(),
            code_text_color: "#E2E8F0".to_string(),
            code_filename_background: "#1E293B".to_string(),
            command_background: "#111827".to_string(),
            command_text_color: "#D1FAE5".to_string(),
            prompt_color: "#34D399".to_string(),
            connector_color: "#7A8AA6".to_string(),
            connector_label_background: "#FFFFFF".to_string(),
            diagram_background: "#F8FAFF".to_string(),
            node_blue: NodePalette {
                fill: "#DBEAFE".to_string(),
                border: "#3B82F6".to_string(),
                text: "#1E3A8A".to_string(),
            },
            node_green: NodePalette {
                fill: "#D1FAE5".to_string(),
                border: "#10B981".to_string(),
                text: "#065F46".to_string(),
            },
            node_orange: NodePalette {
                fill: "#FFEDD5".to_string(),
                border: "#F97316".to_string(),
                text: "#7C2D12".to_string(),
            },
            node_purple: NodePalette {
                fill: "#EDE9FE".to_string(),
                border: "#8B5CF6".to_string(),
                text: "#4C1D95".to_string(),
            },
            node_gray: NodePalette {
                fill: "#F1F5F9".to_string(),
                border: "#94A3B8".to_string(),
                text: "#334155".to_string(),
            },
            callout_note: CalloutPalette {
                background: "#EFF6FF".to_string(),
                border: "#3B82F6".to_string(),
                icon: "#2563EB".to_string(),
            },
            callout_tip: CalloutPalette {
                background: "#ECFDF5".to_string(),
                border: "#10B981".to_string(),
                icon: "#059669".to_string(),
            },
            callout_warning: CalloutPalette {
                background: "#FFFBEB".to_string(),
                border: "#F59E0B".to_string(),
                icon: "#D97706".to_string(),
            },
            highlight_keyword: "#93C5FD".to_string(),
            highlight_string: "#86EFAC".to_string(),
            highlight_comment: "#64748B".to_string(),
            highlight_number: "#FCA5A5".to_string(),
            highlight_builtin: "#C4B5FD".to_string(),
        }
    }

    pub fn slate() -> Self {
        Self {
            background: "#0B1220".to_string(),
            text_color: "#D5DEEB".to_string(),
            heading_color: "#F1F5F9".to_string(),
            muted_text_color: "#8CA0B8".to_string(),
            rule_color: "#1E2A3C".to_string(),
            link_color: "#60A5FA".to_string(),
            code_background: "#060B14".to_string(),
            code_filename_background: "#101B2C".to_string(),
            command_background: "#060B14".to_string(),
            connector_color: "#8CA0B8".to_string(),
            connector_label_background: "#0B1220".to_string(),
            diagram_background: "#101B2C".to_string(),
            node_blue: NodePalette {
                fill: "#15263E".to_string(),
                border: "#3B82F6".to_string(),
                text: "#BFDBFE".to_string(),
            },
            node_green: NodePalette {
                fill: "#0E2A21".to_string(),
                border: "#10B981".to_string(),
                text: "#A7F3D0".to_string(),
            },
            node_orange: NodePalette {
                fill: "#33200E".to_string(),
                border: "#F97316".to_string(),
                text: "#FED7AA".to_string(),
            },
            node_purple: NodePalette {
                fill: "#231A3C".to_string(),
                border: "#8B5CF6".to_string(),
                text: "#DDD6FE".to_string(),
            },
            node_gray: NodePalette {
                fill: "#16202E".to_string(),
                border: "#64748B".to_string(),
                text: "#CBD5E1".to_string(),
            },
            callout_note: CalloutPalette {
                background: "#0F1B30".to_string(),
                border: "#3B82F6".to_string(),
                icon: "#60A5FA".to_string(),
            },
            callout_tip: CalloutPalette {
                background: "#0C211B".to_string(),
                border: "#10B981".to_string(),
                icon: "#34D399".to_string(),
            },
            callout_warning: CalloutPalette {
                background: "#291E0C".to_string(),
                border: "#F59E0B".to_string(),
                icon: "#FBBF24".to_string(),
            },
            ..Self::light()
        }
    }

    pub fn node_palette(&self, color: NodeColor) -> &NodePalette {
        match color {
            NodeColor::Blue => &self.node_blue,
            NodeColor::Green => &self.node_green,
            NodeColor::Orange => &self.node_orange,
            NodeColor::Purple => &self.node_purple,
            NodeColor::Gray => &self.node_gray,
        }
    }

    pub fn callout_palette(&self, kind: CalloutKind) -> &CalloutPalette {
        match kind {
            CalloutKind::Note => &self.callout_note,
            CalloutKind::Tip => &self.callout_tip,
            CalloutKind::Warning => &self.callout_warning,
        }
    }
}
