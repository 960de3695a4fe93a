#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod highlight;
pub mod html;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod loader;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use html::render_page;
pub use layout::compute_layout;
pub use loader::{LoadedPage, PageError, load_page, parse_page};
pub use render::diagram_svg;
pub use theme::Theme;
