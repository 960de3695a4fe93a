use crate::config::{Config, load_config};
use crate::html::render_page;
use crate::layout::{DiagramLayout, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::loader::{LoadedPage, parse_page};
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{diagram_svg, write_output_svg};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dpr", version, about = "Lesson-page renderer: declarative pages to HTML/SVG")]
pub struct Args {
    /// Input page file (.json5/.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for HTML/SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format: full page as HTML, or the page's diagrams as SVG/PNG
    #[arg(short = 'f', long = "format", value_enum, default_value = "html")]
    pub format: OutputFormat,

    /// Config JSON file of theme/layout overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme preset; overrides the config file's choice
    #[arg(long = "theme", value_enum)]
    pub theme: Option<ThemeChoice>,

    /// Write every diagram's computed layout as pretty JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Html,
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ThemeChoice {
    Light,
    Slate,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(choice) = args.theme {
        config.theme = match choice {
            ThemeChoice::Light => Theme::light(),
            ThemeChoice::Slate => Theme::slate(),
        };
    }

    let input = read_input(args.input.as_deref())?;
    let LoadedPage { page, warnings } = parse_page(&input)?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let layouts: Vec<DiagramLayout> = page
        .diagrams()
        .map(|diagram| compute_layout(diagram, &config.theme, &config.layout))
        .collect();

    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layouts)?;
    }

    match args.format {
        OutputFormat::Html => {
            let html = render_page(&page, &config.theme, &config.layout);
            match &args.output {
                Some(path) => std::fs::write(path, html)?,
                None => print!("{html}"),
            }
        }
        OutputFormat::Svg => {
            export_diagrams(&layouts, &config, args.output.as_deref(), false)?;
        }
        OutputFormat::Png => {
            export_diagrams(&layouts, &config, args.output.as_deref(), true)?;
        }
    }

    Ok(())
}

fn export_diagrams(
    layouts: &[DiagramLayout],
    config: &Config,
    output: Option<&Path>,
    png: bool,
) -> Result<()> {
    if layouts.is_empty() {
        return Err(anyhow::anyhow!("No diagrams found on page"));
    }

    if layouts.len() == 1 {
        let svg = diagram_svg(&layouts[0], &config.theme, &config.layout);
        if png {
            let output = ensure_output(output, "png")?;
            write_png(&svg, &output, config)?;
        } else {
            write_output_svg(&svg, output)?;
        }
        return Ok(());
    }

    // Multiple diagrams fan out to numbered files.
    let outputs = resolve_multi_outputs(output, png, layouts.len())?;
    for (layout, path) in layouts.iter().zip(&outputs) {
        let svg = diagram_svg(layout, &config.theme, &config.layout);
        if png {
            write_png(&svg, path, config)?;
        } else {
            write_output_svg(&svg, Some(path))?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: Option<&Path>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn resolve_multi_outputs(output: Option<&Path>, png: bool, count: usize) -> Result<Vec<PathBuf>> {
    let ext = if png { "png" } else { "svg" };
    let base =
        output.ok_or_else(|| anyhow::anyhow!("Output path required for multi-diagram export"))?;
    if base.is_dir() {
        let mut outputs = Vec::new();
        for idx in 0..count {
            outputs.push(base.join(format!("diagram-{}.{}", idx + 1, ext)));
        }
        return Ok(outputs);
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    let mut outputs = Vec::new();
    for idx in 0..count {
        outputs.push(parent.join(format!("{}-{}.{}", stem, idx + 1, ext)));
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_outputs_number_from_stem() {
        let outputs =
            resolve_multi_outputs(Some(Path::new("out/hierarchy.svg")), false, 3).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0], PathBuf::from("out/hierarchy-1.svg"));
        assert_eq!(outputs[2], PathBuf::from("out/hierarchy-3.svg"));
    }

    #[test]
    fn multi_outputs_require_a_path() {
        assert!(resolve_multi_outputs(None, false, 2).is_err());
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(None, "png").is_err());
    }
}
