use crate::ir::{Block, Diagram, Page};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse page description: {0}")]
    Parse(String),
    #[error("diagram \"{diagram}\" declares duplicate node id \"{id}\"")]
    DuplicateNodeId { diagram: String, id: String },
}

/// Non-fatal findings from validation. A dangling connection keeps the page
/// renderable; the affected connector is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    DanglingConnection {
        diagram: String,
        from: String,
        to: String,
        missing: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DanglingConnection {
                diagram,
                from,
                to,
                missing,
            } => write!(
                f,
                "diagram \"{diagram}\": connection {from} -> {to} references unknown node \"{missing}\"; connector skipped"
            ),
        }
    }
}

#[derive(Debug)]
pub struct LoadedPage {
    pub page: Page,
    pub warnings: Vec<Warning>,
}

/// Parses a page description. JSON5 is a superset of JSON, so both `.json5`
/// and plain `.json` page files go through the same parser.
pub fn parse_page(input: &str) -> Result<LoadedPage, PageError> {
    let page: Page = json5::from_str(input).map_err(|err| PageError::Parse(err.to_string()))?;
    let warnings = validate(&page)?;
    Ok(LoadedPage { page, warnings })
}

pub fn load_page(path: &Path) -> Result<LoadedPage, PageError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_page(&contents)
}

/// Checks every diagram on the page. Duplicate node ids are a hard error;
/// dangling connection endpoints degrade to warnings.
pub fn validate(page: &Page) -> Result<Vec<Warning>, PageError> {
    let mut warnings = Vec::new();
    for section in &page.sections {
        for block in &section.blocks {
            if let Block::Diagram(diagram) = block {
                validate_diagram(diagram, &mut warnings)?;
            }
        }
    }
    Ok(warnings)
}

fn validate_diagram(diagram: &Diagram, warnings: &mut Vec<Warning>) -> Result<(), PageError> {
    let mut ids: HashSet<&str> = HashSet::new();
    for node in &diagram.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(PageError::DuplicateNodeId {
                diagram: diagram.title.clone(),
                id: node.id.clone(),
            });
        }
    }
    for connection in &diagram.connections {
        for endpoint in [&connection.from, &connection.to] {
            if diagram.node(endpoint).is_none() {
                warnings.push(Warning::DanglingConnection {
                    diagram: diagram.title.clone(),
                    from: connection.from.clone(),
                    to: connection.to.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}
