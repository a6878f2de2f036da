//! Plain-text package pages.

use std::io::Write;

use crate::errors::RenderError;
use crate::page::PageInfo;
use crate::DocumentRenderer;

const INDENT: &str = "    ";

/// Renders a package page as plain text.
///
/// The layout is a `PACKAGE DOCUMENTATION` header, the package clause and
/// import path, the documentation body, and a `SUBDIRECTORIES` section when
/// the package has immediate sub-packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    /// Creates a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for TextRenderer {
    fn render(&self, sink: &mut dyn Write, info: &PageInfo) -> Result<(), RenderError> {
        let Some(doc) = info.doc.as_ref() else {
            return Err(RenderError::NoDocumentation {
                dirname: info.dirname.clone(),
            });
        };

        writeln!(sink, "PACKAGE DOCUMENTATION")?;
        writeln!(sink)?;
        writeln!(sink, "package {}", doc.name)?;
        writeln!(sink, "{INDENT}import \"{}\"", doc.import_path)?;
        writeln!(sink)?;
        for line in doc.text.trim_end().lines() {
            if line.is_empty() {
                writeln!(sink)?;
            } else {
                writeln!(sink, "{INDENT}{line}")?;
            }
        }

        let children = info
            .dirs
            .iter()
            .flat_map(|dirs| dirs.list.iter())
            .filter(|entry| entry.depth == 0)
            .collect::<Vec<_>>();
        if !children.is_empty() {
            writeln!(sink)?;
            writeln!(sink, "SUBDIRECTORIES")?;
            writeln!(sink)?;
            for entry in children {
                if entry.synopsis.is_empty() {
                    writeln!(sink, "{INDENT}{}", entry.name)?;
                } else {
                    writeln!(sink, "{INDENT}{:<11}{}", entry.name, entry.synopsis)?;
                }
            }
        }
        Ok(())
    }
}
