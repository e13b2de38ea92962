//! MSBuild project file reference extractor using quick-xml

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use solgraph_core::path::resolve;
use solgraph_core::{CanonicalPath, ExtractError, ReferenceExtractor};

const BYTE_ORDER_MARK: char = '\u{FEFF}';
const PROJECT_REFERENCE: &[u8] = b"ProjectReference";
const INCLUDE: &str = "Include";

/// Reads `<ProjectReference Include="..."/>` elements from project files
/// (`.csproj`, `.vbproj`, `.fsproj`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct MsBuildExtractor;

impl MsBuildExtractor {
    pub fn new() -> Self {
        MsBuildExtractor
    }

    /// Raw `Include` values in document order, before path resolution.
    pub fn raw_references(&self, content: &str) -> Result<Vec<String>, ExtractError> {
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
        let mut reader = Reader::from_str(content);

        let mut references = Vec::new();
        let mut depth = 0usize;
        let mut roots = 0usize;

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event()
                .map_err(|e| ExtractError::new(position, e.to_string()))?;

            match event {
                Event::Start(element) => {
                    Self::visit(&element, depth, &mut roots, &mut references, position)?;
                    depth += 1;
                }
                Event::Empty(element) => {
                    Self::visit(&element, depth, &mut roots, &mut references, position)?;
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                }
                Event::Text(text) => {
                    if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(ExtractError::new(position, "text outside the root element"));
                    }
                    // Entity references in text must resolve.
                    text.unescape()
                        .map_err(|e| ExtractError::new(position, e.to_string()))?;
                }
                Event::Eof => {
                    if depth > 0 {
                        return Err(ExtractError::new(position, "unexpected end of document, unclosed element"));
                    }
                    if roots == 0 {
                        return Err(ExtractError::new(position, "document has no root element"));
                    }
                    break;
                }
                _ => {}
            }
        }

        Ok(references)
    }

    /// Checks every attribute of `element`, and records the `Include` of a
    /// `ProjectReference` below the root.
    fn visit(
        element: &BytesStart<'_>,
        depth: usize,
        roots: &mut usize,
        references: &mut Vec<String>,
        position: u64,
    ) -> Result<(), ExtractError> {
        if depth == 0 {
            *roots += 1;
            if *roots > 1 {
                return Err(ExtractError::new(position, "more than one root element"));
            }
        }
        let is_reference = depth > 0 && element.name().as_ref() == PROJECT_REFERENCE;

        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| ExtractError::new(position, e.to_string()))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| ExtractError::new(position, e.to_string()))?;
            // References without a path are skipped.
            if is_reference && attribute.key.as_ref() == INCLUDE.as_bytes() && !value.is_empty() {
                references.push(value.into_owned());
            }
        }
        Ok(())
    }
}

impl ReferenceExtractor for MsBuildExtractor {
    fn extract_references(&self, content: &str, project_dir: &Path) -> Result<Vec<CanonicalPath>, ExtractError> {
        let references = self.raw_references(content)?;
        tracing::trace!("{} references in {}", references.len(), project_dir.display());
        Ok(references
            .iter()
            .map(|reference| resolve(project_dir, reference))
            .collect())
    }
}
