/*!
 * Build manifest registration.
 *
 * Newly created resource documents must be listed in the project file to be
 * embedded at build time. The pipeline hands their file names to a
 * `BuildManifest` sink; `CsprojManifest` patches an MSBuild project.
 */

use log::{debug, info};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::ManifestError;
use crate::file_utils::FileManager;
use crate::resx::splice_before_end;

const BOM: char = '\u{feff}';

/// Sink for newly created resource document names
pub trait BuildManifest {
    /// Register file names not yet known to the manifest.
    /// Returns how many were added.
    fn register(&mut self, file_names: &[String]) -> Result<usize, ManifestError>;
}

/// MSBuild project (`.csproj`) patcher
#[derive(Debug, Clone)]
pub struct CsprojManifest {
    path: PathBuf,
}

impl CsprojManifest {
    /// Open an existing project file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();
        if !FileManager::file_exists(&path) {
            return Err(ManifestError::NotFound(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Include` values of every `EmbeddedResource` item in the project
    pub fn embedded_resources(&self) -> Result<HashSet<String>, ManifestError> {
        let (content, _) = self.read()?;
        collect_embedded_resources(&content)
    }

    /// Project text without a byte order mark, and whether one was present
    fn read(&self) -> Result<(String, bool), ManifestError> {
        if !FileManager::file_exists(&self.path) {
            return Err(ManifestError::NotFound(self.path.clone()));
        }
        let content = FileManager::read_to_string(&self.path).map_err(|e| ManifestError::Parse(e.to_string()))?;
        match content.strip_prefix(BOM) {
            Some(rest) => Ok((rest.to_string(), true)),
            None => Ok((content, false)),
        }
    }
}

impl BuildManifest for CsprojManifest {
    fn register(&mut self, file_names: &[String]) -> Result<usize, ManifestError> {
        let (content, bom) = self.read()?;
        let mut known = collect_embedded_resources(&content)?;

        let new_names: Vec<&str> = file_names
            .iter()
            .map(String::as_str)
            .filter(|name| known.insert(name.to_string()))
            .collect();
        if new_names.is_empty() {
            debug!("{} already lists every resource", self.path.display());
            return Ok(0);
        }

        let items = render_items(&new_names, "    ")?;
        let patched = match splice_before_end(&content, |depth, name| depth == 1 && local_name(name) == b"ItemGroup", &items)
            .map_err(|e| ManifestError::Parse(e.to_string()))?
        {
            Some(patched) => patched,
            None => {
                let group = render_item_group(&new_names)?;
                splice_before_end(&content, |depth, _| depth == 0, &group)
                    .map_err(|e| ManifestError::Parse(e.to_string()))?
                    .ok_or_else(|| ManifestError::Parse("project has no root element".to_string()))?
            }
        };

        let patched = if bom { format!("{}{}", BOM, patched) } else { patched };
        FileManager::write_atomically(&self.path, &patched).map_err(|e| ManifestError::Persist(e.to_string()))?;
        for name in &new_names {
            info!("Added {} to {}", name, self.path.display());
        }

        Ok(new_names.len())
    }
}

/// Name of the code file a resource document depends on: the text before
/// the first `.` plus `.cs` (`AboutBox.fr-FR.resx` -> `AboutBox.cs`)
pub fn dependent_upon(file_name: &str) -> String {
    let base = file_name.split('.').next().unwrap_or(file_name);
    format!("{}.cs", base)
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(index) => &name[index + 1..],
        None => name,
    }
}

fn collect_embedded_resources(content: &str) -> Result<HashSet<String>, ManifestError> {
    let mut reader = Reader::from_str(content);
    let mut includes = HashSet::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if local_name(e.name().as_ref()) == b"EmbeddedResource" => {
                if let Some(attribute) = e
                    .try_get_attribute("Include")
                    .map_err(|e| ManifestError::Parse(e.to_string()))?
                {
                    let value = attribute
                        .unescape_value()
                        .map_err(|e| ManifestError::Parse(e.to_string()))?;
                    includes.insert(value.into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ManifestError::Parse(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    Ok(includes)
}

fn render_items(names: &[&str], indent: &str) -> Result<Vec<u8>, ManifestError> {
    let mut writer = Writer::new(Vec::new());

    for name in names {
        let dependency = dependent_upon(name);
        writer.get_mut().extend_from_slice(format!("\n{}", indent).as_bytes());
        write(&mut writer, Event::Start(BytesStart::new("EmbeddedResource").with_attributes([("Include", *name)])))?;
        writer.get_mut().extend_from_slice(format!("\n{}  ", indent).as_bytes());
        write(&mut writer, Event::Start(BytesStart::new("DependentUpon")))?;
        write(&mut writer, Event::Text(BytesText::new(&dependency)))?;
        write(&mut writer, Event::End(BytesEnd::new("DependentUpon")))?;
        writer.get_mut().extend_from_slice(format!("\n{}", indent).as_bytes());
        write(&mut writer, Event::End(BytesEnd::new("EmbeddedResource")))?;
    }

    Ok(writer.into_inner())
}

fn render_item_group(names: &[&str]) -> Result<Vec<u8>, ManifestError> {
    let mut group = b"\n  <ItemGroup>".to_vec();
    group.extend(render_items(names, "    ")?);
    group.extend_from_slice(b"\n  </ItemGroup>");
    Ok(group)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ManifestError> {
    writer
        .write_event(event)
        .map_err(|e| ManifestError::Persist(e.to_string()))
}
