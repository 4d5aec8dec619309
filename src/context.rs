use crate::template::Placeholders;
use crate::versions::{self, MappingVariant, VersionEntry, VersionError};
use std::path::PathBuf;

/// Everything needed to build the archive for one version table entry.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub minecraft_version: String,
    /// Game version as the intermediary mappings name it, e.g. `1.0.0-client`.
    pub intermediary_version: String,
    pub lwjgl_version: String,
    pub mapping: MappingVariant,
    pub loader_version: String,
    pub templates_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl GenerationContext {
    pub fn new(
        entry: &VersionEntry,
        loader_version: &str,
        templates_dir: PathBuf,
        staging_dir: PathBuf,
        output_dir: PathBuf,
    ) -> Result<GenerationContext, VersionError> {
        Ok(GenerationContext {
            minecraft_version: entry.minecraft_version.to_owned(),
            intermediary_version: versions::normalize(entry.minecraft_version)?,
            lwjgl_version: entry.lwjgl_version.to_owned(),
            mapping: entry.mapping,
            loader_version: loader_version.to_owned(),
            templates_dir,
            staging_dir,
            output_dir,
        })
    }

    /// Placeholders for the launcher manifest and instance descriptor, which
    /// refer to the game by its Mojang version id.
    pub fn instance_placeholders(&self) -> Placeholders<'_> {
        Placeholders {
            loader_version: &self.loader_version,
            minecraft_version: &self.minecraft_version,
            lwjgl_version: &self.lwjgl_version,
        }
    }

    pub fn intermediary_placeholders(&self) -> Placeholders<'_> {
        Placeholders {
            minecraft_version: &self.intermediary_version,
            ..self.instance_placeholders()
        }
    }

    pub fn archive_name(&self) -> String {
        format!(
            "{}+loader.{}+lwjgl.{}.zip",
            self.intermediary_version, self.loader_version, self.lwjgl_version
        )
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(self.archive_name())
    }
}
