use crate::context::GenerationContext;
use crate::hash_writer::HashWriterAsync;
use crate::skeleton::{
    ICON_FILE, INSTANCE_FILE, INTERMEDIARY_PATCH_FILE, MANIFEST_FILE, PATCHES_DIR, Skeleton,
};
use crate::staging::{self, StagingError};
use async_zip::error::ZipError;
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum PackageError {
    #[error("Failed to create archive '{path}'")]
    CreateArchive { path: PathBuf, source: io::Error },
    #[error("Failed to read '{path}' for packaging")]
    ReadSource { path: PathBuf, source: io::Error },
    #[error("Failed to write entry '{entry}' to archive '{path}'")]
    WriteEntry {
        path: PathBuf,
        entry: String,
        source: ZipError,
    },
    #[error("Failed to finish archive '{path}'")]
    Finish { path: PathBuf, source: ZipError },
    #[error("Failed to flush archive '{path}'")]
    Flush { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Cleanup(#[from] StagingError),
}

/// A finished instance archive.
#[derive(Debug)]
pub struct Archive {
    pub path: PathBuf,
    pub size: u64,
    pub sha256_checksum: [u8; 32],
}

impl Archive {
    pub fn digest(&self) -> String {
        hex::encode(self.sha256_checksum)
    }
}

struct ArchiveBuilder {
    path: PathBuf,
    writer: ZipFileWriter<HashWriterAsync<File, sha2::Sha256>>,
}

impl ArchiveBuilder {
    async fn create(path: PathBuf) -> Result<ArchiveBuilder, PackageError> {
        let file = File::create(&path)
            .await
            .map_err(|source| PackageError::CreateArchive {
                path: path.clone(),
                source,
            })?;
        Ok(ArchiveBuilder {
            path,
            writer: ZipFileWriter::with_tokio(HashWriterAsync::new_sha256(file)),
        })
    }

    async fn append_file(&mut self, source: &Path, entry: String) -> Result<(), PackageError> {
        let data = tokio::fs::read(source)
            .await
            .map_err(|s| PackageError::ReadSource {
                path: source.to_path_buf(),
                source: s,
            })?;
        let builder = ZipEntryBuilder::new(entry.clone().into(), Compression::Deflate);
        self.writer
            .write_entry_whole(builder, &data)
            .await
            .map_err(|s| PackageError::WriteEntry {
                path: self.path.clone(),
                entry: entry.clone(),
                source: s,
            })?;
        debug!(entry = entry, size_bytes = data.len(), "Added archive entry");
        Ok(())
    }

    async fn finalise(self) -> Result<Archive, PackageError> {
        let mut hashed = self
            .writer
            .close()
            .await
            .map_err(|source| PackageError::Finish {
                path: self.path.clone(),
                source,
            })?
            .into_inner();
        hashed
            .shutdown()
            .await
            .map_err(|source| PackageError::Flush {
                path: self.path.clone(),
                source,
            })?;
        let (_, sha256_checksum, size) = hashed.into_inner_sha256();
        Ok(Archive {
            path: self.path,
            size,
            sha256_checksum,
        })
    }
}

/// Zips the staged skeleton and the icon into the context's archive, then
/// removes the staging directory. On failure staging is left in place.
pub async fn package(
    ctx: &GenerationContext,
    skeleton: &Skeleton,
) -> Result<Archive, PackageError> {
    let mut builder = ArchiveBuilder::create(ctx.archive_path()).await?;
    builder
        .append_file(&skeleton.manifest, MANIFEST_FILE.to_owned())
        .await?;
    builder
        .append_file(&skeleton.instance, INSTANCE_FILE.to_owned())
        .await?;
    builder
        .append_file(
            &skeleton.intermediary_patch,
            format!("{}/{}", PATCHES_DIR, INTERMEDIARY_PATCH_FILE),
        )
        .await?;
    builder
        .append_file(&ctx.templates_dir.join(ICON_FILE), ICON_FILE.to_owned())
        .await?;
    let archive = builder.finalise().await?;

    staging::clean(&ctx.staging_dir)?;
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::materialize;
    use crate::skeleton::tests::{context, write_templates};
    use crate::versions::{MappingVariant, VersionEntry};
    use async_zip::tokio::read::fs::ZipFileReader;

    async fn read_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        let reader = ZipFileReader::new(path).await.unwrap();
        let mut entries = Vec::new();
        for index in 0..reader.file().entries().len() {
            let name = reader.file().entries()[index]
                .filename()
                .as_str()
                .unwrap()
                .to_owned();
            let mut entry = reader.reader_with_entry(index).await.unwrap();
            let mut data = Vec::new();
            entry.read_to_end_checked(&mut data).await.unwrap();
            entries.push((name, data));
        }
        entries
    }

    fn no_applet_1_6_4() -> VersionEntry {
        VersionEntry {
            minecraft_version: "1.6.4",
            lwjgl_version: "2.9.0",
            mapping: MappingVariant::NoApplet,
        }
    }

    #[tokio::test]
    async fn packages_four_entries_and_cleans_staging() {
        let root = tempfile::tempdir().unwrap();
        write_templates(&root.path().join("skel"));
        std::fs::create_dir(root.path().join("out")).unwrap();
        let ctx = context(root.path(), no_applet_1_6_4());

        let skeleton = materialize(&ctx).await.unwrap();
        let archive = package(&ctx, &skeleton).await.unwrap();

        assert!(!ctx.staging_dir.exists());
        assert_eq!(
            archive.path,
            root.path().join("out/1.6.4+loader.0.15.3+lwjgl.2.9.0.zip")
        );
        let outputs: Vec<_> = std::fs::read_dir(root.path().join("out"))
            .unwrap()
            .collect();
        assert_eq!(outputs.len(), 1);
        assert_eq!(archive.size, std::fs::metadata(&archive.path).unwrap().len());
        assert_eq!(archive.digest().len(), 64);

        let entries = read_entries(&archive.path).await;
        let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "mmc-pack.json",
                "instance.cfg",
                "patches/net.fabricmc.intermediary.json",
                "legacyfabric.png"
            ]
        );
        assert_eq!(
            String::from_utf8(entries[2].1.clone()).unwrap(),
            "no-applet:0.15.3:1.6.4:2.9.0:LWJGL 2"
        );
        assert_eq!(
            entries[3].1,
            std::fs::read(root.path().join("skel/legacyfabric.png")).unwrap()
        );
    }

    #[tokio::test]
    async fn rerun_overwrites_existing_archive() {
        let root = tempfile::tempdir().unwrap();
        write_templates(&root.path().join("skel"));
        std::fs::create_dir(root.path().join("out")).unwrap();
        let ctx = context(root.path(), no_applet_1_6_4());
        std::fs::write(ctx.archive_path(), "not a zip").unwrap();

        let skeleton = materialize(&ctx).await.unwrap();
        let archive = package(&ctx, &skeleton).await.unwrap();

        assert_eq!(read_entries(&archive.path).await.len(), 4);
    }

    #[tokio::test]
    async fn failed_packaging_leaves_staging_untouched() {
        let root = tempfile::tempdir().unwrap();
        write_templates(&root.path().join("skel"));
        // no output directory, so the archive cannot be created
        let ctx = context(root.path(), no_applet_1_6_4());

        let skeleton = materialize(&ctx).await.unwrap();
        let before = std::fs::read_to_string(&skeleton.intermediary_patch).unwrap();
        let err = package(&ctx, &skeleton).await.unwrap_err();

        assert!(matches!(err, PackageError::CreateArchive { .. }));
        assert!(ctx.staging_dir.join("mmc-pack.json").exists());
        assert!(ctx.staging_dir.join("instance.cfg").exists());
        assert_eq!(
            std::fs::read_to_string(&skeleton.intermediary_patch).unwrap(),
            before
        );
    }

    #[tokio::test]
    async fn shipped_no_applet_template_is_fully_substituted() {
        let root = tempfile::tempdir().unwrap();
        let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("skel");
        std::fs::create_dir(root.path().join("out")).unwrap();
        let ctx = GenerationContext::new(
            &no_applet_1_6_4(),
            "0.15.3",
            templates.clone(),
            root.path().join("temp"),
            root.path().join("out"),
        )
        .unwrap();

        let skeleton = materialize(&ctx).await.unwrap();
        let archive = package(&ctx, &skeleton).await.unwrap();

        assert!(archive.path.ends_with("1.6.4+loader.0.15.3+lwjgl.2.9.0.zip"));
        let entries = read_entries(&archive.path).await;
        let template = std::fs::read_to_string(
            templates.join("patches/net.fabricmc.intermediary.pre-1.7.json"),
        )
        .unwrap();
        let expected = template
            .replace("${loader_version}", "0.15.3")
            .replace("${minecraft_version}", "1.6.4")
            .replace("${lwjgl_version}", "2.9.0")
            .replace("${lwjgl_name}", "LWJGL 2");
        assert_eq!(String::from_utf8(entries[2].1.clone()).unwrap(), expected);

        let manifest: serde_json::Value = serde_json::from_slice(&entries[0].1).unwrap();
        assert_eq!(manifest["components"][0]["uid"], "org.lwjgl");
        assert_eq!(manifest["components"][1]["version"], "1.6.4");
        assert_eq!(manifest["components"][3]["version"], "0.15.3");
    }
}
