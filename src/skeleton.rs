use crate::context::GenerationContext;
use crate::template::Placeholders;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "mmc-pack.json";
pub const INSTANCE_FILE: &str = "instance.cfg";
pub const ICON_FILE: &str = "legacyfabric.png";
pub const PATCHES_DIR: &str = "patches";
/// Every mapping variant is written under this name so the launcher picks it up.
pub const INTERMEDIARY_PATCH_FILE: &str = "net.fabricmc.intermediary.json";

#[derive(thiserror::Error, Debug)]
pub enum SkeletonError {
    #[error("Staging directory '{path}' already exists, remove it before generating")]
    StagingExists { path: PathBuf },
    #[error("Failed to create staging directory '{path}'")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to read template '{path}'")]
    ReadTemplate { path: PathBuf, source: io::Error },
    #[error("Failed to write staged file '{path}'")]
    WriteStaged { path: PathBuf, source: io::Error },
}

/// Paths of the files written into staging.
#[derive(Debug)]
pub struct Skeleton {
    pub manifest: PathBuf,
    pub instance: PathBuf,
    pub intermediary_patch: PathBuf,
}

async fn render(
    template: PathBuf,
    target: PathBuf,
    placeholders: Placeholders<'_>,
) -> Result<PathBuf, SkeletonError> {
    let text = tokio::fs::read_to_string(&template)
        .await
        .map_err(|source| SkeletonError::ReadTemplate {
            path: template.clone(),
            source,
        })?;
    tokio::fs::write(&target, placeholders.apply(&text))
        .await
        .map_err(|source| SkeletonError::WriteStaged {
            path: target.clone(),
            source,
        })?;
    debug!(
        template = template.as_os_str().to_str(),
        target = target.as_os_str().to_str(),
        "Rendered template"
    );
    Ok(target)
}

async fn create_dir(path: &Path) -> Result<(), SkeletonError> {
    tokio::fs::create_dir(path)
        .await
        .map_err(|source| SkeletonError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

/// Creates a fresh staging directory and renders the instance templates into it.
pub async fn materialize(ctx: &GenerationContext) -> Result<Skeleton, SkeletonError> {
    let staging = &ctx.staging_dir;
    tokio::fs::create_dir(staging).await.map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            SkeletonError::StagingExists {
                path: staging.clone(),
            }
        } else {
            SkeletonError::CreateDir {
                path: staging.clone(),
                source,
            }
        }
    })?;
    create_dir(&staging.join(PATCHES_DIR)).await?;

    let templates = &ctx.templates_dir;
    let manifest = render(
        templates.join(MANIFEST_FILE),
        staging.join(MANIFEST_FILE),
        ctx.instance_placeholders(),
    )
    .await?;
    let instance = render(
        templates.join(INSTANCE_FILE),
        staging.join(INSTANCE_FILE),
        ctx.instance_placeholders(),
    )
    .await?;
    let intermediary_patch = render(
        templates.join(PATCHES_DIR).join(ctx.mapping.template_name()),
        staging.join(PATCHES_DIR).join(INTERMEDIARY_PATCH_FILE),
        ctx.intermediary_placeholders(),
    )
    .await?;

    Ok(Skeleton {
        manifest,
        instance,
        intermediary_patch,
    })
}
