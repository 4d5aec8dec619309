use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use url::Url;

mod context;
mod hash_writer;
mod loader;
mod package;
mod skeleton;
mod staging;
mod template;
mod versions;

use context::GenerationContext;
use loader::LoaderVersion;
use package::Archive;

#[derive(Parser, Debug)]
#[command(version, about = "Generates Legacy Fabric instance archives for MultiMC-style launchers")]
struct Args {
    #[arg(long, default_value = "skel", help = "Directory holding the instance templates")]
    templates: PathBuf,

    #[arg(long, default_value = "out", help = "Directory the instance archives are written to")]
    output: PathBuf,

    #[arg(long, default_value = "temp", help = "Scratch directory used while building an archive")]
    staging: PathBuf,

    #[arg(long, default_value = loader::LOADER_META_URL, help = "Loader version listing endpoint")]
    meta_url: Url,

    #[arg(long, help = "Use this loader version instead of asking the metadata service")]
    loader_version: Option<String>,

    #[arg(long, conflicts_with = "loader_version", help = "Skip the metadata service and use the built-in loader version")]
    offline: bool,

    #[arg(long = "only", value_name = "GAME_VERSION", help = "Only generate the given game version (repeatable)")]
    only: Vec<String>,
}

async fn resolve_loader(args: &Args) -> LoaderVersion {
    match (&args.loader_version, args.offline) {
        (Some(v), _) => LoaderVersion::Pinned(v.clone()),
        (None, true) => LoaderVersion::fallback(),
        (None, false) => loader::resolve(&args.meta_url).await,
    }
}

/// Builds one archive per selected table entry. Stops at the first failure.
async fn run(args: &Args) -> Result<Vec<Archive>> {
    let entries = versions::select(&args.only)?;
    let loader_version = resolve_loader(args).await;
    info!(
        loader_version = loader_version.as_str(),
        fallback = matches!(loader_version, LoaderVersion::Fallback(_)),
        versions = entries.len(),
        "Target loader"
    );

    tokio::fs::create_dir_all(&args.output)
        .await
        .with_context(|| format!("Creating output directory {}", args.output.display()))?;

    let mut archives = Vec::with_capacity(entries.len());
    for entry in &entries {
        info!(
            minecraft_version = entry.minecraft_version,
            lwjgl_version = entry.lwjgl_version,
            mapping = entry.mapping.key(),
            "Generating instance"
        );
        let ctx = GenerationContext::new(
            entry,
            loader_version.as_str(),
            args.templates.clone(),
            args.staging.clone(),
            args.output.clone(),
        )?;
        let skeleton = skeleton::materialize(&ctx)
            .await
            .with_context(|| format!("Preparing instance for {}", entry.minecraft_version))?;
        let archive = package::package(&ctx, &skeleton)
            .await
            .with_context(|| format!("Packaging instance for {}", entry.minecraft_version))?;
        info!(
            path = archive.path.as_os_str().to_str(),
            size_bytes = archive.size,
            sha256 = archive.digest(),
            "Wrote instance archive"
        );
        archives.push(archive);
    }
    Ok(archives)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();
    let archives = run(&args).await?;
    info!(archives = archives.len(), "Done");
    Ok(())
}
