use std::num::ParseIntError;

/// Intermediary mappings changed their version naming for very old releases, so
/// versions whose minor component is below this carry a `-client` suffix.
const CLIENT_SUFFIX_THRESHOLD: u32 = 3;

#[derive(thiserror::Error, Debug)]
pub enum VersionError {
    #[error("Component '{component}' of game version '{version}' is not a number")]
    InvalidComponent {
        version: String,
        component: String,
        source: ParseIntError,
    },
    #[error("Game version '{version}' is not in the version table")]
    UnknownVersion { version: String },
}

/// Selects which intermediary patch template an instance is built from.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum MappingVariant {
    Standard,
    NoApplet,
    NoAppletLegacyArgs,
    V2,
    Ornithe,
}

impl MappingVariant {
    pub fn template_name(&self) -> &'static str {
        match self {
            MappingVariant::Standard => "net.fabricmc.intermediary.json",
            MappingVariant::NoApplet => "net.fabricmc.intermediary.pre-1.7.json",
            MappingVariant::NoAppletLegacyArgs => "net.fabricmc.intermediary.pre-1.6.json",
            MappingVariant::V2 => "net.fabricmc.intermediary.v2.json",
            MappingVariant::Ornithe => "net.fabricmc.intermediary.ornithe.json",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MappingVariant::Standard => "standard",
            MappingVariant::NoApplet => "no-applet",
            MappingVariant::NoAppletLegacyArgs => "no-applet-legacy-args",
            MappingVariant::V2 => "v2",
            MappingVariant::Ornithe => "ornithe",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VersionEntry {
    pub minecraft_version: &'static str,
    pub lwjgl_version: &'static str,
    pub mapping: MappingVariant,
}

const fn entry(
    minecraft_version: &'static str,
    lwjgl_version: &'static str,
    mapping: MappingVariant,
) -> VersionEntry {
    VersionEntry {
        minecraft_version,
        lwjgl_version,
        mapping,
    }
}

pub const VERSIONS: &[VersionEntry] = &[
    entry("1.13.2", "3.1.6", MappingVariant::Standard),
    entry("1.12.2", "2.9.4-nightly-20150209", MappingVariant::Standard),
    entry("1.12", "2.9.4-nightly-20150209", MappingVariant::V2),
    entry("1.11.2", "2.9.4-nightly-20150209", MappingVariant::Standard),
    entry("1.9.4", "2.9.4-nightly-20150209", MappingVariant::Standard),
    entry("1.8.9", "2.9.4-nightly-20150209", MappingVariant::Standard),
    entry("1.8", "2.9.1", MappingVariant::Standard),
    entry("1.7.10", "2.9.1", MappingVariant::Standard),
    entry("1.7.4", "2.9.1-nightly-20131017", MappingVariant::Standard),
    entry("1.7.2", "2.9.0", MappingVariant::Standard),
    entry("1.6.4", "2.9.0", MappingVariant::NoApplet),
    entry("1.3.2", "2.9.0", MappingVariant::NoAppletLegacyArgs),
    entry("1.0", "2.9.0", MappingVariant::Ornithe),
];

/// Narrows the table down to the requested game versions, keeping table order.
/// An empty filter selects everything.
pub fn select(only: &[String]) -> Result<Vec<VersionEntry>, VersionError> {
    if let Some(unknown) = only
        .iter()
        .find(|v| !VERSIONS.iter().any(|e| e.minecraft_version == v.as_str()))
    {
        return Err(VersionError::UnknownVersion {
            version: unknown.clone(),
        });
    }
    Ok(VERSIONS
        .iter()
        .filter(|e| only.is_empty() || only.iter().any(|v| v == e.minecraft_version))
        .copied()
        .collect())
}

/// Computes the suffix the intermediary naming convention appends to a game
/// version: `1.0` becomes `1.0.0`, and releases before 1.3 get `-client`.
pub fn intermediary_suffix(minecraft_version: &str) -> Result<String, VersionError> {
    let mut suffix = String::new();
    if minecraft_version == "1.0" {
        suffix.push_str(".0");
    }
    let extended = format!("{}{}", minecraft_version, suffix);
    let Some(minor) = extended.split('.').nth(1) else {
        return Ok(suffix);
    };
    let minor = minor
        .parse::<u32>()
        .map_err(|source| VersionError::InvalidComponent {
            version: minecraft_version.to_owned(),
            component: minor.to_owned(),
            source,
        })?;
    if minor < CLIENT_SUFFIX_THRESHOLD {
        suffix.push_str("-client");
    }
    Ok(suffix)
}

pub fn normalize(minecraft_version: &str) -> Result<String, VersionError> {
    Ok(format!(
        "{}{}",
        minecraft_version,
        intermediary_suffix(minecraft_version)?
    ))
}
