use serde::{Deserialize, Serialize};
use solar_common::BodyKind;
use std::path::{Path, PathBuf};

use crate::AssetError;

/// Where each body's model lives, relative to an asset root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub sun: PathBuf,
    pub earth: PathBuf,
    pub moon: PathBuf,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            sun: PathBuf::from("models/planet/planet.glb"),
            earth: PathBuf::from("models/earth/globe.glb"),
            moon: PathBuf::from("models/rock/rock.glb"),
        }
    }
}

impl AssetManifest {
    pub fn path(&self, kind: BodyKind) -> &Path {
        match kind {
            BodyKind::Sun => &self.sun,
            BodyKind::Earth => &self.earth,
            BodyKind::Moon => &self.moon,
        }
    }

    /// Join every relative path onto `root`. Absolute paths are kept.
    pub fn resolve(&self, root: &Path) -> Self {
        Self {
            sun: root.join(&self.sun),
            earth: root.join(&self.earth),
            moon: root.join(&self.moon),
        }
    }

    /// Read a manifest from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
