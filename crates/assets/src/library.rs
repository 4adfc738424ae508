use solar_common::{BodyKind, BodyModels, ModelHandle};
use std::path::Path;

use crate::manifest::AssetManifest;
use crate::model::{ModelData, load_model};
use crate::AssetError;

/// Loaded models, addressed by [`ModelHandle`].
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    models: Vec<ModelData>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model and return its handle.
    pub fn insert(&mut self, model: ModelData) -> ModelHandle {
        let handle = ModelHandle(self.models.len() as u32);
        self.models.push(model);
        handle
    }

    pub fn get(&self, handle: ModelHandle) -> Result<&ModelData, AssetError> {
        self.models
            .get(handle.0 as usize)
            .ok_or(AssetError::NotFound(handle))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelHandle, &ModelData)> {
        self.models
            .iter()
            .enumerate()
            .map(|(i, m)| (ModelHandle(i as u32), m))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Load the sun, earth and moon models named by `manifest` under `root`.
    /// The first failure aborts the load.
    pub fn load_bodies(
        root: &Path,
        manifest: &AssetManifest,
    ) -> Result<(Self, BodyModels), AssetError> {
        let resolved = manifest.resolve(root);
        let mut library = Self::new();
        let mut handles = [ModelHandle(0); 3];

        for kind in BodyKind::ALL {
            let path = resolved.path(kind);
            let model = load_model(path)?;
            tracing::info!(
                body = %kind,
                path = %path.display(),
                vertices = model.vertex_count(),
                "model loaded"
            );
            handles[kind.index()] = library.insert(model);
        }

        let models = BodyModels {
            sun: handles[BodyKind::Sun.index()],
            earth: handles[BodyKind::Earth.index()],
            moon: handles[BodyKind::Moon.index()],
        };
        Ok((library, models))
    }
}
