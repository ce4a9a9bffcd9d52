use std::io::Write;

use dw_core::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::DiscoveryError;

// The field names here are part of the output contract, hence the PascalCase renames

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    pub discovered_images: Vec<DiscoveredImage>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoveredImage {
    pub image: String,
    pub containers: Vec<DiscoveredContainer>,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoveredContainer {
    pub name: String,
    #[serde(rename = "Type")]
    pub container_type: ContainerType,
    pub pod: DiscoveredPod,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoveredPod {
    pub name: String,
    pub namespace: String,
}

impl DiscoveredImage {
    pub fn new(image: &str, container: DiscoveredContainer) -> DiscoveredImage {
        DiscoveredImage { image: image.into(), containers: vec![container] }
    }
}

impl Manifest {
    pub fn new() -> Manifest {
        Manifest::default()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered_images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.discovered_images.len()
    }

    // Merge a discovered image into the manifest.  Images are keyed by their reference string and
    // containers are only added if an identical (name, type, pod) entry isn't already present.
    // Both lists keep first-seen order.  Linear scans are fine here: manifests are at most a few
    // hundred images, and this keeps the output order stable without a side index.
    pub fn fold(&mut self, incoming: DiscoveredImage) {
        let Some(existing) = self.discovered_images.iter_mut().find(|i| i.image == incoming.image) else {
            let mut incoming = incoming;
            dedup_in_order(&mut incoming.containers);
            self.discovered_images.push(incoming);
            return;
        };

        for container in incoming.containers {
            if !existing.containers.contains(&container) {
                existing.containers.push(container);
            }
        }
    }
}

impl FromIterator<DiscoveredImage> for Manifest {
    fn from_iter<T: IntoIterator<Item = DiscoveredImage>>(iter: T) -> Self {
        let mut manifest = Manifest::new();
        for image in iter {
            manifest.fold(image);
        }
        manifest
    }
}

fn dedup_in_order(containers: &mut Vec<DiscoveredContainer>) {
    let mut seen: Vec<DiscoveredContainer> = Vec::with_capacity(containers.len());
    containers.retain(|c| {
        if seen.contains(c) {
            false
        } else {
            seen.push(c.clone());
            true
        }
    });
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Json { compact: bool },
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json { compact: false }
    }
}

impl OutputFormat {
    pub fn render(&self, manifest: &Manifest) -> anyhow::Result<String> {
        let mut rendered = match self {
            OutputFormat::Json { compact: true } => serde_json::to_string(manifest)
                .map_err(|e| DiscoveryError::manifest_serialization(&e.to_string()))?,
            OutputFormat::Json { compact: false } => serde_json::to_string_pretty(manifest)
                .map_err(|e| DiscoveryError::manifest_serialization(&e.to_string()))?,
            OutputFormat::Yaml => {
                serde_yaml::to_string(manifest).map_err(|e| DiscoveryError::manifest_serialization(&e.to_string()))?
            },
        };

        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }

    // The document goes out in a single write so a reader never sees half a manifest
    pub fn write_to<W: Write>(&self, manifest: &Manifest, sink: &mut W) -> EmptyResult {
        let rendered = self.render(manifest)?;
        sink.write_all(rendered.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(|e| DiscoveryError::manifest_write(&e.to_string()))
    }
}
