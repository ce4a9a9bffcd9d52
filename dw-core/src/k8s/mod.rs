mod pod_ext;

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::*;
use crate::prelude::*;

err_impl! {KubernetesError,
    #[error("field not found in struct: {0}")]
    FieldNotFound(String),
}

// Which of the three pod spec lists a container was declared in
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ContainerType {
    #[serde(rename = "Container")]
    Standard,

    #[serde(rename = "InitContainer")]
    Init,

    #[serde(rename = "EphemeralContainer")]
    Ephemeral,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Standard => CONTAINER_TYPE_STANDARD,
            ContainerType::Init => CONTAINER_TYPE_INIT,
            ContainerType::Ephemeral => CONTAINER_TYPE_EPHEMERAL,
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A container as declared in the pod spec; image is None when the field is unset
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerRef<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub container_type: ContainerType,
}

pub trait PodExt {
    fn spec(&self) -> anyhow::Result<&corev1::PodSpec>;
    fn container_refs(&self) -> anyhow::Result<Vec<ContainerRef<'_>>>;
}

#[cfg(test)]
mod tests;
