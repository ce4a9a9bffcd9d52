use super::*;

impl PodExt for corev1::Pod {
    fn spec(&self) -> anyhow::Result<&corev1::PodSpec> {
        match self.spec.as_ref() {
            None => bail!(KubernetesError::field_not_found("pod spec")),
            Some(ps) => Ok(ps),
        }
    }

    // Standard containers come first, then init containers, then ephemeral containers; within
    // each list the declared order is preserved.  Downstream consumers rely on this ordering.
    fn container_refs(&self) -> anyhow::Result<Vec<ContainerRef<'_>>> {
        let spec = self.spec()?;
        let init_containers = spec.init_containers.as_deref().unwrap_or_default();
        let ephemeral_containers = spec.ephemeral_containers.as_deref().unwrap_or_default();

        let mut refs = Vec::with_capacity(spec.containers.len() + init_containers.len() + ephemeral_containers.len());
        refs.extend(spec.containers.iter().map(|c| ContainerRef {
            name: &c.name,
            image: c.image.as_deref(),
            container_type: ContainerType::Standard,
        }));
        refs.extend(init_containers.iter().map(|c| ContainerRef {
            name: &c.name,
            image: c.image.as_deref(),
            container_type: ContainerType::Init,
        }));
        refs.extend(ephemeral_containers.iter().map(|c| ContainerRef {
            name: &c.name,
            image: c.image.as_deref(),
            container_type: ContainerType::Ephemeral,
        }));

        Ok(refs)
    }
}
