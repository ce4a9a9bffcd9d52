use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use rstest::*;

use crate::constants::*;

#[fixture]
pub fn test_pod(#[default(TEST_POD)] name: &str) -> corev1::Pod {
    pod_in(TEST_NAMESPACE, name)
}

pub fn pod_in(namespace: &str, name: &str) -> corev1::Pod {
    corev1::Pod {
        metadata: metav1::ObjectMeta {
            namespace: Some(namespace.into()),
            name: Some(name.into()),
            uid: Some(format!("{namespace}-{name}-uid")),
            ..Default::default()
        },
        spec: Some(corev1::PodSpec::default()),
        status: None,
    }
}

pub fn add_container(pod: &mut corev1::Pod, name: &str, image: &str) {
    let spec = pod.spec.get_or_insert_default();
    spec.containers.push(corev1::Container {
        name: name.into(),
        image: Some(image.into()),
        ..Default::default()
    });
}

pub fn add_init_container(pod: &mut corev1::Pod, name: &str, image: &str) {
    let spec = pod.spec.get_or_insert_default();
    spec.init_containers.get_or_insert_default().push(corev1::Container {
        name: name.into(),
        image: Some(image.into()),
        ..Default::default()
    });
}

pub fn add_ephemeral_container(pod: &mut corev1::Pod, name: &str, image: &str) {
    let spec = pod.spec.get_or_insert_default();
    spec.ephemeral_containers
        .get_or_insert_default()
        .push(corev1::EphemeralContainer {
            name: name.into(),
            image: Some(image.into()),
            ..Default::default()
        });
}

// A single pod with one container in each slot: c1 (standard) and c2 (init) share TEST_IMAGE,
// c3 (ephemeral) runs TEST_OTHER_IMAGE
#[fixture]
pub fn all_slots_pod() -> corev1::Pod {
    let mut pod = test_pod(TEST_POD);
    add_container(&mut pod, "c1", TEST_IMAGE);
    add_init_container(&mut pod, "c2", TEST_IMAGE);
    add_ephemeral_container(&mut pod, "c3", TEST_OTHER_IMAGE);
    pod
}
