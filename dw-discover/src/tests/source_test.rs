use httpmock::Method::GET;

use super::*;

fn pod_with_image(namespace: &str, pod: &str, image: &str) -> corev1::Pod {
    let mut p = pod_in(namespace, pod);
    add_container(&mut p, "c1", image);
    p
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_kube_source_end_to_end() {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    fake_apiserver
        .handle_pod_list("ns1", vec![pod_with_image("ns1", TEST_POD, TEST_IMAGE)])
        .handle_pod_watch_failure("ns1")
        .handle_forbidden("/api/v1/namespaces/ns2/pods".into())
        .build();

    let source = Arc::new(KubePodSource::new(client, WatchOptions::default()));
    let config = DiscoveryConfig {
        output_format: OutputFormat::Json { compact: true },
        ..DiscoveryConfig::with_namespaces(&["ns1", "ns2"])
    };
    let buffer = SharedBuffer::new();
    let termination = DiscoveryRun::new(config, source)
        .unwrap()
        .run(buffer.clone(), std::future::pending())
        .await
        .unwrap();

    fake_apiserver.assert();
    assert_eq!(termination, Termination::Exhausted);

    let manifest: Manifest = serde_json::from_str(&buffer.contents()).unwrap();
    assert_eq!(manifest.discovered_images, vec![image(TEST_IMAGE, "c1", TEST_POD, "ns1")]);
    assert!(logs_contain("pod watch failed in namespace ns2"));
}

#[rstest]
#[tokio::test]
async fn test_kube_source_passes_selectors() {
    let (mut fake_apiserver, client) = make_fake_apiserver();
    let body = pod_list(vec![pod_with_image(TEST_NAMESPACE, TEST_POD, TEST_IMAGE)]);
    fake_apiserver
        .handle(move |when, then| {
            when.path(format!("/api/v1/namespaces/{TEST_NAMESPACE}/pods"))
                .method(GET)
                .query_param("limit", "500")
                .query_param("labelSelector", "app=web")
                .query_param("fieldSelector", "status.phase=Running");
            then.json_body(body.clone());
        })
        .handle_pod_watch_failure(TEST_NAMESPACE)
        .build();

    let source = KubePodSource::new(
        client,
        WatchOptions {
            label_selector: Some("app=web".into()),
            field_selector: Some("status.phase=Running".into()),
        },
    );
    // The kube watcher retries forever after an error, so only look at the first two items
    let pods: Vec<_> = source.watch(TEST_NAMESPACE).await.unwrap().take(2).collect().await;

    fake_apiserver.assert();
    assert_eq!(pods.len(), 2);
    assert_eq!(pods[0].as_ref().unwrap().name_any(), TEST_POD);
    assert!(pods[1].is_err());
}
