use assertables::*;
use tokio::sync::mpsc;

use super::*;

fn compact_aggregator(sink: SharedBuffer) -> ManifestAggregator<SharedBuffer> {
    ManifestAggregator::new(sink, OutputFormat::Json { compact: true })
}

#[rstest]
#[tokio::test]
async fn test_aggregator_all_slot_types(all_slots_pod: corev1::Pod) {
    let buffer = SharedBuffer::new();
    let (tx, rx) = mpsc::channel(10);
    for image in discovered_images_for(&all_slots_pod, "ns1").unwrap() {
        tx.send(image).await.unwrap();
    }
    drop(tx);

    compact_aggregator(buffer.clone())
        .start(rx, CancellationToken::new())
        .await
        .unwrap();

    let manifest: Manifest = serde_json::from_str(&buffer.contents()).unwrap();
    assert_eq!(
        manifest,
        Manifest {
            discovered_images: vec![
                DiscoveredImage {
                    image: TEST_IMAGE.into(),
                    containers: vec![
                        container("c1", ContainerType::Standard, TEST_POD, "ns1"),
                        container("c2", ContainerType::Init, TEST_POD, "ns1"),
                    ],
                },
                DiscoveredImage {
                    image: TEST_OTHER_IMAGE.into(),
                    containers: vec![container("c3", ContainerType::Ephemeral, TEST_POD, "ns1")],
                },
            ],
        }
    );
}

#[rstest]
#[traced_test]
#[tokio::test]
async fn test_aggregator_empty_input_writes_nothing() {
    let buffer = SharedBuffer::new();
    let (tx, rx) = mpsc::channel::<DiscoveredImage>(1);
    drop(tx);

    compact_aggregator(buffer.clone())
        .start(rx, CancellationToken::new())
        .await
        .unwrap();

    assert!(buffer.is_empty());
    assert!(logs_contain("will not write manifest because no workloads were discovered"));
}

#[rstest]
#[tokio::test]
async fn test_aggregator_writes_once_with_duplicates() {
    let buffer = SharedBuffer::new();
    let (tx, rx) = mpsc::channel(10);
    let record = image("img:1", "c1", "p1", "ns1");
    tx.send(record.clone()).await.unwrap();
    tx.send(record).await.unwrap();
    drop(tx);

    compact_aggregator(buffer.clone())
        .start(rx, CancellationToken::new())
        .await
        .unwrap();

    let contents = buffer.contents();
    assert_eq!(contents.lines().count(), 1);
    let manifest: Manifest = serde_json::from_str(&contents).unwrap();
    assert_len_eq_x!(&manifest.discovered_images[0].containers, 1);
}

#[rstest]
#[tokio::test]
async fn test_aggregator_cancel_keeps_buffered_records() {
    let buffer = SharedBuffer::new();
    let (tx, rx) = mpsc::channel(10);
    tx.send(image("img:1", "c1", "p1", "ns1")).await.unwrap();
    tx.send(image("img:2", "c2", "p1", "ns1")).await.unwrap();

    // The sender stays open, so only the cancellation can end the fold
    let cancel = CancellationToken::new();
    cancel.cancel();
    compact_aggregator(buffer.clone()).start(rx, cancel).await.unwrap();

    let manifest: Manifest = serde_json::from_str(&buffer.contents()).unwrap();
    assert_eq!(manifest.len(), 2);
    assert_err!(tx.send(image("img:3", "c3", "p1", "ns1")).await);
}

#[rstest]
#[tokio::test]
async fn test_aggregator_sink_failure() {
    let (tx, rx) = mpsc::channel(10);
    tx.send(image("img:1", "c1", "p1", "ns1")).await.unwrap();
    drop(tx);

    let res = ManifestAggregator::new(BrokenSink, OutputFormat::default())
        .start(rx, CancellationToken::new())
        .await;
    assert_err!(res);
}
