use std::io::Write;

use dw_core::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::manifest::{
    Manifest,
    OutputFormat,
};
use crate::watcher::Receiver;

// The aggregator is the only reader of the discovery channel and the only owner of the manifest,
// so the fold needs no locking.  Once the channel closes (every watcher is done) or the run is
// cancelled, the manifest is rendered and written to the sink exactly once.
pub struct ManifestAggregator<W> {
    sink: W,
    format: OutputFormat,
}

impl<W: Write + Send + 'static> ManifestAggregator<W> {
    pub fn new(sink: W, format: OutputFormat) -> ManifestAggregator<W> {
        ManifestAggregator { sink, format }
    }

    #[instrument(skip_all)]
    pub async fn start(self, mut rx: Receiver, cancel: CancellationToken) -> EmptyResult {
        let mut manifest = Manifest::new();
        loop {
            tokio::select! {
                biased;
                maybe_image = rx.recv() => match maybe_image {
                    Some(image) => manifest.fold(image),
                    None => {
                        debug!("aggregator completing because the channel is closed");
                        break;
                    },
                },
                _ = cancel.cancelled() => {
                    debug!("aggregator completing because the run was cancelled");

                    // Anything already buffered was sent before the cancellation, so keep it
                    rx.close();
                    while let Ok(image) = rx.try_recv() {
                        manifest.fold(image);
                    }
                    break;
                },
            }
        }

        self.finish(&manifest)
    }

    fn finish(mut self, manifest: &Manifest) -> EmptyResult {
        if manifest.is_empty() {
            info!("will not write manifest because no workloads were discovered");
            return Ok(());
        }

        if let Err(err) = self.format.write_to(manifest, &mut self.sink) {
            error!("unable to emit the manifest: {err}");
            return Err(err);
        }

        info!("wrote manifest with {} discovered image(s)", manifest.len());
        Ok(())
    }
}
