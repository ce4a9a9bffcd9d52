use dw_core::errors::*;

err_impl! {DiscoveryError,
    #[error("invalid discovery config: {0}")]
    InvalidConfig(String),

    #[error("could not serialize manifest: {0}")]
    ManifestSerialization(String),

    #[error("could not write manifest: {0}")]
    ManifestWrite(String),

    #[error("aggregator task failed: {0}")]
    AggregatorFailed(String),
}
