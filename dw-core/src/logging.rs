// Everything goes to stderr; stdout is reserved for the manifest document.
pub fn setup(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
