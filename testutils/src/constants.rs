pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_OTHER_NAMESPACE: &str = "other-namespace";
pub const TEST_POD: &str = "the-pod";
pub const TEST_IMAGE: &str = "example.com/namespace/image:0.0.1";
pub const TEST_OTHER_IMAGE: &str = "example.com/namespace/other:0.0.2";
