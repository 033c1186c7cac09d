use crate::HealthRes;

/// Simple health service shared by the filestore transports
///
/// Reports liveness only; it does not probe the blob directory or the metadata file.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "filestore is alive".into(),
        }
    }
}
