use crate::error::FetchError;

/// Anything that can produce the live policy text for a resource, e.g. a
/// client reading a bucket policy back from the provider.
///
/// This is the only place blocking I/O happens. Call it outside any critical
/// section and hand the resulting string to the comparator.
pub trait PolicySource {
    /// Fetch the policy attached to `resource_id` as raw JSON text.
    fn fetch_policy(&self, resource_id: &str) -> Result<String, FetchError>;
}

impl<F> PolicySource for F
where
    F: Fn(&str) -> Result<String, FetchError>,
{
    fn fetch_policy(&self, resource_id: &str) -> Result<String, FetchError> {
        self(resource_id)
    }
}
