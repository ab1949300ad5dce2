//! Transport capability consumed by the adapter.

use url::Url;

use crate::types::{FieldMap, Record};

/// Injected HTTP capability for server-to-server gateway calls.
///
/// Implementations own connection timeouts and retry policy; the adapter
/// performs exactly one round trip per capture call and propagates transport
/// failures unmodified. The gateway endpoints are TLS-only.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    /// POSTs `fields` form-encoded to `url` and returns the form-encoded
    /// reply as a field mapping.
    fn post(
        &self,
        url: &Url,
        fields: &FieldMap,
    ) -> impl Future<Output = Result<Record<String>, Self::Error>>;
}
