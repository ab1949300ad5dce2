#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Merchant configuration cannot be used to sign anything. Raised at
    /// construction time and never recovered from.
    #[error("payment configuration is wrong: {0}")]
    ConfigurationInvalid(String),

    /// The caller omitted required fields. Lists every missing field name.
    #[error("required fields are missing! required: {}", .0.join(", "))]
    FieldsMissing(Vec<String>),

    /// The toolkit reply matched neither the success shape nor the declared
    /// error shape. No safe status can be derived from it.
    #[error("unrecognized toolkit reply: {raw}")]
    ProtocolViolation { raw: String },

    /// Failure reported by the injected transport capability, propagated
    /// unmodified.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
