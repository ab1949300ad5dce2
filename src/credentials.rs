use std::{fmt::Display, str::FromStr};

use bon::bon;

use crate::errors::{Error, Result};

/// Fingerprint algorithms supported by the gateway.
///
/// `Md5` is the legacy scheme: the shared secret is concatenated into the
/// signed data like any other value and the digest is unkeyed. `HmacSha512`
/// uses the secret as a true MAC key. The hosted page generates responses
/// against whichever algorithm the merchant account is configured with, so
/// both semantics are preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    HmacSha512,
}

impl HashAlgorithm {
    /// The configuration string for this algorithm.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::HmacSha512 => "hmac_sha512",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md5" => Ok(HashAlgorithm::Md5),
            "hmac_sha512" => Ok(HashAlgorithm::HmacSha512),
            other => Err(Error::ConfigurationInvalid(format!(
                "{other} is no valid hash algorithm"
            ))),
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable merchant account configuration.
///
/// Safe to share read-only across any number of concurrent adapter
/// instances. The secret is only ever used as a signing input and is never
/// serialized onto the wire.
#[derive(Debug, Clone)]
pub struct MerchantCredentials {
    pub customer_id: String,
    pub toolkit_password: String,
    pub secret: String,
    pub payment_type: String,
    pub hash_algorithm: HashAlgorithm,
}

#[bon]
impl MerchantCredentials {
    /// Builds and validates merchant credentials.
    ///
    /// Fails with [`Error::ConfigurationInvalid`] when `customer_id` or
    /// `secret` is empty. Unrecognized algorithm strings are already rejected
    /// by [`HashAlgorithm`]'s `FromStr`, so an unsupported algorithm cannot
    /// reach the fingerprint engine.
    #[builder]
    pub fn new(
        #[builder(into)] customer_id: String,
        #[builder(into, default)] toolkit_password: String,
        #[builder(into)] secret: String,
        #[builder(into, default = String::from("SELECT"))] payment_type: String,
        #[builder(default)] hash_algorithm: HashAlgorithm,
    ) -> Result<Self> {
        if secret.is_empty() || customer_id.is_empty() {
            return Err(Error::ConfigurationInvalid(
                "secret or customer is empty".into(),
            ));
        }

        Ok(MerchantCredentials {
            customer_id,
            toolkit_password,
            secret,
            payment_type,
            hash_algorithm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let credentials = MerchantCredentials::builder()
            .customer_id("D200001")
            .secret("B8AKTPWB")
            .build()
            .unwrap();
        assert_eq!(credentials.payment_type, "SELECT");
        assert_eq!(credentials.hash_algorithm, HashAlgorithm::Md5);
        assert_eq!(credentials.toolkit_password, "");
    }

    #[test]
    fn rejects_empty_secret() {
        let err = MerchantCredentials::builder()
            .customer_id("D200001")
            .secret("")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationInvalid(_)));
    }

    #[test]
    fn rejects_empty_customer() {
        let err = MerchantCredentials::builder()
            .customer_id("")
            .secret("B8AKTPWB")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationInvalid(_)));
    }

    #[test]
    fn parses_algorithm_strings() {
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!(
            "hmac_sha512".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::HmacSha512
        );
        assert!("sha1".parse::<HashAlgorithm>().is_err());
    }
}
