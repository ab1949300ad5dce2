//! Integrity codes over ordered field values.

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha512;

use crate::credentials::HashAlgorithm;

type HmacSha512 = Hmac<Sha512>;

/// Computes the hex fingerprint for an ordered value list.
///
/// The values are concatenated without a delimiter. With
/// [`HashAlgorithm::Md5`] the digest covers the buffer alone; the secret
/// participates only if it is one of the ordered values. With
/// [`HashAlgorithm::HmacSha512`] the secret keys the MAC.
pub fn compute<I, S>(algorithm: HashAlgorithm, secret: &str, ordered_values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut data = String::new();
    for value in ordered_values {
        data.push_str(value.as_ref());
    }

    match algorithm {
        HashAlgorithm::Md5 => hex::encode(Md5::digest(data.as_bytes())),
        HashAlgorithm::HmacSha512 => {
            let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts keys of any length");
            mac.update(data.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
    }
}
