//! Callback verification against the declared fingerprint order.

use crate::{
    credentials::MerchantCredentials,
    errors::{Error, Result},
    fingerprint,
    types::Record,
};

/// Data retained from an accepted response to enable later capture
/// operations against the same transaction. Fields absent from the response
/// are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedData {
    pub order_number: String,
    pub language: String,
    pub amount: String,
    pub currency: String,
}

/// Outcome of verifying a gateway callback.
///
/// A rejection is an expected, non-fatal result: tampered or corrupted
/// notifications map to a cancelled status rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The declared order reproduces the declared fingerprint, or the
    /// failure bypass applied.
    Accepted(AuthorizedData),
    /// Recomputed fingerprint differs from the declared one; the
    /// notification must not be trusted.
    Rejected { reason: String },
}

/// Recomputes the response fingerprint from the order the response itself
/// declares and accepts or rejects the notification.
///
/// The value list is rebuilt by splitting `responseFingerprintOrder` on
/// commas; the literal field name `secret` resolves to the merchant secret,
/// every other name resolves to the response's value (absent fields count as
/// empty). Responses with `paymentState == "FAILURE"` are accepted without a
/// signature check; the hosted page sends failure notifications unsigned.
pub fn verify(credentials: &MerchantCredentials, response: &Record<String>) -> Result<Verdict> {
    if !response.contains_key("orderIdent") {
        return Err(Error::FieldsMissing(vec!["orderIdent".into()]));
    }

    let field_value = |name: &str| response.get(name).map(String::as_str).unwrap_or_default();

    let order = field_value("responseFingerprintOrder");
    let values: Vec<&str> = order
        .split(',')
        .map(|name| {
            if name == "secret" {
                credentials.secret.as_str()
            } else {
                field_value(name)
            }
        })
        .collect();

    let expected = fingerprint::compute(credentials.hash_algorithm, &credentials.secret, &values);

    if field_value("paymentState") != "FAILURE" && expected != field_value("responseFingerprint") {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            order_ident = field_value("orderIdent"),
            "response fingerprint mismatch, ignoring notification"
        );

        return Ok(Verdict::Rejected {
            reason: "responseFingerprint does not match the declared field order".into(),
        });
    }

    Ok(Verdict::Accepted(AuthorizedData {
        order_number: field_value("orderNumber").to_string(),
        language: field_value("language").to_string(),
        amount: field_value("amount").to_string(),
        currency: field_value("currency").to_string(),
    }))
}
