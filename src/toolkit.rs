//! Server-to-server capture requests against the toolkit backend.

use crate::{
    credentials::MerchantCredentials,
    fingerprint,
    types::{FieldMap, Price},
    verify::AuthorizedData,
};

/// Production endpoint of the toolkit backend operations.
pub const TOOLKIT_URL: &str = "https://checkout.wirecard.com/page/toolkit.php";

/// Backend command issued by a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCommand {
    /// Clears the originally authorized amount.
    Deposit,
    /// Charges a new amount against a previously authorized order.
    RecurPayment,
}

impl CaptureCommand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CaptureCommand::Deposit => "deposit",
            CaptureCommand::RecurPayment => "recurPayment",
        }
    }
}

/// A signed toolkit request ready for the transport capability.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub command: CaptureCommand,
    /// POST fields in wire order, fingerprint included.
    pub fields: FieldMap,
    /// The amount being captured, echoed into the resulting status.
    pub price: Price,
}

/// Builds a signed capture request from previously authorized data.
///
/// With a `price` the request is a `recurPayment` over that amount;
/// without one it is a `deposit` of the originally authorized amount. Each
/// command signs a protocol-fixed value order that differs from the POST
/// field order — the gateway validates against its own schema per command,
/// not against a declared order, so these sequences must not be derived
/// from the field map.
pub fn build(
    credentials: &MerchantCredentials,
    authorized: &AuthorizedData,
    price: Option<&Price>,
    reference: &str,
) -> CaptureRequest {
    let mut fields = FieldMap::new();
    fields.insert("customerId", credentials.customer_id.as_str());
    fields.insert("toolkitPassword", credentials.toolkit_password.as_str());

    match price {
        Some(price) => {
            let amount = price.wire_amount();
            fields.insert("command", CaptureCommand::RecurPayment.as_str());
            fields.insert("language", authorized.language.as_str());
            fields.insert("requestFingerprint", "");
            fields.insert("orderDescription", reference);
            fields.insert("sourceOrderNumber", authorized.order_number.as_str());
            fields.insert("amount", amount.as_str());
            fields.insert("currency", price.currency.as_str());

            let signature = fingerprint::compute(
                credentials.hash_algorithm,
                &credentials.secret,
                [
                    credentials.customer_id.as_str(),
                    credentials.toolkit_password.as_str(),
                    credentials.secret.as_str(),
                    CaptureCommand::RecurPayment.as_str(),
                    authorized.language.as_str(),
                    authorized.order_number.as_str(),
                    reference,
                    amount.as_str(),
                    price.currency.as_str(),
                ],
            );
            fields.insert("requestFingerprint", signature);

            CaptureRequest {
                command: CaptureCommand::RecurPayment,
                fields,
                price: price.clone(),
            }
        }
        None => {
            let price = Price::new(
                authorized.amount.parse().unwrap_or_default(),
                authorized.currency.as_str(),
            );
            let amount = price.wire_amount();
            fields.insert("command", CaptureCommand::Deposit.as_str());
            fields.insert("language", authorized.language.as_str());
            fields.insert("requestFingerprint", "");
            fields.insert("orderNumber", authorized.order_number.as_str());
            fields.insert("amount", amount.as_str());
            fields.insert("currency", price.currency.as_str());

            let signature = fingerprint::compute(
                credentials.hash_algorithm,
                &credentials.secret,
                [
                    credentials.customer_id.as_str(),
                    credentials.toolkit_password.as_str(),
                    credentials.secret.as_str(),
                    CaptureCommand::Deposit.as_str(),
                    authorized.language.as_str(),
                    authorized.order_number.as_str(),
                    amount.as_str(),
                    price.currency.as_str(),
                ],
            );
            fields.insert("requestFingerprint", signature);

            CaptureRequest {
                command: CaptureCommand::Deposit,
                fields,
                price,
            }
        }
    }
}
