//! Hosted-page payment initiation.

use url::Url;

use crate::{
    credentials::MerchantCredentials,
    errors::{Error, Result},
    fingerprint,
    types::{FieldMap, Price, Record},
};

/// Production endpoint of the hosted checkout page.
pub const INIT_URL: &str = "https://www.qenta.com/qpay/init.php";

/// Caller-supplied fields required for every initiation, in emission order.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "successURL",
    "cancelURL",
    "failureURL",
    "serviceURL",
    "orderDescription",
    "orderIdent",
    "language",
];

// shopId with value "mobile" selects the mobile checkout page.
const DEFAULT_OPTIONAL_FIELDS: [&str; 5] = [
    "imageURL",
    "confirmURL",
    "confirmMail",
    "displayText",
    "shopId",
];

/// Optional field names permitted to pass through from caller config into
/// the outbound request, beyond the fixed required set.
///
/// De-duplicated; extensible by configuration. Pass-through happens in
/// allow-list order.
#[derive(Debug, Clone)]
pub struct OptionalFieldAllowList(Vec<String>);

impl Default for OptionalFieldAllowList {
    fn default() -> Self {
        OptionalFieldAllowList(DEFAULT_OPTIONAL_FIELDS.map(String::from).to_vec())
    }
}

impl OptionalFieldAllowList {
    /// The built-in allow list without any configured additions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.0.contains(&name) {
            self.0.push(name);
        }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.push(name);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// An ordered POST form for the caller's presentation layer to render as a
/// hosted-page redirect. No markup is produced here; `fields` become hidden
/// inputs and `submit_control` names the submit element to add.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectForm {
    pub action: Url,
    pub method: &'static str,
    pub fields: FieldMap,
    pub submit_control: &'static str,
}

/// Assembles the signed initiation request.
///
/// The emitted field set carries `requestFingerprintOrder` naming every
/// signed field (the secret and the order field itself included) and
/// `requestFingerprint` computed over the values in that order. The secret
/// value itself never appears among the emitted fields.
pub fn build(
    credentials: &MerchantCredentials,
    price: &Price,
    caller_fields: &Record<String>,
    allow_list: &OptionalFieldAllowList,
    action: Url,
) -> Result<RedirectForm> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|name| !caller_fields.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::FieldsMissing(missing));
    }

    let mut data = FieldMap::new();
    data.insert("secret", credentials.secret.as_str());
    data.insert("customerId", credentials.customer_id.as_str());
    data.insert("amount", price.wire_amount());
    data.insert("currency", price.currency.as_str());
    data.insert("duplicateRequestCheck", "yes");
    data.insert("paymentType", credentials.payment_type.as_str());

    for name in REQUIRED_FIELDS {
        if let Some(value) = caller_fields.get(name) {
            data.insert(name, value.as_str());
        }
    }

    for name in allow_list.iter() {
        if let Some(value) = caller_fields.get(name) {
            data.insert(name, value.as_str());
        }
    }

    // Seed the key first so the order string names itself, then fill in the
    // joined key list. The order value participates in the fingerprint.
    data.insert("requestFingerprintOrder", "");
    let order = data.order();
    data.insert("requestFingerprintOrder", order);

    let fingerprint = fingerprint::compute(
        credentials.hash_algorithm,
        &credentials.secret,
        data.values(),
    );

    let mut fields: FieldMap = data
        .iter()
        .filter(|(name, _)| *name != "secret")
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    fields.insert("requestFingerprint", fingerprint);

    Ok(RedirectForm {
        action,
        method: "POST",
        fields,
        submit_control: "submitbutton",
    })
}
