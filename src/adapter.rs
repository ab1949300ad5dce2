//! Orchestrates initiation, callback handling and captures for one logical
//! transaction.

use bon::bon;
use url::Url;

use crate::{
    checkout::{self, OptionalFieldAllowList, RedirectForm},
    credentials::MerchantCredentials,
    errors::{Error, Result},
    status::{self, PaymentState, PaymentStatus},
    toolkit,
    transport::Transport,
    types::{Price, Record},
    verify::{self, AuthorizedData, Verdict},
};

/// Progress label of the adapter's transaction. Labels only move forward;
/// repeated captures after `Captured` keep the label unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    #[default]
    Uninitialized,
    Initiated,
    ResponseHandled,
    Captured,
    Cancelled,
}

/// Payment gateway adapter for a single logical transaction.
///
/// [`MerchantCredentials`] are shared read-only; the authorized data slot is
/// private to this instance, written by a successful [`handle_response`]
/// call and read by later captures. Callers must serialize capture calls per
/// transaction.
///
/// [`handle_response`]: GatewayAdapter::handle_response
pub struct GatewayAdapter<T> {
    credentials: MerchantCredentials,
    allow_list: OptionalFieldAllowList,
    transport: T,
    init_url: Url,
    toolkit_url: Url,
    state: TransactionState,
    authorized: Option<AuthorizedData>,
}

fn gateway_url(url: &'static str) -> Url {
    Url::parse(url).expect("static gateway URL parses")
}

#[bon]
impl<T: Transport> GatewayAdapter<T> {
    #[builder]
    pub fn new(
        credentials: MerchantCredentials,
        transport: T,
        #[builder(default)] allow_list: OptionalFieldAllowList,
        init_url: Option<Url>,
        toolkit_url: Option<Url>,
    ) -> Self {
        GatewayAdapter {
            credentials,
            allow_list,
            transport,
            init_url: init_url.unwrap_or_else(|| gateway_url(checkout::INIT_URL)),
            toolkit_url: toolkit_url.unwrap_or_else(|| gateway_url(toolkit::TOOLKIT_URL)),
            state: TransactionState::Uninitialized,
            authorized: None,
        }
    }

    pub fn name(&self) -> &'static str {
        "Qpay"
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn authorized_data(&self) -> Option<&AuthorizedData> {
        self.authorized.as_ref()
    }

    /// Restores authorization persisted elsewhere, enabling captures without
    /// replaying the callback.
    pub fn set_authorized_data(&mut self, data: AuthorizedData) {
        self.authorized = Some(data);
    }

    /// Builds the signed hosted-page redirect. No network I/O happens here;
    /// the caller's presentation layer delivers the form.
    pub fn init_payment(
        &mut self,
        price: &Price,
        caller_fields: &Record<String>,
    ) -> Result<RedirectForm> {
        let form = checkout::build(
            &self.credentials,
            price,
            caller_fields,
            &self.allow_list,
            self.init_url.clone(),
        )?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            order_ident = form.fields.get("orderIdent").unwrap_or_default(),
            "payment initiated"
        );

        self.state = TransactionState::Initiated;
        Ok(form)
    }

    /// Verifies a gateway callback and derives the normalized status.
    ///
    /// A fingerprint mismatch is not an error: the notification maps to a
    /// cancelled status and nothing is authorized. On acceptance the
    /// response's authorized data is retained for later captures.
    pub fn handle_response(&mut self, mut response: Record<String>) -> Result<PaymentStatus> {
        // The response document spams up audit logs and is never needed.
        response.remove("document");

        let verdict = verify::verify(&self.credentials, &response)?;
        if let Verdict::Accepted(data) = &verdict {
            self.authorized = Some(data.clone());
        }

        let payment_status = status::from_response(&response, &verdict);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            reference_id = %payment_status.reference_id,
            state = ?payment_status.state,
            "response handled"
        );

        self.state = match payment_status.state {
            PaymentState::Authorized => TransactionState::ResponseHandled,
            _ => TransactionState::Cancelled,
        };
        Ok(payment_status)
    }

    /// Executes a capture over the transport and maps the toolkit reply.
    ///
    /// With a `price` this issues a `recurPayment` for that amount; without
    /// one it deposits the originally authorized amount. Requires authorized
    /// data from a previous [`handle_response`] or
    /// [`set_authorized_data`] call.
    ///
    /// [`handle_response`]: GatewayAdapter::handle_response
    /// [`set_authorized_data`]: GatewayAdapter::set_authorized_data
    pub async fn execute_capture(
        &mut self,
        price: Option<&Price>,
        reference: &str,
    ) -> Result<PaymentStatus> {
        let Some(authorized) = &self.authorized else {
            return Err(Error::FieldsMissing(
                ["orderNumber", "language", "amount", "currency"]
                    .map(String::from)
                    .to_vec(),
            ));
        };

        let request = toolkit::build(&self.credentials, authorized, price, reference);

        #[cfg(feature = "tracing")]
        tracing::debug!(command = request.command.as_str(), reference, "executing capture");

        let reply = self
            .transport
            .post(&self.toolkit_url, &request.fields)
            .await
            .map_err(|e| Error::Transport(Box::new(e)))?;

        let payment_status =
            status::from_capture_reply(&reply, request.command.as_str(), reference, &request.price)?;

        self.state = match payment_status.state {
            PaymentState::Cleared => TransactionState::Captured,
            _ => TransactionState::Cancelled,
        };
        Ok(payment_status)
    }
}
