//! Normalized payment statuses derived from gateway messages.

use std::collections::BTreeMap;

use crate::{
    errors::{Error, Result},
    types::{Price, Record},
    verify::Verdict,
};

/// Closed set of payment lifecycle states exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentState {
    /// The hosted page authorized the payment; funds are reserved.
    Authorized,
    /// A capture (deposit or recurring payment) cleared the funds.
    Cleared,
    /// The payment was declined, aborted or could not be trusted.
    Cancelled,
}

/// Normalized outcome of a gateway interaction. Immutable; terminal per
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatus {
    /// The caller's own reference for the transaction.
    pub reference_id: String,
    /// The gateway's transaction identifier, when one was assigned.
    pub provider_transaction_id: String,
    pub message: String,
    pub state: PaymentState,
    /// Provider-specific detail for auditing, keyed `qpay_*`.
    pub provider_detail: Record<String>,
}

/// Deterministic textual dump of a gateway message for audit trails.
fn dump(response: &Record<String>) -> String {
    let ordered: BTreeMap<&str, &str> = response
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    serde_json::to_string(&ordered).unwrap_or_default()
}

fn field<'a>(response: &'a Record<String>, name: &str) -> &'a str {
    response.get(name).map(String::as_str).unwrap_or_default()
}

/// The response's `avsResponseMessage` when non-empty, else its `message`.
fn response_message(response: &Record<String>) -> String {
    let avs = field(response, "avsResponseMessage");
    if avs.is_empty() {
        field(response, "message").to_string()
    } else {
        avs.to_string()
    }
}

/// Maps a verified (or rejected) hosted-page callback to a payment status.
///
/// Accepted responses are `Authorized` only when an order number was
/// assigned and `paymentState` is `SUCCESS`; everything else, including
/// rejections, maps to `Cancelled`.
pub fn from_response(response: &Record<String>, verdict: &Verdict) -> PaymentStatus {
    let state = match verdict {
        Verdict::Accepted(_) => {
            if response.contains_key("orderNumber") && field(response, "paymentState") == "SUCCESS"
            {
                PaymentState::Authorized
            } else {
                PaymentState::Cancelled
            }
        }
        Verdict::Rejected { .. } => PaymentState::Cancelled,
    };

    let provider_detail = Record::from_iter([
        (
            "qpay_amount".to_string(),
            format!(
                "{} {}",
                field(response, "amount"),
                field(response, "currency")
            ),
        ),
        (
            "qpay_paymentType".to_string(),
            field(response, "paymentType").to_string(),
        ),
        (
            "qpay_paymentState".to_string(),
            field(response, "paymentState").to_string(),
        ),
        ("qpay_response".to_string(), dump(response)),
    ]);

    PaymentStatus {
        reference_id: field(response, "orderIdent").to_string(),
        provider_transaction_id: field(response, "orderNumber").to_string(),
        message: response_message(response),
        state,
        provider_detail,
    }
}

/// Maps a toolkit capture reply to a payment status.
///
/// `status == "0"` means the operation succeeded and takes precedence over
/// everything else in the reply. Otherwise a declared error count selects
/// the error shape. A reply matching neither shape is a protocol violation
/// and fatal for the call.
pub fn from_capture_reply(
    reply: &Record<String>,
    command: &str,
    reference: &str,
    price: &Price,
) -> Result<PaymentStatus> {
    let payment_number = field(reply, "paymentNumber");
    let transaction_id = if payment_number.is_empty() {
        field(reply, "orderNumber")
    } else {
        payment_number
    };

    let provider_detail = Record::from_iter([
        ("qpay_amount".to_string(), price.to_string()),
        ("qpay_command".to_string(), command.to_string()),
        ("qpay_response".to_string(), dump(reply)),
    ]);

    if field(reply, "status") == "0" {
        return Ok(PaymentStatus {
            reference_id: reference.to_string(),
            provider_transaction_id: transaction_id.to_string(),
            message: String::new(),
            state: PaymentState::Cleared,
            provider_detail,
        });
    }

    let error_count: u32 = field(reply, "errors").parse().unwrap_or(0);
    if error_count > 0 {
        let message = (1..=error_count)
            .map(|i| field(reply, &format!("error_{i}_error_message")).to_string())
            .collect::<Vec<_>>()
            .join("\n");

        return Ok(PaymentStatus {
            reference_id: reference.to_string(),
            provider_transaction_id: transaction_id.to_string(),
            message,
            state: PaymentState::Cancelled,
            provider_detail,
        });
    }

    Err(Error::ProtocolViolation { raw: dump(reply) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::AuthorizedData;

    fn record(entries: &[(&str, &str)]) -> Record<String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn accepted_success_with_order_number_is_authorized() {
        let response = record(&[
            ("orderIdent", "ref-1"),
            ("orderNumber", "1000042"),
            ("paymentState", "SUCCESS"),
            ("paymentType", "CCARD"),
            ("amount", "19.90"),
            ("currency", "EUR"),
        ]);
        let verdict = Verdict::Accepted(AuthorizedData::default());

        let status = from_response(&response, &verdict);
        assert_eq!(status.state, PaymentState::Authorized);
        assert_eq!(status.provider_transaction_id, "1000042");
        assert_eq!(status.reference_id, "ref-1");
        assert_eq!(status.provider_detail["qpay_amount"], "19.90 EUR");
        assert_eq!(status.provider_detail["qpay_paymentType"], "CCARD");
        assert_eq!(status.provider_detail["qpay_paymentState"], "SUCCESS");
        assert!(status.provider_detail["qpay_response"].contains("1000042"));
    }

    #[test]
    fn accepted_without_order_number_is_cancelled() {
        let response = record(&[("orderIdent", "ref-1"), ("paymentState", "SUCCESS")]);
        let verdict = Verdict::Accepted(AuthorizedData::default());
        assert_eq!(
            from_response(&response, &verdict).state,
            PaymentState::Cancelled
        );
    }

    #[test]
    fn rejected_is_cancelled_with_avs_message_first() {
        let response = record(&[
            ("orderIdent", "ref-1"),
            ("orderNumber", "1000042"),
            ("avsResponseMessage", "AVS mismatch"),
            ("message", "generic message"),
        ]);
        let verdict = Verdict::Rejected {
            reason: "mismatch".into(),
        };

        let status = from_response(&response, &verdict);
        assert_eq!(status.state, PaymentState::Cancelled);
        assert_eq!(status.message, "AVS mismatch");
    }

    #[test]
    fn message_falls_back_when_avs_is_empty() {
        let response = record(&[
            ("orderIdent", "ref-1"),
            ("avsResponseMessage", ""),
            ("message", "declined"),
        ]);
        let verdict = Verdict::Rejected {
            reason: "mismatch".into(),
        };
        assert_eq!(from_response(&response, &verdict).message, "declined");
    }

    #[test]
    fn capture_status_zero_is_cleared() {
        let reply = record(&[("status", "0"), ("paymentNumber", "7777")]);
        let status =
            from_capture_reply(&reply, "deposit", "ref-1", &Price::new(19.9, "EUR")).unwrap();
        assert_eq!(status.state, PaymentState::Cleared);
        assert_eq!(status.provider_transaction_id, "7777");
        assert_eq!(status.message, "");
        assert_eq!(status.provider_detail["qpay_command"], "deposit");
    }

    #[test]
    fn capture_status_zero_takes_precedence_over_errors() {
        let reply = record(&[("status", "0"), ("errors", "2"), ("orderNumber", "42")]);
        let status =
            from_capture_reply(&reply, "deposit", "ref-1", &Price::new(19.9, "EUR")).unwrap();
        assert_eq!(status.state, PaymentState::Cleared);
    }

    #[test]
    fn capture_transaction_id_falls_back_to_order_number() {
        let reply = record(&[("status", "0"), ("paymentNumber", ""), ("orderNumber", "42")]);
        let status =
            from_capture_reply(&reply, "deposit", "ref-1", &Price::new(19.9, "EUR")).unwrap();
        assert_eq!(status.provider_transaction_id, "42");
    }

    #[test]
    fn capture_errors_join_messages_with_newlines() {
        let reply = record(&[
            ("status", "1"),
            ("errors", "2"),
            ("error_1_error_message", "Insufficient funds"),
            ("error_2_error_message", "Card expired"),
        ]);
        let status =
            from_capture_reply(&reply, "deposit", "ref-1", &Price::new(19.9, "EUR")).unwrap();
        assert_eq!(status.state, PaymentState::Cancelled);
        assert_eq!(status.message, "Insufficient funds\nCard expired");
    }

    #[test]
    fn capture_with_zero_errors_is_a_protocol_violation() {
        let reply = record(&[("status", "1"), ("errors", "0")]);
        let err = from_capture_reply(&reply, "deposit", "ref-1", &Price::new(19.9, "EUR"))
            .unwrap_err();
        match err {
            Error::ProtocolViolation { raw } => assert!(raw.contains("errors")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn audit_dump_is_deterministic() {
        let reply = record(&[("b", "2"), ("a", "1"), ("c", "3")]);
        assert_eq!(dump(&reply), r#"{"a":"1","b":"2","c":"3"}"#);
    }
}
