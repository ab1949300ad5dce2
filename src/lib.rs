pub mod adapter;
pub mod checkout;
pub mod credentials;
pub mod errors;
pub mod fingerprint;
pub mod status;
pub mod toolkit;
pub mod transport;
pub mod types;
pub mod verify;

#[cfg(feature = "transport-client")]
pub mod transport_client;
