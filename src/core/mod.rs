pub mod charge;
pub mod customer;
pub mod function;
pub mod orchestrator;
pub mod validator;

#[cfg(test)]
pub(crate) mod mock_provider;

pub use crate::domain::model::{CheckoutRequest, CheckoutResponse};
pub use crate::domain::ports::PaymentProvider;
pub use crate::utils::error::Result;
