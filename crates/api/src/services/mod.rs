//! Business services and external integrations.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod google;
pub mod mercadopago;
pub mod shipping;
pub mod viacep;
pub mod webhook;
