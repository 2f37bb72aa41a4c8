// Domain layer: checkout and provider records plus the provider port.

pub mod model;
pub mod ports;
pub mod provider;
