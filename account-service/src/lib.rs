use service_core::catalog::{self, ServiceDefinition};

/// Catalog entry served by this binary (`GET /hello`).
pub static SERVICE: &ServiceDefinition = &catalog::ACCOUNT_HELLO;
