use service_core::catalog::{self, ServiceDefinition};

/// Catalog entry served by this binary (`GET /account`).
pub static SERVICE: &ServiceDefinition = &catalog::ACCOUNT;
