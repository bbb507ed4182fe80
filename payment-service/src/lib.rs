use service_core::catalog::{self, ServiceDefinition};

/// Catalog entry served by this binary (`GET /payment`).
pub static SERVICE: &ServiceDefinition = &catalog::PAYMENT;
