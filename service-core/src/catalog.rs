//! Static table of every greeting service in the workspace.
//!
//! Each service binary selects one entry from this table; the router,
//! configuration defaults and ops endpoints are all derived from it.

/// A single `GET` route answering with a fixed plain-text body.
#[derive(Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub body: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub default_port: u16,
    /// Port for `/health`, `/ready` and `/metrics`.
    pub default_ops_port: u16,
}

pub static ACCOUNT_HELLO: ServiceDefinition = ServiceDefinition {
    name: "account-service",
    endpoint: Endpoint {
        path: "/hello",
        body: "Hello World",
    },
    default_port: 8080,
    default_ops_port: 9080,
};

pub static ACCOUNT: ServiceDefinition = ServiceDefinition {
    name: "base-account-service",
    endpoint: Endpoint {
        path: "/account",
        body: "Hello from account micro service",
    },
    default_port: 8081,
    default_ops_port: 9081,
};

pub static PAYMENT: ServiceDefinition = ServiceDefinition {
    name: "payment-service",
    endpoint: Endpoint {
        path: "/payment",
        body: "Hello from payment micro service",
    },
    default_port: 8082,
    default_ops_port: 9082,
};

pub static SERVICES: [&ServiceDefinition; 3] = [&ACCOUNT_HELLO, &ACCOUNT, &PAYMENT];

/// Look up a service by its name.
pub fn find(name: &str) -> Option<&'static ServiceDefinition> {
    SERVICES.iter().copied().find(|service| service.name == name)
}
