//! Function naming conventions shared by the resolver and the locator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The service and stage a deployment targets.
///
/// Every deployed function name and every logical id the framework compiles
/// is derived from these two values plus the function identifier.
///
/// # Example
///
/// ```
/// use lambda_logging_types::ServiceTarget;
///
/// let target = ServiceTarget::new("orders", "prod");
/// assert_eq!(target.display_name("list_orders", None), "orders-prod-list_orders");
/// assert_eq!(target.display_name("list_orders", Some("orders-api")), "orders-api");
/// assert_eq!(ServiceTarget::logical_function_id("list-orders"), "ListDashordersLambdaFunction");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceTarget {
    /// Service name
    pub service: String,
    /// Stage name
    pub stage: String,
}

impl ServiceTarget {
    /// Create a new target.
    pub fn new(service: impl Into<String>, stage: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            stage: stage.into(),
        }
    }

    /// Deployed name of a function: the explicit name when one is declared,
    /// otherwise `<service>-<stage>-<function_id>`.
    pub fn display_name(&self, function_id: &str, explicit: Option<&str>) -> String {
        match explicit.filter(|name| !name.trim().is_empty()) {
            Some(name) => name.to_string(),
            None => format!("{}-{}-{}", self.service, self.stage, function_id),
        }
    }

    /// Function identifier normalized the way the framework builds logical ids:
    /// first letter uppercased, `-` spelled `Dash`, `_` spelled `Underscore`.
    pub fn normalized_function_name(function_id: &str) -> String {
        let mut chars = function_id.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        capitalized.replace('-', "Dash").replace('_', "Underscore")
    }

    /// Logical id the framework compiles a function to.
    pub fn logical_function_id(function_id: &str) -> String {
        format!("{}LambdaFunction", Self::normalized_function_name(function_id))
    }

    /// Short logical id form, `<function_id>Function`.
    pub fn short_function_id(function_id: &str) -> String {
        format!("{}Function", function_id)
    }
}

impl fmt::Display for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.service, self.stage)
    }
}
