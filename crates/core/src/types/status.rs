//! Checkout outcome as reported by the payment provider's redirect.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Route the payment page redirects to after a successful payment.
pub const PAYMENT_SUCCESS_ROUTE: &str = "/payment-success";

/// Route the payment page redirects to after a failed or abandoned payment.
pub const PAYMENT_FAILED_ROUTE: &str = "/payment-failed";

/// Result of a hosted-invoice payment.
///
/// Completion is only ever observed through the redirect target route;
/// there is no verified callback behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

impl PaymentOutcome {
    /// Map a redirect path (or full URL) onto an outcome.
    ///
    /// The whole path must equal one of the redirect routes; query strings,
    /// fragments, and a trailing slash are ignored. Returns `None` for any
    /// other route.
    #[must_use]
    pub fn from_route(route: &str) -> Option<Self> {
        let route = route.trim();
        // Drop "scheme://authority" from full URLs
        let path = match route.split_once("://") {
            Some((_, rest)) => rest
                .find('/')
                .and_then(|start| rest.get(start..))
                .unwrap_or_default(),
            None => route,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.strip_suffix('/').unwrap_or(path);

        match path {
            PAYMENT_SUCCESS_ROUTE => Some(Self::Succeeded),
            PAYMENT_FAILED_ROUTE => Some(Self::Failed),
            _ => None,
        }
    }

    /// The redirect route for this outcome.
    #[must_use]
    pub const fn route(&self) -> &'static str {
        match self {
            Self::Succeeded => PAYMENT_SUCCESS_ROUTE,
            Self::Failed => PAYMENT_FAILED_ROUTE,
        }
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Error returned when a route is not a payment redirect target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a payment redirect route")]
pub struct UnknownPaymentRoute(pub String);

impl FromStr for PaymentOutcome {
    type Err = UnknownPaymentRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_route(s).ok_or_else(|| UnknownPaymentRoute(s.to_string()))
    }
}
