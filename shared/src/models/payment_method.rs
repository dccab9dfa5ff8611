//! Payment method models

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Payment method type
///
/// Wire names match the web client ("Credit Card", "PayPal", "Google Pay").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethodKind {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Google Pay")]
    GooglePay,
}

/// Payment method entity
///
/// The detail field depends on the type: credit cards carry `last4`, the
/// account-based types carry `email`. Within any owning scope exactly one
/// method is primary whenever the set is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentMethodKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_primary: bool,
}

impl PaymentMethod {
    /// Canonical projection of the mutable fields, used to detect edits
    pub fn projection(&self) -> (PaymentMethodKind, Option<&str>, Option<&str>, bool) {
        (
            self.kind,
            self.last4.as_deref(),
            self.email.as_deref(),
            self.is_primary,
        )
    }
}

/// Client-edited payment method entry
///
/// Entries without an `id` are new; entries whose id is unknown to the
/// server are also treated as new.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: PaymentMethodKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_primary: bool,
}

impl PaymentMethodDraft {
    /// Validate that the detail field matches the type
    pub fn validate(&self) -> Result<(), AppError> {
        match self.kind {
            PaymentMethodKind::CreditCard => {
                let last4 = self.last4.as_deref().unwrap_or_default();
                if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AppError::with_message(
                        ErrorCode::PaymentMethodInvalid,
                        "Credit card methods require the last 4 digits",
                    ));
                }
            }
            PaymentMethodKind::PayPal | PaymentMethodKind::GooglePay => {
                let email = self.email.as_deref().unwrap_or_default();
                if !email.contains('@') {
                    return Err(AppError::with_message(
                        ErrorCode::PaymentMethodInvalid,
                        "Account-based methods require an email address",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Canonical projection of the mutable fields
    pub fn projection(&self) -> (PaymentMethodKind, Option<&str>, Option<&str>, bool) {
        (
            self.kind,
            self.last4.as_deref(),
            self.email.as_deref(),
            self.is_primary,
        )
    }

    /// Materialize into a stored method under the given id
    pub fn into_method(self, id: String) -> PaymentMethod {
        PaymentMethod {
            id,
            kind: self.kind,
            last4: self.last4,
            email: self.email,
            is_primary: self.is_primary,
        }
    }
}

impl From<PaymentMethod> for PaymentMethodDraft {
    fn from(method: PaymentMethod) -> Self {
        Self {
            id: Some(method.id),
            kind: method.kind,
            last4: method.last4,
            email: method.email,
            is_primary: method.is_primary,
        }
    }
}
