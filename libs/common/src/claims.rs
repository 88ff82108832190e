//! Access token claims shared by the token issuer and the token verifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a token was issued to
///
/// Faculty carry their role flags; students carry their registration number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Principal {
    #[serde(rename_all = "camelCase")]
    Faculty { is_hod: bool, is_class_incharge: bool },
    Student { prn: String },
}

impl Principal {
    /// Role name reported to clients at login
    pub fn role_name(&self) -> &'static str {
        match self {
            Principal::Faculty { is_hod: true, .. } => "hod",
            Principal::Faculty {
                is_class_incharge: true,
                ..
            } => "classIncharge",
            Principal::Faculty { .. } => "faculty",
            Principal::Student { .. } => "student",
        }
    }

    pub fn is_faculty(&self) -> bool {
        matches!(self, Principal::Faculty { .. })
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Principal::Student { .. })
    }

    pub fn is_hod(&self) -> bool {
        matches!(self, Principal::Faculty { is_hod: true, .. })
    }

    pub fn is_class_incharge(&self) -> bool {
        matches!(
            self,
            Principal::Faculty {
                is_class_incharge: true,
                ..
            }
        )
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Faculty or student ID
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub principal: Principal,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl Claims {
    /// Seconds left before the token expires, saturating at zero
    pub fn remaining_lifetime(&self, now: u64) -> u64 {
        self.exp.saturating_sub(now)
    }
}
