//! Faculty model and signup payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{validate_email, validate_password, validate_required};

/// Faculty entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Faculty {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_hod: bool,
    pub is_class_incharge: bool,
    pub is_valid: bool,
    pub department: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Faculty signup payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultySignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub is_hod: bool,
    pub is_class_incharge: bool,
    pub department: String,
}

impl FacultySignup {
    /// Check every field, reporting the first problem found
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_required(&self.name, "Name")?;
        validate_required(&self.phone, "Phone")?;
        validate_required(&self.department, "Department")?;
        Ok(())
    }
}

/// Login credentials, shared by faculty and students
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> FacultySignup {
        serde_json::from_value(serde_json::json!({
            "name": "R. Kulkarni",
            "email": "kulkarni@college.edu",
            "password": "secret12",
            "phone": "9800000000",
            "isHod": false,
            "isClassIncharge": true,
            "department": "Computer"
        }))
        .unwrap()
    }

    #[test]
    fn signup_accepts_camel_case_flags() {
        let signup = signup();
        assert!(signup.is_class_incharge);
        assert!(!signup.is_hod);
        assert!(signup.validate().is_ok());
    }

    #[test]
    fn signup_reports_missing_department() {
        let mut signup = signup();
        signup.department = String::new();
        assert_eq!(signup.validate(), Err("Department is required".to_string()));
    }

    #[test]
    fn login_requires_digit_in_password() {
        let creds = LoginCredentials {
            email: "kulkarni@college.edu".into(),
            password: "password".into(),
        };
        assert_eq!(
            creds.validate(),
            Err("Password must contain a number".to_string())
        );
    }
}
