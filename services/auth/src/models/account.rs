//! Accounts that can log in

use common::claims::Principal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Faculty;

/// Student login view
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub prn: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// A faculty member or a student resolved from login credentials
#[derive(Debug, Clone)]
pub enum Account {
    Faculty(Faculty),
    Student(StudentAccount),
}

impl Account {
    pub fn id(&self) -> Uuid {
        match self {
            Account::Faculty(f) => f.id,
            Account::Student(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Account::Faculty(f) => &f.name,
            Account::Student(s) => &s.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::Faculty(f) => &f.email,
            Account::Student(s) => &s.email,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Account::Faculty(f) => &f.password_hash,
            Account::Student(s) => &s.password_hash,
        }
    }

    pub fn principal(&self) -> Principal {
        match self {
            Account::Faculty(f) => Principal::Faculty {
                is_hod: f.is_hod,
                is_class_incharge: f.is_class_incharge,
            },
            Account::Student(s) => Principal::Student { prn: s.prn.clone() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_principal_carries_prn() {
        let account = Account::Student(StudentAccount {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@college.edu".into(),
            prn: "120A3043".into(),
            password_hash: "hash".into(),
        });
        assert_eq!(
            account.principal(),
            Principal::Student {
                prn: "120A3043".into()
            }
        );
        assert_eq!(account.principal().role_name(), "student");
        assert_eq!(account.password_hash(), "hash");
    }
}
