use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::Entity;

entity_id!(
    /// Identifier shared by every role; applicants and instructors are referenced by it.
    UserId
);

/// The three account kinds the service distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Applicant,
    Instructor,
    Employee,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Applicant => "applicant",
            UserRole::Instructor => "instructor",
            UserRole::Employee => "employee",
        }
    }

    /// Instructors and employees manage bootcamps and review applications.
    pub const fn is_staff(self) -> bool {
        matches!(self, UserRole::Instructor | UserRole::Employee)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    pub date_of_birth: NaiveDate,
    pub national_identity: String,
    pub about: String,
    /// Storage reference of the uploaded résumé, if one was provided.
    pub resume: Option<String>,
    pub blacklisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDetails {
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetails {
    pub position: String,
}

/// Role-specific payload carried next to the shared account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UserProfile {
    Applicant(ApplicantDetails),
    Instructor(InstructorDetails),
    Employee(EmployeeDetails),
}

impl UserProfile {
    pub const fn role(&self) -> UserRole {
        match self {
            UserProfile::Applicant(_) => UserRole::Applicant,
            UserProfile::Instructor(_) => UserRole::Instructor,
            UserProfile::Employee(_) => UserRole::Employee,
        }
    }
}

/// Stored account. The password hash never leaves the service layer; see [`UserView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const fn role(&self) -> UserRole {
        self.profile.role()
    }

    pub fn applicant(&self) -> Option<&ApplicantDetails> {
        match &self.profile {
            UserProfile::Applicant(details) => Some(details),
            _ => None,
        }
    }

    pub fn applicant_mut(&mut self) -> Option<&mut ApplicantDetails> {
        match &mut self.profile {
            UserProfile::Applicant(details) => Some(details),
            _ => None,
        }
    }

    pub fn is_blacklisted(&self) -> bool {
        self.applicant()
            .map(|details| details.blacklisted)
            .unwrap_or(false)
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            profile: self.profile.clone(),
            created_at: self.created_at,
        }
    }
}

impl Entity for User {
    type Id = UserId;
    const NAME: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }

    fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

/// Public-safe projection returned by registration and directory reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

/// Canonical form used for storage and uniqueness checks.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn applicant() -> User {
        User {
            id: UserId(7),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            profile: UserProfile::Applicant(ApplicantDetails {
                date_of_birth: NaiveDate::from_ymd_opt(1995, 12, 10).expect("valid"),
                national_identity: "12345678901".to_string(),
                about: "Career changer".to_string(),
                resume: None,
                blacklisted: false,
            }),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn view_flattens_role_payload_and_drops_hash() {
        let value = serde_json::to_value(applicant().view()).expect("serializes");

        assert_eq!(value["role"], json!("applicant"));
        assert_eq!(value["firstName"], json!("Ada"));
        assert_eq!(value["nationalIdentity"], json!("12345678901"));
        assert_eq!(value["blacklisted"], json!(false));
        assert!(value.get("passwordHash").is_none());
    }

    #[test]
    fn staff_roles_exclude_applicants() {
        assert!(UserRole::Employee.is_staff());
        assert!(UserRole::Instructor.is_staff());
        assert!(!UserRole::Applicant.is_staff());
    }

    #[test]
    fn emails_conflict_after_normalization() {
        let mut first = applicant();
        first.email = normalize_email("  Ada@Example.COM ");
        let second = applicant();
        assert!(first.conflicts_with(&second));
    }
}
