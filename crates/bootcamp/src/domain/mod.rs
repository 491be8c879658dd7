//! Entities persisted by the repository layer and the value types that travel with them.

/// Declares a numeric identifier newtype that serializes as a bare integer.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub mod applications;
pub mod blacklist;
pub mod bootcamps;
pub mod users;

pub use applications::{Application, ApplicationId, ApplicationState};
pub use blacklist::{BlacklistEntry, BlacklistEntryId};
pub use bootcamps::{Bootcamp, BootcampDraft, BootcampId, BootcampState};
pub use users::{
    normalize_email, ApplicantDetails, EmployeeDetails, InstructorDetails, User, UserId,
    UserProfile, UserRole, UserView,
};
