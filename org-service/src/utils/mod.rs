pub mod password;
pub mod validation;

pub use password::{Argon2Hasher, Password, PasswordHasher};
pub use validation::{normalize_email, normalize_org_name, validate_org_name, ValidatedJson};
