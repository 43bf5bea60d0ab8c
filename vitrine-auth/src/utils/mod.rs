pub mod password;
pub mod validation;

pub use password::{hash_password, HashVerifier, PasswordVerifier};
pub use validation::ValidatedJson;
