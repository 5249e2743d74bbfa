pub mod password;

pub use password::{AuthService, Blake3Passwords, PasswordHash};
