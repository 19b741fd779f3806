//! Password hashing for the env-file writer. Only one scheme (bcrypt) is
//! supported so every stored hash can be verified the same way.

pub mod passwords;
