//! Call-scoped provider credentials

mod credential;

pub use credential::Credentials;
