pub mod identity;

pub use identity::{Authenticator, RepositoryAuthenticator, UserService};
