pub mod credentials;
pub mod domain;
pub mod error;
pub mod guard;
pub mod notes;
pub mod password;
pub mod ports;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use credentials::CredentialStore;
pub use domain::{NewUser, Note, User, UserCredentials};
pub use error::{ServiceError, ServiceResult};
pub use guard::{Identity, OwnedResource, OwnershipEnforcer};
pub use notes::NoteManager;
pub use ports::{DatabaseService, PortError, PortResult, UniqueField};
pub use validation::{FieldError, LoginInput, NoteInput, RegisterInput};
