pub mod memory;

#[cfg(feature = "firebase")]
pub mod firebase;

pub use memory::{InMemoryIdentity, InMemoryPreferences};

#[cfg(feature = "firebase")]
pub use firebase::{FirebaseIdentity, FirestorePreferences, IdToken};
