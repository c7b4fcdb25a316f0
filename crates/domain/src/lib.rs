pub mod entities;
pub mod repository;
#[cfg(feature = "testing")]
pub mod mem;

pub use entities::*;
pub use repository::{DomainRepository, RepositoryError};
