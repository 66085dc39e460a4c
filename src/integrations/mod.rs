//! External service integrations.

pub mod bureau_client {
    pub use crate::bureau_client::*;
}
