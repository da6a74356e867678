pub mod message_builder;
pub mod push_provider;
pub mod token_store;

pub use message_builder::*;
pub use push_provider::*;
pub use token_store::*;
