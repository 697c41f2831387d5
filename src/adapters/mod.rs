//! Storage adapters for the [`StateRepository`](crate::ports::StateRepository) port.
//!
//! `MsgPackRepository` keeps the saved state in one MessagePack file and is
//! what the CLI uses. `InMemoryRepository` keeps the same encoded bytes in
//! memory for tests.

pub mod in_memory_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
