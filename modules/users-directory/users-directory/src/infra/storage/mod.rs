//! Infrastructure storage layer.
//!
//! - `entity` - SeaORM entity for the `users` table
//! - `mapper` - conversions between SeaORM models and SDK types
//! - `migrations` - schema migrations, unique nickname and email
//! - `sea_orm_repo` - `UsersRepository` over a SeaORM connection
//! - `memory_repo` - `UsersRepository` kept in process memory

pub mod entity;
pub mod mapper;
pub mod memory_repo;
pub mod migrations;
pub mod sea_orm_repo;

pub use memory_repo::InMemoryUsersRepository;
pub use sea_orm_repo::SeaOrmUsersRepository;
