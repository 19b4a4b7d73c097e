//! Caching decorators for the repository ports.

pub mod cached_item_repository;

pub use cached_item_repository::CachedItemRepository;
