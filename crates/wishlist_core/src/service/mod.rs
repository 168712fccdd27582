//! Use-case services over the wishlist store.
//!
//! # Responsibility
//! - Own transaction boundaries for seeding, refresh reads and toggling.
//! - Compose repositories inside those transactions.
//!
//! # Invariants
//! - Services require a `Ready` store; they never create schema.
//! - Each mutating use-case runs in exactly one `BEGIN IMMEDIATE` transaction.

pub mod membership_service;
pub mod query_service;
pub mod seed_service;
