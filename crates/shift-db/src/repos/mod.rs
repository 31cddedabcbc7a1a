//! Repository modules for all Shift entities.
//!
//! Each module exposes free functions over `&libsql::Connection`, so they
//! run the same on the plain connection and inside a
//! [`UnitOfWork`](crate::uow::UnitOfWork), plus read methods on
//! `ShiftService` via `impl ShiftService` blocks.

pub mod audit;
pub mod correction;
pub mod employee;
pub mod entry;
