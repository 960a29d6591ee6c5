#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Shared relational data-access layer over `SeaORM`.
//!
//! Unrelated entity types get one implementation of filtering, pagination
//! and CRUD by implementing a single trait ([`EntityBase`]): a string
//! primary key carrying a type-tagged generated id, a [`FieldMap`] naming
//! the filterable columns, and optional relation hooks. On top of that the
//! crate provides:
//!
//! - [`filter`]: declarative [`Where`] clauses compiled to `Condition`s,
//!   validated against the field map before any I/O
//! - [`select`]: deferred-join pagination (page over a key-only subquery,
//!   join full rows back on the primary key)
//! - [`ops`]: the unified CRUD operation set (`exists`/`count`/`get`/
//!   `select`/`insert`/`save`/`upsert`/`update_*`/`delete_*`)
//! - [`violation`]: translation of engine constraint diagnostics into the
//!   typed [`DataError`] taxonomy
//! - [`db`]: connection handle with a commit-on-Ok/rollback-on-Err
//!   transaction runner; [`blocking`]: a thin synchronous facade
//!
//! HTTP schemas, route handlers and migrations live with the consumers;
//! this crate only owns the data-access semantics.
//!
//! # Features
//! - `sqlite` (default), `pg`, `mysql`: enable the `SeaORM` backends

pub mod blocking;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod fields;
pub mod filter;
pub mod ident;
pub mod ops;
pub mod select;
pub mod violation;

pub use blocking::BlockingDb;
pub use config::{DbConfig, Limits};
pub use db::Db;
pub use entity::{EntityBase, EntityInfo, EntityRegistry};
pub use error::{DataError, Result};
pub use fields::{FieldKind, FieldMap};
pub use filter::{FilterOp, FilterValue, Where, build_condition};
pub use ident::gen_unique_id;
pub use ops::{ChangeSet, ExecMode, WarnMode};
pub use select::{Page, build_select};

pub use sea_orm::ConnectionTrait as DbConnTrait;
