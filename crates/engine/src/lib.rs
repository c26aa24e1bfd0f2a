//! Storekeep engine.
//!
//! The engine owns the database and is the only place where products, sales,
//! companies and users are written. Recording or deleting a [`Sale`] keeps the
//! product stock and the ledger company revenue in step with it, inside one
//! database transaction.

pub use commands::{
    CompanyNew, CompanyPatch, ProductNew, ProductPatch, SaleNew, UserNew, UserPatch,
};
pub use companies::{Company, CompanyFinancial};
pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use products::Product;
pub use query::ListQuery;
pub use sales::{RevenueReversal, Sale};
pub use users::User;

mod commands;
mod companies;
mod error;
mod money;
mod ops;
mod products;
mod query;
mod sales;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
