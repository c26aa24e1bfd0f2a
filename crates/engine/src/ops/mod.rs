use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};

use crate::{EngineError, Product, ResultEngine, RevenueReversal};

mod access;
mod companies;
mod products;
mod sales;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    revenue_reversal: RevenueReversal,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The policy used to take revenue back when a sale is deleted.
    pub fn revenue_reversal(&self) -> RevenueReversal {
        self.revenue_reversal
    }

    async fn require_product(&self, db: &DatabaseTransaction, id: i32) -> ResultEngine<Product> {
        crate::products::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Product::from)
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn require_non_negative_quantity(quantity: i64) -> ResultEngine<()> {
    if quantity < 0 {
        return Err(EngineError::InvalidQuantity(
            "quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn require_non_negative_price(price: crate::Money) -> ResultEngine<()> {
    if price.is_negative() {
        return Err(EngineError::InvalidAmount(
            "price must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    revenue_reversal: RevenueReversal,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Choose how deleted sales take revenue back (default: current price).
    pub fn revenue_reversal(mut self, policy: RevenueReversal) -> EngineBuilder {
        self.revenue_reversal = policy;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            revenue_reversal: self.revenue_reversal,
        })
    }
}
