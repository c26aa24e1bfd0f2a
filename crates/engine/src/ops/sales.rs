use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, ListQuery, ResultEngine, RevenueReversal, Sale, SaleNew, products, sales,
};

use super::{Engine, with_tx};

const ORDERING_FIELDS: &[&str] = &["id", "product"];

impl Engine {
    /// Record a sale.
    ///
    /// In a single DB transaction this:
    /// - checks the product has at least `quantity_sold` units in stock
    /// - takes the units from the product stock
    /// - adds `quantity_sold * price` to the ledger company revenue
    /// - stores the sale with the current product price
    ///
    /// An oversell is rejected with [`EngineError::InsufficientStock`] and
    /// leaves nothing behind.
    pub async fn create_sale(&self, cmd: SaleNew) -> ResultEngine<Sale> {
        if cmd.quantity_sold <= 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity_sold must be positive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let product = self.require_product(&db_tx, cmd.product_id).await?;
            let company = self.require_ledger_company(&db_tx).await?;

            if !product.can_sell(cmd.quantity_sold) {
                tracing::warn!(
                    product_id = product.id,
                    requested = cmd.quantity_sold,
                    available = product.quantity,
                    "sale rejected: insufficient stock"
                );
                return Err(EngineError::InsufficientStock(format!(
                    "requested {}, available {}",
                    cmd.quantity_sold, product.quantity
                )));
            }

            let revenue = product.price.line_total(cmd.quantity_sold)?;
            company
                .total_revenue
                .checked_add(revenue)
                .ok_or_else(|| EngineError::InvalidAmount("total revenue overflows".to_string()))?;

            // The stock check above ran on a snapshot; the conditional update is
            // what actually guards against a concurrent sale of the same units.
            let taken = products::Entity::update_many()
                .col_expr(
                    products::Column::Quantity,
                    Expr::col(products::Column::Quantity).sub(cmd.quantity_sold),
                )
                .filter(products::Column::Id.eq(product.id))
                .filter(products::Column::Quantity.gte(cmd.quantity_sold))
                .exec(&db_tx)
                .await?;
            if taken.rows_affected == 0 {
                return Err(EngineError::InsufficientStock(
                    "stock changed while recording the sale".to_string(),
                ));
            }

            self.add_ledger_revenue(&db_tx, revenue).await?;

            let model = sales::ActiveModel {
                id: ActiveValue::NotSet,
                product_id: ActiveValue::Set(product.id),
                quantity_sold: ActiveValue::Set(cmd.quantity_sold),
                sale_date: ActiveValue::Set(cmd.sale_date),
                unit_price_minor: ActiveValue::Set(product.price.minor()),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(
                sale_id = model.id,
                product_id = product.id,
                quantity_sold = cmd.quantity_sold,
                revenue = %revenue,
                "sale recorded"
            );
            Ok(Sale::from(model))
        })
    }

    /// Return a sale snapshot from DB.
    pub async fn sale(&self, id: i32) -> ResultEngine<Sale> {
        sales::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Sale::from)
            .ok_or_else(|| EngineError::KeyNotFound("sale not exists".to_string()))
    }

    /// List sales.
    ///
    /// A numeric search term matches the product id, anything else a prefix
    /// of the sale date (e.g. `2026-10`). Ordering fields: `id`, `product`.
    pub async fn list_sales(&self, query: &ListQuery) -> ResultEngine<Vec<Sale>> {
        let (field, order) = query.resolve_ordering(ORDERING_FIELDS)?;
        let column = match field {
            "product" => sales::Column::ProductId,
            _ => sales::Column::Id,
        };

        let mut select = sales::Entity::find();
        if let Some(term) = query.search_term() {
            select = match term.parse::<i32>() {
                Ok(product_id) => select.filter(sales::Column::ProductId.eq(product_id)),
                Err(_) => select.filter(sales::Column::SaleDate.starts_with(term)),
            };
        }

        let models = select.order_by(column, order).all(&self.database).await?;
        Ok(models.into_iter().map(Sale::from).collect())
    }

    /// Correct the date of a sale.
    ///
    /// Product and quantity of a sale cannot change; delete and record it
    /// again instead.
    pub async fn update_sale(&self, id: i32, sale_date: DateTime<Utc>) -> ResultEngine<Sale> {
        with_tx!(self, |db_tx| {
            sales::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("sale not exists".to_string()))?;

            let model = sales::ActiveModel {
                id: ActiveValue::Unchanged(id),
                sale_date: ActiveValue::Set(sale_date),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(Sale::from(model))
        })
    }

    /// Delete a sale.
    ///
    /// In a single DB transaction this:
    /// - gives `quantity_sold` units back to the product stock
    /// - subtracts `quantity_sold * price` from the ledger company revenue,
    ///   where the price depends on [`RevenueReversal`]
    /// - removes the sale row
    pub async fn delete_sale(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let sale = sales::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .map(Sale::from)
                .ok_or_else(|| EngineError::KeyNotFound("sale not exists".to_string()))?;
            let product = self.require_product(&db_tx, sale.product_id).await?;
            self.require_ledger_company(&db_tx).await?;

            let revenue = match self.revenue_reversal {
                RevenueReversal::CurrentPrice => product.price.line_total(sale.quantity_sold)?,
                RevenueReversal::SalePrice => sale.revenue()?,
            };

            products::Entity::update_many()
                .col_expr(
                    products::Column::Quantity,
                    Expr::col(products::Column::Quantity).add(sale.quantity_sold),
                )
                .filter(products::Column::Id.eq(product.id))
                .exec(&db_tx)
                .await?;

            self.add_ledger_revenue(&db_tx, -revenue).await?;

            sales::Entity::delete_by_id(id).exec(&db_tx).await?;

            tracing::info!(
                sale_id = id,
                product_id = product.id,
                quantity_sold = sale.quantity_sold,
                revenue = %revenue,
                "sale deleted"
            );
            Ok(())
        })
    }
}
