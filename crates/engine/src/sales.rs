//! The module contains `Sale` struct, its sea-orm entity and the policy used
//! to reverse revenue when a sale is deleted.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Deserialize;

use crate::{Money, ResultEngine};

/// A recorded sale of one product.
///
/// A sale never changes product or quantity once created; deleting it returns
/// the stock and reverses the revenue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sale {
    pub id: i32,
    pub product_id: i32,
    pub quantity_sold: i64,
    pub sale_date: DateTime<Utc>,
    /// Product price when the sale was recorded.
    pub unit_price: Money,
}

impl Sale {
    /// Revenue this sale added to the ledger.
    pub fn revenue(&self) -> ResultEngine<Money> {
        self.unit_price.line_total(self.quantity_sold)
    }
}

/// Which unit price is used to take revenue back when a sale is deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueReversal {
    /// The product price at deletion time. If the price changed after the
    /// sale, the ledger does not go back to its previous value.
    #[default]
    CurrentPrice,
    /// The price recorded on the sale.
    SalePrice,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub quantity_sold: i64,
    pub sale_date: DateTime<Utc>,
    pub unit_price_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sale {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            quantity_sold: value.quantity_sold,
            sale_date: value.sale_date,
            unit_price: Money::new(value.unit_price_minor),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn revenue_is_quantity_times_unit_price() {
        let sale = Sale::from(Model {
            id: 1,
            product_id: 1,
            quantity_sold: 3,
            sale_date: Utc.timestamp_opt(0, 0).unwrap(),
            unit_price_minor: 500,
        });

        assert_eq!(sale.revenue().unwrap(), Money::new(1500));
    }

    #[test]
    fn reversal_policy_parses_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: RevenueReversal,
        }

        let parsed: Wrapper = serde_json::from_str(r#"{"policy":"sale_price"}"#).unwrap();
        assert_eq!(parsed.policy, RevenueReversal::SalePrice);
        assert_eq!(RevenueReversal::default(), RevenueReversal::CurrentPrice);
    }
}
