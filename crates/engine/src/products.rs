//! The module contains `Product` struct and its sea-orm entity.

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::Money;

/// A product kept in stock.
///
/// `quantity` is the number of units currently available. Every recorded
/// [`Sale`](crate::Sale) has already been deducted from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Opaque reference to the product picture (path, URL or blob key).
    pub photo: Option<String>,
    pub quantity: i64,
    pub price: Money,
}

impl Product {
    /// Returns `true` if `quantity` units can be taken from the current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.quantity
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub photo: Option<String>,
    pub quantity: i64,
    pub price_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            photo: value.photo,
            quantity: value.quantity,
            price: Money::new(value.price_minor),
        }
    }
}

impl From<&Product> for ActiveModel {
    fn from(value: &Product) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            photo: ActiveValue::Set(value.photo.clone()),
            quantity: ActiveValue::Set(value.quantity),
            price_minor: ActiveValue::Set(value.price.minor()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model {
            id: 7,
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            photo: None,
            quantity: 10,
            price_minor: 500,
        }
    }

    #[test]
    fn model_into_product() {
        let product = Product::from(model());

        assert_eq!(product.id, 7);
        assert_eq!(product.price, Money::new(500));
        assert_eq!(product.quantity, 10);
    }

    #[test]
    fn can_sell_up_to_stock() {
        let product = Product::from(model());

        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
    }
}
