use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ListQuery, Product, ProductNew, ProductPatch, ResultEngine, products, sales,
};

use super::{
    Engine, normalize_required_name, require_non_negative_price, require_non_negative_quantity,
    with_tx,
};

const ORDERING_FIELDS: &[&str] = &["id", "name"];

impl Engine {
    /// Add a new product to the catalog.
    pub async fn create_product(&self, cmd: ProductNew) -> ResultEngine<Product> {
        let name = normalize_required_name(&cmd.name, "product name")?;
        require_non_negative_quantity(cmd.quantity)?;
        require_non_negative_price(cmd.price)?;

        let model = products::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(cmd.description),
            photo: ActiveValue::Set(cmd.photo),
            quantity: ActiveValue::Set(cmd.quantity),
            price_minor: ActiveValue::Set(cmd.price.minor()),
        }
        .insert(&self.database)
        .await?;

        tracing::debug!(product_id = model.id, "product created");
        Ok(model.into())
    }

    /// Return a product snapshot from DB.
    pub async fn product(&self, id: i32) -> ResultEngine<Product> {
        products::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Product::from)
            .ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))
    }

    /// List products, searching by name and ordering by `id` or `name`.
    pub async fn list_products(&self, query: &ListQuery) -> ResultEngine<Vec<Product>> {
        let (field, order) = query.resolve_ordering(ORDERING_FIELDS)?;
        let column = match field {
            "name" => products::Column::Name,
            _ => products::Column::Id,
        };

        let mut select = products::Entity::find();
        if let Some(term) = query.search_term() {
            select = select.filter(products::Column::Name.contains(term));
        }

        let models = select.order_by(column, order).all(&self.database).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    /// Apply a partial update to a product.
    ///
    /// Stock edits made here are not checked against recorded sales.
    pub async fn update_product(&self, id: i32, patch: ProductPatch) -> ResultEngine<Product> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "product name"))
            .transpose()?;
        if let Some(quantity) = patch.quantity {
            require_non_negative_quantity(quantity)?;
        }
        if let Some(price) = patch.price {
            require_non_negative_price(price)?;
        }

        if patch.is_empty() {
            return self.product(id).await;
        }

        with_tx!(self, |db_tx| {
            self.require_product(&db_tx, id).await?;

            let mut active = products::ActiveModel {
                id: ActiveValue::Unchanged(id),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(description) = patch.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(photo) = patch.photo {
                active.photo = ActiveValue::Set(photo);
            }
            if let Some(quantity) = patch.quantity {
                active.quantity = ActiveValue::Set(quantity);
            }
            if let Some(price) = patch.price {
                active.price_minor = ActiveValue::Set(price.minor());
            }

            let model = active.update(&db_tx).await?;
            Ok(Product::from(model))
        })
    }

    /// Delete a product.
    ///
    /// A product that still has recorded sales cannot be deleted: delete the
    /// sales first so stock and revenue are reversed.
    pub async fn delete_product(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_product(&db_tx, id).await?;

            let has_sales = sales::Entity::find()
                .filter(sales::Column::ProductId.eq(id))
                .one(&db_tx)
                .await?
                .is_some();
            if has_sales {
                return Err(EngineError::Conflict(
                    "product has recorded sales".to_string(),
                ));
            }

            products::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
