use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, ListQuery, ResultEngine, User, UserNew, UserPatch, users,
    users::{hash_password, verify_password},
};

use super::{Engine, normalize_required_name, with_tx};

const ORDERING_FIELDS: &[&str] = &["id", "username"];

impl Engine {
    /// Add a user. The password is hashed before it is stored.
    pub async fn create_user(&self, cmd: UserNew) -> ResultEngine<User> {
        let username = normalize_required_name(&cmd.username, "username")?;
        if cmd.password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let password = hash_password(&cmd.password)?;

        with_tx!(self, |db_tx| {
            self.require_free_username(&db_tx, &username, None).await?;

            let model = users::ActiveModel {
                id: ActiveValue::NotSet,
                username: ActiveValue::Set(username),
                email: ActiveValue::Set(cmd.email.trim().to_string()),
                password: ActiveValue::Set(password),
                is_staff: ActiveValue::Set(cmd.is_staff),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(user_id = model.id, "user created");
            Ok(User::from(model))
        })
    }

    /// Return a user from DB.
    pub async fn user(&self, id: i32) -> ResultEngine<User> {
        users::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// List users, searching username and email.
    pub async fn list_users(&self, query: &ListQuery) -> ResultEngine<Vec<User>> {
        let (field, order) = query.resolve_ordering(ORDERING_FIELDS)?;
        let column = match field {
            "username" => users::Column::Username,
            _ => users::Column::Id,
        };

        let mut select = users::Entity::find();
        if let Some(term) = query.search_term() {
            select = select.filter(
                Condition::any()
                    .add(users::Column::Username.contains(term))
                    .add(users::Column::Email.contains(term)),
            );
        }

        let models = select.order_by(column, order).all(&self.database).await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    /// Apply a partial update to a user.
    pub async fn update_user(&self, id: i32, patch: UserPatch) -> ResultEngine<User> {
        let username = patch
            .username
            .as_deref()
            .map(|name| normalize_required_name(name, "username"))
            .transpose()?;
        let password = match patch.password.as_deref() {
            Some("") => {
                return Err(EngineError::InvalidInput(
                    "password must not be empty".to_string(),
                ));
            }
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        if username.is_none() && patch.email.is_none() && password.is_none() {
            return self.user(id).await;
        }

        with_tx!(self, |db_tx| {
            users::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut active = users::ActiveModel {
                id: ActiveValue::Unchanged(id),
                ..Default::default()
            };
            if let Some(username) = username {
                self.require_free_username(&db_tx, &username, Some(id))
                    .await?;
                active.username = ActiveValue::Set(username);
            }
            if let Some(email) = patch.email {
                active.email = ActiveValue::Set(email.trim().to_string());
            }
            if let Some(password) = password {
                active.password = ActiveValue::Set(password);
            }

            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: i32) -> ResultEngine<()> {
        let result = users::Entity::delete_by_id(id).exec(&self.database).await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    /// Check basic credentials. Returns `None` when the username is unknown or
    /// the password does not match.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?;

        Ok(model
            .filter(|model| verify_password(password, &model.password))
            .map(User::from))
    }

    async fn require_free_username(
        &self,
        db: &sea_orm::DatabaseTransaction,
        username: &str,
        except_id: Option<i32>,
    ) -> ResultEngine<()> {
        let mut select = users::Entity::find().filter(users::Column::Username.eq(username));
        if let Some(id) = except_id {
            select = select.filter(users::Column::Id.ne(id));
        }
        if select.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(username.to_string()));
        }
        Ok(())
    }
}
