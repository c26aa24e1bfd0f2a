use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    Company, CompanyFinancial, CompanyNew, CompanyPatch, EngineError, ListQuery, Money,
    ResultEngine, companies, companies::LEDGER_COMPANY_ID,
};

use super::{Engine, normalize_required_name, with_tx};

const ORDERING_FIELDS: &[&str] = &["id", "company_name"];

impl Engine {
    /// Add a company.
    pub async fn create_company(&self, cmd: CompanyNew) -> ResultEngine<Company> {
        let company_name = normalize_required_name(&cmd.company_name, "company name")?;

        let model = companies::ActiveModel {
            id: ActiveValue::NotSet,
            company_name: ActiveValue::Set(company_name),
            total_revenue_minor: ActiveValue::Set(cmd.total_revenue.minor()),
        }
        .insert(&self.database)
        .await?;

        tracing::debug!(company_id = model.id, "company created");
        Ok(model.into())
    }

    /// Create the ledger company unless it already exists.
    pub async fn create_ledger_company(&self, company_name: &str) -> ResultEngine<Company> {
        let company_name = normalize_required_name(company_name, "company name")?;

        with_tx!(self, |db_tx| {
            let exists = companies::Entity::find_by_id(LEDGER_COMPANY_ID)
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey("ledger company".to_string()));
            }

            let model = companies::ActiveModel {
                id: ActiveValue::Set(LEDGER_COMPANY_ID),
                company_name: ActiveValue::Set(company_name),
                total_revenue_minor: ActiveValue::Set(0),
            }
            .insert(&db_tx)
            .await?;
            Ok(Company::from(model))
        })
    }

    /// Return a company snapshot from DB.
    pub async fn company(&self, id: i32) -> ResultEngine<Company> {
        companies::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Company::from)
            .ok_or_else(|| EngineError::KeyNotFound("company not exists".to_string()))
    }

    /// Return the company that accumulates sales revenue.
    pub async fn ledger_company(&self) -> ResultEngine<Company> {
        self.company(LEDGER_COMPANY_ID).await
    }

    /// List companies, searching by name and ordering by `id` or `company_name`.
    pub async fn list_companies(&self, query: &ListQuery) -> ResultEngine<Vec<Company>> {
        let (field, order) = query.resolve_ordering(ORDERING_FIELDS)?;
        let column = match field {
            "company_name" => companies::Column::CompanyName,
            _ => companies::Column::Id,
        };

        let mut select = companies::Entity::find();
        if let Some(term) = query.search_term() {
            select = select.filter(companies::Column::CompanyName.contains(term));
        }

        let models = select.order_by(column, order).all(&self.database).await?;
        Ok(models.into_iter().map(Company::from).collect())
    }

    /// Revenue-only view of every company.
    pub async fn company_financials(&self) -> ResultEngine<Vec<CompanyFinancial>> {
        let companies = self.list_companies(&ListQuery::default()).await?;
        Ok(companies.iter().map(CompanyFinancial::from).collect())
    }

    /// Revenue-only view of one company.
    pub async fn company_financial(&self, id: i32) -> ResultEngine<CompanyFinancial> {
        let company = self.company(id).await?;
        Ok(CompanyFinancial::from(&company))
    }

    /// Apply a partial update to a company.
    ///
    /// Setting the revenue here is not reconciled with recorded sales.
    pub async fn update_company(&self, id: i32, patch: CompanyPatch) -> ResultEngine<Company> {
        let company_name = patch
            .company_name
            .as_deref()
            .map(|name| normalize_required_name(name, "company name"))
            .transpose()?;
        if company_name.is_none() && patch.total_revenue.is_none() {
            return self.company(id).await;
        }

        with_tx!(self, |db_tx| {
            companies::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("company not exists".to_string()))?;

            let mut active = companies::ActiveModel {
                id: ActiveValue::Unchanged(id),
                ..Default::default()
            };
            if let Some(company_name) = company_name {
                active.company_name = ActiveValue::Set(company_name);
            }
            if let Some(total_revenue) = patch.total_revenue {
                tracing::warn!(
                    company_id = id,
                    total_revenue = %total_revenue,
                    "total revenue set directly"
                );
                active.total_revenue_minor = ActiveValue::Set(total_revenue.minor());
            }

            let model = active.update(&db_tx).await?;
            Ok(Company::from(model))
        })
    }

    /// Delete a company.
    pub async fn delete_company(&self, id: i32) -> ResultEngine<()> {
        let result = companies::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("company not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_ledger_company(
        &self,
        db: &DatabaseTransaction,
    ) -> ResultEngine<Company> {
        companies::Entity::find_by_id(LEDGER_COMPANY_ID)
            .one(db)
            .await?
            .map(Company::from)
            .ok_or_else(|| EngineError::KeyNotFound("ledger company not exists".to_string()))
    }

    /// Add `amount` (negative to subtract) to the ledger company revenue.
    pub(super) async fn add_ledger_revenue(
        &self,
        db: &DatabaseTransaction,
        amount: Money,
    ) -> ResultEngine<()> {
        let result = companies::Entity::update_many()
            .col_expr(
                companies::Column::TotalRevenueMinor,
                Expr::col(companies::Column::TotalRevenueMinor).add(amount.minor()),
            )
            .filter(companies::Column::Id.eq(LEDGER_COMPANY_ID))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "ledger company not exists".to_string(),
            ));
        }
        Ok(())
    }
}
