//! The module contains `Company` struct and its sea-orm entity.
//!
//! One company is the ledger company: every sale adds its revenue to that
//! company's `total_revenue`. See [`Engine::ledger_company`].
//!
//! [`Engine::ledger_company`]: crate::Engine::ledger_company

use sea_orm::entity::prelude::*;

use crate::Money;

/// Identifier of the company that accumulates sales revenue.
pub(crate) const LEDGER_COMPANY_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Company {
    pub id: i32,
    pub company_name: String,
    pub total_revenue: Money,
}

impl Company {
    pub fn is_ledger(&self) -> bool {
        self.id == LEDGER_COMPANY_ID
    }
}

/// Revenue-only view of a company.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompanyFinancial {
    pub id: i32,
    pub total_revenue: Money,
}

impl From<&Company> for CompanyFinancial {
    fn from(value: &Company) -> Self {
        Self {
            id: value.id,
            total_revenue: value.total_revenue,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_name: String,
    pub total_revenue_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Company {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            company_name: value.company_name,
            total_revenue: Money::new(value.total_revenue_minor),
        }
    }
}
