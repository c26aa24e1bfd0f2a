//! Request and response bodies of the HTTP API.
//!
//! Money amounts travel as integer minor units (`*_minor` fields, cents).

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Query string accepted by every list endpoint.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring matched against the resource search fields.
    pub search: Option<String>,
    /// Field to order by; prefix with `-` for descending order.
    pub ordering: Option<String>,
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub name: String,
        #[serde(default)]
        pub description: String,
        pub photo: Option<String>,
        pub quantity: i64,
        pub price_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProductPatch {
        pub name: Option<String>,
        pub description: Option<String>,
        pub photo: Option<String>,
        pub quantity: Option<i64>,
        pub price_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: i32,
        pub name: String,
        pub description: String,
        pub photo: Option<String>,
        pub quantity: i64,
        pub price_minor: i64,
    }
}

pub mod sale {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        /// Product id.
        pub product: i32,
        /// Must be > 0 and not exceed the product stock.
        pub quantity_sold: i64,
        /// Optional: if absent, server uses now().
        pub sale_date: Option<DateTime<FixedOffset>>,
    }

    /// Only the date of a sale can be corrected.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleUpdate {
        /// RFC3339 timestamp, including timezone offset.
        pub sale_date: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleView {
        pub id: i32,
        pub product: i32,
        pub quantity_sold: i64,
        pub sale_date: DateTime<Utc>,
        /// Product price when the sale was recorded.
        pub unit_price_minor: i64,
    }
}

pub mod company {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyNew {
        pub company_name: String,
        #[serde(default)]
        pub total_revenue_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CompanyPatch {
        pub company_name: Option<String>,
        /// Overwrites the accumulated revenue.
        pub total_revenue_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyView {
        pub id: i32,
        pub company_name: String,
        pub total_revenue_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanyFinancialView {
        pub id: i32,
        pub total_revenue_minor: i64,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        #[serde(default)]
        pub email: String,
        /// Write-only: never returned by the API.
        pub password: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserPatch {
        pub username: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub username: String,
        pub email: String,
        pub is_staff: bool,
    }
}
