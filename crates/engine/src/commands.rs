//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. `*Patch` commands carry only the
//! fields to change; `None` leaves the stored value untouched.

use chrono::{DateTime, Utc};

use crate::Money;

/// Create a product.
#[derive(Clone, Debug)]
pub struct ProductNew {
    pub name: String,
    pub description: String,
    pub photo: Option<String>,
    pub quantity: i64,
    pub price: Money,
}

impl ProductNew {
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: i64, price: Money) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            photo: None,
            quantity,
            price,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

/// Change a product.
#[derive(Clone, Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the photo.
    pub photo: Option<Option<String>>,
    pub quantity: Option<i64>,
    pub price: Option<Money>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.photo.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }
}

/// Record a sale.
#[derive(Clone, Debug)]
pub struct SaleNew {
    pub product_id: i32,
    pub quantity_sold: i64,
    pub sale_date: DateTime<Utc>,
}

impl SaleNew {
    #[must_use]
    pub fn new(product_id: i32, quantity_sold: i64) -> Self {
        Self {
            product_id,
            quantity_sold,
            sale_date: Utc::now(),
        }
    }

    #[must_use]
    pub fn sale_date(mut self, sale_date: DateTime<Utc>) -> Self {
        self.sale_date = sale_date;
        self
    }
}

/// Create a company.
#[derive(Clone, Debug)]
pub struct CompanyNew {
    pub company_name: String,
    pub total_revenue: Money,
}

impl CompanyNew {
    #[must_use]
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            total_revenue: Money::ZERO,
        }
    }
}

/// Change a company.
///
/// Setting `total_revenue` directly is allowed but bypasses the sale history.
#[derive(Clone, Debug, Default)]
pub struct CompanyPatch {
    pub company_name: Option<String>,
    pub total_revenue: Option<Money>,
}

/// Create a user.
#[derive(Clone, Debug)]
pub struct UserNew {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_staff: bool,
}

impl UserNew {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            is_staff: false,
        }
    }

    #[must_use]
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}

/// Change a user. A new password is hashed before storage.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
