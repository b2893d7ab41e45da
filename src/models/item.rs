use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::errors::{ApiException, Failure, FieldErrors};

/// A catalog item served by the demo endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: u32,
    pub name: String,
    /// Price in cents
    pub price: u32,
    /// Owning account, if the item has been claimed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Payload for creating an item
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
}

impl NewItem {
    /// Check required fields, collecting every violation
    pub fn validate(&self) -> Result<(String, u32), Failure> {
        let mut errors = FieldErrors::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            errors.add("name", "must not be blank");
        }
        if name.len() > 100 {
            errors.add("name", "size must be between 1 and 100");
        }

        let price = match self.price.map(u32::try_from) {
            Some(Ok(p)) if p > 0 => p,
            Some(_) => {
                errors.add("price", "must be greater than 0");
                0
            }
            None => {
                errors.add("price", "must not be null");
                0
            }
        };

        errors.into_result()?;
        Ok((name.to_string(), price))
    }
}

/// Lookup of an id that is not in the catalog
#[derive(Debug, Error)]
#[error("Item with id {0} was not found")]
pub struct ItemNotFound(pub u32);

impl ApiException for ItemNotFound {
    fn status(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
}

/// Deterministic sample catalog of `count` items
pub fn seed_catalog(count: u32) -> Vec<Item> {
    (1..=count)
        .map(|id| Item {
            id,
            name: format!("Item {id}"),
            price: 100 * id,
            owner: (id % 3 == 0).then(|| format!("account-{}", id / 3)),
        })
        .collect()
}
