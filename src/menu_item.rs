use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reason a menu item could not be constructed
///
/// Each variant names the first constraint the input violated. The
/// `Display` text is safe to return to clients.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("id is required")]
    MissingId,
    #[error("id must be a positive integer, got {0}")]
    InvalidId(String),
    #[error("category is required")]
    MissingCategory,
    #[error("category must be one of APP, ENT, DES, got {0}")]
    UnknownCategory(String),
    #[error("description is required")]
    MissingDescription,
    #[error("description must be a non-empty string")]
    EmptyDescription,
    #[error("price is required")]
    MissingPrice,
    #[error("price must be a number, got {0}")]
    NonNumericPrice(String),
    #[error("price must not be negative, got {0}")]
    NegativePrice(f64),
    #[error("vegetarian is required")]
    MissingVegetarian,
    #[error("vegetarian must be a boolean, got {0}")]
    NonBooleanVegetarian(String),
}

/// Menu section an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Category {
    #[serde(rename = "APP")]
    Appetizer,
    #[serde(rename = "ENT")]
    Entree,
    #[serde(rename = "DES")]
    Dessert,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Appetizer => "APP",
            Category::Entree => "ENT",
            Category::Dessert => "DES",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APP" => Ok(Category::Appetizer),
            "ENT" => Ok(Category::Entree),
            "DES" => Ok(Category::Dessert),
            other => Err(ValidationError::UnknownCategory(format!("'{}'", other))),
        }
    }
}

/// A validated, immutable menu item
///
/// The only ways to obtain one are [`MenuItem::new`] and
/// [`MenuItem::try_from`] on raw fields, so every instance satisfies the
/// field rules. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(try_from = "RawMenuItem")]
pub struct MenuItem {
    id: u32,
    category: Category,
    description: String,
    price: f64,
    vegetarian: bool,
}

impl MenuItem {
    /// Build a menu item from already-typed fields
    pub fn new(
        id: u32,
        category: Category,
        description: impl Into<String>,
        price: f64,
        vegetarian: bool,
    ) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::InvalidId(id.to_string()));
        }

        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        if !price.is_finite() {
            return Err(ValidationError::NonNumericPrice(price.to_string()));
        }
        if price < 0.0 {
            return Err(ValidationError::NegativePrice(price));
        }

        Ok(Self {
            id,
            category,
            description,
            price,
            vegetarian,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn vegetarian(&self) -> bool {
        self.vegetarian
    }
}

/// Unvalidated menu item fields as they arrive in a request body
///
/// JSON `null` and an absent key both count as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMenuItem {
    pub id: Option<JsonValue>,
    pub category: Option<JsonValue>,
    pub description: Option<JsonValue>,
    pub price: Option<JsonValue>,
    pub vegetarian: Option<JsonValue>,
}

impl TryFrom<RawMenuItem> for MenuItem {
    type Error = ValidationError;

    fn try_from(raw: RawMenuItem) -> Result<Self, Self::Error> {
        let id = parse_id(raw.id.as_ref().ok_or(ValidationError::MissingId)?)?;

        let category = match raw.category.as_ref().ok_or(ValidationError::MissingCategory)? {
            JsonValue::String(s) => s.parse::<Category>()?,
            other => return Err(ValidationError::UnknownCategory(other.to_string())),
        };

        let description = match raw
            .description
            .ok_or(ValidationError::MissingDescription)?
        {
            JsonValue::String(s) => s,
            _ => return Err(ValidationError::EmptyDescription),
        };

        let price = match raw.price.as_ref().ok_or(ValidationError::MissingPrice)? {
            JsonValue::Number(n) => n
                .as_f64()
                .ok_or_else(|| ValidationError::NonNumericPrice(n.to_string()))?,
            other => return Err(ValidationError::NonNumericPrice(other.to_string())),
        };

        let vegetarian = match raw.vegetarian.as_ref().ok_or(ValidationError::MissingVegetarian)? {
            JsonValue::Bool(b) => *b,
            other => return Err(ValidationError::NonBooleanVegetarian(other.to_string())),
        };

        MenuItem::new(id, category, description, price, vegetarian)
    }
}

/// Parse an id given as an integer-valued JSON number or a string of ASCII digits
pub fn parse_id(value: &JsonValue) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidId(value.to_string());

    let id = match value {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| {
                // 42.0 names the same id as 42
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid)?,
        JsonValue::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse::<u32>().map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    if id == 0 {
        return Err(invalid());
    }
    Ok(id)
}
