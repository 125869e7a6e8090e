use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Preferences, Product},
};

/// Inclusive price bounds taken from the `price_range` preference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBounds {
    /// Interprets a `price_range` value
    ///
    /// One element is a minimum, two or more are `[min, max]` (extra elements are
    /// ignored). Elements may be numbers or numeric strings. Returns `None` when
    /// the value is empty or malformed, which disables price filtering.
    pub fn parse(value: &Value) -> Option<Self> {
        let Value::Array(values) = value else {
            tracing::warn!(price_range = %value, "Invalid price range format, ignoring price filter");
            return None;
        };

        let bounds = match values.as_slice() {
            [] => return None,
            [min] => as_price(min).map(|min| Self {
                min: Some(min),
                max: None,
            }),
            [min, max, ..] => as_price(min).zip(as_price(max)).map(|(min, max)| Self {
                min: Some(min),
                max: Some(max),
            }),
        };

        if bounds.is_none() {
            tracing::warn!(price_range = %value, "Invalid price range format, ignoring price filter");
        }
        bounds
    }

    /// Products without a price are never excluded
    pub fn contains(&self, price: Option<f64>) -> bool {
        let Some(price) = price else {
            return true;
        };
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

fn as_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

/// Bidirectional prefix match on normalized categories
///
/// `wanted` must already be trimmed and lowercased.
pub fn category_matches(product: &Product, wanted: &[String]) -> bool {
    let category = product.normalized_category();
    wanted
        .iter()
        .any(|w| category.starts_with(w.as_str()) || w.starts_with(category.as_str()))
}

/// Narrows the catalog by the strict preferences (category, then price)
///
/// Returns `ServiceUnavailable` when a filter was applied and nothing survived;
/// with no filters the input is returned as-is.
pub fn filter_products<'a>(
    products: &'a [Product],
    preferences: &Preferences,
) -> AppResult<Vec<&'a Product>> {
    let categories = preferences.categories();
    let bounds = preferences.price_range().and_then(PriceBounds::parse);

    let mut candidates: Vec<&Product> = products.iter().collect();

    if let Some(wanted) = &categories {
        candidates.retain(|p| category_matches(p, wanted));
    }

    if let Some(bounds) = bounds {
        candidates.retain(|p| bounds.contains(p.price));
    }

    let filtered = categories.is_some() || bounds.is_some();
    if filtered && candidates.is_empty() {
        tracing::warn!(
            preferences = %preferences.to_pretty_json(),
            "Pre-filtering by category/price removed all products"
        );
        return Err(AppError::ServiceUnavailable(
            "No products found matching the specified category/price filters.".to_string(),
        ));
    }

    tracing::debug!(
        total = products.len(),
        candidates = candidates.len(),
        "Catalog pre-filtered"
    );

    Ok(candidates)
}
