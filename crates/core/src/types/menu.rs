//! Restaurant and menu reference data.
//!
//! These are read-only snapshots of backend rows, already validated at the
//! storefront's HTTP boundary. Nothing in the storefront mutates them.

use serde::{Deserialize, Serialize};

use super::id::{MenuItemId, RestaurantId};
use super::price::Price;

/// A restaurant listed on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub cuisine: Option<String>,
    pub address: Option<String>,
    pub owner_name: Option<String>,
    pub rating: Option<f64>,
}

impl Restaurant {
    /// The `{id, name}` pair a cart binds to.
    #[must_use]
    pub fn binding(&self) -> RestaurantRef {
        RestaurantRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Case-insensitive search used by the restaurant listing.
    ///
    /// An empty `query` matches everything; `cuisine` must match exactly
    /// (ignoring case) when given.
    #[must_use]
    pub fn matches(&self, query: Option<&str>, cuisine: Option<&str>) -> bool {
        let name_ok = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .is_none_or(|q| self.name.to_lowercase().contains(&q.to_lowercase()));

        let cuisine_ok = cuisine
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .is_none_or(|c| {
                self.cuisine
                    .as_deref()
                    .is_some_and(|own| own.eq_ignore_ascii_case(c))
            });

        name_ok && cuisine_ok
    }
}

/// Identity of the restaurant a cart is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestaurantRef {
    pub id: RestaurantId,
    pub name: String,
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(name: &str, cuisine: Option<&str>) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(1),
            name: name.to_string(),
            cuisine: cuisine.map(String::from),
            address: None,
            owner_name: None,
            rating: None,
        }
    }

    #[test]
    fn test_matches_name_substring_case_insensitive() {
        let r = restaurant("Luigi's Trattoria", Some("Italian"));
        assert!(r.matches(Some("trat"), None));
        assert!(r.matches(Some(""), None));
        assert!(r.matches(None, None));
        assert!(!r.matches(Some("sushi"), None));
    }

    #[test]
    fn test_matches_cuisine_filter() {
        let r = restaurant("Luigi's", Some("Italian"));
        assert!(r.matches(None, Some("italian")));
        assert!(r.matches(None, Some("All")));
        assert!(!r.matches(None, Some("Thai")));

        let unknown = restaurant("Mystery", None);
        assert!(!unknown.matches(None, Some("Thai")));
        assert!(unknown.matches(None, Some("all")));
    }
}
