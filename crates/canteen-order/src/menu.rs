// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu loading.
//!
//! The menu is a JSON array of `{id, name, description?, price}` read from
//! a URL or a local file. Malformed entries are dropped; if the document
//! cannot be used at all the built-in menu is served instead, so the shop
//! can always take orders.

use std::fmt;
use std::time::Duration;

use canteen_core::CanteenError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A menu item identifier. Menus in the wild use both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl ItemId {
    /// Loose comparison against user input: `"3"` matches both `3` and `"3"`.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        match self {
            ItemId::Number(n) => query.parse::<i64>().is_ok_and(|q| q == *n),
            ItemId::Text(s) => s == query,
        }
    }

    /// Same item, ignoring whether either side was stored as text.
    pub fn same_as(&self, other: &ItemId) -> bool {
        self.matches(&other.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
}

impl MenuItem {
    pub fn new(id: impl Into<ItemId>, name: &str, description: Option<&str>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            description: description.map(str::to_string),
            price,
        }
    }
}

/// Where the served menu came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOrigin {
    Source,
    BuiltIn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    items: Vec<MenuItem>,
    origin: MenuOrigin,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            origin: MenuOrigin::Source,
        }
    }

    /// The five-item menu served when the configured source is unusable.
    pub fn built_in() -> Self {
        Self {
            items: vec![
                MenuItem::new(1, "Maggie Noodles", Some("52gm pack"), 12.0),
                MenuItem::new(2, "Maggie Noodles", Some("70gm pack"), 17.0),
                MenuItem::new(
                    3,
                    "BourBon",
                    Some(
                        "Double-layered chocolate cream biscuits – crunchy outside, creamy inside. \
                         Perfect late-night munch.",
                    ),
                    35.0,
                ),
                MenuItem::new(
                    4,
                    "Nice Time",
                    Some(
                        "Light, crispy coconut-flavored biscuits with sugar crystals on top. \
                         Sweet and simple, ekdum mood fresh.",
                    ),
                    15.0,
                ),
                MenuItem::new(
                    5,
                    "Coffee",
                    Some(
                        "Quick-fix strong coffee sachet – bas garam paani daalo aur jag jao. \
                         Budget-friendly caffeine boost.",
                    ),
                    3.0,
                ),
            ],
            origin: MenuOrigin::BuiltIn,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn origin(&self) -> MenuOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds an item by id, accepting `"3"` for a numeric id 3.
    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id.matches(id))
    }
}

/// Loads the menu from `source`, falling back to [`Menu::built_in`].
///
/// `source` starting with `http://` or `https://` is fetched; anything
/// else is read as a file path.
pub async fn load_menu(source: &str) -> Menu {
    match fetch_document(source).await.and_then(parse_menu) {
        Ok(items) => {
            info!(source, count = items.len(), "menu loaded");
            Menu::new(items)
        }
        Err(e) => {
            warn!(source, error = %e, "failed to load menu, using built-in items");
            Menu::built_in()
        }
    }
}

async fn fetch_document(source: &str) -> Result<Value, CanteenError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source).await
    } else {
        debug!(path = source, "reading menu file");
        let text = tokio::fs::read_to_string(source)
            .await
            .map_err(|e| menu_error(format!("cannot read {source}: {e}"), e))?;
        serde_json::from_str(&text).map_err(|e| menu_error(format!("invalid JSON in {source}: {e}"), e))
    }
}

async fn fetch_remote(url: &str) -> Result<Value, CanteenError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| menu_error(format!("failed to build HTTP client: {e}"), e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| menu_error(format!("menu request failed: {e}"), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CanteenError::Menu {
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ),
            source: None,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| menu_error(format!("invalid menu JSON: {e}"), e))
}

/// Keeps the well-formed entries of a menu document.
///
/// An entry needs an `id`, a non-empty `name` and a numeric `price`.
/// Fails if the document is not a non-empty array or nothing survives.
pub fn parse_menu(document: Value) -> Result<Vec<MenuItem>, CanteenError> {
    let entries = match document {
        Value::Array(entries) if !entries.is_empty() => entries,
        _ => {
            return Err(CanteenError::Menu {
                message: "menu must be a non-empty JSON array".into(),
                source: None,
            });
        }
    };

    let total = entries.len();
    let items: Vec<MenuItem> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<MenuItem>(entry).ok())
        .filter(|item| !item.name.is_empty() && item.price.is_finite())
        .collect();

    if items.len() != total {
        warn!(dropped = total - items.len(), "invalid menu items filtered out");
    }
    if items.is_empty() {
        return Err(CanteenError::Menu {
            message: "menu has no valid items".into(),
            source: None,
        });
    }
    Ok(items)
}

fn menu_error(message: String, source: impl std::error::Error + Send + Sync + 'static) -> CanteenError {
    CanteenError::Menu {
        message,
        source: Some(Box::new(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_match_loosely() {
        assert!(ItemId::Number(3).matches("3"));
        assert!(ItemId::Number(3).matches(" 3 "));
        assert!(!ItemId::Number(3).matches("03x"));
        assert!(ItemId::Text("7".into()).matches("7"));
        assert!(ItemId::Text("7".into()).same_as(&ItemId::Number(7)));
        assert!(ItemId::Number(7).same_as(&ItemId::Text("7".into())));
    }

    #[test]
    fn built_in_menu_has_five_items() {
        let menu = Menu::built_in();
        assert_eq!(menu.len(), 5);
        assert_eq!(menu.origin(), MenuOrigin::BuiltIn);
        let prices: Vec<f64> = menu.items().iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![12.0, 17.0, 35.0, 15.0, 3.0]);
        assert_eq!(menu.find("5").map(|i| i.name.as_str()), Some("Coffee"));
        assert!(menu.find("6").is_none());
    }

    #[test]
    fn built_in_descriptions_are_complete() {
        let menu = Menu::built_in();
        let description = |id: &str| {
            menu.find(id)
                .and_then(|i| i.description.clone())
                .unwrap_or_default()
        };
        assert_eq!(
            description("3"),
            "Double-layered chocolate cream biscuits – crunchy outside, creamy inside. \
             Perfect late-night munch."
        );
        assert!(description("4").ends_with("Sweet and simple, ekdum mood fresh."));
        assert!(description("5").starts_with("Quick-fix strong coffee sachet – bas garam paani"));
        assert!(description("5").ends_with("Budget-friendly caffeine boost."));
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let document = json!([
            {"id": 1, "name": "Chai", "price": 10},
            {"id": "two", "name": "Samosa", "description": "Aloo", "price": 15.5},
            {"name": "No id", "price": 5},
            {"id": 4, "name": "", "price": 5},
            {"id": 5, "name": "Free lunch", "price": "0"},
            null,
        ]);
        let items = parse_menu(document).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, ItemId::Text("two".into()));
        assert_eq!(items[1].description.as_deref(), Some("Aloo"));
    }

    #[test]
    fn unusable_documents_are_rejected() {
        assert!(parse_menu(json!([])).is_err());
        assert!(parse_menu(json!({"items": []})).is_err());
        assert!(parse_menu(json!([{"name": "No id"}])).is_err());
    }
}
