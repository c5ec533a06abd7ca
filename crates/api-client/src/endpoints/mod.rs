//! Endpoint-specific API implementations
//!
//! | Module | Route | Description |
//! |--------|-------|-------------|
//! | `menu` | `GET /menu-items?q=` | Menu items matching a free-text hint |
//! | `restaurants` | `GET /restaurants?q=` | Restaurants matching a free-text hint |

pub mod menu;
pub mod restaurants;

pub use menu::MenuApi;
pub use restaurants::RestaurantsApi;

use serde::{Deserialize, Serialize};

/// List payload as returned by the catalog API
///
/// Backends answer either with a bare JSON array or with the array wrapped in
/// a `data` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ "data": [ ... ] }`
    Wrapped {
        /// Wrapped records
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    /// Unwrap into the record list
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

/// Query string for a search hint; blank hints fetch everything
fn hint_query(hint: Option<&str>) -> Vec<(&'static str, &str)> {
    hint.map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| vec![("q", h)])
        .unwrap_or_default()
}
