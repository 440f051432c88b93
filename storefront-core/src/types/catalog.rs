//! Catalog types: categories, picks, collections and list items.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AddressError;

/// Number of apps shown in a collection preview on the landing page.
pub const APPS_IN_PREVIEW_COUNT: usize = 12;

/// Number of days the "popular" collection looks back over.
pub const POPULAR_DAYS: u32 = 30;

/// The main categories the catalog is organized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    AudioVideo,
    Development,
    Education,
    Game,
    Graphics,
    Network,
    Office,
    Science,
    System,
    Utility,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::AudioVideo,
        Category::Development,
        Category::Education,
        Category::Game,
        Category::Graphics,
        Category::Network,
        Category::Office,
        Category::Science,
        Category::System,
        Category::Utility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AudioVideo => "AudioVideo",
            Category::Development => "Development",
            Category::Education => "Education",
            Category::Game => "Game",
            Category::Graphics => "Graphics",
            Category::Network => "Network",
            Category::Office => "Office",
            Category::Science => "Science",
            Category::System => "System",
            Category::Utility => "Utility",
        }
    }
}

impl FromStr for Category {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AddressError::UnknownCategory(s.to_string()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorially curated pick lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Picks {
    Apps,
    Games,
}

impl Picks {
    pub fn as_str(&self) -> &'static str {
        match self {
            Picks::Apps => "apps",
            Picks::Games => "games",
        }
    }
}

impl FromStr for Picks {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apps" => Ok(Picks::Apps),
            "games" => Ok(Picks::Games),
            other => Err(AddressError::UnknownPicks(other.to_string())),
        }
    }
}

/// A listable set of apps, used by pages and as the regeneration cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    RecentlyUpdated,
    RecentlyAdded,
    Popular,
    EditorsPicks,
    /// Apps in a category.
    ///
    /// Pagination applies only when both `page` and `per_page` are set and non-zero.
    /// Supplying just one of them is a caller error; the collection then addresses the
    /// full, unpaginated category.
    Category {
        category: Category,
        page: Option<u32>,
        per_page: Option<u32>,
    },
    Developer(String),
    ProjectGroup(String),
    Search(String),
}

impl Collection {
    /// Unpaginated category listing.
    pub fn category(category: Category) -> Self {
        Collection::Category {
            category,
            page: None,
            per_page: None,
        }
    }

    /// One page of a category listing. Pages are 1-based.
    pub fn category_page(category: Category, page: u32, per_page: u32) -> Self {
        Collection::Category {
            category,
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

/// Minimal catalog record returned by the collection endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppListItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_category_roundtrips_known_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_fails_fast() {
        let err = "Games".parse::<Category>().unwrap_err();
        assert!(matches!(err, AddressError::UnknownCategory(name) if name == "Games"));
        assert!("audiovideo".parse::<Category>().is_err());
    }

    #[test]
    fn test_app_list_item_tolerates_missing_and_extra_fields() {
        let items: Vec<AppListItem> = serde_json::from_value(json!([
            {
                "id": "org.gnome.Maps",
                "name": "Maps",
                "summary": "Find places around the world",
                "icon": "https://example.com/icons/org.gnome.Maps.png",
                "installs_last_month": 1234
            },
            { "id": "org.example.Bare", "name": "Bare" }
        ]))
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].summary.as_deref(), Some("Find places around the world"));
        assert_eq!(items[1].icon, None);
    }
}
