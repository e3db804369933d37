use serde::{Deserialize, Serialize};

use foodgram_http::Pagination;

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

/// `foodgram` section of the application config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoodgramConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for FoodgramConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl FoodgramConfig {
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination {
            default_size: self.default_page_size.max(1),
            max_size: self.max_page_size.max(self.default_page_size).max(1),
        }
    }
}
