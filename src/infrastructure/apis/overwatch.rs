//! overwatch-api.net client

use std::sync::Arc;

use serde::Deserialize;

use crate::application::errors::ApiError;
use crate::infrastructure::http::ApiClient;

const API_BASE: &str = "https://overwatch-api.net/api/v1";

/// Page size asked for, large enough to get every entry in one request
const REQUEST_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
struct Page<T> {
    data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hero {
    pub name: String,
    pub description: String,
    pub health: u32,
    pub armour: u32,
    pub shield: u32,
    pub real_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub base_of_operations: Option<String>,
    pub difficulty: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
    pub is_ultimate: bool,
    pub hero: HeroRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeroRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Achievement {
    pub name: String,
    pub description: String,
    pub reward: Reward,
    #[serde(default)]
    pub hero: Option<HeroRef>,
}

/// e.g. a "Legendary" "Skin"
#[derive(Debug, Clone, Deserialize)]
pub struct Reward {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RewardKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardKind {
    pub name: String,
}

pub struct OverwatchApi {
    client: Arc<ApiClient>,
}

impl OverwatchApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn heroes(&self) -> Result<Vec<Hero>, ApiError> {
        self.list("hero").await
    }

    pub async fn abilities(&self) -> Result<Vec<Ability>, ApiError> {
        self.list("ability").await
    }

    pub async fn achievements(&self) -> Result<Vec<Achievement>, ApiError> {
        self.list("achievement").await
    }

    async fn list<T: serde::de::DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/{}", API_BASE, kind);
        let page: Page<T> = self
            .client
            .get(&url, &[("limit", REQUEST_LIMIT.to_string())])
            .await?
            .success_json()?;
        Ok(page.data)
    }
}

/// Case-insensitive lookup by display name
pub fn find_by_name<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    items.iter().find(|item| key(item).eq_ignore_ascii_case(name.trim()))
}
