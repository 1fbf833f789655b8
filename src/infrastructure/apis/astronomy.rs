//! open-notify.org client

use std::sync::Arc;

use serde::Deserialize;

use crate::application::errors::ApiError;
use crate::infrastructure::http::ApiClient;

const ISS_NOW: &str = "http://api.open-notify.org/iss-now.json";
const ASTROS: &str = "http://api.open-notify.org/astros.json";

#[derive(Debug, Clone, Deserialize)]
pub struct IssNow {
    pub timestamp: i64,
    pub iss_position: IssPosition,
}

/// open-notify sends coordinates as strings
#[derive(Debug, Clone, Deserialize)]
pub struct IssPosition {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeopleInSpace {
    pub number: u32,
    pub people: Vec<Astronaut>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Astronaut {
    pub name: String,
    pub craft: String,
}

pub struct AstronomyApi {
    client: Arc<ApiClient>,
}

impl AstronomyApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn iss_now(&self) -> Result<IssNow, ApiError> {
        self.client.get(ISS_NOW, &[]).await?.success_json()
    }

    pub async fn people_in_space(&self) -> Result<PeopleInSpace, ApiError> {
        self.client.get(ASTROS, &[]).await?.success_json()
    }
}
