use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Instant;

use crate::config::StoreConfig;
use crate::constants::{KEY_ENV, LOG_TARGET_STORE};
use crate::data_backend::MealStore;
use crate::data_types::meal_data_types::{Meal, MealId, MealInput, MealPatch};
use crate::errors::{ConfigError, StoreError};

/// `meals` table behind a PostgREST endpoint (Supabase).
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    table_url: String,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.key).map_err(|_| ConfigError::InvalidKey(KEY_ENV))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|_| ConfigError::InvalidKey(KEY_ENV))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(SupabaseStore {
            client,
            table_url: config.table_url(),
        })
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, StoreError> {
        let now = Instant::now();
        let resp = request.send().await.map_err(|source| StoreError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;
        log::debug!(target: LOG_TARGET_STORE, "{}: {} in {:.2?}", endpoint, resp.status(), now.elapsed());

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                endpoint: endpoint.to_string(),
                status,
                body,
            });
        }

        Ok(resp)
    }

    async fn rows(endpoint: &str, resp: Response) -> Result<Vec<Meal>, StoreError> {
        resp.json::<Vec<Meal>>()
            .await
            .map_err(|source| StoreError::Deserialization {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    fn id_filter(id: &MealId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }
}

impl MealStore for SupabaseStore {
    async fn fetch_all(&self) -> Result<Vec<Meal>, StoreError> {
        let endpoint = "GET meals";
        let request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "created_at.asc")]);

        let resp = self.send(endpoint, request).await?;
        Self::rows(endpoint, resp).await
    }

    async fn create(&self, meal: MealInput) -> Result<Meal, StoreError> {
        let endpoint = "POST meals";
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&meal);

        let resp = self.send(endpoint, request).await?;
        Self::rows(endpoint, resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::EmptyResponse(endpoint.to_string()))
    }

    async fn update(&self, id: &MealId, patch: MealPatch) -> Result<Meal, StoreError> {
        let endpoint = format!("PATCH meals/{}", id);
        let request = self
            .client
            .patch(&self.table_url)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(&patch);

        let resp = self.send(&endpoint, request).await?;
        Self::rows(&endpoint, resp)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::MissingRecord(id.clone()))
    }

    async fn delete(&self, id: &MealId) -> Result<(), StoreError> {
        let endpoint = format!("DELETE meals/{}", id);
        let request = self.client.delete(&self.table_url).query(&Self::id_filter(id));

        self.send(&endpoint, request).await?;
        Ok(())
    }
}
