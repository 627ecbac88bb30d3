//! Data client used by the view binders.
//!
//! `request` is the only call that can fail. The accessors built on it are
//! fail-soft: errors are logged and the caller receives an empty collection,
//! fallback stats, or `None`, so a page renders with whatever data arrived.

use crate::fetch::Fetcher;
use crate::model::{AboutProfile, Feature, Post, Product, RawPost, RawUser, Stats, Testimonial, User};
use crate::{fixtures, ApiConfig, Error, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_POSTS_LIMIT: usize = 4;
pub const DEFAULT_USERS_LIMIT: usize = 3;
pub const DEFAULT_TESTIMONIALS_LIMIT: usize = 5;
pub const DEFAULT_PRODUCTS_LIMIT: usize = 3;

pub struct ApiClient {
    fetcher: Arc<dyn Fetcher>,
    config: ApiConfig,
}

async fn simulate_latency(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

impl ApiClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: ApiConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Fetch `endpoint` and decode the body as JSON.
    ///
    /// The attempt is dropped once `timeout_ms` elapses. There is no retry.
    pub async fn request(&self, endpoint: &str) -> Result<serde_json::Value> {
        let url = self.url(endpoint);
        let limit = Duration::from_millis(self.config.timeout_ms);
        let resp = tokio::time::timeout(limit, self.fetcher.get(&url))
            .await
            .map_err(|_| Error::Timeout(self.config.timeout_ms))??;
        if !resp.is_success() {
            return Err(Error::Http {
                status: resp.status,
            });
        }
        Ok(serde_json::from_str(&resp.body)?)
    }

    async fn request_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let value = self.request(endpoint).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_posts(&self, limit: usize) -> Vec<Post> {
        let endpoint = format!("{}?_limit={}", self.config.endpoints.posts, limit);
        match self.request_list::<RawPost>(&endpoint).await {
            Ok(posts) => posts.into_iter().take(limit).map(Post::from).collect(),
            Err(e) => {
                log::error!("Failed to load posts: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_users(&self, limit: usize) -> Vec<User> {
        let endpoint = format!("{}?_limit={}", self.config.endpoints.users, limit);
        match self.request_list::<RawUser>(&endpoint).await {
            Ok(users) => users.into_iter().take(limit).map(User::from).collect(),
            Err(e) => {
                log::error!("Failed to load users: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_testimonials(&self, limit: usize) -> Vec<Testimonial> {
        simulate_latency(self.config.delays.testimonials_ms).await;
        match fixtures::testimonials() {
            Ok(mut items) => {
                items.truncate(limit);
                items
            }
            Err(e) => {
                log::error!("Failed to load testimonials: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_products(&self, limit: usize) -> Vec<Product> {
        match fixtures::products() {
            Ok(mut items) => {
                items.truncate(limit);
                items
            }
            Err(e) => {
                log::error!("Failed to load products: {}", e);
                Vec::new()
            }
        }
    }

    /// Hero statistics; [`Stats::fallback`] when the source fails
    pub async fn get_stats(&self) -> Stats {
        simulate_latency(self.config.delays.stats_ms).await;
        fixtures::stats().unwrap_or_else(|e| {
            log::error!("Failed to load stats: {}", e);
            Stats::fallback()
        })
    }

    pub async fn get_about_profile(&self) -> Option<AboutProfile> {
        simulate_latency(self.config.delays.about_ms).await;
        match fixtures::about() {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::error!("Failed to load about profile: {}", e);
                None
            }
        }
    }

    pub async fn get_features(&self) -> Vec<Feature> {
        fixtures::features().unwrap_or_else(|e| {
            log::error!("Failed to load features: {}", e);
            Vec::new()
        })
    }
}
