//! Static sample data embedded in the binary.

use crate::model::{AboutProfile, Feature, Product, Stats, Testimonial};
use crate::Result;

pub const TESTIMONIALS: &str = include_str!("fixtures/testimonials.json");
pub const PRODUCTS: &str = include_str!("fixtures/products.json");
pub const STATS: &str = include_str!("fixtures/stats.json");
pub const ABOUT: &str = include_str!("fixtures/about.json");
pub const FEATURES: &str = include_str!("fixtures/features.json");

/// Default page shell: navigation, mobile menu toggle and the `#corpo`
/// container fragments are injected into.
pub const SHELL: &str = include_str!("fixtures/shell.html");

/// Collections served by the mock backend
pub mod backend {
    pub const POSTS: &str = include_str!("fixtures/backend/posts.json");
    pub const USERS: &str = include_str!("fixtures/backend/users.json");
    pub const PRODUCTS: &str = include_str!("fixtures/backend/products.json");
    pub const TESTIMONIALS: &str = include_str!("fixtures/backend/testimonials.json");
}

pub fn testimonials() -> Result<Vec<Testimonial>> {
    Ok(serde_json::from_str(TESTIMONIALS)?)
}

pub fn products() -> Result<Vec<Product>> {
    Ok(serde_json::from_str(PRODUCTS)?)
}

pub fn stats() -> Result<Stats> {
    Ok(serde_json::from_str(STATS)?)
}

pub fn about() -> Result<AboutProfile> {
    Ok(serde_json::from_str(ABOUT)?)
}

pub fn features() -> Result<Vec<Feature>> {
    Ok(serde_json::from_str(FEATURES)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_fixtures_decode() {
        assert_eq!(testimonials().unwrap().len(), 7);
        assert_eq!(products().unwrap().len(), 3);
        assert_eq!(features().unwrap().len(), 4);
        assert_eq!(stats().unwrap().projects_completed, 127);
        let about = about().unwrap();
        assert!(about.personal_info.is_some());
        assert_eq!(about.skills.map(|s| s.len()), Some(8));
    }

    #[test]
    fn backend_fixtures_are_arrays() {
        for src in [
            backend::POSTS,
            backend::USERS,
            backend::PRODUCTS,
            backend::TESTIMONIALS,
        ] {
            let v: serde_json::Value = serde_json::from_str(src).unwrap();
            assert!(v.as_array().map(|a| !a.is_empty()).unwrap_or(false));
        }
    }
}
