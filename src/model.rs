//! Remote records and the view models derived from them.
//!
//! Every field defaults when absent, so a record with missing fields still
//! deserializes; the binders substitute fallback text at render time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPost {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
}

/// Length of a post excerpt, in characters
pub const EXCERPT_CHARS: usize = 100;

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        let excerpt = format!(
            "{}...",
            raw.body.chars().take(EXCERPT_CHARS).collect::<String>()
        );
        Post {
            id: raw.id,
            title: raw.title,
            author: format!("User {}", raw.user_id),
            content: raw.body,
            excerpt,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawCompany {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub company: RawCompany,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub company: String,
    pub website: String,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        User {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            company: raw.company.name,
            website: raw.website,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Testimonial {
    pub id: u64,
    pub name: String,
    pub company: String,
    pub position: String,
    pub avatar: String,
    pub content: String,
    pub rating: u8,
    pub project: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub features: Vec<String>,
    pub popular: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub projects_completed: u32,
    pub happy_clients: u32,
    pub years_experience: u32,
    pub support_hours: String,
    pub average_rating: f64,
    pub success_rate: u32,
}

impl Stats {
    /// Figures shown when the stats source fails
    pub fn fallback() -> Self {
        Stats {
            projects_completed: 100,
            happy_clients: 50,
            years_experience: 5,
            support_hours: "24/7".to_string(),
            average_rating: 4.8,
            success_rate: 95,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Home page feature card
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Feature {
    pub title: String,
    pub content: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub avatar: String,
    pub bio: String,
    pub description: String,
    pub objective: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub id: u64,
    pub course: String,
    pub institution: String,
    pub status: String,
    pub start_year: Option<u32>,
    pub end_year: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Experience {
    pub id: u64,
    pub position: String,
    pub company: String,
    pub period: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    pub level: u32,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SocialLinks {
    pub github: String,
    pub linkedin: String,
    pub instagram: String,
    pub email: String,
}

/// Everything the about page renders. Sections are optional because the
/// page skips whichever ones the source leaves out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutProfile {
    pub personal_info: Option<PersonalInfo>,
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<Experience>>,
    pub skills: Option<Vec<Skill>>,
    pub projects: Option<Vec<Project>>,
    pub social_links: Option<SocialLinks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_projection() {
        let raw: RawPost = serde_json::from_str(
            r#"{"id":7,"title":"T","body":"short body","userId":3}"#,
        )
        .unwrap();
        let post = Post::from(raw);
        assert_eq!(post.author, "User 3");
        assert_eq!(post.content, "short body");
        assert_eq!(post.excerpt, "short body...");
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let raw = RawPost {
            body: "é".repeat(150),
            ..Default::default()
        };
        let post = Post::from(raw);
        assert_eq!(post.excerpt.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn user_projection_flattens_company() {
        let raw: RawUser =
            serde_json::from_str(r#"{"id":1,"name":"Ana","company":{"name":"ACME"}}"#).unwrap();
        let user = User::from(raw);
        assert_eq!(user.company, "ACME");
        assert_eq!(user.website, "");
    }

    #[test]
    fn missing_fields_default() {
        let t: Testimonial = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(t.rating, 0);
        assert!(t.project.is_empty());
        let e: Education = serde_json::from_str(r#"{"course":"X","type":"Curso"}"#).unwrap();
        assert_eq!(e.kind, "Curso");
        assert_eq!(e.end_year, None);
    }
}
