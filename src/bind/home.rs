//! Home page: feature cards, testimonial carousel, hero stats and pricing.

use super::BindContext;
use crate::model::{Feature, Product, Stats, Testimonial};
use crate::render::{El, View};
use crate::Result;

pub const FEATURES_SLOT: &str = "#home-principal";
pub const SLIDES_SLOT: &str = ".carousel-wrapper";
pub const INDICATORS_SLOT: &str = ".carousel-indicators";
pub const STATS_SLOT: &str = ".hero-stats";
pub const PRICES_SLOT: &str = ".prices";

/// Testimonials requested for the carousel
pub const CAROUSEL_TESTIMONIALS: usize = 7;
/// Pricing cards requested for the pricing grid
pub const PRICING_PRODUCTS: usize = 3;

pub fn feature_card(feature: &Feature) -> View {
    El::new("div")
        .class("home-section-text dynamic-card")
        .child(El::new("div").class("feature-icon").text(feature.icon.as_str()))
        .child(El::new("h2").text(feature.title.as_str()))
        .child(El::new("p").text(feature.content.as_str()))
        .into()
}

pub fn testimonial_slide(t: &Testimonial, active: bool) -> View {
    let header = El::new("div")
        .class("testimonial-header")
        .child(El::new("div").class("testimonial-avatar").text(t.avatar.as_str()))
        .child(
            El::new("div")
                .class("testimonial-info")
                .child(El::new("h3").text(t.name.as_str()))
                .child(El::new("p").class("testimonial-position").text(t.position.as_str()))
                .child(El::new("p").class("testimonial-company").text(t.company.as_str())),
        )
        .child(
            El::new("div")
                .class("testimonial-rating")
                .text("★".repeat(t.rating as usize)),
        );

    El::new("div")
        .class("carousel-slide")
        .class_if(active, "active")
        .child(
            El::new("div")
                .class("testimonial-card")
                .child(header)
                .child(
                    El::new("div")
                        .class("testimonial-content")
                        .child(El::new("p").text(format!("\"{}\"", t.content))),
                )
                .child(
                    El::new("div")
                        .class("testimonial-project")
                        .child(El::new("span").class("project-tag").text(t.project.as_str())),
                ),
        )
        .into()
}

/// One indicator per slide; `data-slide` counts from 1
pub fn indicators(count: usize) -> Vec<View> {
    (1..=count)
        .map(|n| {
            El::new("span")
                .class("indicator")
                .class_if(n == 1, "active")
                .attr("data-slide", n.to_string())
                .into()
        })
        .collect()
}

pub fn hero_stats(stats: &Stats) -> Vec<View> {
    [
        (stats.projects_completed, "Projetos"),
        (stats.happy_clients, "Clientes"),
        (stats.years_experience, "Anos"),
    ]
    .into_iter()
    .map(|(n, label)| {
        El::new("div")
            .class("stat")
            .child(El::new("span").class("stat-number").text(format!("{}+", n)))
            .child(El::new("span").class("stat-label").text(label))
            .into()
    })
    .collect()
}

pub fn price_card(product: &Product) -> View {
    let mut card = El::new("div")
        .class("prices-text dynamic-card")
        .class_if(product.popular, "popular")
        .attr("data-plan", product.id.to_string());
    if product.popular {
        card = card.child(El::new("div").class("badge").text("Mais Popular"));
    }
    let button_label = if product.popular {
        "Escolher Plano"
    } else {
        "Comprar Agora"
    };
    card.child(El::new("h1").text(product.name.as_str()))
        .child(El::new("p").text(product.description.as_str()))
        .child(El::new("div").class("price").text(format!("{:.2}", product.price)))
        .child(
            El::new("div").class("beneficios").child(
                El::new("ul").children(
                    product
                        .features
                        .iter()
                        .map(|f| El::new("li").text(f.as_str())),
                ),
            ),
        )
        .child(
            El::new("button")
                .class("action-btn")
                .attr("data-plan", product.id.to_string())
                .text(button_label),
        )
        .into()
}

pub async fn bind(ctx: &BindContext<'_>) -> Result<()> {
    let features = ctx.api().get_features().await;
    ctx.fill(FEATURES_SLOT, features.iter().map(feature_card).collect())?;

    let testimonials = ctx.api().get_testimonials(CAROUSEL_TESTIMONIALS).await;
    if !testimonials.is_empty() {
        let slides = testimonials
            .iter()
            .enumerate()
            .map(|(i, t)| testimonial_slide(t, i == 0))
            .collect();
        ctx.fill(SLIDES_SLOT, slides)?;
        ctx.fill(INDICATORS_SLOT, indicators(testimonials.len()))?;
    }

    let stats = ctx.api().get_stats().await;
    ctx.fill(STATS_SLOT, hero_stats(&stats))?;

    let products = ctx.api().get_products(PRICING_PRODUCTS).await;
    if !products.is_empty() {
        ctx.fill(PRICES_SLOT, products.iter().map(price_card).collect())?;
    }
    Ok(())
}
