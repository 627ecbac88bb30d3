//! Route loading, stylesheet swapping and navigation races

mod common;

use common::*;
use folio::placeholder::PAGE_LOAD_FAILED;
use folio::{MemoryFetcher, RouteOutcome};
use std::time::Duration;

#[tokio::test]
async fn start_renders_home_with_bound_data() {
    let (site, _) = site_with(pages());
    assert_eq!(site.start().await, RouteOutcome::Rendered);
    assert_eq!(site.current_route().as_deref(), Some("home"));

    assert_eq!(count(&site, ".home-section-text"), 4);
    assert_eq!(count(&site, ".carousel-slide"), 7);
    assert_eq!(count(&site, ".indicator"), 7);
    assert_eq!(count(&site, ".stat"), 3);
    assert_eq!(count(&site, ".prices-text"), 3);
    assert_eq!(count(&site, ".prices-text.popular"), 1);
    assert_eq!(text_of(&site, ".stat-number").as_deref(), Some("127+"));

    assert!(has_class(&site, "#corpo", "fade-in"));
    assert_eq!(site.carousel().map(|c| c.total()), Some(7));
    assert!(site.autoplay_running());
}

#[tokio::test(start_paused = true)]
async fn entrance_class_is_removed() {
    let (site, _) = site_with(pages());
    site.start().await;
    assert!(has_class(&site, "#corpo", "fade-in"));
    tokio::time::sleep(Duration::from_millis(650)).await;
    assert!(!has_class(&site, "#corpo", "fade-in"));
}

#[tokio::test(start_paused = true)]
async fn entrance_timer_of_earlier_navigation_is_ignored() {
    let (site, _) = site_with(pages());
    site.start().await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    site.load_route("services").await;

    // The first timer fires here; the class belongs to the second navigation
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(has_class(&site, "#corpo", "fade-in"));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!has_class(&site, "#corpo", "fade-in"));
}

#[tokio::test(start_paused = true)]
async fn failed_navigation_clears_entrance_class() {
    let (site, _) = site_with(pages());
    site.start().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(site.load_route("nope").await, RouteOutcome::Failed);
    assert!(!has_class(&site, "#corpo", "fade-in"));
}

#[tokio::test]
async fn binder_skips_slots_missing_from_fragment() {
    // Features and testimonials only: no stats, pricing or indicators
    let partial = r#"
<section id="home-principal"></section>
<div class="carousel-container">
  <button class="carousel-prev">‹</button>
  <div class="carousel-wrapper"></div>
  <button class="carousel-next">›</button>
</div>
"#;
    let (site, _) = site_with(MemoryFetcher::new().with("pages/home.html", 200, partial));
    assert_eq!(site.load_route("home").await, RouteOutcome::Rendered);

    assert_eq!(count(&site, ".home-section-text"), 4);
    assert_eq!(count(&site, ".carousel-slide"), 7);
    assert_eq!(count(&site, ".indicator"), 0);
    assert_eq!(count(&site, ".stat"), 0);
    assert_eq!(count(&site, ".prices-text"), 0);
    assert_eq!(count(&site, ".error-container"), 0);
    assert_eq!(site.carousel().map(|c| c.total()), Some(7));
    assert_eq!(site.current_route().as_deref(), Some("home"));
}

#[tokio::test]
async fn nested_slots_are_found_with_combinators() {
    let (site, _) = site_with(pages());
    site.start().await;
    assert_eq!(count(&site, "#corpo .carousel-wrapper > .carousel-slide"), 7);
    assert_eq!(count(&site, "head > link[data-route-style]"), 1);
}

#[tokio::test]
async fn static_route_is_injected_unbound() {
    let (site, _) = site_with(pages());
    assert_eq!(site.load_route("services").await, RouteOutcome::Rendered);
    assert_eq!(text_of(&site, "h1").as_deref(), Some("Serviços"));
    assert!(site.carousel().is_none());
}

#[tokio::test]
async fn stylesheet_candidates_tried_in_order() {
    let fetcher = MemoryFetcher::new()
        .with("pages/about.html", 200, ABOUT)
        .with("/pages/css/about.css", 200, ".x{}");
    let (site, fetcher) = site_with(fetcher);

    site.load_route("about").await;
    let css: Vec<String> = fetcher
        .requests()
        .into_iter()
        .filter(|p| p.ends_with(".css"))
        .collect();
    assert_eq!(
        css,
        vec![
            "./pages/css/about.css",
            "pages/css/about.css",
            "/pages/css/about.css"
        ]
    );
    assert_eq!(
        attr_of(&site, "link#css-about", "href").as_deref(),
        Some("/pages/css/about.css")
    );
    assert_eq!(site.active_stylesheet().as_deref(), Some("about"));
}

#[tokio::test]
async fn at_most_one_route_stylesheet() {
    let (site, _) = site_with(pages());
    for route in ["home", "about", "contact", "about", "home"] {
        site.load_route(route).await;
        assert_eq!(count(&site, "link[data-route-style]"), 1, "after {}", route);
        assert_eq!(
            attr_of(&site, "link[data-route-style]", "data-route-style").as_deref(),
            Some(route)
        );
    }
    // The global stylesheet of the shell is never touched
    assert_eq!(count(&site, "link[href=\"css/style.css\"]"), 1);

    // No stylesheet for services: the previous one is still removed
    site.load_route("services").await;
    assert_eq!(count(&site, "link[data-route-style]"), 0);
    assert_eq!(site.active_stylesheet(), None);
}

#[tokio::test]
async fn missing_fragment_shows_error_placeholder() {
    let (site, _) = site_with(pages());
    site.toggle_menu();
    assert_eq!(site.load_route("nope").await, RouteOutcome::Failed);

    assert_eq!(count(&site, ".error-container"), 1);
    assert_eq!(count(&site, ".retry-btn"), 1);
    assert!(site.container_text().contains(PAGE_LOAD_FAILED));
    assert!(!site.menu_open());
    assert_eq!(site.scroll_y(), 0);
    assert_eq!(site.current_route(), None);
}

#[tokio::test]
async fn network_failure_shows_error_placeholder() {
    let fetcher = pages();
    fetcher.insert_failure("pages/about.html", "connection reset");
    let (site, _) = site_with(fetcher);
    site.start().await;
    assert_eq!(site.load_route("about").await, RouteOutcome::Failed);
    assert!(site.container_text().contains(PAGE_LOAD_FAILED));
    // The failed load still replaced the previous page and its carousel
    assert!(site.carousel().is_none());
    assert_eq!(site.current_route().as_deref(), Some("home"));
}

#[tokio::test]
async fn retry_reloads_the_site() {
    let (site, _) = site_with(pages());
    site.load_route("nope").await;
    site.click(".retry-btn").await.unwrap();
    assert_eq!(site.current_route().as_deref(), Some("home"));
    assert_eq!(count(&site, ".error-container"), 0);
    assert_eq!(count(&site, ".carousel-slide"), 7);
}

#[tokio::test(start_paused = true)]
async fn later_navigation_wins() {
    let fetcher = pages();
    fetcher.insert_delayed("pages/about.html", 200, ABOUT, Duration::from_millis(200));
    let (site, _) = site_with(fetcher);

    let (slow, fast) = tokio::join!(site.load_route("about"), site.load_route("contact"));
    assert_eq!(slow, RouteOutcome::Superseded);
    assert_eq!(fast, RouteOutcome::Rendered);

    assert_eq!(site.current_route().as_deref(), Some("contact"));
    assert_eq!(count(&site, "#contatoForm"), 1);
    assert_eq!(count(&site, "#sobre-principal"), 0);
    assert_eq!(site.active_stylesheet().as_deref(), Some("contact"));
    assert_eq!(count(&site, "link[data-route-style]"), 1);
}

#[tokio::test(start_paused = true)]
async fn stylesheet_lookup_stops_when_superseded() {
    let fetcher = MemoryFetcher::new()
        .with("pages/about.html", 200, ABOUT)
        .with("pages/contact.html", 200, CONTACT)
        .with("./pages/css/contact.css", 200, ".contato{}");
    fetcher.insert_delayed("./pages/css/about.css", 404, "", Duration::from_millis(200));
    let (site, fetcher) = site_with(fetcher);

    let about = site.load_route("about");
    let contact = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        site.load_route("contact").await
    };
    let (about, contact) = tokio::join!(about, contact);
    assert_eq!(about, RouteOutcome::Superseded);
    assert_eq!(contact, RouteOutcome::Rendered);

    let about_css: Vec<String> = fetcher
        .requests()
        .into_iter()
        .filter(|p| p.ends_with("about.css"))
        .collect();
    assert_eq!(about_css, vec!["./pages/css/about.css"]);
    assert_eq!(site.active_stylesheet().as_deref(), Some("contact"));
}

#[tokio::test(start_paused = true)]
async fn late_binder_data_is_dropped() {
    // About data arrives after the user has moved on to contact
    let mut cfg = config();
    cfg.api.delays.about_ms = 400;
    let site = folio::Site::with_fetcher(cfg, std::sync::Arc::new(pages())).unwrap();

    let about = site.load_route("about");
    let contact = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        site.load_route("contact").await
    };
    let (about, contact) = tokio::join!(about, contact);
    assert_eq!(about, RouteOutcome::Superseded);
    assert_eq!(contact, RouteOutcome::Rendered);
    assert_eq!(count(&site, "#hero-name"), 0);
    assert_eq!(count(&site, "#contatoForm"), 1);
}

#[tokio::test]
async fn reload_restores_shell() {
    let (site, _) = site_with(pages());
    site.load_route("about").await;
    site.toggle_menu();
    assert_eq!(site.reload().await, RouteOutcome::Rendered);
    assert_eq!(site.current_route().as_deref(), Some("home"));
    assert!(!site.menu_open());
    assert_eq!(count(&site, "link[data-route-style]"), 1);
    assert_eq!(site.active_stylesheet().as_deref(), Some("home"));
    assert_eq!(count(&site, ".nav-btn"), 4);
}

#[tokio::test]
async fn about_binds_profile() {
    let (site, _) = site_with(pages());
    site.load_route("about").await;
    let profile = folio::fixtures::about().unwrap();
    let info = profile.personal_info.unwrap();

    assert_eq!(text_of(&site, "#hero-name"), Some(info.name));
    assert_eq!(text_of(&site, "#hero-title"), Some(info.title));
    assert_eq!(count(&site, ".social-link"), 4);
    assert_eq!(count(&site, ".skill-category"), 4);
    assert_eq!(count(&site, ".skill-item"), 8);
    assert_eq!(count(&site, ".timeline-item"), 6 + 3);
    assert_eq!(count(&site, ".experience-item"), 3);
    assert_eq!(count(&site, ".project-card"), 4);
    assert!(count(&site, ".status-cursando") >= 1);
}
