//! Fragments and helpers shared by the integration tests
#![allow(dead_code)]

use folio::{MemoryFetcher, SimulatedDelays, Site, SiteConfig};
use std::sync::Arc;

pub const HOME: &str = r#"
<section class="hero"><h1>SouzaDev</h1><div class="hero-stats"></div></section>
<section id="home-principal"></section>
<section class="testimonials">
  <div class="carousel-container">
    <button class="carousel-prev">‹</button>
    <div class="carousel-wrapper"></div>
    <button class="carousel-next">›</button>
    <div class="carousel-indicators"></div>
  </div>
</section>
<section class="prices"></section>
"#;

pub const ABOUT: &str = r#"
<div id="sobre-principal">
  <section class="about-hero">
    <div id="hero-avatar"></div>
    <h1 id="hero-name"></h1>
    <p id="hero-title"></p>
    <div id="hero-social"></div>
  </section>
  <div id="bio-content"></div>
  <div id="skills-grid"></div>
  <div id="education-timeline"></div>
  <div id="experience-timeline"></div>
  <div id="projects-grid"></div>
</div>
"#;

pub const CONTACT: &str = r#"
<section class="contato">
  <form id="contatoForm">
    <input type="text" name="nome">
    <input type="email" name="email">
    <input type="text" name="assunto">
    <textarea name="mensagem"></textarea>
    <button type="submit">Enviar</button>
  </form>
</section>
"#;

pub const SERVICES: &str = r#"<section class="services"><h1>Serviços</h1></section>"#;

/// Fetcher with all four fragments and a stylesheet for each route at its
/// first candidate path
pub fn pages() -> MemoryFetcher {
    MemoryFetcher::new()
        .with("pages/home.html", 200, HOME)
        .with("pages/about.html", 200, ABOUT)
        .with("pages/contact.html", 200, CONTACT)
        .with("pages/services.html", 200, SERVICES)
        .with("./pages/css/home.css", 200, ".hero{}")
        .with("./pages/css/about.css", 200, ".about-hero{}")
        .with("./pages/css/contact.css", 200, ".contato{}")
}

pub fn config() -> SiteConfig {
    let mut cfg = SiteConfig::default();
    cfg.api.delays = SimulatedDelays::none();
    cfg
}

pub fn site_with(fetcher: MemoryFetcher) -> (Site, Arc<MemoryFetcher>) {
    let fetcher = Arc::new(fetcher);
    let site = Site::with_fetcher(config(), fetcher.clone()).unwrap();
    (site, fetcher)
}

pub fn count(site: &Site, selector: &str) -> usize {
    site.dom().query_all(selector).unwrap().len()
}

pub fn text_of(site: &Site, selector: &str) -> Option<String> {
    let doc = site.dom();
    doc.query(selector).unwrap().map(|n| doc.text_content(n))
}

pub fn attr_of(site: &Site, selector: &str, name: &str) -> Option<String> {
    let doc = site.dom();
    doc.query(selector)
        .unwrap()
        .and_then(|n| doc.attr(n, name).map(str::to_string))
}

pub fn has_class(site: &Site, selector: &str, class: &str) -> bool {
    let doc = site.dom();
    doc.query(selector)
        .unwrap()
        .map(|n| doc.has_class(n, class))
        .unwrap_or(false)
}

/// Index of every element matching `selector` that carries `active`
pub fn active_indices(site: &Site, selector: &str) -> Vec<usize> {
    let doc = site.dom();
    doc.query_all(selector)
        .unwrap()
        .into_iter()
        .enumerate()
        .filter(|(_, n)| doc.has_class(*n, "active"))
        .map(|(i, _)| i)
        .collect()
}
