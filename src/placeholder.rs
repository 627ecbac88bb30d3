//! Loading and error blocks shown in place of content.

use crate::render::{El, View};

pub const RETRY_BUTTON: &str = ".retry-btn";

/// Message shown when a route fragment cannot be fetched
pub const PAGE_LOAD_FAILED: &str = "Não foi possível carregar a página solicitada.";

pub fn loading() -> View {
    El::new("div")
        .class("loading-container")
        .child(El::new("div").class("loading-spinner"))
        .child(El::new("p").text("Carregando..."))
        .into()
}

/// Error block with a button that reloads the whole page
pub fn error(message: &str) -> View {
    El::new("div")
        .class("error-container")
        .child(El::new("div").class("error-icon").text("⚠️"))
        .child(El::new("h3").text("Ops! Algo deu errado"))
        .child(El::new("p").text(message))
        .child(
            El::new("button")
                .class("retry-btn")
                .attr("data-action", "reload")
                .text("Tentar novamente"),
        )
        .into()
}
