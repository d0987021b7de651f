//! Static HTML pages: landing, patient form and history.
//!
//! Pages are compiled into the binary; they talk to the JSON API from the
//! browser and need nothing else from the server.

use axum::response::Html;

const LANDING_PAGE_HTML: &str = include_str!("../../../resources/pages/index.html");
const FORM_PAGE_HTML: &str = include_str!("../../../resources/pages/formulario.html");
const HISTORY_PAGE_HTML: &str = include_str!("../../../resources/pages/ver_historial.html");

/// `GET /` — landing page with links to the form and the history.
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE_HTML)
}

/// `GET /formulario.html` — patient metrics form with result and chart.
pub async fn form() -> Html<&'static str> {
    Html(FORM_PAGE_HTML)
}

/// `GET /ver_historial.html` — stored evaluations table with purge button.
pub async fn history() -> Html<&'static str> {
    Html(HISTORY_PAGE_HTML)
}
