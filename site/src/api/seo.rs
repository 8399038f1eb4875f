use axum::{extract::State, http::header, response::IntoResponse};
use chrono::Utc;

use super::AppState;

/// Public pages listed in the sitemap: (path, change frequency, priority).
const PAGES: &[(&str, &str, &str)] = &[
    ("/", "weekly", "1.0"),
    ("/services", "monthly", "0.8"),
    ("/projects", "weekly", "0.8"),
    ("/about", "monthly", "0.7"),
    ("/testimonials", "weekly", "0.7"),
    ("/contact", "monthly", "0.9"),
];

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_sitemap(base_url: &str, lastmod: &str) -> String {
    let mut urls = String::new();
    for (path, changefreq, priority) in PAGES {
        urls.push_str(&format!(
            "  <url>\n\
             \x20   <loc>{}</loc>\n\
             \x20   <lastmod>{lastmod}</lastmod>\n\
             \x20   <changefreq>{changefreq}</changefreq>\n\
             \x20   <priority>{priority}</priority>\n\
             \x20 </url>\n",
            escape_xml(&format!("{base_url}{path}")),
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         {urls}\
         </urlset>\n"
    )
}

pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /admin\n\
         Disallow: /api\n\
         Disallow: /.well-known\n\
         Crawl-delay: 1\n\
         \n\
         Sitemap: {base_url}/sitemap.xml\n"
    )
}

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&state.config.site_url, &today),
    )
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config.site_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};

    use crate::api::test_support::*;

    #[test]
    fn sitemap_lists_every_page() {
        let xml = render_sitemap("https://example.be", "2025-01-31");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(xml.matches("<url>").count(), PAGES.len());
        assert!(xml.contains("<loc>https://example.be/</loc>"));
        assert!(xml.contains("<loc>https://example.be/contact</loc>"));
        assert!(xml.contains("<lastmod>2025-01-31</lastmod>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn sitemap_escapes_base_url() {
        let xml = render_sitemap("https://example.be/?a=1&b=2", "2025-01-31");
        assert!(xml.contains("a=1&amp;b=2"));
    }

    #[test]
    fn robots_blocks_private_areas() {
        let txt = render_robots("https://example.be");
        assert!(txt.contains("Disallow: /admin\n"));
        assert!(txt.contains("Disallow: /api\n"));
        assert!(txt.contains("Sitemap: https://example.be/sitemap.xml"));
    }

    #[tokio::test]
    async fn served_with_content_types() {
        let app = TestApp::new().await;

        let res = app.send(Method::GET, "/sitemap.xml", None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/xml"));
        let today = Utc::now().format("%Y-%m-%d").to_string();
        assert!(body_text(res).await.contains(&today));

        let res = app.send(Method::GET, "/robots.txt", None, None).await;
        assert!(res.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        assert!(body_text(res).await.contains("https://rommelaere-renov.be/sitemap.xml"));
    }
}
