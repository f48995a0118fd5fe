//! Product page scraping collaborator
//!
//! Best-effort extraction of product attributes from a retail product page.
//! The scraper is an external collaborator behind a trait; the HTTP
//! implementation pulls the title and walks the technical-details rows for
//! weight, material, and dimensions. Anything it cannot find stays `None`
//! and the pipeline's defaults take over.

use crate::error::ApiError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw product attributes from a scraped page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: Option<String>,
    pub material_type: Option<String>,
    pub recyclability: Option<String>,
    pub transport_mode: Option<String>,
    pub brand_estimated_origin: Option<String>,
    pub origin: Option<String>,
    pub dimensions_cm: Option<String>,
    pub raw_product_weight_kg: Option<f64>,
    pub estimated_weight_kg: Option<f64>,
}

impl ProductInfo {
    /// Best available origin: the brand estimate wins over the listed origin.
    pub fn best_origin(&self) -> Option<&str> {
        self.brand_estimated_origin
            .as_deref()
            .or(self.origin.as_deref())
    }

    /// Best available weight: the listed raw weight wins over the estimate.
    pub fn best_weight_kg(&self) -> Option<f64> {
        self.raw_product_weight_kg.or(self.estimated_weight_kg)
    }
}

/// Scraping collaborator
#[async_trait]
pub trait ProductScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ProductInfo, ApiError>;
}

static WEIGHT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([\d]+(?:\.[\d]+)?)\s*(kg|kilograms?|g|grams?)\b")
        .expect("Failed to compile weight regex")
});

static DIMENSIONS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([\d.]+\s*x\s*[\d.]+\s*x\s*[\d.]+)\s*(cm|centimet)")
        .expect("Failed to compile dimensions regex")
});

/// HTTP scraper backed by reqwest + scraper selectors
pub struct HttpProductScraper {
    client: reqwest::Client,
}

impl HttpProductScraper {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("Mozilla/5.0 (compatible; EcoTrace/0.1)")
            .build()
            .map_err(|e| ApiError::Internal(format!("build http client: {}", e)))?;
        Ok(Self { client })
    }

    /// Parse the interesting attributes out of a product page body.
    pub fn parse_document(html: &str) -> ProductInfo {
        let document = Html::parse_document(html);
        let mut info = ProductInfo::default();

        info.title = select_text(&document, "#productTitle")
            .or_else(|| select_text(&document, "title"));

        // Technical detail tables: label cell followed by a value cell
        let row_selector = Selector::parse("tr").expect("static selector");
        let cell_selector = Selector::parse("th, td").expect("static selector");
        for row in document.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|c| c.text().collect::<String>().trim().to_string())
                .collect();
            let [label, value] = match cells.as_slice() {
                [label, value] => [label.to_lowercase(), value.clone()],
                _ => continue,
            };

            if label.contains("weight") && info.raw_product_weight_kg.is_none() {
                info.raw_product_weight_kg = parse_weight_kg(&value);
            } else if label.contains("material") && info.material_type.is_none() {
                info.material_type = Some(value);
            } else if label.contains("dimensions") && info.dimensions_cm.is_none() {
                info.dimensions_cm = Some(value);
            } else if (label.contains("country of origin") || label == "origin")
                && info.origin.is_none()
            {
                info.origin = Some(value);
            }
        }

        // Fall back to free-text sweeps over the whole page
        if info.raw_product_weight_kg.is_none() {
            info.estimated_weight_kg = parse_weight_kg(&document.root_element().text().collect::<String>());
        }
        if info.dimensions_cm.is_none() {
            info.dimensions_cm = DIMENSIONS_REGEX
                .captures(html)
                .map(|c| format!("{} cm", c[1].trim()));
        }

        info
    }
}

#[async_trait]
impl ProductScraper for HttpProductScraper {
    async fn scrape(&self, url: &str) -> Result<ProductInfo, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::ScrapeFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::ScrapeFailed(format!(
                "product page returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::ScrapeFailed(e.to_string()))?;

        let info = Self::parse_document(&body);
        tracing::info!(
            url = %url,
            title = info.title.as_deref().unwrap_or("N/A"),
            "scraped product page"
        );
        Ok(info)
    }
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a human-readable weight into kilograms.
fn parse_weight_kg(text: &str) -> Option<f64> {
    let captures = WEIGHT_REGEX.captures(text)?;
    let value: f64 = captures[1].parse().ok()?;
    let unit = captures[2].to_lowercase();
    if unit.starts_with('g') {
        Some(value / 1000.0)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_units() {
        assert_eq!(parse_weight_kg("Item Weight: 1.2 kg"), Some(1.2));
        assert_eq!(parse_weight_kg("500 g"), Some(0.5));
        assert_eq!(parse_weight_kg("2 Kilograms"), Some(2.0));
        assert_eq!(parse_weight_kg("no weight here"), None);
    }

    #[test]
    fn test_parse_document_table_rows() {
        let html = r#"
            <html><head><title>Fallback</title></head><body>
            <span id="productTitle"> Stainless Steel Bottle </span>
            <table>
              <tr><th>Item Weight</th><td>450 g</td></tr>
              <tr><th>Material</th><td>Stainless Steel</td></tr>
              <tr><th>Product Dimensions</th><td>7 x 7 x 26 cm</td></tr>
              <tr><th>Country of Origin</th><td>China</td></tr>
            </table>
            </body></html>
        "#;
        let info = HttpProductScraper::parse_document(html);
        assert_eq!(info.title.as_deref(), Some("Stainless Steel Bottle"));
        assert_eq!(info.raw_product_weight_kg, Some(0.45));
        assert_eq!(info.material_type.as_deref(), Some("Stainless Steel"));
        assert_eq!(info.origin.as_deref(), Some("China"));
        assert!(info.dimensions_cm.is_some());
    }

    #[test]
    fn test_parse_document_free_text_fallback() {
        let html = "<html><body><p>Ships at 2.5 kg total</p></body></html>";
        let info = HttpProductScraper::parse_document(html);
        assert_eq!(info.raw_product_weight_kg, None);
        assert_eq!(info.estimated_weight_kg, Some(2.5));
    }

    #[test]
    fn test_best_origin_prefers_brand_estimate() {
        let info = ProductInfo {
            brand_estimated_origin: Some("Germany".to_string()),
            origin: Some("China".to_string()),
            ..ProductInfo::default()
        };
        assert_eq!(info.best_origin(), Some("Germany"));
    }

    #[test]
    fn test_best_weight_prefers_listed() {
        let info = ProductInfo {
            raw_product_weight_kg: Some(1.0),
            estimated_weight_kg: Some(0.4),
            ..ProductInfo::default()
        };
        assert_eq!(info.best_weight_kg(), Some(1.0));
    }
}
