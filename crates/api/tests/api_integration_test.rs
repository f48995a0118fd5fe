use actix_web::{test, web, App};
use async_trait::async_trait;
use ecotrace_api::dataset::{DatasetLogger, FeedbackLog};
use ecotrace_api::geocode::{Geocoder, PostcodeTable};
use ecotrace_api::routes;
use ecotrace_api::scrape::{ProductInfo, ProductScraper};
use ecotrace_api::{ApiError, AppState};
use ecotrace_core::Coordinates;
use ecotrace_model::{
    DecisionTree, EncoderSet, LabelVocabulary, ModelBundle, RandomForest, ScoringAdapter, TreeNode,
};
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// Scraper that returns a canned product page without any network traffic.
struct StubScraper {
    product: ProductInfo,
}

#[async_trait]
impl ProductScraper for StubScraper {
    async fn scrape(&self, _url: &str) -> Result<ProductInfo, ApiError> {
        Ok(self.product.clone())
    }
}

fn vocab(name: &str, classes: &[&str]) -> LabelVocabulary {
    LabelVocabulary::new(name, classes.iter().map(|s| s.to_string()).collect())
}

/// A one-tree forest over the canonical seven grades, splitting on weight:
/// light products grade "A", heavy products grade "E".
fn test_bundle() -> ModelBundle {
    let mut light = vec![0.0; 7];
    light[1] = 10.0; // "A"
    let mut heavy = vec![0.0; 7];
    heavy[5] = 8.0; // "E"
    heavy[6] = 2.0;

    let tree = DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature: 1,
                threshold: 1.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { class_counts: light },
            TreeNode::Leaf { class_counts: heavy },
        ],
    };
    ModelBundle {
        forest: RandomForest {
            n_classes: 7,
            trees: vec![tree],
            feature_importances: vec![0.35, 0.25, 0.15, 0.15, 0.10],
        },
        encoders: EncoderSet {
            material: vocab("material", &["Aluminium", "Glass", "Other", "Plastic", "Steel"]),
            transport: vocab("transport", &["Air", "Land", "Ship"]),
            recyclability: vocab("recyclability", &["High", "Low", "Medium"]),
            origin: vocab("origin", &["China", "Germany", "Other", "UK"]),
            grade: vocab("grade", &["A+", "A", "B", "C", "D", "E", "F"]),
        },
    }
}

fn test_scraper() -> Arc<dyn ProductScraper> {
    Arc::new(StubScraper {
        product: ProductInfo {
            title: Some("Stainless Steel Bottle".to_string()),
            material_type: Some("stainless steel".to_string()),
            origin: Some("made in china".to_string()),
            raw_product_weight_kg: Some(0.45),
            dimensions_cm: Some("7 x 7 x 26 cm".to_string()),
            ..ProductInfo::default()
        },
    })
}

fn test_geocoder() -> Arc<dyn Geocoder> {
    Arc::new(PostcodeTable::from_entries([
        (
            "SW1A".to_string(),
            Coordinates {
                lat: 51.501,
                lon: -0.141,
            },
        ),
        (
            "M1".to_string(),
            Coordinates {
                lat: 53.477,
                lon: -2.234,
            },
        ),
    ]))
}

fn test_state(dir: &TempDir) -> web::Data<AppState> {
    test_state_with_scraper(dir, test_scraper())
}

fn test_state_with_scraper(dir: &TempDir, scraper: Arc<dyn ProductScraper>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        ScoringAdapter::new(test_bundle()),
        scraper,
        test_geocoder(),
        DatasetLogger::new(dir.path().join("eco_dataset.csv")),
        DatasetLogger::new(dir.path().join("real_scraped_dataset.csv")),
        FeedbackLog::new(dir.path().join("user_feedback.json")),
    ))
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(routes::configure),
        )
        .await
    };
}

// ============================================================================
// Health
// ============================================================================

#[actix_rt::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ecotrace-api");
}

// ============================================================================
// /estimate_emissions
// ============================================================================

#[actix_rt::test]
async fn test_estimate_manual_attributes() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "title": "Water Bottle",
            "material": "plastic",
            "weight": 0.4,
            "origin": "china",
            "postcode": "SW1A 1AA"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Water Bottle");
    let attrs = &body["data"]["attributes"];
    assert_eq!(attrs["material_type"], "Plastic");
    assert_eq!(attrs["origin"], "China");
    // 0.4 kg with packaging uplift, plastic at 3.4 kg CO2/kg
    assert_eq!(attrs["weight_kg"], 0.42);
    assert_eq!(attrs["carbon_kg"], 1.43);
    // Shenzhen to London is air freight territory
    assert_eq!(attrs["transport_mode"], "Air");
    assert_eq!(attrs["emission_factor"], 0.5);
    assert!(attrs["intl_distance_km"].as_f64().unwrap() > 9000.0);
    assert_eq!(attrs["trees_to_offset"], 1);
    // Light product: the stub forest grades it "A"
    assert!(attrs["eco_score_ml"].as_str().unwrap().starts_with("A "));
    // Heuristic grade is one of the canonical seven
    assert!(attrs["eco_score"].is_string());
}

#[actix_rt::test]
async fn test_estimate_missing_input_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({"title": "Mystery Item"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_estimate_unknown_postcode_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "material": "glass",
            "weight": 1.0,
            "postcode": "EC1A 1BB"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_estimate_scraped_product() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "product_url": "https://shop.example.com/product/bottle-123"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["title"], "Stainless Steel Bottle");
    let attrs = &body["data"]["attributes"];
    // "stainless steel" canonicalizes to Steel, "made in china" to China
    assert_eq!(attrs["material_type"], "Steel");
    assert_eq!(attrs["origin"], "China");
    assert_eq!(attrs["raw_product_weight_kg"], 0.45);
    assert_eq!(attrs["dimensions_cm"], "7 x 7 x 26 cm");
}

#[actix_rt::test]
async fn test_estimate_invalid_url_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({"product_url": "not a url"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_estimate_transport_override() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "material": "plastic",
            "weight": 0.4,
            "origin": "china",
            "override_transport_mode": "ship"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let attrs = &body["data"]["attributes"];
    assert_eq!(attrs["transport_mode"], "Ship");
    assert_eq!(attrs["emission_factor"], 0.03);
}

#[actix_rt::test]
async fn test_estimate_without_packaging() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "material": "glass",
            "weight": 2.0,
            "include_packaging": false
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let attrs = &body["data"]["attributes"];
    assert_eq!(attrs["weight_kg"], 2.0);
    assert_eq!(attrs["raw_product_weight_kg"], 2.0);
    assert_eq!(attrs["carbon_kg"], 1.8);
}

#[actix_rt::test]
async fn test_estimate_accepts_string_weight() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "material": "paper",
            "weight": "0.8"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["attributes"]["weight_kg"], 0.84);
}

#[actix_rt::test]
async fn test_estimate_logs_dataset_row() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "title": "Logged Item",
            "material": "cardboard",
            "weight": 0.3
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let rows = state.dataset.read_rows(None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Logged Item");
    assert_eq!(rows[0].material, "Cardboard");
}

#[actix_rt::test]
async fn test_scraped_in_vocabulary_row_reaches_training_log() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    // Stub scraper yields Steel/China, both in the trained vocabularies
    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "product_url": "https://shop.example.com/product/bottle-123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let rows = state.training.read_rows(None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].material, "Steel");
    // The main dataset log gets the row as well
    assert_eq!(state.dataset.read_rows(None).unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_manual_row_kept_out_of_training_log() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({"material": "plastic", "weight": 0.4}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    assert_eq!(state.dataset.read_rows(None).unwrap().len(), 1);
    assert!(state.training.read_rows(None).unwrap().is_empty());
}

#[actix_rt::test]
async fn test_out_of_vocabulary_scrape_kept_out_of_training_log() {
    let dir = TempDir::new().unwrap();
    // Bamboo matches no fuzzy keyword and is absent from the material
    // vocabulary, so the row is not clean training data
    let scraper: Arc<dyn ProductScraper> = Arc::new(StubScraper {
        product: ProductInfo {
            title: Some("Bamboo Cup".to_string()),
            material_type: Some("bamboo".to_string()),
            raw_product_weight_kg: Some(0.2),
            ..ProductInfo::default()
        },
    });
    let state = test_state_with_scraper(&dir, scraper);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({
            "product_url": "https://shop.example.com/product/cup-9"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    assert_eq!(state.dataset.read_rows(None).unwrap().len(), 1);
    assert!(state.training.read_rows(None).unwrap().is_empty());
}

// ============================================================================
// /predict
// ============================================================================

#[actix_rt::test]
async fn test_predict_returns_full_detail() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({
            "material": "Glass",
            "weight": 0.5,
            "transport": "Ship",
            "recyclability": "High",
            "origin": "UK"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["predicted_label"], "A");
    assert_eq!(body["confidence"], "100%");
    assert_eq!(body["raw_input"]["material"], "Glass");
    assert_eq!(body["encoded_input"]["material"], 1);
    assert!(body["feature_impact"]["weight"].is_number());
}

#[actix_rt::test]
async fn test_predict_defaults_missing_attributes() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({}))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    // Everything falls back: Other material, 0.5 kg, Land, Medium, Other
    assert_eq!(body["raw_input"]["material"], "Other");
    assert_eq!(body["raw_input"]["weight"], 0.5);
    assert_eq!(body["predicted_label"], "A");
}

#[actix_rt::test]
async fn test_predict_out_of_vocabulary_material_still_grades() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(serde_json::json!({
            "material": "Vibranium",
            "weight": 0.3
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    // Vibranium substitutes the default material, index 2 in the vocabulary
    assert_eq!(body["encoded_input"]["material"], 2);
    let label = body["predicted_label"].as_str().unwrap();
    assert!(["A+", "A", "B", "C", "D", "E", "F"].contains(&label));
}

// ============================================================================
// Insights and feedback
// ============================================================================

#[actix_rt::test]
async fn test_feature_importance_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::get()
        .uri("/api/feature-importance")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let importances = body["feature_importance"].as_array().unwrap();
    assert_eq!(importances.len(), 5);
    assert_eq!(importances[0]["feature"], "material");
    assert_eq!(importances[0]["importance_pct"], 35.0);
    assert_eq!(body["classes"].as_array().unwrap().len(), 7);
}

#[actix_rt::test]
async fn test_eco_data_returns_logged_rows() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    for title in ["First", "Second", "Third"] {
        let req = test::TestRequest::post()
            .uri("/estimate_emissions")
            .set_json(serde_json::json!({"title": title, "material": "glass", "weight": 1.0}))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/eco-data?limit=2")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["rows"][0]["title"], "First");
}

#[actix_rt::test]
async fn test_insights_dashboard_aggregates() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/estimate_emissions")
        .set_json(serde_json::json!({"material": "plastic", "weight": 0.4}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/insights").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_products"], 1);
    assert!(body["avg_carbon_kg"].as_f64().unwrap() > 0.0);
    // All seven grades present in canonical order, zero-filled
    let grades = body["grades"].as_array().unwrap();
    assert_eq!(grades.len(), 7);
    assert_eq!(grades[0]["grade"], "A+");
    assert_eq!(body["materials"]["Plastic"], 1);
    // The capped rows ride along with the aggregates
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["rows"][0]["material"], "Plastic");
}

#[actix_rt::test]
async fn test_feedback_saved() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/feedback")
        .set_json(serde_json::json!({
            "title": "Water Bottle",
            "predicted_score": "B",
            "corrected_score": "C"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "saved");

    let raw = std::fs::read_to_string(dir.path().join("user_feedback.json")).unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["corrected_score"], "C");
}

#[actix_rt::test]
async fn test_empty_feedback_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app!(test_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/feedback")
        .set_json(serde_json::json!({"title": "Water Bottle"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
