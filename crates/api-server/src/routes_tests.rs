#[cfg(test)]
mod tests {
    use super::super::*;
    use analysis_core::{
        AssetCategory, AssetMetadata, Bar, FundamentalSnapshot, FundamentalsProvider, LookbackPeriod,
        PriceHistoryProvider, PriceSeries, ProviderError,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    struct FixturePrices;

    #[async_trait]
    impl PriceHistoryProvider for FixturePrices {
        async fn price_history(&self, symbol: &str, _period: LookbackPeriod) -> Result<PriceSeries, ProviderError> {
            let closes: Vec<f64> = match symbol {
                // zigzag ending above the SMA, neutral RSI
                "AAA3.SA" => (0..60).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect(),
                // steady decline, oversold
                "BBB3.SA" => (0..60).map(|i| 200.0 - i as f64).collect(),
                "CCC3.SA" => (0..30).map(|i| 50.0 + i as f64).collect(),
                _ => return Err(ProviderError::NoData(symbol.to_string())),
            };
            let start = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
            let bars = closes
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    timestamp: start + ChronoDuration::days(i as i64),
                    open: close,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 250_000.0,
                })
                .collect();
            Ok(PriceSeries::new(symbol, bars).unwrap())
        }
    }

    struct FixtureFundamentals;

    #[async_trait]
    impl FundamentalsProvider for FixtureFundamentals {
        async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, ProviderError> {
            match symbol {
                "AAA3.SA" => Ok(FundamentalSnapshot {
                    pe_ratio: Some(7.9),
                    price_to_book: Some(1.1),
                    return_on_equity: Some(0.24),
                    profit_margin: Some(0.11),
                }),
                _ => Err(ProviderError::Transport("quoteSummary timed out".to_string())),
            }
        }
    }

    fn asset(symbol: &str, sector: &str, subsector: &str) -> AssetMetadata {
        AssetMetadata {
            symbol: symbol.to_string(),
            display_symbol: symbol.trim_end_matches(".SA").to_string(),
            name: format!("{} Agro", symbol),
            sector: sector.to_string(),
            subsector: subsector.to_string(),
            category: AssetCategory::Equity,
            cross_listed: false,
        }
    }

    fn test_state() -> AppState {
        let registry = AssetRegistry::new(vec![
            asset("AAA3.SA", "Agriculture", "Grains"),
            asset("BBB3.SA", "Meatpacking", "Poultry"),
            asset("CCC3.SA", "Food", "Dairy"),
        ])
        .unwrap();

        let orchestrator = AnalysisOrchestrator::new(
            Arc::new(registry),
            Arc::new(FixturePrices),
            Arc::new(FixtureFundamentals),
        )
        .with_config(OrchestratorConfig {
            request_delay: Duration::ZERO,
            ..OrchestratorConfig::default()
        });

        AppState::new(Arc::new(orchestrator), 50.0)
    }

    async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_raw(state: &AppState, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
        send(state, Method::GET, uri, None).await
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let response = build_router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_echoed() {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_list_assets() {
        let state = test_state();

        let (status, json) = get(&state, "/api/assets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);

        let (_, json) = get(&state, "/api/assets?category=bdr").await;
        assert!(json["data"].as_array().unwrap().is_empty());

        let (status, json) = get(&state, "/api/assets?category=crypto").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_get_asset() {
        let state = test_state();

        let (status, json) = get(&state, "/api/assets/aaa3.sa").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["display_symbol"], "AAA3");

        let (status, json) = get(&state, "/api/assets/ZZZZ3.SA").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("ZZZZ3.SA"));
    }

    #[tokio::test]
    async fn test_market_context() {
        let (status, json) = get(&test_state(), "/api/market-context").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["gdp_share"], "24%");
    }

    #[tokio::test]
    async fn test_analyze() {
        let state = test_state();

        let (status, json) = get(&state, "/api/analyze/AAA3.SA").await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["technical"]["score"]["score"], 58.3);
        assert_eq!(data["fundamental"]["score"]["score"], 83.3);
        assert_eq!(data["recommendation"]["final_score"], 66.6);
        assert_eq!(data["recommendation"]["action"], "BUY");
        assert_eq!(data["recommendation"]["priority"], "MEDIUM");
    }

    #[tokio::test]
    async fn test_analyze_failures_map_to_status() {
        let state = test_state();

        let (status, _) = get(&state, "/api/analyze/CCC3.SA").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, json) = get(&state, "/api/analyze/NOPE3.SA").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_chart_without_indicators() {
        let (status, json) = get(&test_state(), "/api/chart/CCC3.SA").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["bars"].as_array().unwrap().len(), 30);
        assert!(json["data"]["indicators"].is_null());
    }

    #[tokio::test]
    async fn test_views_require_a_scan() {
        let state = test_state();
        for uri in ["/api/scan/latest", "/api/dashboard", "/api/sectors", "/api/rankings"] {
            let (status, json) = get(&state, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(json["success"], false);
        }
    }

    #[tokio::test]
    async fn test_scan_stores_report() {
        let state = test_state();

        let (status, json) = send(&state, Method::POST, "/api/scan", None).await;
        assert_eq!(status, StatusCode::OK);
        let report = &json["data"];
        assert_eq!(report["min_score"], 50.0);
        assert_eq!(report["total_scanned"], 3);
        assert_eq!(report["results"].as_array().unwrap().len(), 1);
        assert_eq!(report["below_threshold"], 1);
        assert_eq!(report["failures"][0]["symbol"], "CCC3.SA");
        assert_eq!(report["failures"][0]["reason"]["kind"], "insufficient_history");

        let (status, json) = get(&state, "/api/scan/latest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["results"][0]["asset"]["symbol"], "AAA3.SA");

        let (_, json) = get(&state, "/api/dashboard").await;
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["best"]["symbol"], "AAA3.SA");
    }

    #[tokio::test]
    async fn test_scan_rejects_bad_request() {
        let state = test_state();

        let (status, _) = send(&state, Method::POST, "/api/scan", Some(serde_json::json!({ "min_score": 140 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/scan",
            Some(serde_json::json!({ "categories": ["options"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_scan_body_keeps_last_report() {
        let state = test_state();
        let (status, _) = send(&state, Method::POST, "/api/scan", Some(serde_json::json!({ "min_score": 0 }))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&state, Method::POST, "/api/scan", Some(serde_json::json!({ "min_score": "90" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid scan request"));

        let (status, json) = post_raw(&state, "/api/scan", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (_, json) = get(&state, "/api/scan/latest").await;
        assert_eq!(json["data"]["min_score"], 0.0);
        assert_eq!(json["data"]["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_views_over_full_scan() {
        let state = test_state();
        let (status, _) = send(&state, Method::POST, "/api/scan", Some(serde_json::json!({ "min_score": 0 }))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = get(&state, "/api/sectors").await;
        let sectors = json["data"].as_array().unwrap();
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0]["sector"], "Agriculture");

        let (_, json) = get(&state, "/api/rankings?actions=BUY").await;
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["symbol"], "AAA3.SA");

        let (_, json) = get(&state, "/api/rankings?subsectors=Poultry&max_score=40").await;
        assert_eq!(json["data"][0]["symbol"], "BBB3.SA");

        let (status, _) = get(&state, "/api/rankings?actions=HOLD").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = get(&state, "/api/portfolio?profile=conservative").await;
        assert_eq!(json["data"]["picks"][0]["symbol"], "AAA3.SA");
        assert_eq!(json["data"]["sector_distribution"][0]["count"], 1);

        let (status, _) = get(&state, "/api/portfolio?profile=reckless").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = get(&state, "/api/compare?symbols=bbb3.sa,AAA3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["symbol"], "BBB3.SA");
        assert_eq!(json["data"][1]["trend"], "UP");

        let (status, _) = get(&state, "/api/compare?symbols=AAA3.SA").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
