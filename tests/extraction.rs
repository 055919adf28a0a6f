use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use price_scout::error::RequiredField;
use price_scout::fetcher::PageFetcher;
use price_scout::{
    ExtractionError, Extractor, FetchError, SelectionMode, StrategyError, StrategyKind,
};
use reqwest::StatusCode;
use url::Url;

/// Serves canned pages; unknown URLs answer 404.
struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn with(pages: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            pages: pages
                .iter()
                .map(|(url, html)| {
                    let key = Url::parse(url).expect("fixture url").to_string();
                    (key, (*html).to_string())
                })
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or(FetchError::Status {
                status: StatusCode::NOT_FOUND,
            })
    }
}

const SALLA_URL: &str = "https://Demo.Salla.sa/abaya/p1883420";
const SALLA_PAGE: &str = r#"<html><head>
    <title>عباية - متجر ديمو</title>
    <meta property="product:retailer_item_id" content="1883420">
    <meta property="product:price:amount" content="249.00">
    <meta property="product:price:currency" content="SAR">
    <script type="application/ld+json">
    {"@type":"Product","name":"عباية كريب","offers":{"price":"199.00","priceCurrency":"SAR"}}
    </script>
</head></html>"#;

const DAREN_URL: &str = "https://www.darenfactory.com/ar/sofa";
const DAREN_PAGE: &str = "<title>كنب - دارين</title><body><span>٢٥</span><span>١٢٩٩</span></body>";

const ZID_URL: &str = "https://store.example/products/mug";
const ZID_PAGE: &str = r#"<h1>Stoneware Mug</h1>
    <script type="application/ld+json">{"@type":"Product","offers":{"price":"35"}}</script>"#;

const GENERIC_URL: &str = "https://shoes.example/trail";
const GENERIC_PAGE: &str = r#"<html><head>
    <title>Trail Runner - Best Store</title>
    <meta name="keywords" content="Shoes, shoes, Running">
</head><body><span class="price">SAR 49</span></body></html>"#;

#[tokio::test]
async fn structural_mode_prefers_salla_and_structured_price() {
    let fetcher = StubFetcher::with(&[(SALLA_URL, SALLA_PAGE)]);
    let extractor = Extractor::with_fetcher(fetcher, SelectionMode::Structural);

    let record = extractor.extract(SALLA_URL).await.expect("record");
    assert_eq!(record.strategy, StrategyKind::Salla);
    assert_eq!(record.name, "عباية كريب");
    assert_eq!(record.price, 199.0);
    assert_eq!(record.sku.as_deref(), Some("1883420"));
    assert_eq!(record.website, "demo.salla.sa");
    assert_eq!(record.url, SALLA_URL);
}

#[tokio::test]
async fn domain_mode_uses_legacy_strategy() {
    let fetcher = StubFetcher::with(&[(DAREN_URL, DAREN_PAGE)]);
    let extractor = Extractor::with_fetcher(fetcher, SelectionMode::Domain);

    let record = extractor.extract(DAREN_URL).await.expect("record");
    assert_eq!(record.strategy, StrategyKind::DarenFactory);
    assert_eq!(record.name, "كنب");
    assert_eq!(record.price, 25.0);
    assert_eq!(record.website, "www.darenfactory.com");
}

#[tokio::test]
async fn generic_page_with_title_and_price_class() {
    let fetcher = StubFetcher::with(&[(GENERIC_URL, GENERIC_PAGE)]);
    let extractor = Extractor::with_fetcher(fetcher, SelectionMode::Structural);

    let record = extractor.extract(GENERIC_URL).await.expect("record");
    assert_eq!(record.strategy, StrategyKind::Generic);
    assert_eq!(record.name, "Trail Runner");
    assert_eq!(record.price, 49.0);
    assert_eq!(record.keywords_line().as_deref(), Some("running, shoes"));
}

#[tokio::test]
async fn platform_failure_is_not_retried_generically() {
    let fetcher = StubFetcher::with(&[(ZID_URL, ZID_PAGE)]);
    let extractor = Extractor::with_fetcher(fetcher, SelectionMode::Structural);

    match extractor.extract(ZID_URL).await {
        Err(ExtractionError::Strategy {
            url,
            domain,
            strategy,
            source,
        }) => {
            assert_eq!(url, ZID_URL);
            assert_eq!(domain, "store.example");
            assert_eq!(strategy, StrategyKind::Zid);
            assert_eq!(source, StrategyError::MissingName);
        }
        other => panic!("expected a Zid strategy error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_page_fails_with_missing_required_field() {
    let url = "https://blank.example/item";
    let fetcher = StubFetcher::with(&[(url, "<html><head><title></title></head><body></body></html>")]);
    let extractor = Extractor::with_fetcher(fetcher, SelectionMode::Structural);

    let err = extractor.extract(url).await.expect_err("no record");
    assert!(err.is_unsupported_site());
    match err {
        ExtractionError::Strategy { source, .. } => {
            assert_eq!(source.missing_field(), RequiredField::Name);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn fetch_failure_aborts_before_any_strategy() {
    let fetcher = StubFetcher::with(&[]);
    let extractor = Extractor::with_fetcher(fetcher.clone(), SelectionMode::Structural);

    let err = extractor.extract("https://gone.example/p").await.expect_err("404");
    assert!(matches!(
        err,
        ExtractionError::Fetch {
            source: FetchError::Status { .. },
            ..
        }
    ));
    assert_eq!(err.url(), "https://gone.example/p");
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_url_is_rejected_without_fetching() {
    let fetcher = StubFetcher::with(&[]);
    let extractor = Extractor::with_fetcher(fetcher.clone(), SelectionMode::Structural);

    let err = extractor.extract("mailto:shop@example.com").await.expect_err("invalid");
    assert!(matches!(err, ExtractionError::InvalidUrl { .. }));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_isolates_failures_and_keeps_order() {
    let fetcher = StubFetcher::with(&[(GENERIC_URL, GENERIC_PAGE), (SALLA_URL, SALLA_PAGE)]);
    let extractor = Extractor::with_fetcher(fetcher, SelectionMode::Structural);

    let results = extractor
        .extract_many([GENERIC_URL, "https://gone.example/p", SALLA_URL])
        .await;

    let urls: Vec<&str> = results.iter().map(|(url, _)| url.as_str()).collect();
    assert_eq!(urls, [GENERIC_URL, "https://gone.example/p", SALLA_URL]);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(ExtractionError::Fetch { .. })));
    assert!(results[2].1.is_ok());
}

#[test]
fn extract_document_skips_the_network() {
    let extractor = Extractor::with_fetcher(StubFetcher::with(&[]), SelectionMode::Domain);
    let record = extractor
        .extract_document(
            "https://regine-sa.com/products/dress",
            "<h1>فستان</h1><h1>٤٩٠ ر.س</h1>".to_string(),
        )
        .expect("record");
    assert_eq!(record.strategy, StrategyKind::RegineSa);
    assert_eq!(record.price, 490.0);
    assert_eq!(record.website, "regine-sa.com");
}
