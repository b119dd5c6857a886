use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use jobscraper_lib::{
    fields, persist, store, Client, DedupPolicy, JobScraperError, PageSelection, SaveMode,
    ScrapeConfig, Scraper,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str, base: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name))
        .unwrap()
        .replace("{{BASE}}", base)
}

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn unpaced(pages: PageSelection) -> ScrapeConfig {
    ScrapeConfig {
        pages,
        page_delay: Duration::ZERO,
        detail_delay: Duration::ZERO,
        ..ScrapeConfig::default()
    }
}

async fn mount_page(server: &MockServer, route: &str, fixture: &str) {
    let body = load_fixture(fixture, &server.uri());
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn board_with_details(details: &[(&str, &str)]) -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, "/offres-d-emploi", "results_page.html").await;
    for (route, fixture) in details {
        mount_page(&server, route, fixture).await;
    }
    server
}

#[tokio::test]
async fn full_run_writes_two_normalized_records() {
    let server = board_with_details(&[
        ("/offre-d-emploi-1", "detail_apply_info.html"),
        ("/offre-d-emploi-3", "detail_criterias.html"),
    ])
    .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let scraper = Scraper::new(&client, unpaced(PageSelection::Page(1))).with_clock(fixed_now);
    let report = scraper.run().await.unwrap();

    assert_eq!(report.cards, 3);
    assert_eq!(report.malformed, 1);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.requests.listing_pages, 1);
    assert_eq!(report.requests.detail_pages, 2);

    let first = &report.records[0];
    assert_eq!(first.get(fields::TITLE), Some("Ingénieur développement Rust"));
    assert_eq!(first.get(fields::COMPANY), Some("Sonatrach"));
    assert_eq!(first.get(fields::LOCATION), Some("Hydra, Alger"));
    assert_eq!(first.get(fields::RANK), Some("Confirmé / Expérimenté"));
    assert_eq!(first.get(fields::PUBLISH_DATE), Some("09 March 2024"));
    assert_eq!(first.get("Type de contrat"), Some("CDI"));
    assert_eq!(first.get(fields::EXPIRY_DATE), Some("30 Avril 2024"));
    assert_eq!(first.get(fields::SCRAPED_TIME), Some("2024-03-10 09:30:00.000000"));
    assert_eq!(
        first.link(),
        Some(format!("{}/offre-d-emploi-1", server.uri()).as_str())
    );

    let second = &report.records[1];
    assert_eq!(second.get(fields::LOCATION), Some("Béjaïa"));
    assert_eq!(second.get(fields::PUBLISH_DATE), Some("02 Mars 2024"));
    assert_eq!(second.get(fields::EXPIRY_DATE), Some("15 Avril 2024"));
    assert_eq!(second.get("Secteur d'activité"), Some("Agroalimentaire"));

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("jobs.csv");
    let json_path = dir.path().join("jobs.json");
    let written = persist(
        &report.records,
        &[csv_path.clone(), json_path.clone()],
        SaveMode::Append,
        DedupPolicy::ExactRow,
    )
    .unwrap();
    assert_eq!(written, vec![(csv_path.clone(), 2), (json_path.clone(), 2)]);

    for path in [&csv_path, &json_path] {
        let stored = store::load(path).unwrap();
        assert_eq!(stored, report.records);
        assert!(stored.iter().all(|r| r.link().is_some_and(|l| !l.is_empty())));
    }
}

#[tokio::test]
async fn rerun_with_same_clock_does_not_grow_store() {
    let server = board_with_details(&[
        ("/offre-d-emploi-1", "detail_apply_info.html"),
        ("/offre-d-emploi-3", "detail_criterias.html"),
    ])
    .await;
    let client = Client::with_base_url(&server.uri()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("jobs.json");

    for _ in 0..2 {
        let scraper = Scraper::new(&client, unpaced(PageSelection::Page(1))).with_clock(fixed_now);
        let report = scraper.run().await.unwrap();
        persist(
            &report.records,
            std::slice::from_ref(&json_path),
            SaveMode::Append,
            DedupPolicy::ExactRow,
        )
        .unwrap();
    }

    assert_eq!(store::load(&json_path).unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_detail_layout_drops_listing() {
    let server = board_with_details(&[
        ("/offre-d-emploi-1", "detail_unknown_layout.html"),
        ("/offre-d-emploi-3", "detail_criterias.html"),
    ])
    .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let report = Scraper::new(&client, unpaced(PageSelection::Page(1)))
        .with_clock(fixed_now)
        .run()
        .await
        .unwrap();

    assert_eq!(report.unenriched_dropped, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].get(fields::TITLE), Some("Comptable principal"));
}

#[tokio::test]
async fn unknown_detail_layout_kept_when_configured() {
    let server = board_with_details(&[
        ("/offre-d-emploi-1", "detail_unknown_layout.html"),
        ("/offre-d-emploi-3", "detail_criterias.html"),
    ])
    .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let config = ScrapeConfig {
        keep_unenriched: true,
        ..unpaced(PageSelection::Page(1))
    };
    let report = Scraper::new(&client, config)
        .with_clock(fixed_now)
        .run()
        .await
        .unwrap();

    assert_eq!(report.unenriched_kept, 1);
    assert_eq!(report.records.len(), 2);
    let kept = &report.records[0];
    assert_eq!(kept.get(fields::LOCATION), Some("Alger"));
    assert_eq!(kept.get(fields::PUBLISH_DATE), Some("09 March 2024"));
    assert!(kept.contains(fields::SCRAPED_TIME));
}

#[tokio::test]
async fn summary_only_run_skips_detail_pages() {
    let server = board_with_details(&[]).await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let config = ScrapeConfig {
        follow_details: false,
        ..unpaced(PageSelection::Page(1))
    };
    let report = Scraper::new(&client, config)
        .with_clock(fixed_now)
        .run()
        .await
        .unwrap();

    assert_eq!(report.requests.detail_pages, 0);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[1].get(fields::PUBLISH_DATE), Some("02 Mars 2024"));
    assert_eq!(
        report.records[1].get(fields::SCRAPED_TIME),
        Some("2024-03-10 09:30:00.000000")
    );
}

#[tokio::test]
async fn up_to_page_fetches_every_offset() {
    let server = MockServer::start().await;
    let body = load_fixture("results_page.html", &server.uri());
    for start in ["0", "50"] {
        Mock::given(method("GET"))
            .and(path("/offres-d-emploi"))
            .and(query_param("start", start))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = Client::with_base_url(&server.uri()).unwrap();
    let config = ScrapeConfig {
        follow_details: false,
        ..unpaced(PageSelection::UpToPage(2))
    };
    let report = Scraper::new(&client, config)
        .with_clock(fixed_now)
        .run()
        .await
        .unwrap();

    assert_eq!(report.requests.listing_pages, 2);
    assert_eq!(report.records.len(), 4);
}

#[tokio::test]
async fn detail_fetch_failure_aborts_run() {
    let server = board_with_details(&[("/offre-d-emploi-3", "detail_criterias.html")]).await;
    Mock::given(method("GET"))
        .and(path("/offre-d-emploi-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri()).unwrap();
    let result = Scraper::new(&client, unpaced(PageSelection::Page(1)))
        .with_clock(fixed_now)
        .run()
        .await;

    assert!(matches!(
        result,
        Err(JobScraperError::Fetch(jobscraper_lib::jobboard_api::Error::HttpStatus { status: 500, .. }))
    ));
}
