//! The journey archetype carries a trending book id through its steps

mod common;

use anyhow::Result;
use common::{fast_plan, StubServer, TRENDING_BOOK_IDS};
use dracin_config::DracinConfig;
use dracin_scenarios::catalog::JOURNEY_SEARCH_TERMS;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_journey_uses_trending_book_ids() -> Result<()> {
    let server = StubServer::spawn(&[]).await?;

    let mut config = DracinConfig::default();
    config.scenarios.archetypes = vec!["journey".to_string()];
    config.load.users = 2;
    config.load.hatch_rate = "2".to_string();
    config.load.run_time = Duration::from_secs(3);
    let plan = fast_plan(&mut config, &server)?;

    let report = dracin_runner::run(&plan).await?;
    assert_eq!(report.summary.total_failures(), 0);

    for name in [
        "/api/health",
        "/api/dramabox/trending",
        "/api/[source]/search",
        "/api/dramabox/detail",
        "/api/dramabox/allstreams",
        "/api/dramabox/stream",
    ] {
        assert!(
            report.summary.endpoint(name).is_some(),
            "journey never reached {}",
            name
        );
    }

    for hit in server.hits_to("/api/dramabox/search") {
        assert!(JOURNEY_SEARCH_TERMS.contains(&hit.query["query"].as_str()));
    }

    let detail_steps = [
        "/api/dramabox/detail",
        "/api/dramabox/allstreams",
        "/api/dramabox/stream",
    ];
    for path in detail_steps {
        let hits = server.hits_to(path);
        assert!(!hits.is_empty());
        for hit in hits {
            let book_id = &hit.query["bookId"];
            assert!(
                TRENDING_BOOK_IDS.contains(&book_id.as_str()),
                "{} used book id {} not listed by trending",
                path,
                book_id
            );
        }
    }

    for hit in server.hits_to("/api/dramabox/stream") {
        assert_eq!(hit.query["episode"], "1");
    }

    Ok(())
}
