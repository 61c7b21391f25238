use super::*;
use crate::pipeline::build_http_client;
use crate::test_helpers::test_config;
use tempfile::{TempDir, tempdir};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scheduler over a pipeline whose feed always answers 503 after `delay`
async fn scheduler_with_feed_delay(
    delay: Duration,
) -> (Scheduler, broadcast::Receiver<Event>, MockServer, TempDir) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_delay(delay))
        .mount(&server)
        .await;

    let root = tempdir().unwrap();
    let config = test_config(root.path(), &format!("{}/r/earthporn/hot", server.uri()));
    let (tx, rx) = broadcast::channel(1000);
    let client = build_http_client(&config.feed).unwrap();
    let pipeline = Arc::new(AcquisitionPipeline::new(&config, client, tx.clone()));
    let scheduler = Scheduler::new(pipeline, Duration::from_millis(50), tx);

    (scheduler, rx, server, root)
}

async fn wait_for(
    rx: &mut broadcast::Receiver<Event>,
    pred: impl Fn(&Event) -> bool,
) -> Option<Event> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}

fn count_runs(rx: &mut broadcast::Receiver<Event>) -> usize {
    let mut runs = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, Event::AcquisitionStarted) {
            runs += 1;
        }
    }
    runs
}

#[tokio::test]
async fn starts_disabled() {
    let (scheduler, _rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;
    assert!(!scheduler.is_enabled());
    assert_eq!(scheduler.interval(), Duration::from_millis(50));
}

#[tokio::test]
async fn enable_twice_keeps_one_timer() {
    let (scheduler, mut rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;

    assert!(scheduler.enable());
    assert!(!scheduler.enable(), "second enable must be a no-op");
    assert!(scheduler.is_enabled());

    let changes = {
        let mut n = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, Event::ScheduleChanged { enabled: true }) {
                n += 1;
            }
        }
        n
    };
    assert_eq!(changes, 1);

    assert!(scheduler.disable());
    assert!(!scheduler.is_enabled());
}

#[tokio::test]
async fn disable_when_disabled_is_a_no_op() {
    let (scheduler, mut rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;

    assert!(!scheduler.disable());
    assert!(!scheduler.disable());
    assert!(rx.try_recv().is_err(), "no events for a no-op disable");
}

#[tokio::test]
async fn ticks_run_the_pipeline() {
    let (scheduler, mut rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;

    scheduler.enable();
    let finished = wait_for(&mut rx, |e| matches!(e, Event::AcquisitionFinished { .. })).await;
    scheduler.disable();

    assert!(
        matches!(
            finished,
            Some(Event::AcquisitionFinished {
                downloaded: 0,
                invalid: 0
            })
        ),
        "scheduled run should finish with an empty result"
    );
}

#[tokio::test]
async fn first_tick_waits_one_interval() {
    let server = MockServer::start().await;
    let root = tempdir().unwrap();
    let config = test_config(root.path(), &format!("{}/r/earthporn/hot", server.uri()));
    let (tx, mut rx) = broadcast::channel(1000);
    let pipeline = Arc::new(AcquisitionPipeline::new(
        &config,
        build_http_client(&config.feed).unwrap(),
        tx.clone(),
    ));
    let scheduler = Scheduler::new(pipeline, Duration::from_secs(3600), tx);

    scheduler.enable();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count_runs(&mut rx), 0);
    scheduler.disable();
}

#[tokio::test]
async fn disable_stops_future_ticks() {
    let (scheduler, mut rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;

    scheduler.enable();
    wait_for(&mut rx, |e| matches!(e, Event::AcquisitionFinished { .. }))
        .await
        .expect("at least one scheduled run");
    scheduler.disable();

    // Let anything already in flight settle, then make sure nothing new starts.
    tokio::time::sleep(Duration::from_millis(150)).await;
    count_runs(&mut rx);
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(count_runs(&mut rx), 0);
}

#[tokio::test]
async fn disable_lets_in_flight_run_complete() {
    let (scheduler, mut rx, _server, _root) =
        scheduler_with_feed_delay(Duration::from_millis(300)).await;

    scheduler.enable();
    wait_for(&mut rx, |e| matches!(e, Event::AcquisitionStarted))
        .await
        .expect("run should start");
    scheduler.disable();

    let finished = wait_for(&mut rx, |e| matches!(e, Event::AcquisitionFinished { .. })).await;
    assert!(finished.is_some(), "in-flight run must not be interrupted");
}

#[tokio::test]
async fn can_be_re_enabled() {
    let (scheduler, mut rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;

    assert!(scheduler.set_enabled(true));
    assert!(scheduler.set_enabled(false));
    assert!(scheduler.set_enabled(true));
    assert!(
        wait_for(&mut rx, |e| matches!(e, Event::AcquisitionFinished { .. }))
            .await
            .is_some()
    );
    assert!(scheduler.set_enabled(false));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn toggles_from_a_thread_outside_the_runtime() {
    let (scheduler, mut rx, _server, _root) = scheduler_with_feed_delay(Duration::ZERO).await;

    let enabled = std::thread::scope(|s| s.spawn(|| scheduler.enable()).join().unwrap());
    assert!(enabled);
    assert!(scheduler.is_enabled());

    assert!(
        wait_for(&mut rx, |e| matches!(e, Event::AcquisitionFinished { .. }))
            .await
            .is_some(),
        "timer started from a foreign thread must tick"
    );

    let disabled = std::thread::scope(|s| s.spawn(|| scheduler.disable()).join().unwrap());
    assert!(disabled);
    assert!(!scheduler.is_enabled());
}
