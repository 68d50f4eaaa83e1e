use covenant_di::{
    Constructors, DiError, DiObserver, Injectable, InjectorConfiguration, Key, LoggingObserver, MetricsObserver,
    Resolver,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct Engine;

impl Injectable for Engine {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Engine);
    }
}

struct Car {
    _engine: Arc<Engine>,
}

impl Injectable for Car {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |engine: Arc<Engine>| Car { _engine: engine });
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl DiObserver for Recorder {
    fn resolving(&self, key: &Key) {
        self.events.lock().push(format!("resolving {}", short(key.display_name())));
    }

    fn resolved(&self, key: &Key, _duration: Duration) {
        self.events.lock().push(format!("resolved {}", short(key.display_name())));
    }

    fn resolution_failed(&self, key: &Key, _error: &DiError) {
        self.events.lock().push(format!("failed {}", short(key.display_name())));
    }

    fn created(&self, type_name: &'static str, _duration: Duration) {
        self.events.lock().push(format!("created {}", short(type_name)));
    }
}

fn short(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

#[test]
fn observers_see_outward_requests_only() {
    let recorder = Arc::new(Recorder::default());
    let mut config = InjectorConfiguration::new();
    config.add_observer(recorder.clone());
    config.bind::<Engine>().to_self();
    config.bind::<Car>().to_self();

    let injector = config.build().unwrap();
    injector.get::<Car>().unwrap();
    assert!(injector.get::<String>().is_err());

    assert_eq!(
        *recorder.events.lock(),
        vec![
            "resolving Car",
            "created Engine",
            "created Car",
            "resolved Car",
            "resolving String",
            "failed String",
        ]
    );
}

#[test]
fn metrics_count_resolutions_and_creations() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let metrics = Arc::new(MetricsObserver::new());
    let mut config = InjectorConfiguration::new();
    config.add_observer(metrics.clone());
    config.add_observer(Arc::new(LoggingObserver::new()));
    config.bind::<Engine>().to_self().as_singleton();
    config.bind::<Car>().to_self();

    let injector = config.build().unwrap();
    for _ in 0..3 {
        injector.get::<Car>().unwrap();
    }
    let _ = injector.get::<u8>();

    assert_eq!(metrics.resolution_count(), 3);
    assert_eq!(metrics.failure_count(), 1);
    // One engine, three cars
    assert_eq!(metrics.creation_count(), 4);
    assert!(metrics.average_resolution_time().is_some());

    metrics.reset();
    assert_eq!(metrics.resolution_count(), 0);
    assert_eq!(metrics.average_resolution_time(), None);
}
