use covenant_di::{
    property_injection_hook, Constructors, DiError, Injectable, InjectorConfiguration, Properties, Resolver,
};
use parking_lot::Mutex;
use std::sync::Arc;

struct Clock {
    now: u64,
}

struct Report {
    clock: Mutex<Option<Arc<Clock>>>,
    title: Mutex<Option<Arc<String>>>,
}

impl Report {
    fn empty() -> Self {
        Report {
            clock: Mutex::new(None),
            title: Mutex::new(None),
        }
    }
}

impl Injectable for Report {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", Report::empty);
    }

    fn properties(p: &mut Properties<Self>) {
        p.settable("clock", |r: &Report, clock: Arc<Clock>| *r.clock.lock() = Some(clock))
            .injected();
        p.settable("title", |r: &Report, title: Arc<String>| *r.title.lock() = Some(title));
    }
}

fn clock_and_title() -> InjectorConfiguration {
    let mut config = InjectorConfiguration::new();
    config.bind::<Clock>().to_instance(Arc::new(Clock { now: 7 }));
    config.bind::<String>().to_instance(Arc::new("weekly".to_string()));
    config
}

#[test]
fn hook_injects_marked_properties_only() {
    let mut config = clock_and_title();
    config.add_creation_hook_arc(property_injection_hook());

    let injector = config.build().unwrap();
    let report = injector.create_instance::<Report>().unwrap();
    assert_eq!(report.clock.lock().as_ref().map(|c| c.now), Some(7));
    assert!(report.title.lock().is_none());
}

#[test]
fn properties_stay_empty_without_the_hook() {
    let injector = clock_and_title().build().unwrap();
    let report = injector.create_instance::<Report>().unwrap();
    assert!(report.clock.lock().is_none());
}

#[test]
fn configuration_can_mark_properties() {
    let mut config = clock_and_title();
    config.add_creation_hook_arc(property_injection_hook());
    config.mark_injected_property::<Report>("title").unwrap();

    let injector = config.build().unwrap();
    let report = injector.create_instance::<Report>().unwrap();
    assert_eq!(report.title.lock().as_deref().map(String::as_str), Some("weekly"));
    assert!(report.clock.lock().is_some());
}

#[test]
fn explicit_injection_into_existing_instance() {
    let injector = clock_and_title().build().unwrap();
    let report = Arc::new(Report::empty());
    injector.inject_properties(&report).unwrap();
    assert_eq!(report.clock.lock().as_ref().map(|c| c.now), Some(7));
}

#[test]
fn unresolvable_property_fails_creation() {
    let mut config = InjectorConfiguration::new();
    config.add_creation_hook_arc(property_injection_hook());
    config.bind::<Report>().to_self();

    let injector = config.build().unwrap();
    match injector.get::<Report>() {
        Err(DiError::NotFound(name)) => assert_eq!(name, std::any::type_name::<Clock>()),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

struct Frozen {
    clock: Option<Arc<Clock>>,
}

impl Injectable for Frozen {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Frozen { clock: None });
    }

    fn properties(p: &mut Properties<Self>) {
        p.read_only::<Arc<Clock>>("clock").injected();
    }
}

#[test]
fn marked_read_only_property_is_missing_setter() {
    let mut config = clock_and_title();
    config.add_creation_hook_arc(property_injection_hook());

    let injector = config.build().unwrap();
    match injector.create_instance::<Frozen>() {
        Err(DiError::MissingSetter { property, type_name }) => {
            assert_eq!(property, "clock");
            assert_eq!(type_name, std::any::type_name::<Frozen>());
        }
        other => panic!("expected MissingSetter, got {:?}", other.map(|f| f.clock.is_some())),
    }
}

#[test]
fn property_metadata_is_exposed() {
    let injector = InjectorConfiguration::new().build().unwrap();
    let metadata = injector.metadata_of::<Report>();
    let names: Vec<_> = metadata.properties().iter().map(|p| (p.name(), p.is_injected())).collect();
    assert_eq!(names, vec![("clock", true), ("title", false)]);
    assert!(metadata.properties().iter().all(|p| p.has_setter()));
    assert_eq!(
        metadata.properties()[0].key().display_name(),
        std::any::type_name::<Clock>()
    );
}
