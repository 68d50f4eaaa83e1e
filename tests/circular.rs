use covenant_di::{Constructors, DiError, Injectable, InjectorConfiguration, InjectorOptions, Resolver};
use std::any::type_name;
use std::sync::Arc;

struct Alpha {
    _beta: Arc<Beta>,
}

impl Injectable for Alpha {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |beta: Arc<Beta>| Alpha { _beta: beta });
    }
}

struct Beta {
    _alpha: Arc<Alpha>,
}

impl Injectable for Beta {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |alpha: Arc<Alpha>| Beta { _alpha: alpha });
    }
}

#[test]
fn constructor_cycle_reports_full_path() {
    let mut config = InjectorConfiguration::new();
    config.bind::<Alpha>().to_self();
    config.bind::<Beta>().to_self();
    let injector = config.build().unwrap();

    match injector.get::<Alpha>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path, vec![type_name::<Alpha>(), type_name::<Beta>(), type_name::<Alpha>()]);
        }
        other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn singleton_cycle_fails_instead_of_deadlocking() {
    let mut config = InjectorConfiguration::new();
    config.bind::<Alpha>().to_self().as_singleton();
    config.bind::<Beta>().to_self().as_singleton();
    let injector = config.build().unwrap();

    assert!(matches!(injector.get::<Beta>(), Err(DiError::Circular(_))));
    // Nothing was cached and the resolution stack was unwound
    assert!(matches!(injector.get::<Alpha>(), Err(DiError::Circular(_))));
}

#[test]
fn factory_requesting_itself_is_a_cycle() {
    let mut config = InjectorConfiguration::new();
    config
        .bind::<String>()
        .to_try_factory(|injector| injector.get::<String>());
    let injector = config.build().unwrap();

    match injector.get::<String>() {
        Err(DiError::Circular(path)) => assert_eq!(path.len(), 2),
        other => panic!("expected a cycle, got {:?}", other),
    }
}

#[test]
fn uncontracted_type_requested_as_parameter_is_not_found() {
    let mut config = InjectorConfiguration::new();
    config.bind::<Beta>().to_self();
    let injector = config.build().unwrap();

    // Alpha has no contract, but Beta needs an Alpha
    assert!(matches!(
        injector.create_instance::<Alpha>(),
        Err(DiError::NotFound(name)) if name == type_name::<Alpha>()
    ));
}

struct Level0;
struct Level1;
struct Level2;
struct Level3;

impl Injectable for Level0 {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |_: Arc<Level1>| Level0);
    }
}

impl Injectable for Level1 {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |_: Arc<Level2>| Level1);
    }
}

impl Injectable for Level2 {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |_: Arc<Level3>| Level2);
    }
}

impl Injectable for Level3 {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Level3);
    }
}

fn levels(max_depth: usize) -> covenant_di::Injector {
    let mut config = InjectorConfiguration::new();
    config.with_options(InjectorOptions::default().with_max_depth(max_depth));
    config.bind::<Level0>().to_self();
    config.bind::<Level1>().to_self();
    config.bind::<Level2>().to_self();
    config.bind::<Level3>().to_self();
    config.build().unwrap()
}

#[test]
fn deep_chains_are_bounded() {
    assert!(matches!(levels(3).get::<Level0>(), Err(DiError::DepthExceeded(3))));
    assert!(levels(4).get::<Level0>().is_ok());
    assert!(levels(3).get::<Level1>().is_ok());
}

#[test]
fn repeated_dependencies_are_not_cycles() {
    struct Pair {
        _left: Arc<Level3>,
        _right: Arc<Level3>,
    }
    impl Injectable for Pair {
        fn constructors(c: &mut Constructors<Self>) {
            c.public("new", |left: Arc<Level3>, right: Arc<Level3>| Pair {
                _left: left,
                _right: right,
            });
        }
    }

    let injector = levels(8);
    assert!(injector.create_instance::<Pair>().is_ok());
}

#[test]
fn delegating_to_another_injector_is_not_a_cycle() {
    let mut config = InjectorConfiguration::new();
    config.bind::<String>().to_instance(Arc::new(String::from("inner")));
    let inner = config.build().unwrap();

    let mut config = InjectorConfiguration::new();
    config
        .bind::<String>()
        .to_try_factory(move |_| inner.get::<String>());
    let outer = config.build().unwrap();

    assert_eq!(outer.get::<String>().unwrap().as_str(), "inner");
}
