use covenant_di::{DiError, Injector, InjectorConfiguration, Method, PanicCause};
use std::sync::Arc;

struct Rate(f64);

fn injector() -> Injector {
    let mut config = InjectorConfiguration::new();
    config.bind::<Rate>().to_instance(Arc::new(Rate(1.5)));
    config.bind::<u32>().to_instance(Arc::new(10));
    config.build().unwrap()
}

#[test]
fn method_parameters_are_resolved_in_order() {
    let price = Method::new(|rate: Arc<Rate>, amount: Arc<u32>| rate.0 * f64::from(*amount));
    assert_eq!(price.parameters().len(), 2);
    assert_eq!(price.parameters()[0].display_name(), std::any::type_name::<Rate>());
    assert_eq!(price.return_type_name(), "f64");

    assert_eq!(injector().execute_method::<f64>(&price).unwrap(), 15.0);
}

#[test]
fn wrong_return_type_fails_before_resolving() {
    // Nothing is bound for String, so resolving would fail with NotFound
    let describe = Method::new(|name: Arc<String>| name.len());
    match injector().execute_method::<String>(&describe) {
        Err(DiError::ReturnTypeMismatch { expected, actual }) => {
            assert_eq!(expected, std::any::type_name::<String>());
            assert_eq!(actual, "usize");
        }
        other => panic!("expected ReturnTypeMismatch, got {other:?}"),
    }
    assert!(matches!(
        injector().execute_method::<usize>(&describe),
        Err(DiError::NotFound(_))
    ));
}

#[test]
fn methods_can_receive_the_injector_and_collections() {
    let injector = injector();
    let count = injector
        .execute(|injector: Injector, rates: Vec<Arc<Rate>>| (injector.descriptors().len(), rates.len()))
        .unwrap();
    assert_eq!(count, (3, 1));
}

#[test]
fn method_panic_becomes_creation_failure() {
    let failing = Method::new(|| -> u8 { panic!("no luck") });
    match injector().execute_method::<u8>(&failing) {
        Err(DiError::Creation { source, .. }) => {
            assert_eq!(source.downcast_ref::<PanicCause>().map(|c| c.0.as_str()), Some("no luck"));
        }
        other => panic!("expected creation failure, got {other:?}"),
    }
}

#[test]
fn methods_are_reusable() {
    let injector = injector();
    let read = Method::new(|amount: Arc<u32>| *amount + 1);
    assert_eq!(injector.execute_method::<u32>(&read).unwrap(), 11);
    assert_eq!(injector.execute_method::<u32>(&read).unwrap(), 11);
}
