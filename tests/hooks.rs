use covenant_di::{
    Constructors, CreatedInstance, CreationHook, DiError, DiResult, Injectable, Injector, InjectorConfiguration,
    PanicCause, Resolver,
};
use parking_lot::Mutex;
use std::sync::Arc;

struct Widget {
    label: Mutex<String>,
}

impl Injectable for Widget {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Widget {
            label: Mutex::new(String::new()),
        });
    }
}

struct Gadget;

impl Injectable for Gadget {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", || Gadget);
    }
}

#[test]
fn hooks_run_in_registration_order() {
    let mut config = InjectorConfiguration::new();
    config
        .add_creation_hook(|_, created| {
            if let Some(widget) = created.downcast::<Widget>() {
                widget.label.lock().push('a');
            }
            Ok(())
        })
        .add_creation_hook(|_, created| {
            if let Some(widget) = created.downcast::<Widget>() {
                widget.label.lock().push('b');
            }
            Ok(())
        });

    let injector = config.build().unwrap();
    let widget = injector.create_instance::<Widget>().unwrap();
    assert_eq!(widget.label.lock().as_str(), "ab");
}

#[test]
fn hooks_run_once_per_instance_and_see_the_returned_arc() {
    const CREATED: usize = 5;
    let seen: Arc<Mutex<Vec<Arc<Widget>>>> = Arc::default();
    let log = seen.clone();

    let mut config = InjectorConfiguration::new();
    config.add_creation_hook(move |_, created| {
        if let Some(widget) = created.downcast::<Widget>() {
            log.lock().push(widget);
        }
        Ok(())
    });

    let injector = config.build().unwrap();
    let widgets: Vec<_> = (0..CREATED)
        .map(|_| injector.create_instance::<Widget>().unwrap())
        .collect();

    let seen = seen.lock();
    assert_eq!(seen.len(), CREATED);
    for (hooked, returned) in seen.iter().zip(&widgets) {
        assert!(Arc::ptr_eq(hooked, returned));
    }
}

#[test]
fn hooks_see_every_constructed_type() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    let mut config = InjectorConfiguration::new();
    config.bind::<Gadget>().to_self();
    config.add_creation_hook(move |_, created| {
        log.lock().push((created.type_name(), created.is::<Widget>()));
        Ok(())
    });

    let injector = config.build().unwrap();
    injector.create_instance::<Widget>().unwrap();
    injector.get::<Gadget>().unwrap();

    assert_eq!(
        *seen.lock(),
        vec![
            (std::any::type_name::<Widget>(), true),
            (std::any::type_name::<Gadget>(), false),
        ]
    );
}

#[test]
fn hooks_skip_instances_and_factories() {
    let count = Arc::new(Mutex::new(0));
    let counter = count.clone();

    let mut config = InjectorConfiguration::new();
    config.bind::<Gadget>().to_instance(Arc::new(Gadget));
    config.bind::<Widget>().to_factory(|_| {
        Arc::new(Widget {
            label: Mutex::new("factory".into()),
        })
    });
    config.add_creation_hook(move |_, _| {
        *counter.lock() += 1;
        Ok(())
    });

    let injector = config.build().unwrap();
    injector.get::<Gadget>().unwrap();
    assert_eq!(injector.get::<Widget>().unwrap().label.lock().as_str(), "factory");
    assert_eq!(*count.lock(), 0);
}

#[test]
fn hooks_may_resolve_from_the_injector() {
    let mut config = InjectorConfiguration::new();
    config.bind::<String>().to_instance(Arc::new("resolved".to_string()));
    config.add_creation_hook(|injector, created| {
        if let Some(widget) = created.downcast::<Widget>() {
            *widget.label.lock() = injector.get::<String>()?.to_string();
        }
        Ok(())
    });

    let injector = config.build().unwrap();
    assert_eq!(injector.create_instance::<Widget>().unwrap().label.lock().as_str(), "resolved");
}

#[test]
fn hook_panic_aborts_creation() {
    let mut config = InjectorConfiguration::new();
    config.add_creation_hook(|_, _| panic!("hook exploded"));

    let injector = config.build().unwrap();
    match injector.create_instance::<Gadget>() {
        Err(DiError::Creation { type_name, source }) => {
            assert_eq!(type_name, std::any::type_name::<Gadget>());
            assert_eq!(source.downcast_ref::<PanicCause>().map(|c| c.0.as_str()), Some("hook exploded"));
        }
        other => panic!("expected creation failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn hook_errors_are_classified() {
    let mut config = InjectorConfiguration::new();
    config.add_creation_hook(|_, created| {
        if created.is::<Widget>() {
            Err(DiError::InvalidArgument {
                argument: "label",
                reason: "empty",
            })
        } else {
            Err(DiError::NotFound("Theme"))
        }
    });

    let injector = config.build().unwrap();
    match injector.create_instance::<Widget>() {
        Err(DiError::Creation { source, .. }) => {
            assert!(matches!(
                source.downcast_ref::<DiError>(),
                Some(DiError::InvalidArgument { argument: "label", .. })
            ));
        }
        other => panic!("expected creation failure, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        injector.create_instance::<Gadget>(),
        Err(DiError::NotFound("Theme"))
    ));
}

fn noop(_: &Injector, _: &CreatedInstance<'_>) -> DiResult<()> {
    Ok(())
}

#[test]
fn shared_hooks_are_added_once() {
    let hook: CreationHook = Arc::new(noop);
    let other: CreationHook = Arc::new(noop);
    let mut config = InjectorConfiguration::new();
    config
        .add_creation_hook_arc(hook.clone())
        .add_creation_hook_arc(hook)
        .add_creation_hook_arc(other);
    assert_eq!(config.hook_count(), 2);

    // Plain closures are never deduplicated
    config.add_creation_hook(|_, _| Ok(())).add_creation_hook(|_, _| Ok(()));
    assert_eq!(config.hook_count(), 4);
}
