use covenant_di::{
    implements, property_injection_hook, Constructors, DiError, DiResult, Injectable, InjectorConfiguration,
    InjectorConfigurationExt, InjectorModule, Resolver,
};
use std::sync::Arc;

trait Store: Send + Sync {
    fn url(&self) -> &str;
}

struct PgStore {
    url: Arc<String>,
}

impl Store for PgStore {
    fn url(&self) -> &str {
        &self.url
    }
}

impl Injectable for PgStore {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |url: Arc<String>| PgStore { url });
    }
}

implements!(PgStore => dyn Store);

struct StorageModule {
    url: &'static str,
}

impl InjectorModule for StorageModule {
    fn configure(self, config: &mut InjectorConfiguration) -> DiResult<()> {
        config.bind::<String>().to_instance(Arc::new(self.url.to_string()));
        config.bind::<dyn Store>().to::<PgStore>().as_singleton();
        config.add_creation_hook_arc(property_injection_hook());
        Ok(())
    }
}

struct Repository {
    store: Arc<dyn Store>,
}

impl Injectable for Repository {
    fn constructors(c: &mut Constructors<Self>) {
        c.public("new", |store: Arc<dyn Store>| Repository { store });
        c.public("detached", || Repository {
            store: Arc::new(PgStore {
                url: Arc::new("memory".to_string()),
            }),
        });
    }
}

struct RepositoryModule;

impl InjectorModule for RepositoryModule {
    fn configure(self, config: &mut InjectorConfiguration) -> DiResult<()> {
        config.mark_injected_constructor::<Repository>("new")?;
        config.bind::<Repository>().to_self();
        Ok(())
    }
}

#[test]
fn modules_compose() {
    let injector = InjectorConfiguration::new()
        .add_module(StorageModule { url: "postgres://db" })
        .and_then(|config| config.add_module(RepositoryModule))
        .and_then(InjectorConfiguration::build)
        .unwrap();

    let repository = injector.get::<Repository>().unwrap();
    assert_eq!(repository.store.url(), "postgres://db");
}

#[test]
fn modules_apply_in_place() {
    let mut config = InjectorConfiguration::new();
    config.add_module_mut(StorageModule { url: "postgres://a" }).unwrap();
    config.add_module_mut(StorageModule { url: "postgres://b" }).unwrap();
    // The shared hook is only added once
    assert_eq!(config.hook_count(), 1);

    let injector = config.build().unwrap();
    assert_eq!(injector.get::<dyn Store>().unwrap().url(), "postgres://a");
    assert_eq!(injector.get_all::<dyn Store>().unwrap().len(), 2);
}

struct Broken;

impl InjectorModule for Broken {
    fn configure(self, config: &mut InjectorConfiguration) -> DiResult<()> {
        config.mark_injected_constructor::<Repository>("missing")?;
        Ok(())
    }
}

#[test]
fn module_errors_propagate() {
    assert!(matches!(
        InjectorConfiguration::new().add_module(Broken),
        Err(DiError::InvalidArgument { .. })
    ));
}
