//! Tests for the item registry.

use droplist::{ItemDescriptor, ItemRegistry, RegistryEvent};

fn drain<K>(sub: &mut droplist::RegistrySubscription<K>) -> Vec<RegistryEvent> {
    std::iter::from_fn(|| sub.try_next()).collect()
}

#[test]
fn test_register_appends_in_order() {
    let registry = ItemRegistry::new();
    let a = registry.register(ItemDescriptor::new(1, "a"));
    let b = registry.register((2, "b"));

    assert_eq!(registry.handles(), vec![a, b]);
    assert_eq!(registry.len(), 2);
    let keys: Vec<i32> = registry.items().into_iter().map(|(_, item)| item.key).collect();
    assert_eq!(keys, vec![1, 2]);
}

#[test]
fn test_membership_changes_notify_in_order() {
    let registry = ItemRegistry::new();
    let mut sub = registry.subscribe();

    let a = registry.register((1, "a"));
    let b = registry.register((2, "b"));
    registry.move_to(b, 0);
    registry.deregister(a);

    let versions: Vec<u64> = drain(&mut sub)
        .into_iter()
        .map(|event| match event {
            RegistryEvent::Changed { version } => version,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(versions, vec![1, 2, 3, 4]);
    assert_eq!(registry.version(), 4);
}

#[test]
fn test_property_changes_raise_updates_without_version_bump() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    let mut sub = registry.subscribe();

    assert!(registry.set_label(a, "A"));
    assert!(registry.set_label(a, "A"));
    assert!(registry.set_disabled(a, true));

    assert_eq!(
        drain(&mut sub),
        vec![RegistryEvent::Updated(a), RegistryEvent::Updated(a)]
    );
    assert_eq!(registry.version(), 1);
    assert_eq!(registry.label(a).as_deref(), Some("A"));
    assert_eq!(registry.is_disabled(a), Some(true));
}

#[test]
fn test_stale_handle_is_rejected() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    registry.deregister(a);
    let b = registry.register((2, "b"));

    assert!(!registry.contains(a));
    assert!(registry.contains(b));
    assert_ne!(a, b);
    assert!(registry.get(a).is_none());
    assert!(registry.deregister(a).is_none());
    assert!(!registry.set_label(a, "x"));
    assert!(!registry.activate(a));
}

#[test]
fn test_move_to_reorders_and_clamps() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    let b = registry.register((2, "b"));
    let c = registry.register((3, "c"));

    assert!(registry.move_to(a, 99));
    assert_eq!(registry.handles(), vec![b, c, a]);
    assert!(registry.move_to(c, 0));
    assert_eq!(registry.handles(), vec![c, b, a]);
}

#[test]
fn test_activation_reaches_only_watchers() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    let b = registry.register((2, "b"));
    let mut sub = registry.subscribe();
    let _guard = registry.watch(a, sub.id()).unwrap();

    assert!(registry.activate(a));
    assert!(!registry.activate(b));
    assert_eq!(drain(&mut sub), vec![RegistryEvent::Activated(a)]);
}

#[test]
fn test_activation_reaches_subscriber_behind_a_change() {
    let registry = ItemRegistry::new();
    let mut sub = registry.subscribe();
    let a = registry.register((1, "a"));

    assert!(registry.activate(a));
    assert_eq!(
        drain(&mut sub),
        vec![RegistryEvent::Changed { version: 1 }, RegistryEvent::Activated(a)]
    );

    let items = registry.sync(sub.id());
    assert_eq!(items.len(), 1);
    assert!(!registry.activate(a));

    let b = registry.register((2, "b"));
    assert!(registry.activate(b));
    assert!(registry.activate(a));
}

#[test]
fn test_disabled_item_filters_activation() {
    let registry = ItemRegistry::new();
    let a = registry.register(ItemDescriptor::new(1, "a").with_disabled(true));
    let mut sub = registry.subscribe();
    let _guard = registry.watch(a, sub.id()).unwrap();

    assert!(!registry.activate(a));
    assert!(drain(&mut sub).is_empty());
}

#[test]
fn test_dropping_guard_releases_watch() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    let mut sub = registry.subscribe();

    let guard = registry.watch(a, sub.id()).unwrap();
    assert_eq!(guard.handle(), a);
    drop(guard);

    assert!(!registry.activate(a));
    assert!(drain(&mut sub).is_empty());
}

#[test]
fn test_dropping_subscription_unsubscribes() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    let sub = registry.subscribe();
    let guard = registry.watch(a, sub.id()).unwrap();
    drop(sub);

    assert!(!registry.activate(a));
    drop(guard);
    registry.register((2, "b"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_guard_outliving_registry_is_harmless() {
    let registry = ItemRegistry::new();
    let a = registry.register((1, "a"));
    let sub = registry.subscribe();
    let guard = registry.watch(a, sub.id()).unwrap();

    drop(registry);
    drop(guard);
    drop(sub);
}

#[test]
fn test_find_by_key_uses_equality() {
    let registry = ItemRegistry::new();
    registry.register((String::from("x"), "first"));
    let y = registry.register((String::from("y"), "second"));

    assert_eq!(registry.find(&String::from("y")), Some(y));
    assert_eq!(registry.find(&String::from("z")), None);
}
