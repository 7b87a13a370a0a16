//! Integration tests for Duckstore

use duckstore::{
    container, container_with, json, root, Context, Listener, Prop, Props, State, Store,
    StoreError, Stores, TrackedStores, Value,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn count_of(state: &State) -> i64 {
    state.get("count").and_then(Value::as_i64).unwrap_or(0)
}

fn increment(store: &Store) {
    store.update(|state| [("count", json!(count_of(state) + 1))]);
}

fn counting_leaf(renders: Arc<AtomicUsize>) -> impl Fn(&Props, &Context) -> Props + Send + Sync {
    move |props: &Props, _cx: &Context| {
        renders.fetch_add(1, Ordering::SeqCst);
        props.clone()
    }
}

fn read(stores: &TrackedStores, store: &str, key: &str) -> Value {
    stores
        .get(store)
        .and_then(|s| s.state().get(key).cloned())
        .unwrap_or_default()
}

#[test]
fn store_integration() {
    let initial = State::from_iter([("count", json!(0)), ("name", json!("test"))]);
    let store = Store::new(initial.clone());
    assert_eq!(store.state(), initial);

    store.set_state([("count", json!(42))]);
    assert_eq!(store.state().get("count"), Some(&json!(42)));
    assert_eq!(store.state().get("name"), Some(&json!("test")));

    assert_eq!(
        store.assign_state(State::new()),
        Err(StoreError::DirectAssignment)
    );
    assert_eq!(store.state().get("count"), Some(&json!(42)));
}

#[test]
fn store_subscription() {
    let store = Store::new([("count", json!(0)), ("other", json!(0))]);
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();
    let listener = Listener::new(move || {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });

    store.subscribe("count", &listener);
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    increment(&store);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    store.set_state([("other", json!(1))]);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    store.unsubscribe(&listener);
    increment(&store);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn counter_app_end_to_end() {
    let counter = Store::new([("count", json!(0)), ("label", json!("clicks"))]);
    let renders = Arc::new(AtomicUsize::new(0));

    let display = container_with(counting_leaf(renders.clone()), |stores, _own| {
        Props::new().with("text", read(stores, "counter", "count"))
    });
    let button = container_with(
        |props: &Props, _cx: &Context| props.clone(),
        |stores, _own| {
            let store = stores.get("counter").map(|s| s.untracked().clone());
            Props::new()
                .with("text", "+")
                .with(
                    "on_click",
                    Prop::handler(move || {
                        if let Some(store) = &store {
                            increment(store);
                        }
                    }),
                )
        },
    );

    let app = root(
        move |props: &Props, cx: &Context| {
            (
                button.mount(props.clone(), cx),
                display.mount(props.clone(), cx),
            )
        },
        Stores::new().with("counter", counter.clone()),
    );
    let (button, display) = app.render_root(&Props::new());
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    assert!(button.props().call("on_click"));
    assert_eq!(counter.state().get("count"), Some(&json!(1)));
    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert_eq!(display.props().value("text"), Some(&json!(1)));

    counter.set_state([("label", json!("taps"))]);
    assert_eq!(renders.load(Ordering::SeqCst), 2);

    // The button never read state, so it never re-renders.
    assert_eq!(button.render_count(), 1);
}

#[test]
fn tracks_only_the_properties_read() {
    let store = Store::new([("a", json!(0)), ("b", json!(0))]);
    let renders = Arc::new(AtomicUsize::new(0));
    let bound = container_with(counting_leaf(renders.clone()), |stores, _own| {
        Props::new().with("a", read(stores, "test", "a"))
    });
    let cx = Context::new().provide(Stores::new().with("test", store.clone()));
    let _mounted = bound.mount(Props::new(), &cx);
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    store.set_state([("b", json!(1))]);
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    store.set_state([("a", json!(1))]);
    assert_eq!(renders.load(Ordering::SeqCst), 2);
}

#[test]
fn own_props_win_over_store_props() {
    let store = Store::new([("title", json!("from store"))]);
    let bound = container_with(
        |props: &Props, _cx: &Context| props.clone(),
        |stores, _own| Props::new().with("title", read(stores, "test", "title")),
    );
    let cx = Context::new().provide(Stores::new().with("test", store));

    let mounted = bound.mount(Props::new().with("title", "from parent"), &cx);

    assert_eq!(mounted.props().value("title"), Some(&json!("from parent")));
}

#[test]
fn leaf_reads_through_store_props() {
    let store = Store::new([("value", json!(0)), ("other", json!(0))]);
    let renders = Arc::new(AtomicUsize::new(0));
    let renders_clone = renders.clone();
    let bound = container(move |props: &Props, _cx: &Context| {
        renders_clone.fetch_add(1, Ordering::SeqCst);
        props
            .store("test")
            .and_then(|s| s.state().get("value").cloned())
    });
    let cx = Context::new().provide(Stores::new().with("test", store.clone()));
    let mounted = bound.mount(Props::new(), &cx);

    store.set_state([("other", json!(1))]);
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    store.set_state([("value", json!(3))]);
    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert_eq!(mounted.output(), Some(Some(json!(3))));
}

#[test]
fn many_containers_share_one_store() {
    let store = Store::new([("a", json!(0)), ("b", json!(0))]);
    let cx = Context::new().provide(Stores::new().with("test", store.clone()));
    let on_a = container_with(
        |props: &Props, _cx: &Context| props.clone(),
        |stores, _own| Props::new().with("a", read(stores, "test", "a")),
    )
    .mount(Props::new(), &cx);
    let on_b = container_with(
        |props: &Props, _cx: &Context| props.clone(),
        |stores, _own| Props::new().with("b", read(stores, "test", "b")),
    )
    .mount(Props::new(), &cx);
    assert_eq!(store.listener_count(), 2);

    store.set_state([("a", json!(1))]);
    assert_eq!((on_a.render_count(), on_b.render_count()), (2, 1));

    drop(on_a);
    store.set_state([("a", json!(2)), ("b", json!(2))]);
    assert_eq!(on_b.render_count(), 2);
    assert_eq!(store.listener_count(), 1);
}
