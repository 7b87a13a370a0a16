//! Counter application: one store, a display and two buttons.
//!
//! Run with `RUST_LOG=duckstore=debug` to watch subscriptions and renders.

use duckstore::{container_with, json, root, Context, Prop, Props, Store, Stores, Value};
use tracing_subscriber::EnvFilter;

fn increment(store: &Store) {
    store.update(|state| {
        let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
        [("count", json!(count + 1))]
    });
}

fn decrement(store: &Store) {
    store.update(|state| {
        let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
        [("count", json!(count - 1))]
    });
}

fn button(props: &Props, _cx: &Context) -> Props {
    let text = props.value("text").cloned().unwrap_or_default();
    println!("   [Button] {text}");
    props.clone()
}

fn label(props: &Props, _cx: &Context) -> Props {
    let text = props.value("text").cloned().unwrap_or_default();
    println!("   [Label] {text}");
    props.clone()
}

fn action(text: &str, store: Option<Store>, act: fn(&Store)) -> Props {
    Props::new().with("text", text).with(
        "on_click",
        Prop::handler(move || {
            if let Some(store) = &store {
                act(store);
            }
        }),
    )
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Counter Application ===\n");

    let counter_store = Store::new([("count", json!(0))]);

    let increment_button = container_with(button, |stores, _own| {
        action("+", stores.get("counter_store").map(|s| s.untracked().clone()), increment)
    });
    let decrement_button = container_with(button, |stores, _own| {
        action("-", stores.get("counter_store").map(|s| s.untracked().clone()), decrement)
    });
    let counter_display = container_with(label, |stores, _own| {
        let count = stores
            .get("counter_store")
            .and_then(|s| s.state().get("count").cloned())
            .unwrap_or_default();
        Props::new().with("text", count)
    });

    let app = root(
        move |props: &Props, cx: &Context| {
            (
                increment_button.mount(props.clone(), cx),
                counter_display.mount(props.clone(), cx),
                decrement_button.mount(props.clone(), cx),
            )
        },
        Stores::new().with("counter_store", counter_store.clone()),
    );

    println!("1. Initial render");
    let (plus, _display, minus) = app.render_root(&Props::new());

    println!("\n2. Clicking + twice");
    plus.props().call("on_click");
    plus.props().call("on_click");

    println!("\n3. Clicking - once");
    minus.props().call("on_click");

    println!("\nFinal count: {}", counter_store.state().get("count").cloned().unwrap_or_default());
}
