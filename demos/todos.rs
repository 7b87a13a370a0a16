//! Todo list: a store with actions, a filtered list, filter links and a
//! total counter.

use duckstore::{
    container, container_with, json, root, Context, Prop, Props, Store, Stores, TrackedStores,
    Value,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SHOW_ALL: &str = "SHOW_ALL";
const SHOW_COMPLETED: &str = "SHOW_COMPLETED";
const SHOW_ACTIVE: &str = "SHOW_ACTIVE";

/// Store plus the actions that update it.
#[derive(Clone)]
struct TodosStore {
    store: Store,
    next_id: Arc<AtomicU64>,
}

impl TodosStore {
    fn new() -> Self {
        Self {
            store: Store::new([("todos", json!([])), ("filter", json!(SHOW_ALL))]),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn add_todo(&self, text: &str) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.store.update(|state| {
            let mut todos = todos_of(state.get("todos"));
            todos.push(json!({ "id": id, "text": text, "completed": false }));
            [("todos", Value::Array(todos))]
        });
    }

    fn toggle_todo(&self, id: u64) {
        self.store.update(|state| {
            let todos = todos_of(state.get("todos"))
                .into_iter()
                .map(|mut todo| {
                    if let Some(fields) = todo.as_object_mut() {
                        if fields.get("id") == Some(&json!(id)) {
                            let completed = fields
                                .get("completed")
                                .and_then(Value::as_bool)
                                .unwrap_or(false);
                            fields.insert("completed".into(), json!(!completed));
                        }
                    }
                    todo
                })
                .collect();
            [("todos", Value::Array(todos))]
        });
    }

    fn set_visibility_filter(&self, filter: &str) {
        self.store.set_state([("filter", json!(filter))]);
    }
}

fn todos_of(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn visible_todos(todos: Vec<Value>, filter: &str) -> Vec<Value> {
    let completed = |todo: &Value| todo["completed"].as_bool().unwrap_or(false);
    match filter {
        SHOW_ALL => todos,
        SHOW_COMPLETED => todos.into_iter().filter(|t| completed(t)).collect(),
        SHOW_ACTIVE => todos.into_iter().filter(|t| !completed(t)).collect(),
        _ => Vec::new(),
    }
}

fn todos_state(stores: &TrackedStores, key: &str) -> Value {
    stores
        .get("todos_store")
        .and_then(|s| s.state().get(key).cloned())
        .unwrap_or_default()
}

fn todo_list(props: &Props, _cx: &Context) -> Props {
    let todos = props.value("todos").and_then(Value::as_array).cloned().unwrap_or_default();
    println!("   [TodoList]");
    for todo in &todos {
        let mark = if todo["completed"].as_bool().unwrap_or(false) { "x" } else { " " };
        println!("     [{mark}] {} {}", todo["id"], todo["text"]);
    }
    props.clone()
}

fn link(props: &Props, _cx: &Context) -> Props {
    let active = props.value("active").and_then(Value::as_bool).unwrap_or(false);
    let filter = props.value("filter").cloned().unwrap_or_default();
    println!("   [Link] {filter}{}", if active { " (active)" } else { "" });
    props.clone()
}

fn total_counter(props: &Props, _cx: &Context) -> Props {
    let total = props.value("total_todos").cloned().unwrap_or_default();
    println!("   [Total] {total}");
    props.clone()
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Todo Application ===\n");

    let todos = TodosStore::new();

    let visible_todo_list = container_with(todo_list, |stores, _own| {
        let list = todos_of(Some(&todos_state(stores, "todos")));
        let filter = todos_state(stores, "filter");
        let filter = filter.as_str().unwrap_or(SHOW_ALL);
        Props::new().with("todos", Value::Array(visible_todos(list, filter)))
    });

    let filter_link = {
        let todos = todos.clone();
        container_with(link, move |stores, own| {
            let filter = own.value("filter").and_then(Value::as_str).unwrap_or(SHOW_ALL).to_owned();
            let active = todos_state(stores, "filter") == json!(filter);
            let todos = todos.clone();
            Props::new().with("active", active).with(
                "on_click",
                Prop::handler(move || todos.set_visibility_filter(&filter)),
            )
        })
    };

    let counter = container_with(total_counter, |stores, _own| {
        let total = todos_of(Some(&todos_state(stores, "todos"))).len();
        Props::new().with("total_todos", total)
    });

    // Passes the raw store through; it never re-renders on state changes.
    let add_todo = container(|props: &Props, _cx: &Context| props.clone());

    let app = root(
        move |props: &Props, cx: &Context| {
            (
                add_todo.mount(props.clone(), cx),
                visible_todo_list.mount(props.clone(), cx),
                filter_link.mount(Props::new().with("filter", SHOW_ACTIVE), cx),
                counter.mount(props.clone(), cx),
            )
        },
        Stores::new().with("todos_store", todos.store.clone()),
    );

    println!("1. Initial render");
    let (add, _list, active_link, _total) = app.render_root(&Props::new());

    println!("\n2. Adding todos");
    if add.props().store("todos_store").is_some() {
        todos.add_todo("Learn the store API");
        todos.add_todo("Write a container");
    }

    println!("\n3. Completing the first todo");
    todos.toggle_todo(1);

    println!("\n4. Showing active todos only");
    active_link.props().call("on_click");

    println!("\nAdd-todo container rendered {} time(s)", add.render_count());
}
