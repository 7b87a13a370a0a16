use super::{TrackedStore, TrackedStores};
use crate::runtime::{Component, Context, Props, Stores};
use crate::store::Listener;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Derives props from the tracked stores and the container's own props.
pub type MapToProps = Arc<dyn Fn(&TrackedStores, &Props) -> Props + Send + Sync>;

/// Options for a [`Container`].
#[derive(Clone, Debug)]
pub struct ContainerConfig {
    /// Skip the render in [`Mounted::set_props`] when the new own props are
    /// shallow-equal to the current ones.
    pub skip_unchanged_props: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            skip_unchanged_props: true,
        }
    }
}

/// Binds a leaf component to the stores in its context.
///
/// A `Container` is a factory: each [`Container::mount`] creates an
/// independent instance with its own subscriptions.
pub struct Container<C> {
    leaf: Arc<C>,
    map_to_props: Option<MapToProps>,
    config: ContainerConfig,
}

impl<C> Clone for Container<C> {
    fn clone(&self) -> Self {
        Self {
            leaf: Arc::clone(&self.leaf),
            map_to_props: self.map_to_props.clone(),
            config: self.config.clone(),
        }
    }
}

/// Bind `leaf` to the stores in scope, passing every store as a prop.
pub fn container<C: Component>(leaf: C) -> Container<C> {
    Container {
        leaf: Arc::new(leaf),
        map_to_props: None,
        config: ContainerConfig::default(),
    }
}

/// Bind `leaf` to the stores in scope, deriving its props with `map_to_props`.
///
/// Only the state keys `map_to_props` reads through
/// [`TrackedState::get`](super::TrackedState::get) cause re-renders.
///
/// ```
/// use duckstore::{container_with, json, Context, Props, Store, Stores};
///
/// let store = Store::new([("count", json!(0)), ("other", json!(0))]);
/// let cx = Context::new().provide(Stores::new().with("counter", store.clone()));
///
/// let display = container_with(
///     |props: &Props, _cx: &Context| props.value("count").cloned(),
///     |stores, _own| {
///         let count = stores
///             .get("counter")
///             .and_then(|s| s.state().get("count").cloned())
///             .unwrap_or_default();
///         Props::new().with("count", count)
///     },
/// );
/// let mounted = display.mount(Props::new(), &cx);
///
/// store.set_state([("other", json!(1))]);
/// assert_eq!(mounted.render_count(), 1);
///
/// store.set_state([("count", json!(5))]);
/// assert_eq!(mounted.render_count(), 2);
/// assert_eq!(mounted.output(), Some(Some(json!(5))));
/// ```
pub fn container_with<C, F>(leaf: C, map_to_props: F) -> Container<C>
where
    C: Component,
    F: Fn(&TrackedStores, &Props) -> Props + Send + Sync + 'static,
{
    Container {
        leaf: Arc::new(leaf),
        map_to_props: Some(Arc::new(map_to_props)),
        config: ContainerConfig::default(),
    }
}

impl<C> Container<C>
where
    C: Component,
    C::Output: Send + Sync + 'static,
{
    /// Replace the container options.
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Create an instance with `props` under `cx` and render it once.
    pub fn mount(&self, props: Props, cx: &Context) -> Mounted<C> {
        let instance = Arc::new_cyclic(|weak: &Weak<Instance<C>>| {
            let weak = weak.clone();
            let trigger = Listener::new(move || {
                if let Some(instance) = weak.upgrade() {
                    instance.render();
                }
            });
            Instance {
                container: self.clone(),
                trigger,
                slot: Mutex::new(Slot {
                    own_props: props,
                    cx: cx.clone(),
                    seen: Stores::new(),
                    rendered_props: Props::new(),
                    output: None,
                    renders: 0,
                    rendering: false,
                    dirty: false,
                    mounted: true,
                }),
            }
        });

        tracing::debug!(
            listener = ?instance.trigger.id(),
            stores = cx.stores().len(),
            "mount container"
        );
        instance.render();
        Mounted { instance }
    }
}

struct Slot<O> {
    own_props: Props,
    cx: Context,
    /// Stores subscribed to during the last render.
    seen: Stores,
    rendered_props: Props,
    output: Option<Arc<O>>,
    renders: usize,
    rendering: bool,
    dirty: bool,
    mounted: bool,
}

struct Instance<C: Component> {
    container: Container<C>,
    trigger: Listener,
    slot: Mutex<Slot<C::Output>>,
}

/// Clears the in-flight flag if a render unwinds out of user code.
struct RenderGuard<'a, O> {
    slot: &'a Mutex<Slot<O>>,
    armed: bool,
}

impl<O> RenderGuard<'_, O> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<O> Drop for RenderGuard<'_, O> {
    fn drop(&mut self) {
        if self.armed {
            let mut slot = self.slot.lock();
            slot.rendering = false;
            slot.dirty = false;
        }
    }
}

impl<C: Component> Instance<C> {
    /// Re-derive props and render the leaf.
    ///
    /// A trigger that fires while a render is in flight schedules one more
    /// pass instead of recursing.
    fn render(&self) {
        {
            let mut slot = self.slot.lock();
            if !slot.mounted {
                return;
            }
            if slot.rendering {
                slot.dirty = true;
                return;
            }
            slot.rendering = true;
        }
        let guard = RenderGuard {
            slot: &self.slot,
            armed: true,
        };

        loop {
            let (own_props, cx, previous) = {
                let slot = self.slot.lock();
                (slot.own_props.clone(), slot.cx.clone(), slot.seen.clone())
            };

            // Drop every subscription of the last render before re-reading.
            for (_, store) in previous.iter() {
                store.unsubscribe(&self.trigger);
            }
            let stores = cx.stores();
            let tracked: TrackedStores = stores
                .iter()
                .map(|(name, store)| {
                    store.unsubscribe(&self.trigger);
                    (
                        name.to_owned(),
                        TrackedStore::new(store.clone(), self.trigger.clone()),
                    )
                })
                .collect();
            // Recorded before user code runs so unmount can always release it.
            self.slot.lock().seen = stores;

            let derived = match &self.container.map_to_props {
                Some(map_to_props) => map_to_props(&tracked, &own_props),
                None => tracked.into_props(),
            };
            let merged = derived.overlay(&own_props);
            let output = self.container.leaf.render(&merged, &cx);

            let mut slot = self.slot.lock();
            slot.rendered_props = merged;
            slot.output = Some(Arc::new(output));
            slot.renders += 1;
            tracing::trace!(
                listener = ?self.trigger.id(),
                renders = slot.renders,
                "render container"
            );

            if !slot.mounted {
                // Unmounted from inside the leaf; undo this render's reads.
                let seen = std::mem::take(&mut slot.seen);
                slot.rendering = false;
                drop(slot);
                guard.disarm();
                self.release(&seen);
                return;
            }
            if slot.dirty {
                slot.dirty = false;
                continue;
            }
            slot.rendering = false;
            drop(slot);
            guard.disarm();
            return;
        }
    }

    fn unmount(&self) {
        let seen = {
            let mut slot = self.slot.lock();
            if !slot.mounted {
                return;
            }
            slot.mounted = false;
            std::mem::take(&mut slot.seen)
        };
        tracing::debug!(listener = ?self.trigger.id(), "unmount container");
        self.release(&seen);
    }

    fn release(&self, stores: &Stores) {
        for (_, store) in stores.iter() {
            store.unsubscribe(&self.trigger);
        }
    }
}

/// A mounted container instance.
///
/// Dropping the handle unmounts the instance and removes all of its
/// subscriptions.
pub struct Mounted<C: Component> {
    instance: Arc<Instance<C>>,
}

impl<C: Component> Mounted<C> {
    /// Output of the most recent render.
    pub fn output(&self) -> Option<C::Output>
    where
        C::Output: Clone,
    {
        let output = self.instance.slot.lock().output.clone();
        output.map(|output| (*output).clone())
    }

    /// Run `f` against the output of the most recent render.
    ///
    /// The instance lock is released before `f` runs, so `f` may trigger a
    /// re-render of this container.
    pub fn with_output<R>(&self, f: impl FnOnce(Option<&C::Output>) -> R) -> R {
        let output = self.instance.slot.lock().output.clone();
        f(output.as_deref())
    }

    /// Merged props the leaf was last rendered with.
    pub fn props(&self) -> Props {
        self.instance.slot.lock().rendered_props.clone()
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> usize {
        self.instance.slot.lock().renders
    }

    /// Whether the instance is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.instance.slot.lock().mounted
    }

    /// Replace the own props and re-render.
    pub fn set_props(&self, props: Props) {
        {
            let mut slot = self.instance.slot.lock();
            if self.instance.container.config.skip_unchanged_props && slot.own_props == props {
                tracing::trace!(listener = ?self.instance.trigger.id(), "props unchanged");
                return;
            }
            slot.own_props = props;
        }
        self.instance.render();
    }

    /// Move the instance under a new context and re-render.
    pub fn set_context(&self, cx: &Context) {
        self.instance.slot.lock().cx = cx.clone();
        self.instance.render();
    }

    /// Force a re-render.
    pub fn rerender(&self) {
        self.instance.render();
    }

    /// The listener the instance subscribes to stores with.
    pub fn trigger(&self) -> &Listener {
        &self.instance.trigger
    }

    /// Unmount and drop every subscription.
    pub fn unmount(self) {
        self.instance.unmount();
    }
}

impl<C: Component> Drop for Mounted<C> {
    fn drop(&mut self) {
        self.instance.unmount();
    }
}
