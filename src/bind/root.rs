use crate::runtime::{Component, Context, Props, Stores};

/// A component that publishes a store mapping to its subtree.
///
/// Created by [`root`].
pub struct Root<C> {
    component: C,
    stores: Stores,
}

/// Wrap `component` so that everything it renders sees `stores`.
///
/// The mapping is captured here and shared by reference with every
/// descendant; its contents are not validated.
///
/// ```
/// use duckstore::{json, root, Component, Context, Props, Store, Stores};
///
/// let stores = Stores::new().with("counter", Store::new([("count", json!(0))]));
/// let app = root(|_props: &Props, cx: &Context| cx.stores().len(), stores);
///
/// assert_eq!(app.render(&Props::new(), &Context::new()), 1);
/// ```
pub fn root<C: Component>(component: C, stores: Stores) -> Root<C> {
    Root { component, stores }
}

impl<C: Component> Root<C> {
    /// The published mapping.
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Render as the top of a tree, with no outer context.
    pub fn render_root(&self, props: &Props) -> C::Output {
        self.render(props, &Context::new())
    }
}

impl<C: Component> Component for Root<C> {
    type Output = C::Output;

    fn render(&self, props: &Props, cx: &Context) -> C::Output {
        tracing::trace!(stores = self.stores.len(), "render root");
        let scoped = cx.provide(self.stores.clone());
        self.component.render(props, &scoped)
    }
}
