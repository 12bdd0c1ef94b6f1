//! The control arena and its context.
//!
//! A [`UiTree`] owns every control, the skin, the host services and the
//! tree-wide interaction state (focus, pointer capture, drag). Controls refer
//! to each other by [`ControlId`]; nothing holds a pointer into the arena.

use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use skin::Skin;
use slotmap::SlotMap;

use crate::config::ScreenConfig;
use crate::containers::Panel;
use crate::control::{Control, ControlBehavior, ControlId};
use crate::error::{Result, TrellisError};
use crate::events::{DragEventArgs, EventHandlers};
use crate::geometry::{Point, Size};
use crate::services::{AssetLoader, NoAssets, Services};
use crate::skin_registry::SkinRegistry;

type Deferred = Box<dyn FnOnce(&mut UiTree)>;

/// Everything a tree needs from its host, with defaults for all of it.
pub struct TreeOptions {
    pub skin: Rc<Skin>,
    pub services: Services,
    pub assets: Box<dyn AssetLoader>,
    pub config: ScreenConfig,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            skin: Rc::new(Skin::default()),
            services: Services::default(),
            assets: Box::new(NoAssets),
            config: ScreenConfig::default(),
        }
    }
}

impl TreeOptions {
    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = Rc::new(skin);
        self
    }

    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    pub fn with_assets(mut self, assets: impl AssetLoader + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    pub fn with_config(mut self, config: ScreenConfig) -> Self {
        self.config = config;
        self
    }
}

/// The visual tree.
pub struct UiTree {
    pub(crate) nodes: SlotMap<ControlId, Control>,
    pub(crate) root: ControlId,
    pub(crate) viewport: Size,
    pub(crate) focused: Option<ControlId>,
    pub(crate) captured: Option<ControlId>,
    pub(crate) drag: Option<DragEventArgs>,
    pub(crate) pointer: Point,
    pub(crate) skin: Rc<Skin>,
    pub(crate) skin_registry: SkinRegistry,
    pub(crate) assets: Box<dyn AssetLoader>,
    services: Services,
    config: ScreenConfig,
    behavior_depth: usize,
    deferred: VecDeque<Deferred>,
}

impl UiTree {
    /// A tree with default options and a root panel covering `viewport`.
    pub fn new(viewport: Size) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Control::new(Box::new(Panel), None));
        let options = TreeOptions::default();
        Self {
            nodes,
            root,
            viewport,
            focused: None,
            captured: None,
            drag: None,
            pointer: Point::ZERO,
            skin: options.skin,
            skin_registry: SkinRegistry::default(),
            assets: options.assets,
            services: options.services,
            config: options.config,
            behavior_depth: 0,
            deferred: VecDeque::new(),
        }
    }

    /// A tree with the given options. The root is skinned like any control.
    pub fn with_options(viewport: Size, options: TreeOptions) -> Result<Self> {
        let mut tree = Self::new(viewport);
        tree.skin = options.skin;
        tree.services = options.services;
        tree.assets = options.assets;
        tree.config = options.config;
        let root = tree.root;
        tree.apply_skin(root)?;
        Ok(tree)
    }

    pub fn root(&self) -> ControlId {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport != viewport {
            log::debug!("viewport resized to {:?}", viewport);
            self.viewport = viewport;
            self.invalidate_dimensions(self.root);
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    /// Last pointer position seen by the dispatcher, in screen coordinates.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Create a detached control and apply its skin.
    pub fn create(&mut self, behavior: impl ControlBehavior) -> Result<ControlId> {
        self.create_boxed(Box::new(behavior), None)
    }

    /// Create a detached control skinned under `style` instead of its type name.
    pub fn create_styled(
        &mut self,
        behavior: impl ControlBehavior,
        style: &str,
    ) -> Result<ControlId> {
        self.create_boxed(Box::new(behavior), Some(style.to_string()))
    }

    fn create_boxed(
        &mut self,
        behavior: Box<dyn ControlBehavior>,
        style: Option<String>,
    ) -> Result<ControlId> {
        let tag = behavior.type_tag();
        let id = self.nodes.insert(Control::new(behavior, style));
        if let Err(e) = self.apply_skin(id) {
            log::debug!("skinning {} failed: {}", tag.0, e);
            self.nodes.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Create a control and append it to `parent`.
    pub fn create_child(
        &mut self,
        parent: ControlId,
        behavior: impl ControlBehavior,
    ) -> Result<ControlId> {
        let id = self.create(behavior)?;
        self.add_child(parent, id)?;
        Ok(id)
    }

    fn apply_skin(&mut self, id: ControlId) -> Result<()> {
        self.with_behavior(id, |behavior, tree| behavior.apply_skin(tree, id))
            .unwrap_or(Ok(()))
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.nodes.get_mut(id)
    }

    /// Like [`get`](Self::get), with an error for unknown ids.
    pub fn node(&self, id: ControlId) -> Result<&Control> {
        self.nodes
            .get(id)
            .ok_or_else(|| TrellisError::UnknownControl(format!("{:?}", id)))
    }

    pub fn node_mut(&mut self, id: ControlId) -> Result<&mut Control> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TrellisError::UnknownControl(format!("{:?}", id)))
    }

    /// The behavior of `id` downcast to `T`.
    ///
    /// `None` when the id is unknown, the type differs, or the behavior is
    /// currently running one of its own hooks.
    pub fn behavior<T: ControlBehavior>(&self, id: ControlId) -> Option<&T> {
        self.nodes
            .get(id)?
            .behavior
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn behavior_mut<T: ControlBehavior>(&mut self, id: ControlId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)?
            .behavior
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Run `f` with the behavior of `id` taken out of the arena, so it can
    /// mutate both itself and the rest of the tree.
    ///
    /// Returns `None` if the control is unknown or its behavior is already
    /// out (a hook re-entering its own control).
    pub fn with_behavior<R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut dyn ControlBehavior, &mut UiTree) -> R,
    ) -> Option<R> {
        let Some(mut behavior) = self.nodes.get_mut(id)?.behavior.take() else {
            log::trace!("behavior of {:?} is busy, skipping", id);
            return None;
        };
        self.behavior_depth += 1;
        let result = f(behavior.as_mut(), self);
        self.behavior_depth -= 1;
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        if self.behavior_depth == 0 {
            self.run_deferred();
        }
        Some(result)
    }

    /// Typed variant of [`with_behavior`](Self::with_behavior).
    pub fn with_behavior_as<T: ControlBehavior, R>(
        &mut self,
        id: ControlId,
        f: impl FnOnce(&mut T, &mut UiTree) -> R,
    ) -> Option<R> {
        self.with_behavior(id, |behavior, tree| {
            behavior
                .as_any_mut()
                .downcast_mut::<T>()
                .map(|typed| f(typed, tree))
        })
        .flatten()
    }

    /// Invoke `handlers` for `sender`. While any behavior is out of the arena
    /// the call is queued until it is back, so handlers always see a
    /// complete tree.
    pub fn notify<A: 'static>(&mut self, sender: ControlId, handlers: EventHandlers<A>, mut args: A) {
        if handlers.is_empty() {
            return;
        }
        if self.behavior_depth == 0 {
            handlers.invoke(self, sender, &mut args);
        } else {
            self.deferred.push_back(Box::new(move |tree: &mut UiTree| {
                handlers.invoke(tree, sender, &mut args);
            }));
        }
    }

    /// Run `f` once no behavior is out of the arena.
    pub fn defer(&mut self, f: impl FnOnce(&mut UiTree) + 'static) {
        if self.behavior_depth == 0 {
            f(self);
        } else {
            self.deferred.push_back(Box::new(f));
        }
    }

    fn run_deferred(&mut self) {
        while let Some(task) = self.deferred.pop_front() {
            task(self);
        }
    }

    /// Whether `ancestor` is `id` or lies on its root path.
    pub fn is_ancestor_or_self(&self, ancestor: ControlId, id: ControlId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ancestor {
                return true;
            }
            current = self.nodes.get(cid).and_then(|node| node.parent);
        }
        false
    }

    /// Route pointer input to `id` until released.
    pub fn capture_pointer(&mut self, id: ControlId) {
        log::debug!("pointer captured by {:?}", id);
        self.captured = Some(id);
    }

    pub fn release_pointer(&mut self, id: ControlId) {
        if self.captured == Some(id) {
            log::debug!("pointer released by {:?}", id);
            self.captured = None;
        }
    }

    pub fn captured(&self) -> Option<ControlId> {
        self.captured
    }

    /// Whether a drag operation is in progress.
    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The arguments the drag source filled in at StartDrag.
    pub fn drag_state(&self) -> Option<&DragEventArgs> {
        self.drag.as_ref()
    }

    /// Run every visible control's per-frame `update`, parents before
    /// children, siblings back to front.
    pub fn update(&mut self, elapsed: Duration) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let children = node.children.z_descending();
            self.with_behavior(id, |behavior, tree| behavior.update(tree, id, elapsed));
            stack.extend(children.iter().copied());
        }
    }
}
