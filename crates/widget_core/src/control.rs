//! Generic control runtime: lifecycle, two-phase registration, rendering and
//! dispatch. Each control kind plugs in through [`ControlState`].

use std::sync::{Arc, Mutex, PoisonError};

use shared::domain::{ControlKind, NodeId, Placement};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    contract::{PropertySet, PropsPatch, WidgetContract, WidgetProps},
    dispatcher::CommandOutcome,
    gesture::{DragCapture, ListenerEvent},
    host::{MountPoint, MountState},
    session::WidgetServices,
    view::{Rendered, ViewModel},
};

/// Observable state of one control kind.
pub trait ControlState: Clone + Default + Send + Sync + 'static {
    const KIND: ControlKind;
    type Patch: Clone + Default + Send + Sync;

    /// Applies the fields present in `patch`; absent fields stay as they are.
    fn apply(&mut self, patch: &Self::Patch);

    /// Applies a patch to the pre-render cache, before any view exists.
    fn apply_cached(&mut self, patch: &Self::Patch) {
        self.apply(patch);
    }
    fn props(&self) -> WidgetProps;
    fn patch_of(patch: &PropsPatch) -> Option<&Self::Patch>;
    fn render(&self) -> ViewModel;

    /// Command address, for kinds that dispatch or listen.
    fn address(&self) -> Option<&str> {
        None
    }

    /// Called once the live state exists. A returned task is aborted when the
    /// control is dropped.
    fn on_interactive(
        _live: &Arc<watch::Sender<Self>>,
        _services: &WidgetServices,
    ) -> Option<JoinHandle<()>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructing,
    Interactive,
    Failed,
}

enum Lifecycle<S> {
    /// View not mounted yet; the cache is authoritative.
    Constructing { cache: S },
    /// View mounted; the watch channel is the single source of truth.
    Interactive { live: Arc<watch::Sender<S>> },
}

type SharedLifecycle<S> = Arc<Mutex<Lifecycle<S>>>;

fn lock<S>(lifecycle: &SharedLifecycle<S>) -> std::sync::MutexGuard<'_, Lifecycle<S>> {
    lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_state<S: ControlState>(lifecycle: &SharedLifecycle<S>) -> S {
    match &*lock(lifecycle) {
        Lifecycle::Constructing { cache } => cache.clone(),
        Lifecycle::Interactive { live } => live.borrow().clone(),
    }
}

fn write_state<S: ControlState>(lifecycle: &SharedLifecycle<S>, patch: &S::Patch) {
    match &mut *lock(lifecycle) {
        Lifecycle::Constructing { cache } => cache.apply_cached(patch),
        Lifecycle::Interactive { live } => live.send_modify(|state| state.apply(patch)),
    }
}

/// Phase 1 contract: follows the lifecycle, so it reads the cache before the
/// view mounts and the live state afterwards.
struct CachedContract<S: ControlState> {
    lifecycle: SharedLifecycle<S>,
}

impl<S: ControlState> WidgetContract for CachedContract<S> {
    fn kind(&self) -> ControlKind {
        S::KIND
    }

    fn get_props(&self) -> WidgetProps {
        read_state(&self.lifecycle).props()
    }

    fn set_props(&self, patch: &PropsPatch) {
        match S::patch_of(patch) {
            Some(patch) => write_state(&self.lifecycle, patch),
            None => debug!(kind = %S::KIND, other = %patch.kind(), "patch for another kind ignored"),
        }
    }
}

/// Phase 2 contract, backed directly by the live state.
struct LiveContract<S: ControlState> {
    live: Arc<watch::Sender<S>>,
}

impl<S: ControlState> WidgetContract for LiveContract<S> {
    fn kind(&self) -> ControlKind {
        S::KIND
    }

    fn get_props(&self) -> WidgetProps {
        self.live.borrow().props()
    }

    fn set_props(&self, patch: &PropsPatch) {
        match S::patch_of(patch) {
            Some(patch) => self.live.send_modify(|state| state.apply(patch)),
            None => debug!(kind = %S::KIND, other = %patch.kind(), "patch for another kind ignored"),
        }
    }
}

pub struct Control<S: ControlState> {
    node: NodeId,
    mount: Arc<MountPoint>,
    lifecycle: SharedLifecycle<S>,
    phase: watch::Sender<Phase>,
    services: WidgetServices,
    gesture: Mutex<Option<DragCapture>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<S: ControlState> Control<S> {
    /// Places a container, seeds the pre-render cache and performs the
    /// synchronous registration. The view is mounted by [`Control::mount_view`].
    pub fn create(services: WidgetServices, initial: &S::Patch, placement: Placement) -> Arc<Self> {
        let handle = services.containers.place(S::KIND, placement);
        let mut cache = S::default();
        cache.apply_cached(initial);

        let control = Arc::new(Self {
            node: handle.node,
            mount: handle.mount,
            lifecycle: Arc::new(Mutex::new(Lifecycle::Constructing { cache })),
            phase: watch::Sender::new(Phase::Constructing),
            services,
            gesture: Mutex::new(None),
            listener: Mutex::new(None),
        });

        control.services.registry.register(
            control.node,
            Arc::new(CachedContract {
                lifecycle: control.lifecycle.clone(),
            }),
        );
        control
    }

    /// Loads the template and, once the view is mounted, moves the control to
    /// the interactive phase and replaces the registry entry. A failed load
    /// leaves an error indicator and the cached registration in place.
    pub async fn mount_view(&self) {
        let template_ref = S::KIND.template_ref();
        let markup = match self.services.templates.load(template_ref).await {
            Ok(markup) => markup,
            Err(error) => {
                warn!(node = %self.node, %template_ref, %error, "template load failed");
                self.mount.fail(format!("failed to load {template_ref}: {error}"));
                self.phase.send_replace(Phase::Failed);
                return;
            }
        };

        self.mount.mount(markup);
        let live = self.enter_interactive();
        let replaced = self
            .services
            .registry
            .replace(self.node, Arc::new(LiveContract { live: live.clone() }));
        if !replaced {
            debug!(node = %self.node, "node removed before its view mounted");
            self.phase.send_replace(Phase::Interactive);
            return;
        }
        if let Some(task) = S::on_interactive(&live, &self.services) {
            *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
        }
        self.phase.send_replace(Phase::Interactive);
        info!(node = %self.node, kind = %S::KIND, "control interactive");
    }

    fn enter_interactive(&self) -> Arc<watch::Sender<S>> {
        let mut lifecycle = lock(&self.lifecycle);
        let live = match &*lifecycle {
            Lifecycle::Interactive { live } => return live.clone(),
            Lifecycle::Constructing { cache } => Arc::new(watch::Sender::new(cache.clone())),
        };
        *lifecycle = Lifecycle::Interactive { live: live.clone() };
        live
    }

    /// Resolves once the view has mounted or failed to.
    pub async fn settled(&self) -> Phase {
        let mut rx = self.phase.subscribe();
        let phase = match rx.wait_for(|phase| *phase != Phase::Constructing).await {
            Ok(phase) => *phase,
            Err(_) => self.phase(),
        };
        phase
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> ControlKind {
        S::KIND
    }

    pub fn mount_point(&self) -> &Arc<MountPoint> {
        &self.mount
    }

    pub fn is_interactive(&self) -> bool {
        matches!(&*lock(&self.lifecycle), Lifecycle::Interactive { .. })
    }

    /// Snapshot of the authoritative state.
    pub fn state(&self) -> S {
        read_state(&self.lifecycle)
    }

    pub fn props(&self) -> WidgetProps {
        self.state().props()
    }

    pub fn get_props(&self) -> PropertySet {
        self.props().to_property_set()
    }

    pub fn set_props(&self, patch: &PropertySet) {
        let patch = PropsPatch::from_property_set(S::KIND, patch);
        if let Some(patch) = S::patch_of(&patch) {
            write_state(&self.lifecycle, patch);
        }
    }

    pub fn apply(&self, patch: &S::Patch) {
        write_state(&self.lifecycle, patch);
    }

    /// Receiver for view re-renders. `None` until the view is mounted.
    pub fn subscribe(&self) -> Option<watch::Receiver<S>> {
        self.live().map(|live| live.subscribe())
    }

    pub fn render(&self) -> Rendered {
        match self.mount.state() {
            MountState::Empty => Rendered::Pending,
            MountState::Failed { message } => Rendered::Failed { message },
            MountState::Mounted { .. } => Rendered::View(self.state().render()),
        }
    }

    pub(crate) fn live(&self) -> Option<Arc<watch::Sender<S>>> {
        match &*lock(&self.lifecycle) {
            Lifecycle::Interactive { live } => Some(live.clone()),
            Lifecycle::Constructing { .. } => None,
        }
    }

    /// Runs `update` against the live state. Watchers are notified only when
    /// `update` returns `Some`. Returns `None` before the view is mounted.
    pub(crate) fn update_live<R>(&self, update: impl FnOnce(&mut S) -> Option<R>) -> Option<R> {
        let live = self.live()?;
        let mut result = None;
        live.send_if_modified(|state| {
            result = update(state);
            result.is_some()
        });
        result
    }

    pub(crate) async fn dispatch(&self, value: String) -> CommandOutcome {
        let state = self.state();
        let addr = state
            .address()
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or(&self.services.default_address)
            .to_string();
        self.services.dispatcher.send(&addr, value).await
    }

    pub(crate) fn begin_capture(&self, events: &[ListenerEvent]) {
        let capture = self.services.listeners.capture(self.node, events);
        *self.gesture.lock().unwrap_or_else(PoisonError::into_inner) = Some(capture);
    }

    pub(crate) fn end_capture(&self) {
        self.gesture
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub fn is_capturing(&self) -> bool {
        self.gesture
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<S: ControlState> Drop for Control<S> {
    fn drop(&mut self) {
        if let Some(task) = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/control_tests.rs"]
mod tests;
