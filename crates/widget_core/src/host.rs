use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::{ControlKind, NodeId, Placement};
use tracing::debug;

use crate::error::WidgetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountState {
    Empty,
    Mounted { markup: String },
    Failed { message: String },
}

/// Content area of a placed container. The control's view is mounted here
/// once its template has loaded.
#[derive(Debug)]
pub struct MountPoint {
    node: NodeId,
    state: Mutex<MountState>,
}

impl MountPoint {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            state: Mutex::new(MountState::Empty),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> MountState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn mount(&self, markup: String) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = MountState::Mounted { markup };
    }

    pub fn fail(&self, message: impl Into<String>) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = MountState::Failed {
            message: message.into(),
        };
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state(), MountState::Mounted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct MountHandle {
    pub node: NodeId,
    pub mount: Arc<MountPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub kind: ControlKind,
    pub w: u32,
    pub h: u32,
    pub x: u32,
    pub y: u32,
}

/// Creates containers on the editor grid.
pub trait ContainerFactory: Send + Sync {
    fn place(&self, kind: ControlKind, placement: Placement) -> MountHandle;
    fn remove(&self, node: NodeId) -> bool;
}

#[derive(Default)]
struct GridTable {
    next_id: i64,
    slots: HashMap<NodeId, GridSlot>,
}

/// In-memory grid. Containers without coordinates are stacked below the
/// lowest occupied row; no packing is attempted.
#[derive(Clone, Default)]
pub struct GridContainers {
    table: Arc<Mutex<GridTable>>,
}

impl GridContainers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, node: NodeId) -> Option<GridSlot> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .get(&node)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContainerFactory for GridContainers {
    fn place(&self, kind: ControlKind, placement: Placement) -> MountHandle {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let (w, h) = placement.size_for(kind);
        let next_row = table.slots.values().map(|s| s.y + s.h).max().unwrap_or(0);
        let slot = GridSlot {
            kind,
            w,
            h,
            x: placement.x.unwrap_or(0),
            y: placement.y.unwrap_or(next_row),
        };
        table.next_id += 1;
        let node = NodeId(table.next_id);
        table.slots.insert(node, slot);
        debug!(%node, %kind, w, h, x = slot.x, y = slot.y, "container placed");
        MountHandle {
            node,
            mount: Arc::new(MountPoint::new(node)),
        }
    }

    fn remove(&self, node: NodeId) -> bool {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .remove(&node)
            .is_some()
    }
}

/// Fetches view templates by reference.
#[async_trait]
pub trait TemplateLoader: Send + Sync {
    async fn load(&self, template_ref: &str) -> Result<String>;
}

pub struct HttpTemplateLoader {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTemplateLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TemplateLoader for HttpTemplateLoader {
    async fn load(&self, template_ref: &str) -> Result<String> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            template_ref.trim_start_matches('/')
        );
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::TemplateLoad {
                template_ref: template_ref.to_string(),
                reason: format!("status {}", status.as_u16()),
            }
            .into());
        }
        Ok(response.text().await?)
    }
}

/// Templates served from memory. With `permissive` set, unknown references
/// load as an empty view instead of failing.
#[derive(Clone, Default)]
pub struct StaticTemplates {
    templates: Arc<HashMap<String, String>>,
    permissive: bool,
}

impl StaticTemplates {
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self {
            templates: Arc::new(templates),
            permissive: false,
        }
    }

    /// Every reference resolves.
    pub fn permissive() -> Self {
        Self {
            templates: Arc::new(HashMap::new()),
            permissive: true,
        }
    }

    /// One stub template per control kind.
    pub fn builtin() -> Self {
        let templates = ControlKind::ALL
            .iter()
            .map(|kind| {
                (
                    kind.template_ref().to_string(),
                    format!("<div class=\"widget {}\"></div>", kind.type_name()),
                )
            })
            .collect();
        Self::new(templates)
    }
}

#[async_trait]
impl TemplateLoader for StaticTemplates {
    async fn load(&self, template_ref: &str) -> Result<String> {
        match self.templates.get(template_ref) {
            Some(markup) => Ok(markup.clone()),
            None if self.permissive => Ok(String::new()),
            None => Err(anyhow!(WidgetError::TemplateLoad {
                template_ref: template_ref.to_string(),
                reason: "not found".into(),
            })),
        }
    }
}
