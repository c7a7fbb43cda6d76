use crate::api::CommandHub;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) hub: CommandHub,
}
