use std::sync::Arc;

use farelink_core::FlightService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FlightService>,
}
