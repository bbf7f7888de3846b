use std::sync::Arc;

use common::context::Context;

use crate::config::AppConfig;
use crate::flights::FlightProvider;
use crate::store::{CatalogStore, MediaStore};
use crate::text::TextGenerator;

pub struct GlobalState {
    pub config: AppConfig,
    pub ctx: Context,
    pub catalog: Arc<dyn CatalogStore>,
    pub media: Arc<dyn MediaStore>,
    pub text: Arc<dyn TextGenerator>,
    pub flights: Arc<dyn FlightProvider>,
}

impl GlobalState {
    pub fn new(
        config: AppConfig,
        ctx: Context,
        catalog: Arc<dyn CatalogStore>,
        media: Arc<dyn MediaStore>,
        text: Arc<dyn TextGenerator>,
        flights: Arc<dyn FlightProvider>,
    ) -> Self {
        Self {
            config,
            ctx,
            catalog,
            media,
            text,
            flights,
        }
    }
}
