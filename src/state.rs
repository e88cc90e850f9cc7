use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    clock::{Clock, OrderNumberSuffix, RandomSuffix, SystemClock},
    config::JwtConfig,
    security::TokenKeys,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub tokens: Arc<TokenKeys>,
    pub clock: Arc<dyn Clock>,
    pub order_numbers: Arc<dyn OrderNumberSuffix>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, jwt: &JwtConfig) -> Self {
        Self {
            orm,
            tokens: Arc::new(TokenKeys::new(jwt)),
            clock: Arc::new(SystemClock),
            order_numbers: Arc::new(RandomSuffix),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_order_numbers(mut self, order_numbers: Arc<dyn OrderNumberSuffix>) -> Self {
        self.order_numbers = order_numbers;
        self
    }
}
