use serde::{Deserialize, Serialize};

use crate::shared::application::Pagination;

/// One normalized page of a resource kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> ResourcePage<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
