use crate::modules::catalog::domain::ResourcePage;
use crate::shared::application::Pagination;

/// Observable state of one resource store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    /// "Load more": items are concatenated, pagination still replaced
    Append,
}

/// Everything that can happen to a `StoreState`
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction<T> {
    FetchStarted { silent: bool },
    Loaded {
        page: ResourcePage<T>,
        mode: LoadMode,
        silent: bool,
    },
    Failed { message: String, silent: bool },
    Reset,
}

impl<T> StoreState<T> {
    /// Pure transition `(state, action) -> state`
    pub fn apply(mut self, action: StoreAction<T>) -> Self {
        match action {
            StoreAction::FetchStarted { silent } => {
                if !silent {
                    self.loading = true;
                    self.error = None;
                }
            }
            StoreAction::Loaded { page, mode, silent } => {
                match mode {
                    LoadMode::Replace => self.items = page.items,
                    LoadMode::Append => self.items.extend(page.items),
                }
                self.pagination = page.pagination;
                if !silent {
                    self.loading = false;
                    self.error = None;
                }
            }
            StoreAction::Failed { message, silent } => {
                // Items and pagination stay: stale data beats a blank view.
                self.error = Some(message);
                if !silent {
                    self.loading = false;
                }
            }
            StoreAction::Reset => return Self::default(),
        }
        self
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}
