use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::schema::{Kind, Schema};

type Init = Arc<dyn Fn() -> Schema + Send + Sync>;

/// A schema built on first use, for recursive definitions.
#[derive(Clone)]
pub(crate) struct LazySchema {
    init: Init,
    cell: Arc<OnceCell<Schema>>,
}

impl LazySchema {
    pub(crate) fn new<F>(init: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Self {
            init: Arc::new(init),
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub(crate) fn resolve(&self) -> &Schema {
        self.cell.get_or_init(|| {
            trace!("resolving lazy schema");
            (self.init)()
        })
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema")
            .field("resolved", &self.cell.get().is_some())
            .finish()
    }
}

impl From<LazySchema> for Schema {
    fn from(lazy: LazySchema) -> Self {
        Schema::new(Kind::Lazy(lazy))
    }
}
