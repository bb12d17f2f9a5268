use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::filters::Filter;
use crate::types::{Update, UpdateCategory};

/// Something that reacts to an update.
///
/// Any `Fn(Arc<Update>) -> impl Future<Output = anyhow::Result<()>>` is a
/// handler already.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, update: Arc<Update>) -> Result<()>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Arc<Update>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn handle(&self, update: Arc<Update>) -> Result<()> {
        (self)(update).await
    }
}

enum Route {
    Category(UpdateCategory),
    Any,
    Filtered(Filter),
}

impl Route {
    fn matches(&self, update: &Update, category: UpdateCategory) -> bool {
        match self {
            Route::Category(c) => *c == category,
            Route::Any => true,
            Route::Filtered(filter) => filter.check(update),
        }
    }
}

/// Ordered list of handlers, each bound to a category or a filter.
#[derive(Default)]
pub struct HandlerRegistry {
    routes: Vec<(Route, Arc<dyn Handler>)>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<H>(&mut self, category: UpdateCategory, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.routes.push((Route::Category(category), Arc::new(handler)));
        self
    }

    pub fn on_any<H>(&mut self, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.routes.push((Route::Any, Arc::new(handler)));
        self
    }

    pub fn on_filtered<H>(&mut self, filter: impl Into<Filter>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.routes
            .push((Route::Filtered(filter.into()), Arc::new(handler)));
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Run every matching handler in registration order.
    ///
    /// Returns how many handlers ran. The first failure stops the rest.
    pub async fn dispatch(&self, update: impl Into<Arc<Update>>) -> Result<usize> {
        let update = update.into();
        let category = update.category();
        debug!("Dispatching update {} ({})", update.update_id, category);

        let mut ran = 0;
        for (index, (route, handler)) in self.routes.iter().enumerate() {
            if !route.matches(&update, category) {
                continue;
            }
            handler.handle(update.clone()).await.with_context(|| {
                format!(
                    "Handler #{} failed on update {}",
                    index, update.update_id
                )
            })?;
            ran += 1;
        }

        if ran == 0 {
            debug!("No handler matched update {}", update.update_id);
        }
        Ok(ran)
    }
}
