//! The render pipeline.
//!
//! Every outgoing page passes through [`Renderer::render`]: the view
//! template is rendered first, then embedded as `body` into the layout
//! chosen by the resolver. Callers pick a layout with [`LayoutChoice`];
//! the registry itself is never mutated after startup.

mod layouts;

pub use layouts::{LayoutRegistry, DEFAULT_LAYOUT_NAME};

use crate::domain::MetricsPtr;
use std::path::Path;
use std::time::Instant;
use tera::{Context, Tera};
use thiserror::Error;

/// How a handler wants its view wrapped.
#[derive(Debug, Clone)]
pub enum LayoutChoice {
    /// Use the resolver's fallback layout.
    Default,
    /// Use a specific layout by name, resolved against the registry.
    Named(String),
    /// Render the bare view with no layout at all.
    Bare,
}

#[derive(Debug, Error)]
pub enum RenderError {
    // ---
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

pub struct Renderer {
    // ---
    tera: Tera,
    layouts: LayoutRegistry,
    metrics: MetricsPtr,
}

impl Renderer {
    /// Loads all templates under `templates_dir` and snapshots the layout
    /// registry. Called once at startup.
    pub fn new(templates_dir: &str, metrics: MetricsPtr) -> anyhow::Result<Self> {
        // ---
        let glob = format!("{templates_dir}/**/*.html");
        let tera = Tera::new(&glob)?;

        let layouts = LayoutRegistry::discover(Path::new(templates_dir));
        tracing::info!(
            "Available layouts: {:?}",
            layouts.names().collect::<Vec<_>>()
        );

        Ok(Self {
            tera,
            layouts,
            metrics,
        })
    }

    /// Builds a renderer from preloaded parts. Intended for tests.
    pub fn from_parts(tera: Tera, layouts: LayoutRegistry, metrics: MetricsPtr) -> Self {
        // ---
        Self {
            tera,
            layouts,
            metrics,
        }
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        // ---
        &self.layouts
    }

    /// Renders a view inside its chosen layout.
    ///
    /// Two-stage render: the view first, then the layout with the view's
    /// output available as `body`. The chosen layout is logged and counted
    /// on every render for diagnosing layout mismatches.
    pub fn render(
        &self,
        view: &str,
        layout: LayoutChoice,
        mut context: Context,
    ) -> Result<String, RenderError> {
        // ---
        let start = Instant::now();

        let body = self.tera.render(view, &context)?;

        let (output, chosen) = match layout {
            LayoutChoice::Bare => (body, "none"),
            LayoutChoice::Default => {
                let template = self.layouts.resolve(None);
                context.insert("body", &body);
                (self.tera.render(template, &context)?, template)
            }
            LayoutChoice::Named(name) => {
                let template = self.layouts.resolve(Some(&name));
                context.insert("body", &body);
                (self.tera.render(template, &context)?, template)
            }
        };

        tracing::debug!("Rendering {view} with layout: {chosen}");
        self.metrics.record_page_render(start, chosen);

        Ok(output)
    }
}
