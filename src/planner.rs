use std::path::{Path, PathBuf};

use crate::data::model::Catalog;
use crate::error::ConfigError;
use crate::render::{output_dir_name, render_all, RenderOptions};
use crate::rules::RuleSet;
use crate::schedule::search::generate_schedules;
use crate::schedule::Schedule;

// ---------------------------------------------------------------------------
// Planner session
// ---------------------------------------------------------------------------

/// A catalog, the rules applied to it, and the most recent search results.
pub struct Planner {
    catalog: Catalog,
    rules: RuleSet,

    /// Schedules from the last `generate_schedules` call.
    pub results: Vec<Schedule>,

    pub render_options: RenderOptions,
}

impl Planner {
    /// Validate the rules up front so a bad configuration never reaches the search.
    pub fn new(catalog: Catalog, rules: RuleSet) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(Self {
            catalog,
            rules,
            results: Vec::new(),
            render_options: RenderOptions::default(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Replace the rule set. Previous results no longer match it and are dropped.
    pub fn set_rules(&mut self, rules: RuleSet) -> Result<(), ConfigError> {
        rules.validate()?;
        self.rules = rules;
        self.results.clear();
        Ok(())
    }

    /// Run the filter and the search; returns how many schedules were found.
    pub fn generate_schedules(&mut self) -> Result<usize, ConfigError> {
        self.results = generate_schedules(&self.catalog, &self.rules)?;
        Ok(self.results.len())
    }

    /// Render the current results into a timestamped directory under `base`.
    /// Returns the directory and the number of images written, or `None`
    /// when there is nothing to draw.
    pub fn draw_schedules(&self, base: &Path) -> Option<(PathBuf, usize)> {
        if self.results.is_empty() {
            log::info!("No results");
            return None;
        }
        let dir = base.join(output_dir_name(&chrono::Local::now().naive_local()));
        let written = render_all(&self.results, &dir, &self.rules, &self.render_options);
        Some((dir, written))
    }
}
