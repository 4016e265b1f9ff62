use burn::train::renderer::{MetricState, MetricsRenderer, TrainingProgress};
use derive_new::new;
use log::{debug, info};

/// A Simple renderer for TUI-disabled modes, writing progress to the log
#[derive(new)]
pub struct Simple {}

impl Simple {
    fn update(&self, split: &str, state: MetricState) {
        match state {
            MetricState::Generic(entry) | MetricState::Numeric(entry, _) => {
                debug!("[{}] {}: {}", split, entry.name, entry.formatted);
            }
        }
    }

    fn render(&self, split: &str, item: TrainingProgress) {
        info!(
            "[{}] epoch {}/{} iteration {} ({}/{} items)",
            split,
            item.epoch,
            item.epoch_total,
            item.iteration,
            item.progress.items_processed,
            item.progress.items_total
        );
    }
}

impl MetricsRenderer for Simple {
    fn update_train(&mut self, state: MetricState) {
        self.update("train", state);
    }

    fn update_valid(&mut self, state: MetricState) {
        self.update("valid", state);
    }

    fn render_train(&mut self, item: TrainingProgress) {
        self.render("train", item);
    }

    fn render_valid(&mut self, item: TrainingProgress) {
        self.render("valid", item);
    }
}
