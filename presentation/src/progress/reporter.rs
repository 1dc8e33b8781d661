//! Progress reporting for consultation execution

use colored::Colorize;
use consilium_application::ports::progress::{ConsultationPhase, ConsultationProgress};
use consilium_domain::Specialty;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a consultation with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &ConsultationPhase) -> &'static str {
        match phase {
            ConsultationPhase::Collection => "Phase 1: Collection",
            ConsultationPhase::Conference => "Phase 2: Conference",
            ConsultationPhase::Synthesis => "Phase 3: Synthesis",
            ConsultationPhase::Settlement => "Settlement",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsultationProgress for ProgressReporter {
    fn on_phase_start(&self, phase: &ConsultationPhase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase));
        pb.set_message("Starting...");

        *self.phase_bar.lock().unwrap() = Some(pb);
    }

    fn on_specialist_complete(
        &self,
        _phase: &ConsultationPhase,
        specialty: &Specialty,
        success: bool,
    ) {
        if let Some(pb) = self.phase_bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), specialty)
            } else {
                format!("{} {}", "x".red(), specialty)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &ConsultationPhase) {
        if let Some(pb) = self.phase_bar.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "{} {}",
                Self::phase_display_name(phase),
                "done".green()
            ));
        }
    }
}
