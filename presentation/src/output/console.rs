//! Console output formatter for consultation results

use colored::Colorize;
use consilium_application::ConsultationOutput;
use consilium_domain::{
    AgentPerformanceRecord, ConferenceMetadata, MarketStats, PlanPhase, Resolution, Severity,
};

/// Formats consultation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete consultation result
    pub fn format(output: &ConsultationOutput) -> String {
        let mut out = String::new();

        out.push_str(&Self::header("Consultation Results"));
        out.push('\n');

        out.push_str(&format!(
            "{} {} ({} mode)\n\n",
            "Consultation:".cyan().bold(),
            output.consultation_id,
            output.mode
        ));

        // Phase 1: Responses
        out.push_str(&Self::section_header("Phase 1: Specialist Responses"));
        let mut responses: Vec<_> = output.responses.iter().collect();
        responses.sort_by_key(|r| r.specialty);
        for response in responses {
            if response.is_success() {
                let summary = response
                    .assessment
                    .as_ref()
                    .map(|a| a.summary.as_str())
                    .unwrap_or("");
                out.push_str(&format!(
                    "\n{}\n{}\n  confidence {:.2}, completeness {:.2}, {} ms\n",
                    format!("── {} ──", response.specialty).yellow().bold(),
                    summary,
                    response.confidence,
                    response.data_completeness,
                    response.latency_ms
                ));
            } else {
                out.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ──", response.specialty).red().bold(),
                    response.error.as_deref().unwrap_or("Unknown")
                ));
            }
        }

        // Phase 2: Conference
        if let Some(conference) = &output.conference {
            out.push_str(&Self::section_header("Phase 2: Dialogue Conference"));
            out.push_str(&Self::format_conference(conference));
        }

        // Phase 3: Report
        out.push_str(&Self::section_header("Phase 3: Synthesized Report"));
        out.push_str(&Self::format_report(output));

        out
    }

    /// Format only the synthesized report
    pub fn format_summary(output: &ConsultationOutput) -> String {
        let mut out = String::new();
        out.push_str(&Self::header("Consultation Report"));
        out.push('\n');
        out.push_str(&Self::format_report(output));
        out
    }

    /// Format the result as pretty-printed JSON
    pub fn format_json(output: &ConsultationOutput) -> String {
        serde_json::to_string_pretty(output)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Format an extra resolution applied from outcome feedback
    pub fn format_resolution(resolution: &Resolution) -> String {
        let mut out = String::new();
        out.push_str(&Self::section_header(&format!(
            "Resolution via {}",
            resolution.source
        )));
        for settlement in &resolution.settlements {
            let sign = if settlement.net_change >= 0 { "+" } else { "" };
            out.push_str(&format!(
                "  {}: accuracy {:.2}, {} won, {} lost ({}{})\n",
                settlement.agent_id,
                settlement.accuracy,
                settlement.tokens_won,
                settlement.tokens_lost,
                sign,
                settlement.net_change
            ));
        }
        out
    }

    /// Format market statistics and per-agent records
    pub fn format_market(stats: &MarketStats, records: &[AgentPerformanceRecord]) -> String {
        let mut out = String::new();
        out.push_str(&Self::section_header("Prediction Market"));
        out.push_str(&format!(
            "  sets: {} ({} active, {} resolved), resolutions: {}\n",
            stats.prediction_sets, stats.active_sets, stats.resolved_sets, stats.resolutions
        ));
        out.push_str(&format!(
            "  staked: {}, won: {}, lost: {}\n",
            stats.total_staked, stats.total_won, stats.total_lost
        ));

        for record in records {
            out.push_str(&format!(
                "  {}: {} predictions, avg accuracy {:.2}, net {}{}\n",
                record.agent_id.to_string().yellow(),
                record.predictions_made,
                record.average_accuracy(),
                if record.total_won >= record.total_lost { "+" } else { "-" },
                record.total_won.abs_diff(record.total_lost)
            ));
        }
        out
    }

    fn format_conference(conference: &ConferenceMetadata) -> String {
        let mut out = String::new();

        for exchange in &conference.exchanges {
            let marker = if exchange.diagnostic_impact {
                "!".red().bold().to_string()
            } else {
                "-".to_string()
            };
            out.push_str(&format!(
                "\n{} {} -> {}: {}\n    {}\n",
                marker,
                exchange.from.to_string().yellow(),
                exchange.to.to_string().yellow(),
                exchange.question,
                exchange.answer.replace('\n', "\n    ")
            ));
        }

        if !conference.disagreements.is_empty() {
            out.push_str(&format!("\n{}\n", "Disagreements:".red().bold()));
            for disagreement in &conference.disagreements {
                let severity = match disagreement.severity {
                    Severity::High => "high".red().bold().to_string(),
                    Severity::Medium => "medium".yellow().to_string(),
                    Severity::Low => "low".normal().to_string(),
                };
                out.push_str(&format!(
                    "  [{}] {} ({:?})\n",
                    severity, disagreement.topic, disagreement.kind
                ));
                if let Some(resolution) = &disagreement.resolution {
                    out.push_str(&format!("      resolution: {}\n", resolution));
                }
            }
        }

        if !conference.findings.is_empty() {
            out.push_str(&format!("\n{}\n", "Emergent Findings:".green().bold()));
            for finding in &conference.findings {
                out.push_str(&format!(
                    "  [{:?}] {}\n",
                    finding.novelty, finding.finding
                ));
            }
        }

        if let Some(error) = &conference.error {
            out.push_str(&format!("\n{} {}\n", "Round error:".red().bold(), error));
        }

        out
    }

    fn format_report(output: &ConsultationOutput) -> String {
        let mut out = String::new();
        let report = &output.report;

        out.push_str(&format!(
            "\n{} {:.2}\n",
            "Consensus confidence:".cyan().bold(),
            report.consensus_confidence
        ));

        if report.has_red_flags() {
            out.push_str(&format!("\n{}\n", "RED FLAGS:".red().bold()));
            for flag in &report.red_flags {
                out.push_str(&format!(
                    "  ! {} ({}): {}\n",
                    flag.keyword.red(),
                    flag.specialty,
                    flag.context
                ));
            }
        }

        for phase in [PlanPhase::Acute, PlanPhase::Recovery, PlanPhase::Maintenance] {
            let items: Vec<_> = report.phase_items(phase).collect();
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!(
                "\n{}\n",
                format!("{} phase:", phase.as_str()).cyan().bold()
            ));
            for item in items {
                out.push_str(&format!(
                    "  {}. {} ({})\n",
                    item.priority, item.intervention, item.specialty
                ));
            }
        }

        if !report.specialist_summaries.is_empty() {
            out.push_str(&format!("\n{}\n", "Panel summaries:".cyan().bold()));
            for (specialty, summary) in &report.specialist_summaries {
                out.push_str(&format!("  {}: {}\n", specialty.to_string().yellow(), summary));
            }
        }

        out
    }

    fn header(title: &str) -> String {
        format!(
            "{}\n{}\n{}\n",
            "=".repeat(60),
            format!("  {}", title).bold(),
            "=".repeat(60)
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(60))
    }
}
