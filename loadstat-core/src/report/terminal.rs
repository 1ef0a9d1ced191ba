use std::io::{self, Write};

use colored::Colorize;

use super::{ReportError, Reporter};
use crate::analysis::{BatchComparison, ColumnComparison, EstimateOutcome, MeanDiff};
use crate::stats::{ColumnStats, MeanClassification};

/// A reporter that renders a batch comparison as a terminal table.
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a timing in milliseconds to a human-readable string.
    fn format_time(ms: f64) -> String {
        if ms.abs() >= 1_000.0 {
            format!("{:.3} s", ms / 1_000.0)
        } else {
            format!("{:.3} ms", ms)
        }
    }

    /// Format a column's mean with its standard deviation.
    fn format_stats(stats: &ColumnStats) -> String {
        let mean = Self::format_time(stats.mean);
        let stddev = Self::format_time(stats.variance.sqrt());
        format!("{} (+/- {})", mean, stddev)
    }

    fn format_change(mean: &MeanDiff) -> String {
        match mean {
            MeanDiff::Compared { percent_diff, .. } => format!("{:+.2}%", percent_diff),
            MeanDiff::Incomparable => "n/a".to_string(),
        }
    }

    fn format_interval(estimate: &EstimateOutcome) -> String {
        match estimate {
            EstimateOutcome::Estimated(e) => {
                format!("[{:.3}, {:.3}]", e.lower_bound, e.upper_bound)
            }
            EstimateOutcome::Indeterminate { .. } => "indeterminate".to_string(),
        }
    }

    fn format_verdict(column: &ColumnComparison) -> &'static str {
        match &column.mean {
            MeanDiff::Compared { classification, .. } => match classification {
                MeanClassification::Faster => "faster",
                MeanClassification::Slower => "slower",
                MeanClassification::Unchanged => "unchanged",
            },
            MeanDiff::Incomparable => "incomparable",
        }
    }

    fn colorize(&self, text: String, column: &ColumnComparison) -> String {
        if !self.use_colors {
            return text;
        }
        match &column.mean {
            MeanDiff::Compared { classification, .. } => match classification {
                MeanClassification::Faster => text.green().bold().to_string(),
                MeanClassification::Slower => text.red().bold().to_string(),
                MeanClassification::Unchanged => text,
            },
            MeanDiff::Incomparable => text.yellow().to_string(),
        }
    }

    fn print_header(&self, writer: &mut impl Write, comparison: &BatchComparison) -> io::Result<()> {
        writeln!(writer)?;
        let header = format!(
            "{:<36} {:>24} {:>24} {:>10} {:>20} {:>14}",
            "Metric",
            format!("Baseline ({})", comparison.baseline),
            format!("Candidate ({})", comparison.candidate),
            "Change",
            "Interval",
            "Verdict"
        );
        if self.use_colors {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        writeln!(writer, "{}", "-".repeat(134))?;
        Ok(())
    }

    fn print_row(&self, writer: &mut impl Write, column: &ColumnComparison) -> io::Result<()> {
        // Truncate on character boundaries; metric names from a custom
        // allow-list are not guaranteed to be ASCII.
        let name = if column.column.chars().count() > 34 {
            let head: String = column.column.chars().take(31).collect();
            format!("{}...", head)
        } else {
            column.column.clone()
        };

        let baseline = Self::format_stats(&column.baseline);
        let candidate = Self::format_stats(&column.candidate);
        let change = self.colorize(format!("{:>10}", Self::format_change(&column.mean)), column);
        let interval = match &column.estimate {
            EstimateOutcome::Estimated(_) => format!("{:>20}", Self::format_interval(&column.estimate)),
            EstimateOutcome::Indeterminate { .. } => {
                let text = format!("{:>20}", Self::format_interval(&column.estimate));
                if self.use_colors {
                    text.yellow().to_string()
                } else {
                    text
                }
            }
        };
        let verdict = self.colorize(
            format!("{:>14}", Self::format_verdict(column)),
            column,
        );

        writeln!(
            writer,
            "{:<36} {:>24} {:>24} {} {} {}",
            name, baseline, candidate, change, interval, verdict
        )?;
        Ok(())
    }

    fn print_summary(
        &self,
        writer: &mut impl Write,
        comparison: &BatchComparison,
    ) -> io::Result<()> {
        let mut faster = 0;
        let mut slower = 0;
        let mut unchanged = 0;
        let mut incomparable = 0;
        let mut indeterminate = 0;

        for column in &comparison.columns {
            match &column.mean {
                MeanDiff::Compared { classification, .. } => match classification {
                    MeanClassification::Faster => faster += 1,
                    MeanClassification::Slower => slower += 1,
                    MeanClassification::Unchanged => unchanged += 1,
                },
                MeanDiff::Incomparable => incomparable += 1,
            }
            if matches!(column.estimate, EstimateOutcome::Indeterminate { .. }) {
                indeterminate += 1;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(134))?;

        let summary_label = "Summary:";
        if self.use_colors {
            write!(writer, "{} ", summary_label.bold())?;
        } else {
            write!(writer, "{} ", summary_label)?;
        }

        let faster_text = format!("{} faster", faster);
        let slower_text = format!("{} slower", slower);
        let unchanged_text = format!("{} unchanged", unchanged);
        let incomparable_text = format!("{} incomparable", incomparable);
        let indeterminate_text = format!("{} indeterminate intervals", indeterminate);

        if self.use_colors {
            writeln!(
                writer,
                "{}, {}, {}, {}; {}",
                faster_text.green(),
                slower_text.red(),
                unchanged_text,
                incomparable_text.yellow(),
                indeterminate_text.yellow()
            )?;
        } else {
            writeln!(
                writer,
                "{}, {}, {}, {}; {}",
                faster_text, slower_text, unchanged_text, incomparable_text, indeterminate_text
            )?;
        }

        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, comparison: &BatchComparison) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();

        self.print_header(&mut writer, comparison)?;

        for column in &comparison.columns {
            self.print_row(&mut writer, column)?;
        }

        self.print_summary(&mut writer, comparison)?;

        Ok(())
    }
}
