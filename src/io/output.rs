use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

use crate::core::ComplaintCluster;
use crate::report::AnalysisSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// Everything a writer renders for one run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisDocument {
    pub subreddit: Option<String>,
    pub window_months: Option<u32>,
    pub generated_at: DateTime<Utc>,
    pub posts_analyzed: usize,
    pub summary: AnalysisSummary,
    pub clusters: Vec<ComplaintCluster>,
    /// Stage failures, already formatted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl AnalysisDocument {
    pub fn new(clusters: Vec<ComplaintCluster>, posts_analyzed: usize) -> Self {
        Self {
            subreddit: None,
            window_months: None,
            generated_at: Utc::now(),
            posts_analyzed,
            summary: AnalysisSummary::from_clusters(&clusters),
            clusters,
            failures: Vec::new(),
        }
    }

    fn title(&self) -> String {
        match &self.subreddit {
            Some(name) => format!("Complaint Analysis: r/{name}"),
            None => "Complaint Analysis".to_string(),
        }
    }

    fn window_label(&self) -> String {
        match self.window_months {
            Some(1) => "last month".to_string(),
            Some(n) => format!("last {n} months"),
            None => "all time".to_string(),
        }
    }
}

pub trait OutputWriter {
    fn write_document(&mut self, document: &AnalysisDocument) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_document(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_document(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        self.write_header(document)?;
        self.write_summary(document)?;
        self.write_clusters(document)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        writeln!(self.writer, "# {}", document.title())?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            document.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Window: {}", document.window_label())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        let summary = &document.summary;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Posts analyzed | {} |", document.posts_analyzed)?;
        writeln!(self.writer, "| Complaints | {} |", summary.complaint_count)?;
        writeln!(self.writer, "| Clusters | {} |", summary.cluster_count)?;
        writeln!(
            self.writer,
            "| With negative terms | {} |",
            summary.negative_complaints
        )?;
        writeln!(
            self.writer,
            "| Mean sentiment | {:.2} |",
            summary.mean_sentiment
        )?;
        if let Some(category) = &summary.dominant_category {
            writeln!(self.writer, "| Dominant category | {category} |")?;
        }
        writeln!(self.writer)?;

        for failure in &document.failures {
            writeln!(self.writer, "> **Warning:** {failure}")?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_clusters(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        if document.clusters.is_empty() {
            writeln!(self.writer, "No complaints found.")?;
            return Ok(());
        }

        writeln!(self.writer, "## Complaint Clusters")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| # | Summary | Frequency | Total score | Avg sentiment | Negative | Category |"
        )?;
        writeln!(
            self.writer,
            "|---|---------|-----------|-------------|---------------|----------|----------|"
        )?;
        for (i, cluster) in document.clusters.iter().enumerate() {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {:.2} | {} | {} |",
                i + 1,
                escape_markdown_cell(&cluster.summary),
                cluster.frequency,
                cluster.total_score,
                cluster.avg_sentiment,
                cluster.negative_terms_count,
                cluster.category.as_deref().unwrap_or("-")
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_document(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        self.print_header(document)?;
        self.print_summary(document)?;
        self.print_clusters(document)?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_header(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        let title = document.title();
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.chars().count()).blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_summary(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        let summary = &document.summary;
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(self.writer, "  Window: {}", document.window_label())?;
        writeln!(self.writer, "  Posts analyzed: {}", document.posts_analyzed)?;
        writeln!(self.writer, "  Complaints: {}", summary.complaint_count)?;
        writeln!(self.writer, "  Clusters: {}", summary.cluster_count)?;
        writeln!(
            self.writer,
            "  Mean sentiment: {}",
            sentiment_colored(summary.mean_sentiment)
        )?;
        if let Some(category) = &summary.dominant_category {
            writeln!(self.writer, "  Dominant category: {}", category.yellow())?;
        }
        for failure in &document.failures {
            writeln!(self.writer, "  {} {}", "Warning:".yellow().bold(), failure)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_clusters(&mut self, document: &AnalysisDocument) -> anyhow::Result<()> {
        if document.clusters.is_empty() {
            writeln!(self.writer, "{}", "No complaints found.".green())?;
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "#", "Summary", "Freq", "Score", "Sentiment", "Negative", "Category",
            ]);
        for (i, cluster) in document.clusters.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                cluster.summary.replace('\n', " "),
                cluster.frequency.to_string(),
                cluster.total_score.to_string(),
                format!("{:.2}", cluster.avg_sentiment),
                cluster.negative_terms_count.to_string(),
                cluster.category.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

fn sentiment_colored(value: f64) -> ColoredString {
    let text = format!("{value:.2}");
    match value {
        v if v < -0.2 => text.red(),
        v if v < 0.0 => text.yellow(),
        _ => text.green(),
    }
}

pub fn create_writer<'a>(format: OutputFormat, writer: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Complaint, SourceKind, SourceRef};

    fn document() -> AnalysisDocument {
        let complaint = Complaint {
            id: "post-1".into(),
            text: "Checkout | payment broken".into(),
            score: 12,
            confidence: 0.3,
            category: Some("product-issue".into()),
            sentiment: -0.29,
            contains_negative_terms: false,
            source: SourceRef {
                kind: SourceKind::Post,
                id: "1".into(),
                author: "alice".into(),
                score: 12,
                permalink: "/r/shop/comments/1".into(),
                created_utc: 1_700_000_000.0,
            },
        };
        let mut doc = AnalysisDocument::new(vec![ComplaintCluster::singleton("cluster-1", complaint)], 4);
        doc.subreddit = Some("shop".into());
        doc.window_months = Some(3);
        doc
    }

    fn render(format: OutputFormat, doc: &AnalysisDocument) -> String {
        let mut buffer = Vec::new();
        create_writer(format, Box::new(&mut buffer))
            .write_document(doc)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_json_document_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &document())).unwrap();
        assert_eq!(value["subreddit"], "shop");
        assert_eq!(value["window_months"], 3);
        assert_eq!(value["summary"]["complaint_count"], 1);
        assert_eq!(value["clusters"][0]["id"], "cluster-1");
        assert_eq!(value["clusters"][0]["complaints"][0]["source"]["type"], "post");
        assert!(value.get("failures").is_none());
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let out = render(OutputFormat::Markdown, &document());
        assert!(out.starts_with("# Complaint Analysis: r/shop"));
        assert!(out.contains("Window: last 3 months"));
        assert!(out.contains("Checkout \\| payment broken"));
        assert!(out.contains("| Dominant category | product-issue |"));
    }

    #[test]
    fn test_markdown_empty_result() {
        let doc = AnalysisDocument::new(Vec::new(), 0);
        let out = render(OutputFormat::Markdown, &doc);
        assert!(out.contains("No complaints found."));
        assert!(out.contains("Window: all time"));
    }

    #[test]
    fn test_terminal_lists_clusters_and_failures() {
        let mut doc = document();
        doc.failures.push("complaint clustering failed: boom".into());
        let out = render(OutputFormat::Terminal, &doc);
        assert!(out.contains("Checkout | payment broken"));
        assert!(out.contains("product-issue"));
        assert!(out.contains("complaint clustering failed: boom"));
    }
}
