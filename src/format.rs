//! Turn decoded GLVD records into renderable blocks.
//!
//! Everything in here is total: sparse or ragged records produce a document,
//! never an error. Writing the document is the only fallible step.

use crate::model::{CveContext, CveDetail, CveDetailsWithContext, VulnerabilitySummary};
use crate::severity::Severity;
use crate::style::{Cell, Presenter, Tag};
use crate::table::{Column, Table};
use crate::zip_ragged;
use std::io::{self, Write};

pub const SUMMARY_COLUMNS: &[Column] = &[
    Column::new("CVE ID", 18),
    Column::new("Vuln", 4),
    Column::new("Score", 5),
    Column::new("Vector String", 46),
    Column::new("Source Package", 20),
    Column::new("Version", 20),
];

pub const KERNEL_COLUMNS: &[Column] = &[
    Column::new("LTS Version", 20),
    Column::new("Fixed Version", 20),
    Column::new("Is Fixed", 10),
    Column::new("Relevant Subsystem", 20),
];

pub const DISTRO_COLUMNS: &[Column] = &[
    Column::new("Distro", 25),
    Column::new("Version", 18),
    Column::new("Vuln?", 10),
    Column::new("SourcePkg", 25),
    Column::new("SourceVer", 25),
    Column::new("VersionFixed", 20),
];

pub const CVSS_COLUMNS: &[Column] = &[
    Column::new("Version", 18),
    Column::new("Base Score", 12),
    Column::new("Vector String", 46),
];

pub const NO_CONTEXT: &str = "No context information available.";
pub const NO_VERSIONS: &str = "No Garden Linux versions found.";

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Fields(Vec<(String, Cell)>),
    Table(Table),
    Notice(String),
    /// A `Label #n:` line followed by indented fields and a blank line.
    Entry {
        label: String,
        number: usize,
        fields: Vec<(String, Cell)>,
    },
    /// One indented item per line.
    List(Vec<Cell>),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn render<W: Write>(&self, w: &mut W, presenter: Presenter) -> io::Result<()> {
        for block in &self.blocks {
            match block {
                Block::Heading(text) => writeln!(w, "{}", presenter.paint(text, Tag::Header))?,
                Block::Fields(fields) => render_fields(w, presenter, "", fields)?,
                Block::Table(table) => table.render(w, presenter)?,
                Block::Notice(text) => writeln!(w, "{}", presenter.paint(text, Tag::Value))?,
                Block::Entry { label, number, fields } => {
                    writeln!(w, "{} #{}:", presenter.paint(label, Tag::Label), number)?;
                    render_fields(w, presenter, "  ", fields)?;
                    writeln!(w)?;
                }
                Block::List(items) => {
                    for item in items {
                        writeln!(w, "  {}", presenter.paint_cell(item))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn render_fields<W: Write>(
    w: &mut W,
    presenter: Presenter,
    indent: &str,
    fields: &[(String, Cell)],
) -> io::Result<()> {
    for (label, value) in fields {
        let label = presenter.paint(label, Tag::Label);
        writeln!(w, "{}{}: {}", indent, label, presenter.paint_cell(value))?;
    }
    Ok(())
}

fn field(label: &str, value: Cell) -> (String, Cell) {
    (label.to_string(), value)
}

fn flag(value: bool, yes: (&str, Tag), no: (&str, Tag)) -> Cell {
    let (text, tag) = if value { yes } else { no };
    Cell::new(text, tag)
}

/// Score cell for summaries, `%4.1f` or empty when unscored.
fn summary_score(score: f64) -> Cell {
    let severity = Severity::classify(score);
    if severity.is_scored() {
        Cell::new(format!("{:4.1}", score), severity.tag())
    } else {
        Cell::empty()
    }
}

pub fn summary_row(summary: &VulnerabilitySummary) -> Vec<Cell> {
    vec![
        Cell::plain(&summary.cve_id),
        flag(summary.is_vulnerable, ("YES", Tag::Important), ("no", Tag::Plain)),
        summary_score(summary.base_score),
        Cell::plain(&summary.vector_string),
        Cell::plain(&summary.source_package_name),
        Cell::plain(&summary.source_package_version),
    ]
}

/// One row per summary, in the order the service returned them.
pub fn summary_table(summaries: &[VulnerabilitySummary]) -> Table {
    let mut table = Table::new(SUMMARY_COLUMNS);
    for summary in summaries {
        table.push(summary_row(summary));
    }
    table
}

pub fn summary_document(summaries: &[VulnerabilitySummary]) -> Document {
    Document {
        blocks: vec![Block::Table(summary_table(summaries))],
    }
}

pub fn versions_document(versions: &[String]) -> Document {
    let mut doc = Document::default();
    if versions.is_empty() {
        doc.push(Block::Notice(NO_VERSIONS.to_string()));
    } else {
        doc.push(Block::Heading("Garden Linux Versions:".to_string()));
        doc.push(Block::List(versions.iter().map(Cell::value).collect()));
    }
    doc
}

fn detail_header(d: &CveDetail) -> Vec<(String, Cell)> {
    vec![
        field("CVE ID", Cell::value(&d.cve_id)),
        field("Status", Cell::value(&d.vuln_status)),
        field("Description", Cell::value(&d.description)),
        field("Published", Cell::value(&d.cve_published_date)),
        field("Modified", Cell::value(&d.cve_modified_date)),
        field("Ingested", Cell::value(&d.cve_ingested_date)),
    ]
}

/// `None` if the record carries no kernel facts at all.
pub fn kernel_table(d: &CveDetail) -> Option<Table> {
    let rows = zip_ragged!(
        d.kernel_lts_version,
        d.kernel_fixed_version,
        d.kernel_is_fixed,
        d.kernel_is_relevant_subsystem,
    );
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new(KERNEL_COLUMNS);
    for (lts, fixed_version, is_fixed, relevant) in rows {
        table.push(vec![
            Cell::value(lts),
            Cell::value(fixed_version),
            flag(is_fixed, ("YES", Tag::Fixed), ("NO", Tag::Important)),
            flag(relevant, ("YES", Tag::Important), ("no", Tag::Value)),
        ]);
    }
    Some(table)
}

pub fn distro_table(d: &CveDetail) -> Table {
    let rows = zip_ragged!(
        d.distro,
        d.distro_version,
        d.is_vulnerable,
        d.source_package_name,
        d.source_package_version,
        d.version_fixed,
    );

    let mut table = Table::new(DISTRO_COLUMNS);
    for (distro, version, is_vulnerable, pkg, pkg_version, fixed) in rows {
        table.push(vec![
            Cell::value(distro),
            Cell::value(version),
            flag(is_vulnerable, ("YES", Tag::Important), ("no", Tag::Value)),
            Cell::value(pkg),
            Cell::value(pkg_version),
            Cell::value(fixed),
        ]);
    }
    table
}

pub fn cvss_table(d: &CveDetail) -> Table {
    let versions = [
        ("V4.0", d.base_score_v40, &d.vector_string_v40),
        ("V3.1", d.base_score_v31, &d.vector_string_v31),
        ("V3.0", d.base_score_v30, &d.vector_string_v30),
        ("V2", d.base_score_v2, &d.vector_string_v2),
    ];

    let mut table = Table::new(CVSS_COLUMNS);
    for (version, score, vector) in versions {
        let severity = Severity::classify(score);
        let score = if severity.is_scored() {
            Cell::new(format!("{:.1}", score), severity.tag())
        } else {
            Cell::empty()
        };
        table.push(vec![Cell::value(version), score, Cell::value(vector.as_str())]);
    }
    table
}

fn context_fields(ctx: &CveContext) -> Vec<(String, Cell)> {
    vec![
        field("ID", Cell::plain(ctx.id.to_string())),
        field("CVE ID", Cell::plain(&ctx.cve_id)),
        field("Dist ID", Cell::plain(ctx.distribution_id.to_string())),
        field("Create Date", Cell::plain(&ctx.create_date)),
        field("Use Case", Cell::plain(&ctx.use_case)),
        field("Score Override", Cell::plain(format!("{:.2}", ctx.score_override))),
        field("Description", Cell::plain(&ctx.description)),
        field("Resolved", Cell::plain(ctx.resolved.to_string())),
    ]
}

pub fn detail_document(detail: &CveDetailsWithContext) -> Document {
    let d = &detail.details;
    let mut doc = Document::default();

    doc.push(Block::Heading("=== CVE Details ===".to_string()));
    doc.push(Block::Fields(detail_header(d)));

    if let Some(table) = kernel_table(d) {
        doc.push(Block::Heading("=== Kernel Details ===".to_string()));
        doc.push(Block::Table(table));
    }

    doc.push(Block::Heading("=== Per-Distro/Package Details ===".to_string()));
    doc.push(Block::Table(distro_table(d)));

    doc.push(Block::Heading("=== CVSS Scores & Vectors ===".to_string()));
    doc.push(Block::Table(cvss_table(d)));

    if detail.contexts.is_empty() {
        doc.push(Block::Notice(NO_CONTEXT.to_string()));
    } else {
        doc.push(Block::Heading("=== Contexts ===".to_string()));
        for (idx, ctx) in detail.contexts.iter().enumerate() {
            doc.push(Block::Entry {
                label: "Context".to_string(),
                number: idx + 1,
                fields: context_fields(ctx),
            });
        }
    }

    doc
}

pub fn write_summaries<W: Write>(
    w: &mut W,
    presenter: Presenter,
    summaries: &[VulnerabilitySummary],
) -> io::Result<()> {
    summary_document(summaries).render(w, presenter)
}

pub fn write_detail<W: Write>(
    w: &mut W,
    presenter: Presenter,
    detail: &CveDetailsWithContext,
) -> io::Result<()> {
    detail_document(detail).render(w, presenter)
}

pub fn write_versions<W: Write>(
    w: &mut W,
    presenter: Presenter,
    versions: &[String],
) -> io::Result<()> {
    versions_document(versions).render(w, presenter)
}
