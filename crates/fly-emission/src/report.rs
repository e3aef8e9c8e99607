//! Report sinks.
//!
//! [`CsvReport`] writes one comma-separated row per rewarded sale, preceded
//! by a header. Opening a path truncates whatever was there. Rows are
//! buffered and flushed by [`ReportSink::finish`] or when the report is
//! dropped.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use fly_core::error::ReportError;
use fly_core::traits::ReportSink;
use fly_core::types::{ReportLayout, SaleEvent};

fn csv_error(err: csv::Error) -> ReportError {
    ReportError::Csv(err.to_string())
}

/// CSV report over any writer.
pub struct CsvReport<W: Write> {
    writer: csv::Writer<W>,
    layout: Option<ReportLayout>,
    rows: u64,
}

impl CsvReport<File> {
    /// Create (or truncate) the report file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvReport<W> {
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner);
        Self {
            writer,
            layout: None,
            rows: 0,
        }
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer
            .into_inner()
            .map_err(|err| ReportError::Io(err.into_error()))
    }
}

impl<W: Write> ReportSink for CsvReport<W> {
    fn begin(&mut self, layout: ReportLayout) -> Result<(), ReportError> {
        self.writer.write_record(layout.columns()).map_err(csv_error)?;
        self.layout = Some(layout);
        Ok(())
    }

    fn record(&mut self, event: &SaleEvent) -> Result<(), ReportError> {
        let layout = self.layout.ok_or(ReportError::NotStarted)?;
        self.writer
            .write_record(event.fields(layout))
            .map_err(csv_error)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every sale in memory.
#[derive(Debug, Default)]
pub struct MemoryReport {
    layout: Option<ReportLayout>,
    events: Vec<SaleEvent>,
    finished: bool,
}

impl MemoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> Option<ReportLayout> {
        self.layout
    }

    pub fn events(&self) -> &[SaleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SaleEvent> {
        self.events
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ReportSink for MemoryReport {
    fn begin(&mut self, layout: ReportLayout) -> Result<(), ReportError> {
        self.layout = Some(layout);
        Ok(())
    }

    fn record(&mut self, event: &SaleEvent) -> Result<(), ReportError> {
        if self.layout.is_none() {
            return Err(ReportError::NotStarted);
        }
        self.events.push(event.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ReportError> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fly_core::types::period_label;

    fn sale(index: u64) -> SaleEvent {
        SaleEvent {
            sale_index: index,
            month: 1,
            reward_per_unit: 36.54,
            contract_value: 146_160.0,
            remaining_supply: 8_553_840.0,
            mint_coefficient: 0.0000042,
            avidity: 1.0,
            demand_level: 1,
            period: period_label(2023, 1),
        }
    }

    fn render(layout: ReportLayout, events: &[SaleEvent]) -> String {
        let mut report = CsvReport::from_writer(Vec::new());
        report.begin(layout).unwrap();
        for e in events {
            report.record(e).unwrap();
        }
        report.finish().unwrap();
        String::from_utf8(report.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn plain_header_and_row() {
        let out = render(ReportLayout::Plain, &[sale(1)]);
        assert_eq!(
            out,
            "real_estate_sold,reward_per_nft,contract_value,remaining_supply,rmc,real_estate_per_month,date\n\
             1,36.54,146160,8553840,0.0000042,1,2024-01\n"
        );
    }

    #[test]
    fn avidity_header_and_row() {
        let out = render(ReportLayout::WithAvidity, &[sale(1)]);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("real_estate_sold,reward_per_nft,contract_value,remaining_supply,rmc,avidity,real_estate_per_month,date")
        );
        assert_eq!(lines.next(), Some("1,36.54,146160,8553840,0.0000042,1,1,2024-01"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn counts_rows() {
        let mut report = CsvReport::from_writer(Vec::new());
        report.begin(ReportLayout::Plain).unwrap();
        report.record(&sale(1)).unwrap();
        report.record(&sale(2)).unwrap();
        assert_eq!(report.rows(), 2);
    }

    #[test]
    fn record_before_begin_fails() {
        let mut report = CsvReport::from_writer(Vec::new());
        assert!(matches!(report.record(&sale(1)), Err(ReportError::NotStarted)));
        let mut memory = MemoryReport::new();
        assert!(matches!(memory.record(&sale(1)), Err(ReportError::NotStarted)));
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fly_reward.csv");
        std::fs::write(&path, "stale contents that must disappear\n".repeat(100)).unwrap();

        let mut report = CsvReport::create(&path).unwrap();
        report.begin(ReportLayout::Plain).unwrap();
        report.record(&sale(1)).unwrap();
        report.finish().unwrap();
        drop(report);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn memory_report_collects_events() {
        let mut memory = MemoryReport::new();
        memory.begin(ReportLayout::WithAvidity).unwrap();
        memory.record(&sale(1)).unwrap();
        memory.finish().unwrap();
        assert_eq!(memory.layout(), Some(ReportLayout::WithAvidity));
        assert_eq!(memory.events().len(), 1);
        assert!(memory.is_finished());
        assert_eq!(memory.into_events()[0].sale_index, 1);
    }
}
