//! The scrape-normalize-upsert pipeline.
//!
//! Per (page, year) run: for each suboption in catalog order (or the single
//! implicit `default`), fetch → parse → translate → classify → upsert each
//! row. Failures in fetch or parse are local to their suboption; failures
//! while persisting a row abort only that row. The run's terminal outcome is
//! an ordered per-suboption status map.

pub mod classify;
pub mod errors;
pub mod parser;
pub mod sanitize;
pub mod translate;

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::catalog::Page;
use crate::data::store::ScrapedRecord;
use crate::data::{Entity, StoredRecord};
use crate::scraper::classify::classification_label;
use crate::scraper::errors::ScrapeError;
use crate::scraper::parser::{ParserRegistry, RawRow};
use crate::scraper::translate::ColumnTranslator;

/// Fetches the raw HTML of one report page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        year: i32,
        option: &str,
        suboption: Option<&str>,
    ) -> Result<String, ScrapeError>;
}

/// Persists one normalized row.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn store(
        &self,
        entity: Entity,
        record: &ScrapedRecord,
    ) -> Result<StoredRecord, ScrapeError>;
}

/// Terminal status of one suboption within a run.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SuboptionOutcome {
    /// Rows were parsed and persisted.
    Stored { rows: usize },
    /// Valid empty outcome: the table existed but held no rows, or no parser
    /// is registered for the page.
    #[serde(rename = "no data")]
    NoData,
    /// A failure requiring attention; `rows` counts what still landed.
    Error { detail: String, rows: usize },
}

/// Result of one (page, year) run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub page: Page,
    pub year: i32,
    pub suboptions: IndexMap<String, SuboptionOutcome>,
}

/// Coordinates fetching, parsing, normalization and persistence.
#[derive(Clone)]
pub struct ScrapePipeline {
    fetcher: Arc<dyn PageFetcher>,
    registry: Arc<ParserRegistry>,
    translator: ColumnTranslator,
    sink: Arc<dyn RecordSink>,
}

impl ScrapePipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        registry: Arc<ParserRegistry>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            fetcher,
            registry,
            translator: ColumnTranslator::new(),
            sink,
        }
    }

    /// Scrape one page for one year, one suboption at a time.
    ///
    /// Suboption failures never abort siblings; the report records each
    /// suboption's outcome separately.
    pub async fn run_page(&self, page: Page, year: i32) -> ScrapeReport {
        let spec = page.spec();
        let mut suboptions = IndexMap::new();

        let targets: Vec<Option<&str>> = if spec.suboptions.is_empty() {
            vec![None]
        } else {
            spec.suboptions.iter().map(|s| Some(*s)).collect()
        };

        for suboption in targets {
            let key = suboption.unwrap_or("default");
            let outcome = self
                .run_suboption(page, spec.entity, year, suboption)
                .await;
            info!(
                page = %page,
                year,
                suboption = key,
                outcome = ?outcome,
                "suboption finished"
            );
            suboptions.insert(key.to_string(), outcome);
        }

        ScrapeReport {
            page,
            year,
            suboptions,
        }
    }

    /// Scrape every page in the catalog for one year.
    pub async fn run_all(&self, year: i32) -> Vec<ScrapeReport> {
        let mut reports = Vec::with_capacity(Page::ALL.len());
        for page in Page::ALL {
            info!(page = %page, year, "scraping page");
            reports.push(self.run_page(page, year).await);
        }
        reports
    }

    async fn run_suboption(
        &self,
        page: Page,
        entity: Entity,
        year: i32,
        suboption: Option<&str>,
    ) -> SuboptionOutcome {
        let spec = page.spec();

        let html = match self
            .fetcher
            .fetch_page(year, spec.option_code, suboption)
            .await
        {
            Ok(html) => html,
            Err(e) => {
                warn!(page = %page, year, ?suboption, error = %e, "fetch failed");
                return SuboptionOutcome::Error {
                    detail: e.to_string(),
                    rows: 0,
                };
            }
        };

        let raw_rows = match self.registry.parse(page, &html) {
            Ok(rows) => rows,
            // Missing registration degrades to an empty result so one
            // unparsed page never takes down the rest of the run.
            Err(ScrapeError::ParserNotRegistered(_)) => {
                warn!(page = %page, "no parser registered, skipping");
                return SuboptionOutcome::NoData;
            }
            Err(e) => {
                warn!(page = %page, year, ?suboption, error = %e, "parse failed");
                return SuboptionOutcome::Error {
                    detail: e.to_string(),
                    rows: 0,
                };
            }
        };

        if raw_rows.is_empty() {
            return SuboptionOutcome::NoData;
        }

        let mut stored = 0usize;
        let mut first_error: Option<String> = None;
        for raw in &raw_rows {
            let Some(record) = self.normalize(entity, year, suboption, raw) else {
                continue;
            };
            match self.sink.store(entity, &record).await {
                Ok(_) => stored += 1,
                // Row-local: prior and subsequent rows commit independently.
                Err(e) => {
                    error!(
                        page = %page,
                        year,
                        dimension = record.dimension.as_str(),
                        error = %e,
                        "failed to persist row"
                    );
                    first_error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        match first_error {
            Some(detail) => SuboptionOutcome::Error {
                detail,
                rows: stored,
            },
            None if stored == 0 => SuboptionOutcome::NoData,
            None => SuboptionOutcome::Stored { rows: stored },
        }
    }

    /// Translate and classify one raw row into a storable record.
    ///
    /// Rows without the entity's dimension column (decorative or subtotal
    /// rows) are dropped.
    fn normalize(
        &self,
        entity: Entity,
        year: i32,
        suboption: Option<&str>,
        raw: &RawRow,
    ) -> Option<ScrapedRecord> {
        let mut canonical = self.translator.translate(raw);
        let dimension = canonical.shift_remove(entity.schema().dimension_col)?;

        let classification = suboption
            .map(|code| classification_label(entity, code).unwrap_or_default().to_string());

        Some(ScrapedRecord {
            year,
            dimension,
            classification,
            quantity: canonical.shift_remove("quantity"),
            value: canonical.shift_remove("value"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned HTML keyed by suboption code.
    struct CannedFetcher {
        pages: HashMap<Option<String>, String>,
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch_page(
            &self,
            _year: i32,
            _option: &str,
            suboption: Option<&str>,
        ) -> Result<String, ScrapeError> {
            Ok(self
                .pages
                .get(&suboption.map(str::to_string))
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Collects stored records in memory.
    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<(Entity, ScrapedRecord)>>,
    }

    #[async_trait]
    impl RecordSink for MemorySink {
        async fn store(
            &self,
            entity: Entity,
            record: &ScrapedRecord,
        ) -> Result<StoredRecord, ScrapeError> {
            self.records.lock().unwrap().push((entity, record.clone()));
            Ok(StoredRecord {
                id: 0,
                year: record.year,
                product: None,
                variety: None,
                country: None,
                classification: record.classification.clone(),
                quantity: None,
                value: None,
            })
        }
    }

    fn grid(dimension_header: &str, rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(d, q)| format!("<tr><td>{d}</td><td>{q}</td></tr>"))
            .collect();
        format!(
            r#"<table class="tb_base tb_dados">
               <thead><tr><th>{dimension_header}</th><th>Quantidade (Kg)</th></tr></thead>
               <tbody>{body}</tbody></table>"#
        )
    }

    fn pipeline(fetcher: CannedFetcher, sink: Arc<MemorySink>) -> ScrapePipeline {
        ScrapePipeline::new(
            Arc::new(fetcher),
            Arc::new(ParserRegistry::with_defaults()),
            sink,
        )
    }

    #[tokio::test]
    async fn test_one_broken_suboption_does_not_abort_siblings() {
        // subopt_02 returns a page without the data grid; the other three
        // processing suboptions carry one row each.
        let mut pages = HashMap::new();
        for code in ["subopt_01", "subopt_03", "subopt_04"] {
            pages.insert(
                Some(code.to_string()),
                grid("Cultivar", &[("Isabel", "1.234")]),
            );
        }
        pages.insert(
            Some("subopt_02".to_string()),
            "<html><body>sem tabela</body></html>".to_string(),
        );

        let sink = Arc::new(MemorySink::default());
        let report = pipeline(CannedFetcher { pages }, sink.clone())
            .run_page(Page::Processing, 2023)
            .await;

        assert_eq!(report.suboptions.len(), 4);
        assert_eq!(
            report.suboptions["subopt_01"],
            SuboptionOutcome::Stored { rows: 1 }
        );
        assert!(matches!(
            report.suboptions["subopt_02"],
            SuboptionOutcome::Error { rows: 0, .. }
        ));
        assert_eq!(
            report.suboptions["subopt_04"],
            SuboptionOutcome::Stored { rows: 1 }
        );
        assert_eq!(sink.records.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_classification_is_attached_per_suboption() {
        let mut pages = HashMap::new();
        for code in ["subopt_01", "subopt_02", "subopt_03", "subopt_04"] {
            pages.insert(
                Some(code.to_string()),
                grid("Cultivar", &[("Niagara", "10")]),
            );
        }

        let sink = Arc::new(MemorySink::default());
        pipeline(CannedFetcher { pages }, sink.clone())
            .run_page(Page::Processing, 2022)
            .await;

        let records = sink.records.lock().unwrap();
        let classifications: Vec<_> = records
            .iter()
            .map(|(_, r)| r.classification.clone().unwrap())
            .collect();
        assert_eq!(
            classifications,
            [
                "Viníferas",
                "Americanas e híbridas",
                "Uvas de mesa",
                "Sem classificação"
            ]
        );
    }

    #[tokio::test]
    async fn test_default_suboption_has_no_classification() {
        let mut pages = HashMap::new();
        pages.insert(
            None,
            grid("Produto", &[("VINHO DE MESA", "169.762.429"), ("Suco", "-")]),
        );

        let sink = Arc::new(MemorySink::default());
        let report = pipeline(CannedFetcher { pages }, sink.clone())
            .run_page(Page::Production, 2023)
            .await;

        assert_eq!(
            report.suboptions["default"],
            SuboptionOutcome::Stored { rows: 2 }
        );
        let records = sink.records.lock().unwrap();
        assert!(records.iter().all(|(_, r)| r.classification.is_none()));
        assert_eq!(records[0].1.quantity.as_deref(), Some("169.762.429"));
        assert_eq!(records[1].1.quantity.as_deref(), Some("-"));
    }

    #[tokio::test]
    async fn test_empty_table_reports_no_data() {
        let mut pages = HashMap::new();
        pages.insert(None, grid("Produto", &[]));

        let sink = Arc::new(MemorySink::default());
        let report = pipeline(CannedFetcher { pages }, sink)
            .run_page(Page::Commercialization, 2021)
            .await;

        assert_eq!(report.suboptions["default"], SuboptionOutcome::NoData);
    }
}
