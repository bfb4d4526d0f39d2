//! HTML table extraction strategies, one per page.
//!
//! Every VitiBrasil report renders its data as a `table.tb_base.tb_dados`
//! grid, so a single [`GridTableParser`] currently serves all pages. The
//! registry keeps the page → strategy indirection anyway: pages whose markup
//! diverges get their own strategy without touching the pipeline, and an
//! unregistered page degrades to an empty result instead of failing the run.

use std::collections::HashMap;

use html_scraper::{Html, Selector};
use indexmap::IndexMap;

use crate::catalog::Page;
use crate::scraper::errors::ScrapeError;

/// A parsed table row: source column header → raw cell text, in column order.
pub type RawRow = IndexMap<String, String>;

/// Strategy for locating and extracting the data table from a fetched page.
pub trait TableParser: Send + Sync {
    /// Extract rows, or `NoTableFound` when the expected structure is absent.
    ///
    /// A present-but-empty table is a valid outcome and yields zero rows.
    fn parse(&self, html: &str) -> Result<Vec<RawRow>, ScrapeError>;
}

/// Parses the standard VitiBrasil data grid.
pub struct GridTableParser {
    table_selector: Selector,
}

impl GridTableParser {
    /// CSS selector for the data grid shared by all current report pages.
    pub const DATA_GRID: &'static str = "table.tb_base.tb_dados";

    pub fn new(selector: &str) -> Self {
        Self {
            // Selectors are compile-time constants of the registry; a typo
            // is a programming error, not a runtime condition.
            table_selector: Selector::parse(selector).expect("invalid table selector"),
        }
    }
}

impl Default for GridTableParser {
    fn default() -> Self {
        Self::new(Self::DATA_GRID)
    }
}

impl TableParser for GridTableParser {
    fn parse(&self, html: &str) -> Result<Vec<RawRow>, ScrapeError> {
        let document = Html::parse_document(html);
        let table = document
            .select(&self.table_selector)
            .next()
            .ok_or(ScrapeError::NoTableFound)?;

        let th_sel = Selector::parse("th").unwrap();
        let tr_sel = Selector::parse("tr").unwrap();
        let td_sel = Selector::parse("td").unwrap();

        let headers: Vec<String> = table
            .select(&th_sel)
            .map(|th| th.text().collect::<String>().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for tr in table.select(&tr_sel) {
            let cells: Vec<String> = tr
                .select(&td_sel)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect();

            // Header rows and the site's total/footer separators carry no
            // td cells or a different arity; skip them.
            if cells.is_empty() || cells.len() != headers.len() {
                continue;
            }

            rows.push(headers.iter().cloned().zip(cells).collect::<RawRow>());
        }

        Ok(rows)
    }
}

/// Explicit page → strategy mapping, constructed at startup.
pub struct ParserRegistry {
    parsers: HashMap<Page, Box<dyn TableParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Registry covering every page in the catalog with the standard grid
    /// parser.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for page in Page::ALL {
            registry.register(page, Box::new(GridTableParser::default()));
        }
        registry
    }

    pub fn register(&mut self, page: Page, parser: Box<dyn TableParser>) {
        self.parsers.insert(page, parser);
    }

    /// Parse `html` with the strategy registered for `page`.
    pub fn parse(&self, page: Page, html: &str) -> Result<Vec<RawRow>, ScrapeError> {
        let parser = self
            .parsers
            .get(&page)
            .ok_or(ScrapeError::ParserNotRegistered(page))?;
        parser.parse(html)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
