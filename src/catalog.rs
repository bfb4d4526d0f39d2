//! Static registry of scrapeable report pages.
//!
//! Each VitiBrasil report page is addressed by an `opcao` code in the site's
//! query string, optionally refined by an ordered list of `subopcao` codes,
//! and lands in exactly one canonical entity table. The registry is plain
//! data so new pages can be added without touching pipeline code.

use std::str::FromStr;

use crate::data::Entity;
use crate::scraper::errors::ScrapeError;

/// A logical report page on the VitiBrasil site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Production,
    Processing,
    Commercialization,
    Import,
    Export,
}

/// Remote addressing and storage target for a [`Page`].
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    /// `opcao` query-string code on the remote site.
    pub option_code: &'static str,
    /// Ordered `subopcao` codes, empty when the page has none.
    pub suboptions: &'static [&'static str],
    /// Entity table the page's rows are persisted into.
    pub entity: Entity,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Production,
        Page::Processing,
        Page::Commercialization,
        Page::Import,
        Page::Export,
    ];

    pub fn spec(self) -> PageSpec {
        match self {
            Page::Production => PageSpec {
                option_code: "opt_02",
                suboptions: &[],
                entity: Entity::Production,
            },
            Page::Processing => PageSpec {
                option_code: "opt_03",
                suboptions: &["subopt_01", "subopt_02", "subopt_03", "subopt_04"],
                entity: Entity::Processing,
            },
            Page::Commercialization => PageSpec {
                option_code: "opt_04",
                suboptions: &[],
                entity: Entity::Commercialization,
            },
            Page::Import => PageSpec {
                option_code: "opt_05",
                suboptions: &[
                    "subopt_01",
                    "subopt_02",
                    "subopt_03",
                    "subopt_04",
                    "subopt_05",
                ],
                entity: Entity::Import,
            },
            Page::Export => PageSpec {
                option_code: "opt_06",
                suboptions: &["subopt_01", "subopt_02", "subopt_03", "subopt_04"],
                entity: Entity::Export,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Page::Production => "production",
            Page::Processing => "processing",
            Page::Commercialization => "commercialization",
            Page::Import => "import",
            Page::Export => "export",
        }
    }
}

impl FromStr for Page {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" => Ok(Page::Production),
            "processing" => Ok(Page::Processing),
            "commercialization" => Ok(Page::Commercialization),
            "import" => Ok(Page::Import),
            "export" => Ok(Page::Export),
            _ => Err(ScrapeError::UnknownPage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!("Production".parse::<Page>().unwrap(), Page::Production);
        assert_eq!(" IMPORT ".parse::<Page>().unwrap(), Page::Import);
        assert_eq!("export".parse::<Page>().unwrap(), Page::Export);
    }

    #[test]
    fn test_unknown_page_is_rejected() {
        let err = "inventory".parse::<Page>().unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownPage(s) if s == "inventory"));
    }

    #[test]
    fn test_suboption_order_matches_remote_site() {
        assert!(Page::Production.spec().suboptions.is_empty());
        assert_eq!(Page::Import.spec().suboptions.len(), 5);
        assert_eq!(Page::Export.spec().suboptions.len(), 4);
        assert_eq!(Page::Processing.spec().suboptions[0], "subopt_01");
    }
}
