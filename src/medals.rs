use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use derive_builder::Builder;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::SourceKind;

// The official page 403s plain clients, so look like a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    // Carried from the source as-is, never recomputed from the other three.
    pub total: u32,
}

pub type MedalTable = HashMap<String, MedalCount>;

#[derive(Debug, Builder, Serialize, Deserialize)]
pub struct MedalFetcher {
    endpoint: String,
    kind: SourceKind,
    #[builder(default = "30")]
    timeout_secs: u64,
    #[builder(default = "2")]
    poll_secs: u64,
}

impl MedalFetcher {
    pub async fn fetch(&self) -> Result<MedalTable> {
        match self.kind {
            SourceKind::Api => self.fetch_api().await,
            SourceKind::Page => self.fetch_page().await,
        }
    }

    async fn fetch_api(&self) -> Result<MedalTable> {
        let response = reqwest::get(&self.endpoint)
            .await
            .with_context(|| format!("medal api request to {} failed", self.endpoint))?
            .error_for_status()?;

        let payload: ApiPayload = response
            .json()
            .await
            .context("medal api returned a malformed payload")?;

        Ok(payload.into_table())
    }

    // Refetches until the document yields a parseable table, bounded by the
    // deadline. Transport and HTTP errors are not retried; only an empty
    // table is polled.
    async fn fetch_page(&self) -> Result<MedalTable> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);

        loop {
            let html = client
                .get(&self.endpoint)
                .header("Accept", BROWSER_ACCEPT)
                .header("Accept-Language", "en-US,en;q=0.9")
                .header("Referer", "https://www.google.com/")
                .send()
                .await
                .with_context(|| format!("medal page request to {} failed", self.endpoint))?
                .error_for_status()?
                .text()
                .await?;

            let table = parse_medal_table(&html);
            if !table.is_empty() {
                return Ok(table);
            }

            if Instant::now() >= deadline {
                bail!(
                    "no medal table appeared at {} within {}s",
                    self.endpoint,
                    self.timeout_secs
                );
            }
            tracing::debug!(endpoint = %self.endpoint, "medal table empty, polling again");
            tokio::time::sleep(Duration::from_secs(self.poll_secs)).await;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiPayload {
    #[serde(default)]
    data: Vec<ApiCountry>,
}

#[derive(Debug, Deserialize)]
struct ApiCountry {
    id: Option<String>,
    #[serde(default)]
    gold_medals: u32,
    #[serde(default)]
    silver_medals: u32,
    #[serde(default)]
    bronze_medals: u32,
    #[serde(default)]
    total_medals: u32,
}

impl ApiPayload {
    fn into_table(self) -> MedalTable {
        self.data
            .into_iter()
            .filter_map(|country| {
                let code = country.id?;
                let counts = MedalCount {
                    gold: country.gold_medals,
                    silver: country.silver_medals,
                    bronze: country.bronze_medals,
                    total: country.total_medals,
                };
                Some((code, counts))
            })
            .collect()
    }
}

/// Reads every table row of the document, taking cells 1-5 as country code,
/// gold, silver, bronze and total. Rows that are short or carry a
/// non-numeric medal cell are skipped rather than failing the whole parse.
pub fn parse_medal_table(html: &str) -> MedalTable {
    let document = Html::parse_document(html);
    let rows = Selector::parse("tr").unwrap();
    let cells = Selector::parse("td").unwrap();

    let mut table = MedalTable::new();
    for row in document.select(&rows) {
        let columns = row
            .select(&cells)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect::<Vec<_>>();
        if columns.len() < 6 {
            continue;
        }

        let Some(counts) = parse_counts(&columns[2..6]) else {
            tracing::debug!(code = %columns[1], "skipping unparseable medal row");
            continue;
        };
        table.insert(columns[1].clone(), counts);
    }

    table
}

fn parse_counts(columns: &[String]) -> Option<MedalCount> {
    let mut numbers = columns.iter().map(|column| column.parse::<u32>().ok());

    Some(MedalCount {
        gold: numbers.next()??,
        silver: numbers.next()??,
        bronze: numbers.next()??,
        total: numbers.next()??,
    })
}
