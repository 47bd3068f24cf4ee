//! Hedera mirror node `/api/v1/transactions` payloads.
//!
//! Only the fields the canvas needs are modelled. Memos arrive base64
//! encoded and are turned back into text here, before the codec sees them.

use crate::error::{LedgerError, LedgerResult};
use hashcanvas_core::types::{ConsensusTimestamp, LedgerRecord};
use serde::Deserialize;
use tracing::{debug, warn};

/// One page of the transactions listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionsPage {
    #[serde(default)]
    pub transactions: Vec<MirrorTransaction>,
    #[serde(default)]
    pub links: PageLinks,
}

/// Pagination links. `next` is a path relative to the mirror node root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorTransaction {
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub consensus_timestamp: String,
    #[serde(default)]
    pub memo_base64: Option<String>,
    #[serde(default)]
    pub transfers: Option<Vec<Transfer>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    pub account: String,
    pub amount: i64,
}

impl MirrorTransaction {
    /// The paying account: the first leg that sends funds, else the first leg.
    pub fn payer(&self) -> Option<&str> {
        let transfers = self.transfers.as_deref()?;
        transfers
            .iter()
            .find(|t| t.amount < 0)
            .or_else(|| transfers.first())
            .map(|t| t.account.as_str())
    }

    /// Memo as text. Empty, non-base64 and non-UTF-8 memos count as absent.
    pub fn memo_text(&self) -> Option<String> {
        let encoded = self.memo_base64.as_deref().filter(|m| !m.is_empty())?;
        let bytes = match base64::decode(encoded) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Undecodable memo on {}: {}", self.consensus_timestamp, e);
                return None;
            }
        };
        String::from_utf8(bytes).ok().filter(|m| !m.is_empty())
    }

    pub fn to_record(&self) -> LedgerResult<LedgerRecord> {
        let ordering_key: ConsensusTimestamp = self.consensus_timestamp.parse()?;
        Ok(LedgerRecord {
            memo: self.memo_text(),
            ordering_key,
            transfer_origin: self.payer().map(str::to_string),
        })
    }
}

impl TransactionsPage {
    /// Convert every transaction with a usable timestamp, keeping page order.
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.transactions
            .iter()
            .filter_map(|tx| match tx.to_record() {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        "Skipping transaction {}: {}",
                        tx.transaction_id.as_deref().unwrap_or("?"),
                        e
                    );
                    None
                }
            })
            .collect()
    }
}

/// Parse a response body.
pub fn parse_page(body: &str) -> LedgerResult<TransactionsPage> {
    serde_json::from_str(body).map_err(|e| LedgerError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // {"x":1,"y":2,"c":"#FF0000"} tagged with the default memo tag
    const PIXEL_MEMO_B64: &str =
        "SEVERVJBX1BMQUNFX1BJWEVMOnsieCI6MSwieSI6MiwiYyI6IiNGRjAwMDAifQ==";

    fn page_json() -> String {
        format!(
            r#"{{
                "transactions": [
                    {{
                        "transaction_id": "0.0.500-1700000000-000000001",
                        "consensus_timestamp": "1700000001.000000002",
                        "memo_base64": "{}",
                        "transfers": [
                            {{"account": "0.0.3", "amount": 5000}},
                            {{"account": "0.0.500", "amount": -6000}},
                            {{"account": "0.0.12345", "amount": 1000}}
                        ]
                    }},
                    {{
                        "consensus_timestamp": "1700000000.5",
                        "memo_base64": ""
                    }},
                    {{
                        "consensus_timestamp": "not-a-time",
                        "memo_base64": "aGk="
                    }}
                ],
                "links": {{"next": "/api/v1/transactions?account.id=0.0.12345&timestamp=lt:1700000000.5"}}
            }}"#,
            PIXEL_MEMO_B64
        )
    }

    #[test]
    fn test_parse_page() {
        let page = parse_page(&page_json()).unwrap();
        assert_eq!(page.transactions.len(), 3);
        assert!(page.links.next.as_deref().unwrap().contains("timestamp=lt:"));

        let records = page.records();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(
            first.memo.as_deref(),
            Some(r##"HEDERA_PLACE_PIXEL:{"x":1,"y":2,"c":"#FF0000"}"##)
        );
        assert_eq!(first.transfer_origin.as_deref(), Some("0.0.500"));
        assert_eq!(first.ordering_key, ConsensusTimestamp::new(1_700_000_001, 2));

        assert_eq!(records[1].memo, None);
        assert_eq!(records[1].transfer_origin, None);
    }

    #[test]
    fn test_payer_falls_back_to_first_leg() {
        let tx = MirrorTransaction {
            transaction_id: None,
            consensus_timestamp: "1.0".into(),
            memo_base64: None,
            transfers: Some(vec![Transfer {
                account: "0.0.42".into(),
                amount: 10,
            }]),
        };
        assert_eq!(tx.payer(), Some("0.0.42"));
    }

    #[test]
    fn test_bad_base64_memo_is_absent() {
        let tx = MirrorTransaction {
            transaction_id: None,
            consensus_timestamp: "1.0".into(),
            memo_base64: Some("***".into()),
            transfers: None,
        };
        assert_eq!(tx.memo_text(), None);
    }

    #[test]
    fn test_empty_and_garbage_bodies() {
        assert!(parse_page("{}").unwrap().transactions.is_empty());
        assert!(matches!(
            parse_page("<html>"),
            Err(LedgerError::InvalidResponse(_))
        ));
    }
}
