//! Column resolution for trial balance exports.
//!
//! Header cells are compared lowercase and trimmed, with any UTF-8 BOM
//! removed, against fixed alias lists.

use std::path::Path;

use csv::StringRecord;

use crate::error::{IngestError, Result};

const ACCOUNT_ALIASES: &[&str] = &["account", "gl account", "account_code", "account code", "acct"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "account_name", "account name", "desc", "name"];
const NET_ALIASES: &[&str] = &["net", "ending balance", "ending_balance", "balance"];
const DEBIT_ALIASES: &[&str] = &["debit"];
const CREDIT_ALIASES: &[&str] = &["credit"];

/// Where a row's signed balance comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetSource {
    Net(usize),
    /// `debit - credit`; a missing side counts as zero.
    DebitCredit {
        debit: Option<usize>,
        credit: Option<usize>,
    },
}

/// Column indexes of one trial balance file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceColumns {
    pub account: usize,
    pub description: Option<usize>,
    pub net: NetSource,
}

impl BalanceColumns {
    pub fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|header| header == alias))
        };

        let account = find(ACCOUNT_ALIASES).ok_or_else(|| IngestError::MissingColumn {
            column: "Account",
            path: path.to_path_buf(),
        })?;
        let description = find(DESCRIPTION_ALIASES);
        let net = match find(NET_ALIASES) {
            Some(idx) => NetSource::Net(idx),
            None => {
                let debit = find(DEBIT_ALIASES);
                let credit = find(CREDIT_ALIASES);
                if debit.is_none() && credit.is_none() {
                    return Err(IngestError::MissingColumn {
                        column: "Net",
                        path: path.to_path_buf(),
                    });
                }
                NetSource::DebitCredit { debit, credit }
            }
        };
        Ok(Self {
            account,
            description,
            net,
        })
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_matches('\u{feff}').trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(headers: &[&str]) -> Result<BalanceColumns> {
        BalanceColumns::resolve(&StringRecord::from(headers.to_vec()), Path::new("tb.csv"))
    }

    #[test]
    fn net_column_wins_over_debit_credit() {
        let columns = resolve(&["GL Account", "Description", "Debit", "Credit", "Ending Balance"])
            .expect("columns");
        assert_eq!(columns.account, 0);
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.net, NetSource::Net(4));
    }

    #[test]
    fn debit_credit_fallback() {
        let columns = resolve(&["\u{feff}Account", "Debit", "Credit"]).expect("columns");
        assert_eq!(columns.account, 0);
        assert_eq!(columns.description, None);
        assert_eq!(
            columns.net,
            NetSource::DebitCredit {
                debit: Some(1),
                credit: Some(2)
            }
        );
    }

    #[test]
    fn missing_columns() {
        assert!(matches!(
            resolve(&["Description", "Net"]),
            Err(IngestError::MissingColumn { column: "Account", .. })
        ));
        assert!(matches!(
            resolve(&["Account", "Description"]),
            Err(IngestError::MissingColumn { column: "Net", .. })
        ));
    }
}
