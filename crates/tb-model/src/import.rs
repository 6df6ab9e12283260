//! Fixed-schema import record for the downstream accounting system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column order of the import file.
pub const IMPORT_COLUMNS: [&str; 16] = [
    "PERIOD",
    "REF",
    "SOURCE",
    "ENTITYID",
    "ACCTNUM",
    "DEPARTMENT",
    "AMT",
    "DESCRPN",
    "ENTRDATE",
    "STATUS",
    "BASIS",
    "AUDITFLAG",
    "ADDLDESC",
    "ASSETCLASS",
    "ASSETCODE",
    "INTERENTITY",
];

/// One line of the import batch. Field order matches [`IMPORT_COLUMNS`].
///
/// Optional attributes are empty strings rather than `Option` so every
/// column is always present in the written file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(rename = "PERIOD")]
    pub period: String,
    #[serde(rename = "REF")]
    pub reference: String,
    #[serde(rename = "SOURCE")]
    pub source: String,
    #[serde(rename = "ENTITYID")]
    pub entity_id: String,
    #[serde(rename = "ACCTNUM")]
    pub account: String,
    #[serde(rename = "DEPARTMENT")]
    pub department: String,
    /// Signed activity, scale 2.
    #[serde(rename = "AMT")]
    pub amount: Decimal,
    #[serde(rename = "DESCRPN")]
    pub description: String,
    #[serde(rename = "ENTRDATE")]
    pub entry_date: String,
    #[serde(rename = "STATUS")]
    pub status: String,
    #[serde(rename = "BASIS")]
    pub basis: String,
    #[serde(rename = "AUDITFLAG")]
    pub audit_flag: String,
    #[serde(rename = "ADDLDESC")]
    pub additional_description: String,
    #[serde(rename = "ASSETCLASS")]
    pub asset_class: String,
    #[serde(rename = "ASSETCODE")]
    pub asset_code: String,
    #[serde(rename = "INTERENTITY")]
    pub inter_entity: String,
}

impl ImportRecord {
    /// Field values in column order.
    pub fn to_fields(&self) -> [String; 16] {
        [
            self.period.clone(),
            self.reference.clone(),
            self.source.clone(),
            self.entity_id.clone(),
            self.account.clone(),
            self.department.clone(),
            self.amount.to_string(),
            self.description.clone(),
            self.entry_date.clone(),
            self.status.clone(),
            self.basis.clone(),
            self.audit_flag.clone(),
            self.additional_description.clone(),
            self.asset_class.clone(),
            self.asset_code.clone(),
            self.inter_entity.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn fields_follow_column_order() {
        let record = ImportRecord {
            period: "04/25".to_string(),
            reference: String::new(),
            source: "GA".to_string(),
            entity_id: "M55020".to_string(),
            account: "GM10100".to_string(),
            department: "@".to_string(),
            amount: dec!(150.00),
            description: "Cash".to_string(),
            entry_date: "2025-04-30 00:00:00".to_string(),
            status: "P".to_string(),
            basis: "B".to_string(),
            audit_flag: String::new(),
            additional_description: String::new(),
            asset_class: String::new(),
            asset_code: String::new(),
            inter_entity: String::new(),
        };
        let fields = record.to_fields();
        let amt = IMPORT_COLUMNS.iter().position(|c| *c == "AMT").expect("AMT column");
        assert_eq!(fields[amt], "150.00");
        assert_eq!(fields[0], "04/25");
        assert_eq!(fields[4], "GM10100");
    }
}
