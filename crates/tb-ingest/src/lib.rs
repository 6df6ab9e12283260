//! Trial balance ingestion.
//!
//! Turns a CSV export of a trial balance into a normalized
//! [`BalanceTable`](tb_model::BalanceTable): `Account`, `Description` and a
//! signed `Net` per row, with `TOTAL` lines removed and unparseable amounts
//! coerced to zero and recorded.

pub mod amount;
pub mod error;
pub mod header;
pub mod reader;

pub use amount::{ParsedAmount, parse_amount};
pub use error::{IngestError, Result};
pub use header::{BalanceColumns, NetSource};
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_balance_table,
    read_balance_table_from_reader, validate_encoding,
};
