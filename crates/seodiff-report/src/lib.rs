pub mod dump;
pub mod error;
pub mod sheet;
pub mod sheets_client;
pub mod summary;
pub mod telegram;

pub use dump::{write_json, SiteReport};
pub use error::ReportError;
pub use sheets_client::{SheetsClient, SheetsCredentials};
pub use summary::{CategoryCounts, ChatSummary, DiffItem, ErrorItem, ITEM_LIMIT, MESSAGE_LIMIT};
pub use telegram::{Delivery, TelegramNotifier};
