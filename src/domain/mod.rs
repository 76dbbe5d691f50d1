pub mod chat;
pub mod leads;
pub mod quotes;
