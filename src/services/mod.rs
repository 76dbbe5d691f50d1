pub mod ai;
pub mod email;
pub mod sheets;

pub use ai::AiClient;
pub use email::EmailClient;
pub use sheets::SheetsClient;
