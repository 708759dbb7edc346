pub mod savings_digest;
