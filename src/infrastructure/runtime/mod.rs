pub mod tokio;
