pub mod filter;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod recommender;

pub use providers::{ChatCompletionsProvider, CompletionProvider, ProviderError};
pub use recommender::Recommender;
