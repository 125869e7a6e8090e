mod product;
mod recommendation;

pub use product::Product;
pub use recommendation::{
    Preferences, RecommendationItem, RecommendationPayload, RecommendationRequest,
    RecommendationResponse,
};
