use crate::{
    db::Catalog,
    models::{Preferences, Product, RecommendationRequest},
};

/// Maximum number of items the model is asked to return
pub const MAX_RECOMMENDATIONS: usize = 3;

const CATALOG_SEPARATOR: &str = "\n\n---\n\n";

/// System and user messages for one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Behavioral contract for the model. The response is still validated.
pub fn system_prompt() -> String {
    format!(
        "You are an expert e-commerce product recommendation engine. \
         You receive a user's preferences, their recent browsing history and a product catalog \
         that has already been filtered by category and price. \
         Only recommend products that appear in the provided catalog. \
         Recommendations MUST satisfy the user's `categories` and `price_range` preferences when they are given. \
         Strongly favor products that match the user's `styles`, `tags` and `other_interests`, \
         but never at the expense of the category and price constraints. \
         Use the browsing history as a weaker signal. \
         Return up to {max} recommendations, the best matches first; return fewer if there are not {max} good matches. \
         For each recommendation give the product ID and a short, user-friendly explanation of at most two sentences \
         that ties the product to the user's preferences or history. \
         Respond with a single JSON object with exactly one key, \"recommendations\", whose value is a list of objects, \
         each with the string keys \"product_id\" and \"explanation\". \
         Do not include any other text, greetings or markdown such as ```json fences. Return only the raw JSON object.",
        max = MAX_RECOMMENDATIONS
    )
}

/// Product blocks for every candidate, separated by `---`
pub fn render_catalog(candidates: &[&Product]) -> String {
    candidates
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(CATALOG_SEPARATOR)
}

/// Bulleted list of recently viewed products. Ids not in the catalog are skipped.
pub fn render_history(history_ids: &[String], catalog: &Catalog) -> String {
    let viewed: Vec<String> = history_ids
        .iter()
        .filter_map(|id| catalog.get(id))
        .map(|p| format!("- {} (ID: {})", p.name, p.id))
        .collect();

    if viewed.is_empty() {
        "User has no browsing history yet.".to_string()
    } else {
        format!("User has recently viewed:\n{}", viewed.join("\n"))
    }
}

pub fn render_preferences(preferences: &Preferences) -> String {
    format!("User Preferences:\n{}", preferences.to_pretty_json())
}

/// Builds the full prompt for a pre-filtered candidate set
pub fn build_prompt(
    candidates: &[&Product],
    catalog: &Catalog,
    request: &RecommendationRequest,
) -> PromptPair {
    let user = format!(
        "{preferences}\n\n\
         {history}\n\n\
         Available Product Catalog (use ONLY these products, already filtered by category/price):\n\
         ---\n\
         {catalog}\n\n\
         ---\n\
         Strictly respecting the category/price preferences, strongly considering styles/tags/interests \
         and taking the browsing history into account, provide up to {max} product recommendations \
         with explanations in the specified JSON format.",
        preferences = render_preferences(&request.preferences),
        history = render_history(&request.history_ids, catalog),
        catalog = render_catalog(candidates),
        max = MAX_RECOMMENDATIONS,
    );

    PromptPair {
        system: system_prompt(),
        user,
    }
}
