use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::tool_registry::Tool;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Article {
    pub article_id: String,
    pub title: String,
    pub solution: String,
}

#[derive(Deserialize, Debug)]
pub struct SearchArgs {
    pub query_string: String,
}

/// Keyword-matched help articles. A query hits an article when the
/// article's key phrase appears anywhere in the lower-cased query.
pub struct KnowledgeBase {
    articles: Vec<(String, Article)>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::from_articles([
            (
                "login issue",
                Article {
                    article_id: "KB-001".to_string(),
                    title: "How to reset your password".to_string(),
                    solution: "You can reset your password by clicking 'Forgot Password' on the login page.".to_string(),
                },
            ),
            (
                "slow connection",
                Article {
                    article_id: "KB-002".to_string(),
                    title: "Troubleshooting slow connection".to_string(),
                    solution: "Try restarting your router and clearing your browser cache.".to_string(),
                },
            ),
        ])
    }

    pub fn from_articles<'a>(articles: impl IntoIterator<Item = (&'a str, Article)>) -> Self {
        Self {
            articles: articles
                .into_iter()
                .map(|(key, article)| (key.to_lowercase(), article))
                .collect(),
        }
    }

    pub fn search(&self, query: &str) -> Vec<Article> {
        let query = query.to_lowercase();
        self.articles
            .iter()
            .filter(|(key, _)| query.contains(key.as_str()))
            .map(|(_, article)| article.clone())
            .collect()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for KnowledgeBase {
    const NAME: &'static str = "search_knowledge_base";
    const DESCRIPTION: &'static str =
        "Searches the company knowledge base for solutions to common problems.";

    type Args = SearchArgs;
    type Output = Vec<Article>;

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query_string": {
                    "type": "string",
                    "description": "The user's problem, e.g., 'cannot log in'"
                }
            },
            "required": ["query_string"]
        })
    }

    fn call(&self, args: SearchArgs) -> anyhow::Result<Vec<Article>> {
        let hits = self.search(&args.query_string);
        info!(query = %args.query_string, hits = hits.len(), "search_knowledge_base called");
        Ok(hits)
    }
}
