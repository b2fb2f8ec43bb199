//! Categorization commands

use anyhow::Result;
use penny_core::{
    AIClient, Categorizer, KeywordTable, ServiceConfig, DEFAULT_CATEGORY, REMOTE_CATEGORIES,
};

pub async fn cmd_categorize(config: &ServiceConfig, merchant: &str, amount: f64) -> Result<()> {
    let categorizer = Categorizer::from_config(&config.categorizer, AIClient::from_config(&config.ai));
    let result = categorizer.categorize(merchant, amount).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn cmd_categories(config: &ServiceConfig) -> Result<()> {
    print!("{}", format_categories(&KeywordTable::builtin()));
    println!();
    println!("Remote vocabulary:");
    println!("  {}", REMOTE_CATEGORIES.join(", "));
    println!();
    println!("Default: {}", DEFAULT_CATEGORY);
    println!(
        "Strict labels: {}",
        if config.categorizer.strict_labels { "on" } else { "off" }
    );
    Ok(())
}

/// Render the keyword table in priority order
pub fn format_categories(table: &KeywordTable) -> String {
    let mut out = String::from("Keyword table (first match wins):\n");
    for (i, category) in table.categories().iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {:<16} {}\n",
            i + 1,
            category.label,
            category.tokens.join(", ")
        ));
    }
    out
}
