use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::time::Instant;

use clipix_config::ConfigLoader;
use clipix_core::{DEFAULT_CATEGORY, TEACH_CATEGORIES};
use clipix_runtime::Assistant;

const MENU: &[&str] = &[
    "📚 Train from Documents",
    "💡 Teach Manually",
    "🧪 Test AI",
    "📊 Show Statistics",
    "💬 Chat with AI",
    "⚙️  Configure APIs",
    "🚪 Exit",
];

/// The interactive training menu.
pub(super) async fn cmd_trainer(loader: ConfigLoader) -> clipix_core::Result<()> {
    let theme = ColorfulTheme::default();

    println!("⚡ CLIPIX TRAINER - Loading...");
    let started = Instant::now();
    let mut assistant = Assistant::from_config(&loader.get());
    println!(
        "✅ Trainer Ready! ({} facts, {:.2}s)",
        assistant.total_facts(),
        started.elapsed().as_secs_f64()
    );

    loop {
        println!();
        println!("{}", "=".repeat(50));
        println!("{}", console::style("🤖 CLIPIX AI TRAINING MENU").bold());
        println!("{}", "=".repeat(50));

        let choice = match Select::with_theme(&theme)
            .with_prompt("🎯 Select option")
            .items(MENU)
            .default(0)
            .interact_opt()
        {
            Ok(Some(choice)) => choice,
            Ok(None) | Err(_) => {
                println!("\n🛑 Session interrupted.");
                break;
            }
        };

        let result = match choice {
            0 => super::train::cmd_train(&assistant, false),
            1 => teach_manually(&theme, &assistant),
            2 => {
                converse(&theme, &assistant, "🧪 TESTING AI", "❓ Question", "back").await;
                Ok(())
            }
            3 => {
                super::print_stats(&assistant.stats());
                Ok(())
            }
            4 => {
                converse(&theme, &assistant, "💬 CHAT WITH AI", "👤 You", "quit").await;
                Ok(())
            }
            5 => configure_apis(&theme, &loader).map(|changed| {
                if changed {
                    assistant = Assistant::from_config(&loader.get());
                }
            }),
            _ => {
                println!("👋 Thank you for using Clipix AI!");
                break;
            }
        };

        if let Err(e) = result {
            println!("❌ Error: {e}");
        }
    }

    Ok(())
}

fn teach_manually(theme: &ColorfulTheme, assistant: &Assistant) -> clipix_core::Result<()> {
    println!();
    println!("{}", console::style("💡 MANUAL TEACHING").bold());

    let category = Select::with_theme(theme)
        .with_prompt("Choose category")
        .items(TEACH_CATEGORIES)
        .default(TEACH_CATEGORIES.len() - 1)
        .interact()
        .map(|i| TEACH_CATEGORIES[i])
        .unwrap_or(DEFAULT_CATEGORY);

    let fact: String = Input::with_theme(theme)
        .with_prompt("Enter fact to teach")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    if fact.trim().is_empty() {
        println!("❌ No fact entered.");
        return Ok(());
    }

    let outcome = assistant.teach(category, &fact)?;
    println!("✅ Added to '{}': {}", outcome.category, outcome.fact);
    Ok(())
}

/// Ask questions until `stop_word` (or an empty read error).
async fn converse(theme: &ColorfulTheme, assistant: &Assistant, title: &str, prompt: &str, stop_word: &str) {
    println!();
    println!("{}", console::style(title).bold());
    println!("Type '{stop_word}' to return to menu");

    loop {
        let question: String = match Input::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(q) => q,
            Err(_) => break,
        };
        let question = question.trim();
        if question.eq_ignore_ascii_case(stop_word) {
            break;
        }
        if question.is_empty() {
            continue;
        }
        println!("{}", assistant.chat(question).await);
    }
}

/// Store API keys in clipix.toml. Returns whether anything changed.
fn configure_apis(theme: &ColorfulTheme, loader: &ConfigLoader) -> clipix_core::Result<bool> {
    println!();
    println!("{}", console::style("⚙️ API CONFIGURATION").bold());

    let choice = Select::with_theme(theme)
        .items(["Configure Google Search", "Configure DeepSeek", "Back to menu"])
        .default(2)
        .interact()
        .unwrap_or(2);

    match choice {
        0 => {
            println!("\n🔍 GOOGLE SEARCH SETUP");
            println!("Free: 100 searches/day");
            println!("Get API Key from: https://console.cloud.google.com/");
            println!("Get Search Engine ID from: https://cse.google.com/cse/");

            let api_key = ask_secret(theme, "Google API Key");
            let engine_id = ask_secret(theme, "Search Engine ID");
            if api_key.is_empty() || engine_id.is_empty() {
                println!("❌ Both API Key and Search Engine ID are required.");
                return Ok(false);
            }
            loader.set_string("search.api_key", &api_key)?;
            loader.set_string("search.engine_id", &engine_id)?;
            loader.set_value("search.enabled", "true")?;
            println!("✅ Google Search configured! (100 free searches/day)");
            Ok(true)
        }
        1 => {
            println!("\n🧠 DEEPSEEK API SETUP");
            println!("Get API Key from: https://platform.deepseek.com/");

            let api_key = ask_secret(theme, "DeepSeek API Key");
            if api_key.is_empty() {
                return Ok(false);
            }
            loader.set_string("llm.api_key", &api_key)?;
            println!("✅ DeepSeek API configured!");
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn ask_secret(theme: &ColorfulTheme, prompt: &str) -> String {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
