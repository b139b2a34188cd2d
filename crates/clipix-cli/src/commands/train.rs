use dialoguer::{Confirm, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};

use clipix_memory::ingest::{DEFAULT_FOLDERS, setup_folders};
use clipix_runtime::Assistant;

/// Train from the documents folder, asking first unless `yes`.
pub(super) fn cmd_train(assistant: &Assistant, yes: bool) -> clipix_core::Result<()> {
    println!();
    println!("{}", console::style("📚 TRAINING FROM DOCUMENTS").bold());
    println!(
        "This will process all files in the '{}' folder",
        assistant.documents_dir().display()
    );

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Continue?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Training cancelled.");
            return Ok(());
        }
    }

    run_training(assistant)
}

/// Train without prompting. Creates the category folders when the documents
/// folder is missing.
fn run_training(assistant: &Assistant) -> clipix_core::Result<()> {
    let dir = assistant.documents_dir();
    if !dir.exists() {
        setup_folders(dir)?;
        println!("📁 Created '{}' with folders: {}", dir.display(), DEFAULT_FOLDERS.join(", "));
        println!("   Add .txt or .md files there and run training again.");
        return Ok(());
    }

    let docs = assistant.training_documents()?;
    if docs.is_empty() {
        println!("❌ No .txt or .md documents found in '{}'", dir.display());
        return Ok(());
    }

    let bar = ProgressBar::new(docs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let report = assistant.train_documents(&docs, |doc| {
        bar.set_message(doc.path.display().to_string());
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    for doc in &report.documents {
        match &doc.error {
            Some(e) => println!("  ❌ {}: {e}", doc.path.display()),
            None => println!("  ✅ {} [{}]: {} facts", doc.path.display(), doc.category, doc.facts),
        }
    }
    println!(
        "🎉 Training complete! Added {} facts from {} documents ({} total)",
        report.facts_added,
        report.documents.len(),
        assistant.total_facts()
    );

    Ok(())
}
