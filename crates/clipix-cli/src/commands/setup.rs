use std::path::Path;

use clipix_config::loader::DEFAULT_CONFIG_TEMPLATE;
use clipix_config::{ClipixConfig, WarningSeverity};
use clipix_memory::ingest::setup_folders;

pub(super) fn cmd_init(config_path: &Path, force: bool) -> clipix_core::Result<()> {
    if config_path.exists() && !force {
        println!("⚠️  {} already exists", config_path.display());
        println!("   Use --force to overwrite it, or 'clipix set KEY VALUE' to edit one key.");
    } else {
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, DEFAULT_CONFIG_TEMPLATE)?;
        println!("✅ Created {}", config_path.display());
    }

    // Paths in the template are relative to the working directory
    let config = ClipixConfig::default();
    setup_folders(&config.knowledge.documents_dir)?;
    println!(
        "📁 Documents folder ready: {}",
        config.knowledge.documents_dir.display()
    );
    println!();
    println!("   Next steps:");
    println!("   1. Add API keys: clipix trainer → Configure APIs");
    println!("   2. Drop .txt files into the documents folders and run: clipix train");
    println!("   3. Start chatting: clipix chat");
    Ok(())
}

pub(super) fn cmd_doctor(config: &ClipixConfig) -> clipix_core::Result<()> {
    println!("🩺 Clipix Doctor: configuration audit");
    println!();

    let warnings = match config.validate() {
        Ok(w) => w,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let mut warn_count = 0;
    let mut info_count = 0;
    for w in &warnings {
        println!("  {w}");
        match w.severity {
            WarningSeverity::Warning => warn_count += 1,
            WarningSeverity::Info => info_count += 1,
            WarningSeverity::Error => {}
        }
    }

    let mut ok_count = 0;
    let mut check = |ok: bool, pass: String, fail: String| {
        if ok {
            println!("  ✅ {pass}");
            ok_count += 1;
        } else {
            println!("  💡 {fail}");
            info_count += 1;
        }
    };

    let kb = &config.knowledge.path;
    check(
        kb.exists(),
        format!("knowledge file {} found", kb.display()),
        format!("knowledge file {} not found yet; it is created on first save", kb.display()),
    );
    let docs = &config.knowledge.documents_dir;
    check(
        docs.is_dir(),
        format!("documents folder {} found", docs.display()),
        format!("documents folder {} missing; run 'clipix init'", docs.display()),
    );
    check(
        config.search.is_usable(),
        "Google Search configured".into(),
        "Google Search not configured; questions memory can't answer go to the LLM".into(),
    );
    check(
        config.llm.is_usable(),
        "DeepSeek configured".into(),
        "DeepSeek not configured; unanswered questions get \"I don't know\"".into(),
    );
    check(
        config.server.api_key.is_some(),
        "server.api_key set for /api/*".into(),
        "server.api_key not set; anyone who can reach the server can teach it".into(),
    );

    println!();
    println!(
        "  ✅ {ok_count} checks passed, ⚠️  {warn_count} warnings, 💡 {info_count} suggestions"
    );

    Ok(())
}
