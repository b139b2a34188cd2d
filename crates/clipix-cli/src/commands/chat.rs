use std::io::Write;

use tokio::io::AsyncBufReadExt;

use clipix_config::ClipixConfig;
use clipix_runtime::Assistant;

pub(super) async fn cmd_chat(config: ClipixConfig) -> clipix_core::Result<()> {
    let assistant = Assistant::from_config(&config);

    println!("🤖 Clipix Interactive Chat");
    println!("   Type 'quit' or Ctrl+C to end the chat");
    println!("   Speed: Memory → Google → DeepSeek");
    println!();

    if !assistant.search_enabled() && !assistant.llm_enabled() {
        eprintln!("⚠️  No Google Search or DeepSeek key found; answers come from memory only.");
        eprintln!("   Run 'clipix trainer' → Configure APIs, or set GOOGLE_API_KEY / DEEPSEEK_API_KEY.");
        eprintln!();
    }

    let stdin = tokio::io::stdin();
    let mut lines = tokio::io::BufReader::new(stdin).lines();

    loop {
        eprint!("\x1b[36m👤 You:\x1b[0m ");
        std::io::stderr().flush().ok();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_quit(trimmed) {
            println!("👋 Goodbye!");
            break;
        }

        let answer = assistant.chat(trimmed).await;
        println!("{answer}");
        println!();
    }

    Ok(())
}

pub(super) async fn cmd_ask(config: ClipixConfig, question: &str) -> clipix_core::Result<()> {
    let assistant = Assistant::from_config(&config);
    let answer = assistant.chat(question).await;
    println!("{answer}");
    Ok(())
}

fn is_quit(input: &str) -> bool {
    matches!(
        input.to_lowercase().as_str(),
        "quit" | "exit" | "/exit" | "/quit"
    )
}
