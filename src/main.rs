// cxxcheck: static validator for a small C++-like language

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use cxxcheck::ui::App;
use cxxcheck::validate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("cxxcheck");

    if args.len() < 2 {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.cpp>", program_name);
        eprintln!();
        eprintln!("Keys: q quit, Tab switch pane, ↑/↓ PgUp/PgDn scroll,");
        eprintln!("      v validate again, r reload the file and validate");
        std::process::exit(1);
    }

    let source_file = &args[1];

    if !Path::new(source_file).exists() {
        eprintln!("Error: File '{}' not found", source_file);
        eprintln!("Usage: {} <file.cpp>", program_name);
        std::process::exit(1);
    }

    // Read source code
    let source = fs::read_to_string(source_file)?;

    eprintln!("Validating {}...", source_file);
    let report = validate(&source);
    if let Some(count) = report.token_count {
        eprintln!("Tokens identified: {}", count);
    }
    eprintln!("{}", report.summary());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(PathBuf::from(source_file), source, report);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    // Final report of the last validation run
    eprintln!("{}", app.report);

    Ok(())
}
