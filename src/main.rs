use app_registry::api_client::{DirectoryClient, DirectorySource, JsonFileDirectory};
use app_registry::commands::parse_command;
use app_registry::config::config::Config;
use app_registry::shell::Shell;
use app_registry::state::dispatcher::EventLogSubscriber;
use app_registry::state::RegistryController;
use app_registry::utils::app_paths::AppPaths;
use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers,
    MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
    ReedlineEvent, ReedlineMenu, Signal,
};
use std::{borrow::Cow, io};
use tracing::{info, warn};

mod completer;

use completer::CommandCompleter;

struct RegistryPrompt;

impl Prompt for RegistryPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("apps")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N> ".into(),
                reedline::PromptViMode::Insert => "I> ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str}> ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_usage() {
    println!("{}", "App Registry - deployment application records".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  app-registry [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}             - Directory endpoint to load from", "--url <URL>".green());
    println!("  {}     - Load from a local JSON document instead", "--file <FILE>".green());
    println!("  {}                  - Print the first page and exit", "--list".green());
    println!("  {}           - Write the default config file", "--init-config".green());
    println!("  {}       - Write a commented config file", "--generate-config".green());
    println!("  {}                  - Show this help", "--help".green());
    println!();
    println!("{}", "Shell keys:".yellow());
    println!("  {}    - Complete commands", "Tab".green());
    println!("  {} - Search history", "Ctrl+R".green());
    println!("  {} - Exit", "Ctrl+D".green());
    println!();
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(());
    }

    if args.contains(&"--init-config".to_string()) {
        let result = Config::get_config_path()
            .and_then(|path| Config::default().save_to(&path).map(|_| path));
        match result {
            Ok(path) => {
                println!("Configuration initialized at: {:?}", path);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error initializing config: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.contains(&"--generate-config".to_string()) {
        match Config::get_config_path() {
            Ok(path) => {
                if let Some(parent) = path.parent() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        eprintln!("Error creating config directory: {}", e);
                        std::process::exit(1);
                    }
                }
                if let Err(e) = std::fs::write(&path, Config::create_default_with_comments()) {
                    eprintln!("Error writing config file: {}", e);
                    std::process::exit(1);
                }
                println!("Configuration file created at: {:?}", path);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error determining config path: {}", e);
                std::process::exit(1);
            }
        }
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: could not load config ({}), using defaults", e);
        Config::default()
    });
    let log_buffer = app_registry::utils::logging::init_tracing(&config.logging.level);

    let source: Box<dyn DirectorySource> = match flag_value(&args, "--file") {
        Some(path) => Box::new(JsonFileDirectory::new(path)),
        None => {
            let url = flag_value(&args, "--url").unwrap_or_else(|| config.api_url());
            Box::new(DirectoryClient::new(&url))
        }
    };

    let mut controller =
        RegistryController::new().with_notification_life(config.notification_life());
    controller.subscribe(Box::new(EventLogSubscriber));

    println!("{}", format!("Loading applications from {}", source.describe()).cyan());
    match controller.load(source.as_ref()) {
        Ok(count) => info!(target: "main", "Loaded {} applications", count),
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }

    let mut shell = Shell::new(controller, &config).with_log_buffer(log_buffer);

    if args.contains(&"--list".to_string()) {
        println!("{}", shell.render());
        return Ok(());
    }

    println!("{}", shell.render());
    println!("{}", "Type 'help' for commands.".dark_grey());

    let history_file = AppPaths::history_file().unwrap_or_else(|e| {
        warn!(target: "main", "Falling back to home history file: {}", e);
        AppPaths::home_history_file()
    });
    let history = FileBackedHistory::with_file(50, history_file)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_completion")
            .with_columns(4)
            .with_column_padding(2),
    );

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Menu("command_completion".to_string()),
    );

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = RegistryPrompt;

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let command = match parse_command(&buffer) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{}", format!("{}", e).red());
                        continue;
                    }
                };

                match shell.execute(command) {
                    Ok(response) => {
                        for line in &response.lines {
                            println!("{}", line);
                        }
                        if response.quit {
                            println!("Goodbye!");
                            break;
                        }
                    }
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                break;
            }
        }
    }

    Ok(())
}
