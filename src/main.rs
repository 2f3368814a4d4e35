use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};

use latchkey::storage::{FileStorage, MemoryStorage, Storage};
use latchkey::utils::logging::init_logging;
use latchkey::{cli, AuthFlow, UserRecord};

fn main() {
    // Define the command-line interface using clap
    let matches = Command::new("latchkey")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Local-first login, registration and password-reset flow")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding the account and session files")
                .default_value("."),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .help("Keep accounts in memory only; nothing survives exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log at debug level")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let data_dir = matches
        .get_one::<String>("data-dir")
        .map(PathBuf::from)
        .unwrap_or_default();
    let use_memory = matches.get_flag("memory");
    let verbose = matches.get_flag("verbose");

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Warning: could not create data directory: {}", e);
    }
    if let Err(e) = init_logging(verbose, &data_dir.join("latchkey.log")) {
        eprintln!("Warning: logging could not be initialized: {}", e);
    }

    let storage: Box<dyn Storage> = if use_memory {
        Box::new(MemoryStorage::new())
    } else {
        Box::new(FileStorage::new(data_dir))
    };

    // Fired once per successful login or registration
    let on_login = Box::new(|user: &UserRecord| {
        println!("\nWelcome, {}! You are now signed in.", user.username);
    });

    let mut flow = AuthFlow::new(storage, on_login);

    // A session persisted by an earlier run skips the login screen; it
    // does not re-fire the callback above
    if let Some(user) = flow.current_user() {
        println!("Restored session for {} <{}>.", user.username, user.email);
    }

    if let Err(e) = cli::run(&mut flow) {
        eprintln!("Input error: {}", e);
        process::exit(1);
    }
}
