//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    pokedex_cli::init_logging();
    if let Err(err) = pokedex_cli::run() {
        eprintln!("pokedex: {err}");
        std::process::exit(1);
    }
}
