fn main() {
    if let Err(err) = vulnenrich::cli::run() {
        vulnenrich::ui::eprintln_error(&err);
        std::process::exit(vulnenrich::exit::exit_code(&err));
    }
}
