fn main() {
    if let Err(e) = sqltmpl_cli::run(std::env::args().collect()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
