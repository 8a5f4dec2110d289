use std::io;

fn main() {
    ante_cli::logging::init_logging();
    let code = ante_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
